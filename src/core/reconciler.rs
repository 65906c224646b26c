use crate::domain::model::{ClassifiedSequence, HomologyHit, SequenceDomainProfile, TfPrediction};
use crate::domain::ports::FamilyResolver;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const AGGREGATE_SEPARATOR: &str = "; ";

/// 物種註記的起始標記，之後的文字都會被移除
pub const ORGANISM_MARKER: &str = " OS=";

/// 三個來源以序列 ID 做 full outer join，每個 ID 產生一列並附上 family。
///
/// 輸出依 ID 排序；只在某一來源出現的序列仍會保留，缺少的欄位為 `None`。
pub fn merge<R: FamilyResolver + ?Sized>(
    homology: &BTreeMap<String, HomologyHit>,
    domain_profiles: &BTreeMap<String, SequenceDomainProfile>,
    predictions: &BTreeMap<String, TfPrediction>,
    resolver: &R,
) -> Vec<ClassifiedSequence> {
    let identifiers: BTreeSet<&String> = homology
        .keys()
        .chain(domain_profiles.keys())
        .chain(predictions.keys())
        .collect();

    let empty = BTreeSet::new();
    identifiers
        .into_iter()
        .map(|id| {
            let hit = homology.get(id);
            let profile = domain_profiles.get(id);
            let prediction = predictions.get(id);

            let detected = profile.map(|p| &p.domains).unwrap_or(&empty);
            let family = resolver.classify(detected);

            ClassifiedSequence {
                sequence_id: id.clone(),
                prediction: prediction.and_then(|p| p.is_tf),
                score: prediction.and_then(|p| p.score.clone()),
                title: hit.and_then(|h| h.title.as_deref()).map(normalize_title),
                percent_identity: hit.and_then(|h| h.percent_identity.clone()),
                query_coverage: hit.and_then(|h| h.query_coverage.clone()),
                evalue: hit.and_then(|h| h.evalue.clone()),
                domain: profile.map(|p| aggregate_text(p.hits.iter().map(|h| h.domain.as_deref()))),
                description: profile
                    .map(|p| aggregate_text(p.hits.iter().map(|h| h.description.as_deref()))),
                start: profile.and_then(|p| aggregate_coordinates(p.hits.iter().map(|h| h.start))),
                end: profile.and_then(|p| aggregate_coordinates(p.hits.iter().map(|h| h.end))),
                family,
            }
        })
        .collect()
}

/// 不重複的非空值排序後以 `"; "` 串接
pub fn aggregate_text<'a>(values: impl Iterator<Item = Option<&'a str>>) -> String {
    values
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(AGGREGATE_SEPARATOR)
}

/// 座標依數值排序；全部缺值時回傳 `None`
pub fn aggregate_coordinates(values: impl Iterator<Item = Option<u64>>) -> Option<String> {
    let distinct: BTreeSet<u64> = values.flatten().collect();
    if distinct.is_empty() {
        return None;
    }
    Some(
        distinct
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(AGGREGATE_SEPARATOR),
    )
}

/// 去掉 " OS=" 之後的物種資訊，再去掉第一個 token（accession）
pub fn normalize_title(raw: &str) -> String {
    let head = raw.split(ORGANISM_MARKER).next().unwrap_or(raw);
    head.split(' ').skip(1).collect::<Vec<_>>().join(" ")
}

/// 每個 ID 只保留第一筆
pub fn dedup_by_identifier(rows: Vec<ClassifiedSequence>) -> Vec<ClassifiedSequence> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.sequence_id.clone()))
        .collect()
}
