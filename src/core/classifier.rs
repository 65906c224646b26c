use crate::core::reference::FamilyReference;
use crate::domain::ports::FamilyResolver;
use std::collections::BTreeSet;

pub const HOMEOBOX_FAMILY: &str = "Homeobox";

/// Homeobox 子家族的標記 domain，依優先順序排列
pub const HOMEOBOX_MARKERS: [(&str, &str); 3] = [
    ("PF03529", "TF_Otx"),
    ("PF00157", "Pou"),
    ("PF02376", "CUT"),
];

/// 以集合包含關係將一條序列的 domain 對應到 TF family。
///
/// 依參考表順序取第一個 domain 集合被完整包含的 family；
/// 若結果是 Homeobox 且帶有子家族標記，改以子家族名稱回傳。
#[derive(Debug, Clone)]
pub struct DomainSetClassifier {
    reference: FamilyReference,
}

impl DomainSetClassifier {
    pub fn new(reference: FamilyReference) -> Self {
        Self { reference }
    }

    /// 所有符合的 family（未做 Homeobox 改名），依參考表順序
    pub fn candidates<'a>(&'a self, detected: &'a BTreeSet<String>) -> impl Iterator<Item = &'a str> + 'a {
        self.reference
            .families()
            .filter(move |family| family.domains.is_subset(detected))
            .map(|family| family.name.as_str())
    }

    pub fn classify(&self, detected: &BTreeSet<String>) -> Option<String> {
        let matched = self.candidates(detected).next()?;

        if matched == HOMEOBOX_FAMILY {
            return Some(homeobox_subfamily(detected).to_string());
        }

        Some(matched.to_string())
    }
}

fn homeobox_subfamily(detected: &BTreeSet<String>) -> &'static str {
    HOMEOBOX_MARKERS
        .iter()
        .find(|(marker, _)| detected.contains(*marker))
        .map(|(_, subfamily)| *subfamily)
        .unwrap_or(HOMEOBOX_FAMILY)
}

impl FamilyResolver for DomainSetClassifier {
    fn classify(&self, detected: &BTreeSet<String>) -> Option<String> {
        DomainSetClassifier::classify(self, detected)
    }
}
