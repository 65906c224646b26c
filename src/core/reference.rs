use crate::domain::table::{cell, RawTable};
use crate::utils::error::{EtlError, Result};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDefinition {
    pub name: String,
    pub domains: BTreeSet<String>,
}

/// TF family 與其 domain 組合的對照表。
///
/// family 依照在參考表中首次出現的順序保存，分類時的比對順序即由此決定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyReference {
    families: Vec<FamilyDefinition>,
}

impl FamilyReference {
    /// 由 (family, domain) 列建立索引，任何一列缺少 family 或 domain 即失敗
    pub fn build<I, F, D>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (F, D)>,
        F: AsRef<str>,
        D: AsRef<str>,
    {
        let mut families: Vec<FamilyDefinition> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut row_count = 0;

        for (index, (family, domain)) in rows.into_iter().enumerate() {
            let row = index + 1;
            row_count = row;
            let family = family.as_ref().trim();
            let domain = domain.as_ref().trim();

            if family.is_empty() {
                return Err(EtlError::MalformedReferenceError {
                    row,
                    reason: "empty family field".to_string(),
                });
            }
            if domain.is_empty() {
                return Err(EtlError::MalformedReferenceError {
                    row,
                    reason: format!("empty domain field for family '{}'", family),
                });
            }

            let position = *positions.entry(family.to_string()).or_insert_with(|| {
                families.push(FamilyDefinition {
                    name: family.to_string(),
                    domains: BTreeSet::new(),
                });
                families.len() - 1
            });
            families[position].domains.insert(domain.to_string());
        }

        if families.is_empty() {
            return Err(EtlError::MalformedReferenceError {
                row: 0,
                reason: "reference table has no rows".to_string(),
            });
        }

        tracing::debug!(
            "Built family reference: {} families from {} rows",
            families.len(),
            row_count
        );

        Ok(Self { families })
    }

    pub fn from_table(table: &RawTable) -> Result<Self> {
        let family_idx = table.column_index("family")?;
        // 第一列只有一欄時 domain 欄位不存在，交由 build 回報該列格式錯誤
        let domain_idx = table.column_index("domain").ok();

        let rows = table.rows.iter().map(|row| {
            let family = cell(row, family_idx).unwrap_or_default();
            let domain = domain_idx.and_then(|i| cell(row, i)).unwrap_or_default();
            (family, domain)
        });

        Self::build(rows)
    }

    pub fn families(&self) -> impl Iterator<Item = &FamilyDefinition> {
        self.families.iter()
    }

    pub fn domains_of(&self, family: &str) -> Option<&BTreeSet<String>> {
        self.families
            .iter()
            .find(|f| f.name == family)
            .map(|f| &f.domains)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::REFERENCE_LAYOUT;

    #[test]
    fn test_build_groups_domains_in_first_appearance_order() {
        let reference = FamilyReference::build(vec![
            ("Zn_clus", "PF00172"),
            ("bHLH", "PF00010"),
            ("Zn_clus", "PF04082"),
            ("AP-2", "PF03299"),
        ])
        .unwrap();

        let names: Vec<&str> = reference.families().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Zn_clus", "bHLH", "AP-2"]);
        assert_eq!(reference.domains_of("Zn_clus").unwrap().len(), 2);
        assert_eq!(reference.len(), 3);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let reference =
            FamilyReference::build(vec![("bZIP_1", "PF00170"), ("bZIP_1", "PF00170")]).unwrap();
        assert_eq!(reference.domains_of("bZIP_1").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_fields_are_malformed() {
        let err = FamilyReference::build(vec![("bHLH", "PF00010"), ("", "PF00170")]).unwrap_err();
        assert!(matches!(err, EtlError::MalformedReferenceError { row: 2, .. }));

        let err = FamilyReference::build(vec![("bHLH", "  ")]).unwrap_err();
        assert!(matches!(err, EtlError::MalformedReferenceError { row: 1, .. }));
    }

    #[test]
    fn test_empty_reference_is_malformed() {
        let rows: Vec<(String, String)> = Vec::new();
        assert!(FamilyReference::build(rows).is_err());
    }

    #[test]
    fn test_from_table_reports_row_without_domain() {
        let data = b"Homeobox,PF00046\nTF_Otx\n";
        let table = RawTable::parse(data, &REFERENCE_LAYOUT).unwrap();

        let err = FamilyReference::from_table(&table).unwrap_err();
        assert!(matches!(err, EtlError::MalformedReferenceError { row: 2, .. }));
    }
}
