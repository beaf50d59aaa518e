//! The fixed record schema extracted from each clinical-trial document
//!
//! Field names match the keys historically used in the search index, so a
//! reindex over the same corpus is a drop-in replacement.

use serde::{Deserialize, Serialize};

/// One normalized clinical-trial record.
///
/// Every field is independently optional: a missing node in the source
/// document yields `None` for that field without affecting any other field.
/// Serialization preserves declaration order, so the indexed document keeps
/// a stable field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Registry identifier, e.g. "NCT00530764" (`id_info/nct_id`)
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
    pub brief_summary: Option<String>,
    pub detailed_description: Option<String>,
    pub overall_status: Option<String>,
    /// First `condition` node only; additional conditions are covered by
    /// `mesh_term`
    pub condition: Option<String>,
    /// Free-text eligibility criteria (`eligibility/criteria/textblock`)
    pub eligibility: Option<String>,
    pub gender: Option<String>,
    pub gender_based: Option<String>,
    /// Parsed minimum age in years. `None` means the node was absent;
    /// an unparsable value is reported as the documented default instead.
    pub minimum_age: Option<u32>,
    /// Parsed maximum age in years, same absent-vs-default policy.
    pub maximum_age: Option<u32>,
    /// Always present once the document parses; empty when the document
    /// carries no keywords
    pub keyword: Option<Vec<String>>,
    /// Absent when the document has no `condition_browse` section
    pub mesh_term: Option<Vec<String>>,
}

impl StudyRecord {
    /// A record with every field absent
    pub fn empty() -> Self {
        Self {
            nct_id: None,
            brief_title: None,
            brief_summary: None,
            detailed_description: None,
            overall_status: None,
            condition: None,
            eligibility: None,
            gender: None,
            gender_based: None,
            minimum_age: None,
            maximum_age: None,
            keyword: None,
            mesh_term: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_serializes_all_fields_as_null() {
        let json = serde_json::to_value(StudyRecord::empty()).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 13);
        assert!(map.values().all(|v| v.is_null()));
    }

    #[test]
    fn test_field_order_is_stable() {
        let json = serde_json::to_string(&StudyRecord::empty()).unwrap();
        let nct = json.find("nct_id").unwrap();
        let status = json.find("overall_status").unwrap();
        let mesh = json.find("mesh_term").unwrap();
        assert!(nct < status && status < mesh);
    }

    #[test]
    fn test_roundtrip() {
        let record = StudyRecord {
            nct_id: Some("NCT00000001".to_string()),
            minimum_age: Some(18),
            keyword: Some(vec!["asthma".to_string()]),
            ..StudyRecord::empty()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: StudyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
