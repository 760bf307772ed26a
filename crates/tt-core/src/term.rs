use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::label::Label;

/// Order value of a term that is not currently classified.
pub const NO_ORDER: i64 = -1;

/// One vocabulary entry under triage.
///
/// `order` is the classification sequence number: non-negative values are
/// unique among classified terms and strictly increase in the order decisions
/// were made, so the maximum order is always the sole undo target. `related`
/// is the anchor string that was active when this term was classified, empty
/// when no group was active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub string: String,
    pub label: Label,
    pub order: i64,
    pub related: String,
}

impl Term {
    pub fn from_record(rec: &TermRecord) -> Result<Self> {
        let label = Label::from_record_field(&rec.label).ok_or_else(|| {
            CoreError::MalformedRecord(format!(
                "unrecognized label '{}' for term '{}'",
                rec.label, rec.string
            ))
        })?;
        Ok(Self {
            string: rec.string.clone(),
            label,
            order: rec.order.unwrap_or(NO_ORDER),
            related: rec.related.clone(),
        })
    }

    pub fn to_record(&self) -> TermRecord {
        TermRecord {
            string: self.string.clone(),
            label: self.label.name().to_string(),
            order: (self.order >= 0).then_some(self.order),
            related: self.related.clone(),
        }
    }

    /// A term counts as classified once it carries any terminal label,
    /// whether or not its order survived a review reset.
    pub fn is_classified(&self) -> bool {
        self.label != Label::None
    }
}

/// Row shape exchanged with the storage layer. Label travels by name;
/// an absent order means "not classified" and `-1` always serializes back
/// to absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub string: String,
    pub label: String,
    pub order: Option<i64>,
    pub related: String,
}

impl TermRecord {
    pub fn new(string: &str) -> Self {
        Self {
            string: string.to_string(),
            label: String::new(),
            order: None,
            related: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_defaults() {
        let term = Term::from_record(&TermRecord::new("machine learning")).unwrap();
        assert_eq!(term.string, "machine learning");
        assert_eq!(term.label, Label::None);
        assert_eq!(term.order, NO_ORDER);
        assert_eq!(term.related, "");
        assert!(!term.is_classified());
    }

    #[test]
    fn test_from_record_rejects_unknown_label() {
        let rec = TermRecord {
            string: "x".to_string(),
            label: "banana".to_string(),
            order: None,
            related: String::new(),
        };
        assert!(matches!(
            Term::from_record(&rec),
            Err(CoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_from_record_accepts_key_form() {
        let rec = TermRecord {
            string: "x".to_string(),
            label: "k".to_string(),
            order: Some(3),
            related: "y".to_string(),
        };
        let term = Term::from_record(&rec).unwrap();
        assert_eq!(term.label, Label::Keyword);
        assert_eq!(term.order, 3);
    }

    #[test]
    fn test_unclassified_order_serializes_to_absent() {
        let mut term = Term::from_record(&TermRecord::new("x")).unwrap();
        term.label = Label::Noise;
        term.order = NO_ORDER;
        assert_eq!(term.to_record().order, None);
        assert_eq!(term.to_record().label, "noise");

        term.order = 0;
        assert_eq!(term.to_record().order, Some(0));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let rec = TermRecord {
            string: "deep learning".to_string(),
            label: "keyword".to_string(),
            order: Some(7),
            related: "learning".to_string(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: TermRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
