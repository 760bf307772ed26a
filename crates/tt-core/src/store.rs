use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::label::Label;
use crate::term::{NO_ORDER, Term, TermRecord};

/// Owns every term and its classification metadata.
///
/// Terms are created once from persisted records and never added or removed
/// afterward; only `label`, `order` and `related` mutate. Term strings are
/// unique and non-negative orders are pairwise distinct, so the term with the
/// maximum order is the single most recent classification.
pub struct TermStore {
    terms: Vec<Term>,
    index: HashMap<String, usize>,
}

impl TermStore {
    /// Build the store from persisted records, preserving their order.
    /// Fails on an unrecognized label or a duplicated term string.
    pub fn load(records: &[TermRecord]) -> Result<Self> {
        let mut terms = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for rec in records {
            let term = Term::from_record(rec)?;
            if index.insert(term.string.clone(), terms.len()).is_some() {
                return Err(CoreError::MalformedRecord(format!(
                    "duplicate term '{}'",
                    term.string
                )));
            }
            terms.push(term);
        }
        Ok(Self { terms, index })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, string: &str) -> Option<&Term> {
        self.index.get(string).map(|&i| &self.terms[i])
    }

    /// All terms in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Set label, order and related anchor on one term.
    pub fn classify(&mut self, string: &str, label: Label, order: i64, related: &str) -> Result<()> {
        let idx = *self
            .index
            .get(string)
            .ok_or_else(|| CoreError::UnknownTerm(string.to_string()))?;
        let term = &mut self.terms[idx];
        term.label = label;
        term.order = order;
        term.related = related.to_string();
        Ok(())
    }

    /// Highest order currently assigned, `NO_ORDER` when nothing is classified.
    pub fn last_classified_order(&self) -> i64 {
        self.terms
            .iter()
            .map(|t| t.order)
            .max()
            .unwrap_or(NO_ORDER)
            .max(NO_ORDER)
    }

    /// The most recently classified term — the sole undo target.
    pub fn last_classified(&self) -> Option<&Term> {
        self.terms
            .iter()
            .filter(|t| t.order >= 0)
            .max_by_key(|t| t.order)
    }

    pub fn count_classified(&self) -> usize {
        self.terms.iter().filter(|t| t.is_classified()).count()
    }

    pub fn count_by_label(&self, label: Label) -> usize {
        self.terms.iter().filter(|t| t.label == label).count()
    }

    /// Terms carrying `label`, in load order.
    pub fn terms_with_label(&self, label: Label) -> Vec<&Term> {
        self.terms.iter().filter(|t| t.label == label).collect()
    }

    /// Terms carrying `label`, sorted by classification order.
    pub fn terms_with_label_ordered(&self, label: Label) -> Vec<&Term> {
        let mut terms = self.terms_with_label(label);
        terms.sort_by_key(|t| t.order);
        terms
    }

    /// Serialization view of the whole store, in load order.
    pub fn records(&self) -> Vec<TermRecord> {
        self.terms.iter().map(Term::to_record).collect()
    }

    /// Discard all group/undo history: every order back to `NO_ORDER`,
    /// every related anchor cleared. Labels are untouched. Used when a
    /// review session targets a different label than the previous one.
    pub fn reset_history(&mut self) {
        for term in &mut self.terms {
            term.order = NO_ORDER;
            term.related.clear();
        }
    }
}
