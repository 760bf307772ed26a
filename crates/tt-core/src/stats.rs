use serde::Serialize;

use crate::label::Label;
use crate::store::TermStore;

/// Aggregate counts shown beside the work queue after every action.
#[derive(Clone, Debug, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub keywords: usize,
    pub relevant: usize,
    pub noise: usize,
    pub not_relevant: usize,
    pub postponed: usize,
    pub related_count: i64,
}

/// 100 * num / den, 0 when den is 0.
fn percent(num: usize, den: usize) -> f64 {
    if den > 0 {
        100.0 * num as f64 / den as f64
    } else {
        0.0
    }
}

impl Stats {
    pub fn collect(store: &TermStore, related_count: i64) -> Self {
        Self {
            total: store.len(),
            completed: store.count_classified(),
            keywords: store.count_by_label(Label::Keyword),
            relevant: store.count_by_label(Label::Relevant),
            noise: store.count_by_label(Label::Noise),
            not_relevant: store.count_by_label(Label::NotRelevant),
            postponed: store.count_by_label(Label::Postponed),
            related_count: related_count.max(0),
        }
    }

    /// Formatted panel lines: totals, then each label as a share of the
    /// completed terms.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total terms:  {:7}", self.total),
            format!(
                "Completed:    {:7} ({:6.2}%)",
                self.completed,
                percent(self.completed, self.total)
            ),
            format!(
                "Keywords:     {:7} ({:6.2}%)",
                self.keywords,
                percent(self.keywords, self.completed)
            ),
            format!(
                "Relevant:     {:7} ({:6.2}%)",
                self.relevant,
                percent(self.relevant, self.completed)
            ),
            format!(
                "Noise:        {:7} ({:6.2}%)",
                self.noise,
                percent(self.noise, self.completed)
            ),
            format!(
                "Not relevant: {:7} ({:6.2}%)",
                self.not_relevant,
                percent(self.not_relevant, self.completed)
            ),
            format!(
                "Postponed:    {:7} ({:6.2}%)",
                self.postponed,
                percent(self.postponed, self.completed)
            ),
            format!("Related:      {:7}", self.related_count),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermRecord;

    fn store() -> TermStore {
        let records: Vec<TermRecord> = ["a", "b", "c", "d"]
            .iter()
            .map(|s| TermRecord::new(s))
            .collect();
        TermStore::load(&records).unwrap()
    }

    #[test]
    fn test_empty_store_has_zero_percentages() {
        let stats = Stats::collect(&TermStore::load(&[]).unwrap(), 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed, 0);
        // no division-by-zero panic, all lines render
        assert_eq!(stats.lines().len(), 8);
    }

    #[test]
    fn test_counts_and_percentages() {
        let mut s = store();
        s.classify("a", Label::Keyword, 0, "").unwrap();
        s.classify("b", Label::Noise, 1, "").unwrap();

        let stats = Stats::collect(&s, 3);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.keywords, 1);
        assert_eq!(stats.noise, 1);
        assert_eq!(stats.related_count, 3);

        let lines = stats.lines();
        assert!(lines[1].contains("( 50.00%)"), "got: {}", lines[1]);
        assert!(lines[2].contains("( 50.00%)"), "got: {}", lines[2]);
    }

    #[test]
    fn test_negative_related_count_clamped() {
        let stats = Stats::collect(&store(), -1);
        assert_eq!(stats.related_count, 0);
    }

    #[test]
    fn test_serializes_to_json() {
        let stats = Stats::collect(&store(), 0);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total\":4"));
    }
}
