use crate::error::Result;
use crate::label::Label;
use crate::store::TermStore;
use crate::term::{NO_ORDER, Term};

/// True when some whitespace token of `key` equals a token of `term`.
///
/// Whole-token matching: "open source software" relates to the key "source"
/// but not to "sour", and the multi-word anchor "neural networks" relates to
/// "networks topology" through the shared token.
pub fn shares_token(term: &str, key: &str) -> bool {
    key.split_whitespace()
        .any(|k| term.split_whitespace().any(|w| w == k))
}

/// What a session action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Classified,
    Postponed,
    Undone,
    /// Nothing to act on: empty queue or empty history. State unchanged.
    NoOp,
}

/// Drives the classify/postpone/undo protocol over a store it owns for its
/// whole lifetime.
///
/// After each action the session recomputes the work queue so terms sharing a
/// token with the just-decided term surface first. `related_count` is the
/// number of terms remaining in the active group, including the head of the
/// queue; when it reaches zero the anchor is cleared and the next classified
/// term seeds a fresh group.
pub struct Session {
    store: TermStore,
    review: Label,
    queue: Vec<String>,
    anchor: String,
    related_count: i64,
}

fn eligible<'a>(store: &'a TermStore, review: Label) -> impl Iterator<Item = &'a Term> {
    store
        .iter()
        .filter(move |t| t.label == review && t.order == NO_ORDER)
}

/// Split the eligible terms into (containing, not containing) around `key`,
/// preserving load order within each half.
fn partition(store: &TermStore, review: Label, key: &str) -> (Vec<String>, Vec<String>) {
    let mut containing = Vec::new();
    let mut not_containing = Vec::new();
    for term in eligible(store, review) {
        if shares_token(&term.string, key) {
            containing.push(term.string.clone());
        } else {
            not_containing.push(term.string.clone());
        }
    }
    (containing, not_containing)
}

impl Session {
    /// Open a session, resuming group state from the store's most recent
    /// classification if there is one.
    pub fn new(store: TermStore, review: Label) -> Self {
        let resume = store
            .last_classified()
            .map(|t| (t.string.clone(), t.related.clone()));

        let mut session = match resume {
            None => {
                let queue = eligible(&store, review).map(|t| t.string.clone()).collect();
                Session {
                    store,
                    review,
                    queue,
                    anchor: String::new(),
                    related_count: 0,
                }
            }
            Some((string, related)) => {
                let anchor = if related.is_empty() { string } else { related };
                let (containing, not_containing) = partition(&store, review, &anchor);
                let related_count = containing.len() as i64;
                let queue = containing.into_iter().chain(not_containing).collect();
                Session {
                    store,
                    review,
                    queue,
                    anchor,
                    related_count,
                }
            }
        };
        session.close_group_if_empty();
        session
    }

    /// The term the annotator is looking at.
    pub fn current(&self) -> Option<&str> {
        self.queue.first().map(String::as_str)
    }

    /// Remaining work queue, current term first.
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// Anchor string of the active group, empty when no group is active.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn related_count(&self) -> i64 {
        self.related_count
    }

    pub fn review(&self) -> Label {
        self.review
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    pub fn into_store(self) -> TermStore {
        self.store
    }

    /// Classify the current term under a terminal label.
    ///
    /// When no group is active the term seeds one: it becomes the anchor
    /// (recording itself as its own `related`) and every eligible term
    /// sharing one of its tokens is queued right behind it.
    pub fn classify(&mut self, label: Label) -> Result<Outcome> {
        let Some(term) = self.queue.first().cloned() else {
            return Ok(Outcome::NoOp);
        };

        let order = self.store.last_classified_order() + 1;
        let seeding = self.related_count <= 0;
        let anchor = if seeding {
            term.clone()
        } else {
            self.anchor.clone()
        };

        self.store.classify(&term, label, order, &anchor)?;
        self.anchor = anchor;

        let (containing, not_containing) = partition(&self.store, self.review, &self.anchor);
        if seeding {
            // +1 counts the seed itself as the first member of its group
            self.related_count = containing.len() as i64 + 1;
        }
        self.related_count -= 1;
        self.queue = containing.into_iter().chain(not_containing).collect();

        self.close_group_if_empty();
        Ok(Outcome::Classified)
    }

    /// Postpone the current term. Same order bookkeeping as classify, but a
    /// postpone never seeds a group; once the group is exhausted the queue
    /// falls back to every eligible term with no anchor filtering.
    pub fn postpone(&mut self) -> Result<Outcome> {
        let Some(term) = self.queue.first().cloned() else {
            return Ok(Outcome::NoOp);
        };

        let order = self.store.last_classified_order() + 1;
        let anchor = self.anchor.clone();
        self.store.classify(&term, Label::Postponed, order, &anchor)?;

        self.related_count -= 1;
        if self.related_count > 0 {
            let (containing, not_containing) = partition(&self.store, self.review, &self.anchor);
            self.queue = containing.into_iter().chain(not_containing).collect();
        } else {
            self.queue = eligible(&self.store, self.review)
                .map(|t| t.string.clone())
                .collect();
        }

        self.close_group_if_empty();
        Ok(Outcome::Postponed)
    }

    /// Invert the most recent classify/postpone, restoring group state.
    ///
    /// If the undone term belonged to the group that is still active it is
    /// pushed back to the queue front and the group grows by one. If it
    /// belonged to an already-closed group, that group is reactivated from
    /// the term's recorded anchor.
    pub fn undo(&mut self) -> Result<Outcome> {
        let Some((last_string, last_related)) = self
            .store
            .last_classified()
            .map(|t| (t.string.clone(), t.related.clone()))
        else {
            return Ok(Outcome::NoOp);
        };

        // back to the review pool, with no anchor
        self.store
            .classify(&last_string, self.review, NO_ORDER, "")?;

        if last_related == self.anchor {
            self.queue.insert(0, last_string);
            self.related_count += 1;
        } else {
            self.anchor = last_related;
            let (containing, not_containing) = partition(&self.store, self.review, &self.anchor);
            self.related_count = containing.len() as i64;
            self.queue = containing.into_iter().chain(not_containing).collect();
        }

        if self.anchor.is_empty() {
            // an empty anchor can never have real members
            self.related_count = 0;
        }
        self.close_group_if_empty();
        Ok(Outcome::Undone)
    }

    /// A group with no remaining members is not a group: clear the anchor and
    /// clamp the count so the next classification seeds afresh.
    fn close_group_if_empty(&mut self) {
        if self.related_count <= 0 {
            self.related_count = 0;
            self.anchor.clear();
        }
    }
}
