//! Interactive term-classification engine.
//!
//! Triages a corpus vocabulary into keyword/relevant/noise/not-relevant/
//! postponed buckets. After every decision the work queue is reordered so
//! terms sharing a token with the just-decided term surface first, and the
//! monotonic classification order doubles as the undo log.
//!
//! Zero I/O — pure data model with no opinions about persistence or
//! rendering.

pub mod error;
pub mod label;
pub mod session;
pub mod stats;
pub mod store;
pub mod term;

pub use error::{CoreError, Result};
pub use label::{Label, TERMINAL_LABELS};
pub use session::{Outcome, Session, shares_token};
pub use stats::Stats;
pub use store::TermStore;
pub use term::{NO_ORDER, Term, TermRecord};
