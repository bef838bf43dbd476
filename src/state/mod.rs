//! Persistent state for the acquisition pipeline.
//!
//! Three small JSON documents live in the configured base directory:
//! - the download ledger (URLs already fetched, per asset class),
//! - the exclusion list (image stems never to classify),
//! - the daily-post history (downloaded URLs already featured).
//!
//! Each is read whole, mutated in memory, and rewritten whole through a
//! temp-file rename.

mod document;
pub mod error;
pub mod exclusion;
pub mod history;
pub mod ledger;

pub use error::StorageError;
pub use exclusion::ExclusionSet;
pub use history::PostHistory;
pub use ledger::Ledger;
