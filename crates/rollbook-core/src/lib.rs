pub mod codec;
pub mod error;
pub mod record;
pub mod stats;
pub mod store;

#[cfg(test)]
mod test_util;

pub use codec::{load, quick_save, save, IssueKind, LineIssue, LoadReport};
pub use error::{InvalidRecord, StoreError};
pub use record::{Record, Status};
pub use stats::Statistics;
pub use store::{RecordStore, SortOrder};
