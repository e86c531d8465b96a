//! cxxapi: canonical C++ API snapshots.
//!
//! Declaration records (one per class, namespace, function, ...) are fed into
//! a [`Snapshot`] in any order. Finishing it qualifies every name against the
//! scope tree, and the result renders as a stable, diffable text document:
//!
//! ```text
//! records ──ingest──▶ Snapshot ──finish──▶ ApiSnapshot ──render──▶ text
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod member;
pub mod natural;
pub mod record;
pub mod scope;
pub mod snapshot;
pub mod template;

pub use config::SnapshotConfig;
pub use error::SnapshotError;
pub use record::Record;
pub use snapshot::{ApiSnapshot, Snapshot};

/// Ingest every record and finish the snapshot.
pub fn build_snapshot<I>(records: I) -> Result<ApiSnapshot, SnapshotError>
where
    I: IntoIterator<Item = Record>,
{
    let mut snapshot = Snapshot::new();
    ingest::ingest(&mut snapshot, records)?;
    snapshot.finish()
}
