//! Durable progress storage
//!
//! Features:
//! - Versioned JSON-lines records
//! - Append-only writes, synced to disk
//! - Corrupt or foreign records are skipped on load

pub mod ledger;

pub use ledger::{FileLedger, LEDGER_FILE_NAME};
