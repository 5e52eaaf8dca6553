//! The flat-text tracking report of past simulation runs.
//!
//! A single ledger file records one line per run (name, box size, mobile
//! atom count, wall-clock cost), kept sorted ascending by wall time so the
//! report reads in performance order. The in-memory repository
//! ([`store::TrackingLedger`]) is pure parse/upsert/render; the on-disk
//! wrapper ([`store::TrackingFile`]) adds whole-file rewrite with a
//! `_backup` sibling copy as the only durability safeguard.

pub mod entry;
pub mod store;
