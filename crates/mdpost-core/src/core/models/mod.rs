//! Data models for parsed simulation output.
//!
//! All types here are plain owned data, built once by a parser and read-only
//! afterward. Invariants (equal column lengths, dense row indices) are
//! enforced at construction time rather than through exposed mutation.

pub mod profile;
pub mod structure;
pub mod thermo;
