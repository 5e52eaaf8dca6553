//! Parsers for the plain-text formats a LAMMPS run leaves behind.
//!
//! All parsers follow the same contract: whole-file buffered reads over a
//! `BufRead`, best-effort row acceptance (a malformed line is dropped and
//! counted, never fatal), and a `load_*` path-level wrapper that treats a
//! missing file as a logged no-data condition rather than an error.

pub mod avetime;
pub mod datafile;
pub mod series;
pub mod thermo;
