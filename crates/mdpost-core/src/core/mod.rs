//! # Core Module
//!
//! Fundamental building blocks for LAMMPS output post-processing: the data
//! models for parsed simulation output, the text-format parsers that produce
//! them, and the numeric utilities applied downstream.
//!
//! ## Overview
//!
//! Everything in this module is stateless and synchronous. A parse reads a
//! whole file, yields an owned value plus a data-quality diagnostic (the
//! count of lines it had to skip), and never holds on to the source. The
//! submodules:
//!
//! - **Data Models** ([`models`]) - Thermo tables, spatial-profile blocks, and
//!   simulation-box geometry
//! - **File I/O** ([`io`]) - Parsers for the thermo log, `ave/time` block
//!   files, structural data files, and auxiliary series files
//! - **Numerics** ([`utils`]) - Tail statistics, normalization, interpolation,
//!   and log-log fitting

pub mod io;
pub mod models;
pub mod utils;
