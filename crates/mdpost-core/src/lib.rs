//! # mdpost Core Library
//!
//! Post-processing utilities for LAMMPS molecular-dynamics output. The library
//! turns the plain-text artifacts a simulation run leaves behind (the thermo
//! log, `ave/time` spatial profiles, the structural data file) into in-memory
//! numeric structures, derives simple statistics and normalizations from them,
//! and renders the conventional diagnostic figures.
//!
//! ## Architectural Philosophy
//!
//! The library is split into layers with a strict direction of dependency,
//! so each piece stays testable on its own:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ThermoTable`,
//!   `ProfileBlock`, `BoxDims`), the line-oriented parsers for the engine's
//!   text formats, and small numeric utilities. Parsers are best-effort:
//!   malformed rows are dropped and counted, never fatal.
//!
//! - **[`tracking`]: The Ledger.** The flat-text tracking report of past runs
//!   (name, box size, atom count, wall-clock cost). Modeled as an in-memory
//!   repository (`parse` / `upsert` / `render`) with file handling and the
//!   backup-before-rewrite safeguard kept at the edge.
//!
//! - **[`render`]: The Output Layer.** Plot generation on top of the parsed
//!   structures, producing the convergence, stress-profile, volume-fraction
//!   and performance figures as PNG files.
//!
//! - **[`layout`]: Path Conventions.** The file-naming conventions shared
//!   with the simulation workflow, captured in explicit structures that are
//!   injected into callers instead of being recomputed ad hoc.

pub mod core;
pub mod layout;
pub mod render;
pub mod tracking;
