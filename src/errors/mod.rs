//! Error types and error handling for the analyzer.
//!
//! This module defines the user-facing diagnostics produced while building
//! and resolving the scope tree. It includes:
//!
//! - Error structures with source position and severity
//! - Specific error variants for each analysis phase
//! - The Fortran constraint number a diagnostic enforces
//! - The `Messages` sink diagnostics are emitted into
//!
//! Internal invariant violations are not errors; see `CHECK!`.

pub mod errors;
