//! Semantic model of a Fortran program.
//!
//! This module provides:
//! - The scope tree with per-scope symbol tables, host association and
//!   `IMPORT` rules
//! - Type representations for declared entities
//! - Deferred bound, type parameter and initializer expressions
//! - The resolver pass that fills those in once every scope exists
//!
//! A compilation builds its scopes into a `SemanticsContext`, then calls
//! `resolve_symbol_exprs` exactly once.

pub mod context;
pub mod lazy_expr;
pub mod resolve;
pub mod scope;
pub mod symbol;
pub mod types;
