//! Per-compilation state shared by the scope tree builder, the analyzer
//! and the resolver.

use serde::{Deserialize, Serialize};

use crate::errors::errors::{Error, Messages};

use super::scope::{ScopeId, ScopeTree};

/// Default kinds used when analyzing literals and folding intrinsics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticsConfig {
    pub default_integer_kind: i32,
    pub default_real_kind: i32,
    pub default_logical_kind: i32,
    pub default_character_kind: i32,
}

impl SemanticsConfig {
    pub fn new() -> Self {
        Self {
            default_integer_kind: 4,
            default_real_kind: 4,
            default_logical_kind: 4,
            default_character_kind: 1,
        }
    }

    /// Set the kind of integer literals without a kind suffix
    pub fn with_default_integer_kind(mut self, kind: i32) -> Self {
        self.default_integer_kind = kind;
        self
    }

    /// Set the kind of real literals without a kind suffix or `d` exponent
    pub fn with_default_real_kind(mut self, kind: i32) -> Self {
        self.default_real_kind = kind;
        self
    }
}

impl Default for SemanticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one compilation's semantic analysis owns.
#[derive(Debug, Default)]
pub struct SemanticsContext {
    pub config: SemanticsConfig,
    pub tree: ScopeTree,
    pub messages: Messages,
}

impl SemanticsContext {
    pub fn new(config: SemanticsConfig) -> Self {
        SemanticsContext {
            config,
            tree: ScopeTree::new(),
            messages: Messages::new(),
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        self.tree.global_scope()
    }

    pub fn say(&mut self, error: Error) {
        self.messages.say(error);
    }
}
