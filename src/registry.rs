use std::collections::HashMap;
use std::sync::Arc;

use crate::{injection::Injection, token::Token};

/// Token to injection bindings.
///
/// Insert-or-overwrite semantics: re-preparing a token replaces its injection.
/// Injections are shared behind `Arc`s so that cached plans keep delivering
/// with the injection they were built against even after a replacement.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<Token, Arc<Injection>>,
}

impl Registry {
    pub fn insert(&mut self, token: Token, injection: Injection) {
        tracing::debug!(token = %token, "prepared injection");
        self.entries.insert(token, Arc::new(injection));
    }

    pub fn get(&self, token: &Token) -> Option<&Arc<Injection>> {
        self.entries.get(token)
    }

    /// Independent copy of the current bindings.
    ///
    /// The copy is shallow: both registries share the injection objects that
    /// exist right now, but insertions on either side stay invisible to the
    /// other.
    pub fn branch(&self) -> Registry {
        Registry {
            entries: self.entries.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
