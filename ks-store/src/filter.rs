use std::collections::HashSet;

use ks_core::prelude::*;

// Namespace allow-list.  An empty list means "everything"; cluster-scoped kinds are never filtered.
#[derive(Clone, Debug, Default)]
pub struct NamespaceFilter {
    allowed: HashSet<String>,
}

impl NamespaceFilter {
    pub fn new(namespaces: impl IntoIterator<Item = String>) -> NamespaceFilter {
        NamespaceFilter { allowed: namespaces.into_iter().collect() }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn admits(&self, kind: ResourceKind, obj: &DynamicObject) -> bool {
        if !kind.is_namespaced() || self.is_unrestricted() {
            return true;
        }

        obj.metadata.namespace.as_ref().is_some_and(|ns| self.allowed.contains(ns))
    }
}
