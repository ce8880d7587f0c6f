#![cfg_attr(coverage, feature(coverage_attribute))]
mod cache;
mod config;
mod filter;
mod manager;
mod watchers;

pub use crate::cache::{
    ObjectCache,
    ReflectorCache,
};
pub use crate::config::{
    CollectorConfig,
    ReplicaSetPolicy,
};
pub use crate::filter::NamespaceFilter;
pub use crate::manager::CacheManager;
pub use crate::watchers::CacheWatcher;

#[cfg(feature = "mock")]
pub mod mock {
    pub use crate::cache::MockObjectCache;
}

#[cfg(test)]
mod tests;
