mod cache_watcher;

pub use self::cache_watcher::{
    CacheEventStream,
    CacheWatcher,
};
