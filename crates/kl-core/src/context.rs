//! Build-on-first-use configuration snapshots.
//!
//! [`ConfigContext`] owns the layered sources and a lazily built immutable
//! snapshot of the merged table. The first `current` call loads and caches;
//! `invalidate` discards the snapshot so the next access reloads from disk.
//! The snapshot is an `Arc` swapped whole under a lock, so a reader never
//! observes a partially built table even if the process grows threads.

use crate::resolve::ConfigSources;
use crate::table::ConfigTable;
use kl_common::Result;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A configuration handle with an explicit load/invalidate lifecycle.
pub struct ConfigContext {
    sources: ConfigSources,
    active: RwLock<Option<Arc<ConfigTable>>>,
}

impl ConfigContext {
    pub fn new(sources: ConfigSources) -> Self {
        Self {
            sources,
            active: RwLock::new(None),
        }
    }

    /// The sources this context builds from.
    pub fn sources(&self) -> &ConfigSources {
        &self.sources
    }

    /// The current snapshot, building it on first use.
    pub fn current(&self) -> Result<Arc<ConfigTable>> {
        if let Some(table) = self
            .active
            .read()
            .expect("configuration lock poisoned")
            .as_ref()
        {
            return Ok(Arc::clone(table));
        }
        self.rebuild()
    }

    /// Discard the cached snapshot; the next `current` reloads.
    pub fn invalidate(&self) {
        debug!("configuration snapshot invalidated");
        *self.active.write().expect("configuration lock poisoned") = None;
    }

    /// Invalidate and rebuild immediately.
    pub fn refresh(&self) -> Result<Arc<ConfigTable>> {
        self.invalidate();
        self.rebuild()
    }

    fn rebuild(&self) -> Result<Arc<ConfigTable>> {
        let table = Arc::new(self.sources.load_default()?);
        *self.active.write().expect("configuration lock poisoned") = Some(Arc::clone(&table));
        Ok(table)
    }
}
