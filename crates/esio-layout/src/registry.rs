//! Tag-indexed table of available layout strategies.

use std::collections::BTreeMap;
use std::sync::Arc;

use esio_core::{sanity, EsioResult};

use crate::layout0::Layout0;
use crate::strategy::LayoutStrategy;

/// Maps a dataset's stamped `layout_tag` to the strategy that knows how to
/// pack and unpack it. Registered once per process; [`LayoutRegistry::len`]
/// is the `registry_size` bound a metadata block's `layout_tag` must fall
/// under.
pub struct LayoutRegistry {
    strategies: BTreeMap<u32, Arc<dyn LayoutStrategy>>,
}

impl LayoutRegistry {
    /// A registry carrying every layout this crate ships — currently just
    /// Layout 0.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };
        registry.register(Arc::new(Layout0::new()));
        registry
    }

    pub fn register(&mut self, strategy: Arc<dyn LayoutStrategy>) {
        self.strategies.insert(strategy.tag(), strategy);
    }

    pub fn get(&self, tag: u32) -> EsioResult<Arc<dyn LayoutStrategy>> {
        self.strategies
            .get(&tag)
            .cloned()
            .ok_or_else(|| sanity(format!("unknown layout tag {tag}")))
    }

    pub fn len(&self) -> u32 {
        self.strategies.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
