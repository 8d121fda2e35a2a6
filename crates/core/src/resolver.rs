//! Resolution of playlist text lines to catalog items.
//!
//! Input lines are trimmed, blank lines and `#` comment lines are dropped, and
//! every remaining line is taken verbatim as an absolute path. Each path is
//! then looked up in the catalog; paths without a music item are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CatalogClient, CatalogError, ItemId};

/// Marker for comment lines in playlist text.
const COMMENT_PREFIX: char = '#';

/// How candidate paths are matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// One catalog query per candidate path.
    #[default]
    PerPath,
    /// List every music item once and match from memory.
    Prefetch,
}

/// Split playlist text into candidate paths, preserving input order.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Resolves candidate paths to catalog item ids.
pub struct PathResolver {
    catalog: Arc<dyn CatalogClient>,
    strategy: LookupStrategy,
}

impl PathResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>, strategy: LookupStrategy) -> Self {
        Self { catalog, strategy }
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    /// Resolve each path to the id of its music item.
    ///
    /// The returned ids follow the order of `paths`; unmatched paths are left
    /// out. A failing catalog query aborts resolution.
    pub fn resolve_all(&self, paths: &[String]) -> Result<Vec<ItemId>, CatalogError> {
        match self.strategy {
            LookupStrategy::PerPath => self.resolve_per_path(paths),
            LookupStrategy::Prefetch => self.resolve_prefetched(paths),
        }
    }

    fn resolve_per_path(&self, paths: &[String]) -> Result<Vec<ItemId>, CatalogError> {
        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            match self.catalog.find_item_id_by_path(path)? {
                Some(id) => ids.push(id),
                None => debug!("No catalog entry for {}", path),
            }
        }
        Ok(ids)
    }

    fn resolve_prefetched(&self, paths: &[String]) -> Result<Vec<ItemId>, CatalogError> {
        let items = self.catalog.list_music_items_ordered_by_path()?;
        debug!("Prefetched {} catalog items", items.len());

        // Lowest id wins for duplicated paths, same as a point lookup
        let mut by_path: HashMap<String, ItemId> = HashMap::with_capacity(items.len());
        for item in items {
            by_path
                .entry(item.path)
                .and_modify(|id| *id = (*id).min(item.id))
                .or_insert(item.id);
        }

        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            match by_path.get(path.as_str()) {
                Some(&id) => ids.push(id),
                None => debug!("No catalog entry for {}", path),
            }
        }
        Ok(ids)
    }
}
