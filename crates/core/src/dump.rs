//! Catalog dump: every music path, one per line, in ascending order.

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::access::AccessGrant;
use crate::catalog::{CatalogClient, CatalogError};

/// Errors while dumping the catalog.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the paths of all music items to a line-oriented sink.
pub struct CatalogDumper {
    catalog: Arc<dyn CatalogClient>,
}

impl CatalogDumper {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Write every music item's path to `sink`, one per line, sorted by path.
    ///
    /// Returns the number of lines written. An empty catalog writes nothing.
    /// The sink is flushed but not closed.
    ///
    /// The grant is not checked here: every level permits reading, and a
    /// grant only exists once a catalog has issued one. It is taken so that
    /// callers cannot dump without first requesting access.
    ///
    /// Paths containing a line break are written unchanged and logged at
    /// warn level, since they do not survive a re-import.
    pub fn dump_all<W: Write>(
        &self,
        grant: &AccessGrant,
        mut sink: W,
    ) -> Result<usize, DumpError> {
        debug!("Dumping catalog with {:?} access", grant.access());
        let items = self.catalog.list_music_items_ordered_by_path()?;
        for item in &items {
            if breaks_line(&item.path) {
                warn!(
                    "Catalog path {:?} (id {}) contains a line break and will not re-import",
                    item.path, item.id
                );
            }
            writeln!(sink, "{}", item.path)?;
        }
        sink.flush()?;

        info!("Dumped {} catalog entries", items.len());
        Ok(items.len())
    }
}

fn breaks_line(path: &str) -> bool {
    path.contains(['\n', '\r'])
}
