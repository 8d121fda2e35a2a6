//! Capability tokens for catalog access.
//!
//! Operations that touch the catalog take an [`AccessGrant`] instead of
//! consulting process-wide permission state. A grant is obtained from
//! [`CatalogClient::request_access`](crate::catalog::CatalogClient::request_access)
//! and is passed explicitly to the import pipeline and the dumper.

use serde::{Deserialize, Serialize};

/// Level of access requested from a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Query items and playlists.
    Read,
    /// Query and create playlists and memberships.
    ReadWrite,
}

/// Proof that a catalog granted access at a given level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    access: Access,
}

impl AccessGrant {
    /// Issue a grant. Meant for [`CatalogClient`](crate::catalog::CatalogClient)
    /// implementations after they have checked the underlying store.
    pub fn issue(access: Access) -> Self {
        Self { access }
    }

    /// The granted level.
    pub fn access(&self) -> Access {
        self.access
    }

    pub fn can_write(&self) -> bool {
        self.access == Access::ReadWrite
    }
}
