//! Reconcile collection indexes against a declared plan.
//!
//! An index plan is a YAML document mapping collection slugs to the indexes
//! that should exist on them:
//!
//! ```yaml
//! collections:
//!   posts:
//!     - name: slug_locale
//!       unique: true
//!       keys:
//!         - field: slug
//!         - field: locale
//!   electricity-providers:
//!     - name: deleted_at
//!       keys:
//!         - field: deletedAt
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result, UnitFailure};
use crate::models::IndexSpec;
use crate::store::IndexManager;

/// Indexes that should exist, per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPlan {
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<IndexSpec>>,
}

impl IndexPlan {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid index plan: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&source)
    }

    /// Restrict the plan to one collection.
    pub fn only(mut self, collection: &str) -> Self {
        self.collections.retain(|name, _| name == collection);
        self
    }

    pub fn index_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Outcome of an index sync. Entries are `collection/index` keys.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    /// Indexes a dry run would create.
    pub planned: Vec<String>,
    pub failed: Vec<UnitFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create every planned index that does not already exist.
///
/// A collection whose index list cannot be read, or an index whose creation
/// fails, is recorded as a failure and the sync moves on. A create rejected
/// because the index already exists counts as existing.
pub async fn sync_indexes<M>(manager: &mut M, plan: &IndexPlan, dry_run: bool) -> SyncReport
where
    M: IndexManager + ?Sized,
{
    let mut report = SyncReport::default();

    for (collection, specs) in &plan.collections {
        let existing: HashSet<String> = match manager.list_indexes(collection).await {
            Ok(indexes) => indexes.into_iter().map(|i| i.name).collect(),
            Err(e) => {
                warn!(collection, error = %e, "Failed to list indexes");
                for spec in specs {
                    report
                        .failed
                        .push(UnitFailure::new(format!("{collection}/{}", spec.name), &e));
                }
                continue;
            }
        };
        debug!(collection, count = existing.len(), "Listed existing indexes");

        for spec in specs {
            let key = format!("{collection}/{}", spec.name);
            if existing.contains(&spec.name) {
                report.existing.push(key);
                continue;
            }
            if dry_run {
                report.planned.push(key);
                continue;
            }

            match manager.create_index(collection, spec).await {
                Ok(()) => {
                    info!(collection, index = %spec.name, "Created index");
                    report.created.push(key);
                }
                Err(e) if e.is_already_exists() => {
                    debug!(collection, index = %spec.name, "Index already exists");
                    report.existing.push(key);
                }
                Err(e) => {
                    warn!(collection, index = %spec.name, error = %e, "Failed to create index");
                    report.failed.push(UnitFailure::new(key, e));
                }
            }
        }
    }

    report
}
