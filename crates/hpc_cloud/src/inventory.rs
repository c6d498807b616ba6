//! In-memory cloud inventory.
//!
//! Answers the precondition queries from a static description of projects,
//! regions and zones instead of a live API. Useful for offline runs and for
//! tests, which can inspect every query that was made.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CloudError, CloudResult};
use crate::queries::CloudQueries;

/// Static description of visible cloud state.
///
/// ```yaml
/// projects:
///   my-proj:
///     regions:
///       us-central1: [us-central1-a, us-central1-b]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudInventory {
    #[serde(default)]
    pub projects: HashMap<String, ProjectInventory>,
}

/// Regions of one project, each mapped to its zones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInventory {
    #[serde(default)]
    pub regions: HashMap<String, Vec<String>>,
}

impl CloudInventory {
    pub fn from_yaml_str(content: &str) -> CloudResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> CloudResult<Self> {
        debug!("Loading cloud inventory from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// A query made against an [`InMemoryCloud`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedQuery {
    pub method: String,
    pub args: Vec<String>,
}

/// Precondition queries answered from a [`CloudInventory`].
#[derive(Clone, Default)]
pub struct InMemoryCloud {
    inventory: Arc<RwLock<CloudInventory>>,
    captured_calls: Arc<RwLock<Vec<CapturedQuery>>>,
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_inventory(inventory: CloudInventory) -> Self {
        Self {
            inventory: Arc::new(RwLock::new(inventory)),
            ..Self::default()
        }
    }

    /// Add an empty project.
    pub fn with_project(self, project_id: impl Into<String>) -> Self {
        self.inventory
            .write()
            .projects
            .entry(project_id.into())
            .or_default();
        self
    }

    /// Add a region (and its project, if new).
    pub fn with_region(self, project_id: impl Into<String>, region: impl Into<String>) -> Self {
        self.inventory
            .write()
            .projects
            .entry(project_id.into())
            .or_default()
            .regions
            .entry(region.into())
            .or_default();
        self
    }

    /// Add a zone to a region (creating both as needed).
    pub fn with_zone(
        self,
        project_id: impl Into<String>,
        region: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        self.inventory
            .write()
            .projects
            .entry(project_id.into())
            .or_default()
            .regions
            .entry(region.into())
            .or_default()
            .push(zone.into());
        self
    }

    /// Make every query fail with `message`.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    pub fn get_calls(&self) -> Vec<CapturedQuery> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.captured_calls.read().iter().any(|c| c.method == method)
    }

    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    fn record_call(&self, method: &str, args: &[&str]) -> CloudResult<()> {
        self.captured_calls.write().push(CapturedQuery {
            method: method.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(CloudError::QueryFailed(msg));
        }
        Ok(())
    }

    fn region_of_zone(&self, project_id: &str, zone: &str) -> Option<String> {
        let inventory = self.inventory.read();
        inventory.projects.get(project_id).and_then(|project| {
            project
                .regions
                .iter()
                .find(|(_, zones)| zones.iter().any(|z| z == zone))
                .map(|(region, _)| region.clone())
        })
    }

    fn has_region(&self, project_id: &str, region: &str) -> bool {
        self.inventory
            .read()
            .projects
            .get(project_id)
            .map_or(false, |p| p.regions.contains_key(region))
    }
}

impl CloudQueries for InMemoryCloud {
    fn project_exists(&self, project_id: &str) -> CloudResult<()> {
        self.record_call("project_exists", &[project_id])?;
        if self.inventory.read().projects.contains_key(project_id) {
            Ok(())
        } else {
            Err(CloudError::ProjectNotFound(project_id.to_string()))
        }
    }

    fn region_exists(&self, project_id: &str, region: &str) -> CloudResult<()> {
        self.record_call("region_exists", &[project_id, region])?;
        if self.has_region(project_id, region) {
            Ok(())
        } else {
            Err(CloudError::RegionNotFound {
                project: project_id.to_string(),
                region: region.to_string(),
            })
        }
    }

    fn zone_exists(&self, project_id: &str, zone: &str) -> CloudResult<()> {
        self.record_call("zone_exists", &[project_id, zone])?;
        match self.region_of_zone(project_id, zone) {
            Some(_) => Ok(()),
            None => Err(CloudError::ZoneNotFound {
                project: project_id.to_string(),
                zone: zone.to_string(),
            }),
        }
    }

    fn zone_in_region(&self, project_id: &str, zone: &str, region: &str) -> CloudResult<()> {
        self.record_call("zone_in_region", &[project_id, zone, region])?;
        if !self.has_region(project_id, region) {
            return Err(CloudError::RegionNotFound {
                project: project_id.to_string(),
                region: region.to_string(),
            });
        }
        match self.region_of_zone(project_id, zone) {
            None => Err(CloudError::ZoneNotFound {
                project: project_id.to_string(),
                zone: zone.to_string(),
            }),
            Some(found) if found != region => Err(CloudError::ZoneNotInRegion {
                project: project_id.to_string(),
                zone: zone.to_string(),
                region: region.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }
}
