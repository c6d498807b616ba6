//! Integration tests for the file-backed cloud inventory.

use std::fs;

use hpc_cloud::{CloudError, CloudInventory, CloudQueries, InMemoryCloud};
use tempfile::tempdir;

const INVENTORY: &str = r#"
projects:
  hpc-prod:
    regions:
      us-central1: [us-central1-a, us-central1-c]
      europe-west4: [europe-west4-a]
  hpc-empty: {}
"#;

fn load() -> InMemoryCloud {
    let temp = tempdir().unwrap();
    let path = temp.path().join("inventory.yaml");
    fs::write(&path, INVENTORY).unwrap();
    InMemoryCloud::from_inventory(CloudInventory::from_path(&path).unwrap())
}

#[test]
fn test_queries_through_trait_object() {
    let cloud = load();
    let queries: &dyn CloudQueries = &cloud;

    assert!(queries.project_exists("hpc-prod").is_ok());
    assert!(queries.region_exists("hpc-prod", "europe-west4").is_ok());
    assert!(queries.zone_exists("hpc-prod", "us-central1-c").is_ok());
    assert!(queries
        .zone_in_region("hpc-prod", "europe-west4-a", "europe-west4")
        .is_ok());
    assert_eq!(cloud.call_count(), 4);
}

#[test]
fn test_project_without_regions() {
    let cloud = load();

    assert!(cloud.project_exists("hpc-empty").is_ok());
    let err = cloud.region_exists("hpc-empty", "us-central1").unwrap_err();
    assert!(matches!(err, CloudError::RegionNotFound { .. }));
    let err = cloud.zone_exists("hpc-empty", "us-central1-a").unwrap_err();
    assert!(matches!(err, CloudError::ZoneNotFound { .. }));
}

#[test]
fn test_missing_inventory_file() {
    let temp = tempdir().unwrap();
    let err = CloudInventory::from_path(&temp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CloudError::Io(_)));
}

#[test]
fn test_malformed_inventory() {
    let err = CloudInventory::from_yaml_str("projects: [not, a, map]").unwrap_err();
    assert!(matches!(err, CloudError::Yaml(_)));
}
