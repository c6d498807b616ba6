//! # hpc_cloud
//!
//! Cloud provider precondition queries for blueprint validation.
//!
//! Blueprints name projects, regions and zones that must exist before a
//! deployment can succeed. This crate answers those existence questions:
//!
//! - [`CloudQueries`]: the query seam the validation engine depends on
//! - [`GcpClient`]: live lookups against the Google Cloud APIs
//! - [`InMemoryCloud`]: answers from a static inventory, capturing every call
//!
//! ## Example
//!
//! ```rust,no_run
//! use hpc_cloud::{CloudQueries, GcpClient, GcpClientConfig};
//!
//! let client = GcpClient::new(GcpClientConfig::from_env().unwrap());
//! client.zone_in_region("my-proj", "us-central1-a", "us-central1").unwrap();
//! ```

pub mod error;
pub mod gcp;
pub mod inventory;
pub mod queries;

pub use error::{CloudError, CloudResult};
pub use gcp::{GcpClient, GcpClientConfig, ACCESS_TOKEN_ENV};
pub use inventory::{CapturedQuery, CloudInventory, InMemoryCloud, ProjectInventory};
pub use queries::CloudQueries;
