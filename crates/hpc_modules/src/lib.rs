//! # hpc_modules
//!
//! Module metadata for blueprint validation.
//!
//! Every resource in a blueprint points at a module source. This crate knows
//! which module kinds exist and what each module accepts and produces:
//!
//! - **Kind registry**: the fixed set of recognised module kinds
//! - **Module metadata**: declared inputs (with their required flag) and outputs
//! - **Providers**: the `ModuleInfoProvider` seam, a static `ModuleCatalog`,
//!   and a loader that discovers `module.yaml` descriptors on disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use hpc_modules::{ModuleInfoProvider, ModuleLoader};
//!
//! let catalog = ModuleLoader::new("modules").load_all().unwrap();
//! let info = catalog.module_info("network/vpc", "terraform").unwrap();
//! println!("{} inputs", info.inputs.len());
//! ```

pub mod error;
pub mod info;
pub mod kind;
pub mod loader;
pub mod provider;

pub use error::{ModuleError, ModuleResult};
pub use info::{ModuleInfo, VarInfo};
pub use kind::{is_valid_kind, ModuleKind};
pub use loader::ModuleLoader;
pub use provider::{ModuleCatalog, ModuleInfoProvider};
