//! # hpc_config
//!
//! Blueprint model and validation engine.
//!
//! A blueprint declares global variables, the precondition validators to run
//! and groups of resources, each an instance of a module. Before a blueprint
//! is turned into deployable infrastructure it is validated in four stages:
//!
//! - **Variables**: no unset values, `labels` is a map
//! - **Validators**: projects, regions and zones exist in the target cloud,
//!   with failures ignored, reported or fatal depending on the validation level
//! - **Resources**: identity fields, module kind and declared outputs
//! - **Settings**: every setting is an input the module accepts
//!
//! ## Example
//!
//! ```rust,no_run
//! use hpc_cloud::{GcpClient, GcpClientConfig};
//! use hpc_config::{BlueprintConfig, ValidationContext};
//! use hpc_modules::ModuleLoader;
//!
//! let mut config = BlueprintConfig::from_path("hpc-cluster.yaml").unwrap();
//! let modules = ModuleLoader::new("modules").load_all().unwrap();
//! config.load_modules_info(&modules).unwrap();
//!
//! let cloud = GcpClient::new(GcpClientConfig::from_env().unwrap());
//! let report = config.validate(&ValidationContext::new(&cloud, &modules)).unwrap();
//! for warning in &report.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

pub mod blueprint;
pub mod dispatch;
pub mod error;
pub mod resolver;
pub mod structure;
pub mod validate;
pub mod validators;
pub mod vars;

pub use blueprint::{
    Blueprint, BlueprintConfig, ModulesInfoCache, Resource, ResourceGroup, ValidationLevel,
    ValidatorConfig,
};
pub use dispatch::{run_all, DispatchSummary, VALIDATION_GUIDANCE};
pub use error::{ConfigError, ConfigResult};
pub use resolver::{is_literal_variable, parse_literal_variable, Resolver};
pub use structure::{check_outputs, check_resource, check_settings};
pub use validate::{validate_vars, FailureMode, ValidationContext, ValidationReport, ValidationStage};
pub use validators::{check_inputs, lookup, CheckContext, PreconditionCheck, ValidatorKind};
pub use vars::{VarTable, VarValue};
