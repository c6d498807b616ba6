//! Top-level blueprint validation.
//!
//! Validation runs four stages in a fixed order and stops at the first stage
//! that fails:
//!
//! 1. global variables
//! 2. precondition validators (failures classified by the validation level)
//! 3. resource structure and declared outputs
//! 4. resource settings against module inputs
//!
//! Only the validator stage aggregates failures. The others stop at the
//! first bad entry; see [`ValidationStage::failure_mode`].

use std::fmt;

use tracing::{debug, info, warn};

use hpc_cloud::CloudQueries;
use hpc_modules::ModuleInfoProvider;

use crate::blueprint::BlueprintConfig;
use crate::dispatch::{run_all, DispatchSummary};
use crate::error::{ConfigError, ConfigResult};
use crate::resolver::Resolver;
use crate::structure::{check_outputs, check_resource, check_settings};
use crate::validators::CheckContext;
use crate::vars::{VarTable, VarValue};

/// How a stage reacts to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Evaluate every entry, then decide
    Aggregate,
    /// Return on the first failing entry
    FailFast,
}

/// The validation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Variables,
    Validators,
    Resources,
    Settings,
}

impl ValidationStage {
    pub const ORDER: [ValidationStage; 4] = [
        ValidationStage::Variables,
        ValidationStage::Validators,
        ValidationStage::Resources,
        ValidationStage::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStage::Variables => "variables",
            ValidationStage::Validators => "validators",
            ValidationStage::Resources => "resources",
            ValidationStage::Settings => "settings",
        }
    }

    pub fn failure_mode(&self) -> FailureMode {
        match self {
            ValidationStage::Validators => FailureMode::Aggregate,
            _ => FailureMode::FailFast,
        }
    }
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External collaborators used during validation.
pub struct ValidationContext<'a> {
    pub cloud: &'a dyn CloudQueries,
    pub modules: &'a dyn ModuleInfoProvider,
}

impl<'a> ValidationContext<'a> {
    pub fn new(cloud: &'a dyn CloudQueries, modules: &'a dyn ModuleInfoProvider) -> Self {
        Self { cloud, modules }
    }
}

/// Non-fatal findings of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub stages_passed: Vec<&'static str>,
    pub warnings: Vec<String>,
    pub validators_executed: usize,
}

/// Check the global variable table.
///
/// Returns the warnings it found; a missing `project_id` is only a warning.
pub fn validate_vars(vars: &VarTable) -> ConfigResult<Vec<String>> {
    let mut warnings = Vec::new();

    if !vars.contains_key("project_id") {
        warn!("No project_id in global variables");
        warnings.push("No project_id in global variables".to_string());
    }

    if let Some(labels) = vars.get("labels") {
        match labels {
            VarValue::Map(_) => {}
            VarValue::String(_) | VarValue::Null | VarValue::Other(_) => {
                return Err(ConfigError::LabelsNotMap);
            }
        }
    }

    if let Some((key, _)) = vars.iter().find(|(_, value)| value.is_null()) {
        return Err(ConfigError::NullVariable(key.clone()));
    }

    Ok(warnings)
}

impl BlueprintConfig {
    /// Run every validation stage in order.
    ///
    /// The first failing stage ends validation; callers should not use a
    /// blueprint that failed.
    pub fn validate(&self, ctx: &ValidationContext<'_>) -> ConfigResult<ValidationReport> {
        info!("Validating blueprint {}", self.config.blueprint_name);
        let mut report = ValidationReport::default();

        for stage in ValidationStage::ORDER {
            debug!("Running {} stage ({:?})", stage, stage.failure_mode());
            match stage {
                ValidationStage::Variables => {
                    report.warnings.extend(self.validate_vars()?);
                }
                ValidationStage::Validators => {
                    let summary = self.execute_validators(ctx.cloud)?;
                    report.validators_executed = summary.executed;
                    report.warnings.extend(summary.warnings);
                }
                ValidationStage::Resources => self.validate_resources()?,
                ValidationStage::Settings => self.validate_resource_settings(ctx.modules)?,
            }
            report.stages_passed.push(stage.as_str());
        }

        info!("Blueprint {} passed validation", self.config.blueprint_name);
        Ok(report)
    }

    pub fn validate_vars(&self) -> ConfigResult<Vec<String>> {
        validate_vars(&self.config.vars)
    }

    /// Run the requested precondition validators.
    pub fn execute_validators(&self, cloud: &dyn CloudQueries) -> ConfigResult<DispatchSummary> {
        let ctx = CheckContext::new(Resolver::new(&self.config.vars), cloud);
        run_all(self.validators(), self.validation_level(), &ctx)
    }

    /// Check structure and declared outputs of every resource.
    pub fn validate_resources(&self) -> ConfigResult<()> {
        for group in &self.config.resource_groups {
            for res in &group.resources {
                debug!("Checking module {} in group {}", res.id, group.name);
                check_resource(res)?;
                check_outputs(res, || {
                    self.modules_info.get(&group.name, &res.source).ok_or_else(|| {
                        ConfigError::MissingModuleInfo {
                            group: group.name.clone(),
                            source_path: res.source.clone(),
                        }
                    })
                })?;
            }
        }
        Ok(())
    }

    /// Check that no resource sets an input its module does not declare.
    pub fn validate_resource_settings(&self, modules: &dyn ModuleInfoProvider) -> ConfigResult<()> {
        for group in &self.config.resource_groups {
            for res in &group.resources {
                let info = modules
                    .module_info(&res.source, &res.kind)
                    .map_err(|e| ConfigError::ModuleInfo {
                        source_path: res.source.clone(),
                        source: e,
                    })?;
                check_settings(res, &info).map_err(|e| ConfigError::InvalidSettings {
                    source_path: res.source.clone(),
                    source: Box::new(e),
                })?;
            }
        }
        Ok(())
    }
}
