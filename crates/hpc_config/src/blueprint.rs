//! Blueprint data model.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, info};

use hpc_modules::{is_valid_kind, ModuleInfo, ModuleInfoProvider};

use crate::error::{ConfigError, ConfigResult};
use crate::validators::ValidatorKind;
use crate::vars::VarTable;

/// How precondition validator failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValidationLevel {
    /// Validators are not run at all
    Ignore,
    /// Failures are reported but do not fail validation
    Warning,
    /// Failures fail validation
    #[default]
    Error,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Ignore => "IGNORE",
            ValidationLevel::Warning => "WARNING",
            ValidationLevel::Error => "ERROR",
        }
    }
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IGNORE" => Ok(ValidationLevel::Ignore),
            "WARNING" => Ok(ValidationLevel::Warning),
            "ERROR" => Ok(ValidationLevel::Error),
            _ => Err(format!(
                "invalid validation level {:?}, expected one of IGNORE, WARNING, ERROR",
                s
            )),
        }
    }
}

impl TryFrom<String> for ValidationLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, String> {
        s.parse()
    }
}

impl From<ValidationLevel> for String {
    fn from(level: ValidationLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A requested precondition check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Name of the validator to run
    pub validator: String,
    /// Input name mapped to a literal or `((var.name))` reference
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
}

impl ValidatorConfig {
    pub fn new(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    /// Add an input referencing the global variable of the same name.
    pub fn with_var_input(self, name: &str) -> Self {
        let reference = format!("((var.{}))", name);
        self.with_input(name, reference)
    }
}

/// One declared module instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
}

impl Resource {
    pub fn new(id: impl Into<String>, source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// YAML rendering used in diagnostics.
    pub fn dump(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_else(|e| format!("{:?} ({})", self, e))
    }
}

/// A named, ordered group of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(rename = "group")]
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }
}

/// The blueprint document as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub blueprint_name: String,
    /// `None` when the document omits the key, which selects the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<Vec<ValidatorConfig>>,
    #[serde(default)]
    pub validation_level: ValidationLevel,
    #[serde(default)]
    pub vars: VarTable,
    #[serde(default)]
    pub resource_groups: Vec<ResourceGroup>,
}

impl Blueprint {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Reading blueprint from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Validators derived from the global variables.
    ///
    /// Nothing is derived without a `project_id`.
    pub fn default_validators(&self) -> Vec<ValidatorConfig> {
        let mut validators = Vec::new();
        let has = |name: &str| self.vars.contains_key(name);

        if !has("project_id") {
            return validators;
        }
        validators.push(
            ValidatorConfig::new(ValidatorKind::TestProjectExists.as_str())
                .with_var_input("project_id"),
        );

        if has("region") {
            validators.push(
                ValidatorConfig::new(ValidatorKind::TestRegionExists.as_str())
                    .with_var_input("project_id")
                    .with_var_input("region"),
            );
        }
        if has("zone") {
            validators.push(
                ValidatorConfig::new(ValidatorKind::TestZoneExists.as_str())
                    .with_var_input("project_id")
                    .with_var_input("zone"),
            );
        }
        if has("region") && has("zone") {
            validators.push(
                ValidatorConfig::new(ValidatorKind::TestZoneInRegion.as_str())
                    .with_var_input("project_id")
                    .with_var_input("region")
                    .with_var_input("zone"),
            );
        }

        validators
    }

    /// Validator names with no registered implementation.
    pub fn unknown_validators(&self) -> Vec<&str> {
        self.validators
            .iter()
            .flatten()
            .map(|v| v.validator.as_str())
            .filter(|name| ValidatorKind::parse(name).is_none())
            .collect()
    }
}

/// Module metadata keyed by group name, then module source.
#[derive(Debug, Clone, Default)]
pub struct ModulesInfoCache {
    groups: HashMap<String, HashMap<String, ModuleInfo>>,
}

impl ModulesInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: impl Into<String>, source: impl Into<String>, info: ModuleInfo) {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(source.into(), info);
    }

    pub fn get(&self, group: &str, source: &str) -> Option<&ModuleInfo> {
        self.groups.get(group).and_then(|g| g.get(source))
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A blueprint prepared for validation.
#[derive(Debug, Clone, Default)]
pub struct BlueprintConfig {
    pub config: Blueprint,
    pub modules_info: ModulesInfoCache,
}

impl BlueprintConfig {
    /// Wrap a parsed blueprint, filling in default validators when the
    /// document does not list any.
    pub fn new(mut config: Blueprint) -> Self {
        if config.validators.is_none() {
            let defaults = config.default_validators();
            debug!("Using {} default validators", defaults.len());
            config.validators = Some(defaults);
        }
        Self {
            config,
            modules_info: ModulesInfoCache::new(),
        }
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(Self::new(Blueprint::from_yaml_str(content)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Ok(Self::new(Blueprint::from_path(path)?))
    }

    pub fn validators(&self) -> &[ValidatorConfig] {
        self.config.validators.as_deref().unwrap_or(&[])
    }

    pub fn validation_level(&self) -> ValidationLevel {
        self.config.validation_level
    }

    pub fn set_validation_level(&mut self, level: ValidationLevel) {
        self.config.validation_level = level;
    }

    /// Populate the module metadata cache for every resource.
    ///
    /// Resources without a source or with an unrecognised kind are skipped;
    /// structural validation reports those.
    pub fn load_modules_info(&mut self, provider: &dyn ModuleInfoProvider) -> ConfigResult<()> {
        for group in &self.config.resource_groups {
            for res in &group.resources {
                if res.source.is_empty() || !is_valid_kind(&res.kind) {
                    continue;
                }
                if self.modules_info.get(&group.name, &res.source).is_some() {
                    continue;
                }
                let info = provider
                    .module_info(&res.source, &res.kind)
                    .map_err(|e| ConfigError::ModuleInfo {
                        source_path: res.source.clone(),
                        source: e,
                    })?;
                self.modules_info.insert(&group.name, &res.source, info);
            }
        }
        info!("Loaded metadata for {} modules", self.modules_info.len());
        Ok(())
    }
}
