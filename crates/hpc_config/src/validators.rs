//! Precondition validators.
//!
//! Each validator checks that identifiers named in the blueprint exist in
//! the target cloud. The set is closed: [`ValidatorKind`] enumerates every
//! implementation and maps it to its handler.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_yaml::Value;
use tracing::warn;

use hpc_cloud::CloudQueries;

use crate::blueprint::ValidatorConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::resolver::Resolver;

/// Implemented precondition validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    TestProjectExists,
    TestRegionExists,
    TestZoneExists,
    TestZoneInRegion,
}

impl ValidatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorKind::TestProjectExists => "test_project_exists",
            ValidatorKind::TestRegionExists => "test_region_exists",
            ValidatorKind::TestZoneExists => "test_zone_exists",
            ValidatorKind::TestZoneInRegion => "test_zone_in_region",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "test_project_exists" => Some(ValidatorKind::TestProjectExists),
            "test_region_exists" => Some(ValidatorKind::TestRegionExists),
            "test_zone_exists" => Some(ValidatorKind::TestZoneExists),
            "test_zone_in_region" => Some(ValidatorKind::TestZoneInRegion),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            ValidatorKind::TestProjectExists,
            ValidatorKind::TestRegionExists,
            ValidatorKind::TestZoneExists,
            ValidatorKind::TestZoneInRegion,
        ]
    }

    /// The handler implementing this validator.
    pub fn handler(&self) -> &'static dyn PreconditionCheck {
        match self {
            ValidatorKind::TestProjectExists => &ProjectExists,
            ValidatorKind::TestRegionExists => &RegionExists,
            ValidatorKind::TestZoneExists => &ZoneExists,
            ValidatorKind::TestZoneInRegion => &ZoneInRegion,
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Look up the handler for a validator name.
pub fn lookup(name: &str) -> Option<&'static dyn PreconditionCheck> {
    ValidatorKind::parse(name).map(|kind| kind.handler())
}

/// What a precondition check needs while running.
pub struct CheckContext<'a> {
    pub resolver: Resolver<'a>,
    pub cloud: &'a dyn CloudQueries,
}

impl<'a> CheckContext<'a> {
    pub fn new(resolver: Resolver<'a>, cloud: &'a dyn CloudQueries) -> Self {
        Self { resolver, cloud }
    }

    /// Resolve one named input of an invocation to a literal string.
    pub fn input(&self, invocation: &ValidatorConfig, name: &str) -> ConfigResult<String> {
        let value = invocation
            .inputs
            .get(name)
            .ok_or_else(|| ConfigError::MissingInputs {
                validator: invocation.validator.clone(),
                missing: vec![name.to_string()],
            })?;
        self.resolver.resolve(value)
    }
}

/// Check that the supplied inputs are exactly the required ones.
///
/// Each missing input is logged on its own line; the returned error names
/// all of them. Surplus inputs are reported once no input is missing.
pub fn check_inputs(
    validator: &str,
    inputs: &BTreeMap<String, Value>,
    required: &[&str],
) -> ConfigResult<()> {
    let required_set: BTreeSet<&str> = required.iter().copied().collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !inputs.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    for name in &missing {
        warn!("a required input {} was not provided to {}!", name, validator);
    }
    if !missing.is_empty() {
        return Err(ConfigError::MissingInputs {
            validator: validator.to_string(),
            missing,
        });
    }

    let unexpected: Vec<String> = inputs
        .keys()
        .filter(|name| !required_set.contains(name.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        return Err(ConfigError::UnexpectedInputs {
            validator: validator.to_string(),
            expected: required.iter().map(|s| s.to_string()).collect(),
            unexpected,
        });
    }

    Ok(())
}

/// A named precondition check.
pub trait PreconditionCheck: Sync {
    fn kind(&self) -> ValidatorKind;

    /// Input names the invocation must supply, no more and no fewer.
    fn required_inputs(&self) -> &'static [&'static str];

    /// Resolve inputs and query the cloud. Inputs have been checked.
    fn execute(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()>;

    /// Run the check for one invocation.
    fn run(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()> {
        let name = self.kind().as_str();
        if invocation.validator != name {
            return Err(ConfigError::WrongValidator(name.to_string()));
        }

        check_inputs(name, &invocation.inputs, self.required_inputs())
            .and_then(|_| self.execute(invocation, ctx))
            .map_err(|e| {
                warn!("validator {} failed", name);
                e
            })
    }
}

/// `test_project_exists`
pub struct ProjectExists;

impl PreconditionCheck for ProjectExists {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::TestProjectExists
    }

    fn required_inputs(&self) -> &'static [&'static str] {
        &["project_id"]
    }

    fn execute(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()> {
        let project_id = ctx.input(invocation, "project_id")?;
        ctx.cloud.project_exists(&project_id)?;
        Ok(())
    }
}

/// `test_region_exists`
pub struct RegionExists;

impl PreconditionCheck for RegionExists {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::TestRegionExists
    }

    fn required_inputs(&self) -> &'static [&'static str] {
        &["project_id", "region"]
    }

    fn execute(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()> {
        let project_id = ctx.input(invocation, "project_id")?;
        let region = ctx.input(invocation, "region")?;
        ctx.cloud.region_exists(&project_id, &region)?;
        Ok(())
    }
}

/// `test_zone_exists`
pub struct ZoneExists;

impl PreconditionCheck for ZoneExists {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::TestZoneExists
    }

    fn required_inputs(&self) -> &'static [&'static str] {
        &["project_id", "zone"]
    }

    fn execute(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()> {
        let project_id = ctx.input(invocation, "project_id")?;
        let zone = ctx.input(invocation, "zone")?;
        ctx.cloud.zone_exists(&project_id, &zone)?;
        Ok(())
    }
}

/// `test_zone_in_region`
pub struct ZoneInRegion;

impl PreconditionCheck for ZoneInRegion {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::TestZoneInRegion
    }

    fn required_inputs(&self) -> &'static [&'static str] {
        &["project_id", "region", "zone"]
    }

    fn execute(&self, invocation: &ValidatorConfig, ctx: &CheckContext<'_>) -> ConfigResult<()> {
        let project_id = ctx.input(invocation, "project_id")?;
        let zone = ctx.input(invocation, "zone")?;
        let region = ctx.input(invocation, "region")?;
        ctx.cloud.zone_in_region(&project_id, &zone, &region)?;
        Ok(())
    }
}
