//! Validator dispatch.
//!
//! Runs every requested precondition validator in declaration order and
//! classifies failures under the run's [`ValidationLevel`]. Unlike the other
//! validation stages this one never stops early: every invocation runs so a
//! single pass reports every problem.

use tracing::{debug, error, info, warn};

use crate::blueprint::{ValidationLevel, ValidatorConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::validators::{lookup, CheckContext};

/// Remediation advice shown once whenever a validator warned or failed.
pub const VALIDATION_GUIDANCE: &str = "\
validator failures can indicate a credentials problem.
troubleshooting info appears at:

https://github.com/GoogleCloudPlatform/hpc-toolkit/blob/main/README.md#supplying-cloud-credentials-to-terraform

validation can be configured:
- treat failures as warnings by using the validate command
  with the flag \"--validation-level WARNING\"
- can be disabled entirely by using the validate command
  with the flag \"--validation-level IGNORE\"
- a custom set of validators can be configured following
  instructions at:

https://github.com/GoogleCloudPlatform/hpc-toolkit/blob/main/README.md#blueprint-warnings-and-errors";

/// Outcome of a dispatch run that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of validators that were run
    pub executed: usize,
    /// Failures classified as warnings
    pub warnings: Vec<String>,
    /// Whether the remediation guidance was emitted
    pub guidance_shown: bool,
}

/// Run every invocation and classify its outcome.
///
/// Returns [`ConfigError::ValidationFailed`] carrying every error-classified
/// failure when at least one occurred. Warning-only runs succeed.
pub fn run_all(
    invocations: &[ValidatorConfig],
    level: ValidationLevel,
    ctx: &CheckContext<'_>,
) -> ConfigResult<DispatchSummary> {
    let mut summary = DispatchSummary::default();

    if level == ValidationLevel::Ignore {
        info!("Validation level is IGNORE, skipping {} validators", invocations.len());
        return Ok(summary);
    }

    let mut errors = Vec::new();

    for invocation in invocations {
        let handler = match lookup(&invocation.validator) {
            Some(handler) => handler,
            None => {
                let err = ConfigError::UnimplementedValidator(invocation.validator.clone());
                error!("{}", err);
                errors.push(err.to_string());
                continue;
            }
        };

        debug!("Running validator {}", invocation.validator);
        summary.executed += 1;

        if let Err(e) = handler.run(invocation, ctx) {
            match level {
                ValidationLevel::Warning => {
                    warn!("warning: {}", e);
                    summary
                        .warnings
                        .push(format!("{}: {}", invocation.validator, e));
                }
                _ => {
                    error!("error: {}", e);
                    errors.push(e.to_string());
                }
            }
        }
    }

    if !summary.warnings.is_empty() || !errors.is_empty() {
        for line in VALIDATION_GUIDANCE.lines() {
            warn!("{}", line);
        }
        summary.guidance_shown = true;
    }

    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { failures: errors });
    }

    info!(
        "{} validators run, {} warnings",
        summary.executed,
        summary.warnings.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use crate::vars::VarTable;
    use hpc_cloud::InMemoryCloud;
    use tracing_test::traced_test;

    fn vars() -> VarTable {
        serde_yaml::from_str("project_id: my-proj\nregion: us-central1\nbad_region: mars-north1\n")
            .unwrap()
    }

    fn cloud() -> InMemoryCloud {
        InMemoryCloud::new().with_region("my-proj", "us-central1")
    }

    fn failing() -> ValidatorConfig {
        ValidatorConfig::new("test_region_exists")
            .with_var_input("project_id")
            .with_input("region", "((var.bad_region))")
    }

    fn passing() -> ValidatorConfig {
        ValidatorConfig::new("test_project_exists").with_var_input("project_id")
    }

    #[test]
    fn test_ignore_runs_nothing() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let summary = run_all(
            &[failing(), ValidatorConfig::new("not_a_validator")],
            ValidationLevel::Ignore,
            &ctx,
        )
        .unwrap();

        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(cloud.call_count(), 0);
    }

    #[test]
    fn test_warning_level_succeeds() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let summary = run_all(&[failing()], ValidationLevel::Warning, &ctx).unwrap();

        assert_eq!(summary.executed, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].starts_with("test_region_exists: "));
        assert!(summary.warnings[0].contains("mars-north1"));
        assert!(summary.guidance_shown);
    }

    #[test]
    #[traced_test]
    fn test_warning_level_logs_no_errors() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        run_all(&[failing()], ValidationLevel::Warning, &ctx).unwrap();

        assert!(logs_contain("validator test_region_exists failed"));
        assert!(logs_contain("warning: region mars-north1"));
        assert!(!logs_contain("ERROR"));
    }

    #[test]
    fn test_error_level_fails() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let err = run_all(&[failing()], ValidationLevel::Error, &ctx).unwrap_err();

        assert_eq!(err.to_string(), "validation failed due to the issues listed above");
        assert!(matches!(err, ConfigError::ValidationFailed { ref failures } if failures.len() == 1));
    }

    #[test]
    fn test_dispatch_is_exhaustive() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let err = run_all(&[failing(), passing(), failing()], ValidationLevel::Error, &ctx)
            .unwrap_err();

        match err {
            ConfigError::ValidationFailed { failures } => assert_eq!(failures.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(cloud.call_count(), 3);
    }

    #[test]
    fn test_unknown_validator_is_error_even_when_warning() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let err = run_all(
            &[ValidatorConfig::new("test_apis_enabled"), passing()],
            ValidationLevel::Warning,
            &ctx,
        )
        .unwrap_err();

        match err {
            ConfigError::ValidationFailed { failures } => {
                assert_eq!(failures, vec!["test_apis_enabled is not an implemented validator"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(cloud.was_called("project_exists"));
    }

    #[test]
    fn test_all_passing_shows_no_guidance() {
        let vars = vars();
        let cloud = cloud();
        let ctx = CheckContext::new(Resolver::new(&vars), &cloud);

        let summary = run_all(&[passing()], ValidationLevel::Error, &ctx).unwrap();

        assert_eq!(summary.executed, 1);
        assert!(summary.warnings.is_empty());
        assert!(!summary.guidance_shown);
    }

    #[test]
    fn test_guidance_mentions_levels() {
        assert!(VALIDATION_GUIDANCE.contains("--validation-level WARNING"));
        assert!(VALIDATION_GUIDANCE.contains("--validation-level IGNORE"));
        let lines: Vec<&str> = VALIDATION_GUIDANCE.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(
            lines[3],
            "https://github.com/GoogleCloudPlatform/hpc-toolkit/blob/main/README.md#supplying-cloud-credentials-to-terraform"
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[12], "");
        assert_eq!(
            lines[13],
            "https://github.com/GoogleCloudPlatform/hpc-toolkit/blob/main/README.md#blueprint-warnings-and-errors"
        );
    }
}
