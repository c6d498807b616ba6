//! Default-validators command - Show the validators a blueprint runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hpc_config::{BlueprintConfig, ValidatorConfig};

use super::OutputFormat;

#[derive(Args)]
pub struct DefaultValidatorsArgs {
    /// Path to the blueprint YAML file
    blueprint: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,
}

pub fn execute(args: DefaultValidatorsArgs) -> Result<()> {
    if !args.blueprint.exists() {
        anyhow::bail!("Blueprint file not found: {:?}", args.blueprint);
    }

    let config = BlueprintConfig::from_path(&args.blueprint)
        .with_context(|| format!("Failed to read blueprint {:?}", args.blueprint))?;

    let unknown = config.config.unknown_validators();
    if !unknown.is_empty() {
        eprintln!("⚠️  Unknown validators: {}", unknown.join(", "));
    }

    print!("{}", render(config.validators(), args.format)?);
    Ok(())
}

fn render(validators: &[ValidatorConfig], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(validators)?,
        OutputFormat::Json => serde_json::to_string_pretty(validators)? + "\n",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpc_config::Blueprint;

    #[test]
    fn test_render_defaults_as_yaml() {
        let bp = Blueprint::from_yaml_str("blueprint_name: t\nvars:\n  project_id: p\n").unwrap();
        let config = BlueprintConfig::new(bp);
        let out = render(config.validators(), OutputFormat::Yaml).unwrap();
        assert!(out.contains("validator: test_project_exists"));
        assert!(out.contains("((var.project_id))"));
    }

    #[test]
    fn test_render_json() {
        let bp = Blueprint::from_yaml_str("blueprint_name: t\nvars:\n  project_id: p\n  region: r\n").unwrap();
        let config = BlueprintConfig::new(bp);
        let out = render(config.validators(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_explicit_empty_list_is_kept() {
        let bp = Blueprint::from_yaml_str("blueprint_name: t\nvalidators: []\nvars:\n  project_id: p\n").unwrap();
        let config = BlueprintConfig::new(bp);
        assert!(config.validators().is_empty());
    }
}
