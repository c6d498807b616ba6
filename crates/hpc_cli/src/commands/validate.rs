//! Validate command - Validate a blueprint.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use tracing::{info, warn};

use hpc_cloud::{
    CloudError, CloudInventory, CloudQueries, GcpClient, GcpClientConfig, InMemoryCloud,
    ACCESS_TOKEN_ENV,
};
use hpc_config::{BlueprintConfig, ValidationContext, ValidationLevel};
use hpc_modules::{ModuleCatalog, ModuleLoader};

#[derive(Args)]
#[command(group(
    ArgGroup::new("modules")
        .required(true)
        .args(["module_catalog", "modules_dir"])
))]
pub struct ValidateArgs {
    /// Path to the blueprint YAML file
    blueprint: PathBuf,

    /// Override the blueprint's validation level (IGNORE, WARNING or ERROR)
    #[arg(short = 'l', long)]
    validation_level: Option<ValidationLevel>,

    /// Module metadata catalog (YAML)
    #[arg(long)]
    module_catalog: Option<PathBuf>,

    /// Directory tree of module descriptors
    #[arg(long)]
    modules_dir: Option<PathBuf>,

    /// Answer cloud queries from a static inventory file instead of the API
    #[arg(long)]
    cloud_inventory: Option<PathBuf>,

    /// OAuth access token for the cloud APIs
    #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    gcp_token: Option<String>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating blueprint: {:?}", args.blueprint);

    if !args.blueprint.exists() {
        anyhow::bail!("Blueprint file not found: {:?}", args.blueprint);
    }

    let mut config = BlueprintConfig::from_path(&args.blueprint)
        .with_context(|| format!("Failed to read blueprint {:?}", args.blueprint))?;
    if let Some(level) = args.validation_level {
        config.set_validation_level(level);
    }

    let modules = load_modules(&args)?;
    config
        .load_modules_info(&modules)
        .context("Failed to load module metadata")?;

    let cloud = cloud_for(&args, config.validation_level())?;

    println!(
        "🔎 Validating {} ({} validators, level {})...",
        config.config.blueprint_name,
        config.validators().len(),
        config.validation_level()
    );

    let report = config
        .validate(&ValidationContext::new(cloud.as_ref(), &modules))
        .context("Blueprint validation failed")?;

    for stage in &report.stages_passed {
        println!("   ✅ {}", stage);
    }
    for warning in &report.warnings {
        println!("   ⚠️  {}", warning);
    }

    println!();
    println!("✅ Blueprint is valid!");
    Ok(())
}

fn load_modules(args: &ValidateArgs) -> Result<ModuleCatalog> {
    if let Some(path) = &args.module_catalog {
        return ModuleCatalog::from_path(path)
            .with_context(|| format!("Failed to read module catalog {:?}", path));
    }

    let dir = args
        .modules_dir
        .as_deref()
        .context("A --module-catalog or --modules-dir argument is required")?;
    if !dir.exists() {
        anyhow::bail!("Modules directory not found: {:?}", dir);
    }
    ModuleLoader::new(dir)
        .load_all()
        .context("Failed to load module descriptors")
}

fn cloud_for(args: &ValidateArgs, level: ValidationLevel) -> Result<Box<dyn CloudQueries>> {
    if let Some(path) = &args.cloud_inventory {
        let inventory = read_inventory(path)?;
        return Ok(Box::new(InMemoryCloud::from_inventory(inventory)));
    }

    if let Some(token) = &args.gcp_token {
        return Ok(Box::new(GcpClient::new(GcpClientConfig::new(token.clone()))));
    }

    let missing = CloudError::MissingCredentials(format!("{} is not set", ACCESS_TOKEN_ENV));
    if level == ValidationLevel::Error {
        return Err(missing).context("Cannot run cloud validators");
    }
    if level == ValidationLevel::Warning {
        warn!("{}; cloud validators will report warnings", missing);
    }
    Ok(Box::new(
        InMemoryCloud::new().simulate_failure(missing.to_string()),
    ))
}

fn read_inventory(path: &Path) -> Result<CloudInventory> {
    CloudInventory::from_path(path)
        .with_context(|| format!("Failed to read cloud inventory {:?}", path))
}
