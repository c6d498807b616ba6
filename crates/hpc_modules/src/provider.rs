//! Module metadata providers.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModuleError, ModuleResult};
use crate::info::ModuleInfo;

/// Source of metadata for module sources referenced by a blueprint.
pub trait ModuleInfoProvider {
    /// Fetch the inputs and outputs of the module at `source`.
    fn module_info(&self, source: &str, kind: &str) -> ModuleResult<ModuleInfo>;
}

/// Static catalogue of module metadata keyed by module source.
///
/// A catalogue file looks like:
///
/// ```yaml
/// modules:
///   modules/network/vpc:
///     kind: terraform
///     inputs:
///       - name: project_id
///         required: true
///     outputs:
///       - name: network_name
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleCatalog {
    #[serde(default)]
    modules: HashMap<String, ModuleInfo>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a module source.
    pub fn register(&mut self, source: impl Into<String>, info: ModuleInfo) {
        self.modules.insert(source.into(), info);
    }

    pub fn with_module(mut self, source: impl Into<String>, info: ModuleInfo) -> Self {
        self.register(source, info);
        self
    }

    pub fn get(&self, source: &str) -> Option<&ModuleInfo> {
        self.modules.get(source)
    }

    /// List registered module sources, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut sources: Vec<_> = self.modules.keys().map(String::as_str).collect();
        sources.sort_unstable();
        sources
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn from_yaml_str(content: &str) -> ModuleResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a catalogue file.
    pub fn from_path(path: &Path) -> ModuleResult<Self> {
        debug!("Loading module catalogue from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

impl ModuleInfoProvider for ModuleCatalog {
    fn module_info(&self, source: &str, kind: &str) -> ModuleResult<ModuleInfo> {
        let info = self
            .modules
            .get(source)
            .ok_or_else(|| ModuleError::NotFound(source.to_string()))?;

        if info.kind.as_str() != kind {
            return Err(ModuleError::KindMismatch {
                source_path: source.to_string(),
                expected: kind.to_string(),
                found: info.kind.to_string(),
            });
        }

        Ok(info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::VarInfo;
    use crate::kind::ModuleKind;

    fn catalog() -> ModuleCatalog {
        ModuleCatalog::new().with_module(
            "modules/network/vpc",
            ModuleInfo::new(ModuleKind::Terraform)
                .with_input(VarInfo::new("project_id").required())
                .with_output("network_name"),
        )
    }

    #[test]
    fn test_catalog_lookup() {
        let info = catalog()
            .module_info("modules/network/vpc", "terraform")
            .unwrap();
        assert_eq!(info.inputs.len(), 1);
    }

    #[test]
    fn test_catalog_unknown_source() {
        let err = catalog()
            .module_info("modules/compute/vm", "terraform")
            .unwrap_err();
        assert!(matches!(err, ModuleError::NotFound(ref s) if s == "modules/compute/vm"));
    }

    #[test]
    fn test_catalog_kind_mismatch() {
        let err = catalog()
            .module_info("modules/network/vpc", "packer")
            .unwrap_err();
        assert!(err.to_string().contains("is of kind terraform, not packer"));
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
modules:
  modules/scheduler/slurm:
    kind: terraform
    inputs:
      - name: partitions
        required: true
    outputs:
      - name: controller_name
  images/hpc-image:
    kind: packer
"#;
        let catalog = ModuleCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.list(), vec!["images/hpc-image", "modules/scheduler/slurm"]);
        assert!(catalog.module_info("images/hpc-image", "packer").is_ok());
    }
}
