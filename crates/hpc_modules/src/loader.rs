//! Discovery of module descriptors on disk.
//!
//! A module directory carries a `module.yaml` (or `module.yml`) descriptor
//! next to its sources. The loader walks a modules root and registers every
//! descriptor under the directory's path relative to that root, which is the
//! form blueprints use for local `source` values.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ModuleError, ModuleResult};
use crate::info::ModuleInfo;
use crate::provider::ModuleCatalog;

const DESCRIPTOR_NAMES: [&str; 2] = ["module.yaml", "module.yml"];

/// Module descriptor loader.
pub struct ModuleLoader {
    modules_path: PathBuf,
}

impl ModuleLoader {
    pub fn new(modules_path: impl Into<PathBuf>) -> Self {
        Self {
            modules_path: modules_path.into(),
        }
    }

    /// Load every descriptor below the modules root.
    pub fn load_all(&self) -> ModuleResult<ModuleCatalog> {
        let mut catalog = ModuleCatalog::new();

        if !self.modules_path.exists() {
            warn!("Modules directory does not exist: {:?}", self.modules_path);
            return Ok(catalog);
        }

        for entry in WalkDir::new(&self.modules_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy();
            if !DESCRIPTOR_NAMES.contains(&file_name.as_ref()) {
                continue;
            }

            let path = entry.path();
            let source = match self.source_for(path) {
                Some(source) => source,
                None => continue,
            };

            match self.load_descriptor(path) {
                Ok(info) => {
                    info!("Loaded module metadata: {} ({})", source, info.kind);
                    catalog.register(source, info);
                }
                Err(e) => {
                    warn!("Failed to load module descriptor {:?}: {}", path, e);
                }
            }
        }

        Ok(catalog)
    }

    /// Load a single descriptor file.
    pub fn load_descriptor(&self, path: &Path) -> ModuleResult<ModuleInfo> {
        debug!("Loading module descriptor from {:?}", path);
        let content = fs::read_to_string(path)?;
        let info: ModuleInfo = serde_yaml::from_str(&content)?;

        if let Some(dup) = first_duplicate(info.inputs.iter().map(|v| v.name.as_str())) {
            return Err(ModuleError::InvalidDescriptor {
                path: path.to_path_buf(),
                message: format!("input {} declared more than once", dup),
            });
        }

        Ok(info)
    }

    /// Relative, slash-separated directory of a descriptor.
    fn source_for(&self, descriptor: &Path) -> Option<String> {
        let dir = descriptor.parent()?;
        let relative = dir.strip_prefix(&self.modules_path).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}
