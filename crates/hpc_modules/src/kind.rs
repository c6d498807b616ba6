//! Recognised module kinds.

use serde::{Deserialize, Serialize};

/// Kinds of module a blueprint resource may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    #[default]
    Terraform,
    Packer,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Terraform => "terraform",
            ModuleKind::Packer => "packer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "terraform" => Some(ModuleKind::Terraform),
            "packer" => Some(ModuleKind::Packer),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![ModuleKind::Terraform, ModuleKind::Packer]
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `kind` names one of the recognised module kinds.
///
/// Matching is exact: blueprints spell kinds in lowercase.
pub fn is_valid_kind(kind: &str) -> bool {
    ModuleKind::parse(kind).is_some()
}
