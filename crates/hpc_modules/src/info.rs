//! Module metadata: the inputs a module accepts and the outputs it produces.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::kind::ModuleKind;

/// A single module variable (input or output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInfo {
    /// Variable name as declared by the module
    pub name: String,
    /// Declared type, if any (e.g. "string", "list(string)")
    #[serde(default, rename = "type")]
    pub var_type: Option<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the module requires a value (no default)
    #[serde(default)]
    pub required: bool,
}

impl VarInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: None,
            description: None,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_type(mut self, var_type: impl Into<String>) -> Self {
        self.var_type = Some(var_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Metadata describing one module source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default)]
    pub inputs: Vec<VarInfo>,
    #[serde(default)]
    pub outputs: Vec<VarInfo>,
}

impl ModuleInfo {
    pub fn new(kind: ModuleKind) -> Self {
        Self {
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: VarInfo) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(VarInfo::new(output));
        self
    }

    /// Inputs keyed by name, mapped to their required flag.
    pub fn inputs_as_map(&self) -> HashMap<&str, bool> {
        self.inputs
            .iter()
            .map(|v| (v.name.as_str(), v.required))
            .collect()
    }

    /// Outputs keyed by name.
    pub fn outputs_as_map(&self) -> HashMap<&str, &VarInfo> {
        self.outputs.iter().map(|v| (v.name.as_str(), v)).collect()
    }
}
