//! Resolution of literal variable references.
//!
//! Validator inputs name global variables with the literal form
//! `((var.project_id))`. By the time validation runs the expand pass has
//! already normalised every other kind of reference, so only `var` sources
//! resolve here.

use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::vars::VarTable;

const GLOBAL_SOURCE: &str = "var";

fn literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\(\(\s*([A-Za-z_][\w-]*)\.([A-Za-z_][\w-]*)\s*\)\)$")
            .expect("literal variable pattern is valid")
    })
}

/// Whether `s` is exactly one `((source.name))` reference.
pub fn is_literal_variable(s: &str) -> bool {
    literal_regex().is_match(s)
}

/// Split a literal reference into its source and name.
pub fn parse_literal_variable(s: &str) -> Option<(&str, &str)> {
    let caps = literal_regex().captures(s)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Compact rendering of an arbitrary value for error messages.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

/// Resolves literal references against the global variable table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    vars: &'a VarTable,
}

impl<'a> Resolver<'a> {
    pub fn new(vars: &'a VarTable) -> Self {
        Self { vars }
    }

    /// Resolve a `((var.name))` reference to the variable's string value.
    pub fn resolve(&self, reference: &Value) -> ConfigResult<String> {
        let text = match reference {
            Value::String(s) => s.as_str(),
            other => return Err(ConfigError::NotAString(display_value(other))),
        };

        let (source, name) = parse_literal_variable(text)
            .ok_or_else(|| ConfigError::NotAVariable(text.to_string()))?;

        if source != GLOBAL_SOURCE {
            return Err(ConfigError::NotAGlobalVariable(text.to_string()));
        }

        let value = self
            .vars
            .get(name)
            .ok_or_else(|| ConfigError::UndefinedVariable(text.to_string()))?;

        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::VariableNotString(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::VarValue;

    fn vars() -> VarTable {
        serde_yaml::from_str("project_id: my-proj\nlabels:\n  team: hpc\nsize: 4\n").unwrap()
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_literal_variable_shapes() {
        assert!(is_literal_variable("((var.project_id))"));
        assert!(is_literal_variable("(( var.project_id ))"));
        assert!(is_literal_variable("((network1.network_name))"));
        assert!(!is_literal_variable("$(vars.project_id)"));
        assert!(!is_literal_variable("((var.a.b))"));
        assert!(!is_literal_variable("prefix ((var.a))"));
        assert!(!is_literal_variable("((project_id))"));
    }

    #[test]
    fn test_parse_literal_variable() {
        assert_eq!(
            parse_literal_variable("((var.zone))"),
            Some(("var", "zone"))
        );
        assert_eq!(parse_literal_variable("var.zone"), None);
    }

    #[test]
    fn test_resolve_global_variable() {
        let vars = vars();
        let resolver = Resolver::new(&vars);
        assert_eq!(resolver.resolve(&s("((var.project_id))")).unwrap(), "my-proj");
    }

    #[test]
    fn test_resolve_missing_variable() {
        let vars = vars();
        let err = Resolver::new(&vars)
            .resolve(&s("((var.missing_key))"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedVariable(_)));
        assert!(err.to_string().contains("((var.missing_key))"));
    }

    #[test]
    fn test_resolve_non_global_source() {
        let vars = vars();
        let err = Resolver::new(&vars)
            .resolve(&s("((network1.network_name))"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAGlobalVariable(ref r) if r == "((network1.network_name))"));
    }

    #[test]
    fn test_resolve_plain_literal_is_not_a_variable() {
        let vars = vars();
        let err = Resolver::new(&vars).resolve(&s("my-proj")).unwrap_err();
        assert!(matches!(err, ConfigError::NotAVariable(_)));
        assert!(err.to_string().contains("my-proj"));
    }

    #[test]
    fn test_resolve_non_string_input() {
        let vars = vars();
        let err = Resolver::new(&vars)
            .resolve(&Value::Number(42.into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAString(ref v) if v == "42"));
    }

    #[test]
    fn test_resolve_variable_not_a_string() {
        let vars = vars();
        let resolver = Resolver::new(&vars);
        for reference in ["((var.labels))", "((var.size))"] {
            let err = resolver.resolve(&s(reference)).unwrap_err();
            assert!(matches!(err, ConfigError::VariableNotString(_)));
        }
    }

    #[test]
    fn test_resolve_null_variable() {
        let mut vars = vars();
        vars.insert("zone".to_string(), VarValue::Null);
        let err = Resolver::new(&vars).resolve(&s("((var.zone))")).unwrap_err();
        assert!(matches!(err, ConfigError::VariableNotString(_)));
    }
}
