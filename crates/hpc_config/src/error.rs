//! Error types for blueprint loading and validation.

use thiserror::Error;

/// Result type alias for blueprint operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating a blueprint.
#[derive(Error, Debug)]
pub enum ConfigError {
    // Global variables
    #[error("global variable {0} was not set")]
    NullVariable(String),

    #[error("vars.labels must be a map")]
    LabelsNotMap,

    // Literal reference resolution
    #[error("the value {0} cannot be cast to a string")]
    NotAString(String),

    #[error("the value {0} is not a literal variable reference")]
    NotAVariable(String),

    #[error("the value {0} does not reference a global variable")]
    NotAGlobalVariable(String),

    #[error("the value {0} is not a global variable or was not defined")]
    UndefinedVariable(String),

    #[error("the global variable {0} is not a string")]
    VariableNotString(String),

    // Precondition validators
    #[error("at least one required input was not provided to {validator}: {}", .missing.join(", "))]
    MissingInputs {
        validator: String,
        missing: Vec<String>,
    },

    #[error("only inputs [{}] should be provided to {validator}; unexpected: {}", .expected.join(", "), .unexpected.join(", "))]
    UnexpectedInputs {
        validator: String,
        expected: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("passed wrong validator to {0} implementation")]
    WrongValidator(String),

    #[error("{0} is not an implemented validator")]
    UnimplementedValidator(String),

    #[error(transparent)]
    Precondition(#[from] hpc_cloud::CloudError),

    #[error("validation failed due to the issues listed above")]
    ValidationFailed { failures: Vec<String> },

    // Resource structure
    #[error("a module id cannot be empty\n{0}")]
    EmptyId(String),

    #[error("a module source cannot be empty\n{0}")]
    EmptySource(String),

    #[error("wrong kind: {kind:?} is not a recognized module kind\n{dump}")]
    WrongKind { kind: String, dump: String },

    #[error("requested output was not found in the module, module: {id} output: {output}")]
    InvalidOutput { id: String, output: String },

    #[error("no module metadata loaded for {source_path} in group {group}")]
    MissingModuleInfo { group: String, source_path: String },

    // Settings
    #[error("unexpected setting: a setting was added that is not found in the module: Module ID: {id} Setting: {setting}")]
    UnexpectedSetting { id: String, setting: String },

    #[error("failed to get info for module at {source_path} while validating module settings: {source}")]
    ModuleInfo {
        source_path: String,
        #[source]
        source: hpc_modules::ModuleError,
    },

    #[error("found an issue while validating settings for module at {source_path}: {source}")]
    InvalidSettings {
        source_path: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
