//! Common constants used throughout qrender.

/// Opening and closing delimiters of a directive
pub const DIRECTIVE_OPEN: &str = "{{";
pub const DIRECTIVE_CLOSE: &str = "}}";

/// Environment file extensions parsed as JSON
pub const JSON_ENV_EXTENSIONS: [&str; 1] = ["json"];

/// Environment file extensions parsed as YAML
pub const YAML_ENV_EXTENSIONS: [&str; 2] = ["yml", "yaml"];
