//! qrender is a small text templating engine.
//! It substitutes `${NAME}` and `$NAME` references from an environment mapping and
//! keeps or drops regions of text guarded by `{{if}}` / `{{else if}}` / `{{else}}` /
//! `{{endif}}` directives.

/// Command-line interface module for the qrender application
pub mod cli;

/// Condition parsing and comparison
pub mod condition;

pub mod constants;

/// Directive line recognition
pub mod directive;

/// Environment mapping construction
/// Supports the process environment and KEY=VALUE, JSON and YAML env files
pub mod env;

/// Error types and handling for the qrender application
pub mod error;

pub mod logger;

/// Conditional block state machine
pub mod processor;

/// Substitution followed by directive processing
pub mod renderer;

/// Variable reference expansion
pub mod substitute;

/// Template file checks and output sink setup
pub mod template;
