//! Construction of the environment mapping consulted by substitution and conditions.
//! The mapping comes either from the live process environment or from an env file
//! (`KEY=VALUE` lines, or a flat JSON/YAML object), is optionally restricted to an
//! allow-list, and finally has quote characters stripped from its values.

use crate::constants::{JSON_ENV_EXTENSIONS, YAML_ENV_EXTENSIONS};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

/// Flat, read-only mapping of variable names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: IndexMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Loads an environment file, choosing the format from its extension.
    ///
    /// # Errors
    /// * `Error::EnvFileError` if the file cannot be read
    /// * `Error::ConfigError` if a JSON/YAML file is not a flat mapping
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::EnvFileError {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if JSON_ENV_EXTENSIONS.contains(&extension) || YAML_ENV_EXTENSIONS.contains(&extension) {
            debug!("Loading structured env file {}", path.display());
            Self::parse_structured(&content)
        } else {
            debug!("Loading env file {}", path.display());
            Ok(Self::parse_dotenv(&content))
        }
    }

    /// Parses `KEY=VALUE` lines.
    ///
    /// Blank lines, `#` comments and lines without `=` are ignored. Keys and
    /// values are trimmed and surrounding quotes are removed from values.
    pub fn parse_dotenv(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| {
                let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
                (key.trim().to_string(), value.to_string())
            })
            .collect()
    }

    /// Parses a flat JSON or YAML object. JSON is tried first.
    pub fn parse_structured(content: &str) -> Result<Self> {
        let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| Error::ConfigError(format!("Invalid env file format: {e}")))?,
        };

        raw.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        return Err(Error::ConfigError(format!(
                            "value of '{key}' must be a string, number or boolean"
                        )));
                    }
                };
                Ok((key, value))
            })
            .collect()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keeps only the named variables. Names are trimmed; unknown names are ignored.
    pub fn retain_only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Vec<String> =
            names.into_iter().map(|name| name.as_ref().trim().to_string()).collect();
        self.vars.retain(|key, _| allowed.iter().any(|name| name == key));
        self
    }

    /// Removes every quote character from every value.
    pub fn normalized(mut self) -> Self {
        for value in self.vars.values_mut() {
            value.retain(|c| c != '"' && c != '\'');
        }
        self
    }

    /// `KEY=VALUE` lines sorted by key, for the verbose dump.
    pub fn dump(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        lines.sort();
        lines
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Builds the environment mapping for a run: source, then allow-list, then normalisation.
///
/// # Arguments
/// * `env_file` - Env file to read; the process environment is used when `None`
/// * `vars` - Optional allow-list of variable names; blank names are ignored and an
///   allow-list with no names left does not filter
pub fn load_environment(env_file: Option<&Path>, vars: Option<&[String]>) -> Result<Environment> {
    let env = match env_file {
        Some(path) => Environment::from_file(path)?,
        None => {
            debug!("Loading variables from the process environment");
            Environment::from_process()
        }
    };

    let names: Vec<&str> = vars
        .unwrap_or_default()
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    let env = if names.is_empty() { env } else { env.retain_only(names) };

    Ok(env.normalized())
}
