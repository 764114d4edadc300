//! Variable substitution for `${NAME}` and bare `$NAME` references.
//!
//! Both forms are resolved in one left-to-right scan. Text inserted for a
//! reference is never scanned again, so a value that itself contains `$NAME`
//! or `${NAME}` is emitted literally. References to unknown variables are
//! left untouched, including the leading `$`.

use crate::env::Environment;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static VARIABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^${}\s]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("variable reference pattern is valid")
});

/// Expands every variable reference in `content` against `env`.
pub fn substitute(content: &str, env: &Environment) -> String {
    if env.is_empty() {
        return content.to_string();
    }

    VARIABLE_REFERENCE
        .replace_all(content, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            match env.get(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
