//! Template rendering for qrender.
//! Combines variable substitution with conditional directive processing.
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::processor::{process, Diagnostic};
use crate::substitute::substitute;
use std::io::Write;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template into `out`.
    ///
    /// # Arguments
    /// * `template` - Template text to render
    /// * `env` - Variables for substitution and conditions
    /// * `out` - Sink for the rendered lines
    ///
    /// # Returns
    /// * `Result<Vec<Diagnostic>>` - Non-fatal problems found while rendering
    fn render(&self, template: &str, env: &Environment, out: &mut dyn Write)
        -> Result<Vec<Diagnostic>>;

    /// Renders a template into a string.
    fn render_to_string(
        &self,
        template: &str,
        env: &Environment,
    ) -> Result<(String, Vec<Diagnostic>)> {
        let mut buffer = Vec::new();
        let diagnostics = self.render(template, env, &mut buffer)?;
        let rendered = String::from_utf8(buffer)
            .map_err(|e| Error::WriteError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        Ok((rendered, diagnostics))
    }
}

/// Substitutes variables, then filters lines through `if`/`else`/`endif` directives.
///
/// Substitution runs first, so directives may reference variables, e.g.
/// `{{if $MODE == release}}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectiveRenderer;

impl DirectiveRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for DirectiveRenderer {
    fn render(
        &self,
        template: &str,
        env: &Environment,
        out: &mut dyn Write,
    ) -> Result<Vec<Diagnostic>> {
        let content = substitute(template, env);
        process(&content, env, out)
    }
}
