//! qrender's main application entry point.
//! Handles command-line argument parsing and drives a single template
//! through substitution and directive processing.

use std::io::Write;

use log::debug;
use qrender::{
    cli::{get_args, Args},
    env::load_environment,
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    renderer::{DirectiveRenderer, TemplateRenderer},
    template::{check_template_file, open_output, prepare_output_path, read_template},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the template file and the output location
/// 2. Reads the template
/// 3. Builds the environment mapping
/// 4. Renders into the output sink and flushes it
fn run(args: Args) -> Result<()> {
    check_template_file(&args.template)?;
    if let Some(output) = &args.output {
        prepare_output_path(output)?;
    }

    let template = read_template(&args.template)?;
    let env = load_environment(args.env.as_deref(), args.vars.as_deref())?;

    debug!("Environment variables:");
    for line in env.dump() {
        debug!("  {line}");
    }

    let renderer = DirectiveRenderer::new();
    let mut out = open_output(args.output.as_deref())?;
    let diagnostics = renderer.render(&template, &env, &mut out)?;
    out.flush().map_err(Error::WriteError)?;

    debug!("Rendering finished with {} warning(s)", diagnostics.len());
    Ok(())
}
