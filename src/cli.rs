//! Command-line interface implementation for qrender.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for qrender.
#[derive(Parser, Debug)]
#[command(author, version, about = "qrender: render text templates from environment variables", long_about = None)]
pub struct Args {
    /// Template file to render
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Environment variables file (KEY=VALUE, .json or .yaml).
    /// The process environment is used when omitted.
    #[arg(short, long, value_name = "ENV_FILE")]
    pub env: Option<PathBuf>,

    /// Comma-separated list of variables visible to the template
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub vars: Option<Vec<String>>,

    /// Enable verbose logging and print the active variables
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                // Nothing useful can be done if stdout is gone.
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
