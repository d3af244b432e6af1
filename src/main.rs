//! metaflat CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures through
//! [`user_friendly_error`] with a non-zero exit code.
//!
//! - `convert` - flatten a JSON/YAML document into rendered text
//! - `lookup` - show the template resolved for a path and key
//! - `validate` - check a template file
//! - `document` - build a search-index document

use anyhow::Result;
use clap::Parser;
use metaflat_cli::cli;
use metaflat_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
