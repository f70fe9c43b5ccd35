//! Show version information.

use anyhow::Result;
use colored::Colorize;
use envsmith_core::{APP_NAME, VERSION};
use std::path::Path;

pub fn execute(verbose: bool, config: Option<&Path>) -> Result<()> {
    println!("{} {}", APP_NAME.cyan().bold(), VERSION);

    if verbose {
        println!("\nBuild Information:");
        println!("  Version: {}", VERSION);
        println!("  Target: {}", std::env::consts::ARCH);
        println!("  OS: {}", std::env::consts::OS);
        println!("  Rust Version: {}", env!("CARGO_PKG_RUST_VERSION"));
        match config {
            Some(path) => println!("  Config: {}", path.display()),
            None => println!("  Config: (defaults)"),
        }
    }

    Ok(())
}
