//! Renders the `fragwire(1)` man page from the demo's clap definition.
//!
//! The page lands in `target/generated-man/`, named after the command so a
//! rename in `src/cli.rs` carries through.

use std::{error::Error, fs, path::Path};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

const MAN_DIR: &str = "target/generated-man";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let command = cli::Cli::command();
    let page = format!("{}.1", command.get_name());

    let mut rendered = Vec::new();
    Man::new(command).render(&mut rendered)?;

    let dir = Path::new(MAN_DIR);
    fs::create_dir_all(dir)?;
    fs::write(dir.join(page), rendered)?;
    Ok(())
}
