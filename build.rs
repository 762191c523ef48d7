//! Build script for the `backupstore` manual pages.
//!
//! Renders `backupstore.1` plus one page per subcommand
//! (`backupstore-list.1`, `backupstore-inspect.1`) into the build output
//! directory for packaging.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = PathBuf::from(
        env::var_os("OUT_DIR")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))?,
    );

    let command = Cli::command();
    let prefix = command.get_name().to_owned();
    render_page(command.clone(), &out_dir.join(format!("{prefix}.1")))?;
    for subcommand in command.get_subcommands() {
        let page_name = format!("{prefix}-{}", subcommand.get_name());
        let page = subcommand.clone().name(page_name.clone());
        render_page(page, &out_dir.join(format!("{page_name}.1")))?;
    }

    Ok(())
}

fn render_page(command: clap::Command, target: &Path) -> io::Result<()> {
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;
    fs::write(target, buffer)
}
