//! Packaging artifacts under `$OUT_DIR`:
//!
//! - `man/stockroom.1` plus one page per command group (`stockroom-products.1`, ...).
//!   Leaf commands are documented on their group's page.
//! - `completions/` scripts for bash, zsh, and fish.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

#[path = "src/cli.rs"]
mod cli;

const BIN: &str = "stockroom";

/// Command groups without a page of their own.
const NO_PAGE: &[&str] = &["completions", "help"];

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .ok_or_else(|| io::Error::other("OUT_DIR not set by Cargo"))?
        .into();

    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir)?;
    let root = cli::Cli::command();
    write_page(&root, BIN, &man_dir)?;
    for group in root.get_subcommands() {
        let name = group.get_name();
        if group.is_hide_set() || NO_PAGE.contains(&name) {
            continue;
        }
        let page = format!("{BIN}-{name}");
        write_page(&group.clone().name(page.clone()), &page, &man_dir)?;
    }

    let completions_dir = out_dir.join("completions");
    std::fs::create_dir_all(&completions_dir)?;
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        clap_complete::generate_to(shell, &mut cli::Cli::command(), BIN, &completions_dir)?;
    }

    Ok(())
}

fn write_page(cmd: &clap::Command, page: &str, dir: &Path) -> io::Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buf)?;
    std::fs::write(dir.join(format!("{page}.1")), buf)
}
