//! zippack CLI - selection-based zip archiving
//!
//! Usage:
//!   zippack pack <root> <entries>...    Bundle selected entries into <base>_archive.zip
//!   zippack unpack <root> <files>...    Unpack .zip files in place and delete them
//!   zippack list <container>            List container entries in stored order

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zippack::output;

#[derive(Parser)]
#[command(name = "zippack")]
#[command(about = "Bundle and unpack zip archives inside a managed directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create <base>_archive.zip from selected entries under a root directory
    Pack {
        /// Root directory the selection lives under
        root: PathBuf,

        /// Relative names of the selected entries
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Extract .zip files under a root directory, deleting each consumed archive
    Unpack {
        /// Directory holding the archives; also the extraction destination
        root: PathBuf,

        /// File names to consider; anything not ending in .zip is skipped
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List the entries of a container without extracting
    List {
        /// Path to the container file
        container: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pack { root, entries } => {
            let pb = output::spinner(&format!("packing {}", root.display()));
            let result = zippack::build(&root, &entries);
            output::progress_done(pb);

            let name = result.with_context(|| format!("pack failed for {}", root.display()))?;
            output::success(&format!("Archive created successfully: {name}"));
        }
        Commands::Unpack { root, files } => {
            let pb = output::spinner(&format!("unpacking into {}", root.display()));
            let result = zippack::extract_batch(&root, &files);
            output::progress_done(pb);

            let extracted =
                result.with_context(|| format!("unpack failed in {}", root.display()))?;
            if extracted == 0 {
                output::detail("no matching archives");
            } else {
                output::success(&format!(
                    "Archive extracted successfully ({extracted} file{})",
                    if extracted == 1 { "" } else { "s" }
                ));
            }
        }
        Commands::List { container } => {
            let names = zippack::list(&container)
                .with_context(|| format!("cannot read {}", container.display()))?;
            output::action(&format!("{} entries", names.len()));
            for name in names {
                println!("{name}");
            }
        }
    }

    Ok(())
}
