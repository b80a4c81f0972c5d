//! CLI argument parsing for `mirrorsel`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mirrorsel")]
#[command(about = "Choose the install type and package mirror for the target system")]
#[command(long_about = "Choose the install type and package mirror for the target system.\n\n\
    Reads a pacman-style mirror list, lets you pick a region and server, and\n\
    writes the choice into the target system's mirror list during provisioning.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Install-type step configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Installation-context file shared with later provisioning steps (JSON)
    #[arg(long, global = true)]
    pub context: Option<PathBuf>,

    /// Run in dry-run mode (no files written on the target)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List regions of a mirror list with their server counts
    Regions {
        /// Mirror-list document (defaults to the configured source path)
        #[arg(long)]
        mirrorlist: Option<PathBuf>,
    },

    /// List the servers of one region
    Servers {
        /// Mirror-list document (defaults to the configured source path)
        #[arg(long)]
        mirrorlist: Option<PathBuf>,

        /// Region name as written in the mirror list
        #[arg(long)]
        region: String,
    },

    /// Select a mirror and write it into the target mirror list
    Apply {
        /// Mirror-list document (defaults to the configured source path)
        #[arg(long)]
        mirrorlist: Option<PathBuf>,

        /// Region name as written in the mirror list
        #[arg(long)]
        region: String,

        /// Zero-based server index within the region
        #[arg(long)]
        server: Option<usize>,

        /// Request an online install (requires internet connectivity)
        #[arg(long)]
        online: bool,

        /// Rewrite the mirror list on the target system
        #[arg(long)]
        update_mirror_list: bool,

        /// Root of the target system; the configured mirror-list dir is resolved under it
        #[arg(long, conflicts_with = "target_dir")]
        root: Option<PathBuf>,

        /// Directory of the mirror list to write (overrides config)
        #[arg(long)]
        target_dir: Option<PathBuf>,

        /// File name of the mirror list to write (overrides config)
        #[arg(long)]
        target_file: Option<String>,
    },
}
