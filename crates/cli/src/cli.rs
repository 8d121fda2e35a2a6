use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Import plain-text playlists into the media catalog and dump it back.
#[derive(Debug, Parser)]
#[command(name = "playlistreader", version)]
pub struct Cli {
    /// Configuration file (default: $PLAYLISTREADER_CONFIG or playlistreader.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog database, overrides database.path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a playlist from a file with one absolute path per line
    Import {
        /// Playlist file
        file: PathBuf,

        /// Playlist name (default: file name without extension)
        #[arg(long)]
        name: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the path of every music item, sorted, one per line
    Dump {
        /// Output file, `-` for stdout (default: dump.default_filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Register media items in the catalog
    Add {
        /// Absolute paths of the items
        #[arg(required = true)]
        paths: Vec<String>,

        /// Register the items as non-music media
        #[arg(long)]
        not_music: bool,
    },
}
