use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediacat")]
#[command(author, version, about = "Catalog movies and series: add, rate and query")]
pub struct Cli {
    /// Path to config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding database.path from the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Identifies one catalog entry. `--id` wins when both are given.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Media ID
    #[arg(long)]
    pub id: Option<String>,

    /// Exact title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Add a movie or series
    Add {
        #[arg(long)]
        title: String,

        /// Release year
        #[arg(long)]
        year: i32,

        /// movie or series
        #[arg(long)]
        kind: String,

        #[arg(long)]
        genre: Option<String>,

        /// Rating from 0 to 10
        #[arg(long)]
        rating: Option<f64>,

        /// Mark as already watched
        #[arg(long)]
        watched: bool,
    },

    /// List media with filters, sorting and pagination
    List {
        /// Case-insensitive title substring
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        year_from: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        year_to: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        rating_min: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        rating_max: Option<f64>,

        /// true or false
        #[arg(long)]
        watched: Option<bool>,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        page_size: i64,

        /// title, releaseYear, rating, createdAt or updatedAt
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long)]
        descending: bool,
    },

    /// Rate a movie or series
    Rate {
        /// Rating from 0 to 10
        #[arg(long, allow_negative_numbers = true)]
        rating: f64,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Replace title, year, kind and genre
    Update {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        new_title: String,

        #[arg(long)]
        year: i32,

        #[arg(long)]
        kind: String,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Mark a movie or series as watched
    Watched {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Serve the catalog as MCP tools on stdin/stdout
    Mcp,

    /// Display version information
    Version,
}
