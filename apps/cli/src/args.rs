//! Command-line argument definitions.

use chub::domain::identity::Role;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Sandbox for the CourseHub rules engine")]
pub(crate) struct Cli {
    /// Configuration file (TOML, YAML or JSON). Defaults to an optional `chub.*` file.
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Overrides `logging.level` from the configuration (e.g. `off`, `debug`).
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// List the courses of a JSON catalog as a given visitor would see them
    Courses(CoursesArgs),
    /// Check whether a file may be uploaded
    Upload {
        /// File name, including its extension
        filename: String,
        /// File size in bytes
        size: u64,
        /// Validate against the course material cap instead of the general cap
        #[arg(long)]
        material: bool,
    },
    /// Check a password against the sign-up policy
    Password {
        password: String,
        /// Confirmation field; defaults to the password itself
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct CoursesArgs {
    /// Path to a JSON array of courses
    #[arg(long)]
    pub(crate) catalog: PathBuf,

    /// Browse as this signed-in user; anonymous when omitted
    #[arg(long)]
    pub(crate) email: Option<String>,

    /// Role of the signed-in user
    #[arg(long, default_value = "student", requires = "email")]
    pub(crate) role: Role,

    /// Course ids bookmarked by the signed-in user before listing
    #[arg(long = "bookmark", requires = "email")]
    pub(crate) bookmarks: Vec<String>,

    /// Case-insensitive title search
    #[arg(long)]
    pub(crate) search: Option<String>,

    #[arg(long)]
    pub(crate) category: Option<String>,

    /// One-indexed page number
    #[arg(long)]
    pub(crate) page: Option<usize>,

    #[arg(long)]
    pub(crate) page_size: Option<usize>,
}
