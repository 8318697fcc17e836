// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Directory holding the local backend's data (optional)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a TOML config file (optional)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Register a new user and sign in
    SignUp {
        #[arg(value_name = "USERNAME")]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in and remember the session
    SignIn {
        #[arg(value_name = "USERNAME")]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    SignOut,

    /// List notes with ID, name and first line of the description
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render all notes as a page and open it in the browser
    View,

    /// Create a note, optionally with an image
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short = 'D', long)]
        description: String,

        /// Image file to attach
        #[arg(short, long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },
}
