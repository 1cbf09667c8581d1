//! CLI Module
//!
//! Command-line interface for the Narrative project store.

pub mod commands;
pub mod shell;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ROOT_ENV_VAR;
use crate::state::Category;

/// Narrative - catalog characters, locations, props and clothing per project
#[derive(Parser, Debug)]
#[command(name = "narrative")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store root holding one directory per project
    #[arg(long, global = true, env = ROOT_ENV_VAR)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where resource text comes from. Falls back to stdin when neither is given.
#[derive(clap::Args, Debug, Clone)]
pub struct ContentSource {
    /// Inline content
    #[arg(short, long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read content from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all projects
    #[command(name = "projects")]
    Projects,

    /// Create a new project
    #[command(name = "new-project")]
    NewProject { name: String },

    /// Rename a project
    #[command(name = "rename-project")]
    RenameProject { old: String, new: String },

    /// Delete a project and all its resources
    #[command(name = "delete-project")]
    DeleteProject {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List resources of a project
    #[command(name = "list")]
    List {
        project: String,

        /// Only this category
        category: Option<Category>,
    },

    /// Create a resource
    #[command(name = "add")]
    Add {
        project: String,
        category: Category,
        name: String,

        #[command(flatten)]
        source: ContentSource,
    },

    /// Print a resource's content
    #[command(name = "show")]
    Show {
        project: String,
        category: Category,
        name: String,
    },

    /// Replace a resource's content
    #[command(name = "update")]
    Update {
        project: String,
        category: Category,
        name: String,

        #[command(flatten)]
        source: ContentSource,
    },

    /// Rename a resource
    #[command(name = "rename")]
    Rename {
        project: String,
        category: Category,
        old: String,
        new: String,
    },

    /// Delete a resource
    #[command(name = "delete")]
    Delete {
        project: String,
        category: Category,
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Concatenate resources (given as category/name) into a remix
    #[command(name = "remix")]
    Remix {
        project: String,

        #[arg(required = true)]
        items: Vec<String>,

        /// Export the remix to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the remix to the system clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Interactive session with preview and remix buffers
    #[command(name = "shell")]
    Shell {
        /// Project to open on start
        project: Option<String>,
    },
}
