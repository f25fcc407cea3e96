//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--root <path>`: Store root (overrides settings)
//! - `--scheme <name>`: Storage scheme (overrides settings)
//! - `--policy <kind>`: Version ordering (overrides settings)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//!
//! # Locations
//!
//! Locations are written relative to the version root, e.g. `teamA/db`.
//! The root node is written as `/` or the empty string.

use clap::{Parser, Subcommand};

use crate::core::version::PolicyKind;

/// cfgstore - Read-only browser for versioned hierarchical configuration
#[derive(Parser, Debug)]
#[command(name = "cfgstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store root holding one directory per version
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<String>,

    /// Storage scheme (file)
    #[arg(long, global = true, value_name = "NAME")]
    pub scheme: Option<String>,

    /// Ordering used to select the current version
    #[arg(long, global = true, value_enum)]
    pub policy: Option<PolicyKind>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current version
    #[command(
        name = "version",
        long_about = "Print the version selected as current.\n\n\
            The current version is the maximal container directly under the store \
            root, according to the version policy. It is selected once when the \
            store is opened.",
        after_help = "\
EXAMPLES:
    cfgstore --root /srv/configs version
    cfgstore --root /srv/configs --policy lexicographic version"
    )]
    Version,

    /// Print the parent of a node
    #[command(
        name = "parent",
        long_about = "Print the parent location of a node.\n\n\
            The parent is derived from the path alone and is not checked for \
            existence. The root has no parent and prints nothing."
    )]
    Parent {
        /// Node location
        location: String,
    },

    /// List the child nodes of a node
    #[command(
        name = "children",
        long_about = "List the child nodes of a node, one per line.\n\n\
            Only containers are nodes. Payload and include files are never listed."
    )]
    Children {
        /// Node location (defaults to the root)
        location: Option<String>,
    },

    /// List the imports of a node
    #[command(
        name = "imports",
        long_about = "List the valid imports declared by a node's include file.\n\n\
            Lines that are malformed or name something other than an existing node \
            are dropped. Use --explain to see why.",
        after_help = "\
EXAMPLES:
    # Valid import targets
    cfgstore imports teamA

    # Also show dropped lines and the reason for each
    cfgstore imports teamA --explain"
    )]
    Imports {
        /// Node location (defaults to the root)
        location: Option<String>,

        /// Also report dropped include lines
        #[arg(long)]
        explain: bool,
    },

    /// Show the own configuration of a node
    #[command(
        name = "show",
        long_about = "Print the node's own configuration, with substitutions resolved.\n\n\
            Imports are not merged in. A node without a payload prints an empty \
            configuration."
    )]
    Show {
        /// Node location (defaults to the root)
        location: Option<String>,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Print the node hierarchy with import edges
    #[command(name = "tree")]
    Tree {
        /// Node location (defaults to the root)
        location: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    cfgstore completion bash > ~/.local/share/bash-completion/completions/cfgstore
    cfgstore completion zsh > ~/.zfunc/_cfgstore
    cfgstore completion fish > ~/.config/fish/completions/cfgstore.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
