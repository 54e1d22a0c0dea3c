// Library target exposes the dispatcher and its collaborators to integration
// tests and xtask. The binary entry point is in main.rs.

pub mod browser;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod console;
pub mod error;
pub mod filter;
pub mod tabs;

/// The clap command tree, for man page and completion generation.
#[must_use]
pub fn command() -> clap::Command {
    <cli::Cli as clap::CommandFactory>::command()
}
