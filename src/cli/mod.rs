#![allow(clippy::doc_markdown)]

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::error::AppError;
use crate::filter::KeywordField;
use crate::tabs::ListFormat;

#[derive(Parser)]
#[command(
    name = "chrome-control",
    version,
    about = "List, close, deduplicate and focus browser tabs",
    long_about = "chrome-control drives a Chromium-family browser through its scripting \
        interface (JavaScript for Automation on macOS). It lists every open tab, closes tabs \
        by address or by keywords found in their title or URL, closes tabs whose URL is already \
        open elsewhere, and brings a given tab to the front.\n\n\
        Destructive commands ask before closing anything: on the terminal by default, in a \
        browser dialog with --ui, or not at all with --yes. The list output is a JSON \
        document in the Alfred script-filter format.",
    after_long_help = "\
QUICK START:
  # List all open tabs
  chrome-control list

  # Close duplicate tabs, asking first
  chrome-control dedup

  # Close every tab whose title contains \"Inbox\" or \"iphone - apple\", without asking
  chrome-control close --title Inbox \"iphone - apple\" --yes

  # Focus the 14th tab of the front window
  chrome-control focus 0,13

EXIT CODES:
  0  Success (also when nothing matched or the user declined)
  1  Usage error (invalid arguments, malformed tab address, config file error)
  2  Automation error (browser not running, scripting failed)

ENVIRONMENT VARIABLES:
  CHROME_CONTROL_APP     Scriptable application to control (default: Google Chrome)
  CHROME_CONTROL_CONFIG  Path to configuration file
  CHROME_CONTROL_LOG     Log filter for stderr diagnostics (e.g. debug)",
    term_width = 100
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalOpts {
    /// Ask questions and show messages with browser dialogs
    #[arg(long, global = true)]
    pub ui: bool,

    /// Answer every question with "y" (overrides --ui)
    #[arg(long, global = true)]
    pub yes: bool,

    /// Scriptable browser application to control [default: Google Chrome]
    #[arg(long, global = true, env = "CHROME_CONTROL_APP")]
    pub app: Option<String>,

    /// Path to configuration file (overrides default search)
    #[arg(long, global = true, env = "CHROME_CONTROL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log automation calls to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub output: OutputFormat,
}

#[derive(Args)]
#[group(multiple = false)]
pub struct OutputFormat {
    /// Output as compact JSON (mutually exclusive with --pretty, --plain)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as pretty-printed JSON (mutually exclusive with --json, --plain)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Output as human-readable plain text (mutually exclusive with --json, --pretty)
    #[arg(long, global = true)]
    pub plain: bool,
}

impl OutputFormat {
    /// The format flag that was given, if any.
    ///
    /// The clap group only sees flags placed before the subcommand, so the
    /// exclusion is checked again here for `list --plain --pretty`.
    ///
    /// # Errors
    ///
    /// Returns a usage error when more than one format flag is set.
    pub fn selected(&self) -> Result<Option<ListFormat>, AppError> {
        let chosen: Vec<ListFormat> = [
            (self.json, ListFormat::Json),
            (self.pretty, ListFormat::Pretty),
            (self.plain, ListFormat::Plain),
        ]
        .into_iter()
        .filter_map(|(set, format)| set.then_some(format))
        .collect();
        match chosen.as_slice() {
            [] => Ok(None),
            [format] => Ok(Some(*format)),
            _ => Err(AppError::usage(
                "--json, --pretty and --plain cannot be used together",
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List all open tabs in all windows
    #[command(
        long_about = "List every open tab, sorted by title. Tabs sharing a URL are listed once, \
            and so are tabs sharing a title. Each item carries the title, URL, window and tab \
            index, and the address to pass to close or focus (\"arg\").",
        after_long_help = "\
EXAMPLES:
  # Alfred script-filter JSON
  chrome-control list

  # Human-readable table
  chrome-control list --plain"
    )]
    List,

    /// Close duplicate tabs
    #[command(
        long_about = "Close every tab whose URL is already open in an earlier tab. Windows are \
            scanned front to back and tabs left to right; the first tab with a given URL is \
            always kept.",
        after_long_help = "\
EXAMPLES:
  # Review the duplicates, then answer y
  chrome-control dedup

  # Confirm in a browser dialog
  chrome-control dedup --ui"
    )]
    Dedup,

    /// Close a tab by address, or all tabs matching keywords
    #[command(
        long_about = "Close one tab given as WINDOW,TAB (both zero-based, as printed by list), \
            or every tab whose title (--title) or URL (--url) contains any of the given keywords, \
            ignoring case.",
        after_long_help = "\
EXAMPLES:
  # Close a specific tab in a specific window
  chrome-control close 0,13

  # Close all tabs with titles containing any of the strings
  chrome-control close --title Inbox \"iphone - apple\"

  # Close all tabs with URLs containing any of the strings
  chrome-control close --url mail.google apple"
    )]
    Close(CloseArgs),

    /// Focus a specific tab in a specific window
    #[command(
        long_about = "Bring a tab to the front: make its window visible, select the tab, raise \
            the window above the others and activate the browser. Nothing is closed, so no \
            question is asked.",
        after_long_help = "\
EXAMPLES:
  # Focus the 14th tab of the front window
  chrome-control focus 0,13"
    )]
    Focus(FocusArgs),

    /// Configuration file management
    #[command(
        long_about = "Manage the configuration file. Settings are resolved in priority order: \
            CLI flags > environment variables > config file > defaults.",
        after_long_help = "\
EXAMPLES:
  # Show the resolved configuration
  chrome-control config show

  # Create a default config file
  chrome-control config init

  # Show the active config file path
  chrome-control config path"
    )]
    Config(ConfigArgs),

    /// Generate shell completion scripts
    #[command(
        long_about = "Generate shell completion scripts for tab-completion of commands and \
            flags. Pipe the output to the appropriate file for your shell.",
        after_long_help = "\
EXAMPLES:
  # Bash
  chrome-control completions bash > /etc/bash_completion.d/chrome-control

  # Zsh
  chrome-control completions zsh > ~/.zfunc/_chrome-control

  # Fish
  chrome-control completions fish > ~/.config/fish/completions/chrome-control.fish"
    )]
    Completions(CompletionsArgs),

    /// Display man pages for chrome-control commands
    #[command(
        long_about = "Display the man page for chrome-control, or for one of its commands, in \
            roff format suitable for piping to a pager.",
        after_long_help = "\
EXAMPLES:
  # Main man page
  chrome-control man

  # Man page for the close command
  chrome-control man close | man -l -"
    )]
    Man(ManArgs),
}

/// Arguments for `close`.
#[derive(Args)]
#[command(group(
    ArgGroup::new("selector")
        .required(true)
        .args(["address", "title", "url"])
))]
pub struct CloseArgs {
    /// Tab address as WINDOW,TAB (e.g. 0,13)
    pub address: Option<String>,

    /// Close tabs whose title contains any of these keywords
    #[arg(long, num_args = 1.., value_name = "KEYWORD")]
    pub title: Vec<String>,

    /// Close tabs whose URL contains any of these keywords
    #[arg(long, num_args = 1.., value_name = "KEYWORD")]
    pub url: Vec<String>,
}

impl CloseArgs {
    /// The keyword filter, if this is a `--title`/`--url` close.
    #[must_use]
    pub fn keyword_filter(&self) -> Option<(KeywordField, &[String])> {
        if !self.title.is_empty() {
            Some((KeywordField::Title, &self.title))
        } else if !self.url.is_empty() {
            Some((KeywordField::Url, &self.url))
        } else {
            None
        }
    }
}

/// Arguments for `focus`.
#[derive(Args)]
pub struct FocusArgs {
    /// Tab address as WINDOW,TAB (e.g. 0,13)
    pub address: String,
}

/// Arguments for the `config` subcommand group.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config management subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration from all sources
    Show,

    /// Create a default config file with commented example values
    #[command(
        long_about = "Create a new configuration file with all available settings documented \
            as comments, at the platform config directory unless --path is given. Will not \
            overwrite an existing file."
    )]
    Init(ConfigInitArgs),

    /// Show the active config file path (or null if none)
    #[command(
        long_about = "Show the path of the active configuration file. Searches in priority \
            order: --config flag, $CHROME_CONTROL_CONFIG, ./.chrome-control.toml, the platform \
            config directory, ~/.chrome-control.toml."
    )]
    Path,
}

/// Arguments for `config init`.
#[derive(Args)]
pub struct ConfigInitArgs {
    /// Create config file at a custom path instead of the default location
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the `completions` subcommand.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
    pub shell: Shell,
}

/// Arguments for the `man` subcommand.
#[derive(Args)]
pub struct ManArgs {
    /// Command to display the man page for (omit for top-level)
    pub command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("chrome-control").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_are_accepted_anywhere() {
        let cli = parse(&["close", "--title", "Inbox", "iphone - apple", "--yes"]).unwrap();
        assert!(cli.global.yes);
        let Command::Close(args) = cli.command else {
            panic!("expected close");
        };
        assert_eq!(args.title, vec!["Inbox", "iphone - apple"]);

        let cli = parse(&["--ui", "dedup"]).unwrap();
        assert!(cli.global.ui);
        assert!(matches!(cli.command, Command::Dedup));
    }

    #[test]
    fn close_accepts_address() {
        let cli = parse(&["close", "0,13"]).unwrap();
        let Command::Close(args) = cli.command else {
            panic!("expected close");
        };
        assert_eq!(args.address.as_deref(), Some("0,13"));
        assert!(args.keyword_filter().is_none());
    }

    #[test]
    fn close_url_keywords_select_url_field() {
        let cli = parse(&["close", "--url", "mail.google", "apple"]).unwrap();
        let Command::Close(args) = cli.command else {
            panic!("expected close");
        };
        let (field, keywords) = args.keyword_filter().unwrap();
        assert_eq!(field, KeywordField::Url);
        assert_eq!(keywords, ["mail.google", "apple"]);
    }

    #[test]
    fn close_requires_a_selector() {
        assert!(parse(&["close"]).is_err());
        assert!(parse(&["close", "--title"]).is_err());
    }

    #[test]
    fn close_selectors_conflict() {
        assert!(parse(&["close", "0,1", "--title", "x"]).is_err());
        assert!(parse(&["close", "--title", "x", "--url", "y"]).is_err());
    }

    #[test]
    fn focus_requires_exactly_one_address() {
        assert!(parse(&["focus"]).is_err());
        assert!(parse(&["focus", "0,1", "0,2"]).is_err());
        assert!(parse(&["focus", "0,1"]).is_ok());
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(parse(&["reopen"]).is_err());
        assert!(parse(&[]).is_err());
    }

    fn format_of(args: &[&str]) -> Result<Option<ListFormat>, String> {
        let cli = parse(args).map_err(|e| e.to_string())?;
        cli.global.output.selected().map_err(|e| e.to_string())
    }

    #[test]
    fn output_formats_are_exclusive() {
        assert!(format_of(&["--plain", "--pretty", "list"]).is_err());
        assert!(format_of(&["list", "--plain", "--pretty"]).is_err());
        assert!(format_of(&["--json", "list", "--plain"]).is_err());
        assert_eq!(format_of(&["list", "--plain"]), Ok(Some(ListFormat::Plain)));
        assert_eq!(format_of(&["--pretty", "list"]), Ok(Some(ListFormat::Pretty)));
        assert_eq!(format_of(&["list"]), Ok(None));
    }
}
