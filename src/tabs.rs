use std::fmt::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::browser::{AutomationError, Browser, TabRef};
use crate::cli::{CloseArgs, Command};
use crate::confirm::{self, Decision, Mode, Prompt};
use crate::console::Console;
use crate::error::AppError;
use crate::filter::{self, KeywordField};

/// Shown in listings for tabs without a title.
const UNTITLED: &str = "No Title";

/// One tab from a snapshot of the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub title: String,
    pub url: String,
    pub address: TabRef,
}

impl Tab {
    /// The title, or a placeholder when the page has none.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// Read every tab of every window, front window first.
///
/// The result is a snapshot for the current command only.
///
/// # Errors
///
/// Returns `AutomationError` if the browser cannot be queried.
pub fn enumerate(browser: &mut dyn Browser) -> Result<Vec<Tab>, AutomationError> {
    let windows = browser.windows()?;
    let tabs: Vec<Tab> = windows
        .into_iter()
        .enumerate()
        .flat_map(|(window, tabs)| {
            tabs.into_iter().enumerate().map(move |(tab, props)| Tab {
                title: props.title,
                url: props.url,
                address: TabRef { window, tab },
            })
        })
        .collect();
    debug!(count = tabs.len(), "snapshot taken");
    Ok(tabs)
}

// =============================================================================
// Session
// =============================================================================

/// How `list` renders its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    #[default]
    Json,
    Pretty,
    Plain,
}

impl ListFormat {
    /// Pick the format from the `--json/--pretty/--plain` flags, else `default`.
    ///
    /// # Errors
    ///
    /// Returns a usage error when more than one format flag is set.
    pub fn from_flags(
        output: &crate::cli::OutputFormat,
        default: Self,
    ) -> Result<Self, AppError> {
        Ok(output.selected()?.unwrap_or(default))
    }
}

impl fmt::Display for ListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "plain" => Ok(Self::Plain),
            other => Err(format!(
                "unknown output format '{other}' (expected json, pretty or plain)"
            )),
        }
    }
}

/// Everything one invocation of a tab command works with.
pub struct Session<'a> {
    pub browser: &'a mut dyn Browser,
    pub console: &'a mut dyn Console,
    pub mode: Mode,
    pub format: ListFormat,
}

impl<'a> Session<'a> {
    pub fn new(browser: &'a mut dyn Browser, console: &'a mut dyn Console, mode: Mode) -> Self {
        Self {
            browser,
            console,
            mode,
            format: ListFormat::default(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: ListFormat) -> Self {
        self.format = format;
        self
    }

    fn confirm(&mut self, tabs: &[&Tab], prompt: Prompt) -> Result<Decision, AppError> {
        confirm::are_you_sure(self.browser, self.console, self.mode, tabs, prompt)
    }

    /// Ask, then close `tabs` if approved.
    fn confirm_and_close(&mut self, tabs: &[&Tab], prompt: Prompt) -> Result<(), AppError> {
        if self.confirm(tabs, prompt)? != Decision::Proceed {
            return Ok(());
        }
        for address in close_order(tabs) {
            info!(%address, "closing tab");
            self.browser.close_tab(address)?;
        }
        Ok(())
    }
}

/// Addresses to close, last first, so earlier closes never shift later targets.
fn close_order(tabs: &[&Tab]) -> Vec<TabRef> {
    let mut addresses: Vec<TabRef> = tabs.iter().map(|tab| tab.address).collect();
    addresses.sort_unstable_by(|a, b| b.cmp(a));
    addresses.dedup();
    addresses
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run one of the tab commands (`list`, `dedup`, `close`, `focus`).
///
/// # Errors
///
/// Returns `AppError` on a malformed address, a browser failure, or when
/// called with a command that does not operate on tabs.
pub fn execute(session: &mut Session<'_>, command: &Command) -> Result<(), AppError> {
    match command {
        Command::List => execute_list(session),
        Command::Dedup => execute_dedup(session),
        Command::Close(args) => execute_close(session, args),
        Command::Focus(args) => execute_focus(session, &args.address),
        Command::Config(_) | Command::Completions(_) | Command::Man(_) => Err(AppError::usage(
            "not a tab command: expected list, dedup, close or focus",
        )),
    }
}

// =============================================================================
// Output types
// =============================================================================

/// One entry of the Alfred script-filter listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListItem {
    title: String,
    url: String,
    win_idx: usize,
    tab_idx: usize,
    arg: String,
    subtitle: String,
}

impl From<&Tab> for ListItem {
    fn from(tab: &Tab) -> Self {
        Self {
            title: tab.display_title().to_string(),
            url: tab.url.clone(),
            win_idx: tab.address.window,
            tab_idx: tab.address.tab,
            arg: tab.address.to_string(),
            subtitle: tab.url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Listing {
    items: Vec<ListItem>,
}

fn format_plain_table(items: &[ListItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<7} {:<40} URL", "ADDR", "TITLE");
    for item in items {
        let title: String = item.title.chars().take(40).collect();
        let _ = writeln!(out, "  {:<7} {title:<40} {}", item.arg, item.url);
    }
    out
}

fn render_listing(listing: &Listing, format: ListFormat) -> Result<String, AppError> {
    let rendered = match format {
        ListFormat::Plain => return Ok(format_plain_table(&listing.items)),
        ListFormat::Pretty => serde_json::to_string_pretty(listing),
        ListFormat::Json => serde_json::to_string(listing),
    };
    rendered.map_err(|e| AppError {
        message: format!("serialization error: {e}"),
        kind: crate::error::ErrorKind::Io,
    })
}

// =============================================================================
// Subcommand handlers
// =============================================================================

/// Print every tab, one per URL and per title, sorted by title.
///
/// # Errors
///
/// Returns `AppError` if the browser cannot be queried or stdout fails.
pub fn execute_list(session: &mut Session<'_>) -> Result<(), AppError> {
    let tabs = enumerate(session.browser)?;
    let listing = Listing {
        items: filter::collapse_for_listing(&tabs)
            .into_iter()
            .map(ListItem::from)
            .collect(),
    };
    let rendered = render_listing(&listing, session.format)?;
    session.console.println(rendered.trim_end_matches('\n'))?;
    Ok(())
}

/// Close every tab whose URL is open in an earlier tab.
///
/// # Errors
///
/// Returns `AppError` if the browser cannot be queried or a close fails.
pub fn execute_dedup(session: &mut Session<'_>) -> Result<(), AppError> {
    let tabs = enumerate(session.browser)?;
    let dups = filter::duplicates(&tabs);
    debug!(count = dups.len(), "duplicates found");
    session.confirm_and_close(&dups, confirm::CLOSE_DUPLICATES)
}

/// Close one addressed tab, or every tab matching the keyword filter.
///
/// # Errors
///
/// Returns `AppError` on a malformed address, or if the browser fails.
pub fn execute_close(session: &mut Session<'_>, args: &CloseArgs) -> Result<(), AppError> {
    if let Some((field, keywords)) = args.keyword_filter() {
        return close_by_keyword(session, field, keywords);
    }
    match &args.address {
        Some(address) => close_by_address(session, address),
        None => Err(AppError::usage(
            "close needs a WINDOW,TAB address or --title/--url keywords",
        )),
    }
}

fn close_by_address(session: &mut Session<'_>, address: &str) -> Result<(), AppError> {
    let target: TabRef = address.parse()?;
    let tabs = enumerate(session.browser)?;
    let matched: Vec<&Tab> = tabs.iter().filter(|tab| tab.address == target).collect();
    session.confirm_and_close(&matched, confirm::CLOSE_ONE)
}

fn close_by_keyword(
    session: &mut Session<'_>,
    field: KeywordField,
    keywords: &[String],
) -> Result<(), AppError> {
    let tabs = enumerate(session.browser)?;
    let matched = filter::select_by_keywords(&tabs, field, keywords);
    debug!(?field, ?keywords, count = matched.len(), "keyword matches");
    session.confirm_and_close(&matched, confirm::CLOSE_MANY)
}

/// Bring the addressed tab and its window to the front.
///
/// # Errors
///
/// Returns `AppError` on a malformed address, or if the browser fails.
pub fn execute_focus(session: &mut Session<'_>, address: &str) -> Result<(), AppError> {
    let target: TabRef = address.parse()?;
    debug!(%target, "focusing tab");
    session.browser.show_window(target.window)?;
    session.browser.set_active_tab(target)?;
    session.browser.raise_window(target.window)?;
    session.browser.activate()?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
