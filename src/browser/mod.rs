mod error;
#[cfg(any(test, feature = "test-support"))]
mod fake;
mod jxa;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AppError;

pub use error::AutomationError;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{Call, FakeBrowser};
pub use jxa::{DEFAULT_APPLICATION, JxaBrowser};

/// Position of a tab: zero-based window index (front to back) and tab index within it.
///
/// Addresses are only meaningful against the snapshot they were read from;
/// any close or focus can shift them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabRef {
    pub window: usize,
    pub tab: usize,
}

impl fmt::Display for TabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.window, self.tab)
    }
}

impl FromStr for TabRef {
    type Err = AppError;

    /// Parse `winIdx,tabIdx`, e.g. `0,13`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        let [window, tab] = parts.as_slice() else {
            return Err(AppError::invalid_address(s));
        };
        match (window.trim().parse(), tab.trim().parse()) {
            (Ok(window), Ok(tab)) => Ok(Self { window, tab }),
            _ => Err(AppError::non_integer_address(s)),
        }
    }
}

/// Title and URL of one tab as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TabProps {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl TabProps {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Button the user pressed in a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Ok,
    Cancel,
}

/// The scriptable browser application.
///
/// Every method is one round trip to the application; nothing is cached
/// between calls.
pub trait Browser {
    /// Tabs of every window, windows front to back, tabs left to right.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the application cannot be scripted.
    fn windows(&mut self) -> Result<Vec<Vec<TabProps>>, AutomationError>;

    /// Close the tab at `tab`.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the tab does not exist or the call fails.
    fn close_tab(&mut self, tab: TabRef) -> Result<(), AutomationError>;

    /// Make window `window` visible (un-minimize it).
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the window does not exist or the call fails.
    fn show_window(&mut self, window: usize) -> Result<(), AutomationError>;

    /// Point the owning window's active tab at `tab`.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the tab does not exist or the call fails.
    fn set_active_tab(&mut self, tab: TabRef) -> Result<(), AutomationError>;

    /// Move window `window` in front of the application's other windows.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the window does not exist or the call fails.
    fn raise_window(&mut self, window: usize) -> Result<(), AutomationError>;

    /// Bring the application to the foreground.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the call fails.
    fn activate(&mut self) -> Result<(), AutomationError>;

    /// Show `message` in an alert owned by the application.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the alert cannot be shown.
    fn alert(&mut self, message: &str) -> Result<(), AutomationError>;

    /// Show `message` in an OK/Cancel dialog and report the button pressed.
    ///
    /// # Errors
    ///
    /// Returns `AutomationError` if the dialog cannot be shown.
    fn dialog(&mut self, message: &str) -> Result<DialogResponse, AutomationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parse_address() {
        let tab: TabRef = "0,13".parse().unwrap();
        assert_eq!(tab, TabRef { window: 0, tab: 13 });
    }

    #[test]
    fn parse_address_trims_components() {
        let tab: TabRef = " 2, 4 ".parse().unwrap();
        assert_eq!(tab, TabRef { window: 2, tab: 4 });
    }

    #[test]
    fn parse_address_rejects_non_integers() {
        let err = "abc,1".parse::<TabRef>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.message.contains("integers"));
    }

    #[test]
    fn parse_address_rejects_negative_index() {
        let err = "-1,0".parse::<TabRef>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn parse_address_rejects_wrong_arity() {
        for input in ["13", "0,1,2", "", "0;13"] {
            let err = input.parse::<TabRef>().unwrap_err();
            assert_eq!(err.kind, ErrorKind::Parse, "input {input:?}");
            assert!(err.message.contains("Example: 0,13"), "input {input:?}");
        }
    }

    #[test]
    fn address_display_matches_parse_format() {
        let tab = TabRef { window: 3, tab: 0 };
        assert_eq!(tab.to_string(), "3,0");
    }

    #[test]
    fn addresses_order_by_window_then_tab() {
        let mut tabs = vec![
            TabRef { window: 1, tab: 0 },
            TabRef { window: 0, tab: 5 },
            TabRef { window: 0, tab: 2 },
        ];
        tabs.sort();
        assert_eq!(
            tabs,
            vec![
                TabRef { window: 0, tab: 2 },
                TabRef { window: 0, tab: 5 },
                TabRef { window: 1, tab: 0 },
            ]
        );
    }

    #[test]
    fn tab_props_tolerate_missing_title() {
        let props: TabProps = serde_json::from_str(r#"{"url":"https://a.test"}"#).unwrap();
        assert_eq!(props.title, "");
        assert_eq!(props.url, "https://a.test");
    }
}
