use std::fmt;

use super::TabRef;

/// Errors raised by the browser scripting bridge.
#[derive(Debug)]
pub enum AutomationError {
    /// The `osascript` process could not be started.
    Spawn(std::io::Error),

    /// The script ran but exited unsuccessfully (application missing, permission denied, ...).
    ScriptFailed(String),

    /// The script's output could not be understood.
    InvalidResponse(String),

    /// The addressed window or tab does not exist.
    NoSuchTab(TabRef),

    /// Scripting the browser is not possible on this platform.
    Unsupported,
}

impl fmt::Display for AutomationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to run osascript: {e}"),
            Self::ScriptFailed(msg) => write!(f, "automation script failed: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "unexpected automation response: {msg}"),
            Self::NoSuchTab(tab) => write!(f, "no tab at window {} index {}", tab.window, tab.tab),
            Self::Unsupported => write!(
                f,
                "browser scripting requires macOS (JavaScript for Automation via osascript)"
            ),
        }
    }
}

impl std::error::Error for AutomationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AutomationError {
    fn from(e: std::io::Error) -> Self {
        Self::Spawn(e)
    }
}

impl From<serde_json::Error> for AutomationError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

impl From<AutomationError> for crate::error::AppError {
    fn from(e: AutomationError) -> Self {
        Self {
            message: e.to_string(),
            kind: crate::error::ErrorKind::Automation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ExitCode};

    #[test]
    fn display_script_failed() {
        let err = AutomationError::ScriptFailed("Application isn't running. (-600)".into());
        assert_eq!(
            err.to_string(),
            "automation script failed: Application isn't running. (-600)"
        );
    }

    #[test]
    fn display_no_such_tab() {
        let err = AutomationError::NoSuchTab(TabRef { window: 1, tab: 7 });
        assert_eq!(err.to_string(), "no tab at window 1 index 7");
    }

    #[test]
    fn display_unsupported_mentions_macos() {
        assert!(AutomationError::Unsupported.to_string().contains("macOS"));
    }

    #[test]
    fn json_error_becomes_invalid_response() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = AutomationError::from(json_err);
        assert!(matches!(err, AutomationError::InvalidResponse(_)));
    }

    #[test]
    fn error_source_returns_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no osascript");
        let err: &dyn std::error::Error = &AutomationError::Spawn(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn error_source_is_none_for_script_failure() {
        let err: &dyn std::error::Error = &AutomationError::ScriptFailed("boom".into());
        assert!(err.source().is_none());
    }

    #[test]
    fn converts_to_automation_exit_code() {
        let err: AppError = AutomationError::ScriptFailed("boom".into()).into();
        assert_eq!(err.code(), ExitCode::AutomationError);
        assert!(err.message.contains("boom"));
    }
}
