use std::fmt;

use serde::Serialize;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    AutomationError = 2,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::GeneralError => write!(f, "general error"),
            Self::AutomationError => write!(f, "automation error"),
        }
    }
}

/// What went wrong, which decides the exit code and whether usage is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing arguments.
    Usage,
    /// A window/tab address that is not two integers.
    Parse,
    /// The browser scripting bridge failed.
    Automation,
    /// Config file could not be read or written.
    Config,
    /// Writing to stdout or reading from stdin failed.
    Io,
}

#[derive(Debug)]
pub struct AppError {
    pub message: String,
    pub kind: ErrorKind,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self {
            message: format!("I/O error: {e}"),
            kind: ErrorKind::Io,
        }
    }
}

impl AppError {
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Usage,
        }
    }

    #[must_use]
    pub fn invalid_address(arg: &str) -> Self {
        Self {
            message: format!("Invalid window and tab index '{arg}'. Example: 0,13"),
            kind: ErrorKind::Parse,
        }
    }

    #[must_use]
    pub fn non_integer_address(arg: &str) -> Self {
        Self {
            message: format!("winIdx and tabIdx must be integers, got '{arg}'"),
            kind: ErrorKind::Parse,
        }
    }

    #[must_use]
    pub fn unknown_man_page(command: &str) -> Self {
        Self {
            message: format!(
                "unknown command '{command}'. Run 'chrome-control --help' to list commands."
            ),
            kind: ErrorKind::Usage,
        }
    }

    #[must_use]
    pub fn code(&self) -> ExitCode {
        match self.kind {
            ErrorKind::Automation => ExitCode::AutomationError,
            ErrorKind::Usage | ErrorKind::Parse | ErrorKind::Config | ErrorKind::Io => {
                ExitCode::GeneralError
            }
        }
    }

    /// Usage and parse errors are followed by the usage line on stderr.
    #[must_use]
    pub fn shows_usage(&self) -> bool {
        matches!(self.kind, ErrorKind::Usage | ErrorKind::Parse)
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        let output = ErrorOutput {
            error: &self.message,
            code: self.code() as u8,
        };
        serde_json::to_string(&output).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"{}","code":{}}}"#,
                self.message,
                self.code() as u8
            )
        })
    }

    pub fn print_json_stderr(&self) {
        eprintln!("{}", self.to_json());
    }
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    error: &'a str,
    code: u8,
}
