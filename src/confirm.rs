use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::browser::{Browser, DialogResponse};
use crate::console::Console;
use crate::error::AppError;
use crate::tabs::Tab;

/// How questions and feedback reach the user for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Print to stdout and read the answer from stdin.
    #[default]
    Cli,
    /// Use the browser's alert and dialog windows.
    Ui,
    /// Approve everything without asking.
    Yes,
}

impl Mode {
    /// Resolve the mode from the `--ui`/`--yes` flags; `--yes` wins when both are set.
    #[must_use]
    pub fn from_flags(ui: bool, yes: bool, default: Self) -> Self {
        if yes {
            Self::Yes
        } else if ui {
            Self::Ui
        } else {
            default
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Ui => write!(f, "ui"),
            Self::Yes => write!(f, "yes"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" => Ok(Self::Cli),
            "ui" => Ok(Self::Ui),
            "yes" => Ok(Self::Yes),
            other => Err(format!("unknown confirm mode '{other}' (expected cli, ui or yes)")),
        }
    }
}

/// Question asked before a destructive command, and what to say when there is nothing to do.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    pub question: &'static str,
    pub empty: &'static str,
}

pub const CLOSE_ONE: Prompt = Prompt {
    question: "Close this tab?",
    empty: "Couldn't find any matching tabs",
};

pub const CLOSE_MANY: Prompt = Prompt {
    question: "Close these tabs?",
    empty: "Couldn't find any matching tabs",
};

pub const CLOSE_DUPLICATES: Prompt = Prompt {
    question: "Close these duplicates?",
    empty: "No duplicates found",
};

/// Outcome of the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead with the command.
    Proceed,
    /// No candidates; the empty-set message was shown.
    NothingToDo,
    /// The user declined; `Canceled` was printed.
    Canceled,
}

/// Ask the user whether the command may act on `tabs`.
///
/// `Yes` mode never blocks. `Cli` mode accepts exactly `y` (after trimming).
/// `Ui` mode shows one OK/Cancel dialog listing the titles.
///
/// # Errors
///
/// Returns `AppError` if writing the question, reading the answer or showing
/// a browser dialog fails.
pub fn are_you_sure(
    browser: &mut dyn Browser,
    console: &mut dyn Console,
    mode: Mode,
    tabs: &[&Tab],
    prompt: Prompt,
) -> Result<Decision, AppError> {
    if tabs.is_empty() {
        match mode {
            Mode::Ui => browser.alert(prompt.empty)?,
            Mode::Cli | Mode::Yes => console.println(prompt.empty)?,
        }
        return Ok(Decision::NothingToDo);
    }

    let titles = tabs
        .iter()
        .map(|tab| tab.title.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let approved = match mode {
        Mode::Yes => true,
        Mode::Ui => {
            let response = browser.dialog(&format!("{}\n\n{titles}", prompt.question))?;
            response == DialogResponse::Ok
        }
        Mode::Cli => {
            console.println(&format!("\n{titles}"))?;
            console.println(&format!("\n{} (y/N)", prompt.question))?;
            let answer = console.read_line()?;
            answer.trim() == "y"
        }
    };
    debug!(%mode, candidates = tabs.len(), approved, "confirmation");

    if approved {
        Ok(Decision::Proceed)
    } else {
        console.println("Canceled")?;
        Ok(Decision::Canceled)
    }
}
