use tracing::debug;

use super::{AutomationError, Browser, DialogResponse, TabProps, TabRef};

/// Application scripted when neither `--app` nor the config file names one.
pub const DEFAULT_APPLICATION: &str = "Google Chrome";

/// AppleEvent error number raised when the user presses Cancel in a dialog.
const USER_CANCELED: i32 = -128;

/// Scripts a Chromium-family browser through JavaScript for Automation.
///
/// Each call spawns `osascript -l JavaScript` with a small script; the
/// script's last expression is written to stdout and parsed here.
#[derive(Debug, Clone)]
pub struct JxaBrowser {
    application: String,
}

impl JxaBrowser {
    #[must_use]
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
        }
    }

    #[must_use]
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Prefix `body` with a binding of `app` to the target application.
    fn script(&self, body: &str) -> String {
        format!(
            "const app = Application({});\napp.includeStandardAdditions = true;\n{body}",
            js_string(&self.application)
        )
    }

    fn run(&self, body: &str) -> Result<String, AutomationError> {
        let script = self.script(body);
        debug!(app = %self.application, script_len = script.len(), "running JXA script");
        run_osascript(&script)
    }

    /// Run a script that answers `"ok"` or `"missing"`, mapping the latter to `NoSuchTab`.
    fn run_addressed(&self, body: &str, tab: TabRef) -> Result<(), AutomationError> {
        match self.run(body)?.as_str() {
            "ok" => Ok(()),
            "missing" => Err(AutomationError::NoSuchTab(tab)),
            other => Err(AutomationError::InvalidResponse(format!(
                "expected 'ok' or 'missing', got '{other}'"
            ))),
        }
    }
}

#[cfg(target_os = "macos")]
fn run_osascript(script: &str) -> Result<String, AutomationError> {
    let output = std::process::Command::new("osascript")
        .args(["-l", "JavaScript", "-e", script])
        .output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(AutomationError::ScriptFailed(stderr))
    }
}

#[cfg(not(target_os = "macos"))]
fn run_osascript(_script: &str) -> Result<String, AutomationError> {
    Err(AutomationError::Unsupported)
}

/// Encode `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    serde_json::Value::from(s).to_string()
}

/// Guard that evaluates to `"missing"` unless the window (and tab, if given) exist.
fn exists_guard(window: usize, tab: Option<usize>) -> String {
    let tab_check = tab.map_or_else(String::new, |t| {
        format!(" || {t} >= app.windows[{window}].tabs.length")
    });
    format!("if ({window} >= app.windows.length{tab_check}) {{ \"missing\" }} else ")
}

impl Browser for JxaBrowser {
    fn windows(&mut self) -> Result<Vec<Vec<TabProps>>, AutomationError> {
        let body = r#"
if (!app.running()) {
    "null"
} else {
    JSON.stringify(app.windows().map(w => {
        const titles = w.tabs.title();
        const urls = w.tabs.url();
        return titles.map((title, i) => ({ title: title || "", url: urls[i] || "" }));
    }))
}"#;
        let raw = self.run(body)?;
        let windows: Option<Vec<Vec<TabProps>>> = serde_json::from_str(&raw)?;
        let windows = windows.ok_or_else(|| {
            AutomationError::ScriptFailed(format!("{} is not running", self.application))
        })?;
        debug!(
            windows = windows.len(),
            tabs = windows.iter().map(Vec::len).sum::<usize>(),
            "enumerated tabs"
        );
        Ok(windows)
    }

    fn close_tab(&mut self, tab: TabRef) -> Result<(), AutomationError> {
        let body = format!(
            "{}{{ app.windows[{w}].tabs[{t}].close(); \"ok\" }}",
            exists_guard(tab.window, Some(tab.tab)),
            w = tab.window,
            t = tab.tab
        );
        self.run_addressed(&body, tab)
    }

    fn show_window(&mut self, window: usize) -> Result<(), AutomationError> {
        let body = format!(
            "{}{{ app.windows[{window}].visible = true; \"ok\" }}",
            exists_guard(window, None)
        );
        self.run_addressed(&body, TabRef { window, tab: 0 })
    }

    fn set_active_tab(&mut self, tab: TabRef) -> Result<(), AutomationError> {
        // activeTabIndex is one-based; no window holds usize::MAX tabs.
        let one_based = tab
            .tab
            .checked_add(1)
            .ok_or(AutomationError::NoSuchTab(tab))?;
        let body = format!(
            "{}{{ app.windows[{w}].activeTabIndex = {one_based}; \"ok\" }}",
            exists_guard(tab.window, Some(tab.tab)),
            w = tab.window
        );
        self.run_addressed(&body, tab)
    }

    fn raise_window(&mut self, window: usize) -> Result<(), AutomationError> {
        let body = format!(
            "{}{{ app.windows[{window}].index = 1; \"ok\" }}",
            exists_guard(window, None)
        );
        self.run_addressed(&body, TabRef { window, tab: 0 })
    }

    fn activate(&mut self) -> Result<(), AutomationError> {
        self.run("app.activate(); \"ok\"")?;
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<(), AutomationError> {
        let body = format!(
            "app.activate();\napp.displayAlert({});\n\"ok\"",
            js_string(message)
        );
        self.run(&body)?;
        Ok(())
    }

    fn dialog(&mut self, message: &str) -> Result<DialogResponse, AutomationError> {
        let body = format!(
            r#"app.activate();
try {{
    app.displayDialog({});
    "ok"
}} catch (e) {{
    if (e.errorNumber === {USER_CANCELED}) {{ "cancel" }} else {{ throw e }}
}}"#,
            js_string(message)
        );
        match self.run(&body)?.as_str() {
            "ok" => Ok(DialogResponse::Ok),
            "cancel" => Ok(DialogResponse::Cancel),
            other => Err(AutomationError::InvalidResponse(format!(
                "unexpected dialog result '{other}'"
            ))),
        }
    }
}
