use super::{AutomationError, Browser, DialogResponse, TabProps, TabRef};

/// One recorded call into a [`FakeBrowser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Windows,
    CloseTab(TabRef),
    ShowWindow(usize),
    SetActiveTab(TabRef),
    RaiseWindow(usize),
    Activate,
    Alert(String),
    Dialog(String),
}

impl Call {
    /// Calls that change browser state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CloseTab(_) | Self::ShowWindow(_) | Self::SetActiveTab(_) | Self::RaiseWindow(_)
        )
    }
}

/// In-memory browser used by tests and the BDD suite.
///
/// Closing a tab removes it (and its window once empty), so indices shift the
/// same way they do in a real browser. Window order only changes on
/// `raise_window`.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    pub windows: Vec<Vec<TabProps>>,
    pub active_tabs: Vec<usize>,
    pub hidden: Vec<bool>,
    pub calls: Vec<Call>,
    pub dialog_response: Option<DialogResponse>,
    pub failure: Option<String>,
}

impl FakeBrowser {
    #[must_use]
    pub fn new(windows: Vec<Vec<TabProps>>) -> Self {
        let count = windows.len();
        Self {
            windows,
            active_tabs: vec![0; count],
            hidden: vec![false; count],
            ..Self::default()
        }
    }

    /// A browser whose every call fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Answer dialogs with `response` instead of OK.
    #[must_use]
    pub fn with_dialog_response(mut self, response: DialogResponse) -> Self {
        self.dialog_response = Some(response);
        self
    }

    /// Titles of all remaining tabs, in enumeration order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.windows
            .iter()
            .flatten()
            .map(|tab| tab.title.clone())
            .collect()
    }

    #[must_use]
    pub fn closed(&self) -> Vec<TabRef> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CloseTab(tab) => Some(*tab),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn dialogs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Dialog(msg) | Call::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: Call) -> Result<(), AutomationError> {
        self.calls.push(call);
        match &self.failure {
            Some(msg) => Err(AutomationError::ScriptFailed(msg.clone())),
            None => Ok(()),
        }
    }

    fn check_window(&self, window: usize) -> Result<(), AutomationError> {
        if window < self.windows.len() {
            Ok(())
        } else {
            Err(AutomationError::NoSuchTab(TabRef { window, tab: 0 }))
        }
    }

    fn check_tab(&self, tab: TabRef) -> Result<(), AutomationError> {
        match self.windows.get(tab.window) {
            Some(tabs) if tab.tab < tabs.len() => Ok(()),
            _ => Err(AutomationError::NoSuchTab(tab)),
        }
    }
}

impl Browser for FakeBrowser {
    fn windows(&mut self) -> Result<Vec<Vec<TabProps>>, AutomationError> {
        self.record(Call::Windows)?;
        Ok(self.windows.clone())
    }

    fn close_tab(&mut self, tab: TabRef) -> Result<(), AutomationError> {
        self.record(Call::CloseTab(tab))?;
        self.check_tab(tab)?;
        let tabs = &mut self.windows[tab.window];
        tabs.remove(tab.tab);
        if tabs.is_empty() {
            self.windows.remove(tab.window);
            self.active_tabs.remove(tab.window);
            self.hidden.remove(tab.window);
        }
        Ok(())
    }

    fn show_window(&mut self, window: usize) -> Result<(), AutomationError> {
        self.record(Call::ShowWindow(window))?;
        self.check_window(window)?;
        self.hidden[window] = false;
        Ok(())
    }

    fn set_active_tab(&mut self, tab: TabRef) -> Result<(), AutomationError> {
        self.record(Call::SetActiveTab(tab))?;
        self.check_tab(tab)?;
        self.active_tabs[tab.window] = tab.tab;
        Ok(())
    }

    fn raise_window(&mut self, window: usize) -> Result<(), AutomationError> {
        self.record(Call::RaiseWindow(window))?;
        self.check_window(window)?;
        let tabs = self.windows.remove(window);
        self.windows.insert(0, tabs);
        let active = self.active_tabs.remove(window);
        self.active_tabs.insert(0, active);
        let hidden = self.hidden.remove(window);
        self.hidden.insert(0, hidden);
        Ok(())
    }

    fn activate(&mut self) -> Result<(), AutomationError> {
        self.record(Call::Activate)
    }

    fn alert(&mut self, message: &str) -> Result<(), AutomationError> {
        self.record(Call::Alert(message.to_string()))
    }

    fn dialog(&mut self, message: &str) -> Result<DialogResponse, AutomationError> {
        self.record(Call::Dialog(message.to_string()))?;
        Ok(self.dialog_response.unwrap_or(DialogResponse::Ok))
    }
}
