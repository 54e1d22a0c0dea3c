use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::browser::DEFAULT_APPLICATION;
use crate::confirm::Mode;
use crate::tabs::ListFormat;

/// Default config file template with comments, used by `config init`.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# chrome-control configuration file

# Browser to script
# [browser]
# application = "Google Chrome"   # or "Chromium", "Brave Browser", ...

# How destructive commands ask for confirmation
# [confirm]
# mode = "cli"                    # cli, ui, yes

# Output defaults for `list`
# [output]
# format = "json"                 # json, pretty, plain
"#;

// ---------------------------------------------------------------------------
// Config structs (parsed from TOML)
// ---------------------------------------------------------------------------

/// Represents the parsed TOML config file. All fields optional.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    pub browser: BrowserConfig,
    pub confirm: ConfirmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub application: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmConfig {
    pub mode: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved config (all defaults filled in)
// ---------------------------------------------------------------------------

/// Fully resolved configuration with all defaults filled in.
#[derive(Debug, Serialize)]
pub struct ResolvedConfig {
    pub config_path: Option<PathBuf>,
    pub browser: ResolvedBrowser,
    pub confirm: ResolvedConfirm,
    pub output: ResolvedOutput,
}

#[derive(Debug, Serialize)]
pub struct ResolvedBrowser {
    pub application: String,
}

#[derive(Debug, Serialize)]
pub struct ResolvedConfirm {
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub struct ResolvedOutput {
    pub format: ListFormat,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading/writing config file.
    Io(std::io::Error),
    /// Config file already exists (for `config init`).
    AlreadyExists(PathBuf),
    /// Could not determine config directory.
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config file error: {e}"),
            Self::AlreadyExists(p) => {
                write!(f, "Config file already exists: {}", p.display())
            }
            Self::NoConfigDir => write!(f, "could not determine config directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for crate::error::AppError {
    fn from(e: ConfigError) -> Self {
        Self {
            message: e.to_string(),
            kind: crate::error::ErrorKind::Config,
        }
    }
}

// ---------------------------------------------------------------------------
// Config file search
// ---------------------------------------------------------------------------

/// Find the first config file that exists, checking locations in priority order.
///
/// Search order:
/// 1. `explicit_path` (from `--config` flag, or `$CHROME_CONTROL_CONFIG` through clap)
/// 2. `./.chrome-control.toml` (project-local)
/// 3. `<config_dir>/chrome-control/config.toml` (XDG / platform config dir)
/// 4. `~/.chrome-control.toml` (home directory fallback)
#[must_use]
pub fn find_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit_path {
        if p.exists() {
            return Some(p.to_path_buf());
        }
    }

    let local = PathBuf::from(".chrome-control.toml");
    if local.exists() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg = config_dir.join("chrome-control").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".chrome-control.toml");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load and parse a config file. Returns the file path (if found) and the parsed config.
///
/// On parse errors, logs a warning and returns `ConfigFile::default()`.
#[must_use]
pub fn load_config(explicit_path: Option<&Path>) -> (Option<PathBuf>, ConfigFile) {
    let path = find_config_file(explicit_path);
    match &path {
        Some(p) => {
            let config = load_config_from(p);
            (path, config)
        }
        None => (None, ConfigFile::default()),
    }
}

/// Load and parse a config file from a specific path.
///
/// On read errors, logs a warning and returns `ConfigFile::default()`.
#[must_use]
pub fn load_config_from(path: &Path) -> ConfigFile {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), "could not read config file: {e}");
            return ConfigFile::default();
        }
    };

    parse_config(&contents, path)
}

/// Parse TOML content into a `ConfigFile`.
///
/// Tries a strict parse first to detect unknown keys, then falls back to a
/// lenient parse that keeps every known value.
#[must_use]
pub fn parse_config(contents: &str, path: &Path) -> ConfigFile {
    match toml::from_str::<StrictConfigFile>(contents) {
        Ok(strict) => strict.into(),
        Err(strict_err) => match toml::from_str::<ConfigFile>(contents) {
            Ok(config) => {
                warn!(path = %path.display(), "unknown keys in config file: {strict_err}");
                config
            }
            Err(parse_err) => {
                warn!(path = %path.display(), "could not parse config file: {parse_err}");
                ConfigFile::default()
            }
        },
    }
}

/// Strict variant used for the first-pass parse to detect unknown keys.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictConfigFile {
    #[serde(default)]
    browser: StrictBrowserConfig,
    #[serde(default)]
    confirm: StrictConfirmConfig,
    #[serde(default)]
    output: StrictOutputConfig,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictBrowserConfig {
    application: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictConfirmConfig {
    mode: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictOutputConfig {
    format: Option<String>,
}

impl From<StrictConfigFile> for ConfigFile {
    fn from(s: StrictConfigFile) -> Self {
        Self {
            browser: BrowserConfig {
                application: s.browser.application,
            },
            confirm: ConfirmConfig {
                mode: s.confirm.mode,
            },
            output: OutputConfig {
                format: s.output.format,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

/// Resolve a config file into a fully-populated `ResolvedConfig` with all defaults.
///
/// Unrecognized `confirm.mode` or `output.format` values warn and fall back to
/// the default.
#[must_use]
pub fn resolve_config(file: &ConfigFile, config_path: Option<PathBuf>) -> ResolvedConfig {
    let application = file
        .browser
        .application
        .clone()
        .filter(|app| !app.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_APPLICATION.to_string());

    ResolvedConfig {
        config_path,
        browser: ResolvedBrowser { application },
        confirm: ResolvedConfirm {
            mode: parse_or_warn(file.confirm.mode.as_deref(), "confirm.mode"),
        },
        output: ResolvedOutput {
            format: parse_or_warn(file.output.format.as_deref(), "output.format"),
        },
    }
}

fn parse_or_warn<T>(value: Option<&str>, key: &str) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value.map(str::parse::<T>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            warn!("invalid {key} in config file: {e}");
            T::default()
        }
        None => T::default(),
    }
}

// ---------------------------------------------------------------------------
// Config init
// ---------------------------------------------------------------------------

/// Default path for `config init`: `<config_dir>/chrome-control/config.toml`.
///
/// # Errors
///
/// Returns `ConfigError::NoConfigDir` if the platform config directory cannot be determined.
pub fn default_init_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("chrome-control").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Create a default config file at the given path (or the platform default path).
///
/// # Errors
///
/// - `ConfigError::AlreadyExists` if the file already exists
/// - `ConfigError::Io` on I/O failure
/// - `ConfigError::NoConfigDir` if no target path and platform config dir unknown
pub fn init_config(target_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match target_path {
        Some(p) => p.to_path_buf(),
        None => default_init_path()?,
    };

    if path.exists() {
        return Err(ConfigError::AlreadyExists(path));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
