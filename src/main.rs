use std::io::{self, Write};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use chrome_control::browser::JxaBrowser;
use chrome_control::cli::{Cli, Command, ConfigCommand};
use chrome_control::config::{ResolvedConfig, init_config, load_config, resolve_config};
use chrome_control::confirm::Mode;
use chrome_control::console::StdConsole;
use chrome_control::error::{AppError, ErrorKind, ExitCode};
use chrome_control::tabs::{self, ListFormat, Session};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, on stdout.
            let code = if e.use_stderr() {
                ExitCode::GeneralError
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code as i32);
        }
    };

    init_logging(cli.global.verbose);

    if let Err(e) = run(&cli) {
        e.print_json_stderr();
        if e.shows_usage() {
            eprintln!("\n{}", Cli::command().render_usage());
        }
        std::process::exit(e.code() as i32);
    }
}

/// Diagnostics go to stderr so stdout stays parseable.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("CHROME_CONTROL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let (config_path, file) = load_config(cli.global.config.as_deref());
    let mut config = resolve_config(&file, config_path);

    // CLI flags and environment override the config file.
    if let Some(app) = &cli.global.app {
        config.browser.application.clone_from(app);
    }
    config.confirm.mode = Mode::from_flags(cli.global.ui, cli.global.yes, config.confirm.mode);
    config.output.format = ListFormat::from_flags(&cli.global.output, config.output.format)?;

    match &cli.command {
        Command::Config(args) => execute_config(&config, &args.command),
        Command::Completions(args) => execute_completions(args.shell),
        Command::Man(args) => execute_man(args.command.as_deref()),
        command => {
            let mut browser = JxaBrowser::new(config.browser.application.as_str());
            let mut console = StdConsole;
            let mut session = Session::new(&mut browser, &mut console, config.confirm.mode)
                .with_format(config.output.format);
            tabs::execute(&mut session, command)
        }
    }
}

// =============================================================================
// config
// =============================================================================

#[derive(Serialize)]
struct PathResult {
    path: Option<String>,
}

#[derive(Serialize)]
struct InitResult {
    created: String,
}

fn print_json(value: &impl Serialize, format: ListFormat) -> Result<(), AppError> {
    let json = match format {
        ListFormat::Json => serde_json::to_string(value),
        ListFormat::Pretty | ListFormat::Plain => serde_json::to_string_pretty(value),
    };
    let json = json.map_err(|e| AppError {
        message: format!("serialization error: {e}"),
        kind: ErrorKind::Io,
    })?;
    println!("{json}");
    Ok(())
}

fn execute_config(config: &ResolvedConfig, command: &ConfigCommand) -> Result<(), AppError> {
    let format = config.output.format;
    match command {
        ConfigCommand::Show => print_json(config, format),
        ConfigCommand::Init(args) => {
            let path = init_config(args.path.as_deref())?;
            print_json(
                &InitResult {
                    created: path.display().to_string(),
                },
                format,
            )
        }
        ConfigCommand::Path => print_json(
            &PathResult {
                path: config
                    .config_path
                    .as_ref()
                    .map(|p| p.display().to_string()),
            },
            format,
        ),
    }
}

// =============================================================================
// completions / man
// =============================================================================

fn execute_completions(shell: Shell) -> Result<(), AppError> {
    let mut cmd = Cli::command();
    let mut out = io::stdout().lock();
    clap_complete::generate(shell, &mut cmd, "chrome-control", &mut out);
    out.flush()?;
    Ok(())
}

fn execute_man(command: Option<&str>) -> Result<(), AppError> {
    let root = Cli::command();
    let man = match command {
        None => clap_mangen::Man::new(root),
        Some(name) => {
            let sub = root
                .find_subcommand(name)
                .cloned()
                .ok_or_else(|| AppError::unknown_man_page(name))?;
            clap_mangen::Man::new(sub).title(format!("chrome-control-{name}"))
        }
    };

    let mut buf = Vec::new();
    man.render(&mut buf)?;
    let mut out = io::stdout().lock();
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}
