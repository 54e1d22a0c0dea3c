use std::fs;
use std::path::Path;

use clap_complete::Shell;

const BIN: &str = "chrome-control";
const USAGE: &str = "usage: cargo xtask <man|completions>";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("man") => generate_man_pages(Path::new("man")),
        Some("completions") => generate_completions(Path::new("completions")),
        Some(other) => {
            eprintln!("unknown xtask command: {other}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }
}

/// One roff page for the binary and one per command (`chrome-control-close.1`, ...).
fn generate_man_pages(out_dir: &Path) {
    fs::create_dir_all(out_dir).expect("failed to create man/ directory");

    let cmd = chrome_control::command();
    render_man_page(&cmd, BIN, out_dir);
    let mut count = 1;

    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        render_man_page(sub, &format!("{BIN}-{}", sub.get_name()), out_dir);
        count += 1;
    }

    println!("Generated {count} man pages in {}", out_dir.display());
}

fn render_man_page(cmd: &clap::Command, name: &str, out_dir: &Path) {
    let path = out_dir.join(format!("{name}.1"));
    let man = clap_mangen::Man::new(cmd.clone()).title(name);
    let mut buf = Vec::new();
    man.render(&mut buf)
        .unwrap_or_else(|e| panic!("failed to render man page for {name}: {e}"));
    fs::write(&path, buf).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    println!("  {}", path.display());
}

fn generate_completions(out_dir: &Path) {
    fs::create_dir_all(out_dir).expect("failed to create completions/ directory");

    let mut cmd = chrome_control::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let path = clap_complete::generate_to(shell, &mut cmd, BIN, out_dir)
            .unwrap_or_else(|e| panic!("failed to write {shell} completions: {e}"));
        println!("  {}", path.display());
    }
}
