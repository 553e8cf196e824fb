//! cellcalc - a small spreadsheet calculator on the command line.

mod config;
mod render;
mod session;

use anyhow::Result;
use cellcalc_core::Sheet;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use session::{Flow, Session};

fn print_usage() {
    eprintln!("Usage: cellcalc [OPTIONS]");
    eprintln!();
    eprintln!("Reads entries such as `A1 5` or `C1 =SUM(A1:B1)` from stdin, one per line.");
    eprintln!("Commands: :print, :show <ADDR>, :clear <ADDR>, :functions, :quit");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <ENTRY>     Apply an entry, then print the grid (can be repeated)");
    eprintln!("  --config <FILE>           Load engine settings from a TOML file");
    eprintln!("  -v, --verbose             Log propagation passes to stderr");
    eprintln!("  -h, --help                Print help");
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(commands: Vec<String>, config_file: Option<PathBuf>) -> Result<()> {
    let (config, warnings) = config::load_config(config_file.as_deref())?;
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    tracing::debug!(?config, "loaded configuration");

    let sheet = Sheet::with_config(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if commands.is_empty() {
        let mut session = Session::new(sheet, true);
        return session.run(io::stdin().lock(), &mut out);
    }

    let mut session = Session::new(sheet, false);
    for command in &commands {
        if session.execute(command, &mut out)? == Flow::Quit {
            break;
        }
    }
    render::write_markdown(&mut out, &session.sheet)?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut commands: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires an entry");
                    std::process::exit(1);
                }
                commands.push(args[i].clone());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "-v" | "--verbose" => verbose = true,
            arg => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    init_logging(verbose);

    if let Err(e) = run(commands, config_file) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
