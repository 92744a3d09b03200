//! Plume - stream rendering and reconciliation core, with a demo CLI
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use plume::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Demo { width, columns } => run_demo(width, columns).await,
        Command::Config => show_config(),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Demo {
        width: Option<f32>,
        columns: Option<usize>,
    },
    Config,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Demo {
            width: None,
            columns: None,
        });
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "config" => Ok(Command::Config),

        "--demo" | "demo" => {
            let flag = |names: [&str; 2]| {
                args.iter()
                    .position(|a| names.contains(&a.as_str()))
                    .and_then(|i| args.get(i + 1))
            };
            let width = flag(["--width", "-w"])
                .map(|s| s.parse::<f32>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("Invalid width: {e}"))?;
            let columns = flag(["--columns", "-c"])
                .map(|s| s.parse::<usize>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("Invalid column count: {e}"))?;
            Ok(Command::Demo { width, columns })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'plume --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
Plume - stream rendering and reconciliation core

USAGE:
    plume                              Run the demo session
    plume [COMMAND]

COMMANDS:
    demo [OPTIONS]                     Load sample streams and print every update
      Options:
        -w, --width <points>           Stream width (default: from config)
        -c, --columns <n>              Column count (default: from config)
      Examples:
        plume demo
        plume demo --width 768 --columns 2

    config                             Show the active configuration

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

ENVIRONMENT:
    RUST_LOG=debug                     Verbose logging to stderr

CONFIG:
    {}

HOMEPAGE:
    {}
"#,
        plume::LOGO,
        config_path,
        plume::REPO_URL
    );
}

fn print_version() {
    println!("plume {}", plume::VERSION);
}

async fn run_demo(width: Option<f32>, columns: Option<usize>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(width) = width {
        config.stream_width = width;
    }
    if let Some(columns) = columns {
        config.column_count = columns.max(1);
    }
    plume::demo::run(&config).await
}

fn show_config() -> Result<()> {
    let path = Config::default_path()?;
    let config = Config::load()?;
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
