use std::env;
use std::io;
use std::process::ExitCode;

use replay_cli::{run, CommandKind};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }

    let kind = parse_command(&args)?;
    run(kind, &mut io::stdout())
}

fn parse_command(args: &[String]) -> Result<CommandKind, String> {
    let command = args
        .first()
        .ok_or_else(|| "missing subcommand".to_string())?
        .as_str();
    let command_args = &args[1..];

    match command {
        "replay" => {
            let path = command_args
                .first()
                .ok_or_else(|| "replay requires a trace file path".to_string())?
                .clone();
            let mut json = false;
            for arg in &command_args[1..] {
                if arg == "--json" {
                    json = true;
                } else {
                    return Err(format!("unknown replay argument '{arg}' (expected --json)"));
                }
            }
            Ok(CommandKind::Replay { path, json })
        }
        "routes" => {
            let mut kind = CommandKind::routes_for_default_origin();
            let mut index = 0usize;
            while index < command_args.len() {
                match command_args[index].as_str() {
                    "--origin" => {
                        let value = command_args
                            .get(index + 1)
                            .ok_or_else(|| "missing value for --origin".to_string())?;
                        kind = CommandKind::Routes {
                            origin: value.trim_end_matches('/').to_string(),
                        };
                        index += 2;
                    }
                    other => {
                        return Err(format!(
                            "unknown routes argument '{other}' (expected --origin)"
                        ))
                    }
                }
            }
            Ok(kind)
        }
        other => Err(format!("unknown subcommand '{other}'")),
    }
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "replay_cli - headless input trace replay",
        "",
        "Usage:",
        "  replay_cli replay <trace.json> [--json]",
        "  replay_cli routes [--origin <url>]",
        "",
        "Logging:",
        "  RUST_LOG=info replay_cli replay <trace.json>",
    ]
    .join("\n")
}
