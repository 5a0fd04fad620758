//! Spin3D terminal viewer
//!
//! Usage: spin3d-terminal [--shape <name>] [--mode solid|wire] [--config <file.json>]
//!
//! Logs go to stderr and are filtered by `RUST_LOG` (default `warn`).
//! Redirect stderr to keep them off the alternate screen.

use spin3d_core::{RenderMode, ShapeKind, ViewerConfig};
use spin3d_terminal::TerminalApp;
use std::env;
use std::process::ExitCode;

const USAGE: &str =
    "Usage: spin3d-terminal [--shape cube|pyramid|octa|torus|sphere] [--mode solid|wire] [--config <file.json>]";

#[derive(Debug, Default)]
struct Args {
    shape: Option<ShapeKind>,
    mode: Option<RenderMode>,
    config: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--shape" => parsed.shape = Some(ShapeKind::from_name(&value("--shape")?)),
            "--mode" => {
                let token = value("--mode")?;
                parsed.mode = Some(token.parse::<RenderMode>().map_err(|e| format!("{e}"))?);
            }
            "--config" => parsed.config = Some(value("--config")?),
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => match ViewerConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(path = %path, "failed to load config: {err}");
                eprintln!("failed to load config {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => ViewerConfig::default(),
    };
    if let Some(shape) = args.shape {
        config.initial.shape = shape;
    }
    if let Some(mode) = args.mode {
        config.initial.mode = mode;
    }

    let result = TerminalApp::new(config).and_then(|mut app| app.run());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("terminal viewer failed: {err}");
            eprintln!("spin3d-terminal: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--shape", "torus", "--mode", "wire"]).unwrap();
        assert_eq!(parsed.shape, Some(ShapeKind::Torus));
        assert_eq!(parsed.mode, Some(RenderMode::Wire));
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--mode", "glass"]).is_err());
        assert!(args(&["--config"]).is_err());
        assert!(args(&["cube"]).is_err());
    }
}
