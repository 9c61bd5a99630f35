use clap::{Parser, Subcommand};
use scan_types::AnalysisKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "threatlens",
    version,
    about = "Paste a suspicious message or security logs, get an AI risk assessment"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/threatlens.toml")]
    pub(crate) config: PathBuf,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Open the interactive dashboard (default).
    Tui,
    /// Analyze one input and print the report.
    Scan {
        #[arg(long, value_parser = parse_kind)]
        kind: AnalysisKind,
        /// Read input from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },
    /// Print stored scans, newest first.
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn parse_kind(value: &str) -> Result<AnalysisKind, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let args = Args::try_parse_from(["threatlens"]).expect("args");
        assert!(args.command.is_none());
        assert_eq!(args.config, PathBuf::from("config/threatlens.toml"));
        assert!(!args.log_to_stderr);
    }

    #[test]
    fn scan_requires_known_kind() {
        let args = Args::try_parse_from(["threatlens", "scan", "--kind", "logs", "--json"])
            .expect("args");
        match args.command {
            Some(Command::Scan { kind, json, .. }) => {
                assert_eq!(kind, AnalysisKind::Logs);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Args::try_parse_from(["threatlens", "scan", "--kind", "email"]).is_err());
    }
}
