//! CLI argument definitions for the prediction service.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cmr",
    version,
    about = "Prediabetes and hypertension predictions from three classic classifiers",
    long_about = "Serve a web form that predicts prediabetes and hypertension from\n\
                  glucose, insulin and blood pressure using Logistic Regression,\n\
                  Support Vector Machine and Random Forest models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Omit timestamps from pretty and compact log lines.
    #[arg(long = "no-log-timestamps", global = true)]
    pub no_log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Include patient names and measurements in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the prediction form over HTTP.
    Serve(ServeArgs),

    /// Load and check every model artifact, then print a summary.
    Verify(VerifyArgs),

    /// Predict both conditions for one set of measurements.
    Predict(PredictArgs),

    /// Rewrite manifest.toml from the artifacts currently on disk.
    WriteManifest(ArtifactsArg),
}

#[derive(Args)]
pub struct ArtifactsArg {
    /// Directory holding manifest.toml, the scaler and the classifiers
    /// (default: $CMR_ARTIFACTS_DIR, then ./artifacts).
    #[arg(long = "artifacts", value_name = "DIR")]
    pub artifacts: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub artifacts: ArtifactsArg,

    /// Address to listen on.
    #[arg(long = "bind", value_name = "ADDR", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub artifacts: ArtifactsArg,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactsArg,

    /// Fasting glucose level.
    #[arg(long = "glucose", allow_negative_numbers = true)]
    pub glucose: String,

    /// Insulin level.
    #[arg(long = "insulin", allow_negative_numbers = true)]
    pub insulin: String,

    /// Blood pressure level.
    #[arg(long = "blood-pressure", allow_negative_numbers = true)]
    pub blood_pressure: String,

    /// Print predictions as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults_to_local_port_5000() {
        let cli = Cli::try_parse_from(["cmr", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn predict_takes_three_measurements() {
        let cli = Cli::try_parse_from([
            "cmr",
            "predict",
            "--glucose",
            "120",
            "--insulin",
            "85",
            "--blood-pressure",
            "70",
        ])
        .unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.glucose, "120");
        assert_eq!(args.insulin, "85");
        assert_eq!(args.blood_pressure, "70");
    }
}
