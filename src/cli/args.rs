//! Defines the command-line arguments for the helm-spec CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    assertion::QueryLogLevel,
    report::{OutputFormat, ReportSettings},
    runner::RunnerConfig,
};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "helm-spec",
    version,
    about = "Automated tests for helm charts."
)]
pub struct HelmSpecArgs {
    /// Directory containing `*_spec.yaml` files.
    #[arg(default_value = "./specs")]
    pub spec_dir: PathBuf,

    /// Output format for the report, one of "pretty"|"yaml".
    #[arg(short, long, default_value = "pretty")]
    pub output_format: OutputFormat,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,

    /// Print the rendered manifest and error of every failed test case.
    #[arg(short, long)]
    pub verbose: bool,

    /// The helm binary used for rendering.
    #[arg(long, value_name = "PATH", default_value = "helm")]
    pub helm: PathBuf,

    /// The yq binary used for evaluating assertions.
    #[arg(long, value_name = "PATH", default_value = "yq")]
    pub yq: PathBuf,

    /// How much of yq's own stderr output to forward to the log.
    #[arg(long, value_enum, default_value_t = QueryLogLevel::Quiet)]
    pub query_log: QueryLogLevel,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl HelmSpecArgs {
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            helm_binary: self.helm.clone(),
            yq_binary: self.yq.clone(),
            query_log: self.query_log,
        }
    }

    /// Colour is used when stdout is a terminal, unless `--no-color` is given.
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            output_format: self.output_format,
            use_color: !self.no_color && atty::is(atty::Stream::Stdout),
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = HelmSpecArgs::try_parse_from(["helm-spec"]).unwrap();
        assert_eq!(args.spec_dir, PathBuf::from("./specs"));
        assert_eq!(args.output_format, OutputFormat::Pretty);
        assert!(!args.verbose);
        assert_eq!(args.runner_config(), RunnerConfig::default());
    }

    #[test]
    fn flags_are_parsed() {
        let args = HelmSpecArgs::try_parse_from([
            "helm-spec",
            "charts/specs",
            "-o",
            "yaml",
            "--no-color",
            "-v",
            "--helm",
            "/opt/helm",
            "--query-log",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.spec_dir, PathBuf::from("charts/specs"));
        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert!(args.verbose);
        let settings = args.report_settings();
        assert!(!settings.use_color);
        assert!(settings.verbose);
        let config = args.runner_config();
        assert_eq!(config.helm_binary, PathBuf::from("/opt/helm"));
        assert_eq!(config.query_log, QueryLogLevel::Warn);
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let err = HelmSpecArgs::try_parse_from(["helm-spec", "-o", "json"]).unwrap_err();
        assert!(err.to_string().contains("unsupported output format `json`"));
    }
}
