//! Renders a [`TestSuiteResult`] for humans or machines.

use std::{fmt, str::FromStr};

use crate::{
    diagnostics::{HelmSpecError, Result},
    runner::TestSuiteResult,
};

pub mod pretty;
pub mod tree;

/// Supported report formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The full result tree as YAML.
    Yaml,
    /// An indented, colour-coded tree.
    #[default]
    Pretty,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Pretty, OutputFormat::Yaml];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = HelmSpecError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| HelmSpecError::UnsupportedFormat {
                format: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSettings {
    pub output_format: OutputFormat,
    pub use_color: bool,
    /// Dump the manifest and render error of failed test cases.
    pub verbose: bool,
}

/// Renders the result in the requested format.
pub fn report(result: &TestSuiteResult, settings: &ReportSettings) -> Result<String> {
    match settings.output_format {
        OutputFormat::Yaml => serde_yaml::to_string(result)
            .map_err(|source| HelmSpecError::SerializeReport { source }),
        OutputFormat::Pretty => Ok(pretty::render(result, settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_from_their_names() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = "json".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, HelmSpecError::UnsupportedFormat { ref format } if format == "json"));
        assert_eq!(err.to_string(), "unsupported output format `json`");
    }

    #[test]
    fn format_names_are_case_sensitive() {
        assert!("YAML".parse::<OutputFormat>().is_err());
    }
}
