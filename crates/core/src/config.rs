use std::{fs::File, io::BufReader};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::RunError;

/// Required run configuration, resolved from the ambient environment at the
/// start of routing.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub token: String,
    pub readonly: bool,
}

/// Source of run inputs. The production implementation reads the Actions
/// environment; tests substitute their own.
pub trait InputSource: Send + Sync {
    fn run_inputs(&self) -> Result<RunInputs>;
}

/// Reads inputs the way the Actions runner exposes them: `INPUT_<NAME>`.
pub struct EnvInputs;

impl InputSource for EnvInputs {
    fn run_inputs(&self) -> Result<RunInputs> {
        run_inputs_from(|name| std::env::var(name).ok())
    }
}

fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn run_inputs_from(lookup: impl Fn(&str) -> Option<String>) -> Result<RunInputs> {
    let token = lookup(&input_var("token"))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RunError::MissingInput("token".to_string()))?;
    let readonly = lookup(&input_var("readonly")).is_some_and(|value| is_truthy(&value));
    Ok(RunInputs { token, readonly })
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

/// Static bot configuration, loaded once by the binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Issue that receives rendered failure reports. Runs targeting this
    /// exact issue are refused outright.
    #[serde(default)]
    pub error_report_issue: Option<IssueCoordinates>,
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueCoordinates {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Collector endpoint for metric samples. Without one, samples go to the
    /// structured log instead.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl BotConfig {
    /// Load from the YAML file named by `TRIAGE_BOT_CONFIG`. Unset means an
    /// empty configuration; a file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        match std::env::var("TRIAGE_BOT_CONFIG") {
            Ok(path) => {
                let file = BufReader::new(
                    File::open(&path).with_context(|| format!("Failed to open {path}"))?,
                );
                serde_yaml::from_reader(file).with_context(|| format!("Failed to parse {path}"))
            }
            Err(_) => Ok(Self::default()),
        }
    }
}
