use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::output::OutputFormat;

/// Optional `nyc-recon.toml` consumed by the `reconcile` command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    pub payroll: Option<PathBuf>,
    pub spending: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse reconcile config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&contents)
    }
}

/// Inputs after command-line flags have been laid over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub payroll: PathBuf,
    pub spending: PathBuf,
    pub output: Option<(PathBuf, Option<OutputFormat>)>,
}

pub fn resolve_inputs(
    config: ReconConfig,
    payroll: Option<PathBuf>,
    spending: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<ResolvedInputs> {
    let Some(payroll) = payroll.or(config.inputs.payroll) else {
        bail!("no payroll input given (use --payroll or [inputs].payroll)");
    };
    let Some(spending) = spending.or(config.inputs.spending) else {
        bail!("no spending input given (use --spending or [inputs].spending)");
    };

    let output = match (output, config.output) {
        (Some(path), _) => Some((path, format)),
        (None, Some(cfg)) => Some((cfg.path, format.or(cfg.format))),
        (None, None) => None,
    };

    Ok(ResolvedInputs {
        payroll,
        spending,
        output,
    })
}
