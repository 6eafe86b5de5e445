use crate::error::LintError;
use crate::level::LintLevel;
use crate::lint::{LintSettings, all_known_lints};
use crate::rules::HelperTarget;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct FaultyErrorsAsConfig {
    #[serde(default)]
    pub lints: LintsConfig,

    /// Extra helpers checked alongside `errors.As`.
    #[serde(default)]
    pub helpers: Vec<HelperTarget>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LintsConfig {
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(flatten)]
    pub levels: HashMap<String, LintLevel>,
}

impl FaultyErrorsAsConfig {
    pub fn settings(&self) -> LintSettings {
        LintSettings::default()
            .with_config_levels(self.lints.levels.clone())
            .disable(self.lints.disabled.clone())
            .with_helpers(self.helpers.clone())
    }
}

pub const DEFAULT_CONFIG_FILE_NAME: &str = "faulty-errorsas.toml";

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut cur = Some(start_dir);
    while let Some(dir) = cur {
        let candidate = dir.join(DEFAULT_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        cur = dir.parent();
    }
    None
}

pub fn load_config_file(path: &Path) -> Result<FaultyErrorsAsConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let cfg: FaultyErrorsAsConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    validate(&cfg).with_context(|| format!("invalid config file: {}", path.display()))?;
    Ok(cfg)
}

fn validate(cfg: &FaultyErrorsAsConfig) -> Result<(), LintError> {
    let known = all_known_lints();
    let mut names: Vec<&String> = cfg.lints.levels.keys().collect();
    names.sort();
    if let Some(unknown) = names.into_iter().find(|n| !known.contains(n.as_str())) {
        return Err(LintError::UnknownLint(unknown.clone()));
    }

    for helper in &cfg.helpers {
        if helper.package.trim().is_empty() || helper.name.trim().is_empty() {
            return Err(LintError::config(
                "helpers need a non-empty `package` and `name`",
            ));
        }
    }
    Ok(())
}

pub fn load_config(
    explicit_path: Option<&Path>,
    start_dir: &Path,
) -> Result<Option<(PathBuf, FaultyErrorsAsConfig)>> {
    if let Some(p) = explicit_path {
        let cfg = load_config_file(p)?;
        return Ok(Some((p.to_path_buf(), cfg)));
    }

    let Some(p) = find_config_file(start_dir) else {
        return Ok(None);
    };
    let cfg = load_config_file(&p)?;
    Ok(Some((p, cfg)))
}
