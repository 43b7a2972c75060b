use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemeterError};
use crate::registry::MetricKind;

/// What the differential transform emits when a cumulative counter goes
/// backwards (device reset or wrap).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolicy {
    /// Emit `max(0, current)`: the post-reset reading becomes the delta floor.
    #[default]
    Clamp,
    /// Emit the raw negative delta untouched.
    Passthrough,
}

impl FromStr for ResetPolicy {
    type Err = TelemeterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "passthrough" | "raw" => Ok(Self::Passthrough),
            _ => Err(TelemeterError::Parse(format!("unknown reset policy: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub field_map: Vec<(MetricKind, u8)>,
    pub reset_policy: ResetPolicy,
    pub hourly_limit: usize,
    pub daily_limit: usize,
    pub monthly_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_map: vec![
                (MetricKind::Temperature, 1),
                (MetricKind::Humidity, 2),
                (MetricKind::Motion, 3),
                (MetricKind::Battery, 4),
            ],
            reset_policy: ResetPolicy::Clamp,
            hourly_limit: 12,
            daily_limit: 10,
            monthly_limit: 6,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    field_map: Option<String>,
    reset_policy: Option<String>,
    hourly_limit: Option<usize>,
    daily_limit: Option<usize>,
    monthly_limit: Option<usize>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TELEMETER_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("telemeter/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| TelemeterError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| TelemeterError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    Ok(ConfigOverrides {
        field_map: env::var("TELEMETER_FIELD_MAP").ok(),
        reset_policy: env::var("TELEMETER_RESET_POLICY").ok(),
        hourly_limit: parse_env_limit("TELEMETER_HOURLY_LIMIT")?,
        daily_limit: parse_env_limit("TELEMETER_DAILY_LIMIT")?,
        monthly_limit: parse_env_limit("TELEMETER_MONTHLY_LIMIT")?,
    })
}

fn parse_env_limit(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(v) => v
            .parse::<usize>()
            .map(Some)
            .map_err(|e| TelemeterError::Config(format!("bad {name} in environment: {e}"))),
        Err(_) => Ok(None),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.field_map {
        cfg.field_map = parse_field_map(&v).map_err(|e| {
            TelemeterError::Config(format!("bad field_map in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.reset_policy {
        cfg.reset_policy = ResetPolicy::from_str(&v).map_err(|e| {
            TelemeterError::Config(format!("bad reset_policy in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.hourly_limit {
        cfg.hourly_limit = v;
    }
    if let Some(v) = overrides.daily_limit {
        cfg.daily_limit = v;
    }
    if let Some(v) = overrides.monthly_limit {
        cfg.monthly_limit = v;
    }
    Ok(())
}

/// Parses "temperature=1,humidity=2" into kind/field-index pairs.
fn parse_field_map(raw: &str) -> Result<Vec<(MetricKind, u8)>> {
    let mut out = Vec::new();
    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((kind, index)) = trimmed.split_once('=') else {
            return Err(TelemeterError::Config(
                "field_map entries must use metric=index syntax".to_string(),
            ));
        };
        let kind = MetricKind::from_str(kind.trim())?;
        let index = index
            .trim()
            .parse::<u8>()
            .map_err(|e| TelemeterError::Config(format!("bad field index for {kind}: {e}")))?;
        out.push((kind, index));
    }
    Ok(out)
}
