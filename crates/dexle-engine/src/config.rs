use anyhow::{Context, Result};
use jsonschema::{validator_for, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::feedback::Interpreter;
use crate::scorer::ScoreWeights;

pub const ENV_GUESS_BUDGET: &str = "DEXLE_GUESS_BUDGET";
pub const ENV_TOLERANCE: &str = "DEXLE_TOLERANCE";
pub const ENV_CROSS_SLOT_EXCLUSION: &str = "DEXLE_CROSS_SLOT_EXCLUSION";

/// Per-session parameters, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SessionParams {
    /// Maximum number of guesses before the session ends as exhausted.
    #[serde(default = "default_guess_budget")]
    pub guess_budget: u32,
    /// Finest measurement resolution of the catalog (height/weight).
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Exclude a WRONG trait from both slots. Only sound when no entity
    /// repeats a trait across its two slots.
    #[serde(default = "default_cross_slot_exclusion")]
    pub cross_slot_exclusion: bool,
}

fn default_guess_budget() -> u32 {
    8
}

fn default_tolerance() -> f64 {
    0.05
}

fn default_cross_slot_exclusion() -> bool {
    true
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            guess_budget: default_guess_budget(),
            tolerance: default_tolerance(),
            weights: ScoreWeights::default(),
            cross_slot_exclusion: default_cross_slot_exclusion(),
        }
    }
}

impl SessionParams {
    pub fn validate(&self) -> EngineResult<()> {
        if self.guess_budget == 0 {
            return Err(EngineError::InvalidParams(
                "guess_budget must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(EngineError::InvalidParams(format!(
                "tolerance must be a positive finite number (got {})",
                self.tolerance
            )));
        }
        let weights = [
            ("generation", self.weights.generation),
            ("height", self.weights.height),
            ("weight", self.weights.weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidParams(format!(
                    "weights.{name} must be a non-negative finite number (got {value})"
                )));
            }
        }
        Ok(())
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.tolerance, self.cross_slot_exclusion)
    }

    /// Apply `DEXLE_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(ENV_GUESS_BUDGET) {
            self.guess_budget = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_GUESS_BUDGET}={raw:?} is not a guess count"))?;
        }
        if let Ok(raw) = std::env::var(ENV_TOLERANCE) {
            self.tolerance = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TOLERANCE}={raw:?} is not a number"))?;
        }
        if let Ok(raw) = std::env::var(ENV_CROSS_SLOT_EXCLUSION) {
            self.cross_slot_exclusion = parse_bool_flag(&raw).with_context(|| {
                format!("{ENV_CROSS_SLOT_EXCLUSION}={raw:?} is not a boolean flag")
            })?;
        }
        Ok(self)
    }
}

static PARAMS_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema = schemars::schema_for!(SessionParams);
    let schema_value = serde_json::to_value(&schema).expect("schema value");
    validator_for(&schema_value).expect("valid schema")
});

/// Returns the JSON schema describing [`SessionParams`].
///
/// # Panics
///
/// Panics if schema generation fails; this indicates a programming error.
pub fn params_schema_json() -> serde_json::Value {
    let schema = schemars::schema_for!(SessionParams);
    serde_json::to_value(&schema).expect("schema json")
}

/// Parse session parameters from TOML text, validating against the schema first.
pub fn parse_params(content: &str) -> Result<SessionParams> {
    let raw: toml::Value = toml::from_str(content)?;
    let json_value = serde_json::to_value(&raw)?;
    let validation_errors: Vec<_> = PARAMS_SCHEMA
        .iter_errors(&json_value)
        .map(|e| e.to_string())
        .collect();
    if !validation_errors.is_empty() {
        return Err(anyhow::anyhow!(validation_errors.join(", ")));
    }
    let params: SessionParams = toml::from_str(content)?;
    params.validate()?;
    Ok(params)
}

pub fn load_params(path: impl AsRef<Path>) -> Result<SessionParams> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading session config {}", path.display()))?;
    parse_params(&content).with_context(|| format!("invalid session config {}", path.display()))
}

/// File (or defaults) plus environment overrides, validated.
pub fn load_effective_params(path: Option<&Path>) -> Result<SessionParams> {
    let base = match path {
        Some(p) => load_params(p)?,
        None => SessionParams::default(),
    };
    let params = base.with_env_overrides()?;
    params.validate()?;
    Ok(params)
}

/// Parse a boolean-like flag: 1/0, true/false, yes/no, on/off (case-insensitive).
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
