//! Analyzer configuration: defaults plus `ANALYZER_*` environment overrides.

mod fields;

use std::str::FromStr;

pub use fields::FieldNames;

use crate::error::AnalyzerError;
use crate::protocol::DecoderLimits;

/// Extraction state machine knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Cards per seat right after the deal.
    pub full_hand: u8,
    /// Tricks after which a round is force-split when no boundary fired.
    pub max_tricks_per_round: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            full_hand: crate::domain::HAND_SIZE,
            max_tricks_per_round: crate::domain::TRICKS_PER_ROUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorConfig {
    /// Trick points at or above which a disagreement is high severity.
    pub high_severity_points: u32,
    /// Scorecard grade thresholds in percent.
    pub green_pct: f64,
    pub yellow_pct: f64,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            high_severity_points: 20,
            green_pct: 95.0,
            yellow_pct: 80.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub decoder: DecoderLimits,
    pub fields: FieldNames,
    pub extraction: ExtractionConfig,
    pub comparator: ComparatorConfig,
}

impl AnalyzerConfig {
    /// Defaults overridden by `ANALYZER_*` environment variables.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalyzerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let d = &mut cfg.decoder;
        override_var(&lookup, "ANALYZER_MAX_STRING_LEN", &mut d.max_string_len)?;
        override_var(&lookup, "ANALYZER_MAX_OBJECT_FIELDS", &mut d.max_object_fields)?;
        override_var(&lookup, "ANALYZER_MAX_ARRAY_LEN", &mut d.max_array_len)?;
        override_var(&lookup, "ANALYZER_MAX_BYTE_ARRAY_LEN", &mut d.max_byte_array_len)?;
        override_var(&lookup, "ANALYZER_MAX_INFLATED_LEN", &mut d.max_inflated_len)?;
        override_var(
            &lookup,
            "ANALYZER_MAX_TRICKS_PER_ROUND",
            &mut cfg.extraction.max_tricks_per_round,
        )?;
        let c = &mut cfg.comparator;
        override_var(&lookup, "ANALYZER_HIGH_SEVERITY_POINTS", &mut c.high_severity_points)?;
        override_var(&lookup, "ANALYZER_GREEN_PCT", &mut c.green_pct)?;
        override_var(&lookup, "ANALYZER_YELLOW_PCT", &mut c.yellow_pct)?;

        if c.yellow_pct > c.green_pct {
            return Err(AnalyzerError::config(format!(
                "ANALYZER_YELLOW_PCT ({}) must not exceed ANALYZER_GREEN_PCT ({})",
                c.yellow_pct, c.green_pct
            )));
        }
        if cfg.extraction.max_tricks_per_round == 0 {
            return Err(AnalyzerError::config(
                "ANALYZER_MAX_TRICKS_PER_ROUND must be positive",
            ));
        }
        Ok(cfg)
    }
}

fn override_var<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<(), AnalyzerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e| AnalyzerError::config(format!("{key}={raw:?}: {e}")))?;
    }
    Ok(())
}
