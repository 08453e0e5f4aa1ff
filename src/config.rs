//! Engine parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::ModelVariant;
use crate::units::SURFACE_PRESSURE;

/// How decompression stop boundaries are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchStrategy {
    /// bisection for the first stop, linear search refined by bisection
    /// for stop lengths
    #[default]
    Bisect,
    /// one stop interval or one minute at a time
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    pub surface_pressure: f64, // bar
    pub ascent_rate: f64,      // m/min
    pub descent_rate: f64,     // m/min
    pub last_stop_6m: bool,
    pub gf_low: f64,            // 0 < x <= 1
    pub gf_high: f64,           // 0 < x <= 1
    pub deco_stop_search_time: u32, // minutes
    pub model: ModelVariant,
    pub search: SearchStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            surface_pressure: SURFACE_PRESSURE,
            ascent_rate: 10.0,
            descent_rate: 20.0,
            last_stop_6m: false,
            gf_low: 0.3,
            gf_high: 0.85,
            deco_stop_search_time: 8,
            model: ModelVariant::ZhL16B,
            search: SearchStrategy::Bisect,
        }
    }
}

impl EngineConfig {
    pub fn with_gradient_factors(mut self, gf_low: f64, gf_high: f64) -> Self {
        self.gf_low = gf_low;
        self.gf_high = gf_high;
        self
    }

    pub fn with_surface_pressure(mut self, surface_pressure: f64) -> Self {
        self.surface_pressure = surface_pressure;
        self
    }

    pub fn with_rates(mut self, ascent_rate: f64, descent_rate: f64) -> Self {
        self.ascent_rate = ascent_rate;
        self.descent_rate = descent_rate;
        self
    }

    pub fn with_model(mut self, model: ModelVariant) -> Self {
        self.model = model;
        self
    }

    pub fn with_last_stop_6m(mut self, last_stop_6m: bool) -> Self {
        self.last_stop_6m = last_stop_6m;
        self
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (low, high) = (self.gf_low, self.gf_high);
        if !(low > 0.0 && low <= 1.0 && high > 0.0 && high <= 1.0 && low <= high) {
            return Err(ConfigError::GradientFactors { low, high });
        }
        if !(self.ascent_rate > 0.0 && self.descent_rate > 0.0) {
            return Err(ConfigError::Rate {
                ascent: self.ascent_rate,
                descent: self.descent_rate,
            });
        }
        if !(0.5..=1.5).contains(&self.surface_pressure) {
            return Err(ConfigError::SurfacePressure(self.surface_pressure));
        }
        if self.deco_stop_search_time == 0 {
            return Err(ConfigError::SearchTime);
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration, missing fields take their
    /// defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejecting engine configuration");
            ConfigError::Malformed {
                line: e.line(),
                column: e.column(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_gradient_factor_order() {
        let config = EngineConfig::default().with_gradient_factors(0.9, 0.3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::GradientFactors {
                low: 0.9,
                high: 0.3
            })
        );
    }

    #[test]
    fn test_rates_and_surface_pressure() {
        let config = EngineConfig::default().with_rates(0.0, 20.0);
        assert!(matches!(config.validate(), Err(ConfigError::Rate { .. })));

        let config = EngineConfig::default().with_surface_pressure(2.0);
        assert_eq!(config.validate(), Err(ConfigError::SurfacePressure(2.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json(
            r#"{"gf_low": 0.2, "gf_high": 0.9, "model": "ZH-L16C-GF", "last_stop_6m": true}"#,
        )
        .unwrap();
        assert_eq!(config.gf_low, 0.2);
        assert_eq!(config.model, ModelVariant::ZhL16C);
        assert!(config.last_stop_6m);
        assert_eq!(config.ascent_rate, 10.0);
        assert_eq!(config.search, SearchStrategy::Bisect);

        assert!(matches!(
            EngineConfig::from_json("{\"gf_low\": }"),
            Err(ConfigError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"gf_low": 0.95, "gf_high": 0.5}"#),
            Err(ConfigError::GradientFactors { .. })
        ));
    }
}
