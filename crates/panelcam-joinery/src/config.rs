//! Planner settings.

use serde::{Deserialize, Serialize};

use crate::{DowelSpec, JoineryError};

/// Tunable constants of the dowel planner, in mm.
///
/// Missing fields take their defaults when deserialized, so a job file only
/// lists what it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoineryConfig {
    /// Target distance between dowels.
    pub spacing: f64,
    /// Distance kept from each end of the shared edge.
    pub margin: f64,
    /// How much margin is given back per end on short edges.
    pub fallback_widen: f64,
    /// Short edges longer than this get two dowels, shorter ones one.
    pub pair_threshold: f64,
    /// Minimum overlap across the edge needed to bore at all.
    pub min_cross_overlap: f64,
    /// Dowel used for every joint.
    pub dowel: DowelSpec,
}

impl Default for JoineryConfig {
    fn default() -> Self {
        Self {
            spacing: 80.0,
            margin: 20.0,
            fallback_widen: 10.0,
            pair_threshold: 20.0,
            min_cross_overlap: 16.0,
            dowel: DowelSpec::default(),
        }
    }
}

impl JoineryConfig {
    /// Check that the settings describe a usable planner.
    ///
    /// Every value must be finite, the lengths non-negative and the dowel
    /// positive. Spacing may not be shorter than the dowel diameter, which
    /// also bounds the number of dowels on any edge.
    pub fn validate(&self) -> Result<(), JoineryError> {
        let fields = [
            ("spacing", self.spacing),
            ("margin", self.margin),
            ("fallback_widen", self.fallback_widen),
            ("pair_threshold", self.pair_threshold),
            ("min_cross_overlap", self.min_cross_overlap),
            ("dowel.clearance", self.dowel.clearance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        for (name, value) in [
            ("dowel.diameter", self.dowel.diameter),
            ("dowel.length", self.dowel.length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.spacing < self.dowel.diameter {
            return Err(invalid(format!(
                "spacing {} is shorter than the dowel diameter {}",
                self.spacing, self.dowel.diameter
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> JoineryError {
    JoineryError::InvalidRequest(format!("joinery config: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let cfg: JoineryConfig = toml::from_str(
            r#"
            spacing = 100.0

            [dowel]
            diameter = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.spacing, 100.0);
        assert_eq!(cfg.margin, 20.0);
        assert_eq!(cfg.dowel.diameter, 8.0);
        assert_eq!(cfg.dowel.length, 35.0);
    }

    #[test]
    fn test_empty_is_default() {
        let cfg: JoineryConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, JoineryConfig::default());
    }

    #[test]
    fn test_default_is_valid() {
        assert_eq!(JoineryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_spacing = JoineryConfig {
            spacing: 0.0,
            ..JoineryConfig::default()
        };
        assert!(matches!(
            zero_spacing.validate(),
            Err(JoineryError::InvalidRequest(msg)) if msg.contains("spacing")
        ));

        let below_diameter = JoineryConfig {
            spacing: 1e-9,
            ..JoineryConfig::default()
        };
        assert!(below_diameter.validate().is_err());

        let negative_margin = JoineryConfig {
            margin: -5.0,
            ..JoineryConfig::default()
        };
        assert!(negative_margin.validate().is_err());

        let nan_widen = JoineryConfig {
            fallback_widen: f64::NAN,
            ..JoineryConfig::default()
        };
        assert!(nan_widen.validate().is_err());

        let mut no_dowel = JoineryConfig::default();
        no_dowel.dowel.diameter = 0.0;
        assert!(no_dowel.validate().is_err());
    }

    #[test]
    fn test_validate_from_toml() {
        let cfg: JoineryConfig = toml::from_str("spacing = 0.0").unwrap();
        assert!(cfg.validate().is_err());
    }
}
