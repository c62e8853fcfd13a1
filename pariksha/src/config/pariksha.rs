//! Main ParikshaConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::evaluation::OffsetSearchConfig;
use crate::pipeline::EvaluatorConfig;
use crate::segmentation::RegionDetectorConfig;

use super::alignment::AlignmentSection;
use super::association::AssociationSection;
use super::cleanup::CleanupSection;
use super::error::ConfigLoadError;
use super::metrics::MetricsSection;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/pariksha.yaml";

/// Full Pariksha configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ParikshaConfig {
    /// Timestamp association settings
    #[serde(default)]
    pub association: AssociationSection,

    /// Reference cleanup settings
    #[serde(default)]
    pub cleanup: CleanupSection,

    /// Region detection settings
    #[serde(default)]
    pub segmentation: RegionDetectorConfig,

    /// Per-region alignment settings
    #[serde(default)]
    pub alignment: AlignmentSection,

    /// APE / RPE settings
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Time offset search settings
    #[serde(default)]
    pub offset_search: OffsetSearchConfig,
}

impl ParikshaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/pariksha.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.association.max_diff.is_finite() || self.association.max_diff < 0.0 {
            return Err(ConfigLoadError::Invalid(format!(
                "association.max_diff must be non-negative, got {}",
                self.association.max_diff
            )));
        }
        if self.segmentation.rescale_threshold == 0 {
            return Err(ConfigLoadError::Invalid(
                "segmentation.rescale_threshold must be positive".into(),
            ));
        }
        if let Some(threshold) = self.cleanup.abnormal_step_threshold
            && (!threshold.is_finite() || threshold <= 0.0)
        {
            return Err(ConfigLoadError::Invalid(format!(
                "cleanup.abnormal_step_threshold must be positive, got {}",
                threshold
            )));
        }
        for (name, delta) in [
            ("metrics.rpe.delta", self.metrics.rpe.delta),
            ("offset_search.rpe.delta", self.offset_search.rpe.delta),
        ] {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(ConfigLoadError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, delta
                )));
            }
        }
        self.cleanup.local_transform()?;
        Ok(())
    }

    /// Convert to the evaluator's runtime config
    pub fn to_evaluator_config(&self) -> Result<EvaluatorConfig, ConfigLoadError> {
        Ok(EvaluatorConfig {
            max_diff: self.association.max_diff,
            offset: self.association.offset,
            remove_non_monotonic: self.cleanup.remove_non_monotonic,
            abnormal_step_threshold: self.cleanup.abnormal_step_threshold,
            local_transform: self.cleanup.local_transform()?,
            regions: self.segmentation.clone(),
            correct_scale: self.alignment.correct_scale,
            smooth_edges: self.alignment.smooth_edges,
            ape_relation: self.metrics.ape_relation,
            rpe: self.metrics.rpe.clone(),
            max_null_length: self.metrics.max_null_length,
        })
    }

    /// Get the region detector config
    pub fn region_detector_config(&self) -> RegionDetectorConfig {
        self.segmentation.clone()
    }

    /// Get the offset search config
    pub fn offset_search_config(&self) -> OffsetSearchConfig {
        self.offset_search.clone()
    }
}
