//! Templated wellness insights
//!
//! Pure threshold selection over zone significance and the zone's static
//! reflection templates. Nothing here is a medical judgment.

use serde::{Deserialize, Serialize};

use super::orchestrator::ZoneAnalysis;
use crate::atlas::BodySystem;
use crate::config::InsightConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightConfidence {
    Subtle,
    Moderate,
    Strong,
}

impl InsightConfidence {
    /// Reflection template slot, mildest first
    fn template_index(&self) -> usize {
        match self {
            InsightConfidence::Subtle => 0,
            InsightConfidence::Moderate => 1,
            InsightConfidence::Strong => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessInsight {
    pub zone_id: String,
    pub zone_name: String,
    pub category: BodySystem,
    pub confidence: InsightConfidence,
    pub significance: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    /// `> strong` is Strong, `> moderate` is Moderate, anything else Subtle
    pub fn confidence_for(&self, significance: f64) -> InsightConfidence {
        if significance > self.config.strong_significance {
            InsightConfidence::Strong
        } else if significance > self.config.moderate_significance {
            InsightConfidence::Moderate
        } else {
            InsightConfidence::Subtle
        }
    }

    /// One insight per zone at or above the minimum significance, most
    /// significant first; equal scores keep atlas order.
    pub fn generate(&self, analyses: &[ZoneAnalysis]) -> Vec<WellnessInsight> {
        let mut insights: Vec<WellnessInsight> = analyses
            .iter()
            .filter(|a| a.significance >= self.config.min_significance)
            .map(|a| self.insight_for(a))
            .collect();
        insights.sort_by(|a, b| b.significance.total_cmp(&a.significance));
        insights
    }

    pub fn insight_for(&self, analysis: &ZoneAnalysis) -> WellnessInsight {
        let zone = &analysis.zone;
        let confidence = self.confidence_for(analysis.significance);
        let reflection = zone
            .reflections
            .get(confidence.template_index())
            .or_else(|| zone.reflections.last())
            .map(String::as_str)
            .unwrap_or(zone.description.as_str());

        WellnessInsight {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            category: zone.body_system,
            confidence,
            significance: analysis.significance,
            message: format!("{}: {}", zone.name, reflection),
        }
    }
}
