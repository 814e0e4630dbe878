use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classifier::StatusClassifier;
use super::domain::{Entity, EntityId, SeverityTier};

/// Penalty applied per item for each tier. A score is `100 * (1 - mean penalty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    pub expired: f64,
    pub urgent: f64,
    pub warning: f64,
    pub valid: f64,
    pub inactive: f64,
}

impl PenaltyWeights {
    pub fn penalty(&self, tier: SeverityTier) -> f64 {
        let raw = match tier {
            SeverityTier::Expired => self.expired,
            SeverityTier::Urgent => self.urgent,
            SeverityTier::Warning => self.warning,
            SeverityTier::Valid => self.valid,
            SeverityTier::Inactive => self.inactive,
        };

        if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            expired: 1.0,
            urgent: 0.6,
            warning: 0.25,
            valid: 0.0,
            inactive: 0.0,
        }
    }
}

/// Score and tier breakdown for one collection of tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub score: u8,
    pub dominant_tier: SeverityTier,
    pub tier_counts: BTreeMap<SeverityTier, usize>,
}

impl ComplianceScore {
    pub fn count(&self, tier: SeverityTier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn total_items(&self) -> usize {
        self.tier_counts.values().sum()
    }
}

/// Derived compliance summary for a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub entity_id: EntityId,
    #[serde(flatten)]
    pub summary: ComplianceScore,
}

impl ComplianceResult {
    pub fn score(&self) -> u8 {
        self.summary.score
    }

    pub fn dominant_tier(&self) -> SeverityTier {
        self.summary.dominant_tier
    }
}

/// Reduces per-item tiers into an entity level score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceAggregator {
    weights: PenaltyWeights,
}

impl ComplianceAggregator {
    pub fn new(weights: PenaltyWeights) -> Self {
        Self { weights }
    }

    pub fn aggregate(&self, tiers: &[SeverityTier]) -> ComplianceScore {
        let mut tier_counts: BTreeMap<SeverityTier, usize> = SeverityTier::ordered()
            .into_iter()
            .map(|tier| (tier, 0))
            .collect();
        for tier in tiers {
            *tier_counts.entry(*tier).or_insert(0) += 1;
        }

        self.from_counts(tier_counts)
    }

    /// Aggregation works on counts only, so input order never affects the result.
    pub fn from_counts(&self, tier_counts: BTreeMap<SeverityTier, usize>) -> ComplianceScore {
        let total: usize = tier_counts.values().sum();
        if total == 0 {
            return ComplianceScore {
                score: 100,
                dominant_tier: SeverityTier::Inactive,
                tier_counts,
            };
        }

        let dominant_tier = tier_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(tier, _)| *tier)
            .max()
            .unwrap_or(SeverityTier::Inactive);

        let penalty_sum: f64 = SeverityTier::ordered()
            .into_iter()
            .map(|tier| {
                let count = tier_counts.get(&tier).copied().unwrap_or(0);
                self.weights.penalty(tier) * count as f64
            })
            .sum();
        let mean_penalty = penalty_sum / total as f64;
        let score = (100.0 * (1.0 - mean_penalty)).round().clamp(0.0, 100.0) as u8;

        ComplianceScore {
            score,
            dominant_tier,
            tier_counts,
        }
    }

    /// Classify every dated item an entity owns and aggregate the result.
    pub fn evaluate(
        &self,
        entity: &Entity,
        classifier: &StatusClassifier,
        as_of: NaiveDate,
    ) -> ComplianceResult {
        let tiers = classifier.classify_all(&entity.documents, as_of);
        ComplianceResult {
            entity_id: entity.id.clone(),
            summary: self.aggregate(&tiers),
        }
    }
}
