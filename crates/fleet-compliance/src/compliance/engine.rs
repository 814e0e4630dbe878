use chrono::NaiveDate;

use super::aggregator::{ComplianceAggregator, ComplianceResult, PenaltyWeights};
use super::classifier::{StatusClassifier, TierThresholds};
use super::domain::Entity;
use super::hierarchy::{Hierarchy, HierarchyBuilder, HierarchyError, MissingParentPolicy};
use super::report::{self, FleetReport};
use crate::config::ComplianceConfig;

pub const DEFAULT_UPCOMING_HORIZON_DAYS: u32 = 30;

/// Bundles the classifier, aggregator, and hierarchy builder behind one
/// explicitly constructed policy.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceEngine {
    classifier: StatusClassifier,
    aggregator: ComplianceAggregator,
    hierarchy: HierarchyBuilder,
    upcoming_horizon_days: u32,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(
            TierThresholds::default(),
            PenaltyWeights::default(),
            MissingParentPolicy::default(),
        )
    }
}

impl ComplianceEngine {
    pub fn new(
        thresholds: TierThresholds,
        weights: PenaltyWeights,
        missing_parent: MissingParentPolicy,
    ) -> Self {
        Self {
            classifier: StatusClassifier::new(thresholds),
            aggregator: ComplianceAggregator::new(weights),
            hierarchy: HierarchyBuilder::new(missing_parent),
            upcoming_horizon_days: DEFAULT_UPCOMING_HORIZON_DAYS,
        }
    }

    pub fn from_config(config: &ComplianceConfig) -> Self {
        Self::new(
            config.thresholds,
            PenaltyWeights::default(),
            config.missing_parent,
        )
        .with_upcoming_horizon(config.upcoming_horizon_days)
    }

    pub fn with_upcoming_horizon(mut self, days: u32) -> Self {
        self.upcoming_horizon_days = days;
        self
    }

    pub fn classifier(&self) -> &StatusClassifier {
        &self.classifier
    }

    pub fn aggregator(&self) -> &ComplianceAggregator {
        &self.aggregator
    }

    pub fn hierarchy_builder(&self) -> &HierarchyBuilder {
        &self.hierarchy
    }

    pub fn upcoming_horizon_days(&self) -> u32 {
        self.upcoming_horizon_days
    }

    pub fn evaluate(&self, entity: &Entity, as_of: NaiveDate) -> ComplianceResult {
        self.aggregator.evaluate(entity, &self.classifier, as_of)
    }

    pub fn hierarchy<'a>(&self, entities: &'a [Entity]) -> Result<Hierarchy<'a>, HierarchyError> {
        self.hierarchy.build(entities)
    }

    pub fn report(
        &self,
        entities: &[Entity],
        as_of: NaiveDate,
    ) -> Result<FleetReport, HierarchyError> {
        let hierarchy = self.hierarchy.build(entities)?;
        Ok(report::build_report(self, entities, &hierarchy, as_of))
    }
}
