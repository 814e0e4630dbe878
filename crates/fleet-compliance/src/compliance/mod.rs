//! Compliance status derivation, scoring, and hierarchy assembly.
//!
//! Every component is a pure function of its inputs. The as-of date is always
//! supplied by the caller; nothing in this module reads the clock.

pub mod aggregator;
pub mod classifier;
pub mod domain;
mod engine;
pub mod hierarchy;
pub mod report;

#[cfg(test)]
mod tests;

pub use aggregator::{ComplianceAggregator, ComplianceResult, ComplianceScore, PenaltyWeights};
pub use classifier::{StatusClassifier, ThresholdError, TierThresholds};
pub use domain::{
    ComplianceDocument, DatedItem, DocumentCategory, Entity, EntityId, EntityKind, SeverityTier,
};
pub use engine::{ComplianceEngine, DEFAULT_UPCOMING_HORIZON_DAYS};
pub use hierarchy::{
    Hierarchy, HierarchyBuilder, HierarchyError, HierarchyNode, MissingParentPolicy, Orphan,
    OrphanReason, DEFAULT_MAX_HIERARCHY_DEPTH,
};
pub use report::FleetReport;
