use super::super::domain::{EntityId, SeverityTier};
use super::super::hierarchy::OrphanReason;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TierTotalEntry {
    pub tier: SeverityTier,
    pub tier_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityComplianceView {
    pub entity_id: EntityId,
    pub name: String,
    pub kind_label: &'static str,
    pub score: u8,
    pub dominant_tier: SeverityTier,
    pub tier_label: &'static str,
    pub tracked_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollupView {
    pub entity_id: EntityId,
    pub name: String,
    pub own_score: u8,
    pub subtree_score: u8,
    pub subtree_tier_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RollupView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringItemView {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub item_id: String,
    pub item_kind: &'static str,
    pub title: String,
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
    pub tier: SeverityTier,
    pub tier_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanView {
    pub entity_id: EntityId,
    pub name: String,
    pub reason: OrphanReason,
    pub reason_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReportSummary {
    pub as_of: NaiveDate,
    pub fleet_score: u8,
    pub fleet_tier: SeverityTier,
    pub fleet_tier_label: &'static str,
    pub tier_totals: Vec<TierTotalEntry>,
    pub entities: Vec<EntityComplianceView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attention_required: Vec<EntityComplianceView>,
    pub hierarchy: Vec<RollupView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upcoming: Vec<ExpiringItemView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphans: Vec<OrphanView>,
}
