use super::super::aggregator::ComplianceScore;
use super::super::classifier::StatusClassifier;
use super::super::domain::{DatedItem, Entity, EntityId, EntityKind, SeverityTier};
use super::super::engine::ComplianceEngine;
use super::super::hierarchy::{Hierarchy, HierarchyNode, OrphanReason};
use super::views::{
    EntityComplianceView, ExpiringItemView, FleetReportSummary, OrphanView, RollupView,
    TierTotalEntry,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct EntityCompliance {
    pub entity_id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub compliance: ComplianceScore,
}

/// Compliance for one hierarchy node: its own items and its whole subtree.
#[derive(Debug, Clone, Serialize)]
pub struct RollupNode {
    pub entity_id: EntityId,
    pub name: String,
    pub own: ComplianceScore,
    pub subtree: ComplianceScore,
    pub children: Vec<RollupNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanEntry {
    pub entity_id: EntityId,
    pub name: String,
    pub reason: OrphanReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringItem {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub item_id: String,
    pub item_kind: &'static str,
    pub title: String,
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
    pub tier: SeverityTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub as_of: NaiveDate,
    pub fleet: ComplianceScore,
    pub entities: Vec<EntityCompliance>,
    pub rollups: Vec<RollupNode>,
    pub orphans: Vec<OrphanEntry>,
    pub upcoming: Vec<ExpiringItem>,
}

impl FleetReport {
    pub fn entity(&self, id: &EntityId) -> Option<&EntityCompliance> {
        self.entities.iter().find(|entry| &entry.entity_id == id)
    }

    pub fn summary(&self) -> FleetReportSummary {
        let tier_totals = SeverityTier::ordered()
            .into_iter()
            .map(|tier| TierTotalEntry {
                tier,
                tier_label: tier.label(),
                count: self.fleet.count(tier),
            })
            .collect();

        let entities: Vec<EntityComplianceView> =
            self.entities.iter().map(EntityCompliance::to_view).collect();

        let mut attention_required: Vec<EntityComplianceView> = entities
            .iter()
            .filter(|view| view.dominant_tier.requires_attention())
            .cloned()
            .collect();
        attention_required.sort_by(|left, right| {
            right
                .dominant_tier
                .cmp(&left.dominant_tier)
                .then(left.score.cmp(&right.score))
                .then_with(|| left.entity_id.cmp(&right.entity_id))
        });

        FleetReportSummary {
            as_of: self.as_of,
            fleet_score: self.fleet.score,
            fleet_tier: self.fleet.dominant_tier,
            fleet_tier_label: self.fleet.dominant_tier.label(),
            tier_totals,
            entities,
            attention_required,
            hierarchy: self.rollups.iter().map(RollupNode::to_view).collect(),
            upcoming: self.upcoming.iter().map(ExpiringItem::to_view).collect(),
            orphans: self.orphans.iter().map(OrphanEntry::to_view).collect(),
        }
    }
}

impl EntityCompliance {
    pub fn to_view(&self) -> EntityComplianceView {
        EntityComplianceView {
            entity_id: self.entity_id.clone(),
            name: self.name.clone(),
            kind_label: self.kind.label(),
            score: self.compliance.score,
            dominant_tier: self.compliance.dominant_tier,
            tier_label: self.compliance.dominant_tier.label(),
            tracked_items: self.compliance.total_items(),
        }
    }
}

impl RollupNode {
    pub fn to_view(&self) -> RollupView {
        RollupView {
            entity_id: self.entity_id.clone(),
            name: self.name.clone(),
            own_score: self.own.score,
            subtree_score: self.subtree.score,
            subtree_tier_label: self.subtree.dominant_tier.label(),
            children: self.children.iter().map(RollupNode::to_view).collect(),
        }
    }
}

impl OrphanEntry {
    pub fn to_view(&self) -> OrphanView {
        OrphanView {
            entity_id: self.entity_id.clone(),
            name: self.name.clone(),
            reason: self.reason,
            reason_label: self.reason.label(),
        }
    }
}

impl ExpiringItem {
    pub fn to_view(&self) -> ExpiringItemView {
        ExpiringItemView {
            entity_id: self.entity_id.clone(),
            entity_name: self.entity_name.clone(),
            item_id: self.item_id.clone(),
            item_kind: self.item_kind,
            title: self.title.clone(),
            expiry_date: self.expiry_date,
            days_remaining: self.days_remaining,
            tier: self.tier,
            tier_label: self.tier.label(),
        }
    }
}

pub(crate) fn build_report(
    engine: &ComplianceEngine,
    entities: &[Entity],
    hierarchy: &Hierarchy<'_>,
    as_of: NaiveDate,
) -> FleetReport {
    let aggregator = engine.aggregator();
    let mut fleet_tiers = Vec::new();
    let mut per_entity = BTreeMap::new();

    let entity_results = entities
        .iter()
        .map(|entity| {
            let tiers = engine.classifier().classify_all(&entity.documents, as_of);
            fleet_tiers.extend_from_slice(&tiers);
            let compliance = aggregator.aggregate(&tiers);
            per_entity.insert(entity.id.clone(), compliance.clone());
            EntityCompliance {
                entity_id: entity.id.clone(),
                name: entity.name.clone(),
                kind: entity.kind,
                compliance,
            }
        })
        .collect();

    let rollups = hierarchy
        .roots
        .iter()
        .map(|node| rollup(engine, node, &per_entity))
        .collect();

    let orphans = hierarchy
        .orphans
        .iter()
        .map(|orphan| OrphanEntry {
            entity_id: orphan.entity.id.clone(),
            name: orphan.entity.name.clone(),
            reason: orphan.reason,
        })
        .collect();

    FleetReport {
        as_of,
        fleet: aggregator.aggregate(&fleet_tiers),
        entities: entity_results,
        rollups,
        orphans,
        upcoming: upcoming_expirations(
            engine.classifier(),
            entities,
            as_of,
            engine.upcoming_horizon_days(),
        ),
    }
}

fn rollup(
    engine: &ComplianceEngine,
    node: &HierarchyNode<'_>,
    per_entity: &BTreeMap<EntityId, ComplianceScore>,
) -> RollupNode {
    let own = per_entity
        .get(&node.entity.id)
        .cloned()
        .unwrap_or_else(|| engine.aggregator().aggregate(&[]));

    let children: Vec<RollupNode> = node
        .children
        .iter()
        .map(|child| rollup(engine, child, per_entity))
        .collect();

    let mut counts = own.tier_counts.clone();
    for child in &children {
        for (tier, count) in &child.subtree.tier_counts {
            *counts.entry(*tier).or_insert(0) += count;
        }
    }

    RollupNode {
        entity_id: node.entity.id.clone(),
        name: node.entity.name.clone(),
        subtree: engine.aggregator().from_counts(counts),
        own,
        children,
    }
}

/// Items already expired or expiring within `horizon_days`, soonest first.
pub fn upcoming_expirations(
    classifier: &StatusClassifier,
    entities: &[Entity],
    as_of: NaiveDate,
    horizon_days: u32,
) -> Vec<ExpiringItem> {
    let mut items: Vec<ExpiringItem> = entities
        .iter()
        .flat_map(|entity| {
            entity.documents.iter().filter_map(move |document| {
                let expiry_date = document.expiry_date()?;
                let days_remaining = StatusClassifier::days_remaining(expiry_date, as_of);
                if days_remaining > i64::from(horizon_days) {
                    return None;
                }

                Some(ExpiringItem {
                    entity_id: entity.id.clone(),
                    entity_name: entity.name.clone(),
                    item_id: document.item_id().to_string(),
                    item_kind: document.kind_label(),
                    title: document.title().to_string(),
                    expiry_date,
                    days_remaining,
                    tier: classifier.classify(Some(expiry_date), as_of),
                })
            })
        })
        .collect();

    items.sort_by(|left, right| {
        left.days_remaining
            .cmp(&right.days_remaining)
            .then_with(|| left.entity_id.cmp(&right.entity_id))
            .then_with(|| left.item_id.cmp(&right.item_id))
    });
    items
}
