use super::common::*;
use crate::compliance::domain::{Entity, EntityId, EntityKind, SeverityTier};
use crate::compliance::engine::ComplianceEngine;
use crate::compliance::hierarchy::OrphanReason;

#[test]
fn end_to_end_scenario_scores_and_nests() {
    let entities = vec![
        Entity::new("E1", EntityKind::Equipment, "Loader")
            .with_document(document("d-expired", Some(-5)))
            .with_document(document("d-valid", Some(40))),
        Entity::new("E2", EntityKind::Equipment, "Bucket").with_parent("E1"),
    ];
    let engine = ComplianceEngine::default();

    let result = engine.evaluate(&entities[0], as_of());
    assert_eq!(result.entity_id, EntityId::new("E1"));
    assert_eq!(result.dominant_tier(), SeverityTier::Expired);
    assert_eq!(result.score(), 50);

    let hierarchy = engine.hierarchy(&entities).expect("valid hierarchy");
    assert_eq!(hierarchy.roots.len(), 1);
    assert_eq!(hierarchy.roots[0].entity.id, EntityId::new("E1"));
    assert_eq!(hierarchy.roots[0].children.len(), 1);
    assert_eq!(hierarchy.roots[0].children[0].entity.id, EntityId::new("E2"));
    assert!(hierarchy.roots[0].children[0].children.is_empty());
    assert!(hierarchy.orphans.is_empty());
}

#[test]
fn report_rolls_child_items_into_parent_subtree() {
    let fleet = sample_fleet();
    let report = ComplianceEngine::default()
        .report(&fleet, as_of())
        .expect("report builds");

    let excavator = report
        .rollups
        .iter()
        .find(|node| node.entity_id == EntityId::new("EXC-100"))
        .expect("excavator root");
    assert_eq!(excavator.own.score, 50);
    assert_eq!(excavator.subtree.total_items(), 3);
    // (1.0 + 0.6 + 0.0) / 3 -> 46.67 -> 47
    assert_eq!(excavator.subtree.score, 47);
    assert_eq!(excavator.subtree.dominant_tier, SeverityTier::Expired);
    assert_eq!(excavator.children.len(), 1);
    assert_eq!(excavator.children[0].subtree.dominant_tier, SeverityTier::Urgent);
}

#[test]
fn report_totals_every_tracked_item() {
    let fleet = sample_fleet();
    let report = ComplianceEngine::default()
        .report(&fleet, as_of())
        .expect("report builds");

    assert_eq!(report.fleet.total_items(), 7);
    assert_eq!(report.fleet.count(SeverityTier::Valid), 3);
    assert_eq!(report.fleet.count(SeverityTier::Inactive), 1);
    // (1.0 + 0.6 + 0.25) / 7 -> 73.57 -> 74
    assert_eq!(report.fleet.score, 74);
    assert_eq!(report.entities.len(), fleet.len());
    assert_eq!(report.rollups.len(), 4, "vendor and operator are roots too");
}

#[test]
fn upcoming_expirations_are_sorted_soonest_first() {
    let fleet = sample_fleet();
    let report = ComplianceEngine::default()
        .report(&fleet, as_of())
        .expect("report builds");

    let upcoming: Vec<(&str, i64)> = report
        .upcoming
        .iter()
        .map(|item| (item.item_id.as_str(), item.days_remaining))
        .collect();
    assert_eq!(
        upcoming,
        vec![
            ("exc-insurance", -5),
            ("att-inspection", 3),
            ("trk-registration", 20),
        ]
    );
    assert_eq!(report.upcoming[1].item_kind, "Inspection");
}

#[test]
fn upcoming_horizon_is_configurable() {
    let fleet = sample_fleet();
    let report = ComplianceEngine::default()
        .with_upcoming_horizon(45)
        .report(&fleet, as_of())
        .expect("report builds");

    assert!(report
        .upcoming
        .iter()
        .any(|item| item.item_id == "opr-cdl" && item.tier == SeverityTier::Valid));
}

#[test]
fn summary_lists_attention_items_by_severity() {
    let fleet = sample_fleet();
    let summary = ComplianceEngine::default()
        .report(&fleet, as_of())
        .expect("report builds")
        .summary();

    let attention: Vec<&str> = summary
        .attention_required
        .iter()
        .map(|view| view.entity_id.as_str())
        .collect();
    assert_eq!(attention, vec!["EXC-100", "EXC-100-ATT", "TRK-7"]);
    assert_eq!(summary.fleet_tier_label, "Expired");
    assert_eq!(summary.tier_totals.len(), 5);
    assert_eq!(summary.tier_totals[0].tier_label, "Expired");
}

#[test]
fn cyclic_entities_surface_as_report_orphans() {
    let mut fleet = sample_fleet();
    fleet.push(Entity::new("LOOP-A", EntityKind::Equipment, "Loop A").with_parent("LOOP-B"));
    fleet.push(Entity::new("LOOP-B", EntityKind::Equipment, "Loop B").with_parent("LOOP-A"));

    let report = ComplianceEngine::default()
        .report(&fleet, as_of())
        .expect("report builds");

    assert_eq!(report.orphans.len(), 2);
    assert!(report
        .orphans
        .iter()
        .all(|orphan| orphan.reason == OrphanReason::Cycle));
    assert!(report
        .rollups
        .iter()
        .all(|node| !node.entity_id.as_str().starts_with("LOOP")));
    assert!(report.entity(&EntityId::new("LOOP-A")).is_some());
}
