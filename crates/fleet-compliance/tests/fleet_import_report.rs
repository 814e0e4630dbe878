use chrono::NaiveDate;
use fleet_compliance::compliance::{ComplianceEngine, EntityId, SeverityTier};
use fleet_compliance::import::FleetImporter;
use std::io::Cursor;

const EXPORT: &str = "\
entity_id,entity_kind,entity_name,parent_id,item_kind,item_id,item_title,item_detail,performed_on,expiry_date
CRN-1,equipment,Tower crane,,certification,crn-cert,Load test,State inspector,,2025-10-01
CRN-1,equipment,Tower crane,,document,crn-ins,Insurance,insurance,,2025-09-20
CRN-1-HOOK,equipment,Hook block,CRN-1,inspection,hook-insp,,Lifting Co,2025-03-01,2026-03-01
VAN-3,vehicle,Crew van,,document,van-reg,Registration,registration,,2025-11-30
OPR-9,operator,A. Chen,,certification,opr-cdl,CDL,Iowa DOT,,
";

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date")
}

#[test]
fn imported_fleet_produces_a_report() {
    let entities = FleetImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    assert_eq!(entities.len(), 4);

    let report = ComplianceEngine::default()
        .report(&entities, as_of())
        .expect("report builds");

    let crane = report
        .entity(&EntityId::new("CRN-1"))
        .expect("crane evaluated");
    assert_eq!(crane.compliance.dominant_tier, SeverityTier::Expired);
    assert_eq!(crane.compliance.count(SeverityTier::Urgent), 1);

    let crane_rollup = report
        .rollups
        .iter()
        .find(|node| node.entity_id == EntityId::new("CRN-1"))
        .expect("crane is a root");
    assert_eq!(crane_rollup.children.len(), 1);
    assert_eq!(crane_rollup.subtree.total_items(), 3);

    let operator = report
        .entity(&EntityId::new("OPR-9"))
        .expect("operator evaluated");
    assert_eq!(operator.compliance.dominant_tier, SeverityTier::Inactive);

    let upcoming: Vec<&str> = report
        .upcoming
        .iter()
        .map(|item| item.item_id.as_str())
        .collect();
    assert_eq!(upcoming, vec!["crn-ins", "crn-cert"]);
}

#[test]
fn summary_serializes_with_labels() {
    let entities = FleetImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    let summary = ComplianceEngine::default()
        .report(&entities, as_of())
        .expect("report builds")
        .summary();

    let json = serde_json::to_value(&summary).expect("summary serializes");
    assert_eq!(json["fleet_tier"], "expired");
    assert_eq!(json["fleet_tier_label"], "Expired");
    assert_eq!(json["hierarchy"][0]["entity_id"], "CRN-1");
    assert_eq!(json["hierarchy"][0]["children"][0]["entity_id"], "CRN-1-HOOK");
    assert_eq!(json["upcoming"][0]["tier_label"], "Expired");
}
