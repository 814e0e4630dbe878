use chrono::{Duration, Local, NaiveDate};
use fleet_compliance::compliance::{
    ComplianceDocument, ComplianceEngine, DocumentCategory, Entity, EntityKind,
};
use fleet_compliance::notifications::RoutingPolicy;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared evaluation policy handed to every compliance handler.
#[derive(Debug, Clone)]
pub(crate) struct ComplianceState {
    pub(crate) engine: ComplianceEngine,
    pub(crate) routing: Arc<RoutingPolicy>,
}

impl ComplianceState {
    pub(crate) fn new(engine: ComplianceEngine, routing: RoutingPolicy) -> Self {
        Self {
            engine,
            routing: Arc::new(routing),
        }
    }
}

/// The local calendar date. The only clock read in the service.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Small mixed fleet used by the demo command when no export is supplied.
pub(crate) fn sample_fleet(as_of: NaiveDate) -> Vec<Entity> {
    let day = |offset: i64| Some(as_of + Duration::days(offset));

    vec![
        Entity::new("EXC-200", EntityKind::Equipment, "Tracked excavator")
            .with_document(ComplianceDocument::Document {
                id: "exc-200-reg".to_string(),
                name: "Registration".to_string(),
                category: DocumentCategory::Registration,
                expiry_date: day(95),
            })
            .with_document(ComplianceDocument::Document {
                id: "exc-200-ins".to_string(),
                name: "Liability insurance".to_string(),
                category: DocumentCategory::Insurance,
                expiry_date: day(-3),
            }),
        Entity::new("EXC-200-BRK", EntityKind::Equipment, "Hydraulic breaker")
            .with_parent("EXC-200")
            .with_document(ComplianceDocument::Inspection {
                id: "brk-insp".to_string(),
                inspector: "Site safety".to_string(),
                performed_on: day(-180),
                next_due: day(5),
            }),
        Entity::new("TRK-12", EntityKind::Vehicle, "Lowboy tractor")
            .with_document(ComplianceDocument::Document {
                id: "trk-12-permit".to_string(),
                name: "Oversize permit".to_string(),
                category: DocumentCategory::Permit,
                expiry_date: day(21),
            })
            .with_document(ComplianceDocument::Document {
                id: "trk-12-manual".to_string(),
                name: "Operator manual".to_string(),
                category: DocumentCategory::Manual,
                expiry_date: None,
            }),
        Entity::new("VND-4", EntityKind::Vendor, "Hydraulics Direct").with_document(
            ComplianceDocument::Contract {
                id: "vnd-4-msa".to_string(),
                title: "Service agreement".to_string(),
                counterparty: "Hydraulics Direct".to_string(),
                end_date: day(240),
            },
        ),
        Entity::new("OPR-17", EntityKind::Operator, "J. Alvarez").with_document(
            ComplianceDocument::Certification {
                id: "opr-17-cdl".to_string(),
                name: "Class A CDL".to_string(),
                issuer: "State DMV".to_string(),
                expiry_date: day(12),
            },
        ),
    ]
}
