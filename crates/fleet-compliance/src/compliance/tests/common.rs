use chrono::{Duration, NaiveDate};

use crate::compliance::domain::{ComplianceDocument, DocumentCategory, Entity, EntityKind};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn days_from_as_of(days: i64) -> Option<NaiveDate> {
    Some(as_of() + Duration::days(days))
}

pub(super) fn document(id: &str, days: Option<i64>) -> ComplianceDocument {
    ComplianceDocument::Document {
        id: id.to_string(),
        name: format!("Document {id}"),
        category: DocumentCategory::Registration,
        expiry_date: days.and_then(days_from_as_of),
    }
}

/// Two-level equipment tree, a truck, a vendor, and an operator.
pub(super) fn sample_fleet() -> Vec<Entity> {
    vec![
        Entity::new("EXC-100", EntityKind::Equipment, "Excavator 320")
            .with_document(ComplianceDocument::Document {
                id: "exc-registration".to_string(),
                name: "Registration".to_string(),
                category: DocumentCategory::Registration,
                expiry_date: days_from_as_of(120),
            })
            .with_document(ComplianceDocument::Document {
                id: "exc-insurance".to_string(),
                name: "Liability insurance".to_string(),
                category: DocumentCategory::Insurance,
                expiry_date: days_from_as_of(-5),
            }),
        Entity::new("EXC-100-ATT", EntityKind::Equipment, "Hydraulic breaker")
            .with_parent("EXC-100")
            .with_document(ComplianceDocument::Inspection {
                id: "att-inspection".to_string(),
                inspector: "Midwest Lifting Inspections".to_string(),
                performed_on: days_from_as_of(-362),
                next_due: days_from_as_of(3),
            }),
        Entity::new("TRK-7", EntityKind::Vehicle, "Service truck")
            .with_document(ComplianceDocument::Document {
                id: "trk-registration".to_string(),
                name: "Registration".to_string(),
                category: DocumentCategory::Registration,
                expiry_date: days_from_as_of(20),
            })
            .with_document(ComplianceDocument::Document {
                id: "trk-manual".to_string(),
                name: "Operator manual".to_string(),
                category: DocumentCategory::Manual,
                expiry_date: None,
            }),
        Entity::new("VND-1", EntityKind::Vendor, "Acme Hydraulics").with_document(
            ComplianceDocument::Contract {
                id: "vnd-msa".to_string(),
                title: "Master service agreement".to_string(),
                counterparty: "Acme Hydraulics".to_string(),
                end_date: days_from_as_of(200),
            },
        ),
        Entity::new("OPR-1", EntityKind::Operator, "J. Rivera").with_document(
            ComplianceDocument::Certification {
                id: "opr-cdl".to_string(),
                name: "Commercial driver license".to_string(),
                issuer: "Iowa DOT".to_string(),
                expiry_date: days_from_as_of(40),
            },
        ),
    ]
}
