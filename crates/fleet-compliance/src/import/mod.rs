//! Loads fleet entities and their dated items from CSV exports.
//!
//! Each row names an entity and optionally one dated item it owns. Rows sharing
//! an `entity_id` are merged in first-seen order.

mod parser;

use crate::compliance::{ComplianceDocument, DocumentCategory, Entity, EntityId, EntityKind};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use parser::FleetRow;

#[derive(Debug)]
pub enum FleetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownEntityKind { row: usize, value: String },
    UnknownItemKind { row: usize, value: String },
    MissingItemId { row: usize },
    InvalidDate { row: usize, value: String },
    ConflictingEntity { row: usize, id: String },
}

impl std::fmt::Display for FleetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetImportError::Io(err) => write!(f, "failed to read fleet export: {}", err),
            FleetImportError::Csv(err) => write!(f, "invalid fleet CSV data: {}", err),
            FleetImportError::UnknownEntityKind { row, value } => {
                write!(f, "row {row}: unknown entity kind '{value}'")
            }
            FleetImportError::UnknownItemKind { row, value } => {
                write!(f, "row {row}: unknown item kind '{value}'")
            }
            FleetImportError::MissingItemId { row } => {
                write!(f, "row {row}: item_kind is set but item_id is empty")
            }
            FleetImportError::InvalidDate { row, value } => {
                write!(f, "row {row}: '{value}' is not a YYYY-MM-DD date")
            }
            FleetImportError::ConflictingEntity { row, id } => write!(
                f,
                "row {row}: entity '{id}' redefined with a different kind, name, or parent"
            ),
        }
    }
}

impl std::error::Error for FleetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FleetImportError::Io(err) => Some(err),
            FleetImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FleetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FleetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct FleetImporter;

impl FleetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Entity>, FleetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Entity>, FleetImportError> {
        let mut entities: Vec<Entity> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (offset, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = offset + 1;
            let document = document_from_row(row_number, &row)?;
            let candidate = entity_from_row(row_number, row)?;

            let position = match positions.get(candidate.id.as_str()) {
                Some(&position) => {
                    let existing = &entities[position];
                    if existing.kind != candidate.kind
                        || existing.parent_id != candidate.parent_id
                        || (!candidate.name.is_empty() && existing.name != candidate.name)
                    {
                        return Err(FleetImportError::ConflictingEntity {
                            row: row_number,
                            id: candidate.id.0,
                        });
                    }
                    position
                }
                None => {
                    positions.insert(candidate.id.0.clone(), entities.len());
                    entities.push(candidate);
                    entities.len() - 1
                }
            };

            if let Some(document) = document {
                entities[position].documents.push(document);
            }
        }

        debug!(entities = entities.len(), "fleet export imported");
        Ok(entities)
    }
}

fn entity_from_row(row_number: usize, row: FleetRow) -> Result<Entity, FleetImportError> {
    let kind =
        EntityKind::parse(&row.entity_kind).ok_or_else(|| FleetImportError::UnknownEntityKind {
            row: row_number,
            value: row.entity_kind.clone(),
        })?;

    Ok(Entity {
        id: EntityId(row.entity_id),
        kind,
        name: row.entity_name,
        parent_id: row.parent_id.map(EntityId),
        documents: Vec::new(),
    })
}

fn document_from_row(
    row_number: usize,
    row: &FleetRow,
) -> Result<Option<ComplianceDocument>, FleetImportError> {
    let Some(item_kind) = row.item_kind.as_deref() else {
        return Ok(None);
    };
    let id = row
        .item_id
        .clone()
        .ok_or(FleetImportError::MissingItemId { row: row_number })?;
    let expiry = optional_date(row_number, row.expiry_date.as_deref())?;
    let title = row.item_title.clone();
    let detail = row.item_detail.clone();

    let document = match item_kind.trim().to_ascii_lowercase().as_str() {
        "document" => ComplianceDocument::Document {
            id,
            name: title,
            category: document_category(&detail),
            expiry_date: expiry,
        },
        "certification" => ComplianceDocument::Certification {
            id,
            name: title,
            issuer: detail,
            expiry_date: expiry,
        },
        "contract" => ComplianceDocument::Contract {
            id,
            title,
            counterparty: detail,
            end_date: expiry,
        },
        "inspection" => ComplianceDocument::Inspection {
            id,
            inspector: detail,
            performed_on: optional_date(row_number, row.performed_on.as_deref())?,
            next_due: expiry,
        },
        other => {
            return Err(FleetImportError::UnknownItemKind {
                row: row_number,
                value: other.to_string(),
            })
        }
    };

    Ok(Some(document))
}

fn optional_date(
    row_number: usize,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, FleetImportError> {
    match value {
        None => Ok(None),
        Some(raw) => parser::parse_date(raw)
            .map(Some)
            .ok_or_else(|| FleetImportError::InvalidDate {
                row: row_number,
                value: raw.to_string(),
            }),
    }
}

fn document_category(value: &str) -> DocumentCategory {
    match value.trim().to_ascii_lowercase().as_str() {
        "registration" => DocumentCategory::Registration,
        "insurance" => DocumentCategory::Insurance,
        "permit" => DocumentCategory::Permit,
        "manual" => DocumentCategory::Manual,
        _ => DocumentCategory::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::DatedItem;
    use std::io::Cursor;

    const HEADER: &str = "entity_id,entity_kind,entity_name,parent_id,item_kind,item_id,item_title,item_detail,expiry_date\n";

    fn import(rows: &str) -> Result<Vec<Entity>, FleetImportError> {
        FleetImporter::from_reader(Cursor::new(format!("{HEADER}{rows}")))
    }

    #[test]
    fn rows_merge_into_entities_in_first_seen_order() {
        let entities = import(
            "EXC-1,equipment,Excavator,,document,d-1,Registration,registration,2026-01-31\n\
TRK-1,vehicle,Truck,,,,,,\n\
EXC-1,equipment,Excavator,,certification,c-1,Lift cert,NCCCO,\n",
        )
        .expect("import succeeds");

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, EntityId::new("EXC-1"));
        assert_eq!(entities[0].documents.len(), 2);
        assert_eq!(
            entities[0].documents[0].expiry_date(),
            NaiveDate::from_ymd_opt(2026, 1, 31)
        );
        assert_eq!(entities[0].documents[1].expiry_date(), None);
        assert!(entities[1].documents.is_empty());
    }

    #[test]
    fn parent_ids_are_carried_through() {
        let entities = import(
            "EXC-1,equipment,Excavator,,,,,,\nATT-1,equipment,Breaker,EXC-1,inspection,i-1,,State DOT,2025-12-01\n",
        )
        .expect("import succeeds");

        assert_eq!(entities[1].parent_id, Some(EntityId::new("EXC-1")));
        match &entities[1].documents[0] {
            ComplianceDocument::Inspection { inspector, .. } => assert_eq!(inspector, "State DOT"),
            other => panic!("expected inspection, got {other:?}"),
        }
    }

    #[test]
    fn unknown_entity_kind_is_rejected() {
        match import("X-1,spaceship,Enterprise,,,,,,\n") {
            Err(FleetImportError::UnknownEntityKind { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "spaceship");
            }
            other => panic!("expected unknown entity kind, got {other:?}"),
        }
    }

    #[test]
    fn malformed_dates_are_not_treated_as_missing() {
        match import("EXC-1,equipment,Excavator,,document,d-1,Registration,,31/01/2026\n") {
            Err(FleetImportError::InvalidDate { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "31/01/2026");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn conflicting_entity_rows_are_rejected() {
        let result = import("EXC-1,equipment,Excavator,,,,,,\nEXC-1,vehicle,Excavator,,,,,,\n");
        assert!(matches!(
            result,
            Err(FleetImportError::ConflictingEntity { row: 2, .. })
        ));
    }

    #[test]
    fn items_require_an_id() {
        let result = import("EXC-1,equipment,Excavator,,document,,Registration,,2026-01-31\n");
        assert!(matches!(
            result,
            Err(FleetImportError::MissingItemId { row: 1 })
        ));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        match FleetImporter::from_path("./does-not-exist.csv") {
            Err(FleetImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
