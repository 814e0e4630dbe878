use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a dated item relative to an as-of date.
///
/// Variants are declared least severe first so that the derived `Ord` makes
/// `max()` return the most severe tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Inactive,
    Valid,
    Warning,
    Urgent,
    Expired,
}

impl SeverityTier {
    /// Most severe first.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Expired,
            Self::Urgent,
            Self::Warning,
            Self::Valid,
            Self::Inactive,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Urgent => "Urgent",
            Self::Warning => "Warning",
            Self::Valid => "Valid",
            Self::Inactive => "Inactive",
        }
    }

    pub const fn requires_attention(self) -> bool {
        matches!(self, Self::Expired | Self::Urgent | Self::Warning)
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability shared by every record that may expire.
pub trait DatedItem {
    fn item_id(&self) -> &str;
    fn expiry_date(&self) -> Option<NaiveDate>;
}

/// Identifier wrapper for compliance-tracked entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Equipment,
    Vehicle,
    Vendor,
    Operator,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equipment => "Equipment",
            Self::Vehicle => "Vehicle",
            Self::Vendor => "Vendor",
            Self::Operator => "Operator",
        }
    }

    /// Only physical assets are arranged into parent/child hierarchies.
    pub const fn supports_parent(self) -> bool {
        matches!(self, Self::Equipment | Self::Vehicle)
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "equipment" => Some(Self::Equipment),
            "vehicle" | "vehicles" => Some(Self::Vehicle),
            "vendor" | "vendors" => Some(Self::Vendor),
            "operator" | "operators" => Some(Self::Operator),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Registration,
    Insurance,
    Permit,
    Manual,
    Other,
}

/// Every kind of dated record an entity can own. Each variant carries only the
/// fields its kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceDocument {
    Document {
        id: String,
        name: String,
        category: DocumentCategory,
        #[serde(default)]
        expiry_date: Option<NaiveDate>,
    },
    Certification {
        id: String,
        name: String,
        issuer: String,
        #[serde(default)]
        expiry_date: Option<NaiveDate>,
    },
    Contract {
        id: String,
        title: String,
        counterparty: String,
        #[serde(default)]
        end_date: Option<NaiveDate>,
    },
    Inspection {
        id: String,
        inspector: String,
        #[serde(default)]
        performed_on: Option<NaiveDate>,
        #[serde(default)]
        next_due: Option<NaiveDate>,
    },
}

impl ComplianceDocument {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Document { .. } => "Document",
            Self::Certification { .. } => "Certification",
            Self::Contract { .. } => "Contract",
            Self::Inspection { .. } => "Inspection",
        }
    }

    /// Human readable title for listings.
    pub fn title(&self) -> &str {
        match self {
            Self::Document { name, .. } | Self::Certification { name, .. } => name,
            Self::Contract { title, .. } => title,
            Self::Inspection { inspector, .. } => inspector,
        }
    }
}

impl DatedItem for ComplianceDocument {
    fn item_id(&self) -> &str {
        match self {
            Self::Document { id, .. }
            | Self::Certification { id, .. }
            | Self::Contract { id, .. }
            | Self::Inspection { id, .. } => id,
        }
    }

    fn expiry_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Document { expiry_date, .. } | Self::Certification { expiry_date, .. } => {
                *expiry_date
            }
            Self::Contract { end_date, .. } => *end_date,
            Self::Inspection { next_due, .. } => *next_due,
        }
    }
}

/// Compliance-tracked object. `parent_id` is a back-reference resolved by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub documents: Vec<ComplianceDocument>,
}

impl Entity {
    pub fn new(id: impl Into<String>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            kind,
            name: name.into(),
            parent_id: None,
            documents: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(EntityId::new(parent_id));
        self
    }

    pub fn with_document(mut self, document: ComplianceDocument) -> Self {
        self.documents.push(document);
        self
    }
}
