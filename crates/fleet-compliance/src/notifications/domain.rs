use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::routing::RoutingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    MaintenanceDue,
    InspectionDue,
    EquipmentStatusChange,
    CertificationExpiry,
    DocumentExpiry,
    DocumentApprovalRequired,
    VendorContractExpiry,
    SystemAlert,
    UserActivity,
    WeeklySummary,
}

impl NotificationType {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::MaintenanceDue,
            Self::InspectionDue,
            Self::EquipmentStatusChange,
            Self::CertificationExpiry,
            Self::DocumentExpiry,
            Self::DocumentApprovalRequired,
            Self::VendorContractExpiry,
            Self::SystemAlert,
            Self::UserActivity,
            Self::WeeklySummary,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::MaintenanceDue => "maintenance_due",
            Self::InspectionDue => "inspection_due",
            Self::EquipmentStatusChange => "equipment_status_change",
            Self::CertificationExpiry => "certification_expiry",
            Self::DocumentExpiry => "document_expiry",
            Self::DocumentApprovalRequired => "document_approval_required",
            Self::VendorContractExpiry => "vendor_contract_expiry",
            Self::SystemAlert => "system_alert",
            Self::UserActivity => "user_activity",
            Self::WeeklySummary => "weekly_summary",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MaintenanceDue => "Maintenance due",
            Self::InspectionDue => "Inspection due",
            Self::EquipmentStatusChange => "Equipment status change",
            Self::CertificationExpiry => "Certification expiry",
            Self::DocumentExpiry => "Document expiry",
            Self::DocumentApprovalRequired => "Document approval required",
            Self::VendorContractExpiry => "Vendor contract expiry",
            Self::SystemAlert => "System alert",
            Self::UserActivity => "User activity",
            Self::WeeklySummary => "Weekly summary",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NotificationType {
    type Err = RoutingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.key() == normalized)
            .ok_or_else(|| RoutingError::UnknownType(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
    Whatsapp,
}

impl NotificationChannel {
    pub const fn ordered() -> [Self; 4] {
        [Self::InApp, Self::Email, Self::Sms, Self::Whatsapp]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Whatsapp => "whatsapp",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InApp => "In-app",
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::Whatsapp => "WhatsApp",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NotificationChannel {
    type Err = RoutingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_app" | "in-app" | "inapp" | "app" => Ok(Self::InApp),
            "email" | "e-mail" => Ok(Self::Email),
            "sms" | "text" => Ok(Self::Sms),
            "whatsapp" => Ok(Self::Whatsapp),
            _ => Err(RoutingError::UnknownChannel(value.to_string())),
        }
    }
}

/// One row of the notification settings matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub enabled: bool,
    #[serde(default)]
    pub channels: BTreeMap<NotificationChannel, bool>,
}

impl NotificationPreference {
    pub fn new(notification_type: NotificationType, enabled: bool) -> Self {
        Self {
            notification_type,
            enabled,
            channels: NotificationChannel::ordered()
                .into_iter()
                .map(|channel| (channel, false))
                .collect(),
        }
    }

    pub fn with_channel(mut self, channel: NotificationChannel, on: bool) -> Self {
        self.channels.insert(channel, on);
        self
    }

    pub fn channel_enabled(&self, channel: NotificationChannel) -> bool {
        self.channels.get(&channel).copied().unwrap_or(false)
    }
}
