use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::{NotificationChannel, NotificationPreference, NotificationType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("unknown notification category '{0}'")]
    UnknownCategory(String),
    #[error("unknown notification type '{0}'")]
    UnknownType(String),
    #[error("unknown delivery channel '{0}'")]
    UnknownChannel(String),
}

/// Named group of notification types toggled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCategory {
    pub name: String,
    pub types: Vec<NotificationType>,
}

impl NotificationCategory {
    pub fn new(name: impl Into<String>, types: Vec<NotificationType>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }

    pub fn contains(&self, notification_type: NotificationType) -> bool {
        self.types.contains(&notification_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryState {
    AllEnabled,
    AllDisabled,
    Mixed,
    /// No preference in the list belongs to the category.
    Empty,
}

/// Static category table and critical-type flags used to route notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    categories: Vec<NotificationCategory>,
    critical: BTreeSet<NotificationType>,
    critical_channel: NotificationChannel,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new(
            vec![
                NotificationCategory::new(
                    "Equipment",
                    vec![
                        NotificationType::MaintenanceDue,
                        NotificationType::InspectionDue,
                        NotificationType::EquipmentStatusChange,
                    ],
                ),
                NotificationCategory::new(
                    "Compliance",
                    vec![
                        NotificationType::CertificationExpiry,
                        NotificationType::DocumentExpiry,
                        NotificationType::DocumentApprovalRequired,
                        NotificationType::VendorContractExpiry,
                    ],
                ),
                NotificationCategory::new(
                    "System",
                    vec![
                        NotificationType::SystemAlert,
                        NotificationType::UserActivity,
                        NotificationType::WeeklySummary,
                    ],
                ),
            ],
            [
                NotificationType::CertificationExpiry,
                NotificationType::DocumentApprovalRequired,
                NotificationType::SystemAlert,
            ],
        )
    }
}

impl RoutingPolicy {
    pub fn new(
        categories: Vec<NotificationCategory>,
        critical: impl IntoIterator<Item = NotificationType>,
    ) -> Self {
        Self {
            categories,
            critical: critical.into_iter().collect(),
            critical_channel: NotificationChannel::InApp,
        }
    }

    pub fn categories(&self) -> &[NotificationCategory] {
        &self.categories
    }

    pub fn is_critical(&self, notification_type: NotificationType) -> bool {
        self.critical.contains(&notification_type)
    }

    /// Category names match case-insensitively.
    pub fn category(&self, name: &str) -> Result<&NotificationCategory, RoutingError> {
        let wanted = name.trim();
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RoutingError::UnknownCategory(name.to_string()))
    }

    pub fn category_of(&self, notification_type: NotificationType) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.contains(notification_type))
            .map(|category| category.name.as_str())
    }

    /// Channels a notification is dispatched on.
    ///
    /// A disabled preference resolves to no channels, except for critical types
    /// which still reach the in-app channel.
    pub fn resolve_channels(&self, pref: &NotificationPreference) -> BTreeSet<NotificationChannel> {
        if !pref.enabled {
            let mut channels = BTreeSet::new();
            if self.is_critical(pref.notification_type) {
                channels.insert(self.critical_channel);
            }
            return channels;
        }

        NotificationChannel::ordered()
            .into_iter()
            .filter(|channel| pref.channel_enabled(*channel))
            .collect()
    }

    /// Returns a copy of `prefs` with `enabled` overwritten for members of the
    /// named category. Input order is preserved.
    pub fn set_category_enabled(
        &self,
        prefs: &[NotificationPreference],
        category: &str,
        enabled: bool,
    ) -> Result<Vec<NotificationPreference>, RoutingError> {
        let category = self.category(category)?;
        Ok(prefs
            .iter()
            .map(|pref| {
                let mut updated = pref.clone();
                if category.contains(pref.notification_type) {
                    updated.enabled = enabled;
                }
                updated
            })
            .collect())
    }

    pub fn category_state(
        &self,
        prefs: &[NotificationPreference],
        category: &str,
    ) -> Result<CategoryState, RoutingError> {
        let category = self.category(category)?;
        let members: Vec<bool> = prefs
            .iter()
            .filter(|pref| category.contains(pref.notification_type))
            .map(|pref| pref.enabled)
            .collect();

        Ok(if members.is_empty() {
            CategoryState::Empty
        } else if members.iter().all(|enabled| *enabled) {
            CategoryState::AllEnabled
        } else if members.iter().all(|enabled| !*enabled) {
            CategoryState::AllDisabled
        } else {
            CategoryState::Mixed
        })
    }

    /// Every known type enabled with in-app and email delivery.
    pub fn default_preferences(&self) -> Vec<NotificationPreference> {
        NotificationType::ordered()
            .into_iter()
            .map(|notification_type| {
                NotificationPreference::new(notification_type, true)
                    .with_channel(NotificationChannel::InApp, true)
                    .with_channel(NotificationChannel::Email, true)
            })
            .collect()
    }
}
