//! Notification preference matrix and channel routing.

pub mod domain;
pub mod routing;

pub use domain::{NotificationChannel, NotificationPreference, NotificationType};
pub use routing::{CategoryState, NotificationCategory, RoutingError, RoutingPolicy};
