use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{DatedItem, SeverityTier};

pub const DEFAULT_URGENT_WITHIN_DAYS: u32 = 7;
pub const DEFAULT_WARNING_WITHIN_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdError {
    #[error("urgent window ({urgent} days) must not exceed warning window ({warning} days)")]
    Inverted { urgent: u32, warning: u32 },
}

/// Inclusive upper bounds, in days remaining, for the urgent and warning bands.
///
/// Only [`TierThresholds::new`] and [`Default`] construct values, so the
/// urgent window never exceeds the warning window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierThresholds {
    urgent_within_days: u32,
    warning_within_days: u32,
}

impl TierThresholds {
    pub fn new(urgent_within_days: u32, warning_within_days: u32) -> Result<Self, ThresholdError> {
        if urgent_within_days > warning_within_days {
            return Err(ThresholdError::Inverted {
                urgent: urgent_within_days,
                warning: warning_within_days,
            });
        }

        Ok(Self {
            urgent_within_days,
            warning_within_days,
        })
    }

    pub fn urgent_within_days(&self) -> u32 {
        self.urgent_within_days
    }

    pub fn warning_within_days(&self) -> u32 {
        self.warning_within_days
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            urgent_within_days: DEFAULT_URGENT_WITHIN_DAYS,
            warning_within_days: DEFAULT_WARNING_WITHIN_DAYS,
        }
    }
}

/// Maps an optional expiry date onto a [`SeverityTier`] relative to an
/// explicit as-of date.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier {
    thresholds: TierThresholds,
}

impl StatusClassifier {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// Signed whole days between the as-of date and the expiry date.
    pub fn days_remaining(expiry_date: NaiveDate, as_of: NaiveDate) -> i64 {
        (expiry_date - as_of).num_days()
    }

    pub fn classify(&self, expiry_date: Option<NaiveDate>, as_of: NaiveDate) -> SeverityTier {
        let Some(expiry_date) = expiry_date else {
            return SeverityTier::Inactive;
        };

        let remaining = Self::days_remaining(expiry_date, as_of);
        if remaining < 0 {
            SeverityTier::Expired
        } else if remaining <= i64::from(self.thresholds.urgent_within_days) {
            SeverityTier::Urgent
        } else if remaining <= i64::from(self.thresholds.warning_within_days) {
            SeverityTier::Warning
        } else {
            SeverityTier::Valid
        }
    }

    /// Timestamps are truncated to their calendar day before classification.
    pub fn classify_datetime(
        &self,
        expiry: Option<NaiveDateTime>,
        as_of: NaiveDateTime,
    ) -> SeverityTier {
        self.classify(expiry.map(|value| value.date()), as_of.date())
    }

    pub fn classify_item<T: DatedItem + ?Sized>(&self, item: &T, as_of: NaiveDate) -> SeverityTier {
        self.classify(item.expiry_date(), as_of)
    }

    pub fn classify_all<'a, T, I>(&self, items: I, as_of: NaiveDate) -> Vec<SeverityTier>
    where
        T: DatedItem + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items
            .into_iter()
            .map(|item| self.classify_item(item, as_of))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    fn offset(days: i64) -> Option<NaiveDate> {
        Some(as_of() + Duration::days(days))
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        let classifier = StatusClassifier::default();
        let cases = [
            (-1, SeverityTier::Expired),
            (0, SeverityTier::Urgent),
            (7, SeverityTier::Urgent),
            (8, SeverityTier::Warning),
            (30, SeverityTier::Warning),
            (31, SeverityTier::Valid),
        ];

        for (days, expected) in cases {
            assert_eq!(
                classifier.classify(offset(days), as_of()),
                expected,
                "{days} day(s) remaining"
            );
        }
    }

    #[test]
    fn missing_expiry_is_inactive_for_any_reference_date() {
        let classifier = StatusClassifier::default();
        for year in [1999, 2025, 2100] {
            let reference = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
            assert_eq!(classifier.classify(None, reference), SeverityTier::Inactive);
        }
    }

    #[test]
    fn long_expired_items_stay_expired() {
        let classifier = StatusClassifier::default();
        assert_eq!(
            classifier.classify(offset(-900), as_of()),
            SeverityTier::Expired
        );
    }

    #[test]
    fn datetimes_truncate_to_calendar_days() {
        let classifier = StatusClassifier::default();
        let late_evening = as_of().and_hms_opt(23, 59, 0).expect("valid time");
        let early_expiry = (as_of() + Duration::days(7))
            .and_hms_opt(0, 1, 0)
            .expect("valid time");

        assert_eq!(
            classifier.classify_datetime(Some(early_expiry), late_evening),
            SeverityTier::Urgent
        );
    }

    #[test]
    fn custom_thresholds_shift_the_bands() {
        let thresholds = TierThresholds::new(14, 60).expect("ordered thresholds");
        let classifier = StatusClassifier::new(thresholds);

        assert_eq!(classifier.classify(offset(14), as_of()), SeverityTier::Urgent);
        assert_eq!(classifier.classify(offset(45), as_of()), SeverityTier::Warning);
        assert_eq!(classifier.classify(offset(61), as_of()), SeverityTier::Valid);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let error = TierThresholds::new(30, 7).expect_err("inverted thresholds");
        assert_eq!(
            error,
            ThresholdError::Inverted {
                urgent: 30,
                warning: 7
            }
        );
    }

    #[test]
    fn equal_windows_collapse_the_warning_band() {
        let thresholds = TierThresholds::new(10, 10).expect("equal windows are valid");
        assert_eq!(
            serde_json::to_value(thresholds).expect("serializes"),
            serde_json::json!({ "urgent_within_days": 10, "warning_within_days": 10 })
        );

        let classifier = StatusClassifier::new(thresholds);
        assert_eq!(classifier.classify(offset(10), as_of()), SeverityTier::Urgent);
        assert_eq!(classifier.classify(offset(11), as_of()), SeverityTier::Valid);
    }
}
