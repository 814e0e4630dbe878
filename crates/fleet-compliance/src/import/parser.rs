use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One raw row of a fleet export, before entity merging.
#[derive(Debug, Deserialize)]
pub(crate) struct FleetRow {
    pub(crate) entity_id: String,
    pub(crate) entity_kind: String,
    #[serde(default)]
    pub(crate) entity_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) parent_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) item_kind: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) item_id: Option<String>,
    #[serde(default)]
    pub(crate) item_title: String,
    #[serde(default)]
    pub(crate) item_detail: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) performed_on: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) expiry_date: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<FleetRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader.deserialize::<FleetRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, truncated to its UTC day.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
