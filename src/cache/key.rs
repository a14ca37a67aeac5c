use chrono::{Local, NaiveDate, TimeZone};
use serde_json::Value;

use crate::api::Params;

/// File stem of a cached response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(name: &str) -> Self {
        Self(sanitize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn with(mut self, component: &str) -> Self {
        self.0.push('_');
        self.0.push_str(&sanitize(component));
        self
    }
}

/// How an operation's parameters disambiguate its cache key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyRule {
    /// The operation name alone.
    Name,

    /// Append `sn` when present.
    SerialNumber,

    /// Append `sn` and the local date of the `begin` timestamp in milliseconds.
    SerialNumberAndBeginDay,

    /// Append `sn` and the date assembled from `year`, `month`, and `day`.
    SerialNumberAndReportDay,

    /// Append `id` when present.
    Id,

    /// Append `date` when present.
    Date,
}

impl KeyRule {
    pub fn derive(self, name: &str, params: &Params) -> CacheKey {
        let key = CacheKey::new(name);
        match self {
            Self::Name => key,
            Self::SerialNumber => append_if_present(key, params, "sn"),
            Self::Id => append_if_present(key, params, "id"),
            Self::Date => append_if_present(key, params, "date"),
            Self::SerialNumberAndBeginDay => {
                let day = params
                    .get("begin")
                    .and_then(Value::as_i64)
                    .and_then(|millis| Local.timestamp_millis_opt(millis).single())
                    .map(|begin| begin.date_naive());
                key.with(&serial_number(params)).with(&format_day(day))
            }
            Self::SerialNumberAndReportDay => {
                let component = |name: &str| {
                    params.get(name).and_then(|value| match value {
                        Value::Number(number) => number.as_u64(),
                        Value::String(string) => string.parse().ok(),
                        _ => None,
                    })
                };
                let day = component("year").zip(component("month")).zip(component("day")).and_then(
                    |((year, month), day)| {
                        NaiveDate::from_ymd_opt(
                            i32::try_from(year).ok()?,
                            u32::try_from(month).ok()?,
                            u32::try_from(day).ok()?,
                        )
                    },
                );
                key.with(&serial_number(params)).with(&format_day(day))
            }
        }
    }
}

fn append_if_present(key: CacheKey, params: &Params, name: &str) -> CacheKey {
    match params.get(name).and_then(value_to_component) {
        Some(component) => key.with(&component),
        None => key,
    }
}

fn serial_number(params: &Params) -> String {
    params.get("sn").and_then(value_to_component).unwrap_or_else(|| "unknown".to_owned())
}

fn format_day(day: Option<NaiveDate>) -> String {
    day.map_or_else(|| "unknown".to_owned(), |day| day.format("%Y-%m-%d").to_string())
}

fn value_to_component(value: &Value) -> Option<String> {
    match value {
        Value::String(string) if !string.is_empty() => Some(string.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Keep file names portable: anything outside `[A-Za-z0-9._-]` becomes `_`.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}
