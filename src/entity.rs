//! Convenience wrappers that know the default parameters of each operation.

mod foxess;
mod myenergi;

use std::fmt::Display;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde_json::Value;

pub use self::{
    foxess::{Device, Module, Plant, User},
    myenergi::Eddi,
};
use crate::prelude::*;

/// Identifier of the first item in a `{"result": {"data": [...]}}` list response.
pub fn first_identifier(
    operation: impl Display,
    list: &Value,
    field: &'static str,
) -> Result<String> {
    let items = list.pointer("/result/data").and_then(Value::as_array).ok_or_else(|| {
        Error::MalformedResponse { operation: operation.to_string(), pointer: "result.data" }
    })?;
    let first = items.first().ok_or_else(|| Error::EmptyResult { operation: operation.to_string() })?;
    identifier(first.get(field))
        .ok_or_else(|| Error::MalformedResponse { operation: operation.to_string(), pointer: field })
}

/// Identifiers are strings, but let us not choke on numeric ones.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(string) if !string.is_empty() => Some(string.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn yesterday(now: DateTime<Local>) -> NaiveDate {
    let today = now.date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Local-time milliseconds of the day start and of its very last millisecond.
fn day_range_millis(day: NaiveDate) -> Result<(i64, i64)> {
    let begin = Local
        .from_local_datetime(&day.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .ok_or_else(|| Error::InvalidParams {
            operation: "device_history_query".to_owned(),
            reason: format!("no local midnight on {day}"),
        })?
        .timestamp_millis();
    Ok((begin, begin + 86_399_999))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_first_identifier_ok() -> Result {
        let list = json!({"result": {"data": [{"id": "X"}, {"id": "Y"}]}});
        assert_eq!(first_identifier("plant_list", &list, "id")?, "X");
        Ok(())
    }

    #[test]
    fn test_first_identifier_numeric_ok() -> Result {
        let list = json!({"result": {"data": [{"stationID": 42}]}});
        assert_eq!(first_identifier("plant_list", &list, "stationID")?, "42");
        Ok(())
    }

    #[test]
    fn test_first_identifier_empty_fails() {
        let list = json!({"result": {"data": []}});
        let result = first_identifier("plant_list", &list, "id");
        assert!(matches!(result, Err(Error::EmptyResult { .. })), "{result:?}");
    }

    #[test]
    fn test_first_identifier_malformed_fails() {
        let result = first_identifier("plant_list", &json!({"errno": 40256}), "id");
        assert!(matches!(result, Err(Error::MalformedResponse { pointer: "result.data", .. })));

        let result = first_identifier("plant_list", &json!({"result": {"data": [{}]}}), "id");
        assert!(matches!(result, Err(Error::MalformedResponse { pointer: "id", .. })));
    }

    #[test]
    fn test_yesterday_ok() {
        let now = Local.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(yesterday(now), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_day_range_ok() -> Result {
        let day = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let (begin, end) = day_range_millis(day)?;
        assert_eq!(end - begin, 86_399_999);
        let begin = Local.timestamp_millis_opt(begin).unwrap();
        assert_eq!(begin.date_naive(), day);
        assert_eq!(begin.time(), chrono::NaiveTime::MIN);
        Ok(())
    }
}
