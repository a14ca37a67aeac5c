use std::str::FromStr;

use enumset::EnumSet;
use http::Method;
use itertools::Itertools;

use crate::{
    api::{self, Params},
    cache::{CacheKey, KeyRule},
    prelude::*,
};

/// FoxESS Cloud Open API operation, displayed as its logical name.
#[derive(Debug, derive_more::Display, enumset::EnumSetType)]
pub enum Operation {
    #[display("device_list")]
    DeviceList,

    #[display("device_detail")]
    DeviceDetail,

    #[display("device_variable_get")]
    DeviceVariableGet,

    #[display("device_history_query")]
    DeviceHistoryQuery,

    #[display("device_report_query")]
    DeviceReportQuery,

    /// Real-time generation reading.
    #[display("device_generation")]
    DeviceGeneration,

    #[display("module_list")]
    ModuleList,

    #[display("plant_list")]
    PlantList,

    #[display("plant_detail")]
    PlantDetail,

    #[display("user_get_access_count")]
    UserGetAccessCount,
}

pub struct Descriptor {
    /// Path relative to the API prefix.
    pub endpoint: &'static str,

    pub method: Method,

    pub key_rule: KeyRule,

    pub is_live: bool,
}

impl Descriptor {
    fn new(endpoint: &'static str, method: Method, key_rule: KeyRule) -> Self {
        Self { endpoint, method, key_rule, is_live: false }
    }

    fn live(mut self) -> Self {
        self.is_live = true;
        self
    }
}

impl Operation {
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }

    #[must_use]
    pub fn descriptor(self) -> Descriptor {
        match self {
            Self::DeviceList => Descriptor::new("device/list", Method::POST, KeyRule::Name),
            Self::DeviceDetail => {
                Descriptor::new("device/detail", Method::GET, KeyRule::SerialNumber)
            }
            Self::DeviceVariableGet => {
                Descriptor::new("device/variable/get", Method::GET, KeyRule::Name)
            }
            Self::DeviceHistoryQuery => Descriptor::new(
                "device/history/query",
                Method::POST,
                KeyRule::SerialNumberAndBeginDay,
            ),
            Self::DeviceReportQuery => Descriptor::new(
                "device/report/query",
                Method::POST,
                KeyRule::SerialNumberAndReportDay,
            ),
            Self::DeviceGeneration => {
                Descriptor::new("device/generation", Method::GET, KeyRule::SerialNumber).live()
            }
            Self::ModuleList => Descriptor::new("module/list", Method::POST, KeyRule::Name),
            Self::PlantList => Descriptor::new("plant/list", Method::POST, KeyRule::Name),
            Self::PlantDetail => Descriptor::new("plant/detail", Method::GET, KeyRule::Id),
            Self::UserGetAccessCount => {
                Descriptor::new("user/getAccessCount", Method::GET, KeyRule::Name)
            }
        }
    }
}

impl api::Operation for Operation {
    fn key_rule(self) -> KeyRule {
        self.descriptor().key_rule
    }

    fn is_live(self) -> bool {
        self.descriptor().is_live
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::all().iter().find(|operation| operation.to_string() == name).ok_or_else(|| {
            Error::InvalidName {
                name: name.to_owned(),
                valid: Self::all().iter().join(", "),
            }
        })
    }
}

/// Cache key of a logical name, falling back to the name itself for unknown operations.
pub fn key_for(name: &str, params: &Params) -> CacheKey {
    name.parse::<Operation>().map_or_else(
        |_| CacheKey::new(name),
        |operation| api::Operation::cache_key(operation, params),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::api::Operation as _;

    #[test]
    fn test_parse_round_trip_ok() -> Result {
        for operation in Operation::all() {
            assert_eq!(operation.to_string().parse::<Operation>()?, operation);
        }
        Ok(())
    }

    #[test]
    fn test_parse_unknown_fails() {
        let error = "device_lst".parse::<Operation>().unwrap_err();
        let Error::InvalidName { name, valid } = error else {
            panic!("unexpected error: {error:?}");
        };
        assert_eq!(name, "device_lst");
        assert!(valid.starts_with("device_list, device_detail, "), "{valid}");
    }

    #[test]
    fn test_only_generation_is_live() {
        let live = Operation::all().iter().filter(|operation| operation.is_live()).collect_vec();
        assert_eq!(live, [Operation::DeviceGeneration]);
    }

    #[test]
    fn test_descriptor_ok() {
        let descriptor = Operation::UserGetAccessCount.descriptor();
        assert_eq!(descriptor.endpoint, "user/getAccessCount");
        assert_eq!(descriptor.method, Method::GET);
        assert_eq!(Operation::DeviceHistoryQuery.descriptor().method, Method::POST);
    }

    #[test]
    fn test_cache_key_ok() {
        let Value::Object(params) = json!({"sn": "ABC123", "currentPage": 1}) else {
            unreachable!()
        };
        assert_eq!(Operation::DeviceDetail.cache_key(&params).as_str(), "device_detail_ABC123");
        assert_eq!(Operation::DeviceList.cache_key(&params).as_str(), "device_list");
    }

    #[test]
    fn test_key_for_ok() {
        let Value::Object(params) = json!({"sn": "ABC123"}) else { unreachable!() };
        assert_eq!(key_for("device_detail", &params).as_str(), "device_detail_ABC123");
        assert_eq!(key_for("something_else", &params).as_str(), "something_else");
    }

    #[test]
    fn test_history_cache_key_is_stable() {
        let key = |sn: &str, begin: i64| {
            let Value::Object(params) =
                json!({"sn": sn, "variables": [], "begin": begin, "end": begin + 86_399_999})
            else {
                unreachable!()
            };
            Operation::DeviceHistoryQuery.cache_key(&params)
        };
        assert_eq!(key("ABC123", 1_700_000_000_000), key("ABC123", 1_700_000_000_000));
        assert_ne!(key("ABC123", 1_700_000_000_000), key("ABC124", 1_700_000_000_000));
        assert_ne!(key("ABC123", 1_700_000_000_000), key("ABC123", 1_700_100_000_000));
    }
}
