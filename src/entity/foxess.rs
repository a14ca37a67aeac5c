use chrono::{Datelike, NaiveDate};
use serde_json::{Value, json};

use super::{day_range_millis, first_identifier};
use crate::{
    api::{LogicalRequest, Params, Requester, foxess::Operation},
    fetcher::{Fetched, Fetcher},
    prelude::*,
};

const REPORT_VARIABLES: [&str; 5] =
    ["generation", "feedin", "gridConsumption", "chargeEnergyToTal", "dischargeEnergyToTal"];

fn request(operation: Operation, params: Value) -> LogicalRequest<Operation> {
    match params {
        Value::Object(params) => LogicalRequest::new(operation, params),
        _ => LogicalRequest::new(operation, Params::new()),
    }
}

fn page(current_page: u32, page_size: u32) -> Value {
    json!({"currentPage": current_page, "pageSize": page_size})
}

pub struct Device<'a, R> {
    fetcher: &'a Fetcher<R>,
    use_cache: bool,
}

impl<'a, R: Requester<Operation = Operation>> Device<'a, R> {
    pub const fn new(fetcher: &'a Fetcher<R>, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    pub fn list(&self) -> Result<Fetched> {
        self.fetcher.fetch(&request(Operation::DeviceList, page(1, 500)), self.use_cache)
    }

    /// Device details, of the first listed device when the serial number is omitted.
    pub fn detail(&self, serial_number: Option<&str>) -> Result<Fetched> {
        let serial_number = match serial_number {
            Some(serial_number) => serial_number.to_owned(),
            None => {
                let list = self.list()?;
                first_identifier(Operation::DeviceList, &list.response, "deviceSN")?
            }
        };
        info!(serial_number = %serial_number, "fetching the device details…");
        self.fetcher.fetch(
            &request(Operation::DeviceDetail, json!({"sn": serial_number})),
            self.use_cache,
        )
    }

    pub fn variable_get(&self) -> Result<Fetched> {
        self.fetcher
            .fetch(&LogicalRequest::without_params(Operation::DeviceVariableGet), self.use_cache)
    }

    /// Raw history of the whole day.
    pub fn history_query(&self, serial_number: Option<&str>, day: NaiveDate) -> Result<Fetched> {
        let serial_number = self.resolve_serial_number(serial_number)?;
        let (begin, end) = day_range_millis(day)?;
        let params = json!({"sn": serial_number, "variables": [], "begin": begin, "end": end});
        self.fetcher.fetch(&request(Operation::DeviceHistoryQuery, params), self.use_cache)
    }

    /// Daily energy report.
    pub fn report_query(&self, serial_number: Option<&str>, day: NaiveDate) -> Result<Fetched> {
        let serial_number = self.resolve_serial_number(serial_number)?;
        let params = json!({
            "sn": serial_number,
            "year": day.year(),
            "month": day.month(),
            "day": day.day(),
            "dimension": "day",
            "variables": REPORT_VARIABLES,
        });
        self.fetcher.fetch(&request(Operation::DeviceReportQuery, params), self.use_cache)
    }

    /// Real-time generation, never served from the cache.
    pub fn generation(&self, serial_number: Option<&str>) -> Result<Fetched> {
        let serial_number = self.resolve_serial_number(serial_number)?;
        let request = request(Operation::DeviceGeneration, json!({"sn": serial_number}));
        self.fetcher.fetch(&request, false)
    }

    /// Take the serial number from the details of the first device, unless specified.
    fn resolve_serial_number(&self, serial_number: Option<&str>) -> Result<String> {
        if let Some(serial_number) = serial_number {
            return Ok(serial_number.to_owned());
        }
        let detail = self.detail(None)?;
        detail
            .response
            .pointer("/result/deviceSN")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or(Error::MalformedResponse {
                operation: detail.operation,
                pointer: "result.deviceSN",
            })
    }
}

pub struct Module<'a, R> {
    fetcher: &'a Fetcher<R>,
    use_cache: bool,
}

impl<'a, R: Requester<Operation = Operation>> Module<'a, R> {
    pub const fn new(fetcher: &'a Fetcher<R>, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    pub fn list(&self, current_page: u32, page_size: u32) -> Result<Fetched> {
        self.fetcher
            .fetch(&request(Operation::ModuleList, page(current_page, page_size)), self.use_cache)
    }
}

pub struct Plant<'a, R> {
    fetcher: &'a Fetcher<R>,
    use_cache: bool,
}

impl<'a, R: Requester<Operation = Operation>> Plant<'a, R> {
    pub const fn new(fetcher: &'a Fetcher<R>, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    pub fn list(&self, current_page: u32, page_size: u32) -> Result<Fetched> {
        self.fetcher
            .fetch(&request(Operation::PlantList, page(current_page, page_size)), self.use_cache)
    }

    /// Plant details, of the first listed plant when the ID is omitted.
    pub fn detail(&self, plant_id: Option<&str>) -> Result<Fetched> {
        let plant_id = match plant_id {
            Some(plant_id) => plant_id.to_owned(),
            None => {
                info!("fetching the details of the first plant in the list…");
                let list = self.list(1, 10)?;
                first_identifier(Operation::PlantList, &list.response, "stationID")?
            }
        };
        self.fetcher
            .fetch(&request(Operation::PlantDetail, json!({"id": plant_id})), self.use_cache)
    }
}

pub struct User<'a, R> {
    fetcher: &'a Fetcher<R>,
    use_cache: bool,
}

impl<'a, R: Requester<Operation = Operation>> User<'a, R> {
    pub const fn new(fetcher: &'a Fetcher<R>, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    pub fn access_count(&self) -> Result<Fetched> {
        self.fetcher
            .fetch(&LogicalRequest::without_params(Operation::UserGetAccessCount), self.use_cache)
    }
}
