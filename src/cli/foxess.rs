use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chrono::NaiveDate;

use super::{CommonArgs, day_or_yesterday};
use crate::{
    api::{
        LogicalRequest,
        Params,
        Requester,
        foxess::{Config, DEFAULT_API_PREFIX, DEFAULT_DOMAIN, Operation},
    },
    entity::{Device, Module, Plant, User},
    fetcher::{Fetched, Fetcher},
    prelude::*,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch FoxESS Cloud data and stash the raw responses on disk",
    after_help = "Example: foxess device_detail 123456789",
    propagate_version = true
)]
pub struct Args {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser)]
pub struct ApiArgs {
    #[clap(long = "api-key", env = "FOX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[clap(long = "api-domain", env = "FOX_API_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    #[clap(long = "api-prefix", env = "FOX_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// Directory of the stashed responses.
    #[clap(long = "data-dir", env = "FOX_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl ApiArgs {
    pub fn config(&self) -> Result<Config> {
        let api_key = self.api_key.clone().ok_or(Error::Config("FOX_API_KEY"))?;
        Ok(Config::builder()
            .api_key(api_key)
            .domain(self.domain.as_str())
            .api_prefix(self.api_prefix.as_str())
            .build())
    }
}

#[derive(Parser)]
pub struct SerialNumberArgs {
    /// Device serial number, the first device's by default.
    pub serial_number: Option<String>,
}

#[derive(Parser)]
pub struct DayOptionArgs {
    /// Day in the `YYYY-MM-DD` format, yesterday by default.
    #[clap(long)]
    pub day: Option<NaiveDate>,
}

#[derive(Parser)]
pub struct PageArgs {
    #[clap(default_value = "1")]
    pub current_page: u32,

    #[clap(default_value = "10")]
    pub page_size: u32,
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// List the devices.
    DeviceList,

    /// Get the device details.
    DeviceDetail(SerialNumberArgs),

    /// Get the available device variables.
    DeviceVariableGet,

    /// Get the device history of the day.
    DeviceHistoryQuery {
        #[clap(flatten)]
        device: SerialNumberArgs,

        #[clap(flatten)]
        day: DayOptionArgs,
    },

    /// Get the daily device report.
    DeviceReportQuery {
        #[clap(flatten)]
        device: SerialNumberArgs,

        #[clap(flatten)]
        day: DayOptionArgs,
    },

    /// Get the real-time device generation, always fetched anew.
    DeviceGeneration(SerialNumberArgs),

    /// List the modules.
    ModuleList(PageArgs),

    /// List the plants.
    PlantList(PageArgs),

    /// Get the plant details.
    PlantDetail {
        /// Plant ID, the first plant's by default.
        plant_id: Option<String>,
    },

    /// Get the remaining API call quota.
    UserGetAccessCount,

    /// Fetch any operation with explicitly specified parameters.
    Raw {
        /// Logical operation name, for example: `device_detail`.
        name: String,

        /// Parameters as a JSON object, for example: `{"sn":"123456789"}`.
        #[clap(value_parser = parse_params)]
        params: Option<Params>,
    },
}

impl Command {
    pub fn run<R>(self, fetcher: &Fetcher<R>, use_cache: bool) -> Result<Fetched>
    where
        R: Requester<Operation = Operation>,
    {
        let device = Device::new(fetcher, use_cache);
        let plant = Plant::new(fetcher, use_cache);
        let module = Module::new(fetcher, use_cache);
        match self {
            Self::DeviceList => device.list(),
            Self::DeviceDetail(args) => device.detail(args.serial_number.as_deref()),
            Self::DeviceVariableGet => device.variable_get(),
            Self::DeviceHistoryQuery { device: args, day } => {
                let day = day_or_yesterday(day.day);
                device.history_query(args.serial_number.as_deref(), day)
            }
            Self::DeviceReportQuery { device: args, day } => {
                let day = day_or_yesterday(day.day);
                device.report_query(args.serial_number.as_deref(), day)
            }
            Self::DeviceGeneration(args) => device.generation(args.serial_number.as_deref()),
            Self::ModuleList(args) => module.list(args.current_page, args.page_size),
            Self::PlantList(args) => plant.list(args.current_page, args.page_size),
            Self::PlantDetail { plant_id } => plant.detail(plant_id.as_deref()),
            Self::UserGetAccessCount => User::new(fetcher, use_cache).access_count(),
            Self::Raw { name, params } => {
                let request = LogicalRequest::new(name.parse::<Operation>()?, params.unwrap_or_default());
                fetcher.fetch(&request, use_cache)
            }
        }
    }
}

fn parse_params(value: &str) -> std::result::Result<Params, String> {
    serde_json::from_str(value).map_err(|error| format!("expected a JSON object: {error}"))
}
