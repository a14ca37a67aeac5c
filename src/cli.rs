pub mod foxess;
pub mod myenergi;

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use tracing::Level;

use crate::entity::yesterday;

/// Flags shared by both utilities.
#[derive(Parser)]
pub struct CommonArgs {
    /// Verbose logging.
    #[clap(
        long,
        env = "DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    /// Ignore the stashed responses and fetch everything anew.
    #[clap(
        long,
        env = "REFRESH",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub refresh: bool,
}

impl CommonArgs {
    pub fn init_tracing(&self) {
        tracing_subscriber::fmt()
            .without_time()
            .compact()
            .with_writer(std::io::stderr)
            .with_max_level(if self.debug { Level::DEBUG } else { Level::INFO })
            .init();
    }

    pub const fn use_cache(&self) -> bool {
        !self.refresh
    }
}

/// Day argument, yesterday when omitted.
#[derive(Parser)]
pub struct DayArgs {
    /// Day in the `YYYY-MM-DD` format, yesterday by default.
    pub day: Option<NaiveDate>,
}

impl DayArgs {
    pub fn day(&self) -> NaiveDate {
        day_or_yesterday(self.day)
    }
}

pub fn day_or_yesterday(day: Option<NaiveDate>) -> NaiveDate {
    day.unwrap_or_else(|| yesterday(Local::now()))
}
