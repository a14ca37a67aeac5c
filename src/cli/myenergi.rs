use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::{CommonArgs, DayArgs};
use crate::{
    api::{
        Requester,
        myenergi::{Config, DEFAULT_DOMAIN, Operation},
    },
    entity::Eddi,
    fetcher::{Fetched, Fetcher},
    prelude::*,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch myenergi data and stash the raw responses on disk",
    after_help = "Example: myenergi dayhour 2025-10-18",
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
    /// Hub serial number, also used as the digest username.
    #[clap(long = "serial-number", env = "MYENERGI_SERIAL_NUMBER")]
    pub serial_number: Option<String>,

    #[clap(long = "api-key", env = "MYENERGI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[clap(long = "api-domain", env = "MYENERGI_API_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Directory of the stashed responses.
    #[clap(long = "data-dir", env = "MYENERGI_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl ApiArgs {
    pub fn config(&self) -> Result<Config> {
        let api_key = self.api_key.clone().ok_or(Error::Config("MYENERGI_API_KEY"))?;
        let serial_number =
            self.serial_number.clone().ok_or(Error::Config("MYENERGI_SERIAL_NUMBER"))?;
        Ok(Config::builder()
            .serial_number(serial_number)
            .api_key(api_key)
            .domain(self.domain.as_str())
            .build())
    }
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// Get the hourly totals of the day.
    #[command(name = "dayhour")]
    DayHour(DayArgs),

    /// Get the real-time status, always fetched anew.
    Status,
}

impl Command {
    pub fn run<R>(self, fetcher: &Fetcher<R>, use_cache: bool) -> Result<Fetched>
    where
        R: Requester<Operation = Operation>,
    {
        let eddi = Eddi::new(fetcher, use_cache);
        match self {
            Self::DayHour(args) => eddi.day_hour(args.day()),
            Self::Status => eddi.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::CommandFactory;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        api::{myenergi, testing::ScriptedTransport},
        cache::Store,
        fetcher::Source,
    };

    #[test]
    fn test_args_ok() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_has_no_command() {
        let args = Args::try_parse_from(["myenergi"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_day_hour_date_ok() {
        let args = Args::try_parse_from(["myenergi", "dayhour", "2025-10-18"]).unwrap();
        let Some(Command::DayHour(args)) = args.command else { panic!("wrong command") };
        assert_eq!(args.day(), NaiveDate::from_ymd_opt(2025, 10, 18).unwrap());
    }

    #[test]
    fn test_invalid_date_fails() {
        assert!(Args::try_parse_from(["myenergi", "dayhour", "18-10-2025"]).is_err());
    }

    #[test]
    fn test_missing_serial_number_fails() {
        let args = Args::try_parse_from([
            "myenergi",
            "--api-key",
            "hub-password",
            "--serial-number",
            "",
            "status",
        ])
        .unwrap();
        let config = args.api.config().unwrap();
        assert!(matches!(
            myenergi::Api::new(config, ScriptedTransport::default()),
            Err(Error::Config("MYENERGI_SERIAL_NUMBER"))
        ));
    }

    #[test]
    fn test_status_run_ok() -> Result {
        let directory = TempDir::new().unwrap();
        let transport = ScriptedTransport::default().respond(200, r#"[{"eddi":[]}]"#);
        let config = Config::builder()
            .serial_number("12345678")
            .api_key("hub-password")
            .domain("https://myenergi.test")
            .build();
        let fetcher =
            Fetcher::new(myenergi::Api::new(config, &transport)?, Store::new(directory.path()));

        let fetched = Command::Status.run(&fetcher, true)?;

        assert_eq!(fetched.source, Source::Network);
        assert_eq!(fetched.path, directory.path().join("status.json"));
        Ok(())
    }
}
