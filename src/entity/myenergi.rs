use chrono::NaiveDate;
use serde_json::json;

use crate::{
    api::{LogicalRequest, Params, Requester, myenergi::Operation},
    fetcher::{Fetched, Fetcher},
    prelude::*,
};

/// The hub and the eddi diverter behind it.
pub struct Eddi<'a, R> {
    fetcher: &'a Fetcher<R>,
    use_cache: bool,
}

impl<'a, R: Requester<Operation = Operation>> Eddi<'a, R> {
    pub const fn new(fetcher: &'a Fetcher<R>, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    /// Hourly totals of the day.
    pub fn day_hour(&self, day: NaiveDate) -> Result<Fetched> {
        let mut params = Params::new();
        params.insert("date".to_owned(), json!(day.format("%Y-%m-%d").to_string()));
        self.fetcher.fetch(&LogicalRequest::new(Operation::DayHour, params), self.use_cache)
    }

    pub fn status(&self) -> Result<Fetched> {
        self.fetcher.fetch(&LogicalRequest::without_params(Operation::Status), false)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        api::{myenergi, testing::ScriptedTransport},
        cache::Store,
        fetcher::Source,
    };

    fn fetcher<'t>(
        transport: &'t ScriptedTransport,
        directory: &TempDir,
    ) -> Result<Fetcher<myenergi::Api<&'t ScriptedTransport>>> {
        let config = myenergi::Config::builder()
            .serial_number("12345678")
            .api_key("hub-password")
            .domain("https://myenergi.test")
            .build();
        Ok(Fetcher::new(myenergi::Api::new(config, transport)?, Store::new(directory.path())))
    }

    #[test]
    fn test_day_hour_is_stashed_by_date() -> Result {
        let directory = TempDir::new().unwrap();
        let transport = ScriptedTransport::default().respond(200, r#"{"U12345678":[]}"#);
        let fetcher = fetcher(&transport, &directory)?;
        let eddi = Eddi::new(&fetcher, true);
        let day = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap();

        eddi.day_hour(day)?;
        let fetched = eddi.day_hour(day)?;

        assert_eq!(transport.n_requests(), 1);
        assert_eq!(fetched.source, Source::Cache);
        assert_eq!(fetched.path, directory.path().join("dayhour_2025-10-18.json"));
        assert_eq!(
            transport.requests()[0].uri(),
            "https://myenergi.test/cgi-jdayhour-Z12345678-2025-10-18",
        );
        Ok(())
    }

    #[test]
    fn test_status_is_always_fetched() -> Result {
        let directory = TempDir::new().unwrap();
        let transport =
            ScriptedTransport::default().respond(200, "[]").respond(200, r#"[{"eddi":[]}]"#);
        let fetcher = fetcher(&transport, &directory)?;
        let eddi = Eddi::new(&fetcher, true);

        eddi.status()?;
        let fetched = eddi.status()?;

        assert_eq!(transport.n_requests(), 2);
        assert_eq!(fetched.response, json!([{"eddi": []}]));
        Ok(())
    }
}
