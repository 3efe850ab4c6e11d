use async_trait::async_trait;
use serde_json::Value;

use crate::api_client::RequestClient;
use crate::client::ProviderAdapter;
use crate::config::Config;
use crate::error::Error;
use crate::format;
use crate::types::{Endpoint, Query};

/// RapidAPI "F1 Motorsport Data" provider.
pub struct F1Api {
    http: RequestClient,
}

impl F1Api {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut http = RequestClient::new();
        http.configure(
            &config.base_url,
            &[
                ("x-rapidapi-host", config.host.as_str()),
                ("x-rapidapi-key", config.api_key.as_str()),
            ],
            config.timeout,
        )?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ProviderAdapter for F1Api {
    fn http(&self) -> &RequestClient {
        &self.http
    }

    fn build_endpoint(&self, query: &Query) -> Endpoint {
        match query {
            Query::RaceReport { event_id } => {
                Endpoint::get("/race-report", [("eventId", event_id.as_str())])
            }
            Query::AthleteInfo { athlete_id } => {
                Endpoint::get("/athlete-info", [("athleteId", athlete_id.as_str())])
            }
            Query::RaceResults { driver_id, year } => Endpoint::get(
                "/race-results",
                [("driverId", driver_id.as_str()), ("year", year.as_str())],
            ),
            Query::Stats { driver_id } => {
                Endpoint::get("/stats", [("driverId", driver_id.as_str())])
            }
        }
    }

    fn format(&self, query: &Query, data: &Value, subject: &str) -> String {
        match query {
            Query::RaceReport { .. } => format::race_report(data),
            Query::AthleteInfo { .. } => format::athlete_info(data),
            Query::RaceResults { year, .. } => format::race_results(data, subject, year),
            Query::Stats { .. } => format::career_stats(data, subject),
        }
    }
}
