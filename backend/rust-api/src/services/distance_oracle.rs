//! Travel-distance lookups against the external routing service.

use anyhow::Context;
use async_trait::async_trait;

use crate::config::Config;
use crate::error::Error;
use crate::models::LatLong;

/// Injectable capability so chain/scoring logic is testable without network
/// access; tests supply a fake.
#[async_trait]
pub trait DistanceOracle: Send + Sync {
    /// Travel distance in meters between two coordinates.
    async fn travel_distance(&self, origin: LatLong, destination: LatLong) -> Result<f64, Error>;
}

/// Goong DistanceMatrix client. Every request carries an explicit timeout; a
/// timeout or any response-shape deviation surfaces as `OracleUnavailable`,
/// never as a zero distance.
pub struct GoongDistanceOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoongDistanceOracle {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.oracle_timeout_secs))
            .build()
            .context("failed to build distance oracle HTTP client")?;

        Ok(Self {
            client,
            base_url: config.oracle_base_url.clone(),
            api_key: config.oracle_api_key.clone(),
        })
    }
}

#[async_trait]
impl DistanceOracle for GoongDistanceOracle {
    async fn travel_distance(&self, origin: LatLong, destination: LatLong) -> Result<f64, Error> {
        let url = format!("{}/DistanceMatrix", self.base_url);
        let origins = format!("{},{}", origin.latitude, origin.longitude);
        let destinations = format!("{},{}", destination.latitude, destination.longitude);

        tracing::debug!(
            "Calling distance oracle: origins={}, destinations={}",
            origins,
            destinations
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("vehicle", "car"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::OracleUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::OracleUnavailable(format!(
                "distance oracle returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::OracleUnavailable(format!("invalid response body: {e}")))?;

        // The distance lives at a fixed path; anything else is a hard failure.
        body.pointer("/rows/0/elements/0/distance/value")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| {
                Error::OracleUnavailable("unexpected distance matrix response shape".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_read_from_the_fixed_response_path() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{ "rows": [ { "elements": [ { "distance": { "text": "1.2 km", "value": 1234.0 } } ] } ] }"#,
        )
        .unwrap();
        let value = body
            .pointer("/rows/0/elements/0/distance/value")
            .and_then(serde_json::Value::as_f64);
        assert_eq!(value, Some(1234.0));
    }

    #[test]
    fn shape_deviation_yields_none() {
        let body: serde_json::Value =
            serde_json::from_str(r#"{ "rows": [ { "elements": [] } ] }"#).unwrap();
        assert!(body
            .pointer("/rows/0/elements/0/distance/value")
            .and_then(serde_json::Value::as_f64)
            .is_none());
    }
}
