//! Clients for the public web APIs behind the utility commands.
//!
//! Every client borrows the one `reqwest::Client` held in the bot data and
//! turns unusable answers into `Error::ExternalService`.

pub mod names;
pub mod transit;
pub mod trivia;
pub mod video;
pub mod weather;

use crate::errors::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client shared by all services.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!("boss/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Into::into)
}

/// GETs `url` with `query` and deserializes the JSON body.
async fn get_json<T, Q>(
    client: &reqwest::Client,
    service: &'static str,
    url: &str,
    query: &Q,
) -> Result<T>
where
    T: DeserializeOwned,
    Q: serde::Serialize + ?Sized,
{
    let response = client.get(url).query(query).send().await?;
    let status = response.status();
    debug!(service, %status, "External API answered");

    if !status.is_success() {
        return Err(Error::ExternalService {
            service,
            message: format!("HTTP {status}"),
        });
    }
    response.json::<T>().await.map_err(Into::into)
}
