//! REST clients for the rate/revenue pool API and the worker proxy API.

pub mod kryptex;
pub mod proxy;

pub use kryptex::KryptexClient;
pub use proxy::ProxyClient;

use crate::error::{AppError, AppResult};
use reqwest::Response;

/// Turn a non-2xx response into an `ExternalService` error carrying status and body
pub(crate) async fn check_status(url: &str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalService(format!(
        "request {}: status {}: {}",
        url,
        status.as_u16(),
        body.trim()
    )))
}
