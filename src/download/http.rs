// Shared HTTP client utilities

use reqwest::{Client, Response, StatusCode};

use crate::error::{ProvisionError, Result};

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("spigot-provision/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    /// Shared HTTP client with proper User-Agent
    static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client");
}

/// Issue a GET and fail on transport errors or non-success status codes
pub async fn get_success(url: &str) -> Result<Response> {
    let response = CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| ProvisionError::download(url, e))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(ProvisionError::download(url, "resource not found (404)"));
    }

    if !response.status().is_success() {
        return Err(ProvisionError::download(
            url,
            format!("HTTP {}", response.status()),
        ));
    }

    Ok(response)
}
