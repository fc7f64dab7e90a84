use std::time::Duration;

use axum::http;
use reqwest::Client;

/// Client shared by the upload and ASR calls of one server
///
/// A timeout is only set when configured; otherwise the transport defaults apply.
pub(crate) fn http_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    let mut builder = Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}
