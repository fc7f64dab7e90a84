//! dashscribe served on an ephemeral port for the duration of a test

use dashscribe_config::Config;
use dashscribe_server::Server;
use tokio_util::sync::CancellationToken;

/// Path of the transcription endpoint
pub const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

/// A running dashscribe instance, stopped on drop
pub struct TestServer {
    base_url: String,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Assemble the server from `config` and serve it on `127.0.0.1:0`
    ///
    /// The configured listen address is ignored.
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let router = Server::new(&config)?.into_router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let shutdown = CancellationToken::new();
        let stopped = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { stopped.cancelled().await })
                .await
                .ok();
        });

        Ok(Self {
            base_url,
            shutdown,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed to send")
    }

    /// POST a multipart form to the transcription endpoint
    pub async fn transcribe(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url(TRANSCRIPTIONS_PATH))
            .multipart(form)
            .send()
            .await
            .expect("transcription request failed to send")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
