//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use dashscribe_config::{AsrEndpoints, Config, DashScopeConfig, HealthConfig, ServerConfig};
use secrecy::SecretString;

use super::mock_dashscope::MockDashScope;

/// API key the mock expects in every request
pub const TEST_API_KEY: &str = "sk-dashscribe-test";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                },
                dashscope: DashScopeConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point storage and both ASR endpoints at a mock backend, with a test key
    pub fn with_mock(mut self, mock: &MockDashScope) -> Self {
        self.config.dashscope.api_key = Some(SecretString::from(TEST_API_KEY));
        self.config.dashscope.storage_url = mock.storage_url().parse().expect("valid URL");
        self.config.dashscope.endpoints = AsrEndpoints {
            domestic: mock.domestic_endpoint().parse().expect("valid URL"),
            international: mock.international_endpoint().parse().expect("valid URL"),
        };
        self
    }

    /// Remove the API key
    pub fn without_api_key(mut self) -> Self {
        self.config.dashscope.api_key = None;
        self
    }

    /// Set the raw region setting
    pub fn with_region(mut self, region: &str) -> Self {
        self.config.dashscope.region = Some(region.to_owned());
        self
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: &str) -> Self {
        self.config.dashscope.default_model = Some(model.to_owned());
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
