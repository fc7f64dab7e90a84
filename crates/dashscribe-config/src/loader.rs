use std::path::Path;

use crate::Config;

/// Longest upload validity window accepted, one year
const MAX_UPLOAD_VALIDITY_HOURS: u32 = 24 * 365;

impl Config {
    /// Load configuration
    ///
    /// Parses the TOML file when a path is given, otherwise starts from
    /// defaults. The `DASHSCOPE_API_KEY`, `DEFAULT_MODEL_NAME` and
    /// `API_REGION` environment bindings are applied on top, then the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        crate::env::apply_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))
    }

    /// Validate that the configuration is internally consistent
    ///
    /// A missing API key is not an error here; it is reported per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload validity window is out of range or the
    /// request timeout cannot be parsed
    pub fn validate(&self) -> anyhow::Result<()> {
        let hours = self.dashscope.upload_validity_hours;
        if hours == 0 || hours > MAX_UPLOAD_VALIDITY_HOURS {
            anyhow::bail!(
                "dashscope.upload_validity_hours must be between 1 and {MAX_UPLOAD_VALIDITY_HOURS}, got {hours}"
            );
        }

        self.dashscope.request_timeout()?;

        Ok(())
    }
}
