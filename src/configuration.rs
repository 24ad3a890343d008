use crate::connectors::config::LagoConfig;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lago: LagoConfig,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lago: LagoConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // `configuration.yaml` (or .json/.toml) is optional; defaults cover everything
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    // LAGO_* environment variables win over the file
    config.lago.apply_env()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_partial_source() {
        let settings = config::Config::builder()
            .set_override("lago.base_url", "http://localhost:3000/api/v1")
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = settings.try_deserialize().unwrap();

        assert_eq!(settings.lago.base_url, "http://localhost:3000/api/v1");
        assert_eq!(settings.lago.timeout_secs, 30);
        assert_eq!(settings.log_level, "info");
    }
}
