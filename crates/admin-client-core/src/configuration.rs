use std::{
    convert::{TryFrom, TryInto},
    path::Path,
};

use admin_shared::const_config::client::CLIENT_DEFAULT_API_URL;

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base url that all endpoint paths are appended to
    pub api_url: String,
}

/// Loads the settings from the `configuration` folder in the current
/// directory, selecting the environment file using `APP_ENVIRONMENT`
pub fn get_configuration() -> Result<ClientSettings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    // Default to `local` if unspecified
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    get_configuration_from(&configuration_directory, environment)
}

/// Every file is optional, missing values fall back to the built in defaults
pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<ClientSettings, config::ConfigError> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .set_default("api_url", CLIENT_DEFAULT_API_URL)?
        .add_source(
            config::File::from(configuration_directory.join("base.toml")).required(false),
        )
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API_URL=https://example.com/api` would set `ClientSettings.api_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<ClientSettings>()
}

/// The possible runtime environment for the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
