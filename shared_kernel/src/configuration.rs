use anyhow::Context;
use serde::de::DeserializeOwned;

/// Name of the yaml file (without extension) to load from `configuration/`.
/// Falls back to `base` when `APP_ENVIRONMENT` is not set.
fn environment_file() -> String {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "base".to_string());
    format!("{}.yaml", environment.trim().to_lowercase())
}

pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");
    let file = environment_file();
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join(&file)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build configuration from {file}"))?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
