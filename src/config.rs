use serde::Deserialize;
use std::fs;

/// Optional startup configuration (`walkthrough.toml`). Every field has a
/// sensible default; a missing file is not an error, the app just runs with
/// the embedded script from step 0.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// External script to show instead of the embedded one.
    pub script_path: Option<String>,
    /// Step to open the walkthrough at (clamped to the registry).
    pub start_step: Option<usize>,
}

pub fn load_config_from_file(file_path: &str) -> Result<Config, String> {
    match fs::read_to_string(file_path) {
        Ok(contents) => toml::from_str::<Config>(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", file_path, e)),
        Err(e) => Err(format!("Failed to read {}: {}", file_path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config =
            toml::from_str("script_path = \"assets/predictor.py\"\nstart_step = 4\n").unwrap();
        assert_eq!(config.script_path.as_deref(), Some("assets/predictor.py"));
        assert_eq!(config.start_step, Some(4));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.script_path.is_none());
        assert!(config.start_step.is_none());
    }
}
