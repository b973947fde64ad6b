use std::{fs, path::Path};

use anyhow::{Context, Result};
use porsesh_progress::ProgressConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DemoFile {
    progress: ProgressConfig,
}

/// Loads the animation constants, falling back to the defaults when no file
/// is given.
pub fn load_config(path: Option<&Path>) -> Result<ProgressConfig> {
    let Some(path) = path else {
        return Ok(ProgressConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_config(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded progress config");
    Ok(config)
}

fn parse_config(text: &str) -> Result<ProgressConfig> {
    let file: DemoFile = toml::from_str(text)?;
    file.progress.validate()?;
    Ok(file.progress)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use porsesh_progress::ProgressConfig;

    use super::parse_config;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(
            parse_config("").expect("empty config"),
            ProgressConfig::default()
        );
    }

    #[test]
    fn durations_are_read_as_milliseconds() {
        let config = parse_config(
            r#"
            [progress]
            ceiling = 80.0
            tick_interval_ms = 40
            hide_delay_ms = 300
            safety_timeout_ms = 900
            seed = 12
            "#,
        )
        .expect("valid config");

        assert_eq!(config.ceiling, 80.0);
        assert_eq!(config.tick_interval, Duration::from_millis(40));
        assert_eq!(config.hide_delay, Duration::from_millis(300));
        assert_eq!(config.safety_timeout, Some(Duration::from_millis(900)));
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.start_value, 10.0);
    }

    #[test]
    fn invalid_constants_are_reported() {
        let err = parse_config("[progress]\nceiling = 5.0\n").expect_err("ceiling below start");
        assert!(err.to_string().contains("ceiling"));
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(parse_config("[bar]\nheight = 3\n").is_err());
    }
}
