use std::str::FromStr;
use std::time::Duration;

use panel::{Config, HeatingRange};

use crate::{Error, Result};

/// Builds the panel configuration from `PANEL_*` variables looked up through
/// `var`. Unset variables keep their defaults.
pub fn panel_config<F>(var: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    let min_c = parse(&var, "PANEL_MIN_HEATING_C")?.unwrap_or(config.heating_range.min_c());
    let max_c = parse(&var, "PANEL_MAX_HEATING_C")?.unwrap_or(config.heating_range.max_c());
    config.heating_range = HeatingRange::new(min_c, max_c)?;

    if let Some(value) = parse(&var, "PANEL_DEFAULT_HEATING_C")? {
        config.default_heating_c = value;
    }

    if let Some(value) = parse(&var, "PANEL_MASTER_HEATING_C")? {
        config.master_heating_c = value;
    }

    if let Some(value) = parse(&var, "PANEL_LIGHT_STEP")? {
        config.light_step = value;
    }

    if let Some(millis) = parse(&var, "PANEL_SYNC_TIMEOUT_MS")? {
        config.retry.timeout = Duration::from_millis(millis);
    }

    if let Some(attempts) = parse(&var, "PANEL_SYNC_MAX_ATTEMPTS")? {
        config.retry.max_attempts = attempts;
    }

    config.validate()?;

    Ok(config)
}

fn parse<T, F>(var: &F, name: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidEnv(name, value))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        panel_config(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PANEL_MIN_HEATING_C", "10"),
            ("PANEL_MAX_HEATING_C", "28.5"),
            ("PANEL_DEFAULT_HEATING_C", "20"),
            ("PANEL_LIGHT_STEP", " 25 "),
            ("PANEL_SYNC_TIMEOUT_MS", "1500"),
            ("PANEL_SYNC_MAX_ATTEMPTS", "2"),
        ])
        .unwrap();

        assert_eq!(config.heating_range, HeatingRange::new(10.0, 28.5).unwrap());
        assert_eq!(config.default_heating_c, 20.0);
        assert_eq!(config.master_heating_c, 21.0);
        assert_eq!(config.light_step, 25);
        assert_eq!(config.retry.timeout, Duration::from_millis(1500));
        assert_eq!(config.retry.max_attempts, 2);
    }

    #[test]
    fn test_unparsable_value() {
        assert!(matches!(
            config(&[("PANEL_LIGHT_STEP", "ten")]),
            Err(Error::InvalidEnv("PANEL_LIGHT_STEP", value)) if value == "ten"
        ));
    }

    #[test]
    fn test_invalid_combination() {
        assert!(matches!(
            config(&[("PANEL_MAX_HEATING_C", "18")]),
            Err(Error::Panel(panel::Error::InvalidConfig(_)))
        ));
    }
}
