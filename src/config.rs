use std::{env, path::PathBuf, time::Duration};

use log::warn;

use crate::{
    chat::DEFAULT_REPLY_DELAY, scheduler::DEFAULT_CHECK_INTERVAL,
    scheduler::notifier::Permission,
};

pub const LOG_ENV: &str = "REMIND_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub notifications: Permission,
    pub chat_delay: Duration,
    pub check_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            notifications: Permission::Default,
            chat_delay: DEFAULT_REPLY_DELAY,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|name| env::var(name).ok())
    }

    fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = get_env("REMIND_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let notifications = match get_env("REMIND_NOTIFICATIONS") {
            Some(value) => value.parse().unwrap_or_else(|err| {
                warn!("Invalid REMIND_NOTIFICATIONS: {err}. Using default.");
                defaults.notifications
            }),
            None => defaults.notifications,
        };

        let chat_delay = read_env_millis("REMIND_CHAT_DELAY_MS", defaults.chat_delay, &get_env);

        let check_interval = read_env_secs(
            "REMIND_CHECK_INTERVAL_SECS",
            defaults.check_interval,
            &get_env,
        );
        let check_interval = if check_interval.is_zero() {
            warn!("REMIND_CHECK_INTERVAL_SECS must be positive. Using default.");
            defaults.check_interval
        } else {
            check_interval
        };

        Self {
            data_dir,
            notifications,
            chat_delay,
            check_interval,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("remind")
}

fn read_env_millis<F>(name: &str, default: Duration, get_env: &F) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match get_env(name) {
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) => Duration::from_millis(parsed),
            Err(err) => {
                warn!(
                    "Invalid {name}='{value}': {err}. Using default {}.",
                    default.as_millis()
                );
                default
            }
        },
        None => default,
    }
}

fn read_env_secs<F>(name: &str, default: Duration, get_env: &F) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match get_env(name) {
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) => Duration::from_secs(parsed),
            Err(err) => {
                warn!(
                    "Invalid {name}='{value}': {err}. Using default {}.",
                    default.as_secs()
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_env_with(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.notifications, Permission::Default);
        assert_eq!(config.chat_delay, Duration::from_millis(1500));
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert!(config.data_dir.ends_with("remind"));
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("REMIND_DATA_DIR", "/tmp/remind-data"),
            ("REMIND_NOTIFICATIONS", "granted"),
            ("REMIND_CHAT_DELAY_MS", "0"),
            ("REMIND_CHECK_INTERVAL_SECS", "5"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/remind-data"));
        assert_eq!(config.notifications, Permission::Granted);
        assert_eq!(config.chat_delay, Duration::ZERO);
        assert_eq!(config.check_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("REMIND_NOTIFICATIONS", "sometimes"),
            ("REMIND_CHAT_DELAY_MS", "soon"),
            ("REMIND_CHECK_INTERVAL_SECS", "0"),
        ]);
        assert_eq!(config.notifications, Permission::Default);
        assert_eq!(config.chat_delay, DEFAULT_REPLY_DELAY);
        assert_eq!(config.check_interval, DEFAULT_CHECK_INTERVAL);
    }
}
