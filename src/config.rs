use chrono::{FixedOffset, NaiveTime};
use std::time::Duration;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Read once from the environment at startup. Every value has a default;
// a malformed value stops startup with a `ConfigError`.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub store_uri: String,
    pub store_keyspace: String,
    /// Exchange time zone
    pub zone: FixedOffset,
    /// Local time after which the previous day's data is final
    pub cutoff: NaiveTime,
    pub store_timeout: Duration,
    pub metrics_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_uri: "127.0.0.1:9042".to_string(),
            store_keyspace: "tables_ks".to_string(),
            zone: FixedOffset::east_opt(3 * 3600).expect("Moscow offset is in range"),
            cutoff: NaiveTime::from_hms_opt(0, 45, 0).expect("cutoff is a valid time"),
            store_timeout: Duration::from_secs(30),
            metrics_port: 9090,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(uri) = lookup("TABLES_STORE_URI") {
            config.store_uri = uri;
        }
        if let Some(keyspace) = lookup("TABLES_STORE_KEYSPACE") {
            if keyspace.is_empty() || !keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("TABLES_STORE_KEYSPACE", keyspace, "expected [A-Za-z0-9_]+"));
            }
            config.store_keyspace = keyspace;
        }
        if let Some(zone) = lookup("TABLES_ZONE_OFFSET") {
            config.zone = parse_offset(&zone)
                .ok_or_else(|| invalid("TABLES_ZONE_OFFSET", zone.clone(), "expected ±HH:MM"))?;
        }
        if let Some(cutoff) = lookup("TABLES_CUTOFF") {
            config.cutoff = NaiveTime::parse_from_str(&cutoff, "%H:%M")
                .map_err(|e| invalid("TABLES_CUTOFF", cutoff.clone(), e))?;
        }
        if let Some(secs) = lookup("TABLES_STORE_TIMEOUT_SECS") {
            let parsed: u64 = secs
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("TABLES_STORE_TIMEOUT_SECS", secs.clone(), e))?;
            if parsed == 0 {
                return Err(invalid("TABLES_STORE_TIMEOUT_SECS", secs, "must be positive"));
            }
            config.store_timeout = Duration::from_secs(parsed);
        }
        if let Some(port) = lookup("TABLES_METRICS_PORT") {
            config.metrics_port = port
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("TABLES_METRICS_PORT", port.clone(), e))?;
        }

        Ok(config)
    }
}

/// `+03:00` / `-04:30` style UTC offset
fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let is_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(hours) || !is_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn invalid(key: &'static str, value: String, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        reason: reason.to_string(),
    }
}
