//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};

/// Default number of minutes before a verification code expires
pub const DEFAULT_EXPIRY_MINUTES: i64 = 10;

/// Default maximum number of verification attempts per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default length of the verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default progressive backoff table in seconds, indexed by generation
/// sequence minus one and clamped at the last entry
pub const DEFAULT_WAITING_PERIODS: [u64; 6] = [0, 5, 30, 300, 1800, 3600];

/// Configuration for the OTP verification engine
///
/// Constructed once at startup and injected into the engine; the engine
/// never falls back to hidden defaults of its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes before a verification code expires
    pub expiry_minutes: i64,

    /// Maximum number of verification attempts per request
    pub max_attempts: u32,

    /// Ordered wait intervals in seconds for progressive throttling
    pub waiting_periods: Vec<u64>,

    /// Number of digits in a generated code
    pub code_length: usize,

    /// Upper bound in seconds for a single dispatch call
    pub dispatch_timeout_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: DEFAULT_EXPIRY_MINUTES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            waiting_periods: DEFAULT_WAITING_PERIODS.to_vec(),
            code_length: DEFAULT_CODE_LENGTH,
            dispatch_timeout_secs: 10,
        }
    }
}

impl OtpConfig {
    /// Build configuration from `OTP_*` environment variables, falling back
    /// to defaults for anything unset or unparsable
    ///
    /// `OTP_WAITING_PERIODS` is a comma-separated list of seconds, e.g.
    /// `0,5,30,300,1800,3600`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let waiting_periods = std::env::var("OTP_WAITING_PERIODS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| part.trim().parse::<u64>().ok())
                    .collect::<Vec<_>>()
            })
            .filter(|periods| !periods.is_empty())
            .unwrap_or(defaults.waiting_periods);

        Self {
            expiry_minutes: env_parse("OTP_EXPIRY_MINUTES", defaults.expiry_minutes),
            max_attempts: env_parse("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            waiting_periods,
            code_length: env_parse("OTP_CODE_LENGTH", defaults.code_length),
            dispatch_timeout_secs: env_parse(
                "OTP_DISPATCH_TIMEOUT_SECS",
                defaults.dispatch_timeout_secs,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
