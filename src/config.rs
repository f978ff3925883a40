use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MedScribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:7878";
pub const DEFAULT_ASSESSMENT_DELAY_MS: u64 = 1500;
pub const DEFAULT_EXTRACTION_DELAY_MS: u64 = 1000;
/// Fixed delay for the simulated webhook test.
pub const WEBHOOK_TEST_DELAY_MS: u64 = 800;

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    if cfg!(debug_assertions) {
        "medscribe_lib=debug,tower_http=info,warn".to_string()
    } else {
        "medscribe_lib=info,warn".to_string()
    }
}

/// ~/MedScribe/ on all platforms. Falls back to the working directory when
/// no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => {
            tracing::warn!("Cannot determine home directory, using working directory");
            PathBuf::from(APP_NAME)
        }
    }
}

/// Default location for saved PDFs
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub assessment_delay: Duration,
    pub extraction_delay: Duration,
    pub webhook_test_delay: Duration,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 7878)),
            assessment_delay: Duration::from_millis(DEFAULT_ASSESSMENT_DELAY_MS),
            extraction_delay: Duration::from_millis(DEFAULT_EXTRACTION_DELAY_MS),
            webhook_test_delay: Duration::from_millis(WEBHOOK_TEST_DELAY_MS),
            export_dir: exports_dir(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values keep the
    /// default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: parse_or("MEDSCRIBE_BIND", &lookup, defaults.bind),
            assessment_delay: Duration::from_millis(parse_or(
                "MEDSCRIBE_ASSESSMENT_DELAY_MS",
                &lookup,
                DEFAULT_ASSESSMENT_DELAY_MS,
            )),
            extraction_delay: Duration::from_millis(parse_or(
                "MEDSCRIBE_EXTRACTION_DELAY_MS",
                &lookup,
                DEFAULT_EXTRACTION_DELAY_MS,
            )),
            webhook_test_delay: defaults.webhook_test_delay,
            export_dir: lookup("MEDSCRIBE_EXPORT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    /// No simulated delays. Used by tests.
    pub fn instant() -> Self {
        Self {
            assessment_delay: Duration::ZERO,
            extraction_delay: Duration::ZERO,
            webhook_test_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
    }
}
