//! Report engine configuration.

use std::time::Duration;

/// Environment variable overriding the footer brand string.
pub const ENV_BRAND: &str = "ADVOKIT_BRAND";
/// Environment variable overriding the asset fetch timeout, in seconds.
pub const ENV_FETCH_TIMEOUT_SECS: &str = "ADVOKIT_FETCH_TIMEOUT_SECS";

/// Default footer brand.
pub const DEFAULT_BRAND: &str = "Advokit";
/// Default per-request asset fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Page geometry and rendering parameters for generated documents.
///
/// All lengths are millimetres on an A4 page.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Full-size evidence image box.
    pub image_width: f64,
    pub image_height: f64,
    /// Half-size box for photos attached under an event entry.
    pub attached_image_width: f64,
    pub attached_image_height: f64,
    /// Body text size in points.
    pub body_size: f64,
    /// Brand string stamped into every page footer.
    pub brand: String,
    /// Per-request timeout for evidence image downloads. The upstream
    /// implementation had none; a hung fetch stalled the export forever.
    pub fetch_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            image_width: 60.0,
            image_height: 45.0,
            attached_image_width: 50.0,
            attached_image_height: 37.5,
            body_size: 10.0,
            brand: DEFAULT_BRAND.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ReportConfig {
    /// Build a config from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(brand) = std::env::var(ENV_BRAND) {
            if !brand.is_empty() {
                config.brand = brand;
            }
        }
        if let Some(secs) = std::env::var(ENV_FETCH_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Usable width between the side margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }
}
