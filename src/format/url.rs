//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::location::LocationData;

/// URL formatter - outputs an "open in maps" link for the location
#[derive(Debug, Default)]
pub struct UrlFormatter {
    /// URL provider override; the configured default otherwise
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: Option<String>) -> Self {
        Self { provider }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Open-in-maps link"
    }

    fn format(&self, location: &LocationData, config: &Config) -> Result<String> {
        let coords = location.coords.ok_or_else(|| {
            Error::InvalidLocation(format!("'{}' has no coordinates to link to", location.address))
        })?;
        config.format_url(self.provider.as_deref(), coords.lat, coords.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;

    fn eiffel() -> LocationData {
        LocationData::resolved(
            "Eiffel Tower, Paris, France",
            Coordinates::new(48.8584, 2.2945),
            "Paris",
            "France",
        )
    }

    #[test]
    fn test_url_format_default_provider() {
        let output = UrlFormatter::default().format(&eiffel(), &Config::default()).unwrap();
        assert!(output.contains("openstreetmap.org"));
        assert!(output.contains("mlat=48.8584"));
    }

    #[test]
    fn test_url_format_with_provider() {
        let formatter = UrlFormatter::with_provider(Some("google".to_string()));
        let output = formatter.format(&eiffel(), &Config::default()).unwrap();
        assert!(output.contains("google.com/maps"));
    }

    #[test]
    fn test_url_format_without_coordinates() {
        let result = UrlFormatter::default().format(&LocationData::online("x"), &Config::default());
        assert!(result.is_err());
    }
}
