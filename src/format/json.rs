//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::location::LocationData;

/// JSON formatter - the location in its wire shape
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Location JSON (address, lat, lng, city, country)"
    }

    fn format(&self, location: &LocationData, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(location)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;

    #[test]
    fn test_json_format() {
        let location = LocationData::resolved(
            "Eiffel Tower, Paris, France",
            Coordinates::new(48.8584, 2.2945),
            "Paris",
            "France",
        );
        let output = JsonFormatter.format(&location, &Config::default()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["address"], "Eiffel Tower, Paris, France");
        assert_eq!(parsed["lat"], 48.8584);
        assert_eq!(parsed["lng"], 2.2945);
        assert_eq!(parsed["city"], "Paris");
    }

    #[test]
    fn test_json_format_online_has_null_coordinates() {
        let location = LocationData::online("https://meet.example.com/x");
        let output = JsonFormatter.format(&location, &Config::default()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["lat"].is_null());
        assert!(parsed["lng"].is_null());
    }
}
