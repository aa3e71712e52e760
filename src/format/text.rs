//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::location::LocationData;

/// Text formatter - outputs a short summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, location: &LocationData, _config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&location.address);
        output.push('\n');
        match location.coords {
            Some(coords) => output.push_str(&format!("  Coordinates: {}\n", coords)),
            None => output.push_str("  Coordinates: (none)\n"),
        }
        if !location.city.is_empty() {
            output.push_str(&format!("  City: {}\n", location.city));
        }
        if !location.country.is_empty() {
            output.push_str(&format!("  Country: {}\n", location.country));
        }

        Ok(output)
    }
}
