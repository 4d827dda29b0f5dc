//! Human-friendly text for records and history.

use std::fmt;

use weather_core::{SearchHistory, TemperatureUnit, WeatherRecord};

/// Result panel for one record, in the chosen unit.
#[derive(Debug, Clone, Copy)]
pub struct RecordPanel<'a> {
    record: &'a WeatherRecord,
    unit: TemperatureUnit,
}

impl<'a> RecordPanel<'a> {
    pub fn new(record: &'a WeatherRecord, unit: TemperatureUnit) -> Self {
        Self { record, unit }
    }
}

impl fmt::Display for RecordPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let current = &record.current;

        writeln!(f, "{}", record.display_name())?;
        writeln!(f, "  Temperature: {} {}", record.temperature(self.unit), self.unit)?;
        writeln!(
            f,
            "  Condition:   {} ({})",
            current.condition.text,
            icon_url(&current.condition.icon)
        )?;
        writeln!(f, "  Humidity:    {}%", current.humidity)?;
        writeln!(f, "  Pressure:    {} mb", current.pressure_mb)?;
        writeln!(f, "  Visibility:  {} km", current.vis_km)?;
        if let Some(at) = record.observed_at() {
            writeln!(f, "  Updated:     {}", at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}

/// Numbered list of recent searches, newest first.
#[derive(Debug, Clone, Copy)]
pub struct HistoryList<'a>(pub &'a SearchHistory);

impl fmt::Display for HistoryList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No recent searches.");
        }

        writeln!(f, "Recent searches:")?;
        for (i, city) in self.0.entries().iter().enumerate() {
            writeln!(f, "  {}. {city}", i + 1)?;
        }
        Ok(())
    }
}

/// Upstream icons are protocol-relative (`//cdn...`).
pub fn icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon.to_string()
    }
}
