use std::io::Write;

use clap::ValueEnum;

use crate::client::Hub;
use crate::entity::{EntityDomain, EntityState, filter_by_domain, title_case};
use crate::error::Error;
use crate::table::{ColumnWidths, DisplayRow, render_line};
use crate::Outcome;

pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TemperatureUnits {
    /// Raw Fahrenheit reading only
    Fahrenheit,
    /// Fahrenheit followed by the Celsius equivalent
    #[default]
    Dual,
}

/// Human label for a raw HVAC mode.
pub fn mode_label(mode: &str) -> String {
    match mode {
        "heat" => "Heating".into(),
        "cool" => "Cooling (AC)".into(),
        "heat_cool" => "Auto (Heat/Cool)".into(),
        "auto" => "Auto".into(),
        "dry" => "Dry".into(),
        "fan_only" => "Fan Only".into(),
        "off" => "Off".into(),
        "" | "unknown" => "Unknown".into(),
        other => title_case(&other.replace('_', " ")),
    }
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn format_temperature(f: f64, units: TemperatureUnits) -> String {
    match units {
        TemperatureUnits::Fahrenheit => format!("{:.1}°F", f),
        TemperatureUnits::Dual => format!("{:.1}°F ({:.1}°C)", f, fahrenheit_to_celsius(f)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetTemperature {
    Single(f64),
    Range { low: f64, high: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thermostat {
    pub name: String,
    pub mode: String,
    pub current_temperature: Option<f64>,
    pub target: Option<TargetTemperature>,
    pub humidity: Option<f64>,
}

impl Thermostat {
    pub fn from_state(state: &EntityState) -> Self {
        let attrs = &state.attributes;
        // A low/high pair only describes the target in dual-setpoint mode
        let target = attrs
            .decimal("temperature")
            .map(TargetTemperature::Single)
            .or_else(|| {
                if state.state != "heat_cool" {
                    return None;
                }
                Some(TargetTemperature::Range {
                    low: attrs.decimal("target_temp_low")?,
                    high: attrs.decimal("target_temp_high")?,
                })
            });

        Self {
            name: state.display_name(),
            mode: state.state.clone(),
            current_temperature: attrs.decimal("current_temperature"),
            target,
            humidity: attrs.decimal("current_humidity"),
        }
    }

    pub fn current_label(&self, units: TemperatureUnits) -> String {
        self.current_temperature
            .map_or_else(|| NOT_AVAILABLE.to_string(), |t| format_temperature(t, units))
    }

    pub fn target_label(&self, units: TemperatureUnits) -> String {
        match self.target {
            Some(TargetTemperature::Single(t)) => format_temperature(t, units),
            Some(TargetTemperature::Range { low, high }) => format!(
                "{} to {}",
                format_temperature(low, units),
                format_temperature(high, units)
            ),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn humidity_label(&self) -> String {
        self.humidity
            .map_or_else(|| NOT_AVAILABLE.to_string(), |h| format!("{}%", h))
    }
}

pub async fn fetch_thermostats<H: Hub>(hub: &H) -> Result<Vec<Thermostat>, Error> {
    let ids = hub.list_entities().await?;
    let mut thermostats = Vec::new();
    for id in filter_by_domain(&ids, EntityDomain::Climate) {
        let state = hub.get_state(&id).await?;
        thermostats.push(Thermostat::from_state(&state));
    }
    tracing::debug!(count = thermostats.len(), "fetched thermostats");
    Ok(thermostats)
}

/// Aligned name/mode table with the readings indented under each row.
pub fn render_report(thermostats: &[Thermostat], units: TemperatureUnits, color: bool) -> String {
    let rows: Vec<DisplayRow> = thermostats
        .iter()
        .enumerate()
        .map(|(i, t)| DisplayRow::new(i + 1, t.name.clone(), mode_label(&t.mode)))
        .collect();
    let widths = ColumnWidths::of(&rows);
    let indent = " ".repeat(widths.index + 2);

    rows.iter()
        .zip(thermostats)
        .map(|(row, thermostat)| {
            format!(
                "{line}\n\
                 {indent}Current temperature: {current}\n\
                 {indent}Target temperature:  {target}\n\
                 {indent}Humidity:            {humidity}\n",
                line = render_line(row, widths, color),
                current = thermostat.current_label(units),
                target = thermostat.target_label(units),
                humidity = thermostat.humidity_label(),
            )
        })
        .collect()
}

/// Fetches every thermostat once and writes the report to `out`.
pub async fn run<H: Hub, W: Write>(
    hub: &H,
    out: &mut W,
    units: TemperatureUnits,
    color: bool,
) -> Result<Outcome, Error> {
    let thermostats = fetch_thermostats(hub).await?;
    if thermostats.is_empty() {
        writeln!(out, "No thermostat entities found.")?;
        return Ok(Outcome::NoEntities);
    }
    write!(out, "{}", render_report(&thermostats, units, color))?;
    out.flush()?;
    Ok(Outcome::Finished)
}
