use serde::{Deserialize, Serialize};

pub const SENSOR_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Methane,
    Light,
    AtmosphericPressure,
}

impl SensorKind {
    pub const ALL: [SensorKind; SENSOR_COUNT] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Methane,
        SensorKind::Light,
        SensorKind::AtmosphericPressure,
    ];

    /// Wire name used as the JSON key at the ingestion endpoint.
    pub fn key(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Methane => "methane",
            SensorKind::Light => "light",
            SensorKind::AtmosphericPressure => "atmosphericPressure",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::Methane => "ppm",
            SensorKind::Light => "lux",
            SensorKind::AtmosphericPressure => "hPa",
        }
    }
}

impl core::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// One complete set of sensor values for a single sampling tick.
///
/// Serializes to exactly the five keys the ingestion endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub methane: f64,
    pub light: f64,
    pub atmospheric_pressure: f64,
}

impl Reading {
    pub fn get(&self, sensor: SensorKind) -> f64 {
        match sensor {
            SensorKind::Temperature => self.temperature,
            SensorKind::Humidity => self.humidity,
            SensorKind::Methane => self.methane,
            SensorKind::Light => self.light,
            SensorKind::AtmosphericPressure => self.atmospheric_pressure,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, f64)> + '_ {
        SensorKind::ALL.into_iter().map(move |sensor| (sensor, self.get(sensor)))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl core::fmt::Display for Reading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (sensor, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}{}", sensor, value, sensor.unit())?;
        }
        Ok(())
    }
}
