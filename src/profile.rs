//! Static per-sensor configuration consumed by the signal model.
//!
//! Profiles are built once (from the defaults below or a JSON file) and are
//! passed by reference afterwards; nothing mutates them once a run starts.

use crate::error::ConfigError;
use crate::reading::{SensorKind, SENSOR_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// Base values
const TEMPERATURE_BASE_C: f64 = 22.0;
const HUMIDITY_BASE_PERCENT: f64 = 45.0;
const METHANE_BASE_PPM: f64 = 2.0;
const LIGHT_BASE_LUX: f64 = 800.0;
const PRESSURE_BASE_HPA: f64 = 1013.25;

// Forwarder pressure synthesis, the instrument has no barometer
const INSTRUMENT_PRESSURE_BASE_HPA: f64 = 1013.0;
const INSTRUMENT_PRESSURE_NOISE_HPA: f64 = 0.5;
const INSTRUMENT_PRESSURE_PERIODIC_HPA: f64 = 5.0;

/// Inclusive clamp applied after rounding. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Domain {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub const fn non_negative() -> Self {
        Self { min: Some(0.0), max: None }
    }

    /// Physical range of a sensor's values, shared by every source.
    pub const fn of(sensor: SensorKind) -> Option<Self> {
        match sensor {
            SensorKind::Humidity => Some(Self::between(0.0, 100.0)),
            SensorKind::Methane | SensorKind::Light => Some(Self::non_negative()),
            SensorKind::Temperature | SensorKind::AtmosphericPressure => None,
        }
    }

    /// Clamps `value` to the sensor's range, if it has one.
    pub fn clamp_reading(sensor: SensorKind, value: f64) -> f64 {
        Self::of(sensor).map_or(value, |domain| domain.clamp(value))
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let value = match self.min {
            Some(min) if value < min => min,
            _ => value,
        };
        match self.max {
            Some(max) if value > max => max,
            _ => value,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorProfile {
    pub base: f64,
    pub noise_amplitude: f64,
    pub periodic_amplitude: f64,
    #[serde(default)]
    pub domain: Option<Domain>,
}

impl SensorProfile {
    pub const fn new(base: f64, noise_amplitude: f64, periodic_amplitude: f64) -> Self {
        Self {
            base,
            noise_amplitude,
            periodic_amplitude,
            domain: None,
        }
    }

    pub const fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Pressure profile used when the forwarder synthesizes `atmosphericPressure`.
    pub const fn instrument_pressure() -> Self {
        Self::new(
            INSTRUMENT_PRESSURE_BASE_HPA,
            INSTRUMENT_PRESSURE_NOISE_HPA,
            INSTRUMENT_PRESSURE_PERIODIC_HPA,
        )
    }

    fn validate(&self, sensor: SensorKind) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidProfile {
            sensor,
            reason: reason.to_string(),
        };

        if !self.base.is_finite() || !self.noise_amplitude.is_finite() || !self.periodic_amplitude.is_finite() {
            return Err(invalid("values must be finite"));
        }
        if self.noise_amplitude < 0.0 {
            return Err(invalid("noise amplitude must not be negative"));
        }
        if let Some(domain) = self.domain {
            if domain.min.into_iter().chain(domain.max).any(|bound| !bound.is_finite()) {
                return Err(invalid("domain bounds must be finite"));
            }
            if let Domain { min: Some(min), max: Some(max) } = domain {
                if min > max {
                    return Err(invalid("domain min exceeds max"));
                }
            }
        }
        Ok(())
    }
}

/// One profile per sensor, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    profiles: [SensorProfile; SENSOR_COUNT],
}

impl ProfileSet {
    /// Profiles used by the stress harness.
    pub fn synthetic() -> Self {
        Self {
            profiles: [
                SensorProfile::new(TEMPERATURE_BASE_C, 0.5, 5.0),
                SensorProfile::new(HUMIDITY_BASE_PERCENT, 2.0, 15.0).with_domain(Domain::between(0.0, 100.0)),
                SensorProfile::new(METHANE_BASE_PPM, 0.2, 1.0).with_domain(Domain::non_negative()),
                SensorProfile::new(LIGHT_BASE_LUX, 50.0, 500.0).with_domain(Domain::non_negative()),
                SensorProfile::new(PRESSURE_BASE_HPA, 1.0, 5.0),
            ],
        }
    }

    pub fn from_map(mut map: BTreeMap<SensorKind, SensorProfile>) -> Result<Self, ConfigError> {
        let mut profiles = [SensorProfile::new(0.0, 0.0, 0.0); SENSOR_COUNT];
        for (slot, sensor) in profiles.iter_mut().zip(SensorKind::ALL) {
            let profile = map.remove(&sensor).ok_or(ConfigError::MissingProfile(sensor))?;
            profile.validate(sensor)?;
            *slot = profile;
        }
        Ok(Self { profiles })
    }

    /// Parses `{"temperature": {"base": .., "noiseAmplitude": .., ...}, ...}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let map: BTreeMap<SensorKind, SensorProfile> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, sensor: SensorKind) -> &SensorProfile {
        &self.profiles[Self::index(sensor)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, &SensorProfile)> {
        SensorKind::ALL.into_iter().zip(self.profiles.iter())
    }

    fn index(sensor: SensorKind) -> usize {
        match sensor {
            SensorKind::Temperature => 0,
            SensorKind::Humidity => 1,
            SensorKind::Methane => 2,
            SensorKind::Light => 3,
            SensorKind::AtmosphericPressure => 4,
        }
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::synthetic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_profiles_declare_domains() {
        let profiles = ProfileSet::synthetic();

        assert_eq!(profiles.get(SensorKind::Humidity).domain, Some(Domain::between(0.0, 100.0)));
        assert_eq!(profiles.get(SensorKind::Methane).domain, Some(Domain::non_negative()));
        assert_eq!(profiles.get(SensorKind::Light).domain, Some(Domain::non_negative()));
        assert_eq!(profiles.get(SensorKind::Temperature).domain, None);
        assert_eq!(profiles.get(SensorKind::AtmosphericPressure).base, 1013.25);
    }

    #[test]
    fn test_profiles_iterate_in_sensor_order() {
        let profiles = ProfileSet::synthetic();
        let order: Vec<SensorKind> = profiles.iter().map(|(sensor, _)| sensor).collect();
        assert_eq!(order, SensorKind::ALL.to_vec());
    }

    #[test]
    fn test_domain_clamp() {
        let humidity = Domain::between(0.0, 100.0);
        assert_eq!(humidity.clamp(-3.5), 0.0);
        assert_eq!(humidity.clamp(104.2), 100.0);
        assert_eq!(humidity.clamp(55.0), 55.0);

        let light = Domain::non_negative();
        assert_eq!(light.clamp(-0.01), 0.0);
        assert_eq!(light.clamp(1.0e9), 1.0e9);
    }

    #[test]
    fn test_profiles_from_json() {
        let json = r#"{
            "temperature": {"base": 18.0, "noiseAmplitude": 0.1, "periodicAmplitude": 2.0},
            "humidity": {"base": 60.0, "noiseAmplitude": 1.0, "periodicAmplitude": 10.0,
                         "domain": {"min": 0.0, "max": 100.0}},
            "methane": {"base": 1.5, "noiseAmplitude": 0.1, "periodicAmplitude": 0.5,
                        "domain": {"min": 0.0}},
            "light": {"base": 300.0, "noiseAmplitude": 20.0, "periodicAmplitude": 250.0,
                      "domain": {"min": 0.0}},
            "atmosphericPressure": {"base": 1000.0, "noiseAmplitude": 0.5, "periodicAmplitude": 3.0}
        }"#;

        let profiles = ProfileSet::from_json(json).unwrap();
        assert_eq!(profiles.get(SensorKind::Temperature).base, 18.0);
        assert_eq!(profiles.get(SensorKind::Methane).domain, Some(Domain::non_negative()));
        assert_eq!(profiles.get(SensorKind::AtmosphericPressure).periodic_amplitude, 3.0);
    }

    #[test]
    fn test_profiles_missing_sensor_rejected() {
        let json = r#"{"temperature": {"base": 18.0, "noiseAmplitude": 0.1, "periodicAmplitude": 2.0}}"#;
        let result = ProfileSet::from_json(json);
        assert!(matches!(result, Err(ConfigError::MissingProfile(SensorKind::Humidity))));
    }

    #[test]
    fn test_profiles_invalid_domain_rejected() {
        let mut map: BTreeMap<SensorKind, SensorProfile> = ProfileSet::synthetic()
            .iter()
            .map(|(sensor, profile)| (sensor, *profile))
            .collect();
        map.insert(
            SensorKind::Humidity,
            SensorProfile::new(45.0, 2.0, 15.0).with_domain(Domain::between(100.0, 0.0)),
        );

        let result = ProfileSet::from_map(map);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidProfile { sensor: SensorKind::Humidity, .. })
        ));
    }

    #[test]
    fn test_sensor_domains_match_synthetic_profiles() {
        let profiles = ProfileSet::synthetic();
        for (sensor, profile) in profiles.iter() {
            assert_eq!(Domain::of(sensor), profile.domain, "{}", sensor);
        }
        assert_eq!(Domain::clamp_reading(SensorKind::Humidity, 150.0), 100.0);
        assert_eq!(Domain::clamp_reading(SensorKind::Temperature, -40.0), -40.0);
    }

    #[test]
    fn test_infinite_domain_bounds_rejected() {
        let json = r#"{
            "temperature": {"base": 18.0, "noiseAmplitude": 0.1, "periodicAmplitude": 2.0},
            "humidity": {"base": 60.0, "noiseAmplitude": 1.0, "periodicAmplitude": 10.0},
            "methane": {"base": 1.5, "noiseAmplitude": 0.1, "periodicAmplitude": 0.5,
                        "domain": {"min": 1e999}},
            "light": {"base": 300.0, "noiseAmplitude": 20.0, "periodicAmplitude": 250.0},
            "atmosphericPressure": {"base": 1000.0, "noiseAmplitude": 0.5, "periodicAmplitude": 3.0}
        }"#;
        assert!(ProfileSet::from_json(json).is_err());

        let mut map: BTreeMap<SensorKind, SensorProfile> = ProfileSet::synthetic()
            .iter()
            .map(|(sensor, profile)| (sensor, *profile))
            .collect();
        map.insert(
            SensorKind::Light,
            SensorProfile::new(800.0, 50.0, 500.0).with_domain(Domain {
                min: Some(0.0),
                max: Some(f64::INFINITY),
            }),
        );
        assert!(matches!(
            ProfileSet::from_map(map.clone()),
            Err(ConfigError::InvalidProfile { sensor: SensorKind::Light, .. })
        ));

        map.insert(
            SensorKind::Light,
            SensorProfile::new(800.0, 50.0, 500.0).with_domain(Domain {
                min: Some(f64::NEG_INFINITY),
                max: None,
            }),
        );
        assert!(ProfileSet::from_map(map).is_err());
    }

    #[test]
    fn test_negative_noise_rejected() {
        let mut map: BTreeMap<SensorKind, SensorProfile> = ProfileSet::synthetic()
            .iter()
            .map(|(sensor, profile)| (sensor, *profile))
            .collect();
        map.insert(SensorKind::Light, SensorProfile::new(800.0, -1.0, 500.0));

        assert!(ProfileSet::from_map(map).is_err());
    }
}
