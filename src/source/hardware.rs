use super::SourceAdapter;
use crate::error::FrameError;
use crate::frame::InstrumentFrame;
use crate::profile::{Domain, SensorProfile};
use crate::reading::{Reading, SensorKind};
use crate::signal::{NoiseSource, SignalModel};

/// Builds readings from instrument frames. The instrument has no barometer, so
/// `atmosphericPressure` comes from the signal model. Instrument values are
/// clamped to the same sensor ranges the synthetic profiles use.
#[derive(Debug)]
pub struct HardwareSource<N> {
    model: SignalModel,
    pressure: SensorProfile,
    noise: N,
}

impl<N: NoiseSource> HardwareSource<N> {
    pub fn new(noise: N) -> Self {
        Self::with_pressure_profile(SensorProfile::instrument_pressure(), noise)
    }

    pub fn with_pressure_profile(pressure: SensorProfile, noise: N) -> Self {
        Self {
            model: SignalModel::full(),
            pressure,
            noise,
        }
    }

    pub fn pressure_profile(&self) -> &SensorProfile {
        &self.pressure
    }
}

impl<N: NoiseSource> SourceAdapter for HardwareSource<N> {
    type Input = str;
    type Error = FrameError;

    fn produce_reading(&mut self, line: &str, elapsed_s: f64) -> Result<Reading, FrameError> {
        let frame = InstrumentFrame::parse(line)?;

        Ok(Reading {
            temperature: frame.temperature,
            humidity: Domain::clamp_reading(SensorKind::Humidity, frame.humidity),
            methane: Domain::clamp_reading(SensorKind::Methane, frame.methane),
            light: Domain::clamp_reading(SensorKind::Light, frame.light),
            atmospheric_pressure: self.model.generate(&self.pressure, elapsed_s, &mut self.noise),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{FixedNoise, GaussianNoise};

    #[test]
    fn test_reading_from_reference_frame() {
        let mut source = HardwareSource::new(FixedNoise(0.0));
        let reading = source.produce_reading("10|5|800|45.2|22.1|2.0", 0.0).unwrap();

        assert_eq!(reading.light, 800.0);
        assert_eq!(reading.humidity, 45.2);
        assert_eq!(reading.temperature, 22.1);
        assert_eq!(reading.methane, 2.0);
        assert_eq!(reading.atmospheric_pressure, 1013.0);
    }

    #[test]
    fn test_pressure_uses_full_noise_amplitude() {
        let mut source = HardwareSource::new(FixedNoise(1.0));
        let reading = source.produce_reading("0|0|1|1|1|1", 0.0).unwrap();
        assert_eq!(reading.atmospheric_pressure, 1013.5);
    }

    #[test]
    fn test_pressure_stays_near_base() {
        let mut source = HardwareSource::new(GaussianNoise::seeded(3));
        for step in 0..500 {
            let reading = source.produce_reading("0|0|1|1|1|1", step as f64).unwrap();
            // 5 hPa periodic plus a generous noise band
            assert!((reading.atmospheric_pressure - 1013.0).abs() < 5.0 + 0.5 * 6.0);
        }
    }

    #[test]
    fn test_out_of_range_frame_values_clamped() {
        let mut source = HardwareSource::new(FixedNoise(0.0));
        let reading = source.produce_reading("10|5|-40|150.0|-12.5|-3.0", 0.0).unwrap();

        assert_eq!(reading.light, 0.0);
        assert_eq!(reading.humidity, 100.0);
        assert_eq!(reading.methane, 0.0);
        // Temperature has no range
        assert_eq!(reading.temperature, -12.5);
    }

    #[test]
    fn test_malformed_frame_propagates_error() {
        let mut source = HardwareSource::new(FixedNoise(0.0));
        assert!(source.produce_reading("10|5|800", 0.0).is_err());
        assert!(source.produce_reading("10|5|800|45.2|hot|2.0", 0.0).is_err());
    }
}
