use super::SourceAdapter;
use crate::profile::ProfileSet;
use crate::reading::{Reading, SensorKind};
use crate::signal::{NoiseSource, SignalModel};
use core::convert::Infallible;

/// Fabricates every field from the signal model.
#[derive(Debug)]
pub struct SyntheticSource<'a, N> {
    profiles: &'a ProfileSet,
    model: SignalModel,
    noise: N,
}

impl<'a, N: NoiseSource> SyntheticSource<'a, N> {
    pub fn new(profiles: &'a ProfileSet, noise: N) -> Self {
        Self::with_model(profiles, SignalModel::synthetic(), noise)
    }

    pub fn with_model(profiles: &'a ProfileSet, model: SignalModel, noise: N) -> Self {
        Self { profiles, model, noise }
    }

    pub fn generate(&mut self, elapsed_s: f64) -> Reading {
        let mut value = |sensor: SensorKind| {
            self.model
                .generate(self.profiles.get(sensor), elapsed_s, &mut self.noise)
        };

        Reading {
            temperature: value(SensorKind::Temperature),
            humidity: value(SensorKind::Humidity),
            methane: value(SensorKind::Methane),
            light: value(SensorKind::Light),
            atmospheric_pressure: value(SensorKind::AtmosphericPressure),
        }
    }
}

impl<'a, N: NoiseSource> SourceAdapter for SyntheticSource<'a, N> {
    type Input = ();
    type Error = Infallible;

    fn produce_reading(&mut self, _input: &(), elapsed_s: f64) -> Result<Reading, Infallible> {
        Ok(self.generate(elapsed_s))
    }
}
