//! Base + diurnal + gaussian noise synthesis for one sensor value.

use crate::profile::SensorProfile;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

pub const DIURNAL_PERIOD_S: f64 = 24.0 * 3600.0;

/// Noise scale used by the forwarder for its synthesized field.
pub const FULL_NOISE_SCALE: f64 = 1.0;
/// Noise scale used by the stress harness.
pub const SYNTHETIC_NOISE_SCALE: f64 = 0.1;

/// Source of standard-normal draws (mean 0, standard deviation 1).
pub trait NoiseSource {
    fn standard_normal(&mut self) -> f64;
}

/// Gaussian noise from a seedable generator.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

/// Returns the same draw every time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn standard_normal(&mut self) -> f64 {
        self.0
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn standard_normal(&mut self) -> f64 {
        (**self).standard_normal()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn standard_normal(&mut self) -> f64 {
        (**self).standard_normal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalModel {
    noise_scale: f64,
}

impl SignalModel {
    /// `noise_scale` multiplies each profile's noise amplitude to give the
    /// standard deviation of the noise term.
    pub const fn new(noise_scale: f64) -> Self {
        Self { noise_scale }
    }

    pub const fn full() -> Self {
        Self::new(FULL_NOISE_SCALE)
    }

    pub const fn synthetic() -> Self {
        Self::new(SYNTHETIC_NOISE_SCALE)
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    pub fn periodic_component(profile: &SensorProfile, elapsed_s: f64) -> f64 {
        let phase = 2.0 * core::f64::consts::PI * elapsed_s / DIURNAL_PERIOD_S;
        profile.periodic_amplitude * phase.sin()
    }

    pub fn generate<N: NoiseSource + ?Sized>(&self, profile: &SensorProfile, elapsed_s: f64, noise: &mut N) -> f64 {
        let periodic = Self::periodic_component(profile, elapsed_s);
        let sigma = profile.noise_amplitude * self.noise_scale;
        let raw = profile.base + periodic + sigma * noise.standard_normal();
        let value = round_to_hundredths(raw);

        match profile.domain {
            Some(domain) => domain.clamp(value),
            None => value,
        }
    }
}

impl Default for SignalModel {
    fn default() -> Self {
        Self::full()
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
