pub mod hardware;
pub mod synthetic;

pub use hardware::HardwareSource;
pub use synthetic::SyntheticSource;

use crate::reading::Reading;

/// Produces one complete reading per tick.
///
/// `Input` is what the variant consumes per tick: an instrument line for the
/// hardware source, nothing for the synthetic one.
pub trait SourceAdapter {
    type Input: ?Sized;
    type Error;

    fn produce_reading(&mut self, input: &Self::Input, elapsed_s: f64) -> Result<Reading, Self::Error>;
}
