//! Instrument frame parsing.
//!
//! A frame is one ASCII line of six `|`-separated fields:
//! ultrasonic distance, ir distance, light, humidity, temperature, gas.

use crate::error::FrameError;
use crate::reading::SensorKind;
use heapless::Vec;

pub const FRAME_FIELD_COUNT: usize = 6;
pub const FRAME_DELIMITER: char = '|';

pub const ULTRASONIC_DISTANCE_INDEX: usize = 0;
pub const IR_DISTANCE_INDEX: usize = 1;
pub const LIGHT_INDEX: usize = 2;
pub const HUMIDITY_INDEX: usize = 3;
pub const TEMPERATURE_INDEX: usize = 4;
pub const METHANE_INDEX: usize = 5;

/// Fields the forwarder consumes from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentFrame {
    pub light: f64,
    pub humidity: f64,
    pub temperature: f64,
    pub methane: f64,
}

impl InstrumentFrame {
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let line = line.trim();
        let mut fields: Vec<&str, FRAME_FIELD_COUNT> = Vec::new();

        for field in line.split(FRAME_DELIMITER) {
            if fields.push(field.trim()).is_err() {
                return Err(FrameError::FieldCount {
                    expected: FRAME_FIELD_COUNT,
                    found: line.split(FRAME_DELIMITER).count(),
                });
            }
        }

        if fields.len() != FRAME_FIELD_COUNT {
            return Err(FrameError::FieldCount {
                expected: FRAME_FIELD_COUNT,
                found: fields.len(),
            });
        }

        Ok(Self {
            light: parse_light(fields[LIGHT_INDEX])?,
            humidity: parse_number(&fields, HUMIDITY_INDEX, SensorKind::Humidity)?,
            temperature: parse_number(&fields, TEMPERATURE_INDEX, SensorKind::Temperature)?,
            methane: parse_number(&fields, METHANE_INDEX, SensorKind::Methane)?,
        })
    }
}

fn parse_number(fields: &[&str], index: usize, sensor: SensorKind) -> Result<f64, FrameError> {
    let raw = fields[index];
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FrameError::InvalidField {
            index,
            sensor,
            value: raw.to_string(),
        }),
    }
}

// The instrument reports light as an integer count
fn parse_light(raw: &str) -> Result<f64, FrameError> {
    raw.parse::<i64>()
        .map(|lux| lux as f64)
        .map_err(|_| FrameError::InvalidField {
            index: LIGHT_INDEX,
            sensor: SensorKind::Light,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_frame() {
        let frame = InstrumentFrame::parse("10|5|800|45.2|22.1|2.0").unwrap();
        assert_eq!(frame.light, 800.0);
        assert_eq!(frame.humidity, 45.2);
        assert_eq!(frame.temperature, 22.1);
        assert_eq!(frame.methane, 2.0);
    }

    #[test]
    fn test_parse_trims_line_endings() {
        let frame = InstrumentFrame::parse("10|5|800|45.2|22.1|2.0\r\n").unwrap();
        assert_eq!(frame.methane, 2.0);
    }

    #[test]
    fn test_unconsumed_fields_are_not_validated() {
        let frame = InstrumentFrame::parse("n/a|--|120|50|19.5|0.4").unwrap();
        assert_eq!(frame.light, 120.0);
    }

    #[test]
    fn test_too_few_fields() {
        let result = InstrumentFrame::parse("10|5|800|45.2|22.1");
        assert_eq!(result, Err(FrameError::FieldCount { expected: 6, found: 5 }));
    }

    #[test]
    fn test_too_many_fields() {
        let result = InstrumentFrame::parse("10|5|800|45.2|22.1|2.0|7|8");
        assert_eq!(result, Err(FrameError::FieldCount { expected: 6, found: 8 }));
    }

    #[test]
    fn test_non_numeric_consumed_fields() {
        for (line, index) in [
            ("10|5|800|wet|22.1|2.0", HUMIDITY_INDEX),
            ("10|5|800|45.2|warm|2.0", TEMPERATURE_INDEX),
            ("10|5|800|45.2|22.1|", METHANE_INDEX),
            ("10|5|800|45.2|22.1|NaN", METHANE_INDEX),
        ] {
            match InstrumentFrame::parse(line) {
                Err(FrameError::InvalidField { index: got, .. }) => assert_eq!(got, index, "{}", line),
                other => panic!("expected invalid field for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_fractional_light_rejected() {
        let result = InstrumentFrame::parse("10|5|800.5|45.2|22.1|2.0");
        assert!(matches!(
            result,
            Err(FrameError::InvalidField { index: LIGHT_INDEX, sensor: SensorKind::Light, .. })
        ));
    }
}
