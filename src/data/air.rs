use super::{block, tenths, Category, LengthMismatch};
use crate::defs::*;

/// Air data: temperature, pressure, humidity and gas sensor resistance.
///
/// Block layout (12 bytes):
///
/// | bytes | quantity                                    |
/// |-------|---------------------------------------------|
/// | 0     | temperature integer (bit 7 = sign)          |
/// | 1     | temperature tenths                          |
/// | 2..6  | pressure, Pa (u32 LE)                       |
/// | 6     | humidity integer, %                         |
/// | 7     | humidity tenths                             |
/// | 8..12 | gas sensor resistance, Ω (u32 LE)           |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AirReading {
  /// Temperature in °C, one decimal place.
  pub temperature: f32,
  /// Air pressure in Pa.
  pub pressure: u32,
  /// Relative humidity in %, one decimal place.
  pub humidity: f32,
  /// Gas sensor resistance in Ω.
  pub gas_resistance: u32,
}

impl AirReading {
  pub fn decode(bytes: &[u8]) -> Result<Self, LengthMismatch> {
    let b = block::<AIR_DATA_BYTES>(Category::Air, bytes)?;

    // Sign-magnitude: the sign applies to the combined integer.fraction value.
    let magnitude = tenths((b[0] & TEMPERATURE_VALUE_MASK) as u16, b[1]);
    let temperature = if b[0] & TEMPERATURE_SIGN_MASK != 0 { -magnitude } else { magnitude };

    Ok(AirReading {
      temperature,
      pressure: u32::from_le_bytes([b[2], b[3], b[4], b[5]]),
      humidity: tenths(b[6] as u16, b[7]),
      gas_resistance: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
    })
  }

  /// Temperature in °F.
  pub fn temperature_f(&self) -> f32 {
    self.temperature * 1.8 + 32.0
  }
}
