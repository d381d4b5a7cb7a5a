use super::{block, hundredths, Category, LengthMismatch};
use crate::defs::*;

/// Light data.
///
/// Block layout (5 bytes): illuminance (u16 LE + hundredths), white light
/// level (u16 LE).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LightReading {
  /// Illuminance in lux, two decimal places, at most [`MAX_LUX_VALUE`].
  pub illuminance: f32,
  /// White light level, raw sensor count.
  pub white: u16,
}

impl LightReading {
  pub fn decode(bytes: &[u8]) -> Result<Self, LengthMismatch> {
    let b = block::<LIGHT_DATA_BYTES>(Category::Light, bytes)?;
    let lux = hundredths(u16::from_le_bytes([b[0], b[1]]), b[2]);
    Ok(LightReading { illuminance: lux.min(MAX_LUX_VALUE as f32), white: u16::from_le_bytes([b[3], b[4]]) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_illuminance_and_white() {
    let l = LightReading::decode(&[0xF4, 0x01, 50, 0x39, 0x30]).unwrap();
    assert_eq!(l.illuminance, 500.5);
    assert_eq!(l.white, 0x3039);
  }

  #[test]
  fn illuminance_is_capped() {
    let l = LightReading::decode(&[0xFF, 0xFF, 99, 0, 0]).unwrap();
    assert_eq!(l.illuminance, MAX_LUX_VALUE as f32);
  }

  #[test]
  fn wrong_length_names_light() {
    let err = LightReading::decode(&[0; 6]).unwrap_err();
    assert_eq!(err.category, Category::Light);
    assert_eq!((err.expected, err.actual), (5, 6));
  }
}
