use super::{block, hundredths, tenths, Category, LengthMismatch};
use crate::defs::*;

/// Air quality data. Only meaningful in cycle mode, once the board's
/// self-calibration has progressed (see [`AirQualityReading::accuracy`]).
///
/// Block layout (10 bytes): AQI (u16 LE + tenths), CO2e (u16 LE + tenths),
/// bVOC (u16 LE + hundredths), accuracy code.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AirQualityReading {
  /// Air quality index, one decimal place.
  pub aqi: f32,
  /// Estimated CO2-equivalent concentration in ppm, one decimal place.
  pub co2e: f32,
  /// Equivalent breath VOC concentration in ppm, two decimal places.
  pub bvoc: f32,
  /// Accuracy code, 0..=3.
  pub accuracy: u8,
}

impl AirQualityReading {
  pub fn decode(bytes: &[u8]) -> Result<Self, LengthMismatch> {
    let b = block::<AIR_QUALITY_DATA_BYTES>(Category::AirQuality, bytes)?;
    Ok(AirQualityReading {
      aqi: tenths(u16::from_le_bytes([b[0], b[1]]), b[2]),
      co2e: tenths(u16::from_le_bytes([b[3], b[4]]), b[5]),
      bvoc: hundredths(u16::from_le_bytes([b[6], b[7]]), b[8]),
      accuracy: b[9],
    })
  }

  pub fn band(&self) -> AqiBand {
    AqiBand::from_aqi(self.aqi)
  }

  pub fn accuracy_label(&self) -> &'static str {
    accuracy_label(self.accuracy)
  }
}

/// Interpretation band of an air quality index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AqiBand {
  Good,
  Acceptable,
  Substandard,
  Poor,
  Bad,
  VeryBad,
}

impl AqiBand {
  /// Each band's lower bound is inclusive: 50.0 is already `Acceptable`.
  pub fn from_aqi(aqi: f32) -> Self {
    if aqi < 50.0 {
      AqiBand::Good
    } else if aqi < 100.0 {
      AqiBand::Acceptable
    } else if aqi < 150.0 {
      AqiBand::Substandard
    } else if aqi < 200.0 {
      AqiBand::Poor
    } else if aqi < 300.0 {
      AqiBand::Bad
    } else {
      AqiBand::VeryBad
    }
  }

  pub const fn label(self) -> &'static str {
    match self {
      AqiBand::Good => "Good",
      AqiBand::Acceptable => "Acceptable",
      AqiBand::Substandard => "Substandard",
      AqiBand::Poor => "Poor",
      AqiBand::Bad => "Bad",
      AqiBand::VeryBad => "Very bad",
    }
  }
}

/// Readable interpretation of an AQI value.
pub fn interpret_aqi(aqi: f32) -> &'static str {
  AqiBand::from_aqi(aqi).label()
}

/// Readable interpretation of an accuracy code. Unknown codes read as not yet
/// valid.
pub const fn accuracy_label(code: u8) -> &'static str {
  match code {
    1 => "Low accuracy, self-calibration ongoing",
    2 => "Medium accuracy, self-calibration ongoing",
    3 => "High accuracy",
    _ => "Not yet valid, self-calibration incomplete",
  }
}
