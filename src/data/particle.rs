use super::{block, hundredths, Category, LengthMismatch};
use crate::defs::*;
use crate::Error;

/// External particle sensor module attached to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParticleSensor {
  /// No particle sensor connected.
  #[default]
  Off = 0,
  /// Shinyei PPD42.
  Ppd42 = 1,
  /// Nova SDS011.
  Sds011 = 2,
}

impl ParticleSensor {
  /// Concentration unit reported by this sensor type.
  pub const fn unit(self) -> Option<&'static str> {
    match self {
      ParticleSensor::Off => None,
      // particles per litre
      ParticleSensor::Ppd42 => Some("ppL"),
      ParticleSensor::Sds011 => Some("\u{00B5}g/m\u{00B3}"),
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      ParticleSensor::Off => "off",
      ParticleSensor::Ppd42 => "PPD42",
      ParticleSensor::Sds011 => "SDS011",
    }
  }

  /// Validate a raw sensor selector.
  pub fn from_raw<E>(value: u8) -> Result<Self, Error<E>> {
    Self::try_from(value).map_err(|_| Error::InvalidParticleSensor(value))
  }
}

impl From<ParticleSensor> for u8 {
  fn from(value: ParticleSensor) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for ParticleSensor {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(ParticleSensor::Off),
      1 => Ok(ParticleSensor::Ppd42),
      2 => Ok(ParticleSensor::Sds011),
      _ => Err(()),
    }
  }
}

/// Particulate data.
///
/// With no particle sensor configured every quantity is `None` and the
/// reading is not valid; this is distinct from a sensor reporting zero.
///
/// Block layout (6 bytes): duty cycle (u8 + hundredths), concentration
/// (u16 LE + hundredths), valid flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParticulateReading {
  /// Sensor duty cycle in %, two decimal places.
  pub duty_cycle: Option<f32>,
  /// Particle concentration, two decimal places, in [`Self::unit`].
  pub concentration: Option<f32>,
  /// False while the external sensor is still initializing, or absent.
  pub valid: bool,
  /// Concentration unit, derived from the configured sensor type.
  pub unit: Option<&'static str>,
}

impl ParticulateReading {
  /// Reading used when no particle sensor is configured.
  pub const fn absent() -> Self {
    ParticulateReading { duty_cycle: None, concentration: None, valid: false, unit: None }
  }

  /// Decode a particulate block for the given sensor type.
  ///
  /// For [`ParticleSensor::Off`] the bytes are ignored entirely.
  pub fn decode(bytes: &[u8], sensor: ParticleSensor) -> Result<Self, LengthMismatch> {
    if sensor == ParticleSensor::Off {
      return Ok(Self::absent());
    }

    let b = block::<PARTICLE_DATA_BYTES>(Category::Particulate, bytes)?;
    Ok(ParticulateReading {
      duty_cycle: Some(hundredths(b[0] as u16, b[1])),
      concentration: Some(hundredths(u16::from_le_bytes([b[2], b[3]]), b[4])),
      valid: b[5] > 0,
      unit: sensor.unit(),
    })
  }
}
