//! Category decoders.
//!
//! The board exposes its measurements as five fixed-size blocks, one per data
//! category. Each block is decoded by a pure function that takes the raw bytes
//! and returns a typed reading, so decoding can be exercised without hardware.
//!
//! Most quantities share one of two encodings:
//! - integer + fraction: a little-endian unsigned integer followed by one byte
//!   holding tenths or hundredths;
//! - sign-magnitude: used only for temperature, where the top bit of the
//!   integer byte is the sign.
//!
//! # Examples
//!
//! ```
//! use ms430::data::{AirReading, Category};
//!
//! let raw = [0x16, 0x05, 0xA0, 0x86, 0x01, 0x00, 45, 3, 0x10, 0x27, 0x00, 0x00];
//! let air = AirReading::decode(&raw).unwrap();
//! assert_eq!(air.temperature, 22.5);
//! assert_eq!(air.pressure, 100_000);
//!
//! let err = AirReading::decode(&raw[..11]).unwrap_err();
//! assert_eq!(err.category, Category::Air);
//! ```

mod air;
mod air_quality;
mod light;
mod particle;
mod sound;

pub use air::*;
pub use air_quality::*;
pub use light::*;
pub use particle::*;
pub use sound::*;

use crate::defs::*;

/// Data category, each read as one block from its own register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Category {
  Air,
  AirQuality,
  Light,
  Sound,
  Particulate,
}

impl Category {
  /// Every category, in the order a measurement reads them.
  pub const ALL: [Category; 5] =
    [Category::Air, Category::AirQuality, Category::Light, Category::Sound, Category::Particulate];

  /// Size of the category's block in bytes.
  pub const fn len(self) -> usize {
    match self {
      Category::Air => AIR_DATA_BYTES,
      Category::AirQuality => AIR_QUALITY_DATA_BYTES,
      Category::Light => LIGHT_DATA_BYTES,
      Category::Sound => SOUND_DATA_BYTES,
      Category::Particulate => PARTICLE_DATA_BYTES,
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      Category::Air => "air",
      Category::AirQuality => "air quality",
      Category::Light => "light",
      Category::Sound => "sound",
      Category::Particulate => "particulate",
    }
  }

  pub(crate) const fn reg(self) -> Reg {
    match self {
      Category::Air => Reg::AirData,
      Category::AirQuality => Reg::AirQualityData,
      Category::Light => Reg::LightData,
      Category::Sound => Reg::SoundData,
      Category::Particulate => Reg::ParticleData,
    }
  }
}

/// A block did not have the byte count its category requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LengthMismatch {
  pub category: Category,
  pub expected: usize,
  pub actual: usize,
}

impl core::fmt::Display for LengthMismatch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{} data: expected {} bytes, got {}", self.category.name(), self.expected, self.actual)
  }
}

/// Borrow `bytes` as the fixed-size block of `category`.
pub(crate) fn block<const N: usize>(category: Category, bytes: &[u8]) -> Result<&[u8; N], LengthMismatch> {
  debug_assert_eq!(N, category.len());
  bytes.try_into().map_err(|_| LengthMismatch { category, expected: N, actual: bytes.len() })
}

/// `int + frac / 10`
#[inline]
pub(crate) fn tenths(int: u16, frac: u8) -> f32 {
  int as f32 + frac as f32 / 10.0
}

/// `int + frac / 100`
#[inline]
pub(crate) fn hundredths(int: u16, frac: u8) -> f32 {
  int as f32 + frac as f32 / 100.0
}
