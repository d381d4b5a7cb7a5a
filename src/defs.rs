#![allow(dead_code)]

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Reg {
  ParticleSensorSelect = 0x07,
  AirData = 0x10,
  AirQualityData = 0x11,
  LightData = 0x12,
  SoundData = 0x13,
  ParticleData = 0x14,
  LightIntEnable = 0x81,
  LightIntThreshold = 0x82,
  LightIntType = 0x83,
  LightIntPolarity = 0x84,
  SoundIntEnable = 0x85,
  SoundIntThreshold = 0x86,
  SoundIntType = 0x87,
  CyclePeriod = 0x89,
  OpMode = 0x8A,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// Executable commands. These are sent as a single byte with no payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
  OnDemandMeasure = 0xE1,
  Reset = 0xE2,
  CycleMode = 0xE4,
  StandbyMode = 0xE5,
  LightIntClear = 0xE6,
  SoundIntClear = 0xE7,
}

impl From<Command> for u8 {
  #[inline]
  fn from(c: Command) -> Self {
    c as u8
  }
}

// Timing, in milliseconds
pub(crate) const READY_TIMEOUT_MS: u32 = 5000;
pub(crate) const READY_POLL_MS: u32 = 50;
pub(crate) const RESET_SETTLE_MS: u32 = 5;
pub(crate) const STABILIZATION_MS: u32 = 1500;
// Gap required between two commands when the second depends on the first.
pub(crate) const COMMAND_GAP_MS: u32 = 6;

// Category block sizes
pub(crate) const AIR_DATA_BYTES: usize = 12;
pub(crate) const AIR_QUALITY_DATA_BYTES: usize = 10;
pub(crate) const LIGHT_DATA_BYTES: usize = 5;
pub(crate) const SOUND_DATA_BYTES: usize = 18;
pub(crate) const PARTICLE_DATA_BYTES: usize = 6;

pub(crate) const TEMPERATURE_VALUE_MASK: u8 = 0x7F;
pub(crate) const TEMPERATURE_SIGN_MASK: u8 = 0x80;

/// Largest illuminance the board can report or compare against, in lux.
pub const MAX_LUX_VALUE: u16 = 3774;

/// Number of sound frequency bands.
pub const SOUND_FREQ_BANDS: usize = 6;
