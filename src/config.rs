//! Driver configuration.
//!
//! Everything here is fixed for the lifetime of a [`Ms430`](crate::Ms430)
//! instance. The operating mode is the exception: it is owned by the
//! [`mode`](crate::mode) controller and may be replaced between measurements.

use crate::data::ParticleSensor;
use crate::defs::*;

/// 7-bit I2C address of the board, selected by the solder bridge on the
/// underside of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
  /// Solder bridge left open (factory default).
  #[default]
  SolderBridgeOpen = 0x71,
  /// Solder bridge closed.
  SolderBridgeClosed = 0x70,
}

impl From<Address> for u8 {
  fn from(a: Address) -> Self {
    a as u8
  }
}

impl TryFrom<u8> for Address {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x71 => Ok(Address::SolderBridgeOpen),
      0x70 => Ok(Address::SolderBridgeClosed),
      _ => Err(()),
    }
  }
}

/// Driver configuration.
///
/// The timing defaults follow the board's documented behaviour; they only
/// need changing for unusually slow hosts or bench setups.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  /// Bus address of the board.
  pub address: Address,
  /// External particle sensor attached to the board, if any.
  pub particle_sensor: ParticleSensor,
  /// Upper bound on a single wait for the READY falling edge.
  pub ready_timeout_ms: u32,
  /// Interval between two samples of the READY line.
  pub poll_interval_ms: u32,
  /// Wait after READY before the data registers are considered final.
  pub stabilization_ms: u32,
  /// Wait after the reset command before READY is sampled.
  pub reset_settle_ms: u32,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      address: Address::default(),
      particle_sensor: ParticleSensor::Off,
      ready_timeout_ms: READY_TIMEOUT_MS,
      poll_interval_ms: READY_POLL_MS,
      stabilization_ms: STABILIZATION_MS,
      reset_settle_ms: RESET_SETTLE_MS,
    }
  }
}
