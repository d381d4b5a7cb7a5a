//! Operating mode selection.
//!
//! The board runs in one of three modes:
//! - standby: idle, waiting for commands;
//! - on-demand: one measurement per trigger, then back to standby;
//! - cycle: free-running measurements at a fixed period.
//!
//! The driver keeps the desired mode and turns it into the trigger command
//! used by [`Ms430::measure`](crate::Ms430::measure). Selecting a mode does
//! not talk to the hardware.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example<I, D, R>(mut ms430: ms430::Ms430<I, D, R>)
//! # where I: embedded_hal_async::i2c::I2c, D: embedded_hal_async::delay::DelayNs,
//! #   R: embedded_hal::digital::InputPin + ms430::EdgeDetect {
//! use ms430::mode::{CyclePeriod, OperatingMode};
//!
//! // Raw mode value 1 is cycle mode; the period defaults to 5 s, which the
//! // board runs as its 3 s cycle.
//! let mode = ms430.set_mode(1, None).unwrap();
//! assert_eq!(mode, OperatingMode::Cycle(CyclePeriod::Seconds3));
//! # }
//! ```

use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::{defs::*, EdgeDetect, Error, Ms430};

/// Cycle period used when none is given.
pub const DEFAULT_CYCLE_SECONDS: u16 = 5;

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  /// Currently selected operating mode.
  pub fn mode(&self) -> OperatingMode {
    self.mode
  }

  /// Select the operating mode from its raw value (see [`ModeKind`]).
  ///
  /// `cycle_seconds` only matters for cycle mode and defaults to
  /// [`DEFAULT_CYCLE_SECONDS`]. On error the previous mode is kept.
  pub fn set_mode(&mut self, value: u8, cycle_seconds: Option<u16>) -> Result<OperatingMode, Error<E>> {
    let mode = OperatingMode::from_raw(value, cycle_seconds)?;
    debug!("ms430: mode {} (trigger {:#x})", mode.kind().name(), mode.trigger_byte());
    self.mode = mode;
    Ok(mode)
  }

  /// Select an already validated operating mode.
  pub fn set_operating_mode(&mut self, mode: OperatingMode) {
    self.mode = mode;
  }

  /// Read the mode the board reports it is in. The board itself only knows
  /// standby and cycle; an on-demand measurement runs from standby.
  pub async fn read_device_mode(&mut self) -> Result<ModeKind, Error<E>> {
    match self.read_u8(Reg::OpMode).await? {
      0 => Ok(ModeKind::Standby),
      1 => Ok(ModeKind::Cycle),
      v => Err(Error::InvalidMode(v)),
    }
  }

  /// Program the cycle period register. Only accepted in standby.
  pub(crate) async fn set_cycle_period(&mut self, period: CyclePeriod) -> Result<(), Error<E>> {
    self.write_u8(Reg::CyclePeriod, period.into()).await?;
    // The cycle command that follows depends on this setting.
    self.delay.delay_ms(COMMAND_GAP_MS).await;
    Ok(())
  }
}

/// Raw operating mode values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ModeKind {
  Standby = 0,
  Cycle = 1,
  OnDemand = 2,
}

impl ModeKind {
  pub const fn name(self) -> &'static str {
    match self {
      ModeKind::Standby => "standby",
      ModeKind::Cycle => "cycle",
      ModeKind::OnDemand => "on_demand",
    }
  }
}

impl From<ModeKind> for u8 {
  fn from(value: ModeKind) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for ModeKind {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(ModeKind::Standby),
      1 => Ok(ModeKind::Cycle),
      2 => Ok(ModeKind::OnDemand),
      _ => Err(()),
    }
  }
}

/// Measurement periods supported by the board in cycle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CyclePeriod {
  Seconds3 = 0,
  Seconds100 = 1,
  Seconds300 = 2,
}

impl CyclePeriod {
  /// The supported period closest to `seconds`, ties going to the shorter
  /// one. `None` for zero.
  pub const fn from_seconds(seconds: u16) -> Option<Self> {
    match seconds {
      0 => None,
      1..=51 => Some(CyclePeriod::Seconds3),
      52..=200 => Some(CyclePeriod::Seconds100),
      _ => Some(CyclePeriod::Seconds300),
    }
  }

  pub const fn seconds(self) -> u16 {
    match self {
      CyclePeriod::Seconds3 => 3,
      CyclePeriod::Seconds100 => 100,
      CyclePeriod::Seconds300 => 300,
    }
  }

  pub(crate) const fn millis(self) -> u32 {
    self.seconds() as u32 * 1000
  }
}

impl From<CyclePeriod> for u8 {
  fn from(value: CyclePeriod) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for CyclePeriod {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(CyclePeriod::Seconds3),
      1 => Ok(CyclePeriod::Seconds100),
      2 => Ok(CyclePeriod::Seconds300),
      _ => Err(()),
    }
  }
}

/// Operating mode, with the cycle period when in cycle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OperatingMode {
  Standby,
  #[default]
  OnDemand,
  Cycle(CyclePeriod),
}

impl OperatingMode {
  /// Validate a raw mode value. `cycle_seconds` is ignored outside cycle mode.
  pub fn from_raw<E>(value: u8, cycle_seconds: Option<u16>) -> Result<Self, Error<E>> {
    match ModeKind::try_from(value).map_err(|_| Error::InvalidMode(value))? {
      ModeKind::Standby => Ok(OperatingMode::Standby),
      ModeKind::OnDemand => Ok(OperatingMode::OnDemand),
      ModeKind::Cycle => {
        let seconds = cycle_seconds.unwrap_or(DEFAULT_CYCLE_SECONDS);
        let period = CyclePeriod::from_seconds(seconds).ok_or(Error::InvalidCyclePeriod(seconds))?;
        Ok(OperatingMode::Cycle(period))
      }
    }
  }

  pub const fn kind(self) -> ModeKind {
    match self {
      OperatingMode::Standby => ModeKind::Standby,
      OperatingMode::OnDemand => ModeKind::OnDemand,
      OperatingMode::Cycle(_) => ModeKind::Cycle,
    }
  }

  pub const fn trigger(self) -> Command {
    match self {
      OperatingMode::Standby => Command::StandbyMode,
      OperatingMode::OnDemand => Command::OnDemandMeasure,
      OperatingMode::Cycle(_) => Command::CycleMode,
    }
  }

  pub const fn trigger_byte(self) -> u8 {
    self.trigger() as u8
  }

  pub const fn cycle_period(self) -> Option<CyclePeriod> {
    match self {
      OperatingMode::Cycle(p) => Some(p),
      _ => None,
    }
  }
}
