#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]
//!
//! ## Design Principles
//!
//! - **Async-first**: Built on `embedded-hal-async` I2C and delay traits
//! - **Pure decoding**: Every data category is decoded from raw bytes by a
//!   function that never touches the bus, see [`data`]
//! - **Single owner**: [`Ms430`] owns the bus, the delay provider and the
//!   READY line; there is at most one measurement in flight
//! - **Visible failure**: Timeouts and malformed blocks abort the measurement;
//!   nothing is retried behind the caller's back
//!
//! ## Module Organization
//!
//! - [`mode`]: Operating mode selection and trigger commands
//! - [`ready`]: READY line edge detection and waiting
//! - [`measure`]: The measurement sequence and its state machine
//! - [`cycle`]: Free-running cycle mode loop with cooperative cancellation
//! - [`data`]: Category decoders and air quality interpretation
//! - [`interrupt`]: Light and sound interrupt thresholds and settings
//! - [`snapshot`]: Aggregated readings and their flat key/value view
//!
//! ## Basic Usage
//!
//! ```no_run
//! # async fn example<I, D, R>(i2c: I, delay: D, ready: R) -> Result<(), ms430::Error<I::Error>>
//! # where I: embedded_hal_async::i2c::I2c, D: embedded_hal_async::delay::DelayNs,
//! #   R: embedded_hal::digital::InputPin + ms430::EdgeDetect {
//! use ms430::{Config, Ms430};
//!
//! let mut board = Ms430::new(i2c, delay, ready, Config::default());
//! board.init().await?;
//!
//! let snapshot = board.measure().await?;
//! let temperature = snapshot.air.temperature;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod fmt;

pub mod config;
pub mod cycle;
pub mod data;
mod defs;
pub mod interrupt;
pub mod measure;
pub mod mode;
pub mod ready;
pub(crate) mod rw;
pub mod snapshot;

#[cfg(test)]
mod mock;

pub use config::{Address, Config};
pub use cycle::CancelToken;
pub use data::{Category, LengthMismatch, ParticleSensor};
pub use defs::{Command, MAX_LUX_VALUE, SOUND_FREQ_BANDS};
pub use measure::State;
pub use mode::{CyclePeriod, ModeKind, OperatingMode};
pub use ready::{EdgeDetect, LevelEdge};
pub use snapshot::{Snapshot, Value};

use embedded_hal::digital::ErrorKind as PinErrorKind;

/// Driver error type.
///
/// This error type wraps the underlying I2C error and adds MS430-specific
/// error conditions.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I2C communication error
  I2c(E),
  /// READY line could not be read or armed
  Pin(PinErrorKind),
  /// Mode value outside standby (0), cycle (1) and on-demand (2), or a
  /// measurement requested while in standby
  InvalidMode(u8),
  /// Cycle period of zero seconds
  InvalidCyclePeriod(u16),
  /// Particle sensor selector outside off (0), PPD42 (1) and SDS011 (2)
  InvalidParticleSensor(u8),
  /// READY did not fall in time after the given trigger
  ReadyTimeout(ModeKind),
  /// A data block had the wrong size for its category
  LengthMismatch(LengthMismatch),
  /// A register held a value with no known meaning
  Data,
}

impl<E> From<LengthMismatch> for Error<E> {
  fn from(e: LengthMismatch) -> Self {
    Error::LengthMismatch(e)
  }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Error::I2c(e) => write!(f, "i2c error: {e:?}"),
      Error::Pin(e) => write!(f, "ready pin error: {e:?}"),
      Error::InvalidMode(v) => write!(f, "invalid operating mode {v}"),
      Error::InvalidCyclePeriod(s) => write!(f, "invalid cycle period {s} s"),
      Error::InvalidParticleSensor(v) => write!(f, "invalid particle sensor {v}"),
      Error::ReadyTimeout(m) => write!(f, "timed out waiting for ready after {} trigger", m.name()),
      Error::LengthMismatch(e) => write!(f, "{e}"),
      Error::Data => f.write_str("unexpected register value"),
    }
  }
}

/// MS430 device driver instance.
///
/// This is the main entry point for interacting with the board. It owns the
/// I2C bus, the delay provider and the READY line, and tracks the selected
/// operating mode and the state of the current measurement.
///
/// # Type Parameters
///
/// - `I`: I2C implementation (must implement `embedded_hal_async::i2c::I2c`)
/// - `D`: Delay provider (must implement `embedded_hal_async::delay::DelayNs`)
/// - `R`: READY input (must implement `embedded_hal::digital::InputPin` and
///   [`EdgeDetect`]; wrap a plain pin in [`LevelEdge`])
pub struct Ms430<I, D, R> {
  i2c: I,
  delay: D,
  ready: R,
  config: Config,
  mode: OperatingMode,
  state: State,
  latest: Option<Snapshot>,
}

impl<I, D, R> Ms430<I, D, R> {
  /// Create a new driver instance. No bus traffic happens until
  /// [`init`](Self::init) or a measurement is requested.
  ///
  /// # Arguments
  ///
  /// - `i2c`: I2C bus implementation
  /// - `delay`: Delay provider for timing operations
  /// - `ready`: READY line of the board
  /// - `config`: Address, particle sensor and timing settings
  pub fn new(i2c: I, delay: D, ready: R, config: Config) -> Self {
    Self { i2c, delay, ready, config, mode: OperatingMode::default(), state: State::Idle, latest: None }
  }

  /// Give back the bus, delay provider and READY line.
  pub fn release(self) -> (I, D, R) {
    (self.i2c, self.delay, self.ready)
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Where the measurement sequence currently stands.
  pub fn state(&self) -> State {
    self.state
  }

  /// The most recent complete snapshot, if any measurement has succeeded.
  pub fn latest(&self) -> Option<&Snapshot> {
    self.latest.as_ref()
  }
}
