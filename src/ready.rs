//! READY line monitoring.
//!
//! The board drives READY high while it is busy and pulls it low when it
//! returns to standby or has finished a measurement. The driver watches for
//! the falling edge through the [`EdgeDetect`] seam: armed before the command
//! the board responds to, then polled at a fixed interval.
//!
//! Hosts whose GPIO layer latches edges (sysfs/cdev edge events, an EXTI
//! flag) should implement [`EdgeDetect`] directly. For a plain input pin,
//! [`LevelEdge`] samples the level on every poll instead; a busy period
//! shorter than the poll interval can then go unnoticed.

use embedded_hal::digital::{Error as _, ErrorType, InputPin};
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::{Error, Ms430};

/// Falling-edge detection on the READY line.
pub trait EdgeDetect: ErrorType {
  /// Enable falling-edge detection and discard any edge seen so far.
  fn arm_falling_edge(&mut self) -> Result<(), Self::Error>;

  /// Whether a falling edge occurred since arming or since the last call that
  /// returned `true`. Returning `true` clears the detected state.
  fn falling_edge_detected(&mut self) -> Result<bool, Self::Error>;
}

/// Software edge detection over a plain input pin.
#[derive(Debug)]
pub struct LevelEdge<P> {
  pin: P,
  was_high: bool,
}

impl<P: InputPin> LevelEdge<P> {
  pub fn new(pin: P) -> Self {
    Self { pin, was_high: false }
  }

  pub fn release(self) -> P {
    self.pin
  }
}

impl<P: InputPin> ErrorType for LevelEdge<P> {
  type Error = P::Error;
}

impl<P: InputPin> InputPin for LevelEdge<P> {
  fn is_high(&mut self) -> Result<bool, Self::Error> {
    self.pin.is_high()
  }

  fn is_low(&mut self) -> Result<bool, Self::Error> {
    self.pin.is_low()
  }
}

impl<P: InputPin> EdgeDetect for LevelEdge<P> {
  fn arm_falling_edge(&mut self) -> Result<(), Self::Error> {
    self.was_high = self.pin.is_high()?;
    Ok(())
  }

  fn falling_edge_detected(&mut self) -> Result<bool, Self::Error> {
    let high = self.pin.is_high()?;
    let fell = self.was_high && !high;
    self.was_high = high;
    Ok(fell)
  }
}

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  /// Wait for the board to finish power-on initialization.
  ///
  /// Call once after power-up, before any other command.
  pub async fn init(&mut self) -> Result<(), Error<E>> {
    self.wait_for_standby().await?;
    debug!("ms430: power-on initialization complete");
    Ok(())
  }

  /// Whether READY is currently asserted (low).
  pub fn is_ready(&mut self) -> Result<bool, Error<E>> {
    self.ready.is_low().map_err(|e| Error::Pin(e.kind()))
  }

  /// Enable falling-edge detection on READY, dropping any stale edge.
  pub fn arm_ready(&mut self) -> Result<(), Error<E>> {
    self.ready.arm_falling_edge().map_err(|e| Error::Pin(e.kind()))
  }

  /// Wait for a READY falling edge, polling every `poll_interval_ms`.
  ///
  /// [`arm_ready`](Self::arm_ready) must have been called before the command
  /// the board answers, or a fast edge can be missed. On success the edge is
  /// consumed, so the next wait starts clean.
  pub async fn await_ready(&mut self, timeout_ms: u32) -> Result<(), Error<E>> {
    let poll = self.config.poll_interval_ms.max(1);
    let mut waited = 0u32;
    loop {
      if self.ready.falling_edge_detected().map_err(|e| Error::Pin(e.kind()))? {
        trace!("ms430: ready after {} ms", waited);
        return Ok(());
      }
      if waited >= timeout_ms {
        warn!("ms430: no ready signal within {} ms", timeout_ms);
        return Err(Error::ReadyTimeout(self.mode.kind()));
      }
      self.delay.delay_ms(poll).await;
      waited = waited.saturating_add(poll);
    }
  }

  /// Block until READY is low, i.e. the board is idle in standby.
  ///
  /// Reset and power-on complete in bounded time, so there is no timeout.
  pub(crate) async fn wait_for_standby(&mut self) -> Result<(), Error<E>> {
    let poll = self.config.poll_interval_ms.max(1);
    while self.ready.is_high().map_err(|e| Error::Pin(e.kind()))? {
      self.delay.delay_ms(poll).await;
    }
    Ok(())
  }
}
