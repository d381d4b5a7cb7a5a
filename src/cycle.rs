//! Cycle mode loop.
//!
//! In cycle mode the board measures on its own at the configured period and
//! signals READY after each measurement. [`Ms430::run_cycle`] triggers cycle
//! mode once, then keeps waiting for READY and decoding, handing every
//! snapshot to the caller until cancelled or until something fails. Either
//! way the board is put back into standby before returning.
//!
//! Cancellation is cooperative: the [`CancelToken`] is checked before each
//! measurement, never in the middle of one.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example<I, D, R>(mut ms430: ms430::Ms430<I, D, R>) -> Result<(), ms430::Error<I::Error>>
//! # where I: embedded_hal_async::i2c::I2c, D: embedded_hal_async::delay::DelayNs,
//! #   R: embedded_hal::digital::InputPin + ms430::EdgeDetect {
//! use ms430::CancelToken;
//!
//! static STOP: CancelToken = CancelToken::new();
//!
//! ms430.set_mode(1, Some(3))?;
//! let taken = ms430
//!   .run_cycle(&STOP, |snapshot| {
//!     if snapshot.air_quality.accuracy == 3 {
//!       STOP.cancel();
//!     }
//!   })
//!   .await?;
//! # Ok(())
//! # }
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::{defs::*, EdgeDetect, Error, Ms430, OperatingMode, Snapshot};

/// Stop request for [`Ms430::run_cycle`].
///
/// One writer (whoever wants the loop to stop: another task, a thread, a
/// signal handler) and one reader (the loop). Once cancelled it stays
/// cancelled until [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct CancelToken {
  cancelled: AtomicBool,
}

impl CancelToken {
  pub const fn new() -> Self {
    Self { cancelled: AtomicBool::new(false) }
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }

  /// Re-arm the token for another run.
  pub fn reset(&self) {
    self.cancelled.store(false, Ordering::Release);
  }
}

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  /// Follow the board in cycle mode until `token` is cancelled.
  ///
  /// The first snapshot comes from a full [`measure`](Self::measure); later
  /// ones only wait for READY, so the board is never re-triggered. Returns
  /// the number of snapshots delivered to `on_snapshot`.
  ///
  /// A timeout or read failure ends the loop with that error; the board is
  /// still returned to standby first.
  pub async fn run_cycle<F>(&mut self, token: &CancelToken, mut on_snapshot: F) -> Result<usize, Error<E>>
  where
    F: FnMut(&Snapshot),
  {
    let period = match self.mode {
      OperatingMode::Cycle(period) => period,
      other => return Err(Error::InvalidMode(other.kind().into())),
    };
    // The board only pulses READY once per period.
    let timeout = period.millis().saturating_add(self.config.ready_timeout_ms);

    let mut taken = 0usize;
    loop {
      if token.is_cancelled() {
        debug!("ms430: cycle cancelled after {} snapshots", taken);
        self.standby().await?;
        return Ok(taken);
      }

      let result = if taken == 0 { self.measure().await } else { self.next_cycle(timeout).await };
      match result {
        Ok(snapshot) => {
          on_snapshot(&snapshot);
          taken += 1;
        }
        Err(e) => {
          if self.standby().await.is_err() {
            warn!("ms430: could not return to standby after cycle failure");
          }
          return Err(e);
        }
      }
    }
  }

  /// Send the standby trigger, leaving cycle mode.
  pub async fn standby(&mut self) -> Result<(), Error<E>> {
    self.command(Command::StandbyMode).await
  }

  async fn next_cycle(&mut self, timeout_ms: u32) -> Result<Snapshot, Error<E>> {
    self.enter(crate::State::Triggered);
    let result = match self.await_ready(timeout_ms).await {
      Ok(()) => self.collect().await,
      Err(e) => Err(e),
    };
    self.finish(result)
  }
}
