//! Test doubles shared by the unit tests.

use std::collections::VecDeque;

use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;

pub(crate) use embassy_futures::block_on;
pub(crate) use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

use crate::{Config, EdgeDetect, Ms430};

pub(crate) const ADDR: u8 = 0x71;

/// 22.5 °C, 100000 Pa, 45.3 %RH, 10000 Ω
pub(crate) const AIR: [u8; 12] = [0x16, 0x05, 0xA0, 0x86, 0x01, 0x00, 45, 3, 0x10, 0x27, 0x00, 0x00];
/// AQI 25.0, 410.0 ppm, 0.50 ppm, accuracy 1
pub(crate) const AIR_QUALITY: [u8; 10] = [25, 0, 0, 0x9A, 0x01, 0, 0, 0, 50, 1];
/// 500.50 lux, white 1000
pub(crate) const LIGHT: [u8; 5] = [0xF4, 0x01, 50, 0xE8, 0x03];
/// 45.5 dBA, quiet bands, peak 12.34 mPa, stable
pub(crate) const SOUND: [u8; 18] = [45, 5, 30, 31, 32, 33, 34, 35, 0, 0, 0, 0, 0, 0, 12, 0, 34, 1];
/// 12.50 %, 1000.25, valid
pub(crate) const PARTICLE: [u8; 6] = [12, 50, 0xE8, 0x03, 25, 1];

pub(crate) fn read(reg: u8, data: &[u8]) -> Transaction {
  Transaction::write_read(ADDR, vec![reg], data.to_vec())
}

pub(crate) fn write(bytes: &[u8]) -> Transaction {
  Transaction::write(ADDR, bytes.to_vec())
}

pub(crate) fn cmd(c: u8) -> Transaction {
  Transaction::write(ADDR, vec![c])
}

/// Scripted READY line.
///
/// `levels` feeds `is_high` and reads low once exhausted. `edges` feeds
/// `falling_edge_detected` and falls back to a fixed answer once exhausted.
#[derive(Debug, Default)]
pub(crate) struct FakeReady {
  pub levels: VecDeque<bool>,
  pub edges: VecDeque<bool>,
  pub armed: usize,
  pub edge_polls: usize,
  fallback_edge: bool,
}

impl FakeReady {
  /// Every poll sees an edge.
  pub fn always() -> Self {
    Self { fallback_edge: true, ..Default::default() }
  }

  /// No edge ever.
  pub fn never() -> Self {
    Self::default()
  }

  pub fn edges(script: &[bool]) -> Self {
    Self { edges: script.iter().copied().collect(), ..Default::default() }
  }
}

impl ErrorType for FakeReady {
  type Error = Infallible;
}

impl InputPin for FakeReady {
  fn is_high(&mut self) -> Result<bool, Infallible> {
    Ok(self.levels.pop_front().unwrap_or(false))
  }

  fn is_low(&mut self) -> Result<bool, Infallible> {
    self.is_high().map(|h| !h)
  }
}

impl EdgeDetect for FakeReady {
  fn arm_falling_edge(&mut self) -> Result<(), Infallible> {
    self.armed += 1;
    Ok(())
  }

  fn falling_edge_detected(&mut self) -> Result<bool, Infallible> {
    self.edge_polls += 1;
    Ok(self.edges.pop_front().unwrap_or(self.fallback_edge))
  }
}

/// Delay that returns immediately and records how long it was asked to wait.
#[derive(Debug, Default)]
pub(crate) struct SleepLog {
  total_ns: u64,
}

impl SleepLog {
  pub fn total_ms(&self) -> u64 {
    self.total_ns / 1_000_000
  }
}

impl DelayNs for SleepLog {
  async fn delay_ns(&mut self, ns: u32) {
    self.total_ns += ns as u64;
  }

  async fn delay_us(&mut self, us: u32) {
    self.total_ns += us as u64 * 1_000;
  }

  async fn delay_ms(&mut self, ms: u32) {
    self.total_ns += ms as u64 * 1_000_000;
  }
}

pub(crate) fn driver(tx: &[Transaction], config: Config) -> Ms430<I2cMock, SleepLog, FakeReady> {
  driver_with(tx, config, FakeReady::always())
}

pub(crate) fn driver_with(tx: &[Transaction], config: Config, ready: FakeReady) -> Ms430<I2cMock, SleepLog, FakeReady> {
  Ms430::new(I2cMock::new(tx), SleepLog::default(), ready, config)
}

/// Release the driver and check every expected transaction happened.
pub(crate) fn finish(ms430: Ms430<I2cMock, SleepLog, FakeReady>) -> (SleepLog, FakeReady) {
  let (mut i2c, sleep, ready) = ms430.release();
  i2c.done();
  (sleep, ready)
}

