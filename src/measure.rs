//! Measurement sequence.
//!
//! A measurement always runs the same steps:
//!
//! 1. reset the board and wait for it to settle back into standby;
//! 2. re-apply settings cleared by the reset (particle sensor, cycle period);
//! 3. arm READY edge detection and send the trigger for the selected mode;
//! 4. wait for READY, bounded by [`Config::ready_timeout_ms`](crate::Config);
//! 5. wait out the stabilization delay;
//! 6. read and decode air, air quality, light, sound and particulate data, in
//!    that order.
//!
//! Any failure aborts the sequence; the caller only ever sees a complete
//! [`Snapshot`] or an error.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example<I, D, R>(mut ms430: ms430::Ms430<I, D, R>) -> Result<(), ms430::Error<I::Error>>
//! # where I: embedded_hal_async::i2c::I2c, D: embedded_hal_async::delay::DelayNs,
//! #   R: embedded_hal::digital::InputPin + ms430::EdgeDetect {
//! let snapshot = ms430.measure().await?;
//! println!("{} °C, {}", snapshot.air.temperature, snapshot.air_quality.band().label());
//! # Ok(())
//! # }
//! ```

use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::data::*;
use crate::defs::*;
use crate::{EdgeDetect, Error, Ms430, OperatingMode, Snapshot};

/// Progress of the measurement sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
  /// No measurement has run yet.
  Idle,
  /// Reset sent, waiting for the board to return to standby.
  Resetting,
  /// Trigger sent, waiting for READY.
  Triggered,
  /// READY seen, reading data blocks.
  Reading,
  /// The last measurement completed.
  Done,
  /// The last measurement was aborted.
  Failed,
}

impl State {
  pub const fn name(self) -> &'static str {
    match self {
      State::Idle => "idle",
      State::Resetting => "resetting",
      State::Triggered => "triggered",
      State::Reading => "reading",
      State::Done => "done",
      State::Failed => "failed",
    }
  }
}

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  /// Run a full measurement in the selected mode and return its snapshot.
  ///
  /// Fails with [`Error::InvalidMode`] without touching the bus when the
  /// selected mode is standby. In cycle mode the board keeps measuring after
  /// this returns; see [`run_cycle`](Self::run_cycle) to follow it.
  pub async fn measure(&mut self) -> Result<Snapshot, Error<E>> {
    if self.mode == OperatingMode::Standby {
      return Err(Error::InvalidMode(self.mode.kind().into()));
    }

    let result = self.run_sequence().await;
    self.finish(result)
  }

  /// Alias of [`measure`](Self::measure).
  pub async fn refresh(&mut self) -> Result<Snapshot, Error<E>> {
    self.measure().await
  }

  /// Reset the board and wait until it is back in standby.
  ///
  /// The reset restores every board setting to its default.
  pub async fn reset(&mut self) -> Result<(), Error<E>> {
    self.command(Command::Reset).await?;
    self.delay.delay_ms(self.config.reset_settle_ms).await;
    self.wait_for_standby().await
  }

  pub async fn read_air(&mut self) -> Result<AirReading, Error<E>> {
    let mut b = [0u8; AIR_DATA_BYTES];
    self.read_bytes(Category::Air.reg(), &mut b).await?;
    Ok(AirReading::decode(&b)?)
  }

  /// Air quality data is only computed in cycle mode.
  pub async fn read_air_quality(&mut self) -> Result<AirQualityReading, Error<E>> {
    let mut b = [0u8; AIR_QUALITY_DATA_BYTES];
    self.read_bytes(Category::AirQuality.reg(), &mut b).await?;
    Ok(AirQualityReading::decode(&b)?)
  }

  pub async fn read_light(&mut self) -> Result<LightReading, Error<E>> {
    let mut b = [0u8; LIGHT_DATA_BYTES];
    self.read_bytes(Category::Light.reg(), &mut b).await?;
    Ok(LightReading::decode(&b)?)
  }

  pub async fn read_sound(&mut self) -> Result<SoundReading, Error<E>> {
    let mut b = [0u8; SOUND_DATA_BYTES];
    self.read_bytes(Category::Sound.reg(), &mut b).await?;
    Ok(SoundReading::decode(&b)?)
  }

  /// Without a configured particle sensor nothing is read and the reading is
  /// [`ParticulateReading::absent`].
  pub async fn read_particulate(&mut self) -> Result<ParticulateReading, Error<E>> {
    let sensor = self.config.particle_sensor;
    if sensor == ParticleSensor::Off {
      return Ok(ParticulateReading::absent());
    }
    let mut b = [0u8; PARTICLE_DATA_BYTES];
    self.read_bytes(Category::Particulate.reg(), &mut b).await?;
    Ok(ParticulateReading::decode(&b, sensor)?)
  }

  /// Particle sensor selection the board currently holds.
  pub async fn read_particle_sensor(&mut self) -> Result<ParticleSensor, Error<E>> {
    let raw = self.read_u8(Reg::ParticleSensorSelect).await?;
    ParticleSensor::from_raw(raw)
  }

  async fn run_sequence(&mut self) -> Result<Snapshot, Error<E>> {
    self.enter(State::Resetting);
    self.reset().await?;
    self.apply_settings().await?;

    self.arm_ready()?;
    self.command(self.mode.trigger()).await?;
    self.enter(State::Triggered);
    self.await_ready(self.config.ready_timeout_ms).await?;

    self.collect().await
  }

  /// Stabilization delay, then every category in fixed order.
  pub(crate) async fn collect(&mut self) -> Result<Snapshot, Error<E>> {
    self.enter(State::Reading);
    self.delay.delay_ms(self.config.stabilization_ms).await;

    Ok(Snapshot {
      air: self.read_air().await?,
      air_quality: self.read_air_quality().await?,
      light: self.read_light().await?,
      sound: self.read_sound().await?,
      particulate: self.read_particulate().await?,
      particle_sensor: self.config.particle_sensor,
    })
  }

  /// Settings lost on reset that the measurement depends on.
  async fn apply_settings(&mut self) -> Result<(), Error<E>> {
    let sensor = self.config.particle_sensor;
    if sensor != ParticleSensor::Off {
      self.write_u8(Reg::ParticleSensorSelect, sensor.into()).await?;
    }
    if let OperatingMode::Cycle(period) = self.mode {
      self.set_cycle_period(period).await?;
    }
    Ok(())
  }

  pub(crate) fn finish(&mut self, result: Result<Snapshot, Error<E>>) -> Result<Snapshot, Error<E>> {
    match result {
      Ok(snapshot) => {
        self.enter(State::Done);
        self.latest = Some(snapshot);
        Ok(snapshot)
      }
      Err(e) => {
        self.enter(State::Failed);
        Err(e)
      }
    }
  }

  pub(crate) fn enter(&mut self, state: State) {
    trace!("ms430: {} -> {}", self.state.name(), state.name());
    self.state = state;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{mock::*, Config, ModeKind};

  #[test]
  fn on_demand_sequence_reads_categories_in_order() {
    let tx = [cmd(0xE2), cmd(0xE1), read(0x10, &AIR), read(0x11, &AIR_QUALITY), read(0x12, &LIGHT), read(0x13, &SOUND)];
    let mut ms430 = driver(&tx, Config::default());

    let snapshot = block_on(ms430.measure()).unwrap();
    assert_eq!(ms430.state(), State::Done);
    assert_eq!(ms430.latest(), Some(&snapshot));
    assert_eq!(snapshot.air.temperature, 22.5);
    assert_eq!(snapshot.light.illuminance, 500.5);
    assert_eq!(snapshot.sound.spl_dba, 45.5);
    assert_eq!(snapshot.particulate, ParticulateReading::absent());
    assert_eq!(snapshot.particle_sensor, ParticleSensor::Off);

    let (sleep, ready) = finish(ms430);
    assert_eq!(ready.armed, 1);
    // reset settle + stabilization
    assert_eq!(sleep.total_ms(), 5 + 1500);
  }

  #[test]
  fn particle_sensor_is_selected_and_read() {
    let tx = [
      cmd(0xE2),
      write(&[0x07, 2]),
      cmd(0xE1),
      read(0x10, &AIR),
      read(0x11, &AIR_QUALITY),
      read(0x12, &LIGHT),
      read(0x13, &SOUND),
      read(0x14, &PARTICLE),
    ];
    let config = Config { particle_sensor: ParticleSensor::Sds011, ..Default::default() };
    let mut ms430 = driver(&tx, config);

    let snapshot = block_on(ms430.measure()).unwrap();
    assert_eq!(snapshot.particulate.concentration, Some(1000.25));
    assert_eq!(snapshot.particulate.unit, ParticleSensor::Sds011.unit());
    assert!(snapshot.particulate.valid);
    finish(ms430);
  }

  #[test]
  fn cycle_mode_programs_period_before_trigger() {
    let tx = [
      cmd(0xE2),
      write(&[0x89, 1]),
      cmd(0xE4),
      read(0x10, &AIR),
      read(0x11, &AIR_QUALITY),
      read(0x12, &LIGHT),
      read(0x13, &SOUND),
    ];
    let mut ms430 = driver(&tx, Config::default());
    ms430.set_mode(1, Some(100)).unwrap();

    block_on(ms430.measure()).unwrap();
    let (sleep, _) = finish(ms430);
    assert_eq!(sleep.total_ms(), 5 + 6 + 1500);
  }

  #[test]
  fn reset_waits_for_standby() {
    let mut ready = FakeReady::always();
    ready.levels.extend([true, true, false]);
    let tx = [cmd(0xE2), cmd(0xE1), read(0x10, &AIR), read(0x11, &AIR_QUALITY), read(0x12, &LIGHT), read(0x13, &SOUND)];
    let mut ms430 = driver_with(&tx, Config::default(), ready);

    block_on(ms430.measure()).unwrap();
    let (sleep, ready) = finish(ms430);
    assert!(ready.levels.is_empty());
    assert_eq!(sleep.total_ms(), 5 + 2 * 50 + 1500);
  }

  #[test]
  fn ready_timeout_fails_without_reading() {
    let tx = [cmd(0xE2), cmd(0xE1)];
    let mut ms430 = driver_with(&tx, Config::default(), FakeReady::never());

    let err = block_on(ms430.measure()).unwrap_err();
    assert!(matches!(err, Error::ReadyTimeout(ModeKind::OnDemand)));
    assert_eq!(ms430.state(), State::Failed);
    assert_eq!(ms430.latest(), None);
    finish(ms430);
  }

  #[test]
  fn failure_keeps_previous_snapshot() {
    let tx = [
      cmd(0xE2),
      cmd(0xE1),
      read(0x10, &AIR),
      read(0x11, &AIR_QUALITY),
      read(0x12, &LIGHT),
      read(0x13, &SOUND),
      cmd(0xE2),
      cmd(0xE1),
      read(0x10, &AIR).with_error(embedded_hal::i2c::ErrorKind::Bus),
    ];
    let mut ms430 = driver(&tx, Config::default());

    let first = block_on(ms430.measure()).unwrap();
    let err = block_on(ms430.measure()).unwrap_err();
    assert!(matches!(err, Error::I2c(embedded_hal::i2c::ErrorKind::Bus)));
    assert_eq!(ms430.state(), State::Failed);
    assert_eq!(ms430.latest(), Some(&first));
    finish(ms430);
  }

  #[test]
  fn standby_mode_is_rejected_before_bus_traffic() {
    let mut ms430 = driver(&[], Config::default());
    ms430.set_mode(0, None).unwrap();
    assert!(matches!(block_on(ms430.measure()), Err(Error::InvalidMode(0))));
    assert_eq!(ms430.state(), State::Idle);
    finish(ms430);
  }

  #[test]
  fn reads_particle_sensor_selection() {
    let mut ms430 = driver(&[read(0x07, &[1]), read(0x07, &[3])], Config::default());
    assert_eq!(block_on(ms430.read_particle_sensor()).unwrap(), ParticleSensor::Ppd42);
    assert!(matches!(block_on(ms430.read_particle_sensor()), Err(Error::InvalidParticleSensor(3))));
    finish(ms430);
  }

  #[test]
  fn particulate_read_skipped_without_sensor() {
    let mut ms430 = driver(&[], Config::default());
    let p = block_on(ms430.read_particulate()).unwrap();
    assert_eq!(p, ParticulateReading::absent());
    finish(ms430);
  }
}
