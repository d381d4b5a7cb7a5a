//! Light and sound interrupt configuration.
//!
//! The board has two interrupt outputs, LIT (light) and SIT (sound), which the
//! host wires to GPIO inputs of its own. This module programs when they fire;
//! watching the pins is left to the application.
//!
//! Settings are only accepted while the board is in standby, and a
//! [`reset`](crate::Ms430::reset) (which every measurement starts with) clears
//! them.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example<I, D, R>(mut ms430: ms430::Ms430<I, D, R>)
//! # where I: embedded_hal_async::i2c::I2c, D: embedded_hal_async::delay::DelayNs,
//! #   R: embedded_hal::digital::InputPin + ms430::EdgeDetect {
//! use ms430::interrupt::*;
//!
//! // Fire on a 200 mPa peak, latched until cleared
//! let sound = SoundInterrupt { kind: InterruptKind::Latch, threshold_mpa: 200 };
//! ms430.enable_sound_interrupt(sound).await.unwrap();
//!
//! // ... SIT goes low ...
//! ms430.clear_sound_interrupt().await.unwrap();
//! # }
//! ```

use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::{defs::*, EdgeDetect, Error, Ms430};

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  /// Set the peak sound amplitude, in mPa, that triggers the sound interrupt.
  pub async fn set_sound_threshold(&mut self, peak_mpa: u16) -> Result<(), Error<E>> {
    self.write(Reg::SoundIntThreshold, SoundThreshold { peak: peak_mpa }).await
  }

  /// Set the illuminance, `lux + hundredths / 100`, that triggers the light
  /// interrupt.
  ///
  /// `lux` is sent as given; keeping it at or below [`MAX_LUX_VALUE`] is up
  /// to the caller.
  pub async fn set_light_threshold(&mut self, lux: u16, hundredths: u8) -> Result<(), Error<E>> {
    if lux > MAX_LUX_VALUE {
      warn!("ms430: light threshold {} lux above the {} lux maximum", lux, MAX_LUX_VALUE);
    }
    self.write(Reg::LightIntThreshold, LightThreshold { lux, hundredths }).await
  }

  /// Program and enable the light interrupt.
  pub async fn enable_light_interrupt(&mut self, cfg: LightInterrupt) -> Result<(), Error<E>> {
    self.set_light_threshold(cfg.threshold_lux, cfg.threshold_hundredths).await?;
    self.write_u8(Reg::LightIntType, cfg.kind.into()).await?;
    self.write_u8(Reg::LightIntPolarity, cfg.polarity.into()).await?;
    self.write(Reg::LightIntEnable, InterruptEnable { enabled: true }).await
  }

  pub async fn disable_light_interrupt(&mut self) -> Result<(), Error<E>> {
    self.write(Reg::LightIntEnable, InterruptEnable { enabled: false }).await
  }

  /// Program and enable the sound interrupt.
  pub async fn enable_sound_interrupt(&mut self, cfg: SoundInterrupt) -> Result<(), Error<E>> {
    self.set_sound_threshold(cfg.threshold_mpa).await?;
    self.write_u8(Reg::SoundIntType, cfg.kind.into()).await?;
    self.write(Reg::SoundIntEnable, InterruptEnable { enabled: true }).await
  }

  pub async fn disable_sound_interrupt(&mut self) -> Result<(), Error<E>> {
    self.write(Reg::SoundIntEnable, InterruptEnable { enabled: false }).await
  }

  pub async fn is_light_interrupt_enabled(&mut self) -> Result<bool, Error<E>> {
    let r: InterruptEnable = self.read(Reg::LightIntEnable).await?;
    Ok(r.enabled)
  }

  pub async fn is_sound_interrupt_enabled(&mut self) -> Result<bool, Error<E>> {
    let r: InterruptEnable = self.read(Reg::SoundIntEnable).await?;
    Ok(r.enabled)
  }

  /// Release a latched light interrupt.
  pub async fn clear_light_interrupt(&mut self) -> Result<(), Error<E>> {
    self.command(Command::LightIntClear).await
  }

  /// Release a latched sound interrupt.
  pub async fn clear_sound_interrupt(&mut self) -> Result<(), Error<E>> {
    self.command(Command::SoundIntClear).await
  }
}

/// How an interrupt output behaves once its threshold is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptKind {
  /// Stays asserted until cleared by command.
  #[default]
  Latch = 0,
  /// Follows the comparison, deasserting when the level crosses back.
  Comparator = 1,
}

impl From<InterruptKind> for u8 {
  fn from(value: InterruptKind) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for InterruptKind {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(InterruptKind::Latch),
      1 => Ok(InterruptKind::Comparator),
      _ => Err(()),
    }
  }
}

/// Which side of the light threshold asserts the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
  /// Illuminance above the threshold.
  #[default]
  Positive = 0,
  /// Illuminance below the threshold.
  Negative = 1,
}

impl From<Polarity> for u8 {
  fn from(value: Polarity) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for Polarity {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(Polarity::Positive),
      1 => Ok(Polarity::Negative),
      _ => Err(()),
    }
  }
}

/// Light interrupt settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightInterrupt {
  pub kind: InterruptKind,
  pub polarity: Polarity,
  /// Integer part of the threshold, at most [`MAX_LUX_VALUE`].
  pub threshold_lux: u16,
  /// Fractional part of the threshold, in hundredths of a lux.
  pub threshold_hundredths: u8,
}

/// Sound interrupt settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoundInterrupt {
  pub kind: InterruptKind,
  /// Peak amplitude threshold, mPa.
  pub threshold_mpa: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
struct InterruptEnable {
  pub enabled: bool,
}

// [LSB, MSB]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 2)]
struct SoundThreshold {
  #[bits(16)]
  pub peak: u16,
}

// [LSB, MSB, hundredths]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 3)]
struct LightThreshold {
  #[bits(16)]
  pub lux: u16,
  #[bits(8)]
  pub hundredths: u8,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{mock::*, Config};

  #[test]
  fn sound_threshold_round_trips() {
    let peaks: Vec<u16> = (0..=u16::MAX).step_by(251).chain([1, 255, 256, u16::MAX]).collect();
    let mut tx = Vec::new();
    for &p in &peaks {
      let [low, high] = p.to_le_bytes();
      assert_eq!(low as u16 | (high as u16) << 8, p);
      tx.push(write(&[0x86, low, high]));
    }
    let mut ms430 = driver(&tx, Config::default());

    for &p in &peaks {
      block_on(ms430.set_sound_threshold(p)).unwrap();
    }
    finish(ms430);
  }

  #[test]
  fn light_threshold_is_sent_unclamped() {
    let tx = [write(&[0x82, 0xBC, 0x02, 50]), write(&[0x82, 0xFF, 0xFF, 99])];
    let mut ms430 = driver(&tx, Config::default());
    block_on(ms430.set_light_threshold(700, 50)).unwrap();
    block_on(ms430.set_light_threshold(u16::MAX, 99)).unwrap();
    finish(ms430);
  }

  #[test]
  fn enable_light_interrupt_writes_threshold_then_settings() {
    let tx = [write(&[0x82, 0x64, 0x00, 25]), write(&[0x83, 1]), write(&[0x84, 1]), write(&[0x81, 1])];
    let mut ms430 = driver(&tx, Config::default());
    let cfg = LightInterrupt {
      kind: InterruptKind::Comparator,
      polarity: Polarity::Negative,
      threshold_lux: 100,
      threshold_hundredths: 25,
    };
    block_on(ms430.enable_light_interrupt(cfg)).unwrap();
    finish(ms430);
  }

  #[test]
  fn sound_interrupt_enable_disable_and_clear() {
    let tx = [
      write(&[0x86, 0xC8, 0x00]),
      write(&[0x87, 0]),
      write(&[0x85, 1]),
      read(0x85, &[1]),
      cmd(0xE7),
      write(&[0x85, 0]),
      read(0x85, &[0]),
    ];
    let mut ms430 = driver(&tx, Config::default());
    block_on(ms430.enable_sound_interrupt(SoundInterrupt { kind: InterruptKind::Latch, threshold_mpa: 200 })).unwrap();
    assert!(block_on(ms430.is_sound_interrupt_enabled()).unwrap());
    block_on(ms430.clear_sound_interrupt()).unwrap();
    block_on(ms430.disable_sound_interrupt()).unwrap();
    assert!(!block_on(ms430.is_sound_interrupt_enabled()).unwrap());
    finish(ms430);
  }

  #[test]
  fn light_interrupt_disable_and_clear() {
    let tx = [write(&[0x81, 0]), cmd(0xE6), read(0x81, &[0])];
    let mut ms430 = driver(&tx, Config::default());
    block_on(ms430.disable_light_interrupt()).unwrap();
    block_on(ms430.clear_light_interrupt()).unwrap();
    assert!(!block_on(ms430.is_light_interrupt_enabled()).unwrap());
    finish(ms430);
  }
}
