use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, i2c::*};

use crate::{defs::*, EdgeDetect, Error, Ms430};

impl<I, D, R, E> Ms430<I, D, R>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  R: InputPin + EdgeDetect,
{
  pub(crate) async fn read<const N: usize, T: TryFrom<[u8; N]>>(&mut self, reg: Reg) -> Result<T, Error<E>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b).await?;
    TryFrom::try_from(b).map_err(|_| Error::Data)
  }

  pub(crate) async fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.read_bytes(reg, &mut b).await?;
    Ok(b[0])
  }

  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let addr = self.config.address.into();
    self.i2c.write_read(addr, &[reg.into()], buf).await.map_err(Error::I2c)
  }

  pub(crate) async fn write<const N: usize, T: TryInto<[u8; N]>>(&mut self, reg: Reg, v: T) -> Result<(), Error<E>> {
    let b = v.try_into().map_err(|_| Error::Data)?;
    self.write_bytes(reg, &b).await
  }

  pub(crate) async fn write_u8(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    self.write_bytes(reg, &[value]).await
  }

  pub(crate) async fn write_bytes(&mut self, reg: Reg, data: &[u8]) -> Result<(), Error<E>> {
    debug_assert!(data.len() <= 7, "write_bytes payload too large");
    let mut buf = [0u8; 8];
    let len = 1 + data.len();
    buf[0] = reg.into();
    buf[1..len].copy_from_slice(data);
    let addr = self.config.address.into();
    self.i2c.write(addr, &buf[..len]).await.map_err(Error::I2c)
  }

  /// Send a bare command byte.
  pub(crate) async fn command(&mut self, cmd: Command) -> Result<(), Error<E>> {
    trace!("ms430: command {:#x}", u8::from(cmd));
    let addr = self.config.address.into();
    self.i2c.write(addr, &[cmd.into()]).await.map_err(Error::I2c)
  }
}
