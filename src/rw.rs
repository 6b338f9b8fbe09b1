use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::{Ad7150, ControlLines, Error, Register, SETTLE_DELAY_MS};

impl<I, E, D, L> Ad7150<I, D, L>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  L: ControlLines,
{
  /// Write one register, wait for the chip to settle, then pull the control
  /// lines low.
  ///
  /// The delay and the lines run even when the bus write fails; the bus error
  /// takes precedence over a line error.
  pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
    let written = self.write_chip_register(reg, value);
    self.delay.delay_ms(SETTLE_DELAY_MS);
    let lines = self.assert_control_lines();
    written.and(lines)
  }

  /// Single `[pointer, value]` write with no delay and no line handling.
  pub fn write_chip_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::trace!("ad7150 write {=u8:#x} <- {=u8:#x}", reg as u8, value);
    self.i2c.write(self.address, &[reg.into(), value]).map_err(Error::I2c)
  }

  /// Drive both control lines low.
  pub fn assert_control_lines(&mut self) -> Result<(), Error<E>> {
    self.lines.assert_low().map_err(Error::ControlLine)
  }

  pub fn read_register(&mut self, reg: Register) -> Result<u8, Error<E>> {
    let [b] = self.read::<1>(reg)?;
    Ok(b)
  }

  // Pointer write followed by a repeated-start burst read.
  pub(crate) fn read<const N: usize>(&mut self, reg: Register) -> Result<[u8; N], Error<E>> {
    let mut buf = [0u8; N];
    self.i2c.write_read(self.address, &[reg.into()], &mut buf).map_err(Error::I2c)?;
    Ok(buf)
  }
}
