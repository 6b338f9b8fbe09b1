//! Async flavour of the driver, built on `embedded-hal-async`.
//!
//! The surface matches [`crate::Ad7150`]; every bus operation is an
//! `async fn`. Control lines stay blocking since toggling a GPIO never waits.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{
  CapDac, ChannelSetup, Configuration, ControlLines, Error, Measurement, NoLines, Range, Register, Status,
  SETTLE_DELAY_MS, SETUP_POWER_DOWN_TIMER, SETUP_SENSITIVITY,
};

/// Async driver for one AD7150.
pub struct Ad7150<I, D, L = NoLines> {
  i2c: I,
  delay: D,
  lines: L,
  address: u8,
  offset: CapDac,
  range: Range,
  configured: bool,
}

impl<I, D> Ad7150<I, D, NoLines> {
  /// Create a driver for the chip at `address` with the default CAPDAC
  /// offset and the 0 – 4 pF range. Nothing is sent until [`Ad7150::setup`].
  pub fn new(i2c: I, delay: D, address: u8) -> Self {
    Self {
      i2c,
      delay,
      lines: NoLines,
      address,
      offset: CapDac::default(),
      range: Range::default(),
      configured: false,
    }
  }
}

impl<I, D, L> Ad7150<I, D, L> {
  /// Attach the control lines pulled low after every register write.
  pub fn with_control_lines<L2: ControlLines>(self, lines: L2) -> Ad7150<I, D, L2> {
    Ad7150 {
      i2c: self.i2c,
      delay: self.delay,
      lines,
      address: self.address,
      offset: self.offset,
      range: self.range,
      configured: self.configured,
    }
  }

  /// Stage a new CAPDAC offset for the next [`Ad7150::setup`].
  pub fn set_offset(&mut self, offset: CapDac) {
    self.offset = offset;
  }

  /// Stage a new input range for the next [`Ad7150::setup`].
  pub fn set_range(&mut self, range: Range) {
    self.range = range;
  }

  pub fn offset(&self) -> CapDac {
    self.offset
  }

  pub fn range(&self) -> Range {
    self.range
  }

  pub fn address(&self) -> u8 {
    self.address
  }

  /// `true` once [`Ad7150::setup`] has completed.
  pub fn is_configured(&self) -> bool {
    self.configured
  }

  /// Give back the bus, delay and control lines.
  pub fn release(self) -> (I, D, L) {
    (self.i2c, self.delay, self.lines)
  }
}

impl<I, E, D, L> Ad7150<I, D, L>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  L: ControlLines,
{
  /// Put the control lines in their idle (low) state before any register
  /// traffic.
  pub async fn begin(&mut self) -> Result<(), Error<E>> {
    self.assert_control_lines()
  }

  /// Program channel 1 for single conversions with the staged range and
  /// CAPDAC offset.
  pub async fn setup(&mut self) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("ad7150 setup: range {}, capdac {=u8:#x}", self.range, self.offset.into_bits());

    self.write_register(Register::Ch1Sensitivity, SETUP_SENSITIVITY).await?;
    self.write_register(Register::Ch1Setup, ChannelSetup::from(self.range).into_bits()).await?;
    self.write_register(Register::Configuration, Configuration::SINGLE_CH1.into_bits()).await?;
    self.write_register(Register::PowerDownTimer, SETUP_POWER_DOWN_TIMER).await?;
    self.write_register(Register::Ch1Capdac, self.offset.into_bits()).await?;

    self.configured = true;
    Ok(())
  }

  /// Write the configuration register verbatim.
  pub async fn configure(&mut self, mode: Configuration) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("ad7150 configure {=u8:#x}", mode.into_bits());
    self.write_register(Register::Configuration, mode.into_bits()).await
  }

  /// Read status, conversion result, CAPDAC step and input range of channel 1.
  pub async fn value(&mut self) -> Result<Measurement, Error<E>> {
    let data = self.read::<3>(Register::Status).await?;
    let capdac = self.read_register(Register::Ch1Capdac).await?;
    let setup = self.read_register(Register::Ch1Setup).await?;
    Ok(Measurement::from_raw(data, capdac, setup))
  }

  /// Same reads as [`Ad7150::value`], but never fails. Bytes from a failed
  /// read decode as zero.
  pub async fn value_best_effort(&mut self) -> Measurement {
    let data = self.read::<3>(Register::Status).await.unwrap_or_default();
    let capdac = self.read_register(Register::Ch1Capdac).await.unwrap_or_default();
    let setup = self.read_register(Register::Ch1Setup).await.unwrap_or_default();
    Measurement::from_raw(data, capdac, setup)
  }

  pub async fn status(&mut self) -> Result<Status, Error<E>> {
    self.read_register(Register::Status).await.map(Status::from_bits)
  }

  /// Write one register, wait for the chip to settle, then pull the control
  /// lines low. The delay and the lines run even when the bus write fails.
  pub async fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
    let written = self.write_chip_register(reg, value).await;
    self.delay.delay_ms(SETTLE_DELAY_MS).await;
    let lines = self.assert_control_lines();
    written.and(lines)
  }

  /// Single `[pointer, value]` write with no delay and no line handling.
  pub async fn write_chip_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::trace!("ad7150 write {=u8:#x} <- {=u8:#x}", reg as u8, value);
    self.i2c.write(self.address, &[reg.into(), value]).await.map_err(Error::I2c)
  }

  /// Drive both control lines low.
  pub fn assert_control_lines(&mut self) -> Result<(), Error<E>> {
    self.lines.assert_low().map_err(Error::ControlLine)
  }

  pub async fn read_register(&mut self, reg: Register) -> Result<u8, Error<E>> {
    let [b] = self.read::<1>(reg).await?;
    Ok(b)
  }

  async fn read<const N: usize>(&mut self, reg: Register) -> Result<[u8; N], Error<E>> {
    let mut buf = [0u8; N];
    self.i2c.write_read(self.address, &[reg.into()], &mut buf).await.map_err(Error::I2c)?;
    Ok(buf)
  }
}
