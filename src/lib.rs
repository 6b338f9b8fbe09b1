#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `no_std` driver for the Analog Devices AD7150 capacitance-to-digital
//! converter.
//!
//! The AD7150 measures a capacitance against an on-chip excitation source and
//! reports a 16-bit code relative to one of four full-scale ranges. This crate
//! wraps the register map with:
//!
//! - A fixed bring-up sequence ([`Ad7150::setup`]) for single conversions on
//!   channel 1
//! - Typed views of the status, setup, configuration and CAPDAC registers
//! - Decoding of the range code into a picofarad full scale, and of the raw
//!   code into a capacitance
//! - Optional board control lines pulled low after every register write
//! - Blocking `embedded-hal` 1.0 and async `embedded-hal-async` 1.0 flavours
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use ad7150::{Ad7150, Range, DEFAULT_ADDRESS};
//!
//! fn example<I2C, D, E>(i2c: I2C, delay: D) -> Result<f32, ad7150::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//! {
//!   let mut sensor = Ad7150::new(i2c, delay, DEFAULT_ADDRESS);
//!   sensor.set_range(Range::Pf2);
//!   sensor.setup()?;
//!   Ok(sensor.value()?.capacitance_pf())
//! }
//! ```
pub mod asynch;
mod config;
mod lines;
mod measurement;
mod reg;
mod rw;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::ErrorKind;
use embedded_hal::i2c::{I2c, SevenBitAddress};

pub use config::*;
pub use lines::{ControlLines, NoLines};
pub use measurement::*;
pub use reg::*;

/// Errors that can occur while talking to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// A board control line could not be driven.
  ControlLine(ErrorKind),
}

/// Blocking driver for one AD7150.
///
/// Owns the I²C bus, a delay provider and the optional control lines. The
/// CAPDAC offset and input range are kept locally and only reach the chip on
/// [`Ad7150::setup`].
pub struct Ad7150<I, D, L = NoLines> {
  pub(crate) i2c: I,
  pub(crate) delay: D,
  pub(crate) lines: L,
  pub(crate) address: u8,
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
  /// traffic. The bus itself is expected to be initialised by the HAL.
  pub fn begin(&mut self) -> Result<(), Error<E>> {
    self.assert_control_lines()
  }

  /// Program channel 1 for single conversions with the staged range and
  /// CAPDAC offset.
  pub fn setup(&mut self) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("ad7150 setup: range {}, capdac {=u8:#x}", self.range, self.offset.into_bits());

    self.write_register(Register::Ch1Sensitivity, SETUP_SENSITIVITY)?;
    self.write_register(Register::Ch1Setup, ChannelSetup::from(self.range).into_bits())?;
    self.write_register(Register::Configuration, Configuration::SINGLE_CH1.into_bits())?;
    self.write_register(Register::PowerDownTimer, SETUP_POWER_DOWN_TIMER)?;
    self.write_register(Register::Ch1Capdac, self.offset.into_bits())?;

    self.configured = true;
    Ok(())
  }

  /// Write the configuration register verbatim.
  pub fn configure(&mut self, mode: Configuration) -> Result<(), Error<E>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("ad7150 configure {=u8:#x}", mode.into_bits());
    self.write_register(Register::Configuration, mode.into_bits())
  }

  /// Read status, conversion result, CAPDAC step and input range of channel 1.
  pub fn value(&mut self) -> Result<Measurement, Error<E>> {
    let data = self.read::<3>(Register::Status)?;
    let capdac = self.read_register(Register::Ch1Capdac)?;
    let setup = self.read_register(Register::Ch1Setup)?;
    Ok(Measurement::from_raw(data, capdac, setup))
  }

  /// Same reads as [`Ad7150::value`], but never fails.
  ///
  /// Every register is read even if an earlier one failed. Bytes from a
  /// failed read decode as zero, so the other fields keep what the chip
  /// returned.
  pub fn value_best_effort(&mut self) -> Measurement {
    let data = self.read::<3>(Register::Status).unwrap_or_default();
    let capdac = self.read_register(Register::Ch1Capdac).unwrap_or_default();
    let setup = self.read_register(Register::Ch1Setup).unwrap_or_default();
    Measurement::from_raw(data, capdac, setup)
  }

  pub fn status(&mut self) -> Result<Status, Error<E>> {
    self.read_register(Register::Status).map(Status::from_bits)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
  use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

  const ADDR: u8 = 0x48;

  #[derive(Default)]
  struct RecordingDelay {
    total_ns: u64,
  }

  impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
      self.total_ns += u64::from(ns);
    }
  }

  fn write(reg: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write(ADDR, vec![reg, value])
  }

  fn read(reg: u8, data: Vec<u8>) -> I2cTransaction {
    I2cTransaction::write_read(ADDR, vec![reg], data)
  }

  fn default_setup() -> Vec<I2cTransaction> {
    vec![write(0x09, 0x08), write(0x0B, 0xC0), write(0x0F, 0x12), write(0x10, 0x00), write(0x11, 0x84)]
  }

  #[test]
  fn setup_writes_five_registers_in_order() {
    let expectations = default_setup();
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    assert!(!dev.is_configured());
    dev.setup().unwrap();
    assert!(dev.is_configured());

    let (_, delay, _) = dev.release();
    assert_eq!(delay.total_ns, 5 * 4_000_000);
    i2c.done();
  }

  #[test]
  fn staged_offset_and_range_wait_for_setup() {
    let expectations = [write(0x09, 0x08), write(0x0B, 0x40), write(0x0F, 0x12), write(0x10, 0x00), write(0x11, 0x9F)];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    dev.set_range(Range::Pf0_5);
    dev.set_offset(CapDac::manual(0x1F));
    assert_eq!(dev.range(), Range::Pf0_5);
    assert_eq!(dev.offset().value(), 0x1F);
    assert!(!dev.is_configured());

    dev.setup().unwrap();
    i2c.done();
  }

  #[test]
  fn configure_writes_mode_verbatim() {
    let expectations = [write(0x0F, 0xFF), write(0x0F, 0x11)];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    dev.configure(Configuration::from_bits(0xFF)).unwrap();
    dev.configure(Configuration::new().with_en_ch1(true).with_mode(ConversionMode::Continuous)).unwrap();
    assert!(!dev.is_configured());
    i2c.done();
  }

  #[test]
  fn every_write_pulls_both_lines_low() {
    let expectations = [write(0x0F, 0x12), write(0x10, 0x00)];
    let mut i2c = I2cMock::new(&expectations);
    let line = [PinTransaction::set(PinState::Low), PinTransaction::set(PinState::Low)];
    let mut a = PinMock::new(&line);
    let mut b = PinMock::new(&line);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR).with_control_lines((a.clone(), b.clone()));
    dev.write_register(Register::Configuration, 0x12).unwrap();
    dev.write_register(Register::PowerDownTimer, 0x00).unwrap();

    i2c.done();
    a.done();
    b.done();
  }

  #[test]
  fn chip_write_leaves_lines_alone() {
    let expectations = [write(0x0F, 0x12)];
    let mut i2c = I2cMock::new(&expectations);
    let mut a = PinMock::new(&[]);
    let mut b = PinMock::new(&[]);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR).with_control_lines((a.clone(), b.clone()));
    dev.write_chip_register(Register::Configuration, 0x12).unwrap();

    let (_, delay, _) = dev.release();
    assert_eq!(delay.total_ns, 0);
    i2c.done();
    a.done();
    b.done();
  }

  #[test]
  fn begin_only_touches_lines() {
    let mut i2c = I2cMock::new(&[]);
    let mut a = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let mut b = PinMock::new(&[PinTransaction::set(PinState::Low)]);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR).with_control_lines((a.clone(), b.clone()));
    dev.begin().unwrap();

    i2c.done();
    a.done();
    b.done();
  }

  #[test]
  fn value_reads_three_registers() {
    let expectations = [read(0x00, vec![0x00, 0x12, 0x34]), read(0x11, vec![0xFF]), read(0x0B, vec![0x80])];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    let m = dev.value().unwrap();
    assert_eq!(m.value, 0x1234);
    assert_eq!(m.capdac, 0x3f);
    assert_eq!(m.input_range, 1.0);
    assert_eq!(m.status, Status::new());
    i2c.done();
  }

  #[test]
  fn value_uses_instance_address() {
    let expectations = [
      I2cTransaction::write_read(0x49, vec![0x00], vec![0x01, 0x30, 0x00]),
      I2cTransaction::write_read(0x49, vec![0x11], vec![0x84]),
      I2cTransaction::write_read(0x49, vec![0x0B], vec![0x00]),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), 0x49);
    let m = dev.value().unwrap();
    assert!(!m.is_ready());
    assert_eq!(m.capacitance_pf(), 0.0);
    i2c.done();
  }

  #[test]
  fn setup_then_value_end_to_end() {
    let mut expectations = default_setup();
    expectations.extend([read(0x00, vec![0x00, 0x80, 0x00]), read(0x11, vec![0x84]), read(0x0B, vec![0xC0])]);
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), DEFAULT_ADDRESS);
    dev.setup().unwrap();
    let m = dev.value().unwrap();

    assert!([0.5, 1.0, 2.0, 4.0].contains(&m.input_range));
    assert!(m.capdac <= 63);
    assert_eq!(m.range, Range::Pf4);
    assert_eq!(m.capdac, 4);
    i2c.done();
  }

  #[test]
  fn bus_errors_propagate() {
    use embedded_hal::i2c::ErrorKind as I2cErrorKind;

    let expectations = [write(0x09, 0x08).with_error(I2cErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    assert_eq!(dev.setup(), Err(Error::I2c(I2cErrorKind::Other)));
    assert!(!dev.is_configured());
    i2c.done();
  }

  #[test]
  fn status_reads_one_byte() {
    let expectations = [read(0x00, vec![0x83])];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    let status = dev.status().unwrap();
    assert!(status.rdy1());
    assert!(status.rdy2());
    assert!(status.power_down());
    i2c.done();
  }

  #[test]
  fn failed_write_still_pulls_lines_low() {
    use embedded_hal::i2c::ErrorKind as I2cErrorKind;

    let expectations = [write(0x0F, 0x12).with_error(I2cErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);
    let mut a = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let mut b = PinMock::new(&[PinTransaction::set(PinState::Low)]);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR).with_control_lines((a.clone(), b.clone()));
    assert_eq!(dev.write_register(Register::Configuration, 0x12), Err(Error::I2c(I2cErrorKind::Other)));

    let (_, delay, _) = dev.release();
    assert_eq!(delay.total_ns, 4_000_000);
    i2c.done();
    a.done();
    b.done();
  }

  #[test]
  fn best_effort_value_keeps_fields_that_were_read() {
    use embedded_hal::i2c::ErrorKind as I2cErrorKind;

    let expectations = [
      read(0x00, vec![0x00, 0x80, 0x00]),
      read(0x11, vec![0x00]).with_error(I2cErrorKind::Other),
      read(0x0B, vec![0xC0]),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    let m = dev.value_best_effort();
    assert_eq!(m.value, 0x8000);
    assert_eq!(m.capdac, 0);
    assert_eq!(m.range, Range::Pf4);
    assert_eq!(m.input_range, 4.0);
    i2c.done();
  }

  #[test]
  fn new_starts_with_default_soft_state() {
    let mut i2c = I2cMock::new(&[]);
    let dev = Ad7150::new(i2c.clone(), RecordingDelay::default(), ADDR);
    assert_eq!(dev.range(), Range::Pf4);
    assert_eq!(dev.offset(), CapDac::default());
    assert_eq!(dev.address(), ADDR);
    i2c.done();
  }
}
