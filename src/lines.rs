use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

/// Board-level lines that must be pulled low after every register write.
///
/// Some carrier boards wire two spare outputs next to the sensor that have to
/// be driven low once the chip has taken a write. The driver calls
/// [`ControlLines::assert_low`] as a separate step after each write and from
/// [`crate::Ad7150::begin`].
pub trait ControlLines {
  fn assert_low(&mut self) -> Result<(), ErrorKind>;
}

/// No control lines wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLines;

impl ControlLines for NoLines {
  #[inline]
  fn assert_low(&mut self) -> Result<(), ErrorKind> {
    Ok(())
  }
}

impl<A: OutputPin, B: OutputPin> ControlLines for (A, B) {
  fn assert_low(&mut self) -> Result<(), ErrorKind> {
    self.0.set_low().map_err(|e| e.kind())?;
    self.1.set_low().map_err(|e| e.kind())
  }
}
