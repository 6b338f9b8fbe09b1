/******************************************************************************
 * Refer to AD7150 datasheet for more information, available here:            *
 * - https://www.analog.com/en/products/ad7150.html                           *
 * ========================================================================== *
 *                        AD7150 - Registers & Memory Map                     *
*******************************************************************************/

/// Factory 7-bit I²C address of the AD7150.
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Time the chip needs after a register write before it accepts further traffic.
pub const SETTLE_DELAY_MS: u32 = 4;

/// Channel 1 sensitivity written by [`crate::Ad7150::setup`].
pub const SETUP_SENSITIVITY: u8 = 0x08;

/// Power-down timer written by [`crate::Ad7150::setup`] (timer disabled).
pub const SETUP_POWER_DOWN_TIMER: u8 = 0x00;

/// Register pointers of the AD7150.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
  // Read-only status & data (0x00..0x08)
  Status = 0x00,
  Ch1DataHigh = 0x01,
  Ch1DataLow = 0x02,
  Ch2DataHigh = 0x03,
  Ch2DataLow = 0x04,
  Ch1AverageHigh = 0x05,
  Ch1AverageLow = 0x06,
  Ch2AverageHigh = 0x07,
  Ch2AverageLow = 0x08,

  // Channel 1 setup (0x09..0x0B)
  Ch1Sensitivity = 0x09,
  Ch1Timeout = 0x0A,
  Ch1Setup = 0x0B,

  // Channel 2 setup (0x0C..0x0E)
  Ch2Sensitivity = 0x0C,
  Ch2Timeout = 0x0D,
  Ch2Setup = 0x0E,

  // Global settings (0x0F..0x12)
  Configuration = 0x0F,
  PowerDownTimer = 0x10,
  Ch1Capdac = 0x11,
  Ch2Capdac = 0x12,

  // Identification (0x13..0x17)
  SerialNumber3 = 0x13,
  SerialNumber2 = 0x14,
  SerialNumber1 = 0x15,
  SerialNumber0 = 0x16,
  ChipId = 0x17,
}

impl From<Register> for u8 {
  #[inline]
  fn from(r: Register) -> Self {
    r as u8
  }
}
