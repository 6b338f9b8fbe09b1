use bitfield_struct::bitfield;

use crate::Range;

/// Status register (`0x00`).
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
  /// Channel 1 conversion pending. Cleared when a result is available.
  pub rdy1: bool,
  /// Channel 2 conversion pending. Cleared when a result is available.
  pub rdy2: bool,
  /// Set if any enabled channel output is active.
  pub c1_c2: bool,
  pub out1: bool,
  /// Channel 1 auto CAPDAC hit its limit.
  pub dac_step1: bool,
  pub out2: bool,
  /// Channel 2 auto CAPDAC hit its limit.
  pub dac_step2: bool,
  pub power_down: bool,
}

/// Raw code of an empty input (0 pF above the CAPDAC offset).
pub const ZERO_SCALE_CODE: u16 = 0x3000;
/// Raw code of a full-scale input.
pub const FULL_SCALE_CODE: u16 = 0xCFF0;

/// One channel 1 reading as returned by [`crate::Ad7150::value`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
  /// Status byte at the time of the read.
  pub status: Status,
  /// Raw 16-bit conversion code.
  pub value: u16,
  /// CAPDAC step (low six bits of the CAPDAC register).
  pub capdac: u8,
  /// Input range decoded from the channel setup register.
  pub range: Range,
  /// `range` in picofarads, one of 0.5, 1, 2 or 4.
  pub input_range: f32,
}

/// The reading an all-zero transfer decodes to.
impl Default for Measurement {
  fn default() -> Self {
    Self::from_raw([0; 3], 0, 0)
  }
}

impl Measurement {
  pub(crate) fn from_raw(data: [u8; 3], capdac: u8, setup: u8) -> Self {
    // RNGH is bit 7, RNGL bit 6.
    let range = Range::from_code(setup >> 6);
    Self {
      status: Status::from_bits(data[0]),
      value: u16::from_be_bytes([data[1], data[2]]),
      capdac: capdac & 0x3f,
      range,
      input_range: range.picofarads(),
    }
  }

  /// Capacitance above the CAPDAC offset, in picofarads.
  ///
  /// Codes below zero scale give a negative result.
  pub fn capacitance_pf(&self) -> f32 {
    let span = (FULL_SCALE_CODE - ZERO_SCALE_CODE) as f32;
    (self.value as f32 - ZERO_SCALE_CODE as f32) / span * self.range.picofarads()
  }

  /// A channel 1 result was ready when the status byte was sampled.
  pub fn is_ready(&self) -> bool {
    !self.status.rdy1()
  }
}
