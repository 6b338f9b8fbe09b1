use bitfield_struct::bitfield;

/// Full-scale input range of a capacitance channel.
///
/// The discriminants are the 2-bit `RNG` codes held in bits 7:6 of the
/// channel setup register. Note that the codes are not ordered by size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Range {
  /// 0 – 2 pF
  Pf2 = 0b00,
  /// 0 – 0.5 pF
  Pf0_5 = 0b01,
  /// 0 – 1 pF
  Pf1 = 0b10,
  /// 0 – 4 pF
  #[default]
  Pf4 = 0b11,
}

impl Range {
  /// Decode a 2-bit range code. Bits above the low two are ignored.
  pub const fn from_code(code: u8) -> Self {
    Self::from_bits(code & 0b11)
  }

  /// Full-scale capacitance of this range in picofarads.
  pub const fn picofarads(self) -> f32 {
    match self {
      Self::Pf2 => 2.0,
      Self::Pf0_5 => 0.5,
      Self::Pf1 => 1.0,
      Self::Pf4 => 4.0,
    }
  }

  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits {
      0b00 => Self::Pf2,
      0b01 => Self::Pf0_5,
      0b10 => Self::Pf1,
      _ => Self::Pf4,
    }
  }
}

/// Channel setup register (`0x0B` for channel 1).
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSetup {
  #[bits(4)]
  __: u8,
  /// Disables the output comparator hysteresis.
  pub hysteresis_disabled: bool,
  ___: bool,
  #[bits(2)]
  pub range: Range,
}

impl From<Range> for ChannelSetup {
  fn from(range: Range) -> Self {
    Self::new().with_range(range)
  }
}

/// Conversion mode, bits 1:0 of the configuration register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConversionMode {
  Idle = 0b00,
  Continuous = 0b01,
  Single = 0b10,
  PowerDown = 0b11,
}

impl ConversionMode {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits {
      0b00 => Self::Idle,
      0b01 => Self::Continuous,
      0b10 => Self::Single,
      _ => Self::PowerDown,
    }
  }
}

/// Comparator threshold mode, bits 6:5 of the configuration register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ThresholdMode {
  Negative = 0b00,
  Positive = 0b01,
  InWindow = 0b10,
  OutWindow = 0b11,
}

impl ThresholdMode {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits {
      0b00 => Self::Negative,
      0b01 => Self::Positive,
      0b10 => Self::InWindow,
      _ => Self::OutWindow,
    }
  }
}

/// Configuration register (`0x0F`).
///
/// Any byte is accepted through [`Configuration::from_bits`] and written back
/// untouched, reserved bits included.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
  #[bits(2)]
  pub mode: ConversionMode,
  __: bool,
  pub en_ch2: bool,
  pub en_ch1: bool,
  #[bits(2)]
  pub threshold_mode: ThresholdMode,
  /// Fixed rather than adaptive threshold.
  pub threshold_fixed: bool,
}

impl Configuration {
  /// Channel 1 enabled, single conversion.
  pub const SINGLE_CH1: Self = Self::from_bits(0x12);
}

/// CAPDAC register (`0x11` for channel 1).
///
/// Defaults to the manual DAC enabled at step 4.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapDac {
  /// DAC step, 0..=63.
  #[bits(6, default = 4)]
  pub value: u8,
  /// Let the chip track the DAC value automatically.
  pub auto: bool,
  #[bits(1, default = true)]
  pub enabled: bool,
}

impl CapDac {
  /// Mask of the DAC step field.
  pub const VALUE_MASK: u8 = 0x3f;

  /// Manual DAC at the given step. Steps above 63 are truncated to six bits.
  pub const fn manual(step: u8) -> Self {
    Self::from_bits(0x80 | (step & Self::VALUE_MASK))
  }

  /// DAC switched off.
  pub const fn disabled() -> Self {
    Self::from_bits(0x00)
  }
}
