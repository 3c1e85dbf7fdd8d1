//! Strongly typed parameter enumerations for the ADS1292R driver.
//!
//! These enums map directly to datasheet field encodings and are used by the
//! register bitfields in [`registers`](crate::registers) and by
//! [`Config`](crate::config::Config). Prefer these types over raw integers to
//! keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use ads1292r::params::{ChannelInput, DataRate, Gain};
//!
//! let rate = DataRate::Sps125;
//! let gain = Gain::X6;
//! let input = ChannelInput::Normal;
//! assert_eq!(rate.period_us(), Some(8_000));
//! let _ = (gain, input);
//! ```

use modular_bitfield::prelude::Specifier;

/// Output data rates encoded in `CONFIG1.DR[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum DataRate {
    /// 125 samples per second.
    Sps125 = 0b000,
    /// 250 samples per second.
    Sps250 = 0b001,
    /// 500 samples per second (power-on default).
    Sps500 = 0b010,
    /// 1 kSPS.
    Sps1k = 0b011,
    /// 2 kSPS.
    Sps2k = 0b100,
    /// 4 kSPS.
    Sps4k = 0b101,
    /// 8 kSPS.
    Sps8k = 0b110,
    /// Reserved encoding, do not program.
    Reserved = 0b111,
}

impl DataRate {
    /// Returns the data rate in samples per second, `None` for the reserved encoding.
    pub const fn hz(self) -> Option<u32> {
        match self {
            Self::Sps125 => Some(125),
            Self::Sps250 => Some(250),
            Self::Sps500 => Some(500),
            Self::Sps1k => Some(1_000),
            Self::Sps2k => Some(2_000),
            Self::Sps4k => Some(4_000),
            Self::Sps8k => Some(8_000),
            Self::Reserved => None,
        }
    }

    /// Returns the spacing between two `DRDY` pulses in microseconds.
    pub const fn period_us(self) -> Option<u32> {
        match self.hz() {
            Some(hz) => Some(1_000_000 / hz),
            None => None,
        }
    }

    /// Returns `true` for the reserved encoding.
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved)
    }
}

/// Programmable gain selections encoded in `CHnSET.GAINn[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum Gain {
    /// Gain of 6 (power-on default).
    X6 = 0b000,
    /// Gain of 1.
    X1 = 0b001,
    /// Gain of 2.
    X2 = 0b010,
    /// Gain of 3.
    X3 = 0b011,
    /// Gain of 4.
    X4 = 0b100,
    /// Gain of 8.
    X8 = 0b101,
    /// Gain of 12.
    X12 = 0b110,
    /// Reserved encoding, do not program.
    Reserved = 0b111,
}

impl Gain {
    /// Returns the gain multiplier, `None` for the reserved encoding.
    pub const fn multiplier(self) -> Option<u8> {
        match self {
            Self::X6 => Some(6),
            Self::X1 => Some(1),
            Self::X2 => Some(2),
            Self::X3 => Some(3),
            Self::X4 => Some(4),
            Self::X8 => Some(8),
            Self::X12 => Some(12),
            Self::Reserved => None,
        }
    }

    /// Returns `true` for the reserved encoding.
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved)
    }
}

/// Channel input routing encoded in `CHnSET.MUXn[3:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum ChannelInput {
    /// Normal electrode input.
    Normal = 0b0000,
    /// Input shorted, used for offset measurements.
    Shorted = 0b0001,
    /// RLD_MEASURE.
    RldMeasure = 0b0010,
    /// Supply measurement (MVDD).
    Supply = 0b0011,
    /// Temperature sensor.
    Temperature = 0b0100,
    /// Internal test signal.
    TestSignal = 0b0101,
    /// RLD_DRP (positive input connected to RLDIN).
    RldDrp = 0b0110,
    /// RLD_DRM (negative input connected to RLDIN).
    RldDrm = 0b0111,
    /// RLD_DRPM (both inputs connected to RLDIN).
    RldDrpm = 0b1000,
    /// Route IN3P and IN3N to the channel inputs.
    In3 = 0b1001,
    // Encodings 0b1010..=0b1111 are reserved. They are mapped so that a
    // register read back from the device always decodes.
    #[doc(hidden)]
    Reserved1010 = 0b1010,
    #[doc(hidden)]
    Reserved1011 = 0b1011,
    #[doc(hidden)]
    Reserved1100 = 0b1100,
    #[doc(hidden)]
    Reserved1101 = 0b1101,
    #[doc(hidden)]
    Reserved1110 = 0b1110,
    #[doc(hidden)]
    Reserved1111 = 0b1111,
}

impl ChannelInput {
    /// Returns `true` for any of the reserved encodings.
    pub const fn is_reserved(self) -> bool {
        self as u8 > Self::In3 as u8
    }
}

/// Lead-off comparator thresholds encoded in `LOFF.COMP_TH[2:0]`.
///
/// Values are the positive-side threshold; the negative side is the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum LeadOffThreshold {
    /// 95 %.
    Pct95 = 0b000,
    /// 92.5 %.
    Pct92_5 = 0b001,
    /// 90 %.
    Pct90 = 0b010,
    /// 87.5 %.
    Pct87_5 = 0b011,
    /// 85 %.
    Pct85 = 0b100,
    /// 80 %.
    Pct80 = 0b101,
    /// 75 %.
    Pct75 = 0b110,
    /// 70 %.
    Pct70 = 0b111,
}

/// Lead-off excitation current encoded in `LOFF.ILEAD_OFF[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum LeadOffCurrent {
    /// 6 nA.
    Na6 = 0b00,
    /// 22 nA.
    Na22 = 0b01,
    /// 6 µA.
    Ua6 = 0b10,
    /// 22 µA.
    Ua22 = 0b11,
}

impl LeadOffCurrent {
    /// Returns the excitation current in nanoamps.
    pub const fn nanoamps(self) -> u32 {
        match self {
            Self::Na6 => 6,
            Self::Na22 => 22,
            Self::Ua6 => 6_000,
            Self::Ua22 => 22_000,
        }
    }
}

/// Chop frequency of the RLD/lead-off path encoded in `RLD_SENS.CHOP[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum ChopFrequency {
    /// f<sub>MOD</sub> / 16.
    Div16 = 0b00,
    /// Reserved encoding, do not program.
    Reserved = 0b01,
    /// f<sub>MOD</sub> / 2.
    Div2 = 0b10,
    /// f<sub>MOD</sub> / 4.
    Div4 = 0b11,
}

impl ChopFrequency {
    /// Returns `true` for the reserved encoding.
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved)
    }
}

/// Reference voltage selection (`CONFIG2.VREF_4V`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ReferenceVoltage {
    /// 2.42 V reference.
    V2_42 = 0,
    /// 4.033 V reference.
    V4_033 = 1,
}

/// Internal test signal frequency (`CONFIG2.TEST_FREQ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum TestFrequency {
    /// DC level.
    Dc = 0,
    /// 1 Hz square wave.
    Square1Hz = 1,
}

/// Respiration modulation frequency (`RESP2.RESP_FREQ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum RespirationFrequency {
    /// 32 kHz modulation clock.
    Khz32 = 0,
    /// 64 kHz modulation clock.
    Khz64 = 1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_encodings_have_no_physical_value() {
        assert_eq!(DataRate::Reserved.hz(), None);
        assert_eq!(DataRate::Reserved.period_us(), None);
        assert_eq!(DataRate::Sps500.period_us(), Some(2_000));
        assert_eq!(Gain::Reserved.multiplier(), None);
        assert_eq!(Gain::X12.multiplier(), Some(12));
    }

    #[test]
    fn reserved_channel_inputs_are_flagged() {
        assert!(!ChannelInput::In3.is_reserved());
        assert!(ChannelInput::Reserved1010.is_reserved());
        assert!(ChannelInput::Reserved1111.is_reserved());
        assert!(ChopFrequency::Reserved.is_reserved());
        assert!(!ChopFrequency::Div2.is_reserved());
    }
}
