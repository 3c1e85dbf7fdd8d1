//! Register map definitions for the ADS1292R analog front-end.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    ChannelInput, ChopFrequency, DataRate, Gain, LeadOffCurrent, LeadOffThreshold,
    ReferenceVoltage, RespirationFrequency, TestFrequency,
};

/// Register address of `ID`.
pub const REG_ID: u8 = 0x00;
/// Register address of `CONFIG1`.
pub const REG_CONFIG1: u8 = 0x01;
/// Register address of `CONFIG2`.
pub const REG_CONFIG2: u8 = 0x02;
/// Register address of `LOFF`.
pub const REG_LOFF: u8 = 0x03;
/// Register address of `CH1SET`.
pub const REG_CH1SET: u8 = 0x04;
/// Register address of `CH2SET`.
pub const REG_CH2SET: u8 = 0x05;
/// Register address of `RLD_SENS`.
pub const REG_RLD_SENS: u8 = 0x06;
/// Register address of `LOFF_SENS`.
pub const REG_LOFF_SENS: u8 = 0x07;
/// Register address of `LOFF_STAT`.
pub const REG_LOFF_STAT: u8 = 0x08;
/// Register address of `RESP1`.
pub const REG_RESP1: u8 = 0x09;
/// Register address of `RESP2`.
pub const REG_RESP2: u8 = 0x0A;
/// Register address of `GPIO`.
pub const REG_GPIO: u8 = 0x0B;

/// Value of the `ID` register on an ADS1292R.
pub const EXPECTED_DEVICE_ID: u8 = 0x73;

/// Opcode prefix of the `RREG` command.
pub const RREG_OPCODE: u8 = 0x20;
/// Opcode prefix of the `WREG` command.
pub const WREG_OPCODE: u8 = 0x40;

/// Single-byte system and data-read commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Wake up from standby.
    Wakeup = 0x02,
    /// Enter standby.
    Standby = 0x04,
    /// Reset the digital core.
    Reset = 0x06,
    /// Start or restart (synchronize) conversions.
    Start = 0x08,
    /// Stop conversions.
    Stop = 0x0A,
    /// Enable read-data-continuous mode.
    ReadDataContinuous = 0x10,
    /// Stop read-data-continuous mode.
    StopDataContinuous = 0x11,
    /// Read one conversion result by command.
    ReadData = 0x12,
}

impl Command {
    /// Returns the opcode byte sent on the wire.
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// Forces the reserved bits of `register` to their datasheet values.
///
/// Every register write goes through this function; reads are never masked.
pub const fn write_mask(register: u8, value: u8) -> u8 {
    match register {
        REG_CONFIG1 => value & 0x87,
        REG_CONFIG2 => (value & 0xFB) | 0x80,
        REG_LOFF => (value & 0xFD) | 0x10,
        REG_LOFF_SENS => value & 0x3F,
        REG_LOFF_STAT => value & 0x5F,
        REG_RESP1 => value | 0x02,
        REG_RESP2 => (value & 0x87) | 0x01,
        REG_GPIO => value & 0x0F,
        _ => value,
    }
}

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

macro_rules! byte_conversions {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<u8> for $ty {
                fn from(value: u8) -> Self {
                    Self::from_bytes([value])
                }
            }

            impl From<$ty> for u8 {
                fn from(value: $ty) -> Self {
                    value.into_bytes()[0]
                }
            }
        )*
    };
}

/// Bitfield representation of the `ID` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    // Device family member (bits 1:0), `0b11` for ADS1292/ADS1292R.
    pub device: B2,
    #[skip]
    __: B3,
    // Silicon revision (bits 7:5).
    pub revision: B3,
}

/// Bitfield representation of the `CONFIG1` register (address `0x01`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config1 {
    // Output data rate (bits 2:0).
    pub data_rate: DataRate,
    #[skip]
    __: B4,
    // Single-shot conversion mode (bit 7).
    pub single_shot: bool,
}

/// Bitfield representation of the `CONFIG2` register (address `0x02`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config2 {
    // Test signal frequency (bit 0).
    pub test_frequency: TestFrequency,
    // Internal test signal enable (bit 1).
    pub internal_test: bool,
    #[skip]
    __: B1,
    // Oscillator clock output on CLK pin (bit 3).
    pub clock_output: bool,
    // Reference voltage selection (bit 4).
    pub reference: ReferenceVoltage,
    // Reference buffer power-down, active low (bit 5).
    pub reference_buffer: bool,
    // Lead-off comparator power-down, active low (bit 6).
    pub lead_off_comparator: bool,
    #[skip]
    __: B1,
}

/// Bitfield representation of the `LOFF` register (address `0x03`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadOffControl {
    // AC lead-off detection (bit 0).
    pub ac_detection: bool,
    #[skip]
    __: B1,
    // Excitation current magnitude (bits 3:2).
    pub current: LeadOffCurrent,
    #[skip]
    __: B1,
    // Comparator threshold (bits 7:5).
    pub threshold: LeadOffThreshold,
}

/// Bitfield representation of `CH1SET`/`CH2SET` (addresses `0x04`/`0x05`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    // Input routing (bits 3:0).
    pub input: ChannelInput,
    // Programmable gain (bits 6:4).
    pub gain: Gain,
    // Channel power-down (bit 7).
    pub power_down: bool,
}

/// Input channel selector for the per-channel settings registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel 1 (`CH1SET`), respiration on the ADS1292R.
    One,
    /// Channel 2 (`CH2SET`), ECG.
    Two,
}

impl Channel {
    /// Returns the address of the channel's settings register.
    pub const fn settings_address(self) -> u8 {
        match self {
            Self::One => REG_CH1SET,
            Self::Two => REG_CH2SET,
        }
    }
}

/// Bitfield representation of the `RLD_SENS` register (address `0x06`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RldSense {
    // IN1P routed to RLD derivation (bit 0).
    pub in1p: bool,
    // IN1N routed to RLD derivation (bit 1).
    pub in1n: bool,
    // IN2P routed to RLD derivation (bit 2).
    pub in2p: bool,
    // IN2N routed to RLD derivation (bit 3).
    pub in2n: bool,
    // RLD lead-off sense (bit 4).
    pub lead_off_sense: bool,
    // RLD buffer power-down, active low (bit 5).
    pub rld_buffer: bool,
    // Chop frequency (bits 7:6).
    pub chop: ChopFrequency,
}

/// Bitfield representation of the `LOFF_SENS` register (address `0x07`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadOffSense {
    // IN1P lead-off detection (bit 0).
    pub in1p: bool,
    // IN1N lead-off detection (bit 1).
    pub in1n: bool,
    // IN2P lead-off detection (bit 2).
    pub in2p: bool,
    // IN2N lead-off detection (bit 3).
    pub in2n: bool,
    // Current direction flip for channel 1 (bit 4).
    pub flip1: bool,
    // Current direction flip for channel 2 (bit 5).
    pub flip2: bool,
    #[skip]
    __: B2,
}

/// Bitfield representation of the `LOFF_STAT` register (address `0x08`).
///
/// The low five bits share their layout with bits 19:15 of the status word
/// that opens every data frame.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadOffStatus {
    // IN1P electrode off (bit 0).
    pub in1p_off: bool,
    // IN1N electrode off (bit 1).
    pub in1n_off: bool,
    // IN2P electrode off (bit 2).
    pub in2p_off: bool,
    // IN2N electrode off (bit 3).
    pub in2n_off: bool,
    // RLD electrode off (bit 4).
    pub rld_off: bool,
    #[skip]
    __: B1,
    // Clock divider selection (bit 6).
    pub clock_divider: bool,
    #[skip]
    __: B1,
}

impl LeadOffStatus {
    /// Returns `true` when any electrode is reported off.
    pub fn any_off(self) -> bool {
        self.in1p_off() || self.in1n_off() || self.in2p_off() || self.in2n_off() || self.rld_off()
    }
}

/// Bitfield representation of the `RESP1` register (address `0x09`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Respiration1 {
    // External respiration clock (bit 0).
    pub external_clock: bool,
    #[skip]
    __: B1,
    // Modulation phase in 11.25° steps at 32 kHz (bits 5:2).
    pub phase: B4,
    // Modulation circuitry enable (bit 6).
    pub modulation: bool,
    // Demodulation circuitry enable (bit 7).
    pub demodulation: bool,
}

/// Bitfield representation of the `RESP2` register (address `0x0A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Respiration2 {
    #[skip]
    __: B1,
    // RLD reference generated internally (bit 1).
    pub rld_reference_internal: bool,
    // Modulation frequency (bit 2).
    pub frequency: RespirationFrequency,
    #[skip]
    __: B4,
    // Offset calibration enable (bit 7).
    pub calibration: bool,
}

byte_conversions!(
    DeviceId,
    Config1,
    Config2,
    LeadOffControl,
    ChannelSettings,
    RldSense,
    LeadOffSense,
    LeadOffStatus,
    Respiration1,
    Respiration2,
);

impl Register for DeviceId {
    type Raw = u8;
    const ADDRESS: u8 = REG_ID;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = None;
}

impl Register for Config1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CONFIG1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x02);
}

impl Register for Config2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CONFIG2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x80);
}

impl Register for LeadOffControl {
    type Raw = u8;
    const ADDRESS: u8 = REG_LOFF;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x10);
}

impl Register for RldSense {
    type Raw = u8;
    const ADDRESS: u8 = REG_RLD_SENS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for LeadOffSense {
    type Raw = u8;
    const ADDRESS: u8 = REG_LOFF_SENS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for LeadOffStatus {
    type Raw = u8;
    const ADDRESS: u8 = REG_LOFF_STAT;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Respiration1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_RESP1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x02);
}

impl Register for Respiration2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_RESP2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x05);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mask_clears_and_forces_reserved_bits() {
        assert_eq!(write_mask(REG_CONFIG1, 0xFF), 0x87);
        assert_eq!(write_mask(REG_CONFIG2, 0x00), 0x80);
        assert_eq!(write_mask(REG_CONFIG2, 0xFF), 0xFB);
        assert_eq!(write_mask(REG_LOFF, 0x00), 0x10);
        assert_eq!(write_mask(REG_LOFF, 0xFF), 0xFD);
        assert_eq!(write_mask(REG_LOFF_SENS, 0xFF), 0x3F);
        assert_eq!(write_mask(REG_LOFF_STAT, 0xFF), 0x5F);
        assert_eq!(write_mask(REG_RESP1, 0xFF), 0xFF);
        assert_eq!(write_mask(REG_RESP1, 0x00), 0x02);
        assert_eq!(write_mask(REG_RESP2, 0xFF), 0x87);
        assert_eq!(write_mask(REG_RESP2, 0x00), 0x01);
        assert_eq!(write_mask(REG_GPIO, 0xFF), 0x0F);
    }

    #[test]
    fn write_mask_passes_unmasked_registers_through() {
        for register in [REG_ID, REG_CH1SET, REG_CH2SET, REG_RLD_SENS] {
            assert_eq!(write_mask(register, 0xA5), 0xA5);
        }
    }

    #[test]
    fn device_id_decodes_ads1292r() {
        let id = DeviceId::from(EXPECTED_DEVICE_ID);
        assert_eq!(id.device(), 0b11);
        assert_eq!(id.revision(), 0b011);
    }

    #[test]
    fn channel_settings_layout_matches_datasheet() {
        let ch = ChannelSettings::new()
            .with_input(ChannelInput::Normal)
            .with_gain(Gain::X4)
            .with_power_down(false);
        assert_eq!(u8::from(ch), 0x40);

        let decoded = ChannelSettings::from(0x95);
        assert_eq!(decoded.input(), ChannelInput::TestSignal);
        assert_eq!(decoded.gain(), Gain::X1);
        assert!(decoded.power_down());
    }

    #[test]
    fn reserved_patterns_decode_without_panicking() {
        assert_eq!(Config1::from(0x07).data_rate(), DataRate::Reserved);
        assert_eq!(RldSense::from(0x40).chop(), ChopFrequency::Reserved);

        let ch = ChannelSettings::from(0x7F);
        assert_eq!(ch.gain(), Gain::Reserved);
        assert_eq!(ch.input(), ChannelInput::Reserved1111);

        for input in 0x0A..=0x0F {
            assert!(ChannelSettings::from(input).input().is_reserved());
        }
    }

    #[test]
    fn channel_selector_maps_to_settings_registers() {
        assert_eq!(Channel::One.settings_address(), REG_CH1SET);
        assert_eq!(Channel::Two.settings_address(), REG_CH2SET);
    }

    #[test]
    fn lead_off_status_layout_matches_datasheet() {
        let status = LeadOffStatus::from(0b0101_0010);
        assert!(!status.in1p_off());
        assert!(status.in1n_off());
        assert!(!status.in2p_off());
        assert!(!status.in2n_off());
        assert!(status.rld_off());
        assert!(status.clock_divider());
        assert!(status.any_off());

        assert!(!LeadOffStatus::from(0b0100_0000).any_off());
    }

    #[test]
    fn respiration_registers_roundtrip() {
        let resp1 = Respiration1::new()
            .with_demodulation(true)
            .with_modulation(true)
            .with_phase(0b1100);
        assert_eq!(write_mask(REG_RESP1, u8::from(resp1)), 0xF2);

        let resp2 = Respiration2::from(0x03);
        assert!(resp2.rld_reference_internal());
        assert_eq!(resp2.frequency(), RespirationFrequency::Khz32);
        assert!(!resp2.calibration());
    }

    #[test]
    fn command_opcodes_match_datasheet() {
        assert_eq!(Command::Start.opcode(), 0x08);
        assert_eq!(Command::Stop.opcode(), 0x0A);
        assert_eq!(Command::ReadDataContinuous.opcode(), 0x10);
        assert_eq!(Command::StopDataContinuous.opcode(), 0x11);
        assert_eq!(Command::Standby.opcode(), 0x04);
        assert_eq!(Command::Wakeup.opcode(), 0x02);
    }
}
