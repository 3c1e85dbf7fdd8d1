//! Continuous-read frame acquisition and decoding.
//!
//! In read-data-continuous mode the device shifts out one 9-byte frame per
//! conversion: a 24-bit status word followed by the respiration channel and
//! the ECG channel, each a 24-bit big-endian two's-complement value.

use crate::interface::{with_selected, Ads1292Interface};
use crate::registers::LeadOffStatus;

/// Length in bytes of one continuous-read frame.
pub const FRAME_LEN: usize = 9;

/// One raw frame as clocked out of the device.
pub type RawFrame = [u8; FRAME_LEN];

// Byte clocked out while reading a frame.
const DUMMY: u8 = 0xFF;
// Bits 19:15 of the status word carry the lead-off flags.
const LEAD_OFF_MASK: u32 = 0x0F_8000;
const LEAD_OFF_SHIFT: u32 = 15;

const RESPIRATION_OFFSET: usize = 3;
const ECG_OFFSET: usize = 6;

/// One decoded conversion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedSample {
    /// ECG channel, sign-extended from 24 bits.
    pub ecg: i32,
    /// Respiration channel, sign-extended from 24 bits.
    pub respiration: i32,
    /// Respiration channel left-justified in 32 bits (low byte cleared), without sign extension.
    pub respiration_raw: i32,
    /// `true` when any electrode is reported off.
    pub lead_off_detected: bool,
    /// Per-electrode lead-off flags.
    pub lead_off: LeadOffStatus,
}

impl DecodedSample {
    /// ECG waveform value with the lower 8 of the 24 bits dropped.
    pub fn ecg_wave(&self) -> i16 {
        (self.ecg >> 8) as i16
    }

    /// Respiration waveform value: the left-justified raw value shifted back
    /// down and truncated to its low 16 bits.
    pub fn respiration_wave(&self) -> i16 {
        (self.respiration_raw >> 8) as i16
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodedSample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DecodedSample {{ ecg: {}, respiration: {}, respiration_raw: {}, lead_off: {=u8:#x} }}",
            self.ecg,
            self.respiration,
            self.respiration_raw,
            u8::from(self.lead_off)
        );
    }
}

#[inline]
fn be_u24(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

/// Sign-extends a 24-bit two's-complement value held in the low bits of `raw`.
#[inline]
pub const fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}

/// Decodes a raw frame. Pure and infallible.
pub fn decode_frame(frame: &RawFrame) -> DecodedSample {
    let status = be_u24(&frame[0..3]);
    let lead_bits = ((status & LEAD_OFF_MASK) >> LEAD_OFF_SHIFT) as u8;
    let lead_off = LeadOffStatus::from(lead_bits);

    let respiration_bits = be_u24(&frame[RESPIRATION_OFFSET..RESPIRATION_OFFSET + 3]);
    let ecg_bits = be_u24(&frame[ECG_OFFSET..ECG_OFFSET + 3]);

    DecodedSample {
        ecg: sign_extend_24(ecg_bits),
        respiration: sign_extend_24(respiration_bits),
        respiration_raw: (respiration_bits << 8) as i32,
        lead_off_detected: lead_bits & 0x1F != 0,
        lead_off,
    }
}

/// Reads one frame into `buf` if `DRDY` is asserted (low).
///
/// Returns `Ok(false)` without touching the bus when no conversion is pending.
/// Chip select is held low for the whole frame and released on every path.
pub fn read_frame<IFACE>(
    interface: &mut IFACE,
    buf: &mut RawFrame,
) -> core::result::Result<bool, IFACE::Error>
where
    IFACE: Ads1292Interface,
{
    if interface.read_data_ready()? {
        return Ok(false);
    }

    with_selected(interface, |iface| {
        for byte in buf.iter_mut() {
            *byte = iface.transfer(DUMMY)?;
        }
        Ok(())
    })?;

    Ok(true)
}
