//! Register and command framing on top of an [`Ads1292Interface`].
//!
//! These are the raw wire primitives. They perform no session-state checks;
//! [`Ads1292r`](crate::Ads1292r) gates access to them.

use crate::interface::{with_selected, Ads1292Interface, Line};
use crate::registers::{write_mask, Command, RREG_OPCODE, WREG_OPCODE};

/// Settle time around every select transition of a register or command access.
pub const SELECT_SETTLE_MS: u32 = 2;

// Second opcode byte: number of registers to access minus one.
const SINGLE_REGISTER: u8 = 0x00;
const DUMMY: u8 = 0x00;

/// Writes one register after forcing its reserved bits.
pub fn write_register<IFACE>(
    interface: &mut IFACE,
    register: u8,
    value: u8,
) -> core::result::Result<(), IFACE::Error>
where
    IFACE: Ads1292Interface,
{
    let value = write_mask(register, value);
    with_selected(interface, |iface| {
        iface.delay_ms(SELECT_SETTLE_MS);
        iface.transfer(register | WREG_OPCODE)?;
        iface.transfer(SINGLE_REGISTER)?;
        iface.transfer(value)?;
        iface.delay_ms(SELECT_SETTLE_MS);
        Ok(())
    })
}

/// Reads one register and returns its raw value.
pub fn read_register<IFACE>(
    interface: &mut IFACE,
    register: u8,
) -> core::result::Result<u8, IFACE::Error>
where
    IFACE: Ads1292Interface,
{
    with_selected(interface, |iface| {
        iface.delay_ms(SELECT_SETTLE_MS);
        iface.transfer(register | RREG_OPCODE)?;
        iface.transfer(SINGLE_REGISTER)?;
        let value = iface.transfer(DUMMY)?;
        iface.delay_ms(SELECT_SETTLE_MS);
        Ok(value)
    })
}

/// Issues a single-byte command.
///
/// Select is pulsed once before the opcode is clocked out; the command decoder
/// does not latch reliably without that extra pulse.
pub fn send_command<IFACE>(
    interface: &mut IFACE,
    command: Command,
) -> core::result::Result<(), IFACE::Error>
where
    IFACE: Ads1292Interface,
{
    interface.write_line(Line::ChipSelect, false)?;
    interface.delay_ms(SELECT_SETTLE_MS);
    interface.write_line(Line::ChipSelect, true)?;
    interface.delay_ms(SELECT_SETTLE_MS);

    with_selected(interface, |iface| {
        iface.delay_ms(SELECT_SETTLE_MS);
        iface.transfer(command.opcode())?;
        iface.delay_ms(SELECT_SETTLE_MS);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::testing::{Event, ScriptedInterface, TransferFailed};
    use crate::registers::{REG_CONFIG1, REG_CONFIG2, REG_ID, REG_RESP1};

    #[test]
    fn write_register_frames_masked_value() {
        let mut iface = ScriptedInterface::new();
        write_register(&mut iface, REG_CONFIG1, 0xFF).unwrap();

        assert_eq!(
            iface.events,
            [
                Event::Line(Line::ChipSelect, false),
                Event::Delay(2),
                Event::Transfer(0x41),
                Event::Transfer(0x00),
                Event::Transfer(0x87),
                Event::Delay(2),
                Event::Line(Line::ChipSelect, true),
            ]
        );
    }

    #[test]
    fn write_register_forces_reserved_bits_on_wire() {
        let mut iface = ScriptedInterface::new();
        write_register(&mut iface, REG_CONFIG2, 0x00).unwrap();
        write_register(&mut iface, REG_RESP1, 0xFF).unwrap();
        write_register(&mut iface, REG_RESP1, 0x00).unwrap();

        assert_eq!(
            iface.sent(),
            [0x42, 0x00, 0x80, 0x49, 0x00, 0xFF, 0x49, 0x00, 0x02]
        );
    }

    #[test]
    fn read_register_returns_third_byte_unmasked() {
        let mut iface = ScriptedInterface::new();
        iface.respond(&[0xAA, 0xBB, 0x73]);

        assert_eq!(read_register(&mut iface, REG_ID).unwrap(), 0x73);
        assert_eq!(
            iface.events,
            [
                Event::Line(Line::ChipSelect, false),
                Event::Delay(2),
                Event::Transfer(0x20),
                Event::Transfer(0x00),
                Event::Transfer(0x00),
                Event::Delay(2),
                Event::Line(Line::ChipSelect, true),
            ]
        );
    }

    #[test]
    fn command_uses_pulsed_select_envelope() {
        let mut iface = ScriptedInterface::new();
        send_command(&mut iface, Command::StopDataContinuous).unwrap();

        assert_eq!(
            iface.events,
            [
                Event::Line(Line::ChipSelect, false),
                Event::Delay(2),
                Event::Line(Line::ChipSelect, true),
                Event::Delay(2),
                Event::Line(Line::ChipSelect, false),
                Event::Delay(2),
                Event::Transfer(0x11),
                Event::Delay(2),
                Event::Line(Line::ChipSelect, true),
            ]
        );
    }

    #[test]
    fn select_is_released_when_transfer_fails() {
        let mut iface = ScriptedInterface::new();
        iface.fail_transfer_at(1);

        assert_eq!(
            write_register(&mut iface, REG_CONFIG1, 0x00),
            Err(TransferFailed)
        );
        assert_eq!(
            iface.events.last(),
            Some(&Event::Line(Line::ChipSelect, true))
        );
    }
}
