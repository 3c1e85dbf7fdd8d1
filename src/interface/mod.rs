//! Transport abstraction for the ADS1292R driver.

pub mod hal;
#[cfg(test)]
pub(crate) mod testing;

/// Output lines driven by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// SPI chip select, active low.
    ChipSelect,
    /// `PWDN`/`RESET` pin, active low.
    Reset,
    /// `START` pin, conversions run while high.
    Start,
}

/// Abstraction over the low-level platform access required by the driver.
///
/// Implementations carry no protocol knowledge: every byte sequence, select
/// envelope and delay is composed by the driver from these four primitives.
pub trait Ads1292Interface {
    /// Error type produced by the concrete transport.
    type Error;

    /// Reads the level of the `DRDY` input (`true` = high).
    fn read_data_ready(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Drives one of the output lines high or low.
    fn write_line(&mut self, line: Line, high: bool) -> core::result::Result<(), Self::Error>;

    /// Blocks for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Exchanges a single byte full-duplex and returns the received byte.
    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error>;
}

/// Runs `op` with chip select asserted and always releases it afterwards.
///
/// The release is attempted even when `op` fails; the first error wins.
pub(crate) fn with_selected<IFACE, T, F>(
    interface: &mut IFACE,
    op: F,
) -> core::result::Result<T, IFACE::Error>
where
    IFACE: Ads1292Interface,
    F: FnOnce(&mut IFACE) -> core::result::Result<T, IFACE::Error>,
{
    interface.write_line(Line::ChipSelect, false)?;
    let result = op(interface);
    let released = interface.write_line(Line::ChipSelect, true);

    let value = result?;
    released?;
    Ok(value)
}
