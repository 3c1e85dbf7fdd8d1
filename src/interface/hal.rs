//! Transport implementation built on top of `embedded-hal` 1.0 traits.
//!
//! Chip select is driven manually through an [`OutputPin`] because the
//! ADS1292R command envelope toggles it independently of any byte transfer,
//! which a [`SpiDevice`](embedded_hal::spi::SpiDevice) cannot express. The
//! bus is therefore taken as a raw [`SpiBus`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use super::{Ads1292Interface, Line};

/// Errors produced by [`HalInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError<SpiE, PinE> {
    /// The SPI bus reported an error.
    Spi(SpiE),
    /// A GPIO operation failed.
    Pin(PinE),
}

/// `embedded-hal` backed transport for the ADS1292R driver.
pub struct HalInterface<SPI, CS, RST, START, DRDY, D> {
    spi: SPI,
    cs: CS,
    reset: RST,
    start: START,
    drdy: DRDY,
    delay: D,
}

impl<SPI, CS, RST, START, DRDY, D> HalInterface<SPI, CS, RST, START, DRDY, D> {
    /// Creates a new transport from the bus, the four control pins and a delay provider.
    pub const fn new(spi: SPI, cs: CS, reset: RST, start: START, drdy: DRDY, delay: D) -> Self {
        Self {
            spi,
            cs,
            reset,
            start,
            drdy,
            delay,
        }
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the transport and returns the owned peripherals.
    pub fn release(self) -> (SPI, CS, RST, START, DRDY, D) {
        (
            self.spi,
            self.cs,
            self.reset,
            self.start,
            self.drdy,
            self.delay,
        )
    }
}

impl<SPI, CS, RST, START, DRDY, D, PinE> Ads1292Interface
    for HalInterface<SPI, CS, RST, START, DRDY, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
    START: OutputPin<Error = PinE>,
    DRDY: InputPin<Error = PinE>,
    D: DelayNs,
{
    type Error = HalError<SPI::Error, PinE>;

    fn read_data_ready(&mut self) -> core::result::Result<bool, Self::Error> {
        self.drdy.is_high().map_err(HalError::Pin)
    }

    fn write_line(&mut self, line: Line, high: bool) -> core::result::Result<(), Self::Error> {
        let result = match (line, high) {
            (Line::ChipSelect, true) => self.cs.set_high(),
            (Line::ChipSelect, false) => self.cs.set_low(),
            (Line::Reset, true) => self.reset.set_high(),
            (Line::Reset, false) => self.reset.set_low(),
            (Line::Start, true) => self.start.set_high(),
            (Line::Start, false) => self.start.set_low(),
        };
        result.map_err(HalError::Pin)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi.transfer_in_place(&mut buf).map_err(HalError::Spi)?;
        Ok(buf[0])
    }
}
