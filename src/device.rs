//! High-level ADS1292R device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{decode_frame, read_frame, DecodedSample, FRAME_LEN};
use crate::interface::hal::HalInterface;
use crate::interface::{Ads1292Interface, Line};
use crate::log::{debug, trace, warning};
use crate::protocol;
use crate::registers::{
    Channel, ChannelSettings, Command, DeviceId, LeadOffStatus, Register,
    RegisterAccess, EXPECTED_DEVICE_ID, REG_ID,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

// Reset pin hold time for each level of the reset pulse (milliseconds).
const RESET_PULSE_MS: u32 = 100;
// Settle time after the reset pulse before any other access.
const POWER_ON_SETTLE_MS: u32 = 100;
// Hold time of each START pin level while clearing a pending start.
const START_TOGGLE_MS: u32 = 20;
// Settle time after pulling START low to halt conversions.
const HARD_STOP_MS: u32 = 100;
// Settle time after the STOP command.
const SOFT_STOP_MS: u32 = 50;
// Settle time after SDATAC so no frame is in flight during register access.
const SDATAC_SETTLE_MS: u32 = 300;
// Spacing between consecutive configuration register writes.
const REGISTER_WRITE_MS: u32 = 10;
// Settle time after RDATAC before conversions are started.
const RDATAC_SETTLE_MS: u32 = 10;

/// Session state of the device as tracked by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Power-on, or the last sequence failed. Only [`Ads1292r::init`] is accepted.
    Unconfigured,
    /// The reset and configuration sequence is running.
    Resetting,
    /// Conversions stopped, read-data-continuous off. Registers are accessible.
    ConfiguredIdle,
    /// Low-power standby entered from `ConfiguredIdle`. Only
    /// [`Ads1292r::wakeup`] is accepted.
    Standby,
    /// Conversions running in read-data-continuous mode.
    Streaming,
}

/// High-level synchronous driver for the ADS1292R analog front-end.
pub struct Ads1292r<IFACE> {
    interface: IFACE,
    config: Config,
    state: SessionState,
}

impl<IFACE> Ads1292r<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided transport.
    ///
    /// No bus traffic happens until [`init`](Self::init) is called.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            state: SessionState::Unconfigured,
        }
    }

    /// Consumes the driver and returns the owned transport.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying transport.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<SPI, CS, RST, START, DRDY, D, PinE> Ads1292r<HalInterface<SPI, CS, RST, START, DRDY, D>>
where
    SPI: SpiBus<u8>,
    CS: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
    START: OutputPin<Error = PinE>,
    DRDY: InputPin<Error = PinE>,
    D: DelayNs,
{
    // ==================================================================
    // == embedded-hal Convenience Constructors =========================
    // ==================================================================
    /// Convenience constructor for `embedded-hal` peripherals.
    pub fn new_hal(
        spi: SPI,
        cs: CS,
        reset: RST,
        start: START,
        drdy: DRDY,
        delay: D,
        config: Config,
    ) -> Self {
        Self::new(HalInterface::new(spi, cs, reset, start, drdy, delay), config)
    }

    /// Releases the driver, returning the peripherals and configuration.
    pub fn release_hal(self) -> ((SPI, CS, RST, START, DRDY, D), Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Ads1292r<IFACE>
where
    IFACE: Ads1292Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Streaming Control ============================
    // ==================================================================
    /// Brings the device from power-on to streaming.
    ///
    /// Runs the full reset, identification and register programming sequence
    /// with its fixed delays. Accepted from any state; a failed attempt leaves
    /// the driver [`Unconfigured`](SessionState::Unconfigured) and the device
    /// in an unspecified state, so recovery is simply calling `init` again.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        self.state = SessionState::Resetting;
        self.guarded(Self::run_init_sequence)
    }

    /// Reprograms the configuration registers.
    ///
    /// Only accepted while [`ConfiguredIdle`](SessionState::ConfiguredIdle).
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        self.require(SessionState::ConfiguredIdle)?;
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.program_registers(&config)?;
        self.config = config;
        Ok(())
    }

    /// Halts conversions and leaves read-data-continuous mode.
    pub fn stop_streaming(&mut self) -> Result<(), CommE> {
        self.require(SessionState::Streaming)?;

        self.guarded(|this| {
            this.set_start(false, HARD_STOP_MS)?;
            this.command(Command::StopDataContinuous)?;
            this.interface.delay_ms(SDATAC_SETTLE_MS);
            this.transition(SessionState::ConfiguredIdle);
            Ok(())
        })
    }

    /// Re-enters read-data-continuous mode and restarts conversions.
    pub fn resume_streaming(&mut self) -> Result<(), CommE> {
        self.require(SessionState::ConfiguredIdle)?;
        self.guarded(Self::enter_streaming)
    }

    /// Puts the device into its low-power standby mode.
    ///
    /// Register access and streaming are rejected until [`wakeup`](Self::wakeup).
    pub fn standby(&mut self) -> Result<(), CommE> {
        self.require(SessionState::ConfiguredIdle)?;
        self.command(Command::Standby)?;
        self.transition(SessionState::Standby);
        Ok(())
    }

    /// Wakes the device from standby back to `ConfiguredIdle`.
    pub fn wakeup(&mut self) -> Result<(), CommE> {
        self.require(SessionState::Standby)?;
        self.command(Command::Wakeup)?;
        self.transition(SessionState::ConfiguredIdle);
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads and decodes one frame if a conversion is pending.
    ///
    /// Returns `Ok(None)` without any bus traffic while `DRDY` is high. Call
    /// once per `DRDY` falling edge (every 8 ms at the default 125 SPS).
    pub fn sample(&mut self) -> Result<Option<DecodedSample>, CommE> {
        self.require(SessionState::Streaming)?;

        let mut raw = [0u8; FRAME_LEN];
        if !read_frame(&mut self.interface, &mut raw).map_err(Error::from)? {
            return Ok(None);
        }

        let sample = decode_frame(&raw);
        if sample.lead_off_detected {
            trace!("ads1292r: lead off {=u8:#x}", u8::from(sample.lead_off));
        }

        Ok(Some(sample))
    }

    // ==================================================================
    // == Register Access ===============================================
    // ==================================================================
    /// Reads one register by address.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.require(SessionState::ConfiguredIdle)?;
        protocol::read_register(&mut self.interface, register).map_err(Error::from)
    }

    /// Writes one register by address. Reserved bits are forced before the write.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.require(SessionState::ConfiguredIdle)?;
        protocol::write_register(&mut self.interface, register, value).map_err(Error::from)
    }

    /// Reads a typed register.
    pub fn read_typed<R>(&mut self) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8>,
    {
        self.read_register(R::ADDRESS).map(<R as From<u8>>::from)
    }

    /// Writes a typed register.
    pub fn write_typed<R>(&mut self, value: R) -> Result<(), CommE>
    where
        R: Register<Raw = u8> + Into<u8>,
    {
        if R::ACCESS == RegisterAccess::ReadOnly {
            return Err(Error::ReadOnlyRegister(R::ADDRESS));
        }

        self.write_register(R::ADDRESS, value.into())
    }

    /// Read-modify-write of a typed register. Skips the write when nothing changed.
    pub fn modify_register<R, F>(&mut self, mutate: F) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8> + Into<u8> + Copy,
        F: FnOnce(&mut R),
    {
        if R::ACCESS == RegisterAccess::ReadOnly {
            return Err(Error::ReadOnlyRegister(R::ADDRESS));
        }

        self.modify_at(R::ADDRESS, mutate)
    }

    /// Reads the settings register of `channel`.
    pub fn read_channel(&mut self, channel: Channel) -> Result<ChannelSettings, CommE> {
        self.read_register(channel.settings_address())
            .map(ChannelSettings::from)
    }

    /// Writes the settings register of `channel`.
    pub fn write_channel(
        &mut self,
        channel: Channel,
        settings: ChannelSettings,
    ) -> Result<(), CommE> {
        self.write_register(channel.settings_address(), settings.into())
    }

    /// Read-modify-write of a channel settings register.
    pub fn modify_channel<F>(&mut self, channel: Channel, mutate: F) -> Result<ChannelSettings, CommE>
    where
        F: FnOnce(&mut ChannelSettings),
    {
        self.modify_at(channel.settings_address(), mutate)
    }

    /// Reads the `ID` register.
    pub fn device_id(&mut self) -> Result<DeviceId, CommE> {
        self.read_typed()
    }

    /// Reads the `LOFF_STAT` register.
    pub fn read_lead_off_status(&mut self) -> Result<LeadOffStatus, CommE> {
        self.read_typed()
    }

    // ==================================================================
    // == Internal Sequencing Helpers ===================================
    // ==================================================================
    fn modify_at<R, F>(&mut self, register: u8, mutate: F) -> Result<R, CommE>
    where
        R: From<u8> + Into<u8> + Copy,
        F: FnOnce(&mut R),
    {
        let current = self.read_register(register)?;

        let mut value = <R as From<u8>>::from(current);
        mutate(&mut value);

        let updated: u8 = value.into();
        if updated != current {
            self.write_register(register, updated)?;
        }

        Ok(value)
    }

    fn run_init_sequence(&mut self) -> Result<(), CommE> {
        debug!("ads1292r: hardware reset");
        self.hardware_reset()?;
        self.interface.delay_ms(POWER_ON_SETTLE_MS);

        // Clear any pending start, then hold conversions off.
        self.set_start(false, START_TOGGLE_MS)?;
        self.set_start(true, START_TOGGLE_MS)?;
        self.set_start(false, HARD_STOP_MS)?;

        // START must precede register access on this device family.
        self.command(Command::Start)?;
        self.command(Command::Stop)?;
        self.interface.delay_ms(SOFT_STOP_MS);
        self.command(Command::StopDataContinuous)?;
        self.interface.delay_ms(SDATAC_SETTLE_MS);

        let id = protocol::read_register(&mut self.interface, REG_ID).map_err(Error::from)?;
        if id != EXPECTED_DEVICE_ID {
            warning!(
                "ads1292r: unexpected device id {=u8:#x}, expected {=u8:#x}",
                id,
                EXPECTED_DEVICE_ID
            );
            return Err(Error::DeviceNotFound { found: id });
        }

        let config = self.config;
        self.program_registers(&config)?;
        self.transition(SessionState::ConfiguredIdle);

        self.enter_streaming()
    }

    fn hardware_reset(&mut self) -> Result<(), CommE> {
        for high in [true, false, true] {
            self.interface
                .write_line(Line::Reset, high)
                .map_err(Error::from)?;
            self.interface.delay_ms(RESET_PULSE_MS);
        }
        Ok(())
    }

    fn program_registers(&mut self, config: &Config) -> Result<(), CommE> {
        for (register, value) in config.register_writes() {
            protocol::write_register(&mut self.interface, register, value)
                .map_err(Error::from)?;
            self.interface.delay_ms(REGISTER_WRITE_MS);
        }
        Ok(())
    }

    fn enter_streaming(&mut self) -> Result<(), CommE> {
        self.command(Command::ReadDataContinuous)?;
        self.interface.delay_ms(RDATAC_SETTLE_MS);
        self.set_start(true, START_TOGGLE_MS)?;
        self.transition(SessionState::Streaming);
        Ok(())
    }

    fn set_start(&mut self, high: bool, settle_ms: u32) -> Result<(), CommE> {
        self.interface
            .write_line(Line::Start, high)
            .map_err(Error::from)?;
        self.interface.delay_ms(settle_ms);
        Ok(())
    }

    fn command(&mut self, command: Command) -> Result<(), CommE> {
        protocol::send_command(&mut self.interface, command).map_err(Error::from)
    }

    fn require(&self, expected: SessionState) -> Result<(), CommE> {
        if self.state != expected {
            return Err(Error::InvalidState(self.state));
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug!("ads1292r: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Runs a multi-step sequence; any failure drops the session to `Unconfigured`.
    fn guarded<F>(&mut self, sequence: F) -> Result<(), CommE>
    where
        F: FnOnce(&mut Self) -> Result<(), CommE>,
    {
        let result = sequence(self);
        if result.is_err() {
            self.transition(SessionState::Unconfigured);
        }
        result
    }
}
