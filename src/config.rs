//! Configuration primitives for the ADS1292R driver.

use crate::params::{ChannelInput, ChopFrequency, DataRate, Gain, ReferenceVoltage};
use crate::registers::{
    ChannelSettings, Config1, Config2, LeadOffControl, LeadOffSense, Respiration1, Respiration2,
    RldSense, REG_CH1SET, REG_CH2SET, REG_CONFIG1, REG_CONFIG2, REG_LOFF, REG_LOFF_SENS,
    REG_RESP1, REG_RESP2, REG_RLD_SENS,
};

/// Number of registers programmed during initialization.
pub const CONFIG_REGISTER_COUNT: usize = 9;

/// Register image programmed into the device during initialization.
///
/// `LOFF_STAT` is a status register and is never part of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// `CONFIG1`: data rate and conversion mode.
    pub config1: Config1,
    /// `CONFIG2`: reference, lead-off comparator and test signal.
    pub config2: Config2,
    /// `LOFF`: lead-off threshold and excitation current.
    pub lead_off: LeadOffControl,
    /// `CH1SET`: respiration channel.
    pub channel1: ChannelSettings,
    /// `CH2SET`: ECG channel.
    pub channel2: ChannelSettings,
    /// `RLD_SENS`: right-leg-drive derivation.
    pub rld_sense: RldSense,
    /// `LOFF_SENS`: per-electrode lead-off detection.
    pub lead_off_sense: LeadOffSense,
    /// `RESP1`: respiration modulation.
    pub respiration1: Respiration1,
    /// `RESP2`: respiration calibration and frequency.
    pub respiration2: Respiration2,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid for continuous streaming.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.config1.single_shot() {
            return Err(ConfigError::SingleShotStreaming);
        }

        let reserved = self.config1.data_rate().is_reserved()
            || [self.channel1, self.channel2]
                .iter()
                .any(|ch| ch.gain().is_reserved() || ch.input().is_reserved())
            || self.rld_sense.chop().is_reserved();
        if reserved {
            return Err(ConfigError::ReservedEncoding);
        }

        Ok(())
    }

    /// Returns the configured output data rate.
    pub fn data_rate(&self) -> DataRate {
        self.config1.data_rate()
    }

    /// Returns the `(address, value)` pairs in the order they are programmed.
    pub fn register_writes(&self) -> [(u8, u8); CONFIG_REGISTER_COUNT] {
        [
            (REG_CONFIG1, self.config1.into()),
            (REG_CONFIG2, self.config2.into()),
            (REG_LOFF, self.lead_off.into()),
            (REG_CH1SET, self.channel1.into()),
            (REG_CH2SET, self.channel2.into()),
            (REG_RLD_SENS, self.rld_sense.into()),
            (REG_LOFF_SENS, self.lead_off_sense.into()),
            (REG_RESP1, self.respiration1.into()),
            (REG_RESP2, self.respiration2.into()),
        ]
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the output data rate.
    pub fn data_rate(mut self, rate: DataRate) -> Self {
        self.config.config1.set_data_rate(rate);
        self
    }

    /// Selects single-shot conversions. Rejected by [`Config::validate`].
    pub fn single_shot(mut self, enabled: bool) -> Self {
        self.config.config1.set_single_shot(enabled);
        self
    }

    /// Selects the reference voltage.
    pub fn reference(mut self, reference: ReferenceVoltage) -> Self {
        self.config.config2.set_reference(reference);
        self
    }

    /// Powers the lead-off comparators up or down.
    pub fn lead_off_comparator(mut self, enabled: bool) -> Self {
        self.config.config2.set_lead_off_comparator(enabled);
        self
    }

    /// Overrides the whole `CONFIG2` register.
    pub fn config2(mut self, config2: Config2) -> Self {
        self.config.config2 = config2;
        self
    }

    /// Overrides the lead-off control register.
    pub fn lead_off(mut self, lead_off: LeadOffControl) -> Self {
        self.config.lead_off = lead_off;
        self
    }

    /// Sets gain and input routing of channel 1.
    pub fn channel1(mut self, gain: Gain, input: ChannelInput) -> Self {
        self.config.channel1 = ChannelSettings::new().with_gain(gain).with_input(input);
        self
    }

    /// Sets gain and input routing of channel 2.
    pub fn channel2(mut self, gain: Gain, input: ChannelInput) -> Self {
        self.config.channel2 = ChannelSettings::new().with_gain(gain).with_input(input);
        self
    }

    /// Overrides the right-leg-drive sense register.
    pub fn rld_sense(mut self, rld_sense: RldSense) -> Self {
        self.config.rld_sense = rld_sense;
        self
    }

    /// Overrides the lead-off sense register.
    pub fn lead_off_sense(mut self, lead_off_sense: LeadOffSense) -> Self {
        self.config.lead_off_sense = lead_off_sense;
        self
    }

    /// Overrides both respiration control registers.
    pub fn respiration(mut self, respiration1: Respiration1, respiration2: Respiration2) -> Self {
        self.config.respiration1 = respiration1;
        self.config.respiration2 = respiration2;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    /// 125 SPS, reference buffer on, respiration demodulation on channel 1
    /// and ECG on channel 2 with RLD derived from channel 2.
    fn default() -> Self {
        Self {
            config1: Config1::new().with_data_rate(DataRate::Sps125),
            config2: Config2::new().with_reference_buffer(true),
            lead_off: LeadOffControl::new(),
            channel1: ChannelSettings::new()
                .with_gain(Gain::X4)
                .with_input(ChannelInput::Normal),
            channel2: ChannelSettings::new()
                .with_gain(Gain::X12)
                .with_input(ChannelInput::Normal),
            rld_sense: RldSense::new()
                .with_chop(ChopFrequency::Div16)
                .with_rld_buffer(true)
                .with_in2p(true)
                .with_in2n(true),
            lead_off_sense: LeadOffSense::new(),
            respiration1: Respiration1::new()
                .with_demodulation(true)
                .with_modulation(true)
                .with_phase(0b1100),
            respiration2: Respiration2::new().with_rld_reference_internal(true),
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Single-shot mode stops after one conversion and cannot feed a stream.
    SingleShotStreaming,
    /// A field holds an encoding the datasheet marks as reserved.
    ReservedEncoding,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::write_mask;

    #[test]
    fn default_image_matches_reference_firmware() {
        let on_wire: [(u8, u8); CONFIG_REGISTER_COUNT] = Config::default()
            .register_writes()
            .map(|(register, value)| (register, write_mask(register, value)));

        assert_eq!(
            on_wire,
            [
                (0x01, 0x00),
                (0x02, 0xA0),
                (0x03, 0x10),
                (0x04, 0x40),
                (0x05, 0x60),
                (0x06, 0x2C),
                (0x07, 0x00),
                (0x09, 0xF2),
                (0x0A, 0x03),
            ]
        );
    }

    #[test]
    fn builder_overrides_data_rate_and_channels() {
        let config = Config::new()
            .data_rate(DataRate::Sps500)
            .channel2(Gain::X6, ChannelInput::TestSignal)
            .build();

        assert_eq!(config.data_rate(), DataRate::Sps500);
        assert_eq!(u8::from(config.config1), 0x02);
        assert_eq!(u8::from(config.channel2), 0x05);
        assert_eq!(config.channel1, Config::default().channel1);
    }

    #[test]
    fn single_shot_is_rejected() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(
            Config::new().single_shot(true).build().validate(),
            Err(ConfigError::SingleShotStreaming)
        );
    }

    #[test]
    fn reserved_encodings_are_rejected() {
        let rate = Config::new().data_rate(DataRate::Reserved).build();
        assert_eq!(rate.validate(), Err(ConfigError::ReservedEncoding));

        let gain = Config::new().channel2(Gain::Reserved, ChannelInput::Normal).build();
        assert_eq!(gain.validate(), Err(ConfigError::ReservedEncoding));

        // Config built from raw register bytes, as read back from a device.
        let mut raw = Config::default();
        raw.channel1 = ChannelSettings::from(0x0F);
        raw.rld_sense = RldSense::from(0x40);
        assert_eq!(raw.channel1.input(), ChannelInput::Reserved1111);
        assert_eq!(raw.rld_sense.chop(), ChopFrequency::Reserved);
        assert_eq!(raw.validate(), Err(ConfigError::ReservedEncoding));
    }
}
