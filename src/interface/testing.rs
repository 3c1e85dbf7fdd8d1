//! Scripted transport used by the driver unit tests.

extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use super::{Ads1292Interface, Line};

/// One observable transport interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Line(Line, bool),
    Delay(u32),
    Transfer(u8),
    ReadDataReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFailed;

/// Records every call and answers transfers and `DRDY` reads from queues.
///
/// Exhausted queues answer `0x00` for transfers and "high" (not ready) for
/// `DRDY` reads.
#[derive(Default)]
pub struct ScriptedInterface {
    pub events: Vec<Event>,
    responses: VecDeque<u8>,
    data_ready: VecDeque<bool>,
    fail_transfer_at: Option<usize>,
    transfers: usize,
}

impl ScriptedInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, bytes: &[u8]) -> &mut Self {
        self.responses.extend(bytes.iter().copied());
        self
    }

    pub fn data_ready_levels(&mut self, levels: &[bool]) -> &mut Self {
        self.data_ready.extend(levels.iter().copied());
        self
    }

    /// Makes the `index`-th transfer (zero based) fail.
    pub fn fail_transfer_at(&mut self, index: usize) -> &mut Self {
        self.fail_transfer_at = Some(index);
        self
    }

    pub fn sent(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Transfer(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Ads1292Interface for ScriptedInterface {
    type Error = TransferFailed;

    fn read_data_ready(&mut self) -> Result<bool, Self::Error> {
        self.events.push(Event::ReadDataReady);
        Ok(self.data_ready.pop_front().unwrap_or(true))
    }

    fn write_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error> {
        self.events.push(Event::Line(line, high));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::Delay(ms));
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let index = self.transfers;
        self.transfers += 1;
        if self.fail_transfer_at == Some(index) {
            return Err(TransferFailed);
        }
        self.events.push(Event::Transfer(byte));
        Ok(self.responses.pop_front().unwrap_or(0x00))
    }
}
