#![no_std]

mod error;
mod log;

pub mod config;
pub mod device;
pub mod frame;
pub mod interface;
pub mod params;
pub mod protocol;
pub mod registers;

pub use crate::device::{Ads1292r, SessionState};
pub use crate::error::{Error, Result};
pub use crate::frame::DecodedSample;
