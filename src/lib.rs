//! Driver library for up to three Solomon Systech SSD1351 128x128 RGB OLED panels sharing one SPI
//! (or I2C) bus, each selected by its own chip-select line (or bus address).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;

// Re-exports for primary API.
pub use crate::command::{consts, DisplayMode};
pub use crate::config::{Panel, PanelMap};
pub use crate::display::{Display, PixelCoord};
pub use crate::error::Error;
pub use crate::interface::i2c::I2cInterface;
pub use crate::interface::spi::SpiInterface;
pub use crate::interface::DisplayInterface;
