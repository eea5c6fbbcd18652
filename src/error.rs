//! Error type shared by the command encoder, the bus interfaces and the display driver.

use thiserror::Error;

/// Everything that can go wrong while talking to a panel.
///
/// The transport variants do not carry the HAL's own error value, so that one error type serves
/// every bus and pin implementation behind a `DisplayInterface`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The SPI or I2C peripheral reported a failed write.
    #[error("bus write failed")]
    Bus,
    /// A GPIO output (chip-select, D/C or reset) could not be driven.
    #[error("GPIO output could not be driven")]
    Pin,
    /// A raw panel selector outside `0..=2`.
    #[error("panel selector {0} is out of range")]
    InvalidPanel(u8),
    /// An addressing window that is inverted or extends past the 128x128 panel RAM.
    #[error("invalid addressing window")]
    InvalidWindow,
    /// A command parameter outside the range the controller accepts.
    #[error("command argument out of range")]
    InvalidArgument,
    /// A pixel buffer whose length does not match the window it is written into.
    #[error("pixel buffer holds {actual} bytes, window needs {expected}")]
    BufferSize { expected: usize, actual: usize },
}
