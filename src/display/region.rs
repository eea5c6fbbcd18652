//! Region abstraction for drawing into rectangular regions of a panel.

use log::trace;

use crate::command::consts::BYTES_PER_PIXEL;
use crate::command::{BufCommand, Command};
use crate::config::Panel;
use crate::display::PixelCoord;
use crate::error::Error;
use crate::interface;

/// A handle to a rectangular region of one panel which can be drawn into.
pub struct Region<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    iface: &'di mut DI,
    panel: Panel,
    left: u8,
    top: u8,
    cols: u8,
    rows: u8,
}

impl<'di, DI> Region<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    /// Construct a new region. This is only called by the factory methods on `Display`, which
    /// check that the region is non-empty and lies within the panel RAM.
    pub(super) fn new(
        iface: &'di mut DI,
        panel: Panel,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Self {
        Self {
            iface,
            panel,
            left: upper_left.0 as u8,
            top: upper_left.1 as u8,
            cols: (lower_right.0 - upper_left.0) as u8,
            rows: (lower_right.1 - upper_left.1) as u8,
        }
    }

    /// The number of image bytes that exactly fill the region.
    pub fn len_bytes(&self) -> usize {
        self.cols as usize * self.rows as usize * BYTES_PER_PIXEL
    }

    /// Draw RGB565 image data into the region as raw bytes, high byte of each pixel first. Pixels
    /// are drawn left-to-right and top-to-bottom.
    pub fn draw_packed<I>(&mut self, mut iter: I) -> Result<(), Error>
    where
        I: Iterator<Item = u8>,
    {
        // Set the row and column address registers and put the display in write mode.
        let right = self.left + self.cols - 1;
        let bottom = self.top + self.rows - 1;
        trace!(
            "{:?}: window cols {}..={} rows {}..={}",
            self.panel,
            self.left,
            right,
            self.top,
            bottom
        );
        Command::SetColumnAddress(self.left, right).send(self.iface, self.panel)?;
        Command::SetRowAddress(self.top, bottom).send(self.iface, self.panel)?;
        BufCommand::WriteRam(&[]).send(self.iface, self.panel)?;

        // Paint the region using constant memory by alternately filling a chunk buffer from the
        // iterator and writing it to the display.
        let region_total_bytes = self.len_bytes();
        let mut total_written = 0;
        let mut buf = [0u8; 32];

        loop {
            let mut chunk_len = 0;
            for slot in buf.iter_mut() {
                // Stop once the region is exactly filled.
                if total_written >= region_total_bytes {
                    break;
                }
                match iter.next() {
                    Some(byte) => {
                        *slot = byte;
                        chunk_len += 1;
                        total_written += 1;
                    }
                    None => break,
                }
            }

            if chunk_len > 0 {
                self.iface.send_data(self.panel, &buf[..chunk_len])?;
            }

            // A short chunk means either the region is full or the iterator is exhausted.
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }

    /// Draw RGB565 pixels into the region. Pixels are drawn left-to-right and top-to-bottom.
    pub fn draw<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: Iterator<Item = u16>,
    {
        self.draw_packed(Rgb565Bytes::new(iter))
    }
}

/// Iterator adapter that splits RGB565 pixel words into the byte stream the panel expects, high
/// byte first.
pub struct Rgb565Bytes<I> {
    pixels: I,
    low: Option<u8>,
}

impl<I> Rgb565Bytes<I> {
    pub fn new(pixels: I) -> Self {
        Self { pixels, low: None }
    }
}

impl<I> Iterator for Rgb565Bytes<I>
where
    I: Iterator<Item = u16>,
{
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let Some(low) = self.low.take() {
            return Some(low);
        }
        let [high, low] = self.pixels.next()?.to_be_bytes();
        self.low = Some(low);
        Some(high)
    }
}

/// Iterator adapter that joins big-endian byte pairs back into RGB565 pixel words. A trailing odd
/// byte is dropped.
pub struct Rgb565Pixels<I> {
    bytes: I,
}

impl<I> Rgb565Pixels<I> {
    pub fn new(bytes: I) -> Self {
        Self { bytes }
    }
}

impl<I> Iterator for Rgb565Pixels<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let high = self.bytes.next()?;
        let low = self.bytes.next()?;
        Some(u16::from_be_bytes([high, low]))
    }
}
