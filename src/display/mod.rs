//! The main API to the panel driver. It initializes panels with the fixed power-up register
//! sequence, writes whole frames, partial frames and single pixels, and hands out `Region`
//! instances for streaming arbitrary image data into a panel.


pub mod overscanned_region;
pub mod region;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;
use log::{debug, trace};

use crate::command::consts::*;
use crate::command::*;
use crate::config::Panel;
use crate::display::overscanned_region::OverscannedRegion;
use crate::display::region::Region;
use crate::error::Error;
use crate::interface;

/// Hold time at each level of the reset pulse.
const RESET_SETTLE_MS: u16 = 100;
/// Wait between the register sequence and switching the display on.
const INIT_SETTLE_MS: u16 = 200;
/// Argument to `Command::SelectFunction`: internal VDD regulator on.
const FUNCTION_INTERNAL_VDD: u8 = 0x01;

/// A pixel coordinate pair of `column` and `row`. For regions on the panel, `column` and `row` must
/// be in the range [0, 128], where 128 is only meaningful as an exclusive lower-right corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCoord(pub i16, pub i16);

/// A driver for up to three SSD1351 panels sharing one bus and one reset line.
pub struct Display<DI, RST, DELAY>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    rst: RST,
    delay: DELAY,
}

impl<DI, RST, DELAY> Display<DI, RST, DELAY>
where
    DI: interface::DisplayInterface,
    RST: OutputPin,
    DELAY: DelayMs<u16>,
{
    /// Construct a new driver for the panels reachable through `iface`. `rst` is the reset line
    /// shared by every panel and `delay` provides the blocking settle delays of the reset and
    /// power-up sequence.
    pub fn new(iface: DI, rst: RST, delay: DELAY) -> Self {
        Display { iface, rst, delay }
    }

    /// Give back the interface, reset pin and delay provider.
    pub fn release(self) -> (DI, RST, DELAY) {
        (self.iface, self.rst, self.delay)
    }

    /// Pulse the shared reset line high, low, high, holding each level for 100 ms. This resets
    /// every panel on the bus.
    fn reset(&mut self) -> Result<(), Error> {
        debug!("resetting panels");
        self.rst.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.rst.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.rst.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// The power-up register sequence for the 128x128 RGB modules, ending in normal display mode
    /// with the display still off.
    fn send_init_sequence(&mut self, panel: Panel) -> Result<(), Error> {
        Command::SetCommandLock(CommandLock::Unlocked).send(&mut self.iface, panel)?;
        Command::SetCommandLock(CommandLock::RestrictedAccessible).send(&mut self.iface, panel)?;
        Command::SetSleepMode(true).send(&mut self.iface, panel)?;
        Command::SetDisplayMode(DisplayMode::AllOff).send(&mut self.iface, panel)?;
        Command::SetColumnAddress(0, PIXEL_COL_MAX).send(&mut self.iface, panel)?;
        Command::SetRowAddress(0, PIXEL_ROW_MAX).send(&mut self.iface, panel)?;
        Command::SetClockDivider(15, 1).send(&mut self.iface, panel)?;
        Command::SetMuxRatio(NUM_PIXEL_ROWS).send(&mut self.iface, panel)?;
        Command::SetRemapping(
            IncrementAxis::Horizontal,
            ColumnRemap::Forward,
            ColorOrder::Cba,
            ComScanDirection::RowZeroLast,
            ComLayout::OddEvenSplit,
            ColorDepth::Rgb65k,
        )
        .send(&mut self.iface, panel)?;
        Command::SetStartLine(0).send(&mut self.iface, panel)?;
        Command::SetDisplayOffset(0).send(&mut self.iface, panel)?;
        // These modules latch the function selection argument from the command line.
        Command::SelectFunction.send(&mut self.iface, panel)?;
        self.iface.send_command(panel, FUNCTION_INTERNAL_VDD)?;
        Command::SetSegmentLowVoltage(true).send(&mut self.iface, panel)?;
        Command::SetContrastCurrents(0xC8, 0x80, 0xC0).send(&mut self.iface, panel)?;
        Command::SetMasterContrast(15).send(&mut self.iface, panel)?;
        Command::SetPhaseLengths(5, 3).send(&mut self.iface, panel)?;
        Command::SetDisplayEnhancement(true).send(&mut self.iface, panel)?;
        Command::SetPreChargeVoltage(0x17).send(&mut self.iface, panel)?;
        Command::SetSecondPrechargePeriod(1).send(&mut self.iface, panel)?;
        Command::SetComDeselectVoltage(5).send(&mut self.iface, panel)?;
        Command::SetDisplayMode(DisplayMode::Normal).send(&mut self.iface, panel)
    }

    /// Reset and initialize one panel, then switch its display on.
    ///
    /// The reset line is shared, so this also resets the other panels on the bus; bring up
    /// several panels with `init_all` instead.
    pub fn init(&mut self, panel: Panel) -> Result<(), Error> {
        debug!("initializing {:?}", panel);
        self.reset()?;
        self.send_init_sequence(panel)?;
        self.delay.delay_ms(INIT_SETTLE_MS);
        self.sleep(panel, false)
    }

    /// Reset all panels once, initialize each in turn, and switch them all on.
    pub fn init_all(&mut self) -> Result<(), Error> {
        debug!("initializing all panels");
        self.reset()?;
        for &panel in Panel::ALL.iter() {
            self.send_init_sequence(panel)?;
        }
        self.delay.delay_ms(INIT_SETTLE_MS);
        for &panel in Panel::ALL.iter() {
            self.sleep(panel, false)?;
        }
        Ok(())
    }

    /// Control sleep mode. A sleeping panel is dark but keeps its RAM contents.
    pub fn sleep(&mut self, panel: Panel, enabled: bool) -> Result<(), Error> {
        Command::SetSleepMode(enabled).send(&mut self.iface, panel)
    }

    /// Control the master current, scaling the brightness of every pixel by (level+1)/16.
    pub fn master_contrast(&mut self, panel: Panel, level: u8) -> Result<(), Error> {
        Command::SetMasterContrast(level).send(&mut self.iface, panel)
    }

    /// Set the vertical pan.
    ///
    /// This uses the `Command::SetStartLine` feature to roll the display RAM rows upwards by
    /// `offset`, wrapping the top rows round to the bottom.
    pub fn vertical_pan(&mut self, panel: Panel, offset: u8) -> Result<(), Error> {
        Command::SetStartLine(offset).send(&mut self.iface, panel)
    }

    /// Switch between normal, inverted and blanked output.
    pub fn set_display_mode(&mut self, panel: Panel, mode: DisplayMode) -> Result<(), Error> {
        Command::SetDisplayMode(mode).send(&mut self.iface, panel)
    }

    /// Fill the panel with black.
    pub fn clear(&mut self, panel: Panel) -> Result<(), Error> {
        debug!("clearing {:?}", panel);
        self.full_frame(panel)?.draw_packed(core::iter::repeat(0))
    }

    /// Set the pixel at column `x`, row `y` to the RGB565 `color`.
    pub fn set_point(&mut self, panel: Panel, x: u8, y: u8, color: u16) -> Result<(), Error> {
        if x > PIXEL_COL_MAX || y > PIXEL_ROW_MAX {
            return Err(Error::InvalidWindow);
        }
        trace!("{:?}: point ({}, {}) = {:#06x}", panel, x, y, color);
        let (x, y) = (x as i16, y as i16);
        self.region(panel, PixelCoord(x, y), PixelCoord(x + 1, y + 1))?
            .draw(core::iter::once(color))
    }

    /// Overwrite the whole panel from a full-frame buffer: 128 rows of 256 bytes, each row
    /// holding 128 big-endian RGB565 pixels.
    pub fn display_full(&mut self, panel: Panel, image: &[u8]) -> Result<(), Error> {
        if image.len() != FRAME_BYTES {
            return Err(Error::BufferSize {
                expected: FRAME_BYTES,
                actual: image.len(),
            });
        }
        debug!("full frame to {:?}", panel);
        let rows = image.chunks(FRAME_STRIDE);
        self.full_frame(panel)?.draw_packed(rows.flatten().cloned())
    }

    /// Overwrite the window from (`x_start`, `y_start`) inclusive to (`x_end`, `y_end`) exclusive
    /// with a tightly packed buffer of `(x_end - x_start) * 2` bytes per row.
    pub fn display_partial(
        &mut self,
        panel: Panel,
        image: &[u8],
        x_start: u8,
        y_start: u8,
        x_end: u8,
        y_end: u8,
    ) -> Result<(), Error> {
        if x_start >= x_end
            || y_start >= y_end
            || x_end > NUM_PIXEL_COLS
            || y_end > NUM_PIXEL_ROWS
        {
            return Err(Error::InvalidWindow);
        }
        let expected = (x_end - x_start) as usize * (y_end - y_start) as usize * BYTES_PER_PIXEL;
        if image.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: image.len(),
            });
        }
        self.region(
            panel,
            PixelCoord(x_start as i16, y_start as i16),
            PixelCoord(x_end as i16, y_end as i16),
        )?
        .draw_packed(image.iter().cloned())
    }

    fn full_frame<'di>(&'di mut self, panel: Panel) -> Result<Region<'di, DI>, Error> {
        self.region(
            panel,
            PixelCoord(0, 0),
            PixelCoord(NUM_PIXEL_COLS as i16, NUM_PIXEL_ROWS as i16),
        )
    }

    /// Construct a rectangular region of `panel` onto which to draw image data. `upper_left` is
    /// inclusive and `lower_right` exclusive; the region must be non-empty and lie within the
    /// 128x128 panel.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn region<'di>(
        &'di mut self,
        panel: Panel,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<Region<'di, DI>, Error> {
        if false
            || upper_left.0 < 0
            || upper_left.1 < 0
            || lower_right.0 > NUM_PIXEL_COLS as i16
            || lower_right.1 > NUM_PIXEL_ROWS as i16
            || upper_left.0 >= lower_right.0
            || upper_left.1 >= lower_right.1
        {
            return Err(Error::InvalidWindow);
        }
        Ok(Region::new(&mut self.iface, panel, upper_left, lower_right))
    }

    /// Construct a rectangular region onto which to draw image data which silently discards
    /// overscan.
    ///
    /// An overscanned region rectangle *need not* lie within the panel, as it will automatically
    /// crop pixels that fall outside it. It must still be correctly ordered and non-empty.
    pub fn overscanned_region<'di>(
        &'di mut self,
        panel: Panel,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<OverscannedRegion<'di, DI>, Error> {
        if upper_left.0 >= lower_right.0 || upper_left.1 >= lower_right.1 {
            return Err(Error::InvalidWindow);
        }
        Ok(OverscannedRegion::new(
            &mut self.iface,
            panel,
            upper_left,
            lower_right,
        ))
    }
}
