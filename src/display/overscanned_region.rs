//! Extended region abstraction that allows requesting regions that "overscan" the panel, i.e.
//! portions of the region may lie outside the 128x128 pixel area. Image data written into
//! overscanned regions is silently discarded, to relieve the user from having to consider boundary
//! conditions in code where the region rectangle is dynamically computed, such as a sprite sliding
//! in from the edge.

use itertools::iproduct;

use crate::command::consts::*;
use crate::config::Panel;
use crate::display::region::{Region, Rgb565Pixels};
use crate::display::PixelCoord;
use crate::error::Error;
use crate::interface;

/// A handle to a rectangular region which can be drawn into, but which is permitted to have
/// portions that lie outside the panel. Pixels that fall outside the panel are dropped before
/// they reach the bus.
///
/// The functionality is separated into its own kind of region so that the cost of the cropping
/// logic is not paid when it is known to be unnecessary.
pub struct OverscannedRegion<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    viewable_region: Option<Region<'di, DI>>,
    upper_left: PixelCoord,
    lower_right: PixelCoord,
}

/// Clip a value between some low and high limit.
fn clip<T: PartialOrd>(lo: T, x: T, hi: T) -> T {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

fn in_range<T: PartialOrd>(x: T, lo: T, hi: T) -> bool {
    x >= lo && x < hi
}

impl<'di, DI> OverscannedRegion<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    /// Construct a new region. This is only called by the factory method
    /// `Display::overscanned_region`, which checks the region coordinates are correctly ordered.
    pub(super) fn new(
        iface: &'di mut DI,
        panel: Panel,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Self {
        let cols = NUM_PIXEL_COLS as i16;
        let rows = NUM_PIXEL_ROWS as i16;
        let viewable_ul = PixelCoord(clip(0, upper_left.0, cols), clip(0, upper_left.1, rows));
        let viewable_lr = PixelCoord(clip(0, lower_right.0, cols), clip(0, lower_right.1, rows));
        let viewable_region = if viewable_ul.0 == viewable_lr.0 || viewable_ul.1 == viewable_lr.1 {
            None
        } else {
            Some(Region::new(iface, panel, viewable_ul, viewable_lr))
        };
        Self {
            viewable_region,
            upper_left,
            lower_right,
        }
    }

    /// Draw RGB565 pixels into the region, left-to-right and top-to-bottom. Only pixels which
    /// land on the panel are transmitted.
    pub fn draw<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: Iterator<Item = u16>,
    {
        let region = match self.viewable_region.as_mut() {
            Some(region) => region,
            None => return Ok(()),
        };
        let input_coords = iproduct!(
            self.upper_left.1..self.lower_right.1,
            self.upper_left.0..self.lower_right.0
        );
        let only_viewable = input_coords
            .zip(iter)
            .filter(|((r, c), _)| {
                in_range(*r, 0, NUM_PIXEL_ROWS as i16) && in_range(*c, 0, NUM_PIXEL_COLS as i16)
            })
            .map(|(_, pixel)| pixel);
        region.draw(only_viewable)
    }

    /// Draw RGB565 image data given as raw bytes, high byte of each pixel first. Only pixels
    /// which land on the panel are transmitted.
    pub fn draw_packed<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: Iterator<Item = u8>,
    {
        self.draw(Rgb565Pixels::new(iter))
    }
}
