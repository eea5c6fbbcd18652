//! The command set for the SSD1351.
//!
//! Note 1: The display RAM of the SSD1351 is arranged in 128 rows and 128 columns, one column per
//! pixel. In 65k colour mode each pixel is one RGB565 word, written as two bytes with the high
//! byte first.

use crate::config::Panel;
use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry of the SSD1351 display RAM.

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 128;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const BYTES_PER_PIXEL: usize = 2;
    /// Bytes per row of a full-frame buffer.
    pub const FRAME_STRIDE: usize = NUM_PIXEL_COLS as usize * BYTES_PER_PIXEL;
    /// Bytes in a full-frame buffer.
    pub const FRAME_BYTES: usize = FRAME_STRIDE * NUM_PIXEL_ROWS as usize;
    /// Entries in the gray scale pulse-width table, one per level 1-63.
    pub const GRAY_SCALE_TABLE_LEN: usize = 63;
}

use self::consts::*;

/// The address increment orientation when writing image data.
#[derive(Clone, Copy, Debug)]
pub enum IncrementAxis {
    /// The column address increments as pixels are written, filling the `SetColumnAddress` range
    /// left to right, then moving down one row within the `SetRowAddress` range.
    Horizontal,
    /// The row address increments as pixels are written, filling the `SetRowAddress` range top to
    /// bottom, then moving right one column.
    Vertical,
}

/// Setting of column address remapping.
#[derive(Clone, Copy, Debug)]
pub enum ColumnRemap {
    /// Column addresses 0->127 map to segments 0->127.
    Forward,
    /// Column addresses 0->127 map to segments 127->0, mirroring the image horizontally.
    Reverse,
}

/// Order in which the three colour components of a pixel word drive the segment lines.
#[derive(Clone, Copy, Debug)]
pub enum ColorOrder {
    /// Components A, B, C in that order.
    Abc,
    /// Components C, B, A in that order. RGB565 data drives red/green/blue panels correctly in
    /// this order on the common modules.
    Cba,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug)]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom, so that row address 0 is the first row of the
    /// display.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top, so that row address 0 is the last row of the
    /// display.
    RowZeroLast,
}

/// Setting the layout of the COM lines to the display rows. This setting is dictated by how the
/// display module wires the OLED matrix to the driver chip; see the module datasheet.
#[derive(Clone, Copy, Debug)]
pub enum ComLayout {
    /// COM lines are connected to display rows in order.
    Sequential,
    /// COM lines are split between odd and even rows.
    OddEvenSplit,
}

/// Pixel format of data written to display RAM.
#[derive(Clone, Copy, Debug)]
pub enum ColorDepth {
    /// 65k colours, one RGB565 word (two bytes) per pixel.
    Rgb65k,
    /// 262k colours, three bytes per pixel.
    Rgb262k,
    /// 262k colours, 16-bit bus format 2.
    Rgb262kFormat2,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug)]
pub enum DisplayMode {
    /// The display is blanked with all pixels turned OFF.
    AllOff,
    /// The display is blanked with all pixels turned ON at full intensity.
    AllOn,
    /// The display operates normally, showing the image in the display RAM.
    Normal,
    /// The display shows the image in the display RAM with every colour component inverted.
    Inverse,
}

/// Settings of the command lock register.
#[derive(Clone, Copy, Debug)]
pub enum CommandLock {
    /// Accept commands.
    Unlocked,
    /// Ignore every command except `SetCommandLock`.
    Locked,
    /// Block the restricted commands A2, B1, B3, BB, BE and C1.
    RestrictedInaccessible,
    /// Allow the restricted commands A2, B1, B3, BB, BE and C1.
    RestrictedAccessible,
}

#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Set the column start and end address range when writing to the display RAM. The column
    /// address pointer is reset to the start column address such that `WriteRam` will begin
    /// writing there. Range is 0-127 with start <= end. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range when writing to the display RAM. The row address
    /// pointer is reset to the start row address such that `WriteRam` will begin writing there.
    /// Range is 0-127 with start <= end.
    SetRowAddress(u8, u8),
    /// Set the direction of address increment, column remapping, colour component order, COM
    /// scan direction, COM layout and colour depth. See documentation for each enum for details.
    SetRemapping(
        IncrementAxis,
        ColumnRemap,
        ColorOrder,
        ComScanDirection,
        ComLayout,
        ColorDepth,
    ),
    /// Set the display start line, "rolling" the image in display RAM upwards by that many rows.
    /// Range is 0-127.
    SetStartLine(u8),
    /// Set the display COM line offset. This rolls both the image *and* the rows selected by the
    /// MUX ratio. Range is 0-127.
    SetDisplayOffset(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Function selection. The argument byte follows on the command line (see `Display::init`).
    SelectFunction,
    /// Control sleep mode. Sleep enabled is "display off".
    SetSleepMode(bool),
    /// Set the refresh phase lengths. The first phase (reset) can be set from 5-31 DCLKs in odd
    /// steps, and the second (first pre-charge) from 3-15 DCLKs.
    SetPhaseLengths(u8, u8),
    /// Enable or disable the display enhancement mode.
    SetDisplayEnhancement(bool),
    /// Set the oscillator frequency Fosc (0-15, higher is faster) and the display clock divider
    /// DIVSET (0-10, DCLK = Fosc / 2^DIVSET).
    SetClockDivider(u8, u8),
    /// Select external (true) or internal (false) segment low voltage VSL.
    SetSegmentLowVoltage(bool),
    /// Set the second pre-charge period. Range 1-15 DCLKs.
    SetSecondPrechargePeriod(u8),
    /// Reset the gray scale pulse-width table to the built-in linear table.
    SetDefaultGrayScaleTable,
    /// Set the pre-charge voltage level, from 0.2*Vcc to 0.6*Vcc. Range 0-31.
    SetPreChargeVoltage(u8),
    /// Set the COM deselect voltage level VCOMH, from 0.72*Vcc to 0.86*Vcc. Range 0-7.
    SetComDeselectVoltage(u8),
    /// Set the contrast current of colour components A, B and C. Range 0-255 each.
    SetContrastCurrents(u8, u8, u8),
    /// Set the master current control, uniformly scaling all contrast currents by (n+1)/16. Range
    /// 0-15.
    SetMasterContrast(u8),
    /// Set the MUX ratio, the number of active COM lines. Range 16-128.
    SetMuxRatio(u8),
    /// Set the command lock register. See enum for details.
    SetCommandLock(CommandLock),
}

pub enum BufCommand<'buf> {
    /// Set the gray scale pulse-width table. Each of the 63 entries sets the drive pulse width in
    /// DCLKs for levels 1->63, must not exceed 180, and the entries must strictly increase.
    SetGrayScaleTable(&'buf [u8]),
    /// Write image data into display RAM, filling the window set by `SetColumnAddress` and
    /// `SetRowAddress` in the order given by the `SetRemapping` `IncrementAxis`.
    WriteRam(&'buf [u8]),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        Ok(($cmd, &$buf[..3]))
    }};
}

impl Command {
    /// Encode this command and transmit it to `panel`. Arguments are range-checked first, so an
    /// invalid command sends nothing.
    pub fn send<DI>(self, iface: &mut DI, panel: Panel) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 3];
        let (cmd, data) = match self {
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x15, [start, end])
                }
                _ => Err(Error::InvalidWindow),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x75, [start, end])
                }
                _ => Err(Error::InvalidWindow),
            },
            Command::SetRemapping(
                increment_axis,
                column_remap,
                color_order,
                com_scan_direction,
                com_layout,
                color_depth,
            ) => {
                let ia = match increment_axis {
                    IncrementAxis::Horizontal => 0x00,
                    IncrementAxis::Vertical => 0x01,
                };
                let cr = match column_remap {
                    ColumnRemap::Forward => 0x00,
                    ColumnRemap::Reverse => 0x02,
                };
                let co = match color_order {
                    ColorOrder::Abc => 0x00,
                    ColorOrder::Cba => 0x04,
                };
                let csd = match com_scan_direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x10,
                };
                let cl = match com_layout {
                    ComLayout::Sequential => 0x00,
                    ComLayout::OddEvenSplit => 0x20,
                };
                let cd = match color_depth {
                    ColorDepth::Rgb65k => 0x40,
                    ColorDepth::Rgb262k => 0x80,
                    ColorDepth::Rgb262kFormat2 => 0xC0,
                };
                ok_command!(arg_buf, 0xA0, [ia | cr | co | csd | cl | cd])
            }
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xA1, [line]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayOffset(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xA2, [line]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayMode(mode) => ok_command!(
                arg_buf,
                match mode {
                    DisplayMode::AllOff => 0xA4,
                    DisplayMode::AllOn => 0xA5,
                    DisplayMode::Normal => 0xA6,
                    DisplayMode::Inverse => 0xA7,
                },
                []
            ),
            Command::SelectFunction => ok_command!(arg_buf, 0xAB, []),
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xAE,
                    false => 0xAF,
                },
                []
            ),
            Command::SetPhaseLengths(phase_1, phase_2) => match (phase_1, phase_2) {
                (5..=31, 3..=15) if phase_1 % 2 == 1 => {
                    let p1 = (phase_1 - 1) >> 1;
                    let p2 = 0xF0 & (phase_2 << 4);
                    ok_command!(arg_buf, 0xB1, [p1 | p2])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayEnhancement(ena) => {
                let e = match ena {
                    true => 0xA4,
                    false => 0x00,
                };
                ok_command!(arg_buf, 0xB2, [e, 0x00, 0x00])
            }
            Command::SetClockDivider(fosc, divset) => match (fosc, divset) {
                (0..=15, 0..=10) => ok_command!(arg_buf, 0xB3, [fosc << 4 | divset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetSegmentLowVoltage(external) => {
                let vsl = match external {
                    true => 0xA0,
                    false => 0xA2,
                };
                ok_command!(arg_buf, 0xB4, [vsl, 0xB5, 0x55])
            }
            Command::SetSecondPrechargePeriod(period) => match period {
                1..=15 => ok_command!(arg_buf, 0xB6, [period]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDefaultGrayScaleTable => ok_command!(arg_buf, 0xB9, []),
            Command::SetPreChargeVoltage(voltage) => match voltage {
                0..=31 => ok_command!(arg_buf, 0xBB, [voltage]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComDeselectVoltage(voltage) => match voltage {
                0..=7 => ok_command!(arg_buf, 0xBE, [voltage]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetContrastCurrents(a, b, c) => ok_command!(arg_buf, 0xC1, [a, b, c]),
            Command::SetMasterContrast(contrast) => match contrast {
                0..=15 => ok_command!(arg_buf, 0xC7, [contrast]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_PIXEL_ROWS => ok_command!(arg_buf, 0xCA, [ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetCommandLock(lock) => {
                let l = match lock {
                    CommandLock::Unlocked => 0x12,
                    CommandLock::Locked => 0x16,
                    CommandLock::RestrictedInaccessible => 0xB0,
                    CommandLock::RestrictedAccessible => 0xB1,
                };
                ok_command!(arg_buf, 0xFD, [l])
            }
        }?;
        iface.send_command(panel, cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(panel, data)
        }
    }
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI, panel: Panel) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::SetGrayScaleTable(table) => {
                let ok = table.len() == GRAY_SCALE_TABLE_LEN
                    && table.windows(2).all(|w| w[0] < w[1])
                    && table.iter().all(|&t| t <= 180);
                if ok {
                    Ok((0xB8, table))
                } else {
                    Err(Error::InvalidArgument)
                }
            }
            BufCommand::WriteRam(buf) => Ok((0x5C, buf)),
        }?;
        iface.send_command(panel, cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(panel, data)
        }
    }
}
