//! Recording stand-ins for the HAL peripherals. Every bus byte, pin level and delay lands in one
//! shared, ordered event log.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;
use ssd1351_multi::{Display, PanelMap, SpiInterface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Cs(usize),
    Dc,
    Rst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Level(Line, bool),
    Byte(u8),
    DelayMs(u16),
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

pub struct MockSpi(pub Log);

impl Write<u8> for MockSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        for &w in words {
            self.0.push(Event::Byte(w));
        }
        Ok(())
    }
}

pub struct MockPin(pub Line, pub Log);

impl OutputPin for MockPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), ()> {
        self.1.push(Event::Level(self.0, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), ()> {
        self.1.push(Event::Level(self.0, true));
        Ok(())
    }
}

pub struct MockDelay(pub Log);

impl DelayMs<u16> for MockDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.0.push(Event::DelayMs(ms));
    }
}

pub type MockDisplay = Display<SpiInterface<MockSpi, MockPin, MockPin>, MockPin, MockDelay>;

/// A display on an SPI bus with all three panels wired, and the log everything is recorded into.
/// The log starts out empty.
pub fn spi_display() -> (MockDisplay, Log) {
    let log = Log::default();
    let cs = |n| MockPin(Line::Cs(n), log.clone());
    let iface = SpiInterface::new(
        MockSpi(log.clone()),
        MockPin(Line::Dc, log.clone()),
        PanelMap::new(cs(0), cs(1), cs(2)),
    )
    .unwrap();
    let display = Display::new(
        iface,
        MockPin(Line::Rst, log.clone()),
        MockDelay(log.clone()),
    );
    log.clear();
    (display, log)
}

/// A byte as the panel saw it: which chip-select framed it and the D/C level at the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framed {
    pub cs: usize,
    pub data: bool,
    pub byte: u8,
}

/// Replay the log as the panels would see it, checking the bus discipline on the way: a byte is
/// only ever clocked with exactly one chip-select asserted, each assertion frames exactly one
/// byte, and D/C never changes while a chip-select is asserted.
pub fn replay(events: &[Event]) -> Vec<Framed> {
    let mut asserted: Option<usize> = None;
    let mut bytes_in_frame = 0;
    let mut dc = None;
    let mut framed = Vec::new();
    for ev in events {
        match *ev {
            Event::Level(Line::Cs(n), false) => {
                assert_eq!(asserted, None, "CS{} asserted while another is", n);
                asserted = Some(n);
                bytes_in_frame = 0;
            }
            Event::Level(Line::Cs(n), true) => {
                assert_eq!(asserted, Some(n), "CS{} released without assertion", n);
                assert_eq!(bytes_in_frame, 1, "CS{} framed {} bytes", n, bytes_in_frame);
                asserted = None;
            }
            Event::Level(Line::Dc, level) => {
                assert_eq!(asserted, None, "D/C changed inside a frame");
                dc = Some(level);
            }
            Event::Byte(byte) => {
                let cs = asserted.expect("byte clocked with no chip-select asserted");
                bytes_in_frame += 1;
                framed.push(Framed {
                    cs,
                    data: dc.expect("byte clocked before D/C was driven"),
                    byte,
                });
            }
            Event::Level(Line::Rst, _) | Event::DelayMs(_) => {
                assert_eq!(asserted, None, "reset or delay inside a frame");
            }
        }
    }
    assert_eq!(asserted, None, "chip-select left asserted");
    framed
}

/// Only the bytes of a replay, split by D/C: `(is_data, byte)`.
pub fn stream(framed: &[Framed]) -> Vec<(bool, u8)> {
    framed.iter().map(|f| (f.data, f.byte)).collect()
}

/// The power-up sequence as `(is_data, byte)` pairs, display-on included.
#[rustfmt::skip]
pub fn init_stream() -> Vec<(bool, u8)> {
    let c = |b| (false, b);
    let d = |b| (true, b);
    vec![
        c(0xFD), d(0x12),
        c(0xFD), d(0xB1),
        c(0xAE),
        c(0xA4),
        c(0x15), d(0x00), d(0x7F),
        c(0x75), d(0x00), d(0x7F),
        c(0xB3), d(0xF1),
        c(0xCA), d(0x7F),
        c(0xA0), d(0x74),
        c(0xA1), d(0x00),
        c(0xA2), d(0x00),
        c(0xAB),
        c(0x01),
        c(0xB4), d(0xA0), d(0xB5), d(0x55),
        c(0xC1), d(0xC8), d(0x80), d(0xC0),
        c(0xC7), d(0x0F),
        c(0xB1), d(0x32),
        c(0xB2), d(0xA4), d(0x00), d(0x00),
        c(0xBB), d(0x17),
        c(0xB6), d(0x01),
        c(0xBE), d(0x05),
        c(0xA6),
        c(0xAF),
    ]
}

/// The window header `15 cs ce 75 rs re 5C` as `(is_data, byte)` pairs.
pub fn window_stream(cs: u8, ce: u8, rs: u8, re: u8) -> Vec<(bool, u8)> {
    vec![
        (false, 0x15),
        (true, cs),
        (true, ce),
        (false, 0x75),
        (true, rs),
        (true, re),
        (false, 0x5C),
    ]
}
