//! Bus transports that carry command and data bytes to a selected panel.

use crate::config::Panel;
use crate::error::Error;

/// A transport able to deliver register addresses and register data to any panel on the bus.
pub trait DisplayInterface {
    fn send_command(&mut self, panel: Panel, cmd: u8) -> Result<(), Error>;
    fn send_data(&mut self, panel: Panel, buf: &[u8]) -> Result<(), Error>;
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
    //! SPI bus is 8 bits and the D/C GPIO tells the controller whether it is a command or data.
    //! Each panel sits on its own chip-select line, and all of them share SCK, MOSI and D/C.

    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::DisplayInterface;
    use crate::config::{Panel, PanelMap};
    use crate::error::Error;

    pub struct SpiInterface<SPI, DC, CS> {
        /// The SPI master device connected to every panel.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of every panel (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
        /// The active-low chip-select output of each panel.
        chip_selects: PanelMap<CS>,
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        /// Create a new SPI interface to communicate with the panels. `spi` is the SPI master
        /// device, `dc` is the GPIO output pin connected to the shared D/C line, and
        /// `chip_selects` holds the chip-select output of each panel. All chip-selects are driven
        /// high (released) before this returns.
        pub fn new(spi: SPI, dc: DC, mut chip_selects: PanelMap<CS>) -> Result<Self, Error> {
            for (_, cs) in chip_selects.iter_mut() {
                cs.set_high().map_err(|_| Error::Pin)?;
            }
            Ok(Self {
                spi,
                dc,
                chip_selects,
            })
        }

        /// Give back the SPI device and pins.
        pub fn release(self) -> (SPI, DC, PanelMap<CS>) {
            (self.spi, self.dc, self.chip_selects)
        }

        /// Frame a single byte with the chip-select of `panel`. The chip-select is released again
        /// even when the SPI write fails.
        fn write_framed(&mut self, panel: Panel, byte: u8) -> Result<(), Error> {
            let cs = self.chip_selects.get_mut(panel);
            cs.set_low().map_err(|_| Error::Pin)?;
            let written = self.spi.write(&[byte]).map_err(|_| Error::Bus);
            let released = cs.set_high().map_err(|_| Error::Pin);
            written.and(released)
        }
    }

    impl<SPI, DC, CS> DisplayInterface for SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        fn send_command(&mut self, panel: Panel, cmd: u8) -> Result<(), Error> {
            self.dc.set_low().map_err(|_| Error::Pin)?;
            self.write_framed(panel, cmd)
        }

        fn send_data(&mut self, panel: Panel, buf: &[u8]) -> Result<(), Error> {
            self.dc.set_high().map_err(|_| Error::Pin)?;
            for &byte in buf {
                self.write_framed(panel, byte)?;
            }
            Ok(())
        }
    }

}

pub mod i2c {
    //! The I2C interface replaces the D/C wire with a control byte leading each write: `0x00` for
    //! a command and `0x40` for display data. Each panel answers on its own bus address.

    use hal::blocking::i2c::Write;

    use super::DisplayInterface;
    use crate::config::{Panel, PanelMap};
    use crate::error::Error;

    const CONTROL_COMMAND: u8 = 0x00;
    const CONTROL_DATA: u8 = 0x40;
    const DATA_CHUNK: usize = 32;

    pub struct I2cInterface<I2C> {
        i2c: I2C,
        addresses: PanelMap<u8>,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: Write,
    {
        /// Create a new I2C interface, where `addresses` holds the 7-bit bus address of each
        /// panel.
        pub fn new(i2c: I2C, addresses: PanelMap<u8>) -> Self {
            Self { i2c, addresses }
        }

        /// Give back the I2C device.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: Write,
    {
        fn send_command(&mut self, panel: Panel, cmd: u8) -> Result<(), Error> {
            let address = *self.addresses.get(panel);
            self.i2c
                .write(address, &[CONTROL_COMMAND, cmd])
                .map_err(|_| Error::Bus)
        }

        fn send_data(&mut self, panel: Panel, buf: &[u8]) -> Result<(), Error> {
            let address = *self.addresses.get(panel);
            let mut frame = [0u8; DATA_CHUNK + 1];
            frame[0] = CONTROL_DATA;
            for chunk in buf.chunks(DATA_CHUNK) {
                frame[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c
                    .write(address, &frame[..=chunk.len()])
                    .map_err(|_| Error::Bus)?;
            }
            Ok(())
        }
    }

}

#[cfg(test)]
pub mod test_spy {
    //! An interface for use in unit tests to spy on whatever was sent to it.

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::DisplayInterface;
    use crate::config::Panel;
    use crate::error::Error;

    /// One logical transfer. Consecutive data writes to the same panel are merged.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
    }

    pub struct TestSpyInterface {
        sent: Rc<RefCell<Vec<(Panel, Sent)>>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            TestSpyInterface {
                sent: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// Make another handle onto the same record, so one can be moved into a `Display` while
        /// the test keeps the other for checking.
        pub fn split(&self) -> Self {
            TestSpyInterface {
                sent: self.sent.clone(),
            }
        }

        /// Assert that exactly one command with argument bytes `data` was sent to `panel`.
        pub fn check(&self, panel: Panel, cmd: u8, data: &[u8]) {
            let mut expected = vec![Sent::Cmd(cmd)];
            if !data.is_empty() {
                expected.push(Sent::Data(data.to_vec()));
            }
            self.check_multi(panel, &expected);
        }

        /// Assert the full sequence of transfers, all addressed to `panel`.
        pub fn check_multi(&self, panel: Panel, expected: &[Sent]) {
            let sent = self.sent.borrow();
            assert!(
                sent.iter().all(|(p, _)| *p == panel),
                "transfers addressed to a panel other than {:?}",
                panel
            );
            let transfers: Vec<Sent> = sent.iter().map(|(_, s)| s.clone()).collect();
            assert_eq!(transfers, expected);
        }

        /// Every transfer so far, with the panel it was addressed to.
        pub fn sent(&self) -> Vec<(Panel, Sent)> {
            self.sent.borrow().clone()
        }

        pub fn is_empty(&self) -> bool {
            self.sent.borrow().is_empty()
        }

        pub fn clear(&self) {
            self.sent.borrow_mut().clear()
        }
    }

    impl DisplayInterface for TestSpyInterface {
        fn send_command(&mut self, panel: Panel, cmd: u8) -> Result<(), Error> {
            self.sent.borrow_mut().push((panel, Sent::Cmd(cmd)));
            Ok(())
        }

        fn send_data(&mut self, panel: Panel, data: &[u8]) -> Result<(), Error> {
            let mut sent = self.sent.borrow_mut();
            if let Some((last_panel, Sent::Data(buf))) = sent.last_mut() {
                if *last_panel == panel {
                    buf.extend_from_slice(data);
                    return Ok(());
                }
            }
            sent.push((panel, Sent::Data(data.to_vec())));
            Ok(())
        }
    }
}
