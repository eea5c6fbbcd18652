//! Panel selection and the per-panel wiring handed to the bus interfaces at construction.

use crate::error::Error;

/// The number of panels that can share one bus.
pub const NUM_PANELS: usize = 3;

/// Selects which of the panels on the bus a transaction is addressed to. On SPI each panel has
/// its own chip-select line; on I2C each has its own bus address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    P0,
    P1,
    P2,
}

impl Panel {
    /// All panels, in selector order.
    pub const ALL: [Panel; NUM_PANELS] = [Panel::P0, Panel::P1, Panel::P2];

    /// The position of this panel in a `PanelMap`.
    pub fn index(self) -> usize {
        match self {
            Panel::P0 => 0,
            Panel::P1 => 1,
            Panel::P2 => 2,
        }
    }
}

impl TryFrom<u8> for Panel {
    type Error = Error;

    fn try_from(selector: u8) -> Result<Self, Error> {
        match selector {
            0 => Ok(Panel::P0),
            1 => Ok(Panel::P1),
            2 => Ok(Panel::P2),
            _ => Err(Error::InvalidPanel(selector)),
        }
    }
}

/// One value per panel, such as the chip-select pin or the bus address wired to each, indexed by
/// `Panel`.
///
/// The reference board wires the chip-selects of panels 0, 1 and 2 to pins 6, 9 and 10, with the
/// shared reset on pin 8 and D/C on pin 7; build the map from whatever HAL pins those are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelMap<T> {
    entries: [T; NUM_PANELS],
}

impl<T> PanelMap<T> {
    /// Create a map from the values for panels 0, 1 and 2.
    pub fn new(p0: T, p1: T, p2: T) -> Self {
        PanelMap {
            entries: [p0, p1, p2],
        }
    }

    pub fn get(&self, panel: Panel) -> &T {
        &self.entries[panel.index()]
    }

    pub fn get_mut(&mut self, panel: Panel) -> &mut T {
        &mut self.entries[panel.index()]
    }

    /// Visit every entry mutably, paired with its panel.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Panel, &mut T)> {
        Panel::ALL.into_iter().zip(self.entries.iter_mut())
    }

    /// Give back the values for panels 0, 1 and 2.
    pub fn into_inner(self) -> [T; NUM_PANELS] {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_from_selector() {
        assert_eq!(Panel::try_from(0), Ok(Panel::P0));
        assert_eq!(Panel::try_from(1), Ok(Panel::P1));
        assert_eq!(Panel::try_from(2), Ok(Panel::P2));
        assert_eq!(Panel::try_from(3), Err(Error::InvalidPanel(3)));
        assert_eq!(Panel::try_from(255), Err(Error::InvalidPanel(255)));
    }

    #[test]
    fn panel_map_indexing() {
        let mut map = PanelMap::new(6u8, 9, 10);
        assert_eq!(*map.get(Panel::P0), 6);
        assert_eq!(*map.get(Panel::P1), 9);
        assert_eq!(*map.get(Panel::P2), 10);
        *map.get_mut(Panel::P1) = 11;
        let visited: Vec<(Panel, u8)> = map.iter_mut().map(|(p, v)| (p, *v)).collect();
        assert_eq!(
            visited,
            vec![(Panel::P0, 6), (Panel::P1, 11), (Panel::P2, 10)]
        );
        assert_eq!(map.into_inner(), [6, 11, 10]);
    }
}
