//! The war selector: "No war selected" followed by wars 1 to 64.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use warstats_core::bus::{listener, EventBus, SelectedWar, Subscription};
use warstats_core::selection::{WarSelection, MAX_WAR_ID};

/// Current value of the selector plus the highlighted entry while its
/// overlay is open.
#[derive(Debug, Default)]
pub struct WarSelector {
    value: WarSelection,
    cursor: WarSelection,
}

impl WarSelector {
    /// Keeps the selector's value in step with [`SelectedWar`] on `bus`.
    pub fn connect(selector: &Rc<RefCell<Self>>, bus: &EventBus) -> Subscription {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(selector);
        bus.attach::<SelectedWar>(listener(move |selection: &WarSelection| {
            if let Some(selector) = weak.upgrade() {
                selector.borrow_mut().value = *selection;
            }
        }))
    }

    pub fn value(&self) -> WarSelection {
        self.value
    }

    pub fn cursor(&self) -> WarSelection {
        self.cursor
    }

    /// Entries in display order.
    pub fn options() -> impl Iterator<Item = WarSelection> {
        (0..=i64::from(MAX_WAR_ID)).filter_map(WarSelection::from_raw)
    }

    /// Opens the overlay with the current value highlighted.
    pub fn open(&mut self) {
        self.cursor = self.value;
    }

    pub fn cursor_next(&mut self) {
        self.cursor = self.cursor.next();
    }

    pub fn cursor_prev(&mut self) {
        self.cursor = self.cursor.prev();
    }

    pub fn cursor_first(&mut self) {
        self.cursor = WarSelection::None;
    }

    pub fn cursor_last(&mut self) {
        self.cursor = WarSelection::from_raw(i64::from(MAX_WAR_ID)).unwrap_or(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_start_with_no_selection() {
        let options: Vec<_> = WarSelector::options().collect();
        assert_eq!(options.len(), 65);
        assert_eq!(options[0], WarSelection::None);
        assert_eq!(options[64].raw(), 64);
    }

    #[test]
    fn value_follows_the_bus_and_cursor_starts_there() {
        let bus = EventBus::new();
        let selector = Rc::new(RefCell::new(WarSelector::default()));
        let _sub = WarSelector::connect(&selector, &bus);
        bus.publish::<SelectedWar>(&WarSelection::from_raw(30).unwrap());

        let mut selector = selector.borrow_mut();
        assert_eq!(selector.value().raw(), 30);
        selector.open();
        selector.cursor_next();
        assert_eq!(selector.cursor().raw(), 31);
        selector.cursor_last();
        selector.cursor_next();
        assert_eq!(selector.cursor().raw(), 64);
        selector.cursor_first();
        selector.cursor_prev();
        assert_eq!(selector.cursor(), WarSelection::None);
    }
}
