//! Typed publish/subscribe hub for UI state changes.
//!
//! Each event is a marker type implementing [`BusEvent`], which fixes its
//! name and payload type at compile time. Components register
//! [`Listener`] handles and the bus calls them synchronously, in registration
//! order, whenever the event is published. There is no queue and no
//! persistence: a publish with no listeners is simply dropped.
//!
//! The bus lives on the UI thread only (`Rc`, not `Arc`). Listeners may
//! subscribe, unsubscribe or publish from inside a dispatch; dispatch works on
//! a snapshot of the listener list taken when it starts, so a listener added
//! mid-dispatch first hears the *next* publish.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::selection::WarSelection;
use crate::types::WarEntry;

/// A named event with a fixed payload type.
pub trait BusEvent: 'static {
    /// Event name, used for diagnostics.
    const NAME: &'static str;
    /// Value handed to every listener by reference.
    type Payload: 'static;
}

/// Shared handle to a listener callback. Identity is the handle's allocation,
/// so unsubscribing needs the same handle (or a clone of it).
pub type Listener<P> = Rc<dyn Fn(&P)>;

/// Wraps a closure into a [`Listener`] handle.
pub fn listener<P: 'static>(f: impl Fn(&P) + 'static) -> Listener<P> {
    Rc::new(f)
}

/// The pub/sub hub. See the module docs for delivery guarantees.
#[derive(Default)]
pub struct EventBus {
    topics: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topics.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `E`. Registering the same handle twice makes
    /// it fire twice per publish.
    pub fn subscribe<E: BusEvent>(&self, listener: &Listener<E::Payload>) {
        let mut topics = self.topics.borrow_mut();
        let slot = topics
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<Listener<E::Payload>>::new()));
        if let Some(listeners) = slot.downcast_mut::<Vec<Listener<E::Payload>>>() {
            listeners.push(Rc::clone(listener));
        }
    }

    /// Removes the earliest registration of `listener` for `E`. Unknown
    /// listeners are ignored.
    pub fn unsubscribe<E: BusEvent>(&self, listener: &Listener<E::Payload>) {
        let mut topics = self.topics.borrow_mut();
        let Some(listeners) = topics
            .get_mut(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_mut::<Vec<Listener<E::Payload>>>())
        else {
            return;
        };
        if let Some(pos) = listeners.iter().position(|l| same_listener(l, listener)) {
            listeners.remove(pos);
        }
    }

    /// Calls every listener currently registered for `E` with `payload`.
    ///
    /// Returns the number of listeners that were invoked.
    pub fn publish<E: BusEvent>(&self, payload: &E::Payload) -> usize {
        let snapshot = self.snapshot::<E>();
        trace!(event = E::NAME, listeners = snapshot.len(), "publish");
        for listener in &snapshot {
            listener(payload);
        }
        snapshot.len()
    }

    /// Number of registrations for `E`.
    pub fn listener_count<E: BusEvent>(&self) -> usize {
        self.topics
            .borrow()
            .get(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_ref::<Vec<Listener<E::Payload>>>())
            .map_or(0, Vec::len)
    }

    /// Subscribes and returns a [`Subscription`] that can later undo it.
    pub fn attach<E: BusEvent>(&self, listener: Listener<E::Payload>) -> Subscription {
        self.subscribe::<E>(&listener);
        Subscription {
            name: E::NAME,
            detach: Box::new(move |bus| bus.unsubscribe::<E>(&listener)),
        }
    }

    fn snapshot<E: BusEvent>(&self) -> Vec<Listener<E::Payload>> {
        self.topics
            .borrow()
            .get(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_ref::<Vec<Listener<E::Payload>>>())
            .cloned()
            .unwrap_or_default()
    }
}

fn same_listener<P: ?Sized>(a: &Rc<P>, b: &Rc<P>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A registration made through [`EventBus::attach`].
pub struct Subscription {
    name: &'static str,
    detach: Box<dyn FnOnce(&EventBus)>,
}

impl Subscription {
    /// Name of the event this subscription listens to.
    pub fn event_name(&self) -> &'static str {
        self.name
    }

    /// Unregisters the listener from `bus`.
    pub fn detach(self, bus: &EventBus) {
        (self.detach)(bus);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("event", &self.name).finish()
    }
}

/// The war selector changed value.
#[derive(Debug)]
pub struct SelectedWar;

impl BusEvent for SelectedWar {
    const NAME: &'static str = "selectedWar";
    type Payload = WarSelection;
}

/// A war record finished loading and its rosters are on screen.
#[derive(Debug)]
pub struct WarEntryLoaded;

impl BusEvent for WarEntryLoaded {
    const NAME: &'static str = "warEntry";
    type Payload = Arc<WarEntry>;
}
