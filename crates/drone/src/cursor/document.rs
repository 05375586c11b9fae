//! Page-wide click dispatch.
//!
//! Listeners registered in the [`Phase::Capture`] phase run before any
//! [`Phase::Bubble`] listener, so element handlers that stop propagation
//! cannot hide a click from them.

use derive_more::{Display, From, Into};
use dronectl::{Point, Role};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub position: Point,
    pub shift: bool,
    /// Roles of the target and its ancestors, target first.
    pub path: Vec<Role>,
}

impl ClickEvent {
    pub fn new(position: Point, shift: bool, path: Vec<Role>) -> Self {
        Self {
            position,
            shift,
            path,
        }
    }

    /// Plain click on the empty page.
    pub fn at(position: Point) -> Self {
        Self::new(position, false, vec![Role::Canvas])
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Wraps the current target in a new innermost element.
    pub fn within(mut self, role: Role) -> Self {
        self.path.insert(0, role);
        self
    }

    /// True if the target or any ancestor handles the click itself.
    pub fn passes_through(&self) -> bool {
        self.path.iter().any(|role| role.passes_through())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Proceed,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ListenerId(u64);

type Handler = Rc<dyn Fn(&ClickEvent) -> Propagation>;

struct Listener {
    id: ListenerId,
    phase: Phase,
    handler: Handler,
}

#[derive(Default)]
pub struct Document {
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(
        &self,
        phase: Phase,
        handler: impl Fn(&ClickEvent) -> Propagation + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            phase,
            handler: Rc::new(handler),
        });
        id
    }

    /// Returns false if `id` was not registered (or was already removed).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn handlers(&self, phase: Phase) -> Vec<Handler> {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.phase == phase)
            .map(|l| l.handler.clone())
            .collect()
    }

    /// Runs capture listeners, then bubble listeners, in registration order,
    /// until one returns [`Propagation::Stop`]. Returns the number of
    /// handlers invoked.
    pub fn dispatch(&self, event: &ClickEvent) -> usize {
        // handlers are collected up front so they may add or remove listeners
        let handlers = self
            .handlers(Phase::Capture)
            .into_iter()
            .chain(self.handlers(Phase::Bubble));

        let mut invoked = 0;
        for handler in handlers {
            invoked += 1;
            if handler(event) == Propagation::Stop {
                break;
            }
        }
        invoked
    }
}
