use super::document::{ClickEvent, Document, ListenerId, Phase, Propagation};
use super::frame::FrameScheduler;
use super::geometry;
use super::lock::{LockMachine, LockState, Transition};
use super::motion::{AngularOscillator, MotionSmoother, OrbitAngles};
use super::pointer::{DeviceClass, PointerSource};
use super::Settings;
use dronectl::{Point, Ring};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Read model for consumers that poll the widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub marker: Point,
    pub pointer: Point,
    pub angles: OrbitAngles,
    pub lock: LockState,
    pub device: DeviceClass,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    /// The loop accepted the frame; orbit items should be redrawn.
    pub ran: bool,
    pub marker_moved: bool,
}

struct Engine {
    settings: Settings,
    pointer: PointerSource,
    smoother: MotionSmoother,
    oscillator: AngularOscillator,
    lock: LockMachine,
    scheduler: FrameScheduler,
}

impl Engine {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            pointer: PointerSource::new(settings.compact_breakpoint),
            smoother: MotionSmoother::new(settings.lerp_factor, settings.smoothing),
            oscillator: AngularOscillator::new(settings.inner_speed, settings.outer_speed),
            lock: LockMachine::new(settings.unlock_radius()),
            scheduler: FrameScheduler::new(),
        }
    }

    fn frame(&mut self, now: Instant) -> FrameUpdate {
        let Some(dt) = self.scheduler.tick(now) else {
            return FrameUpdate::default();
        };
        let marker_moved = self
            .smoother
            .step(dt, self.pointer.position(), self.lock.state());
        self.oscillator.step(dt);
        FrameUpdate {
            ran: true,
            marker_moved,
        }
    }

    fn click(&mut self, event: &ClickEvent) -> Transition {
        let transition = self
            .lock
            .handle_click(event, self.pointer.device(), self.smoother.marker());
        if transition.changed() {
            log::debug!(
                "click at ({}, {}) -> {}",
                event.position.x,
                event.position.y,
                self.lock.state()
            );
        }
        transition
    }

    fn apply(&mut self, settings: Settings) {
        self.settings = settings;
        self.pointer.set_breakpoint(settings.compact_breakpoint);
        self.smoother.retune(settings.lerp_factor, settings.smoothing);
        self.oscillator.retune(settings.inner_speed, settings.outer_speed);
        self.lock.set_unlock_radius(settings.unlock_radius());
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            marker: self.smoother.marker(),
            pointer: self.pointer.position(),
            angles: self.oscillator.angles(),
            lock: self.lock.state(),
            device: self.pointer.device(),
        }
    }
}

/// A drone cursor mounted on a [`Document`].
///
/// Mounting registers a capture-phase click listener and starts the frame
/// loop. Both are released by [`DroneCursor::unmount`], which also runs on
/// drop, so a widget can never outlive its listener or its loop.
pub struct DroneCursor {
    engine: Rc<RefCell<Engine>>,
    document: Rc<Document>,
    listener: Option<ListenerId>,
}

impl DroneCursor {
    pub fn mount(settings: Settings, document: Rc<Document>) -> Self {
        let engine = Rc::new(RefCell::new(Engine::new(settings)));

        let weak: Weak<RefCell<Engine>> = Rc::downgrade(&engine);
        let listener = document.add_listener(Phase::Capture, move |event| {
            if let Some(engine) = weak.upgrade() {
                engine.borrow_mut().click(event);
            }
            Propagation::Proceed
        });

        engine.borrow_mut().scheduler.start();
        log::info!("Drone cursor mounted (listener {})", listener);

        Self {
            engine,
            document,
            listener: Some(listener),
        }
    }

    /// Stops the frame loop and detaches the click listener. Idempotent.
    pub fn unmount(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        self.engine.borrow_mut().scheduler.stop();
        if !self.document.remove_listener(listener) {
            log::warn!("Click listener {} was already detached", listener);
        }
        log::info!("Drone cursor unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    /// Applies one display frame: smoother first, then the oscillator.
    pub fn frame(&self, now: Instant) -> FrameUpdate {
        self.engine.borrow_mut().frame(now)
    }

    pub fn pointer_moved(&self, position: Point) {
        if self.is_mounted() {
            self.engine.borrow_mut().pointer.move_to(position);
        }
    }

    /// Returns true if the viewport changed device class.
    pub fn viewport_resized(&self, width: f64) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let changed = self.engine.borrow_mut().pointer.resize(width);
        if changed {
            log::debug!("viewport {} px -> {:?}", width, self.device());
        }
        changed
    }

    /// Swaps tuning without resetting marker, angles or lock.
    pub fn reconfigure(&self, settings: Settings) {
        self.engine.borrow_mut().apply(settings);
    }

    pub fn settings(&self) -> Settings {
        self.engine.borrow().settings
    }

    pub fn marker(&self) -> Point {
        self.engine.borrow().smoother.marker()
    }

    pub fn lock_state(&self) -> LockState {
        self.engine.borrow().lock.state()
    }

    pub fn device(&self) -> DeviceClass {
        self.engine.borrow().pointer.device()
    }

    pub fn is_compact(&self) -> bool {
        self.device().is_compact()
    }

    pub fn angles(&self) -> OrbitAngles {
        self.engine.borrow().oscillator.angles()
    }

    /// Offset of a ring item from the marker.
    pub fn orbit_position(&self, ring: Ring, index: usize, total: usize) -> Point {
        let engine = self.engine.borrow();
        geometry::orbit_position(
            engine.oscillator.angles().get(ring),
            engine.settings.radius(ring),
            index,
            total,
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.borrow().snapshot()
    }
}

impl Drop for DroneCursor {
    fn drop(&mut self) {
        self.unmount();
    }
}
