use super::document::ClickEvent;
use super::pointer::DeviceClass;
use dronectl::Point;
use serde::Serialize;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }
}

/// What a click did to the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Compact viewport; clicks never touch the lock.
    Disabled,
    /// The target handles the click itself.
    PassThrough,
    Lock,
    Unlock,
    /// Locked click outside the orbit circle.
    Hold,
}

impl Transition {
    pub fn changed(self) -> bool {
        matches!(self, Self::Lock | Self::Unlock)
    }
}

/// Sole writer of the lock state.
#[derive(Debug, Clone)]
pub struct LockMachine {
    state: LockState,
    unlock_radius: f64,
}

impl LockMachine {
    pub fn new(unlock_radius: f64) -> Self {
        Self {
            state: LockState::Unlocked,
            unlock_radius,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn set_unlock_radius(&mut self, unlock_radius: f64) {
        self.unlock_radius = unlock_radius;
    }

    pub fn handle_click(
        &mut self,
        event: &ClickEvent,
        device: DeviceClass,
        marker: Point,
    ) -> Transition {
        let transition = self.decide(event, device, marker);
        match transition {
            Transition::Lock => self.state = LockState::Locked,
            Transition::Unlock => self.state = LockState::Unlocked,
            _ => {}
        }
        transition
    }

    fn decide(&self, event: &ClickEvent, device: DeviceClass, marker: Point) -> Transition {
        if device.is_compact() {
            return Transition::Disabled;
        }
        if event.passes_through() {
            return Transition::PassThrough;
        }

        match self.state {
            LockState::Unlocked => Transition::Lock,
            LockState::Locked if event.shift => Transition::Unlock,
            LockState::Locked if event.position.distance(marker) <= self.unlock_radius => {
                Transition::Unlock
            }
            LockState::Locked => Transition::Hold,
        }
    }
}
