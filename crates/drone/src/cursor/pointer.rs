use dronectl::Point;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Narrow, touch-class viewport.
    Compact,
    #[default]
    Regular,
}

impl DeviceClass {
    /// Compact when `width` is at most `breakpoint`, like `(max-width: 768px)`.
    pub fn from_width(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            Self::Compact
        } else {
            Self::Regular
        }
    }

    pub fn is_compact(self) -> bool {
        self == Self::Compact
    }
}

/// Latest pointer position and viewport class, as reported by the host.
#[derive(Debug, Clone)]
pub struct PointerSource {
    position: Point,
    viewport_width: Option<f64>,
    breakpoint: f64,
    device: DeviceClass,
}

impl PointerSource {
    pub fn new(breakpoint: f64) -> Self {
        Self {
            position: Point::default(),
            viewport_width: None,
            breakpoint,
            device: DeviceClass::default(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Returns true if the device class changed.
    pub fn resize(&mut self, width: f64) -> bool {
        self.viewport_width = Some(width);
        self.reclassify()
    }

    pub fn set_breakpoint(&mut self, breakpoint: f64) -> bool {
        self.breakpoint = breakpoint;
        self.reclassify()
    }

    fn reclassify(&mut self) -> bool {
        let Some(width) = self.viewport_width else {
            return false;
        };
        let device = DeviceClass::from_width(width, self.breakpoint);
        let changed = device != self.device;
        self.device = device;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::COMPACT_BREAKPOINT;

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert_eq!(DeviceClass::from_width(320.0, 768.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_width(768.0, 768.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_width(768.5, 768.0), DeviceClass::Regular);
    }

    #[test]
    fn test_regular_until_first_resize() {
        let source = PointerSource::new(COMPACT_BREAKPOINT);
        assert_eq!(source.device(), DeviceClass::Regular);
        assert_eq!(source.position(), Point::default());
    }

    #[test]
    fn test_resize_reclassifies() {
        let mut source = PointerSource::new(COMPACT_BREAKPOINT);
        assert!(source.resize(600.0));
        assert!(source.device().is_compact());
        assert!(!source.resize(700.0));
        assert!(source.resize(1920.0));
        assert!(!source.device().is_compact());
    }

    #[test]
    fn test_breakpoint_change_reclassifies_current_width() {
        let mut source = PointerSource::new(COMPACT_BREAKPOINT);
        assert!(!source.set_breakpoint(2000.0));
        source.resize(1024.0);
        assert!(source.device().is_compact());
        assert!(source.set_breakpoint(768.0));
        assert_eq!(source.device(), DeviceClass::Regular);
    }
}
