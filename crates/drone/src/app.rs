use crate::config::{self, DroneConfig};
use crate::cursor::{Document, DroneCursor};
use crate::events::{AppEvent, Query};
use async_channel::Receiver;
use std::ops::ControlFlow;
use std::rc::Rc;

/// Owns the mounted widget and applies events to it on the main thread.
pub struct App {
    pub cursor: DroneCursor,
    pub document: Rc<Document>,
}

impl App {
    pub fn new(config: &DroneConfig) -> Self {
        let document = Rc::new(Document::new());
        let cursor = DroneCursor::mount(config.cursor_settings(), document.clone());
        Self { cursor, document }
    }

    pub fn run(mut self, rx: Receiver<AppEvent>) {
        while let Ok(event) = rx.recv_blocking() {
            if self.update(event).is_break() {
                break;
            }
        }
        self.cursor.unmount();
    }

    pub fn update(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Frame(now) => {
                self.cursor.frame(now);
            }
            AppEvent::PointerMove(point) => self.cursor.pointer_moved(point),
            AppEvent::Resize(width) => {
                self.cursor.viewport_resized(width);
            }
            AppEvent::Click(click) => {
                self.document.dispatch(&click);
            }
            AppEvent::Query(query, reply) => {
                let answer = self.answer(query).unwrap_or_else(|e| {
                    log::error!("Failed to encode reply: {}", e);
                    format!("error: {}", e)
                });
                if reply.try_send(answer).is_err() {
                    log::warn!("Client left before {:?} was answered", query);
                }
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.cursor.reconfigure(new_config.cursor_settings());
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppEvent::Quit => {
                self.cursor.unmount();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn answer(&self, query: Query) -> serde_json::Result<String> {
        match query {
            Query::Status => serde_json::to_string(&self.cursor.snapshot()),
            Query::Orbit { ring, index, total } => {
                serde_json::to_string(&self.cursor.orbit_position(ring, index, total))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{ClickEvent, LockState};
    use dronectl::{Point, Ring};
    use std::time::{Duration, Instant};

    fn ask(app: &mut App, query: Query) -> serde_json::Value {
        let (tx, rx) = async_channel::bounded(1);
        assert!(app.update(AppEvent::Query(query, tx)).is_continue());
        serde_json::from_str(&rx.try_recv().unwrap()).unwrap()
    }

    #[test]
    fn test_events_drive_the_widget() {
        let mut app = App::new(&DroneConfig::default());
        let t0 = Instant::now();

        app.update(AppEvent::Resize(1440.0));
        app.update(AppEvent::PointerMove(Point::new(100.0, 0.0)));
        app.update(AppEvent::Frame(t0));
        app.update(AppEvent::Frame(t0 + Duration::from_millis(500)));

        let status = ask(&mut app, Query::Status);
        assert_eq!(status["lock"], "unlocked");
        assert_eq!(status["device"], "regular");
        assert_eq!(status["pointer"]["x"], 100.0);
        assert!(status["marker"]["x"].as_f64().unwrap() > 0.0);
        assert!(status["angles"]["inner"].as_f64().unwrap() > 0.0);

        app.update(AppEvent::Click(ClickEvent::at(Point::new(600.0, 600.0))));
        assert_eq!(app.cursor.lock_state(), LockState::Locked);
        assert_eq!(ask(&mut app, Query::Status)["lock"], "locked");
    }

    #[test]
    fn test_orbit_query() {
        let mut app = App::new(&DroneConfig::default());
        let offset = ask(
            &mut app,
            Query::Orbit {
                ring: Ring::Outer,
                index: 0,
                total: 5,
            },
        );
        assert_eq!(offset["x"], 120.0);
        assert_eq!(offset["y"], 0.0);
    }

    #[test]
    fn test_quit_unmounts() {
        let mut app = App::new(&DroneConfig::default());
        assert_eq!(app.document.listener_count(), 1);
        assert!(app.update(AppEvent::Quit).is_break());
        assert!(!app.cursor.is_mounted());
        assert_eq!(app.document.listener_count(), 0);
    }

    #[test]
    fn test_run_stops_on_quit_or_closed_channel() {
        let (tx, rx) = async_channel::unbounded();
        let pending = rx.clone();
        tx.send_blocking(AppEvent::PointerMove(Point::new(1.0, 1.0)))
            .unwrap();
        tx.send_blocking(AppEvent::Quit).unwrap();
        tx.send_blocking(AppEvent::Resize(100.0)).unwrap();
        App::new(&DroneConfig::default()).run(rx);
        assert_eq!(pending.len(), 1);

        let (tx, rx) = async_channel::unbounded::<AppEvent>();
        drop(tx);
        App::new(&DroneConfig::default()).run(rx);
    }
}
