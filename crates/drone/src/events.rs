use crate::cursor::ClickEvent;
use async_channel::Sender;
use dronectl::{Command, Point, Ring};
use std::time::Instant;

/// Read-only requests answered with one line of JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Status,
    Orbit {
        ring: Ring,
        index: usize,
        total: usize,
    },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    PointerMove(Point),
    Resize(f64),
    Click(ClickEvent),
    Frame(Instant),
    Query(Query, Sender<String>),
    ConfigReload,
    Quit,
}

impl AppEvent {
    /// `reply` receives the answer to status and orbit queries.
    pub fn from_command(command: Command, reply: Sender<String>) -> Self {
        match command {
            Command::Move(p) => AppEvent::PointerMove(p),
            Command::Resize(width) => AppEvent::Resize(width),
            Command::Click {
                position,
                shift,
                path,
            } => AppEvent::Click(ClickEvent::new(position, shift, path)),
            Command::Status => AppEvent::Query(Query::Status, reply),
            Command::Orbit { ring, index, total } => {
                AppEvent::Query(Query::Orbit { ring, index, total }, reply)
            }
            Command::Quit => AppEvent::Quit,
        }
    }
}
