pub mod app;
pub mod config;
pub mod cursor;
pub mod events;
pub mod sys;
