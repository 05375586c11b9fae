use crate::events::AppEvent;
use async_channel::Sender;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

pub fn frame_period(frame_rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / frame_rate.max(1.0))
}

/// Stands in for the display refresh: one [`AppEvent::Frame`] per period
/// until the app stops listening.
pub async fn run_ticker(frame_rate: f64, tx: Sender<AppEvent>) {
    let mut interval = time::interval(frame_period(frame_rate));
    // a late frame is dropped, not replayed in a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let at = interval.tick().await;
        if tx.send(AppEvent::Frame(at.into_std())).await.is_err() {
            break;
        }
    }
}
