use crate::config::{self, DroneConfig};
use crate::events::AppEvent;
use crate::sys::{server, ticker};
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Starts the socket server, the frame ticker and the config watcher on a
/// dedicated Tokio thread. They only talk to the app through `tx`.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    config: &DroneConfig,
) -> std::io::Result<()> {
    let rt = Runtime::new()?;
    let socket_path = config.socket_path.clone();
    let frame_rate = config.frame_rate;
    let config_path = config::get_config_path()
        .inspect_err(|e| log::warn!("Config hot reload disabled: {}", e))
        .ok();

    thread::Builder::new()
        .name("drone-services".into())
        .spawn(move || {
            rt.block_on(async {
                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        server::run_server(&socket_path, tx).await;
                    });
                }

                {
                    let tx = tx.clone();
                    tokio::spawn(ticker::run_ticker(frame_rate, tx));
                }

                if let Some(path) = config_path {
                    let tx = tx.clone();
                    tokio::spawn(config::run_async_watcher(path, tx));
                }

                std::future::pending::<()>().await;
            });
        })?;
    Ok(())
}
