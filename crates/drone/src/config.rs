use crate::cursor::{
    COMPACT_BREAKPOINT, HIT_SLOP, INNER_RADIUS, INNER_SPEED, LERP_FACTOR, OUTER_RADIUS,
    OUTER_SPEED, REFERENCE_FRAME_RATE, Settings, SmoothingMode,
};
use directories::ProjectDirs;
use dronectl::SOCKET_PATH;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::events::AppEvent;
use async_channel::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DroneConfig {
    pub lerp_factor: f64,
    pub smoothing: SmoothingMode,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner_speed: f64,
    pub outer_speed: f64,
    pub hit_slop: f64,
    pub compact_breakpoint: f64,
    /// Frames per second of the daemon ticker. Read at startup only.
    pub frame_rate: f64,
    pub socket_path: PathBuf,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            lerp_factor: LERP_FACTOR,
            smoothing: SmoothingMode::default(),
            inner_radius: INNER_RADIUS,
            outer_radius: OUTER_RADIUS,
            inner_speed: INNER_SPEED,
            outer_speed: OUTER_SPEED,
            hit_slop: HIT_SLOP,
            compact_breakpoint: COMPACT_BREAKPOINT,
            frame_rate: REFERENCE_FRAME_RATE,
            socket_path: PathBuf::from(SOCKET_PATH),
        }
    }
}

impl DroneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        };

        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !positive(self.lerp_factor) || self.lerp_factor >= 1.0 {
            return invalid("lerp_factor", "must be strictly between 0 and 1");
        }
        if !positive(self.inner_radius) || !positive(self.outer_radius) {
            return invalid("radius", "must be positive");
        }
        if !self.inner_speed.is_finite() || !self.outer_speed.is_finite() {
            return invalid("speed", "must be finite");
        }
        if !non_negative(self.hit_slop) {
            return invalid("hit_slop", "must not be negative");
        }
        if !non_negative(self.compact_breakpoint) {
            return invalid("compact_breakpoint", "must not be negative");
        }
        if !positive(self.frame_rate) {
            return invalid("frame_rate", "must be positive");
        }
        Ok(())
    }

    pub fn cursor_settings(&self) -> Settings {
        Settings {
            lerp_factor: self.lerp_factor,
            smoothing: self.smoothing,
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            inner_speed: self.inner_speed,
            outer_speed: self.outer_speed,
            hit_slop: self.hit_slop,
            compact_breakpoint: self.compact_breakpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "drone").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn from_sources(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<DroneConfig, ConfigError> {
    let config: DroneConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config() -> Result<DroneConfig, ConfigError> {
    let config_path = get_config_path()?;

    from_sources(
        config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(config::Environment::with_prefix("DRONE").try_parsing(true)),
    )
}

pub fn load_or_default() -> DroneConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            DroneConfig::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

type WatchEvents = Receiver<notify::Result<notify::Event>>;

fn watch_dir(dir: &Path) -> Result<(RecommendedWatcher, WatchEvents), ConfigError> {
    fs_err::create_dir_all(dir).map_err(notify::Error::io)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

/// Sends [`AppEvent::ConfigReload`] whenever `config_path` is written,
/// created or removed. Returns when the receiving side goes away.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent() else {
        return;
    };

    // the watcher stops when dropped, keep it for the whole loop
    let (_watcher, events) = match watch_dir(config_dir) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), e);
            return;
        }
    };

    while let Ok(res) = events.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                log::debug!("config change: {:?}", event.kind);
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Config watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<DroneConfig, ConfigError> {
        from_sources(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    #[test]
    fn test_smoothing_mode_deserialization() {
        let cases = vec![
            ("\"per-frame\"", SmoothingMode::PerFrame),
            ("\"Per-Frame\"", SmoothingMode::PerFrame),
            ("\"frame\"", SmoothingMode::PerFrame),
            ("\"time-scaled\"", SmoothingMode::TimeScaled),
            ("\"TIME\"", SmoothingMode::TimeScaled),
        ];

        for (json, expected) in cases {
            let deserialized: SmoothingMode = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<SmoothingMode>("\"eased\"").is_err());
    }

    #[test]
    fn test_empty_file_gives_reference_values() {
        let config = from_toml("").unwrap();
        assert_eq!(config, DroneConfig::default());

        let settings = config.cursor_settings();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.unlock_radius(), 135.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = from_toml(
            r#"
            outer_radius = 150
            smoothing = "time-scaled"
            socket_path = "/run/user/1000/drone.sock"
            "#,
        )
        .unwrap();

        assert_eq!(config.outer_radius, 150.0);
        assert_eq!(config.smoothing, SmoothingMode::TimeScaled);
        assert_eq!(config.socket_path, PathBuf::from("/run/user/1000/drone.sock"));
        assert_eq!(config.lerp_factor, LERP_FACTOR);
        assert_eq!(config.cursor_settings().unlock_radius(), 165.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for toml in [
            "lerp_factor = 1.0",
            "lerp_factor = 0",
            "inner_radius = -5",
            "hit_slop = -1",
            "frame_rate = 0",
        ] {
            assert!(
                matches!(from_toml(toml), Err(ConfigError::Invalid { .. })),
                "accepted: {toml}"
            );
        }
    }

    #[test]
    fn test_only_config_file_events_trigger_reload() {
        use notify::event::{CreateKind, DataChange, ModifyKind};

        let path = PathBuf::from("/home/u/.config/drone/config.toml");
        let modify = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)));

        assert!(touches_config(&modify.clone().add_path(path.clone()), &path));
        assert!(touches_config(
            &notify::Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone()),
            &path
        ));
        assert!(!touches_config(
            &modify.add_path(PathBuf::from("/home/u/.config/drone/other.toml")),
            &path
        ));
        assert!(!touches_config(
            &notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
                .add_path(path.clone()),
            &path
        ));
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        assert_eq!(from_toml(DEFAULT_CONFIG).unwrap(), DroneConfig::default());
    }
}
