//! Hot reload of the YAML configuration file
//!
//! The parent directory is watched rather than the file itself: editors that
//! save through a temp file and a rename replace the file's inode, and a
//! watch on the old inode goes quiet after the first save.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Quiet period after a change before the file is re-read
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Delivers validated configurations whenever the file changes
///
/// Invalid edits are logged and dropped; the running joystick and character
/// keep their previous configuration. Saves that leave the parsed
/// configuration unchanged are not delivered.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Load `config_path` and start watching it
    ///
    /// Fails if the initial file is missing or invalid. Must be called from
    /// within a tokio runtime.
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<(Self, AppConfig)> {
        let config_path = config_path.into();

        let initial = AppConfig::load(&config_path)
            .await
            .context("Failed to load initial config")?;

        let file_name = config_path
            .file_name()
            .map(OsString::from)
            .with_context(|| format!("Config path has no file name: {}", config_path.display()))?;
        let dir = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // notify calls back on its own thread; an unbounded send never blocks it
        let (change_tx, change_rx) = mpsc::unbounded_channel::<()>();
        let (tx, rx) = mpsc::channel(10);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if is_change_to(&event, &file_name) {
                        debug!("Config file changed: {:?} {:?}", event.kind, event.paths);
                        let _ = change_tx.send(());
                    }
                }
                Err(e) => error!("Watch error: {}", e),
            }
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", dir.display()))?;

        tokio::spawn(reload_task(config_path.clone(), initial.clone(), change_rx, tx));

        info!("Config file watcher started for: {}", config_path.display());

        Ok((Self { _watcher: watcher, rx }, initial))
    }

    /// Wait for the next accepted configuration
    ///
    /// Returns `None` once the watcher has shut down.
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}

/// Whether `event` creates, rewrites or renames onto the watched file name
fn is_change_to(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

/// Coalesce bursts of change events into one reload each
async fn reload_task(
    config_path: PathBuf,
    mut current: AppConfig,
    mut changes: mpsc::UnboundedReceiver<()>,
    tx: mpsc::Sender<AppConfig>,
) {
    while changes.recv().await.is_some() {
        tokio::time::sleep(SETTLE_DELAY).await;
        while changes.try_recv().is_ok() {}

        match load_quietly(&config_path).await {
            Some(config) if config == current => {
                debug!("Config file saved without changes");
            }
            Some(config) => {
                info!("Configuration reloaded");
                current = config.clone();
                if tx.send(config).await.is_err() {
                    debug!("Config receiver dropped, stopping reload task");
                    return;
                }
            }
            None => {}
        }
    }
}

async fn load_quietly(path: &Path) -> Option<AppConfig> {
    match AppConfig::load(path).await {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to reload config (keeping old config): {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BASE_150: &str = "joystick:\n  base_diameter: 150\n  stick_diameter: 60\n";
    const BASE_200: &str = "joystick:\n  base_diameter: 200\n  stick_diameter: 60\n";
    const BASE_250: &str = "joystick:\n  base_diameter: 250\n  stick_diameter: 60\n";

    async fn next_within(watcher: &mut ConfigWatcher, secs: u64) -> Option<AppConfig> {
        tokio::time::timeout(Duration::from_secs(secs), watcher.next_config())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_config_watcher_reloads_joystick() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("touchstick.yaml");
        fs::write(&config_path, BASE_150)?;

        let (mut watcher, config) = ConfigWatcher::new(&config_path).await?;
        assert_eq!(config.joystick.max_distance(), 45.0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(&config_path, BASE_200)?;

        let reloaded = next_within(&mut watcher, 2).await.expect("reloaded config");
        assert_eq!(reloaded.joystick.max_distance(), 70.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_follows_rename_saves() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("touchstick.yaml");
        let staging = temp_dir.path().join("touchstick.yaml.swp");
        fs::write(&config_path, BASE_150)?;

        let (mut watcher, _) = ConfigWatcher::new(&config_path).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Two editor-style saves; the second lands on a replaced inode
        fs::write(&staging, BASE_200)?;
        fs::rename(&staging, &config_path)?;
        let first = next_within(&mut watcher, 2).await.expect("config after first save");
        assert_eq!(first.joystick.max_distance(), 70.0);

        fs::write(&staging, BASE_250)?;
        fs::rename(&staging, &config_path)?;
        let second = next_within(&mut watcher, 2).await.expect("config after second save");
        assert_eq!(second.joystick.max_distance(), 95.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_skips_invalid_edit() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("touchstick.yaml");
        fs::write(&config_path, BASE_150)?;

        let (mut watcher, _) = ConfigWatcher::new(&config_path).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&config_path, "joystick:\n  stick_diameter: 500\n")?;
        tokio::time::sleep(Duration::from_millis(400)).await;
        fs::write(&config_path, BASE_200)?;

        let reloaded = next_within(&mut watcher, 2).await.expect("valid config after fix");
        assert_eq!(reloaded.joystick.max_distance(), 70.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_ignores_other_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("touchstick.yaml");
        fs::write(&config_path, BASE_150)?;

        let (mut watcher, _) = ConfigWatcher::new(&config_path).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp_dir.path().join("other.yaml"), BASE_200)?;
        assert!(next_within(&mut watcher, 1).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_rejects_invalid_initial_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("touchstick.yaml");
        fs::write(&config_path, "joystick:\n  stick_diameter: 500\n")?;

        assert!(ConfigWatcher::new(&config_path).await.is_err());
        Ok(())
    }
}
