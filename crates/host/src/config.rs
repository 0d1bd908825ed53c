use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

/// Optional file layer, `opcon/config.toml` under the platform config dir.
///
/// ```toml
/// # Print only events with this id; omit to print every event.
/// # The classic prototype wired 4242 here.
/// watch_event_id = 4242
/// publish_event_id = 1
/// queue_capacity = 64
/// banner = "console ready"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HostFileConfig {
    pub watch_event_id: Option<u16>,
    pub publish_event_id: Option<u16>,
    pub queue_capacity: Option<usize>,
    pub banner: Option<String>,
}

/// Resolved adapter configuration. Environment variables win over the file;
/// both are optional.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Only events with this id are printed; `None` prints all of them.
    pub watch_event_id: Option<u16>,
    /// Id stamped on events published for submitted lines.
    pub publish_event_id: u16,
    /// Dispatcher queue bound; `None` means unbounded.
    pub queue_capacity: Option<usize>,
    /// Line printed when the component starts.
    pub banner: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            watch_event_id: None,
            publish_event_id: 1,
            queue_capacity: None,
            banner: "console ready".to_string(),
        }
    }
}

impl HostConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(raw) = fs::read_to_string(&path) {
                    if let Ok(file_cfg) = toml::from_str::<HostFileConfig>(&raw) {
                        cfg.apply_file(file_cfg);
                    }
                }
            }
        }
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn apply_file(&mut self, file: HostFileConfig) {
        if file.watch_event_id.is_some() {
            self.watch_event_id = file.watch_event_id;
        }
        if let Some(id) = file.publish_event_id {
            self.publish_event_id = id;
        }
        if file.queue_capacity.is_some() {
            self.queue_capacity = file.queue_capacity;
        }
        if let Some(banner) = file.banner {
            self.banner = banner;
        }
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(v) = env::var("OPCON_WATCH_EVENT_ID") {
            let v = v.trim();
            self.watch_event_id = if v.eq_ignore_ascii_case("all") {
                None
            } else {
                Some(
                    v.parse()
                        .map_err(|e| anyhow::anyhow!("OPCON_WATCH_EVENT_ID: {e}"))?,
                )
            };
        }
        if let Ok(v) = env::var("OPCON_PUBLISH_EVENT_ID") {
            self.publish_event_id = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("OPCON_PUBLISH_EVENT_ID: {e}"))?;
        }
        if let Ok(v) = env::var("OPCON_QUEUE_CAPACITY") {
            let v = v.trim();
            self.queue_capacity = if v.eq_ignore_ascii_case("unbounded") {
                None
            } else {
                Some(
                    v.parse()
                        .map_err(|e| anyhow::anyhow!("OPCON_QUEUE_CAPACITY: {e}"))?,
                )
            };
        }
        if let Ok(v) = env::var("OPCON_BANNER") {
            self.banner = v;
        }
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".opcon").join("config.toml")
        } else {
            base.config_dir().join("opcon").join("config.toml")
        };
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_layer_overrides_defaults() {
        let file: HostFileConfig = toml::from_str(
            r#"
            watch_event_id = 4242
            queue_capacity = 8
            banner = "hello"
            "#,
        )
        .expect("parse");
        let mut cfg = HostConfig::default();
        cfg.apply_file(file);
        assert_eq!(cfg.watch_event_id, Some(4242));
        assert_eq!(cfg.publish_event_id, 1);
        assert_eq!(cfg.queue_capacity, Some(8));
        assert_eq!(cfg.banner, "hello");
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file: HostFileConfig = toml::from_str("").expect("parse");
        let mut cfg = HostConfig::default();
        cfg.apply_file(file);
        assert_eq!(cfg.watch_event_id, None);
        assert_eq!(cfg.publish_event_id, 1);
        assert_eq!(cfg.queue_capacity, None);
    }
}
