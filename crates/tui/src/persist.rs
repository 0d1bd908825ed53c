use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SavedState {
    pub history: Vec<String>,
}

fn data_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("opcon"))
}

pub fn log_dir() -> Option<PathBuf> {
    data_dir().map(|d| d.join("logs"))
}

fn state_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("ui_state.json"))
}

pub fn load_history() -> Result<Vec<String>> {
    let Some(path) = state_path() else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read(&path).with_context(|| format!("read state file: {}", path.display()))?;
    let state: SavedState = serde_json::from_slice(&data).with_context(|| "parse state json")?;
    Ok(state.history)
}

pub fn save_history(history: &[String]) -> Result<()> {
    let Some(path) = state_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let state = SavedState {
        history: history.to_vec(),
    };
    let data = serde_json::to_vec_pretty(&state)?;
    let mut tmp = path.clone();
    tmp.set_extension("json.tmp");
    {
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("create tmp: {}", tmp.display()))?;
        f.write_all(&data)?;
        f.flush()?;
    }
    fs::rename(tmp, &path).with_context(|| format!("persist state to {}", path.display()))?;
    Ok(())
}
