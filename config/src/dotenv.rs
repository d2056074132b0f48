//! Parse `.env` file into key-value map (no overwrite of existing env here; applied in lib).

use std::collections::HashMap;
use std::path::Path;

/// Path of `.env` to load: `override_dir` if given, else current directory.
fn dotenv_path(override_dir: Option<&Path>) -> Option<std::path::PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Minimal .env parser: lines as KEY=VALUE, skip empty and # comments, trim key and value.
/// Double-quoted values support `\"`; single-quoted values are stripped, no escape.
fn parse_dotenv(content: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let key = k.trim().to_string();
        let value = v.trim().to_string();
        let value = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            value[1..value.len() - 1].replace("\\\"", "\"")
        } else {
            value
        };
        let value = value
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .map(str::to_string)
            .unwrap_or(value);
        if !key.is_empty() {
            out.insert(key, value);
        }
    }
    out
}

/// Load `.env` from override_dir or current directory into a map. Missing file returns empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let path = match dotenv_path(override_dir) {
        Some(p) => p,
        None => return Ok(HashMap::new()),
    };
    let content = std::fs::read_to_string(&path)?;
    Ok(parse_dotenv(&content))
}
