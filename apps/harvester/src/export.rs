//! JSON export of harvested results.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::errors::AppError;

const INDENT: &[u8] = b"    ";

/// Pretty-prints `value` with four-space indentation.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| AppError::Validation(format!("non UTF-8 JSON output: {e}")))
}

/// Writes `value` to `<dir>/<name>.json`, replacing any previous file.
pub async fn save_json<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, AppError> {
    let content = to_json_string(value)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{name}.json"));
    tokio::fs::write(&path, content).await?;
    info!("Saved {}", path.display());
    Ok(path)
}
