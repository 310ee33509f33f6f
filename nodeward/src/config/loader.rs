//! Configuration file loading.

use std::io::ErrorKind;
use std::path::Path;

use nodeward_shared::{NodewardError, NodewardResult};

use super::document::NodeConfig;

/// Load one configuration layer from a YAML file.
///
/// A missing file is not an error and yields the empty document, so any
/// subset of the configured files may exist. A file that exists but cannot
/// be read or parsed is fatal and the error names the path.
pub fn load_file(path: &Path) -> NodewardResult<NodeConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(NodeConfig::default()),
        Err(e) => {
            return Err(NodewardError::Storage(format!(
                "could not read {}: {e}",
                path.display()
            )));
        }
    };

    // An empty or comment-only file deserializes to a null document.
    let parsed: Option<NodeConfig> =
        serde_yaml::from_str(&raw).map_err(|e| NodewardError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!(path = %path.display(), "Loaded configuration layer");
    Ok(parsed.unwrap_or_default())
}
