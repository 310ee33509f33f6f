//! Layered configuration resolution.
//!
//! ## Architecture
//!
//! Three document layers are resolved into one effective configuration:
//!
//! ```text
//! global file (config.yml) ──┐
//! user file (settings.yml) ──┼──→ merge (lowest to highest) ──→ NodeConfig
//! invocation (CLI flags) ────┘
//! ```
//!
//! Each layer is an ordinary [`NodeConfig`] with every leaf optional. A field
//! set in a higher layer wins; an unset field falls through to the layer
//! below. Loading a missing file yields the empty document, so resolution
//! works with any subset of the three sources present.

pub mod document;
pub mod invocation;
pub mod loader;
pub mod merge;

pub use document::{
    ChainConfig, ClientOption, ClientParam, ClientSelection, NodeConfig, UserParam, default_home,
};
pub use invocation::InvocationOverrides;
pub use loader::load_file;
pub use merge::merge;

use std::path::Path;

use nodeward_shared::NodewardResult;

/// Resolve the effective configuration from the three layers.
///
/// Precedence, lowest to highest: global file, user file, invocation
/// overrides. Missing files contribute empty documents; a malformed file is
/// a fatal parse error naming the offending path.
pub fn resolve(
    global_path: &Path,
    user_path: &Path,
    overrides: &InvocationOverrides,
) -> NodewardResult<NodeConfig> {
    let global = load_file(global_path)?;
    let user = load_file(user_path)?;
    let invocation = overrides.to_document();

    let merged = merge(merge(global, user), invocation);
    Ok(merged)
}
