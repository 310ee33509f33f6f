//! Nodeward - node management core library.
//!
//! Resolves a layered configuration (global file, user file, CLI
//! invocation), expands capability requests over their dependency rules,
//! and bootstraps the service subsystems a staking node command needs.
//!
//! The typical entry sequence:
//!
//! ```ignore
//! let config = nodeward::config::resolve(&global_path, &user_path, &overrides)?;
//! let request = CapabilityRequest::for_capabilities(&[Capability::NodeContract]);
//! let bundle = ServiceProvider::bootstrap(&request, &config).await?;
//! ```

pub mod capability;
pub mod config;
pub mod logging;
pub mod provider;
pub mod services;

pub use capability::{Capability, CapabilityRequest, CapabilitySet};
pub use config::NodeConfig;
pub use provider::{ServiceBundle, ServiceProvider};

// Re-export the shared types so dependents need only this crate.
pub use nodeward_shared::constants;
pub use nodeward_shared::{Address, NodewardError, NodewardResult};
