//! Constants shared between the core library and the CLI.

/// Default on-disk layout under the operator's home directory.
pub mod paths {
    /// Directory under `$HOME` holding all nodeward state.
    pub const HOME_DIR: &str = ".nodeward";

    /// Global configuration file name.
    pub const GLOBAL_CONFIG_FILE: &str = "config.yml";

    /// User settings file name.
    pub const USER_SETTINGS_FILE: &str = "settings.yml";

    /// Password file name.
    pub const PASSWORD_FILE: &str = "password";

    /// Node account keystore directory name.
    pub const NODE_KEYSTORE_DIR: &str = "node-keys";

    /// Validator keystore directory name.
    pub const VALIDATOR_KEYSTORE_DIR: &str = "validator-keys";

    /// Datastore file name.
    pub const DATASTORE_FILE: &str = "data.db";
}

/// Well-known on-ledger contract names.
pub mod contracts {
    /// Registry contract resolving node addresses to node contracts.
    pub const NODE_REGISTRY: &str = "nodeRegistry";

    /// Per-node contract ABI name.
    pub const NODE_CONTRACT_ABI: &str = "nodeContract";
}

/// Container runtime constants.
pub mod runtime {
    /// Pinned container runtime API version.
    ///
    /// The handshake path is `/v{CONTAINER_API_VERSION}/version`. Daemons
    /// older than this reject the request and the connect fails.
    pub const CONTAINER_API_VERSION: &str = "1.41";

    /// Default container runtime endpoint.
    pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2375";
}

/// Ledger polling behavior.
pub mod ledger {
    use std::time::Duration;

    /// Interval between connection retry attempts.
    pub const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

    /// Initial delay between sync status polls.
    pub const SYNC_POLL_INITIAL: Duration = Duration::from_secs(1);

    /// Upper bound for the sync poll backoff.
    pub const SYNC_POLL_MAX: Duration = Duration::from_secs(30);

    /// Interval between storage contract deployment polls.
    pub const DEPLOY_POLL_INTERVAL: Duration = Duration::from_secs(2);
}

/// Publisher channel sizing.
pub mod messaging {
    /// Buffered events per topic before lagging subscribers drop messages.
    pub const TOPIC_CAPACITY: usize = 64;
}
