//! Capability set and dependency expansion.
//!
//! A bootstrap request names the capabilities the caller wants. Many
//! capabilities only function on top of others, so the request is closed
//! over a declarative implication table before any initialization runs:
//! repeatedly add every capability implied by a present one until nothing
//! changes. The table is small and acyclic, so the fixed point is reached
//! in a handful of passes.

use std::fmt;

/// One initializable subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Capability {
    /// Local key/value datastore.
    Datastore = 0,
    /// Passphrase manager.
    PasswordManager = 1,
    /// Node account keystore.
    AccountManager = 2,
    /// Validator keystore.
    KeyManager = 3,
    /// Ledger RPC client (dialed, handshake not yet required).
    LedgerClient = 4,
    /// Ledger client with a completed handshake.
    LedgerConnected = 5,
    /// Ledger client reporting a synced chain head.
    LedgerSynced = 6,
    /// On-ledger contract and ABI manager.
    ContractManager = 7,
    /// Storage contract confirmed deployed at its configured address.
    StoragePresence = 8,
    /// This node's address resolved through the registry.
    NodeContractAddress = 9,
    /// This node's contract bound and callable.
    NodeContract = 10,
    /// In-process event publisher.
    Publisher = 11,
    /// Consensus layer client.
    BeaconClient = 12,
    /// Container runtime daemon client.
    ContainerRuntime = 13,
}

impl Capability {
    /// Every capability, in stage order.
    pub const ALL: [Capability; 14] = [
        Capability::Datastore,
        Capability::PasswordManager,
        Capability::AccountManager,
        Capability::KeyManager,
        Capability::LedgerClient,
        Capability::LedgerConnected,
        Capability::LedgerSynced,
        Capability::ContractManager,
        Capability::StoragePresence,
        Capability::NodeContractAddress,
        Capability::NodeContract,
        Capability::Publisher,
        Capability::BeaconClient,
        Capability::ContainerRuntime,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Stable display name.
    pub fn name(self) -> &'static str {
        match self {
            Capability::Datastore => "datastore",
            Capability::PasswordManager => "password-manager",
            Capability::AccountManager => "account-manager",
            Capability::KeyManager => "key-manager",
            Capability::LedgerClient => "ledger-client",
            Capability::LedgerConnected => "ledger-connected",
            Capability::LedgerSynced => "ledger-synced",
            Capability::ContractManager => "contract-manager",
            Capability::StoragePresence => "storage-presence",
            Capability::NodeContractAddress => "node-contract-address",
            Capability::NodeContract => "node-contract",
            Capability::Publisher => "publisher",
            Capability::BeaconClient => "beacon-client",
            Capability::ContainerRuntime => "container-runtime",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dependency implications. A present left-hand capability pulls in every
/// right-hand capability during expansion.
const IMPLICATIONS: &[(Capability, &[Capability])] = &[
    (Capability::BeaconClient, &[Capability::Publisher]),
    (Capability::NodeContract, &[Capability::NodeContractAddress]),
    (
        Capability::NodeContractAddress,
        &[Capability::AccountManager, Capability::ContractManager],
    ),
    (Capability::ContractManager, &[Capability::LedgerClient]),
    (Capability::LedgerSynced, &[Capability::LedgerClient]),
    (Capability::AccountManager, &[Capability::PasswordManager]),
    (Capability::KeyManager, &[Capability::PasswordManager]),
];

/// A set of capabilities, one bit per [`Capability`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    /// Build a set from a slice of capabilities.
    pub fn of(caps: &[Capability]) -> Self {
        caps.iter().copied().collect()
    }

    pub fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    pub fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when every capability in `other` is present in `self`.
    pub fn is_superset(self, other: CapabilitySet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Iterate the present capabilities in stage order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |cap| self.contains(*cap))
    }

    /// Close the set over the implication table.
    ///
    /// Idempotent: expanding an already expanded set changes nothing.
    pub fn expand(self) -> CapabilitySet {
        let mut current = self;
        loop {
            let mut next = current;
            for (source, implied) in IMPLICATIONS {
                if current.contains(*source) {
                    for cap in *implied {
                        next.insert(*cap);
                    }
                }
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::EMPTY;
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Capability::name)).finish()
    }
}

/// What a caller asks the bootstrap for.
#[derive(Clone, Debug, Default)]
pub struct CapabilityRequest {
    /// Directly requested capabilities, expanded before initialization.
    pub capabilities: CapabilitySet,
    /// Contract definitions to fetch once the contract manager is up.
    pub load_contracts: Vec<String>,
    /// ABI definitions to fetch once the contract manager is up.
    pub load_abis: Vec<String>,
}

impl CapabilityRequest {
    /// Request an explicit capability set with no remote loads.
    pub fn for_capabilities(caps: &[Capability]) -> Self {
        Self {
            capabilities: CapabilitySet::of(caps),
            ..Default::default()
        }
    }

    /// The full capability closure for this request.
    ///
    /// A non-empty load list requires the contract manager even when no
    /// capability was requested explicitly.
    pub fn expand(&self) -> CapabilitySet {
        let mut caps = self.capabilities;
        if !self.load_contracts.is_empty() || !self.load_abis.is_empty() {
            caps.insert(Capability::ContractManager);
        }
        caps.expand()
    }
}
