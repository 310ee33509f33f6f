//! Service subsystems wired up by the bootstrap.
//!
//! Each service owns its resources and releases them on drop, so a failed
//! bootstrap tears down whatever was already built by dropping the partial
//! context. Constructors that touch the outside world return `Result`;
//! constructors that only capture handles are infallible.

pub mod accounts;
pub mod beacon;
pub mod contracts;
pub mod datastore;
pub mod keys;
pub mod ledger;
pub mod passwords;
pub mod publisher;
pub mod runtime_client;

pub use accounts::AccountManager;
pub use beacon::BeaconClient;
pub use contracts::{Contract, ContractManager};
pub use datastore::Datastore;
pub use keys::KeyManager;
pub use ledger::{LedgerClient, SyncStatus};
pub use passwords::PasswordManager;
pub use publisher::{Event, Publisher};
pub use runtime_client::ContainerRuntimeClient;
