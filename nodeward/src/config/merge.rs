//! Precedence merge of configuration layers.
//!
//! `merge(base, over)` folds one higher-precedence layer over a lower one.
//! The operation is pure and total: any two documents merge, and the result
//! depends only on the inputs. A field set in `over` wins outright; an unset
//! field falls through to `base`. Presence is the only criterion, so an
//! explicitly set empty string overrides a non-empty lower value.

use super::document::{
    ChainConfig, ChainsSection, ClientOption, ClientSelection, LedgerSection, NodeConfig,
    NodeSection, RuntimeSection, UserParam,
};

/// Merge two layers, `over` taking precedence over `base`.
pub fn merge(base: NodeConfig, over: NodeConfig) -> NodeConfig {
    NodeConfig {
        ledger: merge_ledger(base.ledger, over.ledger),
        node: merge_node(base.node, over.node),
        chains: merge_chains(base.chains, over.chains),
        runtime: merge_runtime(base.runtime, over.runtime),
    }
}

fn merge_ledger(base: LedgerSection, over: LedgerSection) -> LedgerSection {
    LedgerSection {
        storage_address: over.storage_address.or(base.storage_address),
    }
}

fn merge_node(base: NodeSection, over: NodeSection) -> NodeSection {
    NodeSection {
        password_path: over.password_path.or(base.password_path),
        keystore_path: over.keystore_path.or(base.keystore_path),
        validator_keystore_path: over
            .validator_keystore_path
            .or(base.validator_keystore_path),
        datastore_path: over.datastore_path.or(base.datastore_path),
    }
}

fn merge_chains(base: ChainsSection, over: ChainsSection) -> ChainsSection {
    ChainsSection {
        eth1: merge_chain(base.eth1, over.eth1),
        eth2: merge_chain(base.eth2, over.eth2),
    }
}

fn merge_chain(base: ChainConfig, over: ChainConfig) -> ChainConfig {
    ChainConfig {
        provider: over.provider.or(base.provider),
        client: merge_selection(base.client, over.client),
    }
}

fn merge_selection(base: ClientSelection, over: ClientSelection) -> ClientSelection {
    ClientSelection {
        options: merge_options(base.options, over.options),
        selected: over.selected.or(base.selected),
        params: merge_user_params(base.params, over.params),
    }
}

/// Merge option catalogues by ID. Base order is preserved; an overlay entry
/// with a matching ID replaces the base entry field by field, and
/// overlay-only entries are appended in overlay order.
fn merge_options(base: Vec<ClientOption>, over: Vec<ClientOption>) -> Vec<ClientOption> {
    let mut merged: Vec<ClientOption> = base;
    for over_opt in over {
        match merged.iter_mut().find(|b| b.id == over_opt.id) {
            Some(existing) => {
                if !over_opt.name.is_empty() {
                    existing.name = over_opt.name;
                }
                if over_opt.image.is_some() {
                    existing.image = over_opt.image;
                }
                if !over_opt.params.is_empty() {
                    existing.params = over_opt.params;
                }
            }
            None => merged.push(over_opt),
        }
    }
    merged
}

/// Merge user parameter lists by environment key. The higher layer's value
/// wins for a shared key; base ordering is preserved and new keys append.
fn merge_user_params(base: Vec<UserParam>, over: Vec<UserParam>) -> Vec<UserParam> {
    let mut merged: Vec<UserParam> = base;
    for over_param in over {
        match merged.iter_mut().find(|b| b.env == over_param.env) {
            Some(existing) => existing.value = over_param.value,
            None => merged.push(over_param),
        }
    }
    merged
}

fn merge_runtime(base: RuntimeSection, over: RuntimeSection) -> RuntimeSection {
    RuntimeSection {
        endpoint: over.endpoint.or(base.endpoint),
    }
}
