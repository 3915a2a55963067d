//! Per-user accrual account storage.

use soroban_sdk::{Address, Env};

use common::{registry, StakeAccount, TTL_EXTEND_TO, TTL_THRESHOLD};

use crate::{events, ACCOUNT};

pub fn load(env: &Env, user: &Address) -> StakeAccount {
    env.storage()
        .persistent()
        .get(&(ACCOUNT, user.clone()))
        .unwrap_or_default()
}

pub fn store(env: &Env, user: &Address, account: &StakeAccount) {
    let key = (ACCOUNT, user.clone());
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Registers `user` on first interaction and announces the new id.
pub fn register(env: &Env, user: &Address) -> u64 {
    let (id, is_new) = registry::register(env, user);
    if is_new {
        events::publish_user_registered(env, user.clone(), id);
    }
    id
}
