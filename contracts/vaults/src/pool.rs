use soroban_sdk::Env;

use common::PoolState;

use crate::{VaultError, POOL};

pub fn load(env: &Env) -> Result<PoolState, VaultError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(VaultError::NotConfigured)
}

/// Loads the pool and advances it to the current ledger time.
///
/// The settled pool is only persisted by `store`, so a call that fails after
/// settling leaves storage untouched.
pub fn settled(env: &Env) -> Result<PoolState, VaultError> {
    let mut pool = load(env)?;
    pool.settle(env, env.ledger().timestamp());
    Ok(pool)
}

/// Loads the pool and settles it to exactly the current ledger time, pricing
/// the open partial step at the current rate. Used before the rate or step
/// duration changes.
pub fn closed(env: &Env) -> Result<PoolState, VaultError> {
    let mut pool = load(env)?;
    pool.close_step(env, env.ledger().timestamp());
    Ok(pool)
}

pub fn store(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
}
