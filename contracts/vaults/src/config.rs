//! Instance-storage configuration and running totals.

use soroban_sdk::{Address, Env};

use crate::{
    penalty::EarlyWithdrawalParams, VaultError, ADMIN, DEPOSIT_TOKEN, EARLY_PARAMS, FEE_BPS,
    FEE_SINK, REWARD_TOKEN, SUPPLIED, TOTAL_DEPOSITED,
};

pub fn admin(env: &Env) -> Result<Address, VaultError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(VaultError::NotConfigured)
}

pub fn deposit_token(env: &Env) -> Result<Address, VaultError> {
    env.storage()
        .instance()
        .get(&DEPOSIT_TOKEN)
        .ok_or(VaultError::NotConfigured)
}

pub fn reward_token(env: &Env) -> Result<Address, VaultError> {
    env.storage()
        .instance()
        .get(&REWARD_TOKEN)
        .ok_or(VaultError::NotConfigured)
}

pub fn fee_sink(env: &Env) -> Result<Address, VaultError> {
    env.storage()
        .instance()
        .get(&FEE_SINK)
        .ok_or(VaultError::NotConfigured)
}

/// Standard withdrawal fee in basis points.
pub fn withdrawal_fee(env: &Env) -> u32 {
    env.storage().instance().get(&FEE_BPS).unwrap_or(0)
}

pub fn set_withdrawal_fee(env: &Env, fee_bps: u32) {
    env.storage().instance().set(&FEE_BPS, &fee_bps);
}

/// `None` while early withdrawal is disabled.
pub fn early_withdrawal(env: &Env) -> Option<EarlyWithdrawalParams> {
    env.storage().instance().get(&EARLY_PARAMS)
}

pub fn set_early_withdrawal(env: &Env, params: Option<EarlyWithdrawalParams>) {
    match params {
        Some(params) => env.storage().instance().set(&EARLY_PARAMS, &params),
        None => env.storage().instance().remove(&EARLY_PARAMS),
    }
}

/// Principal currently held for all depositors (unweighted).
pub fn total_deposited(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_DEPOSITED).unwrap_or(0)
}

pub fn set_total_deposited(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_DEPOSITED, &total);
}

/// Reward tokens minted so far to cover claim shortfalls.
pub fn cumulative_supplied(env: &Env) -> i128 {
    env.storage().instance().get(&SUPPLIED).unwrap_or(0)
}

pub fn set_cumulative_supplied(env: &Env, total: i128) {
    env.storage().instance().set(&SUPPLIED, &total);
}
