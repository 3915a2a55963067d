//! Reward-reserve accounting and shortfall minting.
//!
//! A pool pays rewards out of the reward-token balance it holds. When the
//! reward token is also the deposit token, the principal held for depositors is
//! excluded so rewards are never paid out of deposits. If the reserve cannot
//! cover a claim, the pool mints exactly the missing amount, which requires it
//! to be the admin of the reward token's Stellar Asset Contract.

use soroban_sdk::{token, Address, Env};

/// Reward tokens the pool can pay without minting.
pub fn reward_reserve(
    env: &Env,
    reward_token: &Address,
    deposit_token: &Address,
    principal_held: i128,
) -> i128 {
    let balance = token::Client::new(env, reward_token).balance(&env.current_contract_address());
    let reserved = if reward_token == deposit_token {
        principal_held
    } else {
        0
    };
    balance.saturating_sub(reserved).max(0)
}

/// Amount that must be minted before `amount` can be paid from `reserve`.
pub fn shortfall(amount: i128, reserve: i128) -> i128 {
    amount.saturating_sub(reserve).max(0)
}

/// True if `minter` administers the reward token and may therefore mint it.
pub fn is_minter(env: &Env, reward_token: &Address, minter: &Address) -> bool {
    token::StellarAssetClient::new(env, reward_token).admin() == *minter
}

/// Mints `amount` reward tokens to the calling contract.
pub fn mint_to_self(env: &Env, reward_token: &Address, amount: i128) {
    token::StellarAssetClient::new(env, reward_token).mint(&env.current_contract_address(), &amount);
}
