//! Static tier table: lock duration and reward weight per tier.

use soroban_sdk::{contracttype, Env, Vec};

use crate::{VaultError, TIERS};

pub const SECONDS_PER_DAY: u64 = 86_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierConfig {
    pub lock_duration: u64,
    pub reward_weight: u32,
}

impl TierConfig {
    pub fn new(lock_days: u64, reward_weight: u32) -> Self {
        Self {
            lock_duration: lock_days.saturating_mul(SECONDS_PER_DAY),
            reward_weight,
        }
    }
}

/// 30 / 180 / 360 / 720 / 1460 days with weights 1 / 12 / 24 / 48 / 96.
pub fn default_tiers(env: &Env) -> Vec<TierConfig> {
    let mut tiers = Vec::new(env);
    tiers.push_back(TierConfig::new(30, 1));
    tiers.push_back(TierConfig::new(180, 12));
    tiers.push_back(TierConfig::new(360, 24));
    tiers.push_back(TierConfig::new(720, 48));
    tiers.push_back(TierConfig::new(1_460, 96));
    tiers
}

/// A table is valid when non-empty, every weight is at least 1, and both lock
/// duration and weight strictly increase from one tier to the next.
pub fn is_valid(tiers: &Vec<TierConfig>) -> bool {
    if tiers.is_empty() {
        return false;
    }
    let mut previous: Option<TierConfig> = None;
    for tier in tiers.iter() {
        if tier.reward_weight == 0 {
            return false;
        }
        if let Some(prev) = previous {
            if tier.lock_duration <= prev.lock_duration || tier.reward_weight <= prev.reward_weight
            {
                return false;
            }
        }
        previous = Some(tier);
    }
    true
}

pub fn all(env: &Env) -> Vec<TierConfig> {
    env.storage()
        .instance()
        .get(&TIERS)
        .unwrap_or(Vec::new(env))
}

pub fn get(env: &Env, tier: u32) -> Result<TierConfig, VaultError> {
    all(env).get(tier).ok_or(VaultError::InvalidTier)
}

pub fn store(env: &Env, tiers: &Vec<TierConfig>) {
    env.storage().instance().set(&TIERS, tiers);
}
