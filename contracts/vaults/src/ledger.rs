//! Per-(user, tier) deposit buckets.
//!
//! Buckets live in one persistent `Vec` per (user, tier). Every deposit appends
//! a new bucket; removal swaps the last bucket into the freed slot, so indices
//! are only meaningful within a single transaction.

use soroban_sdk::{contracttype, Address, Env, Vec};

use common::{TTL_EXTEND_TO, TTL_THRESHOLD};

use crate::BUCKETS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositBucket {
    pub deposited_value: i128,
    pub deposit_timestamp: u64,
    pub locked_until: u64,
}

impl DepositBucket {
    pub fn new(deposited_value: i128, now: u64, lock_duration: u64) -> Self {
        Self {
            deposited_value,
            deposit_timestamp: now,
            locked_until: now.saturating_add(lock_duration),
        }
    }

    pub fn is_locked(&self, now: u64) -> bool {
        now < self.locked_until
    }
}

fn buckets_key(user: &Address, tier: u32) -> (soroban_sdk::Symbol, Address, u32) {
    (BUCKETS, user.clone(), tier)
}

pub fn load(env: &Env, user: &Address, tier: u32) -> Vec<DepositBucket> {
    env.storage()
        .persistent()
        .get(&buckets_key(user, tier))
        .unwrap_or(Vec::new(env))
}

pub fn store(env: &Env, user: &Address, tier: u32, buckets: &Vec<DepositBucket>) {
    let key = buckets_key(user, tier);
    if buckets.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, buckets);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Appends `bucket` and returns its index.
pub fn push(buckets: &mut Vec<DepositBucket>, bucket: DepositBucket) -> u32 {
    buckets.push_back(bucket);
    buckets.len() - 1
}

/// Removes the bucket at `index` by moving the last bucket into its slot.
/// Returns the removed bucket, or `None` if `index` is out of range.
pub fn swap_remove(buckets: &mut Vec<DepositBucket>, index: u32) -> Option<DepositBucket> {
    let removed = buckets.get(index)?;
    if let Some(last) = buckets.pop_back() {
        if index < buckets.len() {
            buckets.set(index, last);
        }
    }
    Some(removed)
}

pub fn total_value(buckets: &Vec<DepositBucket>) -> i128 {
    buckets
        .iter()
        .fold(0i128, |sum, bucket| sum.saturating_add(bucket.deposited_value))
}
