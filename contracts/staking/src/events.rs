#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use common::AdminTier;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when emissions are scheduled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub start_time: u64,
    pub emission_per_step: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartTimeSetEvent {
    pub old_start: u64,
    pub new_start: u64,
    pub timestamp: u64,
}

/// Fired the first time an address stakes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub staker: Address,
    pub user_id: u64,
    pub timestamp: u64,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user takes stake back out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub fee: i128,
    pub timestamp: u64,
}

/// Fired when a user claims accumulated rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a claim shortfall is covered by minting.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsSuppliedEvent {
    pub minted: i128,
    pub cumulative_supplied: i128,
    pub timestamp: u64,
}

/// Fired when the admin changes the emission rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub users_settled: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepDurationSetEvent {
    pub step_duration: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalFeeSetEvent {
    pub fee_bps: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTierChangedEvent {
    pub caller: Address,
    pub target: Address,
    /// Rank of the granted tier (`AdminTier::rank`); `None` on demotion.
    pub tier: Option<u32>,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, start_time: u64, emission_per_step: i128) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            start_time,
            emission_per_step,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_start_time_set(env: &Env, old_start: u64, new_start: u64) {
    env.events().publish(
        (symbol_short!("START"),),
        StartTimeSetEvent {
            old_start,
            new_start,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_user_registered(env: &Env, staker: Address, user_id: u64) {
    env.events().publish(
        (symbol_short!("USER_REG"), staker.clone()),
        UserRegisteredEvent {
            staker,
            user_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_supplied(env: &Env, minted: i128, cumulative_supplied: i128) {
    env.events().publish(
        (symbol_short!("SUPPLY"),),
        RewardsSuppliedEvent {
            minted,
            cumulative_supplied,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_set(env: &Env, old_rate: i128, new_rate: i128, users_settled: u32) {
    env.events().publish(
        (symbol_short!("RWD_RATE"),),
        RewardRateSetEvent {
            old_rate,
            new_rate,
            users_settled,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_step_duration_set(env: &Env, step_duration: u64) {
    env.events().publish(
        (symbol_short!("STEP_DUR"),),
        StepDurationSetEvent {
            step_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawal_fee_set(env: &Env, fee_bps: u32) {
    env.events().publish(
        (symbol_short!("FEE_SET"),),
        WithdrawalFeeSetEvent {
            fee_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_promoted(env: &Env, caller: Address, target: Address, tier: AdminTier) {
    env.events().publish(
        (symbol_short!("ADM_PROM"), target.clone()),
        AdminTierChangedEvent {
            caller,
            target,
            tier: Some(tier.rank()),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_demoted(env: &Env, caller: Address, target: Address) {
    env.events().publish(
        (symbol_short!("ADM_DEM"), target.clone()),
        AdminTierChangedEvent {
            caller,
            target,
            tier: None,
            timestamp: env.ledger().timestamp(),
        },
    );
}
