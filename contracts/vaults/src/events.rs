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
    pub ledger_sequence: u32,
    pub timestamp: u64,
}

/// Fired when a pending start time is moved.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartTimeSetEvent {
    pub old_start: u64,
    pub new_start: u64,
    pub timestamp: u64,
}

/// Fired the first time an address interacts with the vaults.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub user: Address,
    pub user_id: u64,
    pub timestamp: u64,
}

/// Fired when a new bucket is created by a deposit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub user: Address,
    pub tier: u32,
    pub bucket_index: u32,
    pub amount: i128,
    pub locked_until: u64,
    pub new_total_weighted_stake: i128,
    pub timestamp: u64,
}

/// Fired when a bucket is withdrawn.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub user: Address,
    pub tier: u32,
    pub amount: i128,
    pub fee: i128,
    pub early: bool,
    pub penalty_points: u32,
    pub timestamp: u64,
}

/// Fired when a bucket moves to a longer tier.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpgradedEvent {
    pub user: Address,
    pub source_tier: u32,
    pub target_tier: u32,
    pub target_index: u32,
    pub amount: i128,
    pub locked_until: u64,
    pub timestamp: u64,
}

/// Fired when a user is paid their claimable rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub user: Address,
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

/// Fired when the emission rate changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateSetEvent {
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

/// Fired when early withdrawal is enabled, changed or disabled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyWithdrawalSetEvent {
    pub enabled: bool,
    pub points: u32,
    pub penalty_bps: u32,
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
            ledger_sequence: env.ledger().sequence(),
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

pub fn publish_user_registered(env: &Env, user: Address, user_id: u64) {
    env.events().publish(
        (symbol_short!("USER_REG"), user.clone()),
        UserRegisteredEvent {
            user,
            user_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    user: Address,
    tier: u32,
    bucket_index: u32,
    amount: i128,
    locked_until: u64,
    new_total_weighted_stake: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositedEvent {
            user,
            tier,
            bucket_index,
            amount,
            locked_until,
            new_total_weighted_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    user: Address,
    tier: u32,
    amount: i128,
    fee: i128,
    early: bool,
    penalty_points: u32,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawnEvent {
            user,
            tier,
            amount,
            fee,
            early,
            penalty_points,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_upgraded(
    env: &Env,
    user: Address,
    source_tier: u32,
    target_tier: u32,
    target_index: u32,
    amount: i128,
    locked_until: u64,
) {
    env.events().publish(
        (symbol_short!("UPGRADE"), user.clone()),
        UpgradedEvent {
            user,
            source_tier,
            target_tier,
            target_index,
            amount,
            locked_until,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIM"), user.clone()),
        RewardClaimedEvent {
            user,
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

pub fn publish_emission_rate_set(env: &Env, old_rate: i128, new_rate: i128, users_settled: u32) {
    env.events().publish(
        (symbol_short!("RATE"),),
        EmissionRateSetEvent {
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

pub fn publish_early_withdrawal_set(env: &Env, enabled: bool, points: u32, penalty_bps: u32) {
    env.events().publish(
        (symbol_short!("EARLY_SET"),),
        EarlyWithdrawalSetEvent {
            enabled,
            points,
            penalty_bps,
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
