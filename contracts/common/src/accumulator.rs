//! Weighted reward-per-share accumulator.
//!
//! One global accumulator is shared by every stake in a pool. Each settlement
//! converts the wall-clock time elapsed since the previous settlement into whole
//! emission steps (`elapsed / step_duration`) and grows the accumulator by
//!
//! ```text
//! steps × emission_per_step × ACC_PRECISION / total_weighted_stake
//! ```
//!
//! An account's pending reward is `weighted_stake × acc / ACC_PRECISION` minus
//! its `reward_debt`, the same product taken at its last settlement. All
//! divisions truncate, so the pool can only under-pay.
//!
//! Both products are taken in `I256`. A tiny stake emitting alone can push the
//! accumulator far past what `weighted_stake × acc` can hold in `i128`.

use soroban_sdk::{contracttype, Env, I256};

/// Fixed-point scale of `acc_reward_per_share`.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

/// Seconds represented by one emission step until an admin changes it.
pub const DEFAULT_STEP_DURATION: u64 = 5;

/// Denominator for every basis-point parameter (fees, penalties).
pub const BPS_DENOMINATOR: i128 = 10_000;

// ── Pool ─────────────────────────────────────────────────────────────────────

/// Lifecycle of a pool's emissions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolPhase {
    /// `initialize` has not been called; nothing accrues.
    Uninitialized = 0,
    /// Initialized with a start time that has not been reached yet.
    Pending = 1,
    /// Emitting rewards.
    Emitting = 2,
}

/// Process-wide accrual state of one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub initialized: bool,
    pub start_time: u64,
    pub emission_per_step: i128,
    pub step_duration: u64,
    pub last_settled: u64,
    pub acc_reward_per_share: i128,
    pub total_weighted_stake: i128,
}

impl PoolState {
    pub fn new(now: u64) -> Self {
        Self {
            initialized: false,
            start_time: 0,
            emission_per_step: 0,
            step_duration: DEFAULT_STEP_DURATION,
            last_settled: now,
            acc_reward_per_share: 0,
            total_weighted_stake: 0,
        }
    }

    pub fn phase(&self, now: u64) -> PoolPhase {
        if !self.initialized {
            PoolPhase::Uninitialized
        } else if now < self.start_time {
            PoolPhase::Pending
        } else {
            PoolPhase::Emitting
        }
    }

    pub fn has_started(&self, now: u64) -> bool {
        self.phase(now) == PoolPhase::Emitting
    }

    /// Advance the accumulator to `now`.
    ///
    /// Before emissions start, with nothing staked, or with a zero rate, only
    /// `last_settled` moves. Otherwise the fractional step left over after the
    /// whole steps is kept for the next settlement. Calling twice with the same
    /// `now` is a no-op.
    pub fn settle(&mut self, env: &Env, now: u64) {
        let (acc, settled_to) = self.advance(env, now);
        self.acc_reward_per_share = acc;
        self.last_settled = settled_to;
    }

    /// Settle to exactly `now`, crediting the open partial step pro rata at
    /// the current rate.
    ///
    /// Must run before `emission_per_step` or `step_duration` changes; the
    /// seconds already elapsed in the open step are priced at the old values.
    pub fn close_step(&mut self, env: &Env, now: u64) {
        self.settle(env, now);
        if now <= self.last_settled {
            return;
        }
        let elapsed = now.saturating_sub(self.last_settled) as i128;
        let denominator = (self.step_duration.max(1) as i128).saturating_mul(self.total_weighted_stake);
        let increment = mul_div3(
            env,
            self.emission_per_step,
            elapsed,
            ACC_PRECISION,
            denominator,
        );
        self.acc_reward_per_share = self.acc_reward_per_share.saturating_add(increment);
        self.last_settled = now;
    }

    /// Accumulator value as it would be after `settle(now)`, without mutating.
    pub fn projected_acc(&self, env: &Env, now: u64) -> i128 {
        self.advance(env, now).0
    }

    fn advance(&self, env: &Env, now: u64) -> (i128, u64) {
        if now <= self.last_settled {
            return (self.acc_reward_per_share, self.last_settled);
        }
        if !self.has_started(now) || self.total_weighted_stake <= 0 || self.emission_per_step <= 0
        {
            return (self.acc_reward_per_share, now);
        }

        let from = self.last_settled.max(self.start_time);
        let step_duration = self.step_duration.max(1);
        let steps = now.saturating_sub(from) / step_duration;
        let settled_to = from.saturating_add(steps.saturating_mul(step_duration));

        let increment = compute_acc_increment(
            env,
            steps,
            self.emission_per_step,
            self.total_weighted_stake,
        );
        (
            self.acc_reward_per_share.saturating_add(increment),
            settled_to,
        )
    }

    fn add_weight(&mut self, weight: i128) {
        self.total_weighted_stake = self.total_weighted_stake.saturating_add(weight);
    }

    fn remove_weight(&mut self, weight: i128) {
        self.total_weighted_stake = self.total_weighted_stake.saturating_sub(weight).max(0);
    }
}

/// Accumulator growth for `steps` emission steps spread over `total_weighted_stake`.
pub fn compute_acc_increment(
    env: &Env,
    steps: u64,
    emission_per_step: i128,
    total_weighted_stake: i128,
) -> i128 {
    if steps == 0 || emission_per_step <= 0 || total_weighted_stake <= 0 {
        return 0;
    }
    mul_div3(
        env,
        steps as i128,
        emission_per_step,
        ACC_PRECISION,
        total_weighted_stake,
    )
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Per-user accrual state.
///
/// `weighted_stake` must be changed only through [`StakeAccount::increase`] and
/// [`StakeAccount::decrease`], which move the pool total by the same delta.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakeAccount {
    pub weighted_stake: i128,
    pub reward_debt: i128,
    pub claimable: i128,
}

impl StakeAccount {
    /// Reward earned since the last harvest, at accumulator value `acc`.
    pub fn pending(&self, env: &Env, acc: i128) -> i128 {
        scaled_reward(env, self.weighted_stake, acc)
            .saturating_sub(self.reward_debt)
            .max(0)
    }

    /// Claimable plus pending, the figure reported to users.
    pub fn rewards(&self, env: &Env, acc: i128) -> i128 {
        self.claimable.saturating_add(self.pending(env, acc))
    }

    /// Move pending reward into `claimable` and re-snapshot the debt.
    /// Returns the harvested amount.
    pub fn harvest(&mut self, env: &Env, acc: i128) -> i128 {
        let pending = self.pending(env, acc);
        self.claimable = self.claimable.saturating_add(pending);
        self.reward_debt = scaled_reward(env, self.weighted_stake, acc);
        pending
    }

    /// Add `weight` to this account and the pool. The pool must be settled and
    /// the account harvested at `pool.acc_reward_per_share` beforehand.
    pub fn increase(&mut self, env: &Env, pool: &mut PoolState, weight: i128) {
        self.weighted_stake = self.weighted_stake.saturating_add(weight);
        pool.add_weight(weight);
        self.reward_debt = scaled_reward(env, self.weighted_stake, pool.acc_reward_per_share);
    }

    /// Remove `weight` from this account and the pool. Same preconditions as
    /// [`StakeAccount::increase`].
    pub fn decrease(&mut self, env: &Env, pool: &mut PoolState, weight: i128) {
        let removed = weight.min(self.weighted_stake);
        self.weighted_stake = self.weighted_stake.saturating_sub(removed);
        pool.remove_weight(removed);
        self.reward_debt = scaled_reward(env, self.weighted_stake, pool.acc_reward_per_share);
    }

    /// Zero `claimable` and return what it held.
    pub fn take_claimable(&mut self) -> i128 {
        let amount = self.claimable;
        self.claimable = 0;
        amount
    }
}

// ── Arithmetic helpers ───────────────────────────────────────────────────────

/// `weighted_stake × acc / ACC_PRECISION`, truncated.
pub fn scaled_reward(env: &Env, weighted_stake: i128, acc: i128) -> i128 {
    if weighted_stake <= 0 || acc <= 0 {
        return 0;
    }
    I256::from_i128(env, weighted_stake)
        .mul(&I256::from_i128(env, acc))
        .div(&I256::from_i128(env, ACC_PRECISION))
        .to_i128()
        .unwrap_or(i128::MAX)
}

/// `a × b × c / denominator` with the product held in 256 bits. Inputs are
/// non-negative; a zero or negative denominator yields 0. Saturates only when
/// the quotient itself exceeds `i128`.
fn mul_div3(env: &Env, a: i128, b: i128, c: i128, denominator: i128) -> i128 {
    if denominator <= 0 || a <= 0 || b <= 0 || c <= 0 {
        return 0;
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .mul(&I256::from_i128(env, c))
        .div(&I256::from_i128(env, denominator))
        .to_i128()
        .unwrap_or(i128::MAX)
}

/// Stake weight contributed by `amount` in a tier of weight `reward_weight`.
pub fn weighted(amount: i128, reward_weight: u32) -> i128 {
    amount.saturating_mul(reward_weight as i128)
}

/// `amount × bps / 10_000`, truncated.
pub fn bps_of(amount: i128, bps: u32) -> i128 {
    amount.saturating_mul(bps as i128) / BPS_DENOMINATOR
}
