#![no_std]

//! Tiered, time-locked vaults.
//!
//! Users lock deposits into one of several tiers. Longer locks carry a larger
//! reward weight, and every tier shares one emission pool: each emission step
//! is split across all live deposits in proportion to
//! `deposited_value × reward_weight`.
//!
//! Every state-changing call follows the same order. It checks the caller's
//! capability and its input, settles the pool to the current ledger time, and
//! harvests the caller's pending reward at the old weight. Only then does it
//! change buckets and weights, persist, and move tokens.

pub mod access;
pub mod account;
pub mod config;
pub mod events;
pub mod ledger;
pub mod penalty;
pub mod pool;
pub mod tiers;

#[cfg(test)]
mod test_admin;
#[cfg(test)]
mod test_funding;

use common::{
    admin_tiers::{self, AdminTier},
    bps_of, funding, registry, weighted, PoolPhase, PoolState,
};
use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, token, Address, Env, Symbol, Vec,
};

use access::Capability;
use ledger::DepositBucket;
use penalty::{EarlyExitPolicy, EarlyWithdrawalParams, HaircutPolicy};
use tiers::TierConfig;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const DEPOSIT_TOKEN: Symbol = symbol_short!("DEP_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const FEE_SINK: Symbol = symbol_short!("FEE_SINK");
const TIERS: Symbol = symbol_short!("TIERS");
const POOL: Symbol = symbol_short!("POOL");
const TOTAL_DEPOSITED: Symbol = symbol_short!("TOT_DEP");
const SUPPLIED: Symbol = symbol_short!("SUPPLIED");
const FEE_BPS: Symbol = symbol_short!("FEE_BPS");
const EARLY_PARAMS: Symbol = symbol_short!("EARLY");

// Per-user persistent storage uses tuple keys: (prefix, user[, tier])
const ACCOUNT: Symbol = symbol_short!("ACCOUNT");
const BUCKETS: Symbol = symbol_short!("BUCKETS");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum VaultError {
    // Lifecycle
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotConfigured = 3,
    // Authorization
    Unauthorized = 10,
    MinterCapabilityMissing = 11,
    // Caller input
    InvalidAmount = 20,
    InvalidTier = 21,
    InvalidDeposit = 22,
    InvalidTierOrder = 23,
    InvalidFutureStep = 24,
    ZeroEmission = 25,
    InvalidFee = 26,
    InvalidStepDuration = 27,
    InvalidTierConfig = 28,
    // State
    InsufficientFunds = 40,
    NoDeposits = 41,
    LockNotExpired = 42,
    EmissionsAlreadyStarted = 43,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct VaultsContract;

#[contractimpl]
impl VaultsContract {
    // ── Deployment ──────────────────────────────────────────────────────────

    /// Deploy the vaults.
    ///
    /// * `deposit_token` – SAC address of the token users lock.
    /// * `reward_token`  – SAC address of the token paid as rewards. May equal
    ///                     `deposit_token`.
    /// * `fee_sink`      – receives withdrawal fees and early-exit haircuts.
    /// * `tiers`         – tier table; an empty table selects the default five
    ///                     tiers.
    ///
    /// Emissions stay off until `initialize` is called.
    pub fn __constructor(
        env: Env,
        admin: Address,
        deposit_token: Address,
        reward_token: Address,
        fee_sink: Address,
        tiers: Vec<TierConfig>,
    ) {
        let tiers = if tiers.is_empty() {
            tiers::default_tiers(&env)
        } else {
            tiers
        };
        if !tiers::is_valid(&tiers) {
            panic_with_error!(&env, VaultError::InvalidTierConfig);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&DEPOSIT_TOKEN, &deposit_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&FEE_SINK, &fee_sink);
        tiers::store(&env, &tiers);
        pool::store(&env, &PoolState::new(env.ledger().timestamp()));

        admin_tiers::set_super_admin(&env, &admin);
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Schedule emissions to begin at `start_time` at `emission_per_step`
    /// reward tokens per step. Callable once.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn initialize(
        env: Env,
        caller: Address,
        start_time: u64,
        emission_per_step: i128,
    ) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        let mut pool = pool::load(&env)?;
        if pool.initialized {
            return Err(VaultError::AlreadyInitialized);
        }
        let now = env.ledger().timestamp();
        if start_time <= now {
            return Err(VaultError::InvalidFutureStep);
        }
        if emission_per_step <= 0 {
            return Err(VaultError::ZeroEmission);
        }

        pool.settle(&env, now);
        pool.initialized = true;
        pool.start_time = start_time;
        pool.emission_per_step = emission_per_step;
        pool::store(&env, &pool);

        events::publish_initialized(&env, start_time, emission_per_step);

        Ok(())
    }

    /// Move the start of emissions. Only legal while emissions are pending.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_start_time(env: Env, caller: Address, new_start: u64) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        let mut pool = pool::load(&env)?;
        if !pool.initialized {
            return Err(VaultError::NotInitialized);
        }
        let now = env.ledger().timestamp();
        if pool.has_started(now) {
            return Err(VaultError::EmissionsAlreadyStarted);
        }
        if new_start < now {
            return Err(VaultError::InvalidFutureStep);
        }

        pool.settle(&env, now);
        let old_start = pool.start_time;
        pool.start_time = new_start;
        pool::store(&env, &pool);

        events::publish_start_time_set(&env, old_start, new_start);

        Ok(())
    }

    /// Change the reward emitted per step.
    ///
    /// The pool is settled to the current second at the old rate, including
    /// the open partial step, and every registered user is harvested at that
    /// accumulator value before the new rate is installed. Cost grows with the
    /// number of users ever registered.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_reward_emission(env: Env, caller: Address, new_rate: i128) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        if new_rate < 0 {
            return Err(VaultError::InvalidAmount);
        }

        let mut pool = pool::closed(&env)?;
        let users_settled = registry::harvest_all(
            &env,
            pool.acc_reward_per_share,
            |user| account::load(&env, user),
            |user, stake| account::store(&env, user, stake),
        );

        let old_rate = pool.emission_per_step;
        pool.emission_per_step = new_rate;
        pool::store(&env, &pool);

        events::publish_emission_rate_set(&env, old_rate, new_rate, users_settled);

        Ok(())
    }

    /// Change how many seconds one emission step lasts. The open partial step
    /// is closed at the old duration first.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_step_duration(env: Env, caller: Address, seconds: u64) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        if seconds == 0 {
            return Err(VaultError::InvalidStepDuration);
        }

        let mut pool = pool::closed(&env)?;
        pool.step_duration = seconds;
        pool::store(&env, &pool);

        events::publish_step_duration_set(&env, seconds);

        Ok(())
    }

    /// Set the standard withdrawal fee, in basis points of principal.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_withdrawal_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        if fee_bps as i128 > common::BPS_DENOMINATOR {
            return Err(VaultError::InvalidFee);
        }
        config::set_withdrawal_fee(&env, fee_bps);

        events::publish_withdrawal_fee_set(&env, fee_bps);

        Ok(())
    }

    /// Allow withdrawing locked buckets at a penalty.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_early_withdrawal_params(
        env: Env,
        caller: Address,
        points: u32,
        penalty_bps: u32,
    ) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::ContractAdmin))?;

        if penalty_bps as i128 > common::BPS_DENOMINATOR {
            return Err(VaultError::InvalidFee);
        }
        config::set_early_withdrawal(
            &env,
            Some(EarlyWithdrawalParams {
                points,
                penalty_bps,
            }),
        );

        events::publish_early_withdrawal_set(&env, true, points, penalty_bps);

        Ok(())
    }

    /// Switch early withdrawal off; locked buckets stay locked until expiry.
    ///
    /// Requires at least `OperatorAdmin` tier.
    pub fn disable_early_withdrawal(env: Env, caller: Address) -> Result<(), VaultError> {
        access::require(&env, &caller, Capability::Admin(AdminTier::OperatorAdmin))?;

        config::set_early_withdrawal(&env, None);

        events::publish_early_withdrawal_set(&env, false, 0, 0);

        Ok(())
    }

    // ── Deposits ────────────────────────────────────────────────────────────

    /// Lock `amount` deposit tokens in `tier` as a new bucket.
    ///
    /// Returns the index of the new bucket within the user's buckets for
    /// `tier`. The index is only stable until the next withdrawal or upgrade
    /// from that tier.
    pub fn deposit(env: Env, user: Address, tier: u32, amount: i128) -> Result<u32, VaultError> {
        access::require(&env, &user, Capability::User)?;

        if amount <= 0 {
            return Err(VaultError::InvalidAmount);
        }
        let tier_config = tiers::get(&env, tier)?;

        let deposit_token = token::Client::new(&env, &config::deposit_token(&env)?);
        if deposit_token.balance(&user) < amount {
            return Err(VaultError::InsufficientFunds);
        }

        let now = env.ledger().timestamp();
        let mut pool = pool::settled(&env)?;
        account::register(&env, &user);

        let mut account = account::load(&env, &user);
        account.harvest(&env, pool.acc_reward_per_share);
        account.increase(&env, &mut pool, weighted(amount, tier_config.reward_weight));

        let mut buckets = ledger::load(&env, &user, tier);
        let bucket = DepositBucket::new(amount, now, tier_config.lock_duration);
        let locked_until = bucket.locked_until;
        let index = ledger::push(&mut buckets, bucket);

        ledger::store(&env, &user, tier, &buckets);
        account::store(&env, &user, &account);
        pool::store(&env, &pool);
        config::set_total_deposited(&env, config::total_deposited(&env).saturating_add(amount));

        deposit_token.transfer(&user, &env.current_contract_address(), &amount);

        events::publish_deposited(
            &env,
            user,
            tier,
            index,
            amount,
            locked_until,
            pool.total_weighted_stake,
        );

        Ok(index)
    }

    /// Withdraw the bucket at `bucket_index` in `tier`.
    ///
    /// An unlocked bucket pays its principal minus the standard withdrawal
    /// fee. A locked bucket fails with `LockNotExpired` unless early
    /// withdrawal is enabled, in which case the early-exit haircut replaces
    /// the standard fee. Returns the amount paid to the user.
    pub fn withdraw(
        env: Env,
        user: Address,
        tier: u32,
        bucket_index: u32,
    ) -> Result<i128, VaultError> {
        access::require(&env, &user, Capability::User)?;

        let tier_config = tiers::get(&env, tier)?;
        let mut buckets = ledger::load(&env, &user, tier);
        if buckets.is_empty() {
            return Err(VaultError::NoDeposits);
        }
        let bucket =
            ledger::swap_remove(&mut buckets, bucket_index).ok_or(VaultError::InvalidDeposit)?;

        let now = env.ledger().timestamp();
        let (fee, early, penalty_points) = if bucket.is_locked(now) {
            let params = config::early_withdrawal(&env).ok_or(VaultError::LockNotExpired)?;
            let penalty = HaircutPolicy::new(params).penalty(&bucket, &tier_config, now);
            (penalty.principal_haircut, true, penalty.points)
        } else {
            (
                bps_of(bucket.deposited_value, config::withdrawal_fee(&env)),
                false,
                0,
            )
        };
        let amount = bucket.deposited_value;
        let net = amount.saturating_sub(fee);

        let mut pool = pool::settled(&env)?;
        let mut account = account::load(&env, &user);
        account.harvest(&env, pool.acc_reward_per_share);
        account.decrease(&env, &mut pool, weighted(amount, tier_config.reward_weight));

        ledger::store(&env, &user, tier, &buckets);
        account::store(&env, &user, &account);
        pool::store(&env, &pool);
        config::set_total_deposited(
            &env,
            config::total_deposited(&env).saturating_sub(amount).max(0),
        );

        let deposit_token = token::Client::new(&env, &config::deposit_token(&env)?);
        let vault = env.current_contract_address();
        if net > 0 {
            deposit_token.transfer(&vault, &user, &net);
        }
        if fee > 0 {
            deposit_token.transfer(&vault, &config::fee_sink(&env)?, &fee);
        }

        events::publish_withdrawn(&env, user, tier, amount, fee, early, penalty_points);

        Ok(net)
    }

    /// Move a bucket from `source_tier` to the longer `target_tier`.
    ///
    /// The source lock does not need to have expired. The bucket keeps its
    /// value and is re-locked from now for the target tier's duration.
    /// Rewards are harvested once, at the source weight, before the move.
    /// Returns the new bucket's index in `target_tier`.
    pub fn upgrade(
        env: Env,
        user: Address,
        source_tier: u32,
        bucket_index: u32,
        target_tier: u32,
    ) -> Result<u32, VaultError> {
        access::require(&env, &user, Capability::User)?;

        let source_config = tiers::get(&env, source_tier)?;
        let target_config = tiers::get(&env, target_tier)?;
        if source_config.reward_weight >= target_config.reward_weight {
            return Err(VaultError::InvalidTierOrder);
        }

        let mut source_buckets = ledger::load(&env, &user, source_tier);
        if source_buckets.is_empty() {
            return Err(VaultError::NoDeposits);
        }
        let bucket = ledger::swap_remove(&mut source_buckets, bucket_index)
            .ok_or(VaultError::InvalidDeposit)?;
        let amount = bucket.deposited_value;

        let now = env.ledger().timestamp();
        let mut pool = pool::settled(&env)?;
        let mut account = account::load(&env, &user);
        account.harvest(&env, pool.acc_reward_per_share);
        account.decrease(&env, &mut pool, weighted(amount, source_config.reward_weight));
        account.increase(&env, &mut pool, weighted(amount, target_config.reward_weight));

        let mut target_buckets = ledger::load(&env, &user, target_tier);
        let moved = DepositBucket::new(amount, now, target_config.lock_duration);
        let locked_until = moved.locked_until;
        let index = ledger::push(&mut target_buckets, moved);

        ledger::store(&env, &user, source_tier, &source_buckets);
        ledger::store(&env, &user, target_tier, &target_buckets);
        account::store(&env, &user, &account);
        pool::store(&env, &pool);

        events::publish_upgraded(
            &env,
            user,
            source_tier,
            target_tier,
            index,
            amount,
            locked_until,
        );

        Ok(index)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay `user` their entire claimable balance.
    ///
    /// If the vault's reward reserve cannot cover it, exactly the shortfall is
    /// minted first; this requires the vault to administer the reward token.
    /// Returns the amount paid.
    pub fn claim(env: Env, user: Address) -> Result<i128, VaultError> {
        access::require(&env, &user, Capability::User)?;

        let pool = pool::settled(&env)?;
        let mut account = account::load(&env, &user);
        account.harvest(&env, pool.acc_reward_per_share);
        let amount = account.take_claimable();

        if amount <= 0 {
            pool::store(&env, &pool);
            return Ok(0);
        }

        let reward_token = config::reward_token(&env)?;
        let deposit_token = config::deposit_token(&env)?;
        let reserve = funding::reward_reserve(
            &env,
            &reward_token,
            &deposit_token,
            config::total_deposited(&env),
        );
        let minted = funding::shortfall(amount, reserve);
        if minted > 0 {
            access::require(&env, &env.current_contract_address(), Capability::Minter)?;
        }

        account::store(&env, &user, &account);
        pool::store(&env, &pool);

        if minted > 0 {
            funding::mint_to_self(&env, &reward_token, minted);
            let supplied = config::cumulative_supplied(&env).saturating_add(minted);
            config::set_cumulative_supplied(&env, supplied);
            events::publish_rewards_supplied(&env, minted, supplied);
        }

        token::Client::new(&env, &reward_token).transfer(
            &env.current_contract_address(),
            &user,
            &amount,
        );

        events::publish_reward_claimed(&env, user, amount);

        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Claimable plus pending reward as of the current ledger time.
    pub fn rewards_of(env: Env, user: Address) -> i128 {
        let account = account::load(&env, &user);
        match pool::load(&env) {
            Ok(pool) => {
                let acc = pool.projected_acc(&env, env.ledger().timestamp());
                account.rewards(&env, acc)
            }
            Err(_) => account.claimable,
        }
    }

    /// Reward already harvested and waiting to be claimed.
    pub fn claimable_of(env: Env, user: Address) -> i128 {
        account::load(&env, &user).claimable
    }

    pub fn deposits_of(env: Env, user: Address, tier: u32) -> Vec<DepositBucket> {
        ledger::load(&env, &user, tier)
    }

    /// Unweighted principal `user` holds across every tier.
    pub fn deposited_of(env: Env, user: Address) -> i128 {
        let tier_count = tiers::all(&env).len();
        (0..tier_count).fold(0i128, |sum, tier| {
            sum.saturating_add(ledger::total_value(&ledger::load(&env, &user, tier)))
        })
    }

    pub fn total_deposited(env: Env) -> i128 {
        config::total_deposited(&env)
    }

    pub fn total_weighted_stake(env: Env) -> i128 {
        pool::load(&env)
            .map(|pool| pool.total_weighted_stake)
            .unwrap_or(0)
    }

    pub fn weighted_stake_of(env: Env, user: Address) -> i128 {
        account::load(&env, &user).weighted_stake
    }

    /// True if `user` holds a live bucket in `tier` or any longer tier.
    pub fn has_deposit_in_tier_gte(env: Env, user: Address, tier: u32) -> bool {
        let tier_count = tiers::all(&env).len();
        (tier..tier_count).any(|t| !ledger::load(&env, &user, t).is_empty())
    }

    pub fn get_user_id(env: Env, user: Address) -> Option<u64> {
        registry::user_id(&env, &user)
    }

    /// Every registered address, in id order.
    pub fn get_users(env: Env) -> Vec<Address> {
        registry::users(&env)
    }

    pub fn user_count(env: Env) -> u64 {
        registry::count(&env)
    }

    pub fn get_pool(env: Env) -> Result<PoolState, VaultError> {
        pool::load(&env)
    }

    pub fn pool_phase(env: Env) -> PoolPhase {
        pool::load(&env)
            .map(|pool| pool.phase(env.ledger().timestamp()))
            .unwrap_or(PoolPhase::Uninitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        pool::load(&env).map(|pool| pool.initialized).unwrap_or(false)
    }

    pub fn is_emissions_started(env: Env) -> bool {
        pool::load(&env)
            .map(|pool| pool.has_started(env.ledger().timestamp()))
            .unwrap_or(false)
    }

    pub fn get_tiers(env: Env) -> Vec<TierConfig> {
        tiers::all(&env)
    }

    pub fn get_tier(env: Env, tier: u32) -> Result<TierConfig, VaultError> {
        tiers::get(&env, tier)
    }

    pub fn cumulative_rewards_supplied(env: Env) -> i128 {
        config::cumulative_supplied(&env)
    }

    pub fn withdrawal_fee(env: Env) -> u32 {
        config::withdrawal_fee(&env)
    }

    pub fn early_withdrawal_params(env: Env) -> Option<EarlyWithdrawalParams> {
        config::early_withdrawal(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, VaultError> {
        config::admin(&env)
    }

    // ── Admin tier management ────────────────────────────────────────────────

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::get_admin_tier(&env, &admin)
    }

    /// Grant `tier` to `target`. Requires `SuperAdmin`.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), VaultError> {
        caller.require_auth();
        if !admin_tiers::promote_admin(&env, &caller, &target, tier.clone()) {
            return Err(VaultError::Unauthorized);
        }

        events::publish_admin_promoted(&env, caller, target, tier);

        Ok(())
    }

    /// Revoke `target`'s tier. Requires `SuperAdmin`; the deploying admin
    /// cannot be demoted.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), VaultError> {
        caller.require_auth();
        if !admin_tiers::demote_admin(&env, &caller, &target) {
            return Err(VaultError::Unauthorized);
        }

        events::publish_admin_demoted(&env, caller, target);

        Ok(())
    }
}
