#![no_std]

pub mod events;

use common::{
    admin_tiers::{self, AdminTier},
    bps_of, funding, registry, PoolState, StakeAccount, BPS_DENOMINATOR, TTL_EXTEND_TO,
    TTL_THRESHOLD,
};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec};

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const FEE_SINK: Symbol = symbol_short!("FEE_SINK");
const POOL: Symbol = symbol_short!("POOL");
const FEE_BPS: Symbol = symbol_short!("FEE_BPS");
const SUPPLIED: Symbol = symbol_short!("SUPPLIED");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const USER_ACCOUNT: Symbol = symbol_short!("ACCOUNT");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotConfigured = 3,
    Unauthorized = 10,
    MinterCapabilityMissing = 11,
    InvalidAmount = 20,
    InvalidFutureStep = 24,
    ZeroEmission = 25,
    InvalidFee = 26,
    InvalidStepDuration = 27,
    InsufficientFunds = 40,
    EmissionsAlreadyStarted = 43,
    InsufficientStake = 44,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// What `withdraw_all` paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitSummary {
    /// Principal paid to the staker, after the withdrawal fee.
    pub principal: i128,
    pub rewards: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Single-tier staking: every staked token carries weight 1 and there is no
/// lock. Shares the accumulator and funding rules of the tiered vaults.
#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Deployment ──────────────────────────────────────────────────────────

    /// * `stake_token`  – SAC address of the token users stake.
    /// * `reward_token` – SAC address of the token distributed as rewards.
    /// * `fee_sink`     – receives the withdrawal fee.
    pub fn __constructor(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        fee_sink: Address,
    ) {
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&FEE_SINK, &fee_sink);
        env.storage()
            .instance()
            .set(&POOL, &PoolState::new(env.ledger().timestamp()));

        admin_tiers::set_super_admin(&env, &admin);
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// The pool is settled and the staker harvested first so the new tokens
    /// do not earn retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let stake_token = token::Client::new(&env, &Self::stake_token(&env)?);
        if stake_token.balance(&staker) < amount {
            return Err(ContractError::InsufficientFunds);
        }

        let mut pool = Self::settled_pool(&env)?;
        let (user_id, is_new) = registry::register(&env, &staker);
        if is_new {
            events::publish_user_registered(&env, staker.clone(), user_id);
        }

        let mut account = Self::load_account(&env, &staker);
        account.harvest(&env, pool.acc_reward_per_share);
        account.increase(&env, &mut pool, amount);

        Self::store_account(&env, &staker, &account);
        env.storage().instance().set(&POOL, &pool);

        stake_token.transfer(&staker, &env.current_contract_address(), &amount);

        events::publish_staked(&env, staker, amount, pool.total_weighted_stake);

        Ok(())
    }

    /// Withdraw `amount` of stake. Returns the amount paid after the fee.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::settled_pool(&env)?;
        let mut account = Self::load_account(&env, &staker);
        if account.weighted_stake < amount {
            return Err(ContractError::InsufficientStake);
        }
        account.harvest(&env, pool.acc_reward_per_share);
        account.decrease(&env, &mut pool, amount);

        Self::store_account(&env, &staker, &account);
        env.storage().instance().set(&POOL, &pool);

        Self::pay_principal(&env, &staker, amount)
    }

    /// Withdraw the whole stake and claim every reward in one call.
    pub fn withdraw_all(env: Env, staker: Address) -> Result<ExitSummary, ContractError> {
        staker.require_auth();

        let mut pool = Self::settled_pool(&env)?;
        let mut account = Self::load_account(&env, &staker);
        account.harvest(&env, pool.acc_reward_per_share);

        let staked = account.weighted_stake;
        if staked <= 0 && account.claimable <= 0 {
            return Err(ContractError::InsufficientStake);
        }
        let rewards = account.take_claimable();
        let minted = Self::shortfall(&env, rewards, pool.total_weighted_stake)?;
        account.decrease(&env, &mut pool, staked);

        Self::store_account(&env, &staker, &account);
        env.storage().instance().set(&POOL, &pool);

        let principal = if staked > 0 {
            Self::pay_principal(&env, &staker, staked)?
        } else {
            0
        };
        Self::pay_rewards(&env, &staker, rewards, minted)?;

        Ok(ExitSummary { principal, rewards })
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim all accumulated rewards for `staker`.
    ///
    /// Rewards come from the contract's reward reserve; any shortfall is
    /// minted, which requires the contract to administer the reward token.
    pub fn claim(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();

        let pool = Self::settled_pool(&env)?;
        let mut account = Self::load_account(&env, &staker);
        account.harvest(&env, pool.acc_reward_per_share);
        let earned = account.take_claimable();

        if earned <= 0 {
            // Nothing to claim; return without reverting.
            env.storage().instance().set(&POOL, &pool);
            return Ok(0);
        }
        let minted = Self::shortfall(&env, earned, pool.total_weighted_stake)?;

        Self::store_account(&env, &staker, &account);
        env.storage().instance().set(&POOL, &pool);

        Self::pay_rewards(&env, &staker, earned, minted)?;

        Ok(earned)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn stakes_of(env: Env, staker: Address) -> i128 {
        Self::load_account(&env, &staker).weighted_stake
    }

    /// Claimable plus pending rewards as of the current ledger time.
    pub fn rewards_of(env: Env, staker: Address) -> i128 {
        let account = Self::load_account(&env, &staker);
        match Self::load_pool(&env) {
            Ok(pool) => {
                let acc = pool.projected_acc(&env, env.ledger().timestamp());
                account.rewards(&env, acc)
            }
            Err(_) => account.claimable,
        }
    }

    pub fn claimable_of(env: Env, staker: Address) -> i128 {
        Self::load_account(&env, &staker).claimable
    }

    pub fn total_staked(env: Env) -> i128 {
        Self::load_pool(&env)
            .map(|pool| pool.total_weighted_stake)
            .unwrap_or(0)
    }

    pub fn get_users(env: Env) -> Vec<Address> {
        registry::users(&env)
    }

    pub fn get_user_id(env: Env, staker: Address) -> Option<u64> {
        registry::user_id(&env, &staker)
    }

    pub fn get_pool(env: Env) -> Result<PoolState, ContractError> {
        Self::load_pool(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        Self::load_pool(&env)
            .map(|pool| pool.initialized)
            .unwrap_or(false)
    }

    pub fn is_emissions_started(env: Env) -> bool {
        Self::load_pool(&env)
            .map(|pool| pool.has_started(env.ledger().timestamp()))
            .unwrap_or(false)
    }

    pub fn withdrawal_fee(env: Env) -> u32 {
        env.storage().instance().get(&FEE_BPS).unwrap_or(0)
    }

    pub fn cumulative_rewards_supplied(env: Env) -> i128 {
        env.storage().instance().get(&SUPPLIED).unwrap_or(0)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotConfigured)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Schedule emissions to begin at `start_time`. Callable once.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn initialize(
        env: Env,
        caller: Address,
        start_time: u64,
        emission_per_step: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        let mut pool = Self::load_pool(&env)?;
        if pool.initialized {
            return Err(ContractError::AlreadyInitialized);
        }
        let now = env.ledger().timestamp();
        if start_time <= now {
            return Err(ContractError::InvalidFutureStep);
        }
        if emission_per_step <= 0 {
            return Err(ContractError::ZeroEmission);
        }

        pool.settle(&env, now);
        pool.initialized = true;
        pool.start_time = start_time;
        pool.emission_per_step = emission_per_step;
        env.storage().instance().set(&POOL, &pool);

        events::publish_initialized(&env, start_time, emission_per_step);

        Ok(())
    }

    /// Move the start of emissions while they are still pending.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_start_time(env: Env, caller: Address, new_start: u64) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        let mut pool = Self::load_pool(&env)?;
        if !pool.initialized {
            return Err(ContractError::NotInitialized);
        }
        let now = env.ledger().timestamp();
        if pool.has_started(now) {
            return Err(ContractError::EmissionsAlreadyStarted);
        }
        if new_start < now {
            return Err(ContractError::InvalidFutureStep);
        }

        pool.settle(&env, now);
        let old_start = pool.start_time;
        pool.start_time = new_start;
        env.storage().instance().set(&POOL, &pool);

        events::publish_start_time_set(&env, old_start, new_start);

        Ok(())
    }

    /// Update the reward emitted per step.
    ///
    /// The pool is settled to the current second at the old rate, including
    /// the open partial step, and every registered staker is harvested before
    /// the rate changes.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_reward_emission(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::closed_pool(&env)?;
        let users_settled = registry::harvest_all(
            &env,
            pool.acc_reward_per_share,
            |staker| Self::load_account(&env, staker),
            |staker, account| Self::store_account(&env, staker, account),
        );

        let old_rate = pool.emission_per_step;
        pool.emission_per_step = new_rate;
        env.storage().instance().set(&POOL, &pool);

        events::publish_reward_rate_set(&env, old_rate, new_rate, users_settled);

        Ok(())
    }

    /// Requires at least `ContractAdmin` tier.
    pub fn set_step_duration(env: Env, caller: Address, seconds: u64) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if seconds == 0 {
            return Err(ContractError::InvalidStepDuration);
        }

        let mut pool = Self::closed_pool(&env)?;
        pool.step_duration = seconds;
        env.storage().instance().set(&POOL, &pool);

        events::publish_step_duration_set(&env, seconds);

        Ok(())
    }

    /// Withdrawal fee in basis points, sent to the fee sink.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_withdrawal_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if fee_bps as i128 > BPS_DENOMINATOR {
            return Err(ContractError::InvalidFee);
        }
        env.storage().instance().set(&FEE_BPS, &fee_bps);

        events::publish_withdrawal_fee_set(&env, fee_bps);

        Ok(())
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Promotes or assigns a target address to the specified admin tier.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        if !admin_tiers::promote_admin(&env, &caller, &target, tier.clone()) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_admin_promoted(&env, caller, target, tier);
        Ok(())
    }

    /// Removes the admin tier from the target address entirely.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        caller.require_auth();
        if !admin_tiers::demote_admin(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_admin_demoted(&env, caller, target);
        Ok(())
    }

    /// Returns the admin tier of the given address, if any.
    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::get_admin_tier(&env, &admin)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if `caller` does not hold at least `min_tier`.
    fn require_admin_tier(
        env: &Env,
        caller: &Address,
        min_tier: &AdminTier,
    ) -> Result<(), ContractError> {
        if admin_tiers::require_tier(env, caller, min_tier) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    fn stake_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotConfigured)
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotConfigured)
    }

    fn load_pool(env: &Env) -> Result<PoolState, ContractError> {
        env.storage()
            .instance()
            .get(&POOL)
            .ok_or(ContractError::NotConfigured)
    }

    /// Pool advanced to the current ledger time, not yet persisted.
    fn settled_pool(env: &Env) -> Result<PoolState, ContractError> {
        let mut pool = Self::load_pool(env)?;
        pool.settle(env, env.ledger().timestamp());
        Ok(pool)
    }

    /// Pool settled to exactly the current second, open step included.
    fn closed_pool(env: &Env) -> Result<PoolState, ContractError> {
        let mut pool = Self::load_pool(env)?;
        pool.close_step(env, env.ledger().timestamp());
        Ok(pool)
    }

    fn load_account(env: &Env, staker: &Address) -> StakeAccount {
        env.storage()
            .persistent()
            .get(&(USER_ACCOUNT, staker.clone()))
            .unwrap_or_default()
    }

    fn store_account(env: &Env, staker: &Address, account: &StakeAccount) {
        let key = (USER_ACCOUNT, staker.clone());
        env.storage().persistent().set(&key, account);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    /// Amount that must be minted to pay `amount`, checked against the
    /// minter capability before anything is written.
    fn shortfall(env: &Env, amount: i128, total_staked: i128) -> Result<i128, ContractError> {
        let reward_token = Self::reward_token(env)?;
        let reserve =
            funding::reward_reserve(env, &reward_token, &Self::stake_token(env)?, total_staked);
        let minted = funding::shortfall(amount, reserve);
        if minted > 0 && !funding::is_minter(env, &reward_token, &env.current_contract_address()) {
            return Err(ContractError::MinterCapabilityMissing);
        }
        Ok(minted)
    }

    /// Mints `minted` if needed, then pays `amount` reward tokens to `staker`.
    fn pay_rewards(
        env: &Env,
        staker: &Address,
        amount: i128,
        minted: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        let reward_token = Self::reward_token(env)?;
        if minted > 0 {
            funding::mint_to_self(env, &reward_token, minted);
            let supplied: i128 = env
                .storage()
                .instance()
                .get(&SUPPLIED)
                .unwrap_or(0i128)
                .saturating_add(minted);
            env.storage().instance().set(&SUPPLIED, &supplied);
            events::publish_rewards_supplied(env, minted, supplied);
        }
        token::Client::new(env, &reward_token).transfer(
            &env.current_contract_address(),
            staker,
            &amount,
        );
        events::publish_reward_claimed(env, staker.clone(), amount);
        Ok(())
    }

    /// Returns `amount` of principal minus the withdrawal fee to `staker`.
    fn pay_principal(env: &Env, staker: &Address, amount: i128) -> Result<i128, ContractError> {
        let fee_bps: u32 = env.storage().instance().get(&FEE_BPS).unwrap_or(0);
        let fee = bps_of(amount, fee_bps);
        let net = amount.saturating_sub(fee);

        let stake_token = token::Client::new(env, &Self::stake_token(env)?);
        let contract = env.current_contract_address();
        if net > 0 {
            stake_token.transfer(&contract, staker, &net);
        }
        if fee > 0 {
            let fee_sink: Address = env
                .storage()
                .instance()
                .get(&FEE_SINK)
                .ok_or(ContractError::NotConfigured)?;
            stake_token.transfer(&contract, &fee_sink, &fee);
        }

        events::publish_withdrawn(env, staker.clone(), amount, fee);

        Ok(net)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
