use soroban_sdk::{
    testutils::{Address as _, Events as _},
    xdr, Address, IntoVal, TryFromVal, Val,
};

use common::{AdminTier, PoolPhase};

use crate::{
    events::AdminTierChangedEvent,
    test_setup::{setup, setup_with_tiers, DAY, EMISSION, START, T0},
    VaultError,
};

// ── Emission lifecycle ────────────────────────────────────────────────────────

#[test]
fn test_initialize_schedules_emissions() {
    let vault = setup();
    vault.start();

    assert!(vault.client.is_initialized());
    assert!(!vault.client.is_emissions_started());
    assert_eq!(vault.client.pool_phase(), PoolPhase::Pending);

    let pool = vault.client.get_pool();
    assert_eq!(pool.start_time, START);
    assert_eq!(pool.emission_per_step, EMISSION);

    vault.set_time(START);
    assert!(vault.client.is_emissions_started());
    assert_eq!(vault.client.pool_phase(), PoolPhase::Emitting);
}

#[test]
fn test_initialize_twice_fails() {
    let vault = setup();
    vault.start();

    let result = vault.client.try_initialize(&vault.admin, &(START + 10), &1);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::AlreadyInitialized),
        _ => unreachable!("Expected AlreadyInitialized error"),
    }
}

#[test]
fn test_initialize_requires_future_start() {
    let vault = setup();

    let result = vault.client.try_initialize(&vault.admin, &T0, &EMISSION);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidFutureStep),
        _ => unreachable!("Expected InvalidFutureStep error"),
    }
    assert!(!vault.client.is_initialized());
}

#[test]
fn test_initialize_zero_emission_fails() {
    let vault = setup();

    let result = vault.client.try_initialize(&vault.admin, &START, &0);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::ZeroEmission),
        _ => unreachable!("Expected ZeroEmission error"),
    }
}

#[test]
fn test_set_start_time_while_pending() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.client.set_start_time(&vault.admin, &(START + 1_000));
    assert_eq!(vault.client.get_pool().start_time, START + 1_000);

    vault.set_time(START + 500);
    assert_eq!(vault.client.pool_phase(), PoolPhase::Pending);
    assert_eq!(vault.client.rewards_of(&user), 0);

    vault.set_time(START + 1_050);
    assert_eq!(vault.client.rewards_of(&user), 100);
}

#[test]
fn test_set_start_time_before_initialize_fails() {
    let vault = setup();

    let result = vault.client.try_set_start_time(&vault.admin, &START);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::NotInitialized),
        _ => unreachable!("Expected NotInitialized error"),
    }
}

#[test]
fn test_set_start_time_after_start_fails() {
    let vault = setup();
    vault.start();
    vault.set_time(START);

    let result = vault.client.try_set_start_time(&vault.admin, &(START + 100));
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::EmissionsAlreadyStarted),
        _ => unreachable!("Expected EmissionsAlreadyStarted error"),
    }
}

#[test]
fn test_set_start_time_in_past_fails() {
    let vault = setup();
    vault.start();
    vault.set_time(T0 + 50);

    let result = vault.client.try_set_start_time(&vault.admin, &(T0 + 49));
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidFutureStep),
        _ => unreachable!("Expected InvalidFutureStep error"),
    }
}

// ── Rate and step changes ─────────────────────────────────────────────────────

#[test]
fn test_rate_change_settles_every_user_first() {
    let vault = setup();
    let alice = vault.user_with(1_000);
    let bob = vault.user_with(1_000);
    vault.client.deposit(&alice, &0, &1_000);
    vault.client.deposit(&bob, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    let alice_before = vault.client.rewards_of(&alice);
    let bob_before = vault.client.rewards_of(&bob);
    assert_eq!(alice_before, 500);

    vault.client.set_reward_emission(&vault.admin, &(EMISSION * 2));

    assert_eq!(vault.client.claimable_of(&alice), alice_before);
    assert_eq!(vault.client.claimable_of(&bob), bob_before);
    assert_eq!(vault.client.get_pool().emission_per_step, EMISSION * 2);

    // 100 steps × 20 = 2_000 split evenly.
    vault.set_time(START + 1_000);
    assert_eq!(vault.client.rewards_of(&alice), 1_500);
    assert_eq!(vault.client.rewards_of(&bob), 1_500);
}

#[test]
fn test_rate_change_skips_exited_users() {
    let vault = setup();
    let alice = vault.user_with(1_000);
    let bob = vault.user_with(1_000);
    vault.client.deposit(&alice, &0, &1_000);
    vault.client.deposit(&bob, &1, &1_000);
    vault.start();

    vault.set_time(T0 + 30 * DAY);
    vault.client.withdraw(&alice, &0, &0);
    let alice_claimable = vault.client.claimable_of(&alice);

    vault.client.set_reward_emission(&vault.admin, &1);
    assert_eq!(vault.client.claimable_of(&alice), alice_claimable);
    assert_eq!(vault.client.user_count(), 2);
}

#[test]
fn test_rate_change_to_zero_stops_accrual() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    vault.client.set_reward_emission(&vault.admin, &0);

    vault.set_time(START + 5_000);
    assert_eq!(vault.client.rewards_of(&user), 1_000);
}

#[test]
fn test_rate_change_mid_step_prices_elapsed_seconds_at_old_rate() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 503);
    assert_eq!(vault.client.rewards_of(&user), 1_000);

    // The 3 seconds into the open step are paid at the old rate: 10 × 3 / 5.
    vault.client.set_reward_emission(&vault.admin, &1_000);
    assert_eq!(vault.client.claimable_of(&user), 1_006);
    assert_eq!(vault.client.get_pool().last_settled, START + 503);

    // No new-rate step completes until 5 seconds after the change.
    vault.set_time(START + 505);
    assert_eq!(vault.client.rewards_of(&user), 1_006);
    vault.set_time(START + 508);
    assert_eq!(vault.client.rewards_of(&user), 2_006);
}

#[test]
fn test_rate_change_before_initialize_is_allowed() {
    let vault = setup();
    vault.client.set_reward_emission(&vault.admin, &7);

    assert_eq!(vault.client.get_pool().emission_per_step, 7);
    assert!(!vault.client.is_initialized());
}

#[test]
fn test_negative_rate_fails() {
    let vault = setup();

    let result = vault.client.try_set_reward_emission(&vault.admin, &-1);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidAmount),
        _ => unreachable!("Expected InvalidAmount error"),
    }
}

#[test]
fn test_longer_step_slows_accrual() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    vault.client.set_step_duration(&vault.admin, &10);
    assert_eq!(vault.client.get_pool().step_duration, 10);

    // 1_000 from the first 100 five-second steps, then 50 ten-second steps.
    vault.set_time(START + 1_000);
    assert_eq!(vault.client.rewards_of(&user), 1_500);
}

#[test]
fn test_step_change_mid_step_closes_the_open_step() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 503);
    vault.client.set_step_duration(&vault.admin, &10);
    assert_eq!(vault.client.rewards_of(&user), 1_006);

    vault.set_time(START + 512);
    assert_eq!(vault.client.rewards_of(&user), 1_006);
    vault.set_time(START + 513);
    assert_eq!(vault.client.rewards_of(&user), 1_016);
}

#[test]
fn test_zero_step_duration_fails() {
    let vault = setup();

    let result = vault.client.try_set_step_duration(&vault.admin, &0);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidStepDuration),
        _ => unreachable!("Expected InvalidStepDuration error"),
    }
}

// ── Fees ──────────────────────────────────────────────────────────────────────

#[test]
fn test_fee_above_full_principal_fails() {
    let vault = setup();

    let result = vault.client.try_set_withdrawal_fee(&vault.admin, &10_001);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidFee),
        _ => unreachable!("Expected InvalidFee error"),
    }

    vault.client.set_withdrawal_fee(&vault.admin, &10_000);
    assert_eq!(vault.client.withdrawal_fee(), 10_000);
}

#[test]
fn test_early_withdrawal_params_round_trip() {
    let vault = setup();

    let result = vault
        .client
        .try_set_early_withdrawal_params(&vault.admin, &5, &10_001);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidFee),
        _ => unreachable!("Expected InvalidFee error"),
    }

    vault
        .client
        .set_early_withdrawal_params(&vault.admin, &5, &2_500);
    let params = vault.client.early_withdrawal_params().unwrap();
    assert_eq!(params.points, 5);
    assert_eq!(params.penalty_bps, 2_500);

    vault.client.disable_early_withdrawal(&vault.admin);
    assert_eq!(vault.client.early_withdrawal_params(), None);
}

// ── Admin tiers ───────────────────────────────────────────────────────────────

#[test]
fn test_contract_admin_can_configure() {
    let vault = setup();
    let ops = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &ops, &AdminTier::ContractAdmin);

    vault.client.initialize(&ops, &START, &EMISSION);
    vault.client.set_withdrawal_fee(&ops, &50);
    assert!(vault.client.is_initialized());
    assert_eq!(vault.client.withdrawal_fee(), 50);
}

#[test]
fn test_operator_admin_cannot_configure() {
    let vault = setup();
    let operator = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &operator, &AdminTier::OperatorAdmin);

    let result = vault.client.try_initialize(&operator, &START, &EMISSION);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    let result = vault.client.try_set_reward_emission(&operator, &1);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_operator_admin_can_disable_early_withdrawal() {
    let vault = setup();
    let operator = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &operator, &AdminTier::OperatorAdmin);
    vault
        .client
        .set_early_withdrawal_params(&vault.admin, &5, &2_500);

    let result = vault
        .client
        .try_set_early_withdrawal_params(&operator, &5, &0);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    vault.client.disable_early_withdrawal(&operator);
    assert_eq!(vault.client.early_withdrawal_params(), None);
}

#[test]
fn test_non_admin_cannot_disable_early_withdrawal() {
    let vault = setup();
    let stranger = Address::generate(&vault.env);

    let result = vault.client.try_disable_early_withdrawal(&stranger);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_non_admin_cannot_configure() {
    let vault = setup();
    let stranger = Address::generate(&vault.env);

    let result = vault.client.try_set_withdrawal_fee(&stranger, &1);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(vault.client.get_admin_tier(&stranger), None);
}

#[test]
fn test_contract_admin_cannot_promote() {
    let vault = setup();
    let ops = Address::generate(&vault.env);
    let other = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &ops, &AdminTier::ContractAdmin);

    let result = vault
        .client
        .try_promote_admin(&ops, &other, &AdminTier::OperatorAdmin);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_super_admin_demotes_admin() {
    let vault = setup();
    let ops = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &ops, &AdminTier::ContractAdmin);
    assert_eq!(
        vault.client.get_admin_tier(&ops),
        Some(AdminTier::ContractAdmin)
    );

    vault.client.demote_admin(&vault.admin, &ops);
    assert_eq!(vault.client.get_admin_tier(&ops), None);

    let result = vault.client.try_set_withdrawal_fee(&ops, &1);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_primary_super_admin_cannot_be_demoted() {
    let vault = setup();
    let second = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &second, &AdminTier::SuperAdmin);

    let result = vault.client.try_demote_admin(&second, &vault.admin);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(
        vault.client.get_admin_tier(&vault.admin),
        Some(AdminTier::SuperAdmin)
    );
}

#[test]
fn test_promotion_event_carries_tier_rank() {
    let vault = setup();
    let ops = Address::generate(&vault.env);
    vault
        .client
        .promote_admin(&vault.admin, &ops, &AdminTier::ContractAdmin);

    let events = vault.env.events().all().filter_by_contract(&vault.id);
    let Some(event) = events.events().last() else {
        unreachable!("Expected an ADM_PROM event");
    };
    let xdr::ContractEventBody::V0(body) = &event.body else {
        unreachable!("Expected a V0 event body");
    };

    let expected: Val = AdminTierChangedEvent {
        caller: vault.admin.clone(),
        target: ops,
        tier: Some(AdminTier::ContractAdmin.rank()),
        timestamp: T0,
    }
    .into_val(&vault.env);
    assert_eq!(
        body.data,
        xdr::ScVal::try_from_val(&vault.env, &expected).unwrap()
    );
}

// ── Tier tables ───────────────────────────────────────────────────────────────

#[test]
fn test_custom_tier_table() {
    let vault = setup_with_tiers(false, true, &[(7, 1), (14, 3)]);
    assert_eq!(vault.client.get_tiers().len(), 2);
    assert_eq!(vault.client.get_tier(&1).lock_duration, 14 * DAY);

    let result = vault.client.try_get_tier(&2);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::InvalidTier),
        _ => unreachable!("Expected InvalidTier error"),
    }
}

#[test]
#[should_panic]
fn test_unordered_tier_table_rejected() {
    setup_with_tiers(false, true, &[(30, 5), (60, 5)]);
}
