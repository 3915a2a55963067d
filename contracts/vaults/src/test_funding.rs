use crate::{
    test_setup::{setup, setup_with, DAY, START, T0},
    VaultError,
};

#[test]
fn test_claim_mints_exact_shortfall() {
    let vault = setup();
    vault.fund_rewards(400);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    assert_eq!(vault.client.claim(&user), 1_000);

    assert_eq!(vault.reward_balance(&user), 1_000);
    assert_eq!(vault.reward_balance(&vault.id), 0);
    assert_eq!(vault.client.cumulative_rewards_supplied(), 600);
}

#[test]
fn test_claim_from_reserve_mints_nothing() {
    let vault = setup();
    vault.fund_rewards(5_000);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    vault.client.claim(&user);

    assert_eq!(vault.reward_balance(&vault.id), 4_000);
    assert_eq!(vault.client.cumulative_rewards_supplied(), 0);
}

#[test]
fn test_supplied_counter_accumulates_across_claims() {
    let vault = setup();
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    vault.client.claim(&user);
    vault.set_time(START + 750);
    vault.client.claim(&user);

    assert_eq!(vault.reward_balance(&user), 1_500);
    assert_eq!(vault.client.cumulative_rewards_supplied(), 1_500);
}

#[test]
fn test_shortfall_without_minter_capability_fails() {
    let vault = setup_with(false, false);
    vault.fund_rewards(100);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    let result = vault.client.try_claim(&user);
    match result {
        Err(Ok(e)) => assert_eq!(e, VaultError::MinterCapabilityMissing),
        _ => unreachable!("Expected MinterCapabilityMissing error"),
    }

    // Nothing was paid or forgotten.
    assert_eq!(vault.reward_balance(&user), 0);
    assert_eq!(vault.client.rewards_of(&user), 1_000);
    assert_eq!(vault.client.cumulative_rewards_supplied(), 0);
}

#[test]
fn test_funded_claim_needs_no_minter_capability() {
    let vault = setup_with(false, false);
    vault.fund_rewards(1_000);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    assert_eq!(vault.client.claim(&user), 1_000);
    assert_eq!(vault.reward_balance(&vault.id), 0);
}

#[test]
fn test_shared_token_never_pays_rewards_from_principal() {
    let vault = setup_with(true, true);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    assert_eq!(vault.client.claim(&user), 1_000);

    // The whole reward was minted; the principal is still held.
    assert_eq!(vault.client.cumulative_rewards_supplied(), 1_000);
    assert_eq!(vault.deposit_balance(&vault.id), 1_000);
    assert_eq!(vault.deposit_balance(&user), 1_000);

    vault.set_time(T0 + 30 * DAY);
    assert_eq!(vault.client.withdraw(&user, &0, &0), 1_000);
    assert_eq!(vault.deposit_balance(&user), 2_000);
    assert_eq!(vault.client.total_deposited(), 0);
}

#[test]
fn test_shared_token_uses_surplus_before_minting() {
    let vault = setup_with(true, true);
    vault.fund_rewards(300);
    let user = vault.user_with(1_000);
    vault.client.deposit(&user, &0, &1_000);
    vault.start();

    vault.set_time(START + 500);
    vault.client.claim(&user);

    assert_eq!(vault.client.cumulative_rewards_supplied(), 700);
    assert_eq!(vault.deposit_balance(&vault.id), 1_000);
}
