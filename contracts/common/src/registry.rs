//! Append-only registry of every address that has ever staked.
//!
//! Ids start at 1 and follow registration order, so `users()[id - 1]` is the
//! address holding `id`. Entries are never removed or reassigned, even after the
//! user withdraws everything.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{accumulator::StakeAccount, TTL_EXTEND_TO, TTL_THRESHOLD};

const USER_ID: Symbol = symbol_short!("USER_ID");
const USERS: Symbol = symbol_short!("USERS");

pub fn user_id(env: &Env, user: &Address) -> Option<u64> {
    env.storage().persistent().get(&(USER_ID, user.clone()))
}

pub fn users(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&USERS)
        .unwrap_or(Vec::new(env))
}

pub fn count(env: &Env) -> u64 {
    users(env).len() as u64
}

/// Registers `user` if this is their first interaction.
///
/// Returns the user's id and whether it was assigned by this call.
pub fn register(env: &Env, user: &Address) -> (u64, bool) {
    if let Some(id) = user_id(env, user) {
        return (id, false);
    }

    let mut all = users(env);
    all.push_back(user.clone());
    let id = all.len() as u64;

    let id_key = (USER_ID, user.clone());
    env.storage().persistent().set(&id_key, &id);
    env.storage()
        .persistent()
        .extend_ttl(&id_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    env.storage().persistent().set(&USERS, &all);
    env.storage()
        .persistent()
        .extend_ttl(&USERS, TTL_THRESHOLD, TTL_EXTEND_TO);

    (id, true)
}

/// Harvests every registered user at accumulator value `acc`.
///
/// Users holding no stake are skipped and not written back. Returns the number
/// of accounts whose claimable balance grew.
pub fn harvest_all<L, S>(env: &Env, acc: i128, mut load: L, mut store: S) -> u32
where
    L: FnMut(&Address) -> StakeAccount,
    S: FnMut(&Address, &StakeAccount),
{
    let mut harvested = 0u32;
    for user in users(env).iter() {
        let mut account = load(&user);
        if account.weighted_stake == 0 {
            continue;
        }
        if account.harvest(env, acc) > 0 {
            harvested = harvested.saturating_add(1);
        }
        store(&user, &account);
    }
    harvested
}
