//! Capability checks run before any accrual math.

use soroban_sdk::{Address, Env};

use common::{admin_tiers, funding, AdminTier};

use crate::{config, VaultError};

pub enum Capability {
    /// Configuration rights: the caller must hold at least this admin tier.
    Admin(AdminTier),
    /// The address may mint the reward token.
    Minter,
    /// The address acts on its own deposits.
    User,
}

pub fn require(env: &Env, caller: &Address, capability: Capability) -> Result<(), VaultError> {
    match capability {
        Capability::User => {
            caller.require_auth();
            Ok(())
        }
        Capability::Admin(min_tier) => {
            caller.require_auth();
            if admin_tiers::require_tier(env, caller, &min_tier) {
                Ok(())
            } else {
                Err(VaultError::Unauthorized)
            }
        }
        Capability::Minter => {
            let reward_token = config::reward_token(env)?;
            if funding::is_minter(env, &reward_token, caller) {
                Ok(())
            } else {
                Err(VaultError::MinterCapabilityMissing)
            }
        }
    }
}
