//! Early-withdrawal penalty policy.
//!
//! Early withdrawal is off until an admin sets [`EarlyWithdrawalParams`]; until
//! then a locked bucket cannot be withdrawn. The policy is a trait so the exact
//! penalty formula can be replaced without touching the withdrawal path.

use soroban_sdk::contracttype;

use common::bps_of;

use crate::{ledger::DepositBucket, tiers::TierConfig};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyWithdrawalParams {
    /// Points reported against the user for leaving early. Settled by the
    /// external points ledger, not here.
    pub points: u32,
    /// Principal haircut in basis points.
    pub penalty_bps: u32,
}

/// What leaving a bucket before `locked_until` costs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyExitPenalty {
    /// Principal withheld and routed to the fee sink.
    pub principal_haircut: i128,
    pub points: u32,
}

pub trait EarlyExitPolicy {
    fn penalty(&self, bucket: &DepositBucket, tier: &TierConfig, now: u64) -> EarlyExitPenalty;
}

/// Flat haircut of `penalty_bps` on principal, regardless of tier or time left.
pub struct HaircutPolicy {
    params: EarlyWithdrawalParams,
}

impl HaircutPolicy {
    pub fn new(params: EarlyWithdrawalParams) -> Self {
        Self { params }
    }
}

impl EarlyExitPolicy for HaircutPolicy {
    fn penalty(&self, bucket: &DepositBucket, _tier: &TierConfig, _now: u64) -> EarlyExitPenalty {
        EarlyExitPenalty {
            principal_haircut: bps_of(bucket.deposited_value, self.params.penalty_bps),
            points: self.params.points,
        }
    }
}
