//! Shared building blocks for the vault and staking contracts.
//!
//! This crate provides:
//! - [`accumulator`]: the weighted reward-per-share math used by every pool.
//! - [`registry`]: the append-only user registry (ids assigned on first interaction).
//! - [`funding`]: reward-reserve accounting and shortfall minting against a
//!   Stellar Asset Contract.
//! - [`admin_tiers`]: the three-tier admin hierarchy guarding configuration calls.
//!
//! Nothing here owns contract state on its own; storage helpers always operate on
//! the calling contract's storage through the supplied `Env`.

#![no_std]

pub mod accumulator;
pub mod admin_tiers;
pub mod funding;
pub mod registry;

pub use accumulator::*;
pub use admin_tiers::AdminTier;

// ── Storage TTL ──────────────────────────────────────────────────────────────

/// Remaining-ledgers threshold below which an entry's TTL is bumped.
pub const TTL_THRESHOLD: u32 = 518_400;

/// Ledger count an entry's TTL is extended to (~180 days at 5s per ledger).
pub const TTL_EXTEND_TO: u32 = 3_110_400;
