use soroban_sdk::{contracttype, Address};

use crate::lifecycle::Phase;

/// The mint window. Immutable after `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintWindow {
    /// Unix timestamp at which minting opens
    pub start: u64,
    /// Unix timestamp at which minting closes and redemption opens
    pub end: u64,
}

/// Deployment policy. Immutable after `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolPolicy {
    /// First mint-rank's share relative to the last's (last = 1)
    pub mint_ratio: i128,
    /// Last burn-rank's share relative to the first's (first = 1)
    pub burn_ratio: i128,
    /// Escrow lock required per token minted by one address
    pub min_locked: i128,
    /// Ledger sequence the escrow lock must reach
    pub min_lock_expiry_ledger: u32,
}

/// Combined lifecycle and accounting snapshot for the query surface
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolStatus {
    pub phase: Phase,
    pub start: u64,
    pub end: u64,
    pub minted: u32,
    pub burned: u32,
    pub amount_contributed: i128,
    pub amount_paid: i128,
    pub minimum_contribution: i128,
}

/// Escrow oracle report for one identity
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockInfo {
    pub amount: i128,
    pub expiry_ledger: u32,
}

/// Per-address eligibility summary
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Eligibility {
    /// Tokens this address has minted so far (transfer does not reduce this)
    pub minted: u32,
    pub locked: i128,
    pub lock_expiry_ledger: u32,
    pub eligible: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    RewardToken,
    RelicToken,
    EscrowOracle,
    Window,
    Policy,
    MinimumContribution,
    AmountContributed,
    AmountPaid,
    MintedCount,
    BurnedCount,
    ContributorCount,
    /// index -> contributor, in first-contribution order
    Contributor(u32),
    /// contributor -> lifetime total contributed
    Contributed(Address),
    /// identity -> tokens minted by it, never decremented
    MintedBy(Address),
}
