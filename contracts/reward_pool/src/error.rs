use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller not authorized (not admin)
    Unauthorized = 10,

    // ============================================
    // WINDOW/PHASE ERRORS (20-29)
    // ============================================
    /// Window start must be before window end
    InvalidWindow = 20,
    /// Minting only allowed while the window is open
    MintNotOpen = 21,
    /// Contributions only allowed before the window ends
    ContributionClosed = 22,
    /// Redemption only allowed once the window has ended
    RedemptionNotOpen = 23,

    // ============================================
    // ELIGIBILITY ERRORS (30-39)
    // ============================================
    /// Escrow lock does not satisfy the mint policy
    NotEligible = 30,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Contribution below the configured minimum
    BelowMinimumContribution = 41,
    /// Recovery amount exceeds the pool surplus
    ExceedsSurplus = 42,
    /// Payout ratios must be at least 1
    InvalidRatio = 43,

    // ============================================
    // CALCULATOR ERRORS (50-59)
    // ============================================
    /// Rank outside [1, total_issued], or nothing issued
    RankOutOfRange = 50,
    /// Checked arithmetic overflowed
    Overflow = 51,

    // ============================================
    // COLLABORATOR ERRORS (60-69)
    // ============================================
    /// Caller does not hold the token being redeemed
    NotTokenHolder = 60,
    /// Token ledger id diverged from the pool's issuance count
    SequenceMismatch = 61,
}
