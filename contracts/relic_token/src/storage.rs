use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Operators(Address),
    /// Total tokens ever minted; the next id is this plus one.
    MintedCount,
    /// token_id -> current owner. Removed on burn.
    Owner(u32),
    /// owner -> ids currently held, in acquisition order.
    Held(Address),
    BaseUri,
}
