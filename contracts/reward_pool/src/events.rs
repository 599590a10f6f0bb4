use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ContributedEvent {
    pub contributor: Address,
    pub amount: i128,
    pub total_contributed: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MintedEvent {
    pub token_id: u32,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RedeemedEvent {
    pub token_id: u32,
    pub holder: Address,
    pub burn_rank: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MinimumContributionSetEvent {
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CurrencyRescuedEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RelicRescuedEvent {
    pub token: Address,
    pub to: Address,
    pub token_id: u32,
}
