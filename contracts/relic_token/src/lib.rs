#![no_std]

mod error;
mod events;
mod storage;

use error::Error;
use events::{BurnedEvent, MintedEvent, TransferredEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Vec};

#[contract]
pub struct RelicToken;

#[contractimpl]
impl RelicToken {
    /// Initialize the token contract
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::MintedCount, &0u32);

        Ok(())
    }

    /// Add an operator (the pool contract)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    /// Mint the next token in sequence (only operators)
    ///
    /// Ids are assigned 1, 2, 3, ... and are never reused.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    pub fn mint_next(env: Env, operator: Address, to: Address) -> Result<u32, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let minted: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MintedCount)
            .unwrap_or(0);
        let token_id = minted + 1;

        env.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), &to);

        let mut held = Self::held_by(&env, &to);
        held.push_back(token_id);
        env.storage()
            .persistent()
            .set(&DataKey::Held(to.clone()), &held);

        env.storage()
            .instance()
            .set(&DataKey::MintedCount, &token_id);

        env.events().publish(
            (Symbol::new(&env, "minted"), token_id),
            MintedEvent { token_id, to },
        );

        Ok(token_id)
    }

    /// Burn a token (only operators)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `TokenNotFound`: Token does not exist or was already burned
    pub fn burn(env: Env, operator: Address, token_id: u32) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let owner: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Owner(token_id))
            .ok_or(Error::TokenNotFound)?;

        env.storage()
            .persistent()
            .remove(&DataKey::Owner(token_id));
        Self::drop_held(&env, &owner, token_id);

        env.events().publish(
            (Symbol::new(&env, "burned"), token_id),
            BurnedEvent {
                token_id,
                from: owner,
            },
        );

        Ok(())
    }

    /// Transfer a token between holders
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `TokenNotFound`: Token does not exist
    /// - `NotTokenOwner`: From address does not hold the token
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u32) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        from.require_auth();

        let owner: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Owner(token_id))
            .ok_or(Error::TokenNotFound)?;

        if owner != from {
            return Err(Error::NotTokenOwner);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), &to);

        Self::drop_held(&env, &from, token_id);
        let mut held = Self::held_by(&env, &to);
        held.push_back(token_id);
        env.storage()
            .persistent()
            .set(&DataKey::Held(to.clone()), &held);

        env.events().publish(
            (Symbol::new(&env, "transferred"), token_id),
            TransferredEvent { token_id, from, to },
        );

        Ok(())
    }

    /// Get the current owner of a token
    ///
    /// # Errors
    /// - `TokenNotFound`: Token does not exist or was burned
    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(token_id))
            .ok_or(Error::TokenNotFound)
    }

    /// Get ids currently held by an address, in acquisition order
    pub fn tokens_of(env: Env, owner: Address) -> Vec<u32> {
        Self::held_by(&env, &owner)
    }

    /// Total tokens ever minted (burns do not decrease this)
    pub fn total_minted(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::MintedCount)
            .unwrap_or(0)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    /// Set the metadata base path (Admin only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn set_base_uri(env: Env, uri: String) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::BaseUri, &uri);

        env.events().publish(
            (Symbol::new(&env, "base_uri_set"),),
            uri,
        );

        Ok(())
    }

    /// Get the metadata base path, if one was set
    pub fn base_uri(env: Env) -> Option<String> {
        env.storage().instance().get(&DataKey::BaseUri)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_operator(env: &Env, operator: &Address) -> Result<(), Error> {
        let registered: bool = env
            .storage()
            .instance()
            .get(&DataKey::Operators(operator.clone()))
            .unwrap_or(false);

        if !registered {
            return Err(Error::NotOperator);
        }
        Ok(())
    }

    fn held_by(env: &Env, owner: &Address) -> Vec<u32> {
        env.storage()
            .persistent()
            .get(&DataKey::Held(owner.clone()))
            .unwrap_or(Vec::new(env))
    }

    fn drop_held(env: &Env, owner: &Address, token_id: u32) {
        let mut held = Self::held_by(env, owner);
        if let Some(index) = held.first_index_of(token_id) {
            let _ = held.remove(index);
        }

        if held.is_empty() {
            env.storage()
                .persistent()
                .remove(&DataKey::Held(owner.clone()));
        } else {
            env.storage()
                .persistent()
                .set(&DataKey::Held(owner.clone()), &held);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, vec, Address, Env};

    struct Fixture {
        env: Env,
        admin: Address,
        operator: Address,
        client: RelicTokenClient<'static>,
    }

    fn setup() -> Fixture {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register_contract(None, RelicToken);
        let client = RelicTokenClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        let operator = Address::generate(&env);

        client.initialize(&admin);
        client.add_operator(&operator);

        Fixture {
            env,
            admin,
            operator,
            client,
        }
    }

    #[test]
    fn test_double_initialize() {
        let f = setup();
        let result = f.client.try_initialize(&f.admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_sequential_ids_start_at_one() {
        let f = setup();
        let user = Address::generate(&f.env);

        assert_eq!(f.client.total_minted(), 0);
        assert_eq!(f.client.mint_next(&f.operator, &user), 1);
        assert_eq!(f.client.mint_next(&f.operator, &user), 2);
        assert_eq!(f.client.mint_next(&f.operator, &user), 3);
        assert_eq!(f.client.total_minted(), 3);
        assert_eq!(f.client.owner_of(&2), user);
    }

    #[test]
    fn test_mint_requires_operator() {
        let f = setup();
        let outsider = Address::generate(&f.env);
        let user = Address::generate(&f.env);

        let result = f.client.try_mint_next(&outsider, &user);
        assert_eq!(result, Err(Ok(Error::NotOperator)));

        f.client.remove_operator(&f.operator);
        let result = f.client.try_mint_next(&f.operator, &user);
        assert_eq!(result, Err(Ok(Error::NotOperator)));
    }

    #[test]
    fn test_burn_removes_token() {
        let f = setup();
        let user = Address::generate(&f.env);

        f.client.mint_next(&f.operator, &user);
        f.client.mint_next(&f.operator, &user);

        f.client.burn(&f.operator, &1);

        assert_eq!(f.client.try_owner_of(&1), Err(Ok(Error::TokenNotFound)));
        assert_eq!(f.client.tokens_of(&user), vec![&f.env, 2u32]);
        // ids are never reused
        assert_eq!(f.client.mint_next(&f.operator, &user), 3);
    }

    #[test]
    fn test_double_burn_fails() {
        let f = setup();
        let user = Address::generate(&f.env);

        f.client.mint_next(&f.operator, &user);
        f.client.burn(&f.operator, &1);

        let result = f.client.try_burn(&f.operator, &1);
        assert_eq!(result, Err(Ok(Error::TokenNotFound)));
    }

    #[test]
    fn test_transfer_moves_ownership_and_enumeration() {
        let f = setup();
        let user1 = Address::generate(&f.env);
        let user2 = Address::generate(&f.env);

        f.client.mint_next(&f.operator, &user1);
        f.client.mint_next(&f.operator, &user1);

        f.client.transfer(&user1, &user2, &1);

        assert_eq!(f.client.owner_of(&1), user2);
        assert_eq!(f.client.tokens_of(&user1), vec![&f.env, 2u32]);
        assert_eq!(f.client.tokens_of(&user2), vec![&f.env, 1u32]);
    }

    #[test]
    fn test_transfer_not_owner_fails() {
        let f = setup();
        let user1 = Address::generate(&f.env);
        let user2 = Address::generate(&f.env);

        f.client.mint_next(&f.operator, &user1);

        let result = f.client.try_transfer(&user2, &user1, &1);
        assert_eq!(result, Err(Ok(Error::NotTokenOwner)));
    }

    #[test]
    fn test_base_uri() {
        let f = setup();
        assert_eq!(f.client.base_uri(), None);

        let uri = String::from_str(&f.env, "ipfs://relics/");
        f.client.set_base_uri(&uri);
        assert_eq!(f.client.base_uri(), Some(uri));
    }
}
