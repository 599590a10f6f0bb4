#![no_std]

mod error;
mod events;
mod lifecycle;
mod payout;
mod storage;

use error::Error;
use events::*;
use lifecycle::Phase;
use storage::{DataKey, Eligibility, LockInfo, MintWindow, PoolPolicy, PoolStatus};

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct RewardPool;

#[contractimpl]
impl RewardPool {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the pool
    ///
    /// Collaborator addresses, the mint window and the payout policy are
    /// fixed for the life of the contract; only the minimum contribution
    /// can change afterwards.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidWindow`: Window start not before window end
    /// - `InvalidRatio`: A payout ratio below 1
    /// - `InvalidAmount`: Negative minimum contribution or lock threshold
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        relic_token: Address,
        escrow_oracle: Address,
        window: MintWindow,
        policy: PoolPolicy,
        minimum_contribution: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if window.start >= window.end {
            return Err(Error::InvalidWindow);
        }
        if policy.mint_ratio < 1 || policy.burn_ratio < 1 {
            return Err(Error::InvalidRatio);
        }
        if minimum_contribution < 0 || policy.min_locked < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::RewardToken, &reward_token);
        env.storage()
            .instance()
            .set(&DataKey::RelicToken, &relic_token);
        env.storage()
            .instance()
            .set(&DataKey::EscrowOracle, &escrow_oracle);
        env.storage().instance().set(&DataKey::Window, &window);
        env.storage().instance().set(&DataKey::Policy, &policy);
        env.storage()
            .instance()
            .set(&DataKey::MinimumContribution, &minimum_contribution);
        env.storage()
            .instance()
            .set(&DataKey::AmountContributed, &0i128);
        env.storage().instance().set(&DataKey::AmountPaid, &0i128);
        env.storage().instance().set(&DataKey::MintedCount, &0u32);
        env.storage().instance().set(&DataKey::BurnedCount, &0u32);
        env.storage()
            .instance()
            .set(&DataKey::ContributorCount, &0u32);

        Ok(())
    }

    /// Update the minimum contribution (Admin only)
    ///
    /// Takes effect for subsequent contributions immediately.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Negative amount
    pub fn set_minimum_contribution(env: Env, amount: i128) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage()
            .instance()
            .set(&DataKey::MinimumContribution, &amount);

        env.events().publish(
            (Symbol::new(&env, "min_contribution_set"),),
            MinimumContributionSetEvent { amount },
        );

        Ok(())
    }

    /// Recover stray fungible tokens held by the pool (Admin only)
    ///
    /// The reward currency can only be recovered up to the current surplus;
    /// committed pool funds stay untouched. Any other token is recovered
    /// in full.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount not positive
    /// - `ExceedsSurplus`: Reward-currency recovery beyond the surplus
    pub fn rescue_currency(
        env: Env,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let reward_token = Self::reward_token(&env)?;
        if token == reward_token {
            let surplus = Self::surplus(&env, &reward_token)?;
            if amount > surplus {
                return Err(Error::ExceedsSurplus);
            }
        }

        let client = token::Client::new(&env, &token);
        client.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish(
            (Symbol::new(&env, "currency_rescued"), token.clone()),
            CurrencyRescuedEvent { token, to, amount },
        );

        Ok(())
    }

    /// Recover a stray non-fungible token held by the pool (Admin only)
    ///
    /// Transfers custody in full. The target contract must expose the
    /// `transfer(from, to, token_id)` shape of the relic ledger.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn rescue_relic(env: Env, token: Address, to: Address, token_id: u32) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        env.invoke_contract::<()>(
            &token,
            &Symbol::new(&env, "transfer"),
            vec![
                &env,
                env.current_contract_address().into_val(&env),
                to.into_val(&env),
                token_id.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "relic_rescued"), token.clone()),
            RelicRescuedEvent {
                token,
                to,
                token_id,
            },
        );

        Ok(())
    }

    // ============================================
    // CONTRIBUTIONS
    // ============================================

    /// Contribute reward currency to the pool
    ///
    /// Open to anyone until the mint window ends. First-time contributors
    /// are appended to the ordered contributor list exactly once.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContributionClosed`: Window has ended
    /// - `InvalidAmount`: Amount not positive
    /// - `BelowMinimumContribution`: Amount under the configured minimum
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), Error> {
        contributor.require_auth();

        let window = Self::window(&env)?;
        let now = env.ledger().timestamp();
        if !lifecycle::contribution_open(&window, now) {
            return Err(Error::ContributionClosed);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let minimum: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MinimumContribution)
            .unwrap_or(0);
        if amount < minimum {
            return Err(Error::BelowMinimumContribution);
        }

        let reward_token = Self::reward_token(&env)?;
        let client = token::Client::new(&env, &reward_token);
        client.transfer(&contributor, &env.current_contract_address(), &amount);

        let contributed: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountContributed)
            .unwrap_or(0);
        let new_contributed = contributed.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::AmountContributed, &new_contributed);

        let prior: i128 = env
            .storage()
            .persistent()
            .get(&DataKey::Contributed(contributor.clone()))
            .unwrap_or(0);

        if prior == 0 {
            let count: u32 = env
                .storage()
                .instance()
                .get(&DataKey::ContributorCount)
                .unwrap_or(0);
            env.storage()
                .persistent()
                .set(&DataKey::Contributor(count), &contributor);
            env.storage()
                .instance()
                .set(&DataKey::ContributorCount, &(count + 1));
        }

        let total = prior.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::Contributed(contributor.clone()), &total);

        env.events().publish(
            (Symbol::new(&env, "contributed"), contributor.clone()),
            ContributedEvent {
                contributor,
                amount,
                total_contributed: total,
            },
        );

        Ok(())
    }

    // ============================================
    // MINTING
    // ============================================

    /// Mint the next relic to `recipient`
    ///
    /// Only while the window is open, and only if the escrow oracle reports
    /// a lock satisfying the policy for one more token. The oracle is
    /// consulted exactly once, after the window check.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `MintNotOpen`: Outside the mint window
    /// - `NotEligible`: Escrow lock below threshold or expiring too early
    /// - `SequenceMismatch`: Relic ledger id diverged from the pool count
    pub fn mint(env: Env, recipient: Address) -> Result<u32, Error> {
        recipient.require_auth();

        let window = Self::window(&env)?;
        let now = env.ledger().timestamp();
        if lifecycle::phase_at(&window, now) != Phase::Open {
            return Err(Error::MintNotOpen);
        }

        let prior: u32 = env
            .storage()
            .persistent()
            .get(&DataKey::MintedBy(recipient.clone()))
            .unwrap_or(0);

        let policy = Self::policy(&env)?;
        let lock = Self::locked_of(&env, &recipient)?;
        if !Self::satisfies_policy(&policy, prior, &lock) {
            return Err(Error::NotEligible);
        }

        let relic = Self::relic_token(&env)?;
        let token_id: u32 = env.invoke_contract(
            &relic,
            &Symbol::new(&env, "mint_next"),
            vec![
                &env,
                env.current_contract_address().into_val(&env),
                recipient.into_val(&env),
            ],
        );

        let minted: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MintedCount)
            .unwrap_or(0);
        if token_id != minted + 1 {
            return Err(Error::SequenceMismatch);
        }
        env.storage().instance().set(&DataKey::MintedCount, &token_id);
        env.storage()
            .persistent()
            .set(&DataKey::MintedBy(recipient.clone()), &(prior + 1));

        env.events().publish(
            (Symbol::new(&env, "minted"), token_id),
            MintedEvent {
                token_id,
                recipient,
            },
        );

        Ok(token_id)
    }

    // ============================================
    // REDEMPTION
    // ============================================

    /// Redeem a relic for its share of the pool
    ///
    /// Only once the window has ended, and only by the current holder. The
    /// token id is its mint-rank; the burn-rank is assigned here. The relic
    /// is destroyed and the payout accounted before the currency leaves
    /// the pool.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `RedemptionNotOpen`: Window has not ended yet
    /// - `NotTokenHolder`: Caller does not hold the token
    /// - `RankOutOfRange`: Token id outside the issued range
    pub fn redeem(env: Env, holder: Address, token_id: u32) -> Result<i128, Error> {
        holder.require_auth();

        let window = Self::window(&env)?;
        let now = env.ledger().timestamp();
        if lifecycle::phase_at(&window, now) != Phase::Closed {
            return Err(Error::RedemptionNotOpen);
        }

        let relic = Self::relic_token(&env)?;
        let owner: Address = env.invoke_contract(
            &relic,
            &Symbol::new(&env, "owner_of"),
            vec![&env, token_id.into_val(&env)],
        );
        if owner != holder {
            return Err(Error::NotTokenHolder);
        }

        let minted: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MintedCount)
            .unwrap_or(0);
        let burned: u32 = env
            .storage()
            .instance()
            .get(&DataKey::BurnedCount)
            .unwrap_or(0);
        let contributed: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountContributed)
            .unwrap_or(0);

        let policy = Self::policy(&env)?;
        let burn_rank = burned + 1;
        let amount = payout::payout_for(
            minted,
            contributed,
            policy.mint_ratio,
            policy.burn_ratio,
            token_id,
            burn_rank,
        )?;

        env.invoke_contract::<()>(
            &relic,
            &Symbol::new(&env, "burn"),
            vec![
                &env,
                env.current_contract_address().into_val(&env),
                token_id.into_val(&env),
            ],
        );

        env.storage().instance().set(&DataKey::BurnedCount, &burn_rank);

        let paid: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountPaid)
            .unwrap_or(0);
        let new_paid = paid.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::AmountPaid, &new_paid);

        let reward_token = Self::reward_token(&env)?;
        let client = token::Client::new(&env, &reward_token);
        client.transfer(&env.current_contract_address(), &holder, &amount);

        env.events().publish(
            (Symbol::new(&env, "redeemed"), token_id),
            RedeemedEvent {
                token_id,
                holder,
                burn_rank,
                amount,
            },
        );

        Ok(amount)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Lifecycle and accounting snapshot
    pub fn get_status(env: Env) -> Result<PoolStatus, Error> {
        let window = Self::window(&env)?;
        let now = env.ledger().timestamp();

        Ok(PoolStatus {
            phase: lifecycle::phase_at(&window, now),
            start: window.start,
            end: window.end,
            minted: env
                .storage()
                .instance()
                .get(&DataKey::MintedCount)
                .unwrap_or(0),
            burned: env
                .storage()
                .instance()
                .get(&DataKey::BurnedCount)
                .unwrap_or(0),
            amount_contributed: env
                .storage()
                .instance()
                .get(&DataKey::AmountContributed)
                .unwrap_or(0),
            amount_paid: env
                .storage()
                .instance()
                .get(&DataKey::AmountPaid)
                .unwrap_or(0),
            minimum_contribution: env
                .storage()
                .instance()
                .get(&DataKey::MinimumContribution)
                .unwrap_or(0),
        })
    }

    /// Per-address mint eligibility summary
    pub fn eligibility_of(env: Env, identity: Address) -> Result<Eligibility, Error> {
        let policy = Self::policy(&env)?;
        let minted: u32 = env
            .storage()
            .persistent()
            .get(&DataKey::MintedBy(identity.clone()))
            .unwrap_or(0);
        let lock = Self::locked_of(&env, &identity)?;

        Ok(Eligibility {
            minted,
            locked: lock.amount,
            lock_expiry_ledger: lock.expiry_ledger,
            eligible: Self::satisfies_policy(&policy, minted, &lock),
        })
    }

    /// Tokens minted by an identity, regardless of current holdings
    pub fn minted_of(env: Env, identity: Address) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::MintedBy(identity))
            .unwrap_or(0)
    }

    /// Number of distinct contributors
    pub fn contributor_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ContributorCount)
            .unwrap_or(0)
    }

    /// Contributor at a first-contribution-order index
    pub fn contributor_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Contributor(index))
    }

    /// Lifetime contribution total for an identity
    pub fn contributed_of(env: Env, identity: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Contributed(identity))
            .unwrap_or(0)
    }

    /// Reward currency currently held by the pool
    pub fn pool_balance(env: Env) -> Result<i128, Error> {
        let reward_token = Self::reward_token(&env)?;
        Ok(token::Client::new(&env, &reward_token).balance(&env.current_contract_address()))
    }

    /// Currency held beyond committed contributions, recoverable by admin
    pub fn reward_surplus(env: Env) -> Result<i128, Error> {
        let reward_token = Self::reward_token(&env)?;
        Self::surplus(&env, &reward_token)
    }

    /// The payout calculator, exposed as a pure utility
    ///
    /// Uses the deployment's configured ratios. Mutates nothing.
    pub fn preview_payout(
        env: Env,
        total_issued: u32,
        pool_amount: i128,
        mint_rank: u32,
        burn_rank: u32,
    ) -> Result<i128, Error> {
        let policy = Self::policy(&env)?;
        payout::payout_for(
            total_issued,
            pool_amount,
            policy.mint_ratio,
            policy.burn_ratio,
            mint_rank,
            burn_rank,
        )
    }

    /// What a token would pay if it were redeemed next
    pub fn projected_payout(env: Env, token_id: u32) -> Result<i128, Error> {
        let relic = Self::relic_token(&env)?;
        // fails for burned or never-minted ids
        let _: Address = env.invoke_contract(
            &relic,
            &Symbol::new(&env, "owner_of"),
            vec![&env, token_id.into_val(&env)],
        );

        let minted: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MintedCount)
            .unwrap_or(0);
        let burned: u32 = env
            .storage()
            .instance()
            .get(&DataKey::BurnedCount)
            .unwrap_or(0);
        let contributed: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountContributed)
            .unwrap_or(0);

        let policy = Self::policy(&env)?;
        payout::payout_for(
            minted,
            contributed,
            policy.mint_ratio,
            policy.burn_ratio,
            token_id,
            burned + 1,
        )
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn reward_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::RewardToken)
            .ok_or(Error::NotInitialized)
    }

    fn relic_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::RelicToken)
            .ok_or(Error::NotInitialized)
    }

    fn window(env: &Env) -> Result<MintWindow, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Window)
            .ok_or(Error::NotInitialized)
    }

    fn policy(env: &Env) -> Result<PoolPolicy, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Policy)
            .ok_or(Error::NotInitialized)
    }

    fn locked_of(env: &Env, identity: &Address) -> Result<LockInfo, Error> {
        let oracle: Address = env
            .storage()
            .instance()
            .get(&DataKey::EscrowOracle)
            .ok_or(Error::NotInitialized)?;

        Ok(env.invoke_contract(
            &oracle,
            &Symbol::new(env, "locked_of"),
            vec![env, identity.into_val(env)],
        ))
    }

    /// One more mint needs `min_locked` behind every token already minted
    /// plus the new one, locked until at least the policy's expiry ledger.
    fn satisfies_policy(policy: &PoolPolicy, prior_minted: u32, lock: &LockInfo) -> bool {
        let required = match policy
            .min_locked
            .checked_mul(i128::from(prior_minted) + 1)
        {
            Some(v) => v,
            None => return false,
        };

        lock.amount >= required && lock.expiry_ledger >= policy.min_lock_expiry_ledger
    }

    fn surplus(env: &Env, reward_token: &Address) -> Result<i128, Error> {
        let balance = token::Client::new(env, reward_token).balance(&env.current_contract_address());
        let contributed: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountContributed)
            .unwrap_or(0);
        let paid: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountPaid)
            .unwrap_or(0);

        Ok(balance.saturating_sub(contributed - paid))
    }
}
