//! ARC balances, staking, the four genesis pools, and burn tracking.
//!
//! Grounded on the original `ARCToken` class, adapted to this protocol's
//! single-genesis-mint resolution (see DESIGN.md): the whole `TOTAL_SUPPLY`
//! is minted exactly once, at genesis, split across the four pools. There is
//! no `mint_tokens` operation reachable after genesis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use archivechain_core::constants::{
    ARCHIVING_REWARDS_POOL_PERCENT, COMMUNITY_RESERVE_POOL_PERCENT, DEVELOPMENT_POOL_PERCENT,
    MAX_TOKEN_SUPPLY_ARC, PUBLIC_SALE_POOL_PERCENT, TRANSACTION_FEE_BURN_RATE_PERCENT,
};
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::Address;
use archivechain_safemath::{
    safe_add, safe_percentage, safe_subtract, validate_balance_operation, validate_supply_limits,
    Amount, BalanceOp,
};

pub const ARCHIVING_REWARDS_POOL: &str = "archiving_rewards";
pub const DEVELOPMENT_POOL: &str = "development";
pub const COMMUNITY_RESERVE_POOL: &str = "community";
pub const PUBLIC_SALE_POOL: &str = "public_sale";

/// Named addresses that receive the development/community/public-sale pools
/// directly at genesis (per spec §4.4, those three pools mint straight to
/// wallets; only `archiving_rewards` stays a chain-tracked pool).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisAddresses {
    pub development: Address,
    pub community: Address,
    pub public_sale: Address,
    /// Collects the un-burned 90% of every transfer fee. Not named in
    /// spec.md's transfer rule, which only specifies the 10% burn; without
    /// somewhere for the remainder to go, the supply-conservation invariant
    /// (§4.4 last line) could not hold. Documented in DESIGN.md.
    pub fee_pool: Address,
}

impl Default for GenesisAddresses {
    fn default() -> Self {
        Self {
            development: Address::system("development_wallet"),
            community: Address::system("community_dao"),
            public_sale: Address::system("public_sale_contract"),
            fee_pool: Address::system("fee_pool"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    balances: HashMap<Address, Amount>,
    staked: HashMap<Address, Amount>,
    pools: HashMap<String, Amount>,
    total_minted: Amount,
    total_burned: Amount,
}

impl TokenLedger {
    /// Mint `TOTAL_SUPPLY` exactly once, splitting it across the four pools
    /// and crediting three of them directly to genesis wallets.
    pub fn genesis(addresses: &GenesisAddresses) -> Result<Self, ArchiveChainError> {
        let total_supply = Amount::from_arc(MAX_TOKEN_SUPPLY_ARC);
        let archiving_rewards = safe_percentage(total_supply, ARCHIVING_REWARDS_POOL_PERCENT)?;
        let development = safe_percentage(total_supply, DEVELOPMENT_POOL_PERCENT)?;
        let community = safe_percentage(total_supply, COMMUNITY_RESERVE_POOL_PERCENT)?;
        let public_sale = safe_percentage(total_supply, PUBLIC_SALE_POOL_PERCENT)?;

        let mut balances = HashMap::new();
        balances.insert(addresses.development.clone(), development);
        balances.insert(addresses.community.clone(), community);
        balances.insert(addresses.public_sale.clone(), public_sale);

        let mut pools = HashMap::new();
        pools.insert(ARCHIVING_REWARDS_POOL.to_string(), archiving_rewards);
        pools.insert(DEVELOPMENT_POOL.to_string(), Amount::ZERO);
        pools.insert(COMMUNITY_RESERVE_POOL.to_string(), Amount::ZERO);
        pools.insert(PUBLIC_SALE_POOL.to_string(), Amount::ZERO);

        let total_minted = safe_add(
            safe_add(archiving_rewards, development)?,
            safe_add(community, public_sale)?,
        )?;
        validate_supply_limits(total_minted)?;

        Ok(Self {
            balances,
            staked: HashMap::new(),
            pools,
            total_minted,
            total_burned: Amount::ZERO,
        })
    }

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    pub fn staked_of(&self, address: &Address) -> Amount {
        self.staked.get(address).copied().unwrap_or(Amount::ZERO)
    }

    pub fn pool_balance(&self, pool: &str) -> Amount {
        self.pools.get(pool).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_minted(&self) -> Amount {
        self.total_minted
    }

    pub fn total_burned(&self) -> Amount {
        self.total_burned
    }

    fn credit(&mut self, address: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        let current = self.balance_of(address);
        let updated = validate_balance_operation(current, amount, BalanceOp::Add)?;
        self.balances.insert(address.clone(), updated);
        Ok(())
    }

    fn debit(&mut self, address: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        let current = self.balance_of(address);
        if current < amount {
            return Err(ArchiveChainError::InsufficientBalance {
                need: amount.to_string(),
                have: current.to_string(),
            });
        }
        let updated = validate_balance_operation(current, amount, BalanceOp::Subtract)?;
        self.balances.insert(address.clone(), updated);
        Ok(())
    }

    /// `amount + fee` leaves `from`, `amount` reaches `to`, 10% of `fee` is
    /// burned, and the remaining 90% is credited to the fee pool.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
        fee: Amount,
    ) -> Result<(), ArchiveChainError> {
        let total_debit = safe_add(amount, fee)?;
        self.debit(from, total_debit)?;
        self.credit(to, amount)?;

        if fee > Amount::ZERO {
            let burn_amount = safe_percentage(fee, TRANSACTION_FEE_BURN_RATE_PERCENT)?;
            let remainder = safe_subtract(fee, burn_amount)?;
            self.total_burned = safe_add(self.total_burned, burn_amount)?;
            if remainder > Amount::ZERO {
                self.credit(&Address::system("fee_pool"), remainder)?;
            }
        }
        Ok(())
    }

    pub fn stake(&mut self, address: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        self.debit(address, amount)?;
        let current_stake = self.staked_of(address);
        let updated = safe_add(current_stake, amount)?;
        self.staked.insert(address.clone(), updated);
        Ok(())
    }

    pub fn unstake(&mut self, address: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        let current_stake = self.staked_of(address);
        if current_stake < amount {
            return Err(ArchiveChainError::InsufficientStake {
                need: amount.to_string(),
                have: current_stake.to_string(),
            });
        }
        let updated_stake = safe_subtract(current_stake, amount)?;
        self.staked.insert(address.clone(), updated_stake);
        self.credit(address, amount)?;
        Ok(())
    }

    /// Debit `amount` out of `from` into contract escrow. Used by the chain
    /// layer when a contract call (e.g. creating a bounty) locks up funds;
    /// the contract crate itself never touches the ledger directly.
    pub fn escrow(&mut self, from: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        self.debit(from, amount)
    }

    /// Release previously escrowed funds to `to` (payout or refund).
    pub fn release_escrow(&mut self, to: &Address, amount: Amount) -> Result<(), ArchiveChainError> {
        self.credit(to, amount)
    }

    /// Pay a reward out of `pool`, clamping to the pool's remaining balance
    /// (matches the original's "reduce reward if pool is running low").
    /// Returns the amount actually paid.
    pub fn pay_reward(
        &mut self,
        pool: &str,
        to: &Address,
        requested: Amount,
    ) -> Result<Amount, ArchiveChainError> {
        let available = self.pool_balance(pool);
        let paid = if requested > available {
            available
        } else {
            requested
        };
        if paid == Amount::ZERO {
            return Err(ArchiveChainError::PoolExhausted(pool.to_string()));
        }
        let updated_pool = safe_subtract(available, paid)?;
        self.pools.insert(pool.to_string(), updated_pool);
        self.credit(to, paid)?;
        Ok(paid)
    }

    /// Sum of balances + staked + pools + burned — must equal
    /// `total_minted` at every committed state.
    pub fn conservation_total(&self) -> Result<Amount, ArchiveChainError> {
        let balances_sum = archivechain_safemath::sum_amounts_safely(
            &self.balances.values().copied().collect::<Vec<_>>(),
        )?;
        let staked_sum = archivechain_safemath::sum_amounts_safely(
            &self.staked.values().copied().collect::<Vec<_>>(),
        )?;
        let pools_sum = archivechain_safemath::sum_amounts_safely(
            &self.pools.values().copied().collect::<Vec<_>>(),
        )?;
        safe_add(safe_add(balances_sum, staked_sum)?, safe_add(pools_sum, self.total_burned)?)
    }
}
