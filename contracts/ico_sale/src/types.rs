use soroban_sdk::{contracttype, Address, Env, String};

/// One whole unit of the native currency, in stroops.
pub const STROOPS_PER_UNIT: i128 = 10_000_000;

pub const MIN_CONTRIBUTION: i128 = STROOPS_PER_UNIT / 10; // 0.1 units
pub const MAX_CONTRIBUTION: i128 = 10 * STROOPS_PER_UNIT;
pub const SALE_CAP: i128 = 300 * STROOPS_PER_UNIT;
pub const TOTAL_SUPPLY: i128 = 100_000;
pub const WEEK_IN_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Phase as observed by a caller after the time override is applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum Phase {
    Running = 0,
    Ended = 1,
    Halted = 2,
}

/// Parameters supplied once, at `initialize`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleParams {
    pub sale_duration: u64, // seconds from initialization until the sale ends
    pub trade_delay: u64,   // seconds between sale end and trade start
    pub min_contribution: i128,
    pub max_contribution: i128,
    pub cap: i128,
    pub token_price: i128, // value units per whole token
    pub total_supply: i128,
    pub name: String,
    pub symbol: String,
}

/// Immutable part of the sale, fixed at initialization.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleConfig {
    pub manager: Address,
    pub native_token: Address,
    pub min_contribution: i128,
    pub max_contribution: i128,
    pub cap: i128,
    pub token_price: i128,
    pub total_supply: i128,
    pub sale_end_time: u64,
    pub trade_start_time: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleState {
    pub deposit_address: Address,
    pub halted: bool,
    pub raised_amount: i128,
    pub burned: i128,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    State,
    Metadata,
    Balance(Address),
    Allowance(Address, Address),
}

impl SaleConfig {
    /// Effective phase at `now`. Reaching the end time wins over the halt flag.
    pub fn phase_at(&self, state: &SaleState, now: u64) -> Phase {
        if now >= self.sale_end_time {
            Phase::Ended
        } else if state.halted {
            Phase::Halted
        } else {
            Phase::Running
        }
    }

    pub fn trading_open(&self, now: u64) -> bool {
        now >= self.trade_start_time
    }
}

/// Parameters of the reference deployment: a one week sale of 100000 tokens
/// at 0.1 units each, capped at 300 units, tradeable one week after it ends.
pub fn reference_params(env: &Env) -> SaleParams {
    SaleParams {
        sale_duration: WEEK_IN_SECONDS,
        trade_delay: WEEK_IN_SECONDS,
        min_contribution: MIN_CONTRIBUTION,
        max_contribution: MAX_CONTRIBUTION,
        cap: SALE_CAP,
        token_price: MIN_CONTRIBUTION,
        total_supply: TOTAL_SUPPLY,
        name: String::from_str(env, "ICO Token"),
        symbol: String::from_str(env, "ICO"),
    }
}
