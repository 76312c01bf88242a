use crate::errors::Error;
use crate::events;
use crate::storage::*;
use crate::types::*;
use soroban_sdk::{contract, contractimpl, contractmeta, token, Address, Env, String};

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Time-gated ICO sale ledger with phase-dependent token transfers"
);

#[contract]
pub struct IcoSale;

fn require_manager(config: &SaleConfig, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != config.manager {
        return Err(Error::NotOwner);
    }
    Ok(())
}

fn require_non_negative(amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    Ok(())
}

fn validate_params(params: &SaleParams) -> Result<(), Error> {
    let valid = params.min_contribution > 0
        && params.max_contribution >= params.min_contribution
        && params.cap >= params.max_contribution
        && params.token_price > 0
        && params.total_supply > 0
        && params.sale_duration > 0
        && params.trade_delay > 0
        && params.cap / params.token_price <= params.total_supply;
    if !valid {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

/// Moves `amount` tokens between balances. A self-transfer still requires
/// the balance to cover `amount` but leaves it untouched.
fn move_tokens(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let from_balance = get_balance(env, from);
    if from_balance < amount {
        return Err(Error::InsufficientBalance);
    }
    if from == to {
        return Ok(());
    }
    let to_balance = get_balance(env, to)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    set_balance(env, from, from_balance - amount);
    set_balance(env, to, to_balance);
    Ok(())
}

#[contractimpl]
impl IcoSale {
    /// Creates the sale. The whole supply is credited to `manager` and the
    /// sale starts running at the current ledger time.
    pub fn initialize(
        env: Env,
        manager: Address,
        native_token: Address,
        deposit_address: Address,
        params: SaleParams,
    ) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        manager.require_auth();

        validate_params(&params)?;
        if deposit_address == env.current_contract_address() {
            return Err(Error::InvalidDepositAddress);
        }

        let now = env.ledger().timestamp();
        let sale_end_time = now
            .checked_add(params.sale_duration)
            .ok_or(Error::Overflow)?;
        let trade_start_time = sale_end_time
            .checked_add(params.trade_delay)
            .ok_or(Error::Overflow)?;

        let config = SaleConfig {
            manager: manager.clone(),
            native_token,
            min_contribution: params.min_contribution,
            max_contribution: params.max_contribution,
            cap: params.cap,
            token_price: params.token_price,
            total_supply: params.total_supply,
            sale_end_time,
            trade_start_time,
        };
        let state = SaleState {
            deposit_address: deposit_address.clone(),
            halted: false,
            raised_amount: 0,
            burned: 0,
        };
        let metadata = TokenMetadata {
            decimals: 0,
            name: params.name,
            symbol: params.symbol,
        };

        set_config(&env, &config);
        set_state(&env, &state);
        set_metadata(&env, &metadata);
        set_balance(&env, &manager, params.total_supply);
        extend_instance(&env);

        events::emit_initialized(
            &env,
            &manager,
            &deposit_address,
            config.cap,
            config.total_supply,
            sale_end_time,
            trade_start_time,
        );
        events::emit_transfer(
            &env,
            &env.current_contract_address(),
            &manager,
            params.total_supply,
        );
        events::log_info(
            &env,
            now,
            "initialize",
            Some(manager),
            Some(deposit_address),
            Some(params.total_supply),
        );
        Ok(())
    }

    // ==================== Phase Control ====================

    pub fn halt(env: Env, caller: Address) -> Result<(), Error> {
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_manager(&config, &caller)?;

        let mut state = get_state(&env)?;
        if state.halted {
            events::log_warn(&env, now, "halt", Some(caller), None, None);
            return Ok(());
        }
        state.halted = true;
        set_state(&env, &state);
        extend_instance(&env);

        events::emit_halted(&env, &caller);
        events::log_info(&env, now, "halt", Some(caller), None, None);
        Ok(())
    }

    pub fn resume(env: Env, caller: Address) -> Result<(), Error> {
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_manager(&config, &caller)?;

        let mut state = get_state(&env)?;
        if !state.halted {
            events::log_warn(&env, now, "resume", Some(caller), None, None);
            return Ok(());
        }
        state.halted = false;
        set_state(&env, &state);
        extend_instance(&env);

        events::emit_resumed(&env, &caller);
        events::log_info(&env, now, "resume", Some(caller), None, None);
        Ok(())
    }

    /// Effective phase: `Ended` once the sale end time is reached, even if
    /// the manager halted the sale earlier.
    pub fn get_phase(env: Env) -> Result<Phase, Error> {
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        let state = get_state(&env)?;
        Ok(config.phase_at(&state, now))
    }

    // ==================== Administration ====================

    pub fn change_deposit_addr(env: Env, caller: Address, new_addr: Address) -> Result<(), Error> {
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_manager(&config, &caller)?;

        if new_addr == env.current_contract_address() {
            return Err(Error::InvalidDepositAddress);
        }

        let mut state = get_state(&env)?;
        let old_addr = state.deposit_address.clone();
        state.deposit_address = new_addr.clone();
        set_state(&env, &state);
        extend_instance(&env);

        events::emit_deposit_address_changed(&env, &caller, &old_addr, &new_addr);
        events::log_info(
            &env,
            now,
            "change_deposit_addr",
            Some(caller),
            Some(new_addr),
            None,
        );
        Ok(())
    }

    // ==================== Investment ====================

    /// Buys tokens with `value` stroops of the native currency, forwarded to
    /// the deposit address. Returns the number of tokens credited.
    pub fn invest(env: Env, investor: Address, value: i128) -> Result<i128, Error> {
        investor.require_auth();
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        let mut state = get_state(&env)?;

        if config.phase_at(&state, now) != Phase::Running {
            return Err(Error::MustBeRunning);
        }
        if value < config.min_contribution {
            return Err(Error::AmountBelowMinimumAllowed);
        }
        if value > config.max_contribution {
            return Err(Error::AmountAboveMaximumAllowed);
        }
        let raised_amount = state
            .raised_amount
            .checked_add(value)
            .ok_or(Error::Overflow)?;
        if raised_amount > config.cap {
            return Err(Error::AmountRaisedCannotExceedCap);
        }
        if value % config.token_price != 0 {
            return Err(Error::AmountNotMultipleOfPrice);
        }
        let tokens = value / config.token_price;
        if get_balance(&env, &config.manager) < tokens {
            return Err(Error::InsufficientBalance);
        }

        // Collect the payment before touching the sale ledger.
        token::Client::new(&env, &config.native_token).transfer(
            &investor,
            &state.deposit_address,
            &value,
        );

        move_tokens(&env, &config.manager, &investor, tokens)?;
        state.raised_amount = raised_amount;
        set_state(&env, &state);
        extend_instance(&env);

        events::emit_invest(&env, &investor, value, tokens);
        events::log_info(
            &env,
            now,
            "invest",
            Some(investor),
            Some(state.deposit_address),
            Some(value),
        );
        Ok(tokens)
    }

    // ==================== Settlement ====================

    /// Destroys whatever the manager still holds once the sale has ended.
    /// Returns the burned amount, which is zero on repeated calls.
    pub fn burn(env: Env, caller: Address) -> Result<i128, Error> {
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_manager(&config, &caller)?;

        let mut state = get_state(&env)?;
        if config.phase_at(&state, now) != Phase::Ended {
            return Err(Error::StateShouldBeEnded);
        }

        let amount = get_balance(&env, &config.manager);
        if amount == 0 {
            events::log_warn(&env, now, "burn", Some(caller), None, Some(0));
            return Ok(0);
        }

        state.burned = state.burned.checked_add(amount).ok_or(Error::Overflow)?;
        set_balance(&env, &config.manager, 0);
        set_state(&env, &state);
        extend_instance(&env);

        events::emit_burn(&env, &caller, amount);
        events::log_info(&env, now, "burn", Some(caller), None, Some(amount));
        Ok(amount)
    }

    // ==================== Token Movement ====================

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_non_negative(amount)?;

        if !config.trading_open(now) {
            return Err(Error::CannotTransferBeforeTradeTime);
        }
        move_tokens(&env, &from, &to, amount)?;
        extend_instance(&env);

        events::emit_transfer(&env, &from, &to, amount);
        events::log_info(&env, now, "transfer", Some(from), Some(to), Some(amount));
        Ok(())
    }

    /// Overwrites the allowance of `spender` over `owner`'s tokens. Allowed in
    /// every phase; only spending it is gated by the trade start time.
    pub fn approve(env: Env, owner: Address, spender: Address, amount: i128) -> Result<(), Error> {
        owner.require_auth();
        let now = env.ledger().timestamp();
        get_config(&env)?;
        require_non_negative(amount)?;

        set_allowance(&env, &owner, &spender, amount);
        extend_instance(&env);

        events::emit_approval(&env, &owner, &spender, amount);
        events::log_info(&env, now, "approve", Some(owner), Some(spender), Some(amount));
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        let now = env.ledger().timestamp();
        let config = get_config(&env)?;
        require_non_negative(amount)?;

        if !config.trading_open(now) {
            return Err(Error::CannotTransferBeforeTradeTime);
        }
        let allowance = get_allowance(&env, &from, &spender);
        if allowance < amount {
            return Err(Error::InsufficientAllowance);
        }
        move_tokens(&env, &from, &to, amount)?;
        set_allowance(&env, &from, &spender, allowance - amount);
        extend_instance(&env);

        events::emit_transfer(&env, &from, &to, amount);
        events::log_info(&env, now, "transfer_from", Some(spender), Some(to), Some(amount));
        Ok(())
    }

    // ==================== Read Accessors ====================

    pub fn get_manager(env: Env) -> Result<Address, Error> {
        Ok(get_config(&env)?.manager)
    }

    pub fn get_config(env: Env) -> Result<SaleConfig, Error> {
        get_config(&env)
    }

    pub fn get_deposit_addr(env: Env) -> Result<Address, Error> {
        Ok(get_state(&env)?.deposit_address)
    }

    pub fn get_cap(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.cap)
    }

    pub fn get_raised_amount(env: Env) -> Result<i128, Error> {
        Ok(get_state(&env)?.raised_amount)
    }

    pub fn get_min_contribution(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.min_contribution)
    }

    pub fn get_max_contribution(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.max_contribution)
    }

    pub fn get_token_price(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.token_price)
    }

    pub fn get_sale_end_time(env: Env) -> Result<u64, Error> {
        Ok(get_config(&env)?.sale_end_time)
    }

    pub fn get_trade_start_time(env: Env) -> Result<u64, Error> {
        Ok(get_config(&env)?.trade_start_time)
    }

    pub fn get_manager_balance(env: Env) -> Result<i128, Error> {
        let config = get_config(&env)?;
        Ok(get_balance(&env, &config.manager))
    }

    /// The founder reserve is the manager's balance; there is no separate account.
    pub fn get_founder_balance(env: Env) -> Result<i128, Error> {
        Self::get_manager_balance(env)
    }

    pub fn get_address_balance(env: Env, addr: Address) -> i128 {
        get_balance(&env, &addr)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        get_balance(&env, &id)
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        get_allowance(&env, &owner, &spender)
    }

    pub fn total_supply(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.total_supply)
    }

    pub fn burned(env: Env) -> Result<i128, Error> {
        Ok(get_state(&env)?.burned)
    }

    pub fn circulating_supply(env: Env) -> Result<i128, Error> {
        let config = get_config(&env)?;
        let state = get_state(&env)?;
        Ok(config.total_supply - state.burned)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(get_metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(get_metadata(&env)?.symbol)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(get_metadata(&env)?.decimals)
    }
}
