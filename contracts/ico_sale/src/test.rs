#![allow(clippy::unwrap_used)]

use crate::events::StructuredLog;
use crate::{
    reference_params, Error, IcoSale, IcoSaleClient, Phase, SaleConfig, SaleState,
    MIN_CONTRIBUTION, TOTAL_SUPPLY, WEEK_IN_SECONDS,
};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    Address, Env, String, Symbol, TryFromVal,
};

fn register(env: &Env) -> (IcoSaleClient<'_>, Address) {
    env.mock_all_auths();
    let contract_id = env.register_contract(None, IcoSale);
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(env))
        .address();
    (IcoSaleClient::new(env, &contract_id), native)
}

fn find_log(env: &Env, level: Symbol, operation: &str) -> Option<StructuredLog> {
    let operation = Symbol::new(env, operation);
    let mut found = None;
    for (_, topics, data) in env.events().all().iter() {
        if topics.len() < 2 {
            continue;
        }
        match Symbol::try_from_val(env, &topics.get(1).unwrap()) {
            Ok(topic) if topic == level => {}
            _ => continue,
        }
        if let Ok(entry) = StructuredLog::try_from_val(env, &data) {
            if entry.operation == operation {
                found = Some(entry);
            }
        }
    }
    found
}

#[test]
fn test_initialize_seeds_manager_with_supply() {
    let env = Env::default();
    env.ledger().with_mut(|li| li.timestamp = 1_000);
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    let deposit = Address::generate(&env);

    client.initialize(&manager, &native, &deposit, &reference_params(&env));

    let log = find_log(&env, symbol_short!("LOG_INFO"), "initialize").unwrap();
    assert_eq!(log.actor, Some(manager));
    assert_eq!(log.target, Some(deposit.clone()));
    assert_eq!(log.amount, Some(TOTAL_SUPPLY));
    assert_eq!(log.timestamp, 1_000);

    assert_eq!(client.get_manager_balance(), TOTAL_SUPPLY);
    assert_eq!(client.total_supply(), TOTAL_SUPPLY);
    assert_eq!(client.circulating_supply(), TOTAL_SUPPLY);
    assert_eq!(client.get_raised_amount(), 0);
    assert_eq!(client.get_phase(), Phase::Running);
    assert_eq!(client.get_deposit_addr(), deposit);
    assert_eq!(client.get_min_contribution(), MIN_CONTRIBUTION);
    assert_eq!(client.get_token_price(), MIN_CONTRIBUTION);
    assert_eq!(client.get_max_contribution(), 100 * MIN_CONTRIBUTION);
    assert_eq!(client.get_sale_end_time(), 1_000 + WEEK_IN_SECONDS);
    assert_eq!(client.get_trade_start_time(), 1_000 + 2 * WEEK_IN_SECONDS);
    assert_eq!(client.name(), String::from_str(&env, "ICO Token"));
    assert_eq!(client.symbol(), String::from_str(&env, "ICO"));
    assert_eq!(client.decimals(), 0);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    let deposit = Address::generate(&env);

    client.initialize(&manager, &native, &deposit, &reference_params(&env));
    let result = client.try_initialize(&manager, &native, &deposit, &reference_params(&env));
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_calls_before_initialize_fail() {
    let env = Env::default();
    let (client, _) = register(&env);
    let caller = Address::generate(&env);

    assert_eq!(client.try_get_phase(), Err(Ok(Error::NotInitialized)));
    assert_eq!(client.try_halt(&caller), Err(Ok(Error::NotInitialized)));
    assert_eq!(
        client.try_invest(&caller, &MIN_CONTRIBUTION),
        Err(Ok(Error::NotInitialized))
    );
    assert_eq!(client.balance(&caller), 0);
}

#[test]
fn test_initialize_rejects_invalid_params() {
    let env = Env::default();
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    let deposit = Address::generate(&env);

    let mut params = reference_params(&env);
    params.trade_delay = 0;
    assert_eq!(
        client.try_initialize(&manager, &native, &deposit, &params),
        Err(Ok(Error::InvalidConfig))
    );

    let mut params = reference_params(&env);
    params.max_contribution = params.min_contribution - 1;
    assert_eq!(
        client.try_initialize(&manager, &native, &deposit, &params),
        Err(Ok(Error::InvalidConfig))
    );

    // A cap that would need more tokens than exist.
    let mut params = reference_params(&env);
    params.total_supply = params.cap / params.token_price - 1;
    assert_eq!(
        client.try_initialize(&manager, &native, &deposit, &params),
        Err(Ok(Error::InvalidConfig))
    );

    let mut params = reference_params(&env);
    params.sale_duration = u64::MAX;
    assert_eq!(
        client.try_initialize(&manager, &native, &deposit, &params),
        Err(Ok(Error::Overflow))
    );

    assert_eq!(
        client.try_initialize(&manager, &native, &client.address, &reference_params(&env)),
        Err(Ok(Error::InvalidDepositAddress))
    );

    client.initialize(&manager, &native, &deposit, &reference_params(&env));
}

#[test]
fn test_phase_precedence() {
    let env = Env::default();
    let config = SaleConfig {
        manager: Address::generate(&env),
        native_token: Address::generate(&env),
        min_contribution: 1,
        max_contribution: 10,
        cap: 100,
        token_price: 1,
        total_supply: 1_000,
        sale_end_time: 50,
        trade_start_time: 60,
    };
    let mut state = SaleState {
        deposit_address: Address::generate(&env),
        halted: false,
        raised_amount: 0,
        burned: 0,
    };

    assert_eq!(config.phase_at(&state, 49), Phase::Running);
    assert_eq!(config.phase_at(&state, 50), Phase::Ended);

    state.halted = true;
    assert_eq!(config.phase_at(&state, 0), Phase::Halted);
    assert_eq!(config.phase_at(&state, 50), Phase::Ended);

    assert!(!config.trading_open(59));
    assert!(config.trading_open(60));
}

#[test]
fn test_repeated_halt_logs_warning() {
    let env = Env::default();
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    client.initialize(&manager, &native, &Address::generate(&env), &reference_params(&env));

    client.halt(&manager);
    client.halt(&manager);

    let warn = find_log(&env, symbol_short!("LOG_WARN"), "halt").unwrap();
    assert_eq!(warn.actor, Some(manager));
    assert_eq!(client.get_phase(), Phase::Halted);
}

#[test]
fn test_token_movements_are_logged() {
    let env = Env::default();
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    let spender = Address::generate(&env);
    let holder = Address::generate(&env);
    let recipient = Address::generate(&env);
    client.initialize(&manager, &native, &Address::generate(&env), &reference_params(&env));

    let trade_start = client.get_trade_start_time();
    env.ledger().with_mut(|li| li.timestamp = trade_start);

    client.transfer(&manager, &holder, &50);
    let log = find_log(&env, symbol_short!("LOG_INFO"), "transfer").unwrap();
    assert_eq!(log.actor, Some(manager.clone()));
    assert_eq!(log.target, Some(holder.clone()));
    assert_eq!(log.amount, Some(50));
    assert_eq!(log.timestamp, trade_start);

    client.approve(&holder, &spender, &20);
    client.transfer_from(&spender, &holder, &recipient, &20);
    let log = find_log(&env, symbol_short!("LOG_INFO"), "transfer_from").unwrap();
    assert_eq!(log.actor, Some(spender));
    assert_eq!(log.target, Some(recipient.clone()));
    assert_eq!(log.amount, Some(20));
    assert_eq!(client.balance(&recipient), 20);
}

#[test]
fn test_empty_burn_logs_warning() {
    let env = Env::default();
    let (client, native) = register(&env);
    let manager = Address::generate(&env);
    client.initialize(&manager, &native, &Address::generate(&env), &reference_params(&env));

    let sale_end = client.get_sale_end_time();
    env.ledger().with_mut(|li| li.timestamp = sale_end);
    assert_eq!(client.burn(&manager), TOTAL_SUPPLY);
    assert_eq!(client.burn(&manager), 0);

    let warn = find_log(&env, symbol_short!("LOG_WARN"), "burn").unwrap();
    assert_eq!(warn.amount, Some(0));
}
