use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ==================== Domain Events ====================

pub fn emit_initialized(
    env: &Env,
    manager: &Address,
    deposit_address: &Address,
    cap: i128,
    total_supply: i128,
    sale_end_time: u64,
    trade_start_time: u64,
) {
    env.events().publish(
        (symbol_short!("init"), manager.clone()),
        (
            deposit_address.clone(),
            cap,
            total_supply,
            sale_end_time,
            trade_start_time,
        ),
    );
}

/// Published once per accepted investment.
pub fn emit_invest(env: &Env, investor: &Address, value: i128, tokens: i128) {
    env.events()
        .publish((symbol_short!("invest"), investor.clone()), (value, tokens));
}

pub fn emit_transfer(env: &Env, from: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("transfer"), from.clone(), to.clone()),
        amount,
    );
}

pub fn emit_approval(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("approve"), owner.clone(), spender.clone()),
        amount,
    );
}

pub fn emit_burn(env: &Env, manager: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("burn"), manager.clone()), amount);
}

pub fn emit_halted(env: &Env, manager: &Address) {
    env.events()
        .publish((symbol_short!("halted"),), manager.clone());
}

pub fn emit_resumed(env: &Env, manager: &Address) {
    env.events()
        .publish((symbol_short!("resumed"),), manager.clone());
}

pub fn emit_deposit_address_changed(env: &Env, manager: &Address, old: &Address, new: &Address) {
    env.events().publish(
        (symbol_short!("dep_addr"), manager.clone()),
        (old.clone(), new.clone()),
    );
}

// ==================== Structured Logging ====================

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct StructuredLog {
    pub operation: Symbol,
    pub actor: Option<Address>,
    pub target: Option<Address>,
    pub amount: Option<i128>,
    pub timestamp: u64,
}

fn publish_log(
    env: &Env,
    now: u64,
    level: Symbol,
    operation: &str,
    actor: Option<Address>,
    target: Option<Address>,
    amount: Option<i128>,
) {
    let entry = StructuredLog {
        operation: Symbol::new(env, operation),
        actor,
        target,
        amount,
        timestamp: now,
    };
    env.events().publish((symbol_short!("LOG"), level), entry);
}

pub fn log_info(
    env: &Env,
    now: u64,
    operation: &str,
    actor: Option<Address>,
    target: Option<Address>,
    amount: Option<i128>,
) {
    publish_log(env, now, symbol_short!("LOG_INFO"), operation, actor, target, amount);
}

/// Accepted calls that changed nothing, e.g. burning an empty reserve.
pub fn log_warn(
    env: &Env,
    now: u64,
    operation: &str,
    actor: Option<Address>,
    target: Option<Address>,
    amount: Option<i128>,
) {
    publish_log(env, now, symbol_short!("LOG_WARN"), operation, actor, target, amount);
}
