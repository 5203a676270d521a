#![cfg(test)]

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Symbol, Vec};

#[contracttype]
#[derive(Clone)]
struct Checkpoint {
    ledger: u32,
    value: i128,
}

#[contracttype]
#[derive(Clone)]
enum TokenKey {
    Controller,
    RefuseMints,
    Balance(Address),
    Supply,
}

fn history(env: &Env, key: &TokenKey) -> Vec<Checkpoint> {
    env.storage()
        .instance()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

fn value_at(history: &Vec<Checkpoint>, ledger: u32) -> i128 {
    for checkpoint in history.iter().rev() {
        if checkpoint.ledger <= ledger {
            return checkpoint.value;
        }
    }
    0
}

fn latest(history: &Vec<Checkpoint>) -> i128 {
    history.last().map(|checkpoint| checkpoint.value).unwrap_or(0)
}

fn update(env: &Env, key: &TokenKey, delta: i128) {
    let mut history = history(env, key);
    let value = latest(&history) + delta;
    assert!(value >= 0, "insufficient balance");

    let ledger = env.ledger().sequence();
    if let Some(last) = history.last() {
        if last.ledger == ledger {
            history.pop_back();
        }
    }
    history.push_back(Checkpoint { ledger, value });
    env.storage().instance().set(key, &history);
}

/// Checkpointed token: every balance and the supply keep one entry per
/// ledger in which they changed.
#[contract]
pub struct MockSnapshotToken;

#[contractimpl]
impl MockSnapshotToken {
    pub fn __constructor(env: Env, controller: Address) {
        env.storage().instance().set(&TokenKey::Controller, &controller);
    }

    pub fn change_controller(env: Env, controller: Address) {
        let current: Address = env.storage().instance().get(&TokenKey::Controller).unwrap();
        current.require_auth();
        env.storage().instance().set(&TokenKey::Controller, &controller);
    }

    pub fn generate_tokens(env: Env, owner: Address, amount: i128) -> bool {
        let controller: Address = env.storage().instance().get(&TokenKey::Controller).unwrap();
        controller.require_auth();
        if env.storage().instance().has(&TokenKey::RefuseMints) {
            return false;
        }
        update(&env, &TokenKey::Balance(owner), amount);
        update(&env, &TokenKey::Supply, amount);
        true
    }

    /// Makes `generate_tokens` report failure without minting.
    pub fn refuse_mints(env: Env) {
        env.storage().instance().set(&TokenKey::RefuseMints, &true);
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        update(&env, &TokenKey::Balance(from), -amount);
        update(&env, &TokenKey::Balance(to), amount);
    }

    pub fn balance(env: Env, owner: Address) -> i128 {
        latest(&history(&env, &TokenKey::Balance(owner)))
    }

    pub fn balance_of_at(env: Env, owner: Address, ledger: u32) -> i128 {
        value_at(&history(&env, &TokenKey::Balance(owner)), ledger)
    }

    pub fn total_supply_at(env: Env, ledger: u32) -> i128 {
        value_at(&history(&env, &TokenKey::Supply), ledger)
    }
}

#[contracttype]
#[derive(Clone)]
enum KernelKey {
    Permission(Address, Symbol),
    AnyEntity(Symbol),
    RecoveryVault,
}

#[contract]
pub struct MockKernel;

#[contractimpl]
impl MockKernel {
    pub fn grant_permission(env: Env, who: Address, what: Symbol) {
        env.storage()
            .instance()
            .set(&KernelKey::Permission(who, what), &true);
    }

    pub fn grant_any(env: Env, what: Symbol) {
        env.storage().instance().set(&KernelKey::AnyEntity(what), &true);
    }

    pub fn set_recovery_vault(env: Env, vault: Address) {
        env.storage().instance().set(&KernelKey::RecoveryVault, &vault);
    }

    pub fn has_permission(env: Env, who: Address, _where: Address, what: Symbol) -> bool {
        env.storage()
            .instance()
            .has(&KernelKey::AnyEntity(what.clone()))
            || env
                .storage()
                .instance()
                .has(&KernelKey::Permission(who, what))
    }

    pub fn recovery_vault(env: Env) -> Address {
        env.storage().instance().get(&KernelKey::RecoveryVault).unwrap()
    }
}

#[contracttype]
#[derive(Clone)]
enum TargetKey {
    Counter,
    Failing,
}

/// Script target that counts the calls it receives.
#[contract]
pub struct ExecutionTarget;

#[contractimpl]
impl ExecutionTarget {
    pub fn execute(env: Env) {
        Self::execute_with(env, 1);
    }

    pub fn execute_with(env: Env, amount: u32) {
        let failing: bool = env
            .storage()
            .instance()
            .get(&TargetKey::Failing)
            .unwrap_or(false);
        assert!(!failing, "target failure");

        let counter = Self::counter(env.clone());
        env.storage()
            .instance()
            .set(&TargetKey::Counter, &(counter + amount));
    }

    pub fn set_failing(env: Env, failing: bool) {
        env.storage().instance().set(&TargetKey::Failing, &failing);
    }

    pub fn counter(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&TargetKey::Counter)
            .unwrap_or(0)
    }
}
