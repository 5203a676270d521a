use soroban_sdk::{contracttype, Address, Env, String, Symbol};

use crate::storage_types::VoteId;

#[contracttype]
#[derive(Clone)]
pub struct StartVoteEvent {
    pub vote_id: VoteId,
    pub creator: Address,
    pub metadata: String,
}

#[contracttype]
#[derive(Clone)]
pub struct CastVoteEvent {
    pub vote_id: VoteId,
    pub voter: Address,
    pub supports: bool,
    pub stake: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct ExecuteVoteEvent {
    pub vote_id: VoteId,
}

pub fn emit_start_vote(env: &Env, event: StartVoteEvent) {
    env.events()
        .publish((Symbol::new(env, "start_vote"), event.vote_id), event);
}

pub fn emit_cast_vote(env: &Env, event: CastVoteEvent) {
    env.events()
        .publish((Symbol::new(env, "cast_vote"), event.vote_id), event);
}

pub fn emit_execute_vote(env: &Env, event: ExecuteVoteEvent) {
    env.events()
        .publish((Symbol::new(env, "execute_vote"), event.vote_id), event);
}

pub fn emit_change_support_required(env: &Env, support_required_pct: u64) {
    env.events().publish(
        (Symbol::new(env, "change_support_required"),),
        support_required_pct,
    );
}

pub fn emit_change_min_quorum(env: &Env, min_accept_quorum_pct: u64) {
    env.events().publish(
        (Symbol::new(env, "change_min_quorum"),),
        min_accept_quorum_pct,
    );
}

pub fn emit_change_execution_delay(env: &Env, execution_delay: u64) {
    env.events().publish(
        (Symbol::new(env, "change_execution_delay"),),
        execution_delay,
    );
}

pub fn emit_change_min_open_vote_amount(env: &Env, min_open_vote_amount: i128) {
    env.events().publish(
        (Symbol::new(env, "change_min_open_vote_amount"),),
        min_open_vote_amount,
    );
}
