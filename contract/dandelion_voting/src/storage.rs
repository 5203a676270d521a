use soroban_sdk::{Address, BytesN, Env};

use crate::storage_types::{
    DataKey, PersistentKey, Settings, Vote, VoteId, VoterState, VotingError, TTL_EXTEND_TO,
    TTL_THRESHOLD,
};

pub fn extend_instance(env: &Env) {
    env.storage().instance().extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_persistent(env: &Env, key: &PersistentKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_petrified(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Petrified)
}

pub fn has_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::InitializationLedger)
}

pub fn require_initialized(env: &Env) -> Result<(), VotingError> {
    if has_initialized(env) {
        Ok(())
    } else {
        Err(VotingError::NotInitialized)
    }
}

pub fn initialization_ledger(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::InitializationLedger)
}

pub fn kernel(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Kernel)
}

pub fn token(env: &Env) -> Result<Address, VotingError> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(VotingError::NotInitialized)
}

pub fn forwarder(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Forwarder)
}

pub fn settings(env: &Env) -> Result<Settings, VotingError> {
    env.storage()
        .instance()
        .get(&DataKey::Settings)
        .ok_or(VotingError::NotInitialized)
}

pub fn set_settings(env: &Env, settings: &Settings) {
    env.storage().instance().set(&DataKey::Settings, settings);
    extend_instance(env);
}

pub fn votes_length(env: &Env) -> VoteId {
    env.storage()
        .instance()
        .get(&DataKey::VotesLength)
        .unwrap_or(0)
}

pub fn set_votes_length(env: &Env, length: VoteId) {
    env.storage().instance().set(&DataKey::VotesLength, &length);
    extend_instance(env);
}

/// Loads an existing vote, rejecting the reserved id 0 and ids never issued.
pub fn load_vote(env: &Env, vote_id: VoteId) -> Result<Vote, VotingError> {
    if vote_id == 0 {
        return Err(VotingError::VoteIdZero);
    }
    if vote_id > votes_length(env) {
        return Err(VotingError::NoVote);
    }
    env.storage()
        .persistent()
        .get(&PersistentKey::Vote(vote_id))
        .ok_or(VotingError::NoVote)
}

pub fn save_vote(env: &Env, vote_id: VoteId, vote: &Vote) {
    let key = PersistentKey::Vote(vote_id);
    env.storage().persistent().set(&key, vote);
    extend_persistent(env, &key);
}

pub fn voter_state(env: &Env, vote_id: VoteId, voter: &Address) -> VoterState {
    env.storage()
        .persistent()
        .get(&PersistentKey::VoterState(vote_id, voter.clone()))
        .unwrap_or(VoterState::Absent)
}

pub fn set_voter_state(env: &Env, vote_id: VoteId, voter: &Address, state: VoterState) {
    let key = PersistentKey::VoterState(vote_id, voter.clone());
    env.storage().persistent().set(&key, &state);
    extend_persistent(env, &key);
}

pub fn latest_yea_vote_id(env: &Env, voter: &Address) -> VoteId {
    env.storage()
        .persistent()
        .get(&PersistentKey::LatestYeaVoteId(voter.clone()))
        .unwrap_or(0)
}

pub fn set_latest_yea_vote_id(env: &Env, voter: &Address, vote_id: VoteId) {
    let key = PersistentKey::LatestYeaVoteId(voter.clone());
    env.storage().persistent().set(&key, &vote_id);
    extend_persistent(env, &key);
}

pub fn delegation_key(env: &Env, holder: &Address) -> Option<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&PersistentKey::DelegationKey(holder.clone()))
}

pub fn set_delegation_key(env: &Env, holder: &Address, key: &BytesN<32>) {
    let storage_key = PersistentKey::DelegationKey(holder.clone());
    env.storage().persistent().set(&storage_key, key);
    extend_persistent(env, &storage_key);
}
