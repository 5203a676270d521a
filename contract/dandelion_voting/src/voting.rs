use soroban_sdk::{log, Address, Env, TryFromVal, Val, Vec};

use crate::events::{self, CastVoteEvent};
use crate::interfaces::SnapshotTokenClient;
use crate::pct::is_value_pct;
use crate::storage;
use crate::storage_types::{Action, Vote, VoteId, VoteView, VoterState, VotingError};

pub fn is_vote_open(env: &Env, vote: &Vote) -> bool {
    env.ledger().timestamp() < vote.start_date.saturating_add(vote.vote_duration)
        && !vote.executed
        && vote.voting_power > 0
}

/// Support is measured over the ballots cast, quorum over the whole
/// voting power frozen at the snapshot.
pub fn vote_passed(vote: &Vote) -> bool {
    let total_votes = vote.yea.saturating_add(vote.nay);
    is_value_pct(vote.yea, total_votes, vote.support_required_pct)
        && is_value_pct(vote.yea, vote.voting_power, vote.min_accept_quorum_pct)
}

pub fn can_execute(env: &Env, vote: &Vote) -> bool {
    !vote.executed && env.ledger().timestamp() >= vote.execution_date && vote_passed(vote)
}

/// Weight of `voter` on `vote`: the snapshot balance, capped by whatever the
/// voter still holds now.
pub fn voter_weight(env: &Env, token: &Address, vote: &Vote, voter: &Address) -> i128 {
    let token = SnapshotTokenClient::new(env, token);
    let at_snapshot = token.balance_of_at(voter, &vote.snapshot_block);
    if at_snapshot <= 0 {
        return 0;
    }
    at_snapshot.min(token.balance(voter)).max(0)
}

/// Records a ballot. Callers have already checked the vote is open, the
/// voter is absent and `weight` is positive; the caller persists `vote`.
pub fn cast(
    env: &Env,
    vote_id: VoteId,
    vote: &mut Vote,
    voter: &Address,
    supports: bool,
    weight: i128,
) {
    if supports {
        vote.yea = vote.yea.saturating_add(weight);
        storage::set_voter_state(env, vote_id, voter, VoterState::Yea);
        if vote_id > storage::latest_yea_vote_id(env, voter) {
            storage::set_latest_yea_vote_id(env, voter, vote_id);
        }
    } else {
        vote.nay = vote.nay.saturating_add(weight);
        storage::set_voter_state(env, vote_id, voter, VoterState::Nay);
    }

    log!(env, "ballot cast", vote_id, voter.clone(), supports, weight);
    events::emit_cast_vote(
        env,
        CastVoteEvent {
            vote_id,
            voter: voter.clone(),
            supports,
            stake: weight,
        },
    );
}

/// Runs every action in order. A failing action traps the whole invocation.
pub fn run_script(env: &Env, script: &Vec<Action>) {
    for action in script.iter() {
        env.invoke_contract::<Val>(&action.target, &action.function, action.args);
    }
}

/// `true` unless `sender`'s latest yea vote could still be enacted: it is
/// executed, or it failed and its execution date has passed.
pub fn no_recent_positive_votes(env: &Env, sender: &Address) -> bool {
    let latest = storage::latest_yea_vote_id(env, sender);
    if latest == 0 {
        return true;
    }
    let Ok(vote) = storage::load_vote(env, latest) else {
        return true;
    };

    let execution_date_passed = env.ledger().timestamp() >= vote.execution_date;
    vote.executed || (!vote_passed(&vote) && execution_date_passed)
}

/// Decodes the sender the kernel passes as the first oracle parameter.
pub fn oracle_sender(env: &Env, how: &Vec<Val>) -> Result<Address, VotingError> {
    let raw = how.get(0).ok_or(VotingError::OracleSenderMissing)?;

    if let Ok(sender) = Address::try_from_val(env, &raw) {
        return Ok(sender);
    }

    let is_zero = raw.is_void()
        || matches!(u32::try_from_val(env, &raw), Ok(0))
        || matches!(u64::try_from_val(env, &raw), Ok(0))
        || matches!(i128::try_from_val(env, &raw), Ok(0));
    if is_zero {
        Err(VotingError::OracleSenderZero)
    } else {
        Err(VotingError::OracleSenderTooBig)
    }
}

pub fn to_view(env: &Env, vote: &Vote) -> VoteView {
    VoteView {
        open: is_vote_open(env, vote),
        executed: vote.executed,
        start_date: vote.start_date,
        execution_date: vote.execution_date,
        snapshot_block: vote.snapshot_block,
        support_required: vote.support_required_pct,
        min_accept_quorum: vote.min_accept_quorum_pct,
        voting_power: vote.voting_power,
        yea: vote.yea,
        nay: vote.nay,
        script: vote.script.clone(),
        metadata: vote.metadata.clone(),
    }
}
