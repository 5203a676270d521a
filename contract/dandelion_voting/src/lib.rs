#![no_std]

use soroban_sdk::{
    contract, contractimpl, log, token, Address, BytesN, Env, String, Symbol, Val, Vec,
};

mod delegation;
mod events;
mod interfaces;
mod pct;
mod storage;
mod storage_types;
mod voting;

#[cfg(test)]
mod testutils;

use events::{ExecuteVoteEvent, StartVoteEvent};
pub use interfaces::{KernelClient, Role, SnapshotTokenClient, TokenControllerClient};
pub use storage_types::*;

#[contract]
pub struct DandelionVoting;

#[contractimpl]
impl DandelionVoting {
    /// Links the app to its authorization kernel. Deploying without a kernel
    /// yields a petrified base instance that can never be initialized.
    pub fn __constructor(env: Env, kernel: Option<Address>) {
        match kernel {
            Some(kernel) => env.storage().instance().set(&DataKey::Kernel, &kernel),
            None => env.storage().instance().set(&DataKey::Petrified, &true),
        }
        storage::extend_instance(&env);
    }

    pub fn initialize(
        env: Env,
        token: Address,
        support_required_pct: u64,
        min_accept_quorum_pct: u64,
        vote_duration: u64,
        execution_delay: u64,
        forwarder: Address,
    ) -> Result<(), VotingError> {
        if storage::is_petrified(&env) || storage::has_initialized(&env) {
            return Err(VotingError::AlreadyInitialized);
        }
        if min_accept_quorum_pct > support_required_pct {
            return Err(VotingError::InitPcts);
        }
        if support_required_pct >= PCT_BASE {
            return Err(VotingError::InitSupportTooBig);
        }

        let settings = Settings {
            support_required_pct,
            min_accept_quorum_pct,
            vote_duration,
            execution_delay,
            min_open_vote_amount: 0,
        };

        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Forwarder, &forwarder);
        env.storage()
            .instance()
            .set(&DataKey::InitializationLedger, &env.ledger().sequence());
        storage::set_settings(&env, &settings);
        storage::set_votes_length(&env, 0);

        log!(&env, "voting initialized", token, support_required_pct, min_accept_quorum_pct);
        Ok(())
    }

    pub fn change_support_required_pct(
        env: Env,
        sender: Address,
        support_required_pct: u64,
    ) -> Result<(), VotingError> {
        Self::authorize(&env, &sender, Role::ModifySupport)?;

        let mut settings = storage::settings(&env)?;
        if settings.min_accept_quorum_pct > support_required_pct {
            return Err(VotingError::ChangeSupportPcts);
        }
        if support_required_pct >= PCT_BASE {
            return Err(VotingError::ChangeSupportTooBig);
        }

        settings.support_required_pct = support_required_pct;
        storage::set_settings(&env, &settings);
        events::emit_change_support_required(&env, support_required_pct);
        Ok(())
    }

    pub fn change_min_accept_quorum_pct(
        env: Env,
        sender: Address,
        min_accept_quorum_pct: u64,
    ) -> Result<(), VotingError> {
        Self::authorize(&env, &sender, Role::ModifyQuorum)?;

        let mut settings = storage::settings(&env)?;
        if min_accept_quorum_pct > settings.support_required_pct {
            return Err(VotingError::ChangeQuorumPcts);
        }

        settings.min_accept_quorum_pct = min_accept_quorum_pct;
        storage::set_settings(&env, &settings);
        events::emit_change_min_quorum(&env, min_accept_quorum_pct);
        Ok(())
    }

    pub fn change_execution_delay(
        env: Env,
        sender: Address,
        execution_delay: u64,
    ) -> Result<(), VotingError> {
        Self::authorize(&env, &sender, Role::ModifyExecutionDelay)?;

        let mut settings = storage::settings(&env)?;
        settings.execution_delay = execution_delay;
        storage::set_settings(&env, &settings);
        events::emit_change_execution_delay(&env, execution_delay);
        Ok(())
    }

    pub fn change_min_open_vote_amount(
        env: Env,
        sender: Address,
        min_open_vote_amount: i128,
    ) -> Result<(), VotingError> {
        Self::authorize(&env, &sender, Role::ModifyMinOpenVoteAmount)?;

        if min_open_vote_amount < 0 {
            return Err(VotingError::InvalidAmount);
        }

        let mut settings = storage::settings(&env)?;
        settings.min_open_vote_amount = min_open_vote_amount;
        storage::set_settings(&env, &settings);
        events::emit_change_min_open_vote_amount(&env, min_open_vote_amount);
        Ok(())
    }

    /// Opens a vote. The sender needs the create-votes role or a current
    /// balance of at least the minimum open-vote amount.
    pub fn new_vote(
        env: Env,
        sender: Address,
        script: Vec<Action>,
        metadata: String,
        cast_vote: bool,
    ) -> Result<VoteId, VotingError> {
        sender.require_auth();
        storage::require_initialized(&env)?;

        if !Self::can_open_vote(&env, &sender)? {
            return Err(VotingError::CanNotOpenVote);
        }

        Self::create_vote(&env, &sender, script, metadata, cast_vote)
    }

    /// Mints `amount` to `holder` and opens an empty-script vote in the same
    /// invocation. Needs the mint-and-open-vote role; no balance bypass. The
    /// voting app must be the token's controller. The mint lands in the
    /// current ledger, after the snapshot.
    pub fn mint_and_open_vote(
        env: Env,
        sender: Address,
        holder: Address,
        amount: i128,
        metadata: String,
    ) -> Result<VoteId, VotingError> {
        Self::authorize(&env, &sender, Role::MintAndOpenVote)?;

        if amount <= 0 {
            return Err(VotingError::InvalidAmount);
        }

        let token = storage::token(&env)?;
        if !TokenControllerClient::new(&env, &token).generate_tokens(&holder, &amount) {
            return Err(VotingError::MintFailed);
        }
        log!(&env, "tokens minted for vote", holder, amount);

        Self::create_vote(&env, &sender, Vec::new(&env), metadata, false)
    }

    pub fn vote(env: Env, sender: Address, vote_id: VoteId, supports: bool) -> Result<(), VotingError> {
        sender.require_auth();
        storage::require_initialized(&env)?;

        let mut vote = storage::load_vote(&env, vote_id)?;
        let weight = Self::eligible_weight(&env, vote_id, &vote, &sender)?;

        voting::cast(&env, vote_id, &mut vote, &sender, supports, weight);
        storage::save_vote(&env, vote_id, &vote);
        Ok(())
    }

    /// Casts `applicant`'s ballot on their behalf. `signature` is the
    /// applicant's ed25519 signature over [`Self::vote_for_digest`], checked
    /// against the key the applicant registered.
    pub fn vote_for(
        env: Env,
        sender: Address,
        applicant: Address,
        vote_id: VoteId,
        supports: bool,
        signature: BytesN<64>,
    ) -> Result<(), VotingError> {
        sender.require_auth();
        storage::require_initialized(&env)?;

        let mut vote = storage::load_vote(&env, vote_id)?;
        let weight = Self::eligible_weight(&env, vote_id, &vote, &applicant)?;

        let public_key =
            storage::delegation_key(&env, &applicant).ok_or(VotingError::CanNotVote)?;
        let digest = delegation::vote_for_digest(
            &env,
            &applicant,
            &sender,
            vote_id,
            supports,
            &env.current_contract_address(),
        );
        if !delegation::verify_signature(&public_key, &digest, &signature) {
            return Err(VotingError::CanNotVote);
        }

        voting::cast(&env, vote_id, &mut vote, &applicant, supports, weight);
        storage::save_vote(&env, vote_id, &vote);
        Ok(())
    }

    pub fn vote_for_digest(
        env: Env,
        applicant: Address,
        sender: Address,
        vote_id: VoteId,
        supports: bool,
    ) -> BytesN<32> {
        delegation::vote_for_digest(
            &env,
            &applicant,
            &sender,
            vote_id,
            supports,
            &env.current_contract_address(),
        )
    }

    pub fn set_delegation_key(env: Env, holder: Address, public_key: BytesN<32>) {
        holder.require_auth();
        storage::set_delegation_key(&env, &holder, &public_key);
    }

    pub fn delegation_key(env: Env, holder: Address) -> Option<BytesN<32>> {
        storage::delegation_key(&env, &holder)
    }

    /// Marks the vote executed and runs its script. A failing action traps
    /// the invocation, which rolls the executed flag back with everything else.
    pub fn execute_vote(env: Env, vote_id: VoteId) -> Result<(), VotingError> {
        storage::require_initialized(&env)?;

        let mut vote = storage::load_vote(&env, vote_id)?;
        if !voting::can_execute(&env, &vote) {
            return Err(VotingError::CanNotExecute);
        }

        vote.executed = true;
        storage::save_vote(&env, vote_id, &vote);

        log!(&env, "vote executed", vote_id);
        events::emit_execute_vote(&env, ExecuteVoteEvent { vote_id });

        voting::run_script(&env, &vote.script);
        Ok(())
    }

    pub fn can_execute(env: Env, vote_id: VoteId) -> bool {
        storage::load_vote(&env, vote_id)
            .map(|vote| voting::can_execute(&env, &vote))
            .unwrap_or(false)
    }

    pub fn can_vote(env: Env, vote_id: VoteId, voter: Address) -> bool {
        let Ok(vote) = storage::load_vote(&env, vote_id) else {
            return false;
        };
        let Ok(token) = storage::token(&env) else {
            return false;
        };
        voting::is_vote_open(&env, &vote)
            && storage::voter_state(&env, vote_id, &voter) == VoterState::Absent
            && voting::voter_weight(&env, &token, &vote, &voter) > 0
    }

    // Forwarding

    pub fn is_forwarder(_env: Env) -> bool {
        true
    }

    pub fn can_forward(env: Env, sender: Address, _script: Vec<Action>) -> bool {
        Self::may_forward(&env, &sender)
    }

    pub fn forward(env: Env, sender: Address, script: Vec<Action>) -> Result<VoteId, VotingError> {
        sender.require_auth();

        if !Self::may_forward(&env, &sender) {
            return Err(VotingError::CanNotForward);
        }

        Self::create_vote(&env, &sender, script, String::from_str(&env, ""), true)
    }

    // Positive-vote oracle

    /// Kernel permission oracle: grants only when the sender in `how[0]` has
    /// no favourable vote that could still be enacted.
    pub fn can_perform(
        env: Env,
        _who: Address,
        _where: Address,
        _what: Symbol,
        how: Vec<Val>,
    ) -> Result<bool, VotingError> {
        let sender = voting::oracle_sender(&env, &how)?;
        Ok(voting::no_recent_positive_votes(&env, &sender))
    }

    /// Token-manager transfer hook.
    pub fn on_transfer(env: Env, from: Address, _to: Address, _amount: i128) -> bool {
        voting::no_recent_positive_votes(&env, &from)
    }

    // Recovery

    /// Sends the app's whole balance of `asset` to the kernel's recovery
    /// vault. The governance token can never be recovered.
    pub fn transfer_to_vault(env: Env, asset: Address) -> Result<i128, VotingError> {
        storage::require_initialized(&env)?;
        if asset == storage::token(&env)? {
            return Err(VotingError::RecoverDisallowed);
        }

        let kernel = storage::kernel(&env).ok_or(VotingError::NotInitialized)?;
        let vault = KernelClient::new(&env, &kernel).recovery_vault();

        let asset_client = token::Client::new(&env, &asset);
        let this = env.current_contract_address();
        let balance = asset_client.balance(&this);
        if balance > 0 {
            asset_client.transfer(&this, &vault, &balance);
        }

        log!(&env, "funds recovered", asset, balance);
        Ok(balance)
    }

    // Queries

    pub fn get_vote(env: Env, vote_id: VoteId) -> Result<VoteView, VotingError> {
        let vote = storage::load_vote(&env, vote_id)?;
        Ok(voting::to_view(&env, &vote))
    }

    pub fn get_voter_state(env: Env, vote_id: VoteId, voter: Address) -> Result<VoterState, VotingError> {
        storage::load_vote(&env, vote_id)?;
        Ok(storage::voter_state(&env, vote_id, &voter))
    }

    pub fn latest_yea_vote_id(env: Env, voter: Address) -> VoteId {
        storage::latest_yea_vote_id(&env, &voter)
    }

    pub fn votes_length(env: Env) -> VoteId {
        storage::votes_length(&env)
    }

    pub fn is_value_pct(_env: Env, value: i128, total: i128, pct: u64) -> bool {
        pct::is_value_pct(value, total, pct)
    }

    pub fn pct_base(_env: Env) -> u64 {
        PCT_BASE
    }

    pub fn token(env: Env) -> Result<Address, VotingError> {
        storage::token(&env)
    }

    pub fn forwarder(env: Env) -> Option<Address> {
        storage::forwarder(&env)
    }

    pub fn support_required_pct(env: Env) -> Result<u64, VotingError> {
        Ok(storage::settings(&env)?.support_required_pct)
    }

    pub fn min_accept_quorum_pct(env: Env) -> Result<u64, VotingError> {
        Ok(storage::settings(&env)?.min_accept_quorum_pct)
    }

    pub fn vote_duration(env: Env) -> Result<u64, VotingError> {
        Ok(storage::settings(&env)?.vote_duration)
    }

    pub fn execution_delay(env: Env) -> Result<u64, VotingError> {
        Ok(storage::settings(&env)?.execution_delay)
    }

    pub fn min_open_vote_amount(env: Env) -> Result<i128, VotingError> {
        Ok(storage::settings(&env)?.min_open_vote_amount)
    }

    pub fn has_initialized(env: Env) -> bool {
        storage::has_initialized(&env)
    }

    pub fn initialization_ledger(env: Env) -> Option<u32> {
        storage::initialization_ledger(&env)
    }

    pub fn is_petrified(env: Env) -> bool {
        storage::is_petrified(&env)
    }
}

impl DandelionVoting {
    fn authorize(env: &Env, sender: &Address, role: Role) -> Result<(), VotingError> {
        sender.require_auth();
        storage::require_initialized(env)?;

        if Self::has_role(env, sender, role) {
            Ok(())
        } else {
            Err(VotingError::AppAuthFailed)
        }
    }

    fn has_role(env: &Env, who: &Address, role: Role) -> bool {
        match storage::kernel(env) {
            Some(kernel) => KernelClient::new(env, &kernel).has_permission(
                who,
                &env.current_contract_address(),
                &role.symbol(env),
            ),
            None => false,
        }
    }

    fn can_open_vote(env: &Env, sender: &Address) -> Result<bool, VotingError> {
        if Self::has_role(env, sender, Role::CreateVotes) {
            return Ok(true);
        }

        let settings = storage::settings(env)?;
        let token = storage::token(env)?;
        let balance = SnapshotTokenClient::new(env, &token).balance(sender);
        Ok(balance >= settings.min_open_vote_amount)
    }

    fn may_forward(env: &Env, sender: &Address) -> bool {
        if !storage::has_initialized(env) {
            return false;
        }
        storage::forwarder(env).as_ref() == Some(sender)
            || Self::can_open_vote(env, sender).unwrap_or(false)
    }

    fn create_vote(
        env: &Env,
        creator: &Address,
        script: Vec<Action>,
        metadata: String,
        cast_vote: bool,
    ) -> Result<VoteId, VotingError> {
        let token = storage::token(env)?;
        let settings = storage::settings(env)?;

        // Last fully settled ledger: nothing minted or moved during this
        // invocation can count towards the vote.
        let snapshot_block = env.ledger().sequence().saturating_sub(1);
        let voting_power = SnapshotTokenClient::new(env, &token).total_supply_at(&snapshot_block);

        let vote_id = storage::votes_length(env) + 1;
        let start_date = env.ledger().timestamp();
        let execution_date = start_date
            .saturating_add(settings.vote_duration)
            .saturating_add(settings.execution_delay);

        let mut vote = Vote {
            creator: creator.clone(),
            executed: false,
            start_date,
            vote_duration: settings.vote_duration,
            execution_date,
            snapshot_block,
            support_required_pct: settings.support_required_pct,
            min_accept_quorum_pct: settings.min_accept_quorum_pct,
            voting_power,
            yea: 0,
            nay: 0,
            script,
            metadata: metadata.clone(),
        };
        storage::set_votes_length(env, vote_id);

        log!(env, "vote started", vote_id, creator.clone(), snapshot_block, voting_power);
        events::emit_start_vote(
            env,
            StartVoteEvent {
                vote_id,
                creator: creator.clone(),
                metadata,
            },
        );

        if cast_vote && voting::is_vote_open(env, &vote) {
            let weight = voting::voter_weight(env, &token, &vote, creator);
            if weight > 0 {
                voting::cast(env, vote_id, &mut vote, creator, true, weight);
            }
        }

        storage::save_vote(env, vote_id, &vote);
        Ok(vote_id)
    }

    /// Weight `voter` may cast on an open vote they have not voted on yet.
    fn eligible_weight(
        env: &Env,
        vote_id: VoteId,
        vote: &Vote,
        voter: &Address,
    ) -> Result<i128, VotingError> {
        if !voting::is_vote_open(env, vote)
            || storage::voter_state(env, vote_id, voter) != VoterState::Absent
        {
            return Err(VotingError::CanNotVote);
        }

        let token = storage::token(env)?;
        let weight = voting::voter_weight(env, &token, vote, voter);
        if weight <= 0 {
            return Err(VotingError::CanNotVote);
        }
        Ok(weight)
    }
}
