use soroban_sdk::{contractclient, Address, Env, Symbol};

/// Authorization kernel the voting app is installed in.
#[contractclient(name = "KernelClient")]
pub trait Kernel {
    fn has_permission(env: Env, who: Address, where_: Address, what: Symbol) -> bool;
    fn recovery_vault(env: Env) -> Address;
}

/// Governance token with checkpointed balance and supply history.
#[contractclient(name = "SnapshotTokenClient")]
pub trait SnapshotToken {
    fn balance_of_at(env: Env, owner: Address, ledger: u32) -> i128;
    fn total_supply_at(env: Env, ledger: u32) -> i128;
    fn balance(env: Env, owner: Address) -> i128;
}

/// Minting entry point of a token controlled by the voting app.
#[contractclient(name = "TokenControllerClient")]
pub trait TokenController {
    fn generate_tokens(env: Env, owner: Address, amount: i128) -> bool;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    CreateVotes,
    ModifySupport,
    ModifyQuorum,
    ModifyExecutionDelay,
    ModifyMinOpenVoteAmount,
    MintAndOpenVote,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CreateVotes => "CREATE_VOTES_ROLE",
            Role::ModifySupport => "MODIFY_SUPPORT_ROLE",
            Role::ModifyQuorum => "MODIFY_QUORUM_ROLE",
            Role::ModifyExecutionDelay => "MODIFY_EXECUTION_DELAY_ROLE",
            Role::ModifyMinOpenVoteAmount => "MODIFY_MIN_OPEN_VOTE_AMOUNT_ROLE",
            Role::MintAndOpenVote => "MINT_AND_OPEN_VOTE_ROLE",
        }
    }

    pub fn symbol(&self, env: &Env) -> Symbol {
        Symbol::new(env, self.as_str())
    }
}
