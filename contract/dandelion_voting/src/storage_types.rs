use soroban_sdk::{contracterror, contracttype, Address, String, Symbol, Val, Vec};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Kernel,
    Petrified,
    InitializationLedger,
    Token,
    Forwarder,
    Settings,
    VotesLength,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Vote(VoteId),
    VoterState(VoteId, Address),
    LatestYeaVoteId(Address),
    DelegationKey(Address),
}

pub type VoteId = u64;

/// Governance parameters. Every new vote copies the thresholds and windows
/// out of this value, so later changes never reach votes already created.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Settings {
    pub support_required_pct: u64,
    pub min_accept_quorum_pct: u64,
    pub vote_duration: u64,
    pub execution_delay: u64,
    pub min_open_vote_amount: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
#[contracttype]
pub enum VoterState {
    Absent = 0,
    Yea = 1,
    Nay = 2,
}

/// One step of an executable script: call `function` on `target` with `args`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Action {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Vote {
    pub creator: Address,
    pub executed: bool,
    pub start_date: u64,
    pub vote_duration: u64,
    pub execution_date: u64,
    pub snapshot_block: u32,
    pub support_required_pct: u64,
    pub min_accept_quorum_pct: u64,
    pub voting_power: i128,
    pub yea: i128,
    pub nay: i128,
    pub script: Vec<Action>,
    pub metadata: String,
}

// Read-only projection returned by `get_vote`
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VoteView {
    pub open: bool,
    pub executed: bool,
    pub start_date: u64,
    pub execution_date: u64,
    pub snapshot_block: u32,
    pub support_required: u64,
    pub min_accept_quorum: u64,
    pub voting_power: i128,
    pub yea: i128,
    pub nay: i128,
    pub script: Vec<Action>,
    pub metadata: String,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VotingError {
    AppAuthFailed = 1,
    AlreadyInitialized = 2,
    NotInitialized = 3,
    RecoverDisallowed = 4,
    NoVote = 5,
    VoteIdZero = 6,
    InitPcts = 7,
    ChangeSupportPcts = 8,
    ChangeQuorumPcts = 9,
    InitSupportTooBig = 10,
    ChangeSupportTooBig = 11,
    CanNotVote = 12,
    CanNotExecute = 13,
    CanNotForward = 14,
    OracleSenderMissing = 15,
    OracleSenderTooBig = 16,
    OracleSenderZero = 17,
    CanNotOpenVote = 18,
    InvalidAmount = 19,
    MintFailed = 20,
}

// Constants
pub const PCT_BASE: u64 = 1_000_000_000_000_000_000; // 100%
pub const DAY_IN_LEDGERS: u32 = 17280;
pub const TTL_THRESHOLD: u32 = DAY_IN_LEDGERS * 7;
pub const TTL_EXTEND_TO: u32 = DAY_IN_LEDGERS * 30;
