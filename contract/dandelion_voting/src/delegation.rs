use ed25519_dalek::{Signature, VerifyingKey};
use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::storage_types::VoteId;

/// Digest a holder signs to let `sender` cast their ballot on `vote_id`.
/// Covers the voting contract address, so a signature is only valid for one
/// deployment and one vote.
pub fn vote_for_digest(
    env: &Env,
    applicant: &Address,
    sender: &Address,
    vote_id: VoteId,
    supports: bool,
    voting: &Address,
) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&applicant.to_xdr(env));
    payload.append(&sender.to_xdr(env));
    payload.append(&vote_id.to_xdr(env));
    payload.append(&supports.to_xdr(env));
    payload.append(&voting.to_xdr(env));
    env.crypto().sha256(&payload).to_bytes()
}

/// Checks an ed25519 `signature` over `digest` against `public_key`.
pub fn verify_signature(
    public_key: &BytesN<32>,
    digest: &BytesN<32>,
    signature: &BytesN<64>,
) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(&public_key.to_array()) else {
        return false;
    };
    let signature = Signature::from_bytes(&signature.to_array());
    key.verify_strict(&digest.to_array(), &signature).is_ok()
}
