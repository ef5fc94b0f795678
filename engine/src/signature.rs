//! EIP-712 typed-data hashing and ECDSA verification for the dual-signed
//! fast path (`execute_with_dual_signed_moves`). `k256` handles secp256k1
//! recovery, paired with `sha3::Keccak256` for both the domain separator
//! and the struct hash, matching Ethereum's own typed-data convention.

use crate::primitives::{Address, BattleKey};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

const DOMAIN_NAME: &str = "SignedCommitManager";
const DOMAIN_VERSION: &str = "1";

fn keccak(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn left_pad_address(address: Address) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[12..32].copy_from_slice(&address);
    out
}

/// `keccak256("EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")`.
fn domain_type_hash() -> [u8; 32] {
    keccak(b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
}

/// `keccak256("SignedMove(bytes32 battleKey,uint64 turnId,uint8 playerIndex,uint8 moveIndex,bytes30 extraData,uint64 nonce)")`.
fn signed_move_type_hash() -> [u8; 32] {
    keccak(b"SignedMove(bytes32 battleKey,uint64 turnId,uint8 playerIndex,uint8 moveIndex,bytes30 extraData,uint64 nonce)")
}

pub fn domain_separator(chain_id: u64, verifying_contract: Address) -> [u8; 32] {
    let mut buf = Vec::with_capacity(32 * 4);
    buf.extend_from_slice(&domain_type_hash());
    buf.extend_from_slice(&keccak(DOMAIN_NAME.as_bytes()));
    buf.extend_from_slice(&keccak(DOMAIN_VERSION.as_bytes()));
    let mut chain_id_bytes = [0u8; 32];
    chain_id_bytes[24..32].copy_from_slice(&chain_id.to_be_bytes());
    buf.extend_from_slice(&chain_id_bytes);
    buf.extend_from_slice(&left_pad_address(verifying_contract));
    keccak(&buf)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedMove {
    pub battle_key: BattleKey,
    pub turn_id: u64,
    pub player_index: u8,
    pub move_index: u8,
    pub extra_data: [u8; 30],
    pub nonce: u64,
}

impl SignedMove {
    fn struct_hash(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(32 * 6);
        buf.extend_from_slice(&signed_move_type_hash());
        buf.extend_from_slice(&self.battle_key.0);
        let mut turn_id_bytes = [0u8; 32];
        turn_id_bytes[24..32].copy_from_slice(&self.turn_id.to_be_bytes());
        buf.extend_from_slice(&turn_id_bytes);
        let mut player_index_bytes = [0u8; 32];
        player_index_bytes[31] = self.player_index;
        buf.extend_from_slice(&player_index_bytes);
        let mut move_index_bytes = [0u8; 32];
        move_index_bytes[31] = self.move_index;
        buf.extend_from_slice(&move_index_bytes);
        buf.extend_from_slice(&keccak(&self.extra_data));
        let mut nonce_bytes = [0u8; 32];
        nonce_bytes[24..32].copy_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&nonce_bytes);
        keccak(&buf)
    }

    /// The final digest a signer's wallet actually signs: `0x1901 || domainSeparator || structHash`.
    pub fn signing_digest(&self, domain_separator: [u8; 32]) -> [u8; 32] {
        let mut buf = Vec::with_capacity(2 + 32 + 32);
        buf.push(0x19);
        buf.push(0x01);
        buf.extend_from_slice(&domain_separator);
        buf.extend_from_slice(&self.struct_hash());
        keccak(&buf)
    }
}

/// Ethereum-style address derivation: the low 20 bytes of
/// `keccak256(uncompressed_pubkey[1..])`.
fn address_of(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    let digest = keccak(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..32]);
    address
}

/// Verifies a 65-byte `(r, s, v)` signature over `signed_move` and checks
/// the recovered signer matches `expected_signer`.
pub fn verify(
    signed_move: &SignedMove,
    domain_separator_bytes: [u8; 32],
    signature_bytes: [u8; 65],
    expected_signer: Address,
) -> bool {
    let digest = signed_move.signing_digest(domain_separator_bytes);
    let Ok(signature) = Signature::from_slice(&signature_bytes[..64]) else {
        return false;
    };
    let recovery_byte = signature_bytes[64];
    let normalized = if recovery_byte >= 27 { recovery_byte - 27 } else { recovery_byte };
    let Ok(recovery_id) = RecoveryId::from_byte(normalized) else {
        return false;
    };
    let Ok(recovered) = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id) else {
        return false;
    };
    address_of(&recovered) == expected_signer
}
