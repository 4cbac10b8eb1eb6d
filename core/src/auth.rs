/// Order authentication: canonical encoding, commitment digests, and
/// secp256k1 signature recovery (Ethereum compatible)
///
/// The commitment digest and the reveal signature are computed over the SAME
/// canonical byte layout. Any divergence between the two paths makes every
/// honest reveal fail with a commitment mismatch, so the encoding lives in
/// exactly one function.
use crate::types::{OrderKind, Price};
use alloy_primitives::{keccak256, Address, U256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};

/// Canonical order message: packed (address, uint256 amount, uint256 price,
/// uint256 kind), big-endian, no padding between fields
pub fn encode_order_message(trader: Address, amount: U256, price: Price, kind: OrderKind) -> Vec<u8> {
    let mut buf = Vec::with_capacity(20 + 32 * 3);
    buf.extend_from_slice(trader.as_slice());
    buf.extend_from_slice(&amount.to_be_bytes::<32>());
    buf.extend_from_slice(&U256::from(price.0).to_be_bytes::<32>());
    buf.extend_from_slice(&U256::from(kind.discriminant()).to_be_bytes::<32>());
    buf
}

/// Commitment digest: keccak256 of the canonical order message
pub fn commitment_digest(trader: Address, amount: U256, price: Price, kind: OrderKind) -> [u8; 32] {
    keccak256(encode_order_message(trader, amount, price, kind)).0
}

/// 65-byte recoverable signature (r || s || recovery id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 65] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }
}

/// Narrow trust boundary for reveal authentication
///
/// Injected into the commit-reveal protocol so tests can substitute
/// deterministic fixtures without real key material.
pub trait SignatureVerifier {
    /// True iff `signature` over `message` authenticates `claimed`
    fn verify(&self, claimed: Address, message: &[u8], signature: &RecoverableSignature) -> bool;
}

/// Production verifier: recovers the secp256k1 public key from the signature
/// over keccak256(message) and compares the derived address to the claim
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, claimed: Address, message: &[u8], signature: &RecoverableSignature) -> bool {
        let digest = keccak256(message);
        let Ok(sig) = K256Signature::from_slice(&signature.0[..64]) else {
            return false;
        };
        let Some(recovery_id) = RecoveryId::from_byte(signature.0[64]) else {
            return false;
        };
        let Ok(key) = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        else {
            return false;
        };
        address_of(&key) == claimed
    }
}

/// Ethereum-style address: last 20 bytes of keccak256(uncompressed pubkey)
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // skip the 0x04 uncompressed-point tag
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Signing side of the protocol; used by fixtures and strategy simulations,
/// never by the core itself (the core only verifies)
#[derive(Clone)]
pub struct OrderSigner {
    key: SigningKey,
}

impl OrderSigner {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self {
            key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Deterministic signer from raw key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        SigningKey::from_bytes(bytes.into()).ok().map(|key| Self { key })
    }

    pub fn address(&self) -> Address {
        address_of(self.key.verifying_key())
    }

    /// Sign the canonical order message for this signer's address
    pub fn sign_order(&self, amount: U256, price: Price, kind: OrderKind) -> RecoverableSignature {
        let message = encode_order_message(self.address(), amount, price, kind);
        self.sign_message(&message)
    }

    /// Sign keccak256(message); recoverable, Ethereum compatible
    pub fn sign_message(&self, message: &[u8]) -> RecoverableSignature {
        let digest = keccak256(message);
        let (sig, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .expect("prehash is always 32 bytes");
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = recovery_id.to_byte();
        RecoverableSignature(bytes)
    }
}
