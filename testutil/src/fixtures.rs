/// Deterministic fixtures for tests

/// Secret-key seed for participant `i`; stable across runs so test traders
/// keep the same address everywhere
pub fn key_seed(i: u8) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[0] = i;
    // secp256k1 rejects the zero scalar, so keep the low byte non-zero
    seed[31] = 1;
    seed
}
