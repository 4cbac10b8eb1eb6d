/// Testing utilities for VeilDex
///
/// Provides:
/// - Deterministic price series generators
/// - Key seed fixtures for signer derivation
/// - Proptest strategies for fixed-point prices and amounts

pub mod fixtures;
pub mod generators;

pub use generators::*;
