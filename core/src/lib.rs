// VeilDex Settlement Core
//
// Order lifecycle and settlement engine for a commit-reveal DEX: hidden
// order commitments with a mandatory reveal delay, a collateral ledger with
// per-debit solvency checks, and a deterministic condition engine that
// settles market/limit/stop orders against an injected price oracle.
//
// The sequencing ledger, the real oracle, the fee-sharing service, and the
// liquidity pool are external collaborators; this crate assumes each public
// operation executes atomically in a total order imposed from outside.

pub mod auth;
pub mod collateral;
pub mod commits;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod exchange;
pub mod oracle;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use auth::{
    commitment_digest, encode_order_message, EcdsaVerifier, OrderSigner, RecoverableSignature,
    SignatureVerifier,
};
pub use collateral::CollateralLedger;
pub use commits::{CommitBook, DEFAULT_REVEAL_DELAY};
pub use error::{DexError, Result};
pub use evaluation::{ConditionEngine, EngineConfig};
pub use events::{Event, EventLog};
pub use exchange::{Exchange, ExchangeConfig};
pub use oracle::{MockPriceFeed, PriceFeed};
pub use strategy::{rsi, sma, AlgorithmicStrategy, StrategyConfig};
pub use types::{
    Commit, CommitId, Height, Order, OrderId, OrderKind, Price, PriceSnapshot, Side,
};
