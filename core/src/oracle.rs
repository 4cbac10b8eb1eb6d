use crate::types::{Price, PriceSnapshot};

/// Read-only boundary to the external price oracle
///
/// Injected into the facade as an explicit dependency so evaluation stays
/// deterministic and testable against fixed price sequences. The oracle is
/// the source of truth for price; the core only judges freshness via
/// `updated_at` (prices carry the fixed 8-decimal scale of `Price`).
pub trait PriceFeed {
    /// Latest observation the oracle is willing to report; may be stale
    fn latest_price(&self) -> PriceSnapshot;
}

/// Settable feed for tests and local simulation
#[derive(Debug, Clone)]
pub struct MockPriceFeed {
    snapshot: PriceSnapshot,
}

impl MockPriceFeed {
    pub fn new(price: Price, updated_at: u64) -> Self {
        Self {
            snapshot: PriceSnapshot { price, updated_at },
        }
    }

    pub fn update(&mut self, price: Price, updated_at: u64) {
        self.snapshot = PriceSnapshot { price, updated_at };
    }
}

impl PriceFeed for MockPriceFeed {
    fn latest_price(&self) -> PriceSnapshot {
        self.snapshot
    }
}

/// Shared handle: lets a test or simulation keep moving the price after the
/// feed has been injected into the facade
impl PriceFeed for std::rc::Rc<std::cell::RefCell<MockPriceFeed>> {
    fn latest_price(&self) -> PriceSnapshot {
        self.borrow().latest_price()
    }
}
