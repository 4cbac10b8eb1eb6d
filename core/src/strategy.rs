use crate::types::{Price, Side};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Simple moving average over raw fixed-point prices, truncating
pub fn sma(prices: &[u64]) -> u64 {
    if prices.is_empty() {
        return 0;
    }
    let sum: u128 = prices.iter().map(|p| *p as u128).sum();
    (sum / prices.len() as u128) as u64
}

/// Relative-strength momentum on a 0..=100 integer scale
///
/// Ratio of summed gains to summed moves between consecutive observations;
/// a flat series reads neutral (50), a rise-only series 100, a fall-only
/// series 0.
pub fn rsi(prices: &[u64]) -> u64 {
    let mut gains: u128 = 0;
    let mut losses: u128 = 0;
    for pair in prices.windows(2) {
        if pair[1] >= pair[0] {
            gains += (pair[1] - pair[0]) as u128;
        } else {
            losses += (pair[0] - pair[1]) as u128;
        }
    }
    if gains + losses == 0 {
        return 50;
    }
    (100 * gains / (gains + losses)) as u64
}

/// Strategy tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Observations kept in the price window; signals need a full window
    pub window: usize,
    /// RSI at or below this, with price under the SMA, signals a buy
    pub oversold: u64,
    /// RSI at or above this, with price over the SMA, signals a sell
    pub overbought: u64,
    /// Size of each strategy-originated trade, base units
    pub trade_amount: U256,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            window: 14,
            oversold: 30,
            overbought: 70,
            trade_amount: U256::from(100),
        }
    }
}

/// Moving-average / momentum trading strategy
///
/// Pure signal computation over a bounded window of oracle prices. The
/// facade routes its signals through the ordinary order path, so strategy
/// trades are subject to every collateral check a direct participant faces.
#[derive(Debug, Clone)]
pub struct AlgorithmicStrategy {
    config: StrategyConfig,
    window: VecDeque<u64>,
}

impl AlgorithmicStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        let capacity = config.window;
        Self {
            config,
            window: VecDeque::with_capacity(capacity),
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Feed one price observation; returns a trade signal when the
    /// indicators cross their thresholds
    pub fn observe(&mut self, price: Price) -> Option<Side> {
        if self.window.len() == self.config.window {
            self.window.pop_front();
        }
        self.window.push_back(price.0);
        if self.window.len() < self.config.window {
            return None;
        }

        let series: Vec<u64> = self.window.iter().copied().collect();
        let average = sma(&series);
        let momentum = rsi(&series);

        if momentum <= self.config.oversold && price.0 < average {
            Some(Side::Buy)
        } else if momentum >= self.config.overbought && price.0 > average {
            Some(Side::Sell)
        } else {
            None
        }
    }
}

impl Default for AlgorithmicStrategy {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}
