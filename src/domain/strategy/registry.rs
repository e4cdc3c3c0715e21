use tracing::debug;

use crate::domain::strategy::{Strategy, StrategyId, StrategyParams};

/// Ordered set of strategy instances. Evaluation and tie-breaking follow
/// registration order.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Build the given built-ins with their configured thresholds.
    pub fn from_ids(ids: &[StrategyId], params: &StrategyParams) -> Self {
        let mut registry = Self::new();
        for id in ids {
            registry.register(id.build(params));
        }
        registry
    }

    /// All built-ins, in the default order, with default thresholds.
    pub fn with_defaults() -> Self {
        Self::from_ids(&StrategyId::ALL, &StrategyParams::default())
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        debug!(name = %strategy.name(), "registered strategy");
        self.strategies.push(strategy);
    }

    pub fn get(&self, id: StrategyId) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == id.display_name())
            .map(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
