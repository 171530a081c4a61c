//! Round scheduler
//!
//! Each round builds fresh empty books, then runs the makers, samples a
//! composite quote per asset, runs the arbitrageurs and finally the liquidity
//! takers. Within a phase agents act in registration order and every order
//! batch is matched before the next agent is asked. Nothing rests across
//! rounds; only the time series and agent ledgers carry over.

use matching_engine::{BatchSummary, BookSet, EngineError, MatchingEngine, TradeSink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use types::ids::{AgentId, AssetId};
use types::numeric::Quantity;
use types::order::Order;
use types::trade::{Role, Trade};

use crate::agent::{Agent, AgentKind, Arbitrageur, LiquidityTaker, MarketMaker};
use crate::composite::{CompositeMethod, CompositeQuote};
use crate::error::{SimError, SimResult};
use crate::series::TimeSeries;

/// Counters for one completed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u64,
    pub orders_submitted: usize,
    pub volume_submitted: Quantity,
    pub trades: usize,
    pub matched_volume: Quantity,
}

impl RoundSummary {
    fn from_batch(round: u64, batch: &BatchSummary) -> Self {
        Self {
            round,
            orders_submitted: batch.orders,
            volume_submitted: batch.submitted_volume,
            trades: batch.trades,
            matched_volume: batch.matched_volume,
        }
    }
}

/// Sequence carried by the first trade unless overridden
pub const DEFAULT_STARTING_SEQUENCE: u64 = 1;

pub struct Simulator {
    assets: Vec<AssetId>,
    agents: Vec<Agent>,
    kinds: Vec<AgentKind>,
    index: HashMap<AgentId, usize>,
    makers: Vec<(usize, Box<dyn MarketMaker>)>,
    arbitrageurs: Vec<(usize, Box<dyn Arbitrageur>)>,
    takers: Vec<(usize, Box<dyn LiquidityTaker>)>,
    engine: MatchingEngine,
    series: TimeSeries,
    composite: CompositeMethod,
    round: u64,
}

impl Simulator {
    pub fn new(assets: impl IntoIterator<Item = impl Into<AssetId>>) -> Self {
        let mut unique: Vec<AssetId> = Vec::new();
        for asset in assets.into_iter().map(Into::into) {
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }
        let assets = unique;
        let series = TimeSeries::new(&assets);
        Self {
            assets,
            agents: Vec::new(),
            kinds: Vec::new(),
            index: HashMap::new(),
            makers: Vec::new(),
            arbitrageurs: Vec::new(),
            takers: Vec::new(),
            engine: MatchingEngine::new(DEFAULT_STARTING_SEQUENCE),
            series,
            composite: CompositeMethod::default(),
            round: 0,
        }
    }

    /// Number trades from `sequence` onwards
    pub fn with_starting_sequence(mut self, sequence: u64) -> Self {
        self.engine = MatchingEngine::new(sequence);
        self
    }

    /// Change how the per-round composite quote is computed
    pub fn with_composite(mut self, method: CompositeMethod) -> Self {
        self.composite = method;
        self
    }

    pub fn add_market_maker(
        &mut self,
        agent: Agent,
        strategy: impl MarketMaker + 'static,
    ) -> SimResult<AgentId> {
        let slot = self.register(agent, AgentKind::MarketMaker)?;
        self.makers.push((slot, Box::new(strategy)));
        Ok(self.agents[slot].id())
    }

    pub fn add_arbitrageur(
        &mut self,
        agent: Agent,
        strategy: impl Arbitrageur + 'static,
    ) -> SimResult<AgentId> {
        let slot = self.register(agent, AgentKind::Arbitrageur)?;
        self.arbitrageurs.push((slot, Box::new(strategy)));
        Ok(self.agents[slot].id())
    }

    pub fn add_liquidity_taker(
        &mut self,
        agent: Agent,
        strategy: impl LiquidityTaker + 'static,
    ) -> SimResult<AgentId> {
        let slot = self.register(agent, AgentKind::LiquidityTaker)?;
        self.takers.push((slot, Box::new(strategy)));
        Ok(self.agents[slot].id())
    }

    fn register(&mut self, agent: Agent, kind: AgentKind) -> SimResult<usize> {
        let asset = agent.asset().ok_or_else(|| SimError::UnboundAgent {
            name: agent.name().to_string(),
        })?;
        if !self.assets.contains(asset) {
            return Err(SimError::UnknownAsset {
                name: agent.name().to_string(),
                asset: asset.clone(),
            });
        }

        let slot = self.agents.len();
        debug!(agent = %agent.name(), id = %agent.id(), %kind, %asset, "Agent registered");
        self.index.insert(agent.id(), slot);
        self.agents.push(agent);
        self.kinds.push(kind);
        Ok(slot)
    }

    /// Advance one round
    pub fn sim_round(&mut self) -> SimResult<RoundSummary> {
        let round = self.round + 1;
        self.engine.start_round(round);
        let mut books = BookSet::fresh(&self.assets);
        let mut batch = BatchSummary::default();

        for (slot, strategy) in self.makers.iter_mut() {
            let agent = &self.agents[*slot];
            let orders = strategy.get_orders(agent, self.series.trades(), self.series.books());
            let mut ledger = Ledger::new(&mut self.agents, &self.index, &mut self.series);
            batch.merge(&self.engine.process_orders(&mut books, orders, &mut ledger)?);
        }

        for (asset, book) in books.iter() {
            self.series.record_composite(asset.clone(), self.composite.quote(book));
        }

        for (slot, strategy) in self.arbitrageurs.iter_mut() {
            let orders = strategy.get_orders(&self.agents[*slot], &books);
            let mut ledger = Ledger::new(&mut self.agents, &self.index, &mut self.series);
            batch.merge(&self.engine.process_orders(&mut books, orders, &mut ledger)?);
        }

        for (slot, strategy) in self.takers.iter_mut() {
            let orders: Vec<Order> = strategy.get_orders(
                &self.agents[*slot],
                self.series.trades(),
                self.series.books(),
                &books,
            );
            let mut ledger = Ledger::new(&mut self.agents, &self.index, &mut self.series);
            batch.merge(&self.engine.process_orders(&mut books, orders, &mut ledger)?);
        }

        for (_, book) in books.iter() {
            self.series.record_book(book.clone());
        }

        self.round = round;
        let summary = RoundSummary::from_batch(round, &batch);
        info!(
            round,
            orders = summary.orders_submitted,
            trades = summary.trades,
            matched_volume = %summary.matched_volume,
            "Round complete"
        );
        Ok(summary)
    }

    /// Advance `rounds` rounds, stopping at the first failure
    pub fn run(&mut self, rounds: u64) -> SimResult<Vec<RoundSummary>> {
        (0..rounds).map(|_| self.sim_round()).collect()
    }

    /// Rounds completed so far
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn composite_method(&self) -> CompositeMethod {
        self.composite
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Cumulative trade history for one asset
    pub fn trades(&self, asset: &AssetId) -> &[Trade] {
        self.series.trades_for(asset)
    }

    /// Composite quote history for one asset
    pub fn composites(&self, asset: &AssetId) -> &[CompositeQuote] {
        self.series.composites_for(asset)
    }

    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        self.index
            .get(&id)
            .map(|slot| &self.agents[*slot])
            .ok_or(SimError::UnknownAgent { agent: id })
    }

    pub fn agent_by_name(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name() == name)
    }

    /// Registered agents with their phase, in registration order
    pub fn agents(&self) -> impl Iterator<Item = (&Agent, AgentKind)> {
        self.agents.iter().zip(self.kinds.iter().copied())
    }
}

/// Settles trades into both counterparties' ledgers and the trade history
struct Ledger<'a> {
    agents: &'a mut [Agent],
    index: &'a HashMap<AgentId, usize>,
    series: &'a mut TimeSeries,
}

impl<'a> Ledger<'a> {
    fn new(
        agents: &'a mut [Agent],
        index: &'a HashMap<AgentId, usize>,
        series: &'a mut TimeSeries,
    ) -> Self {
        Self {
            agents,
            index,
            series,
        }
    }

    fn slot(&self, agent: AgentId) -> Result<usize, EngineError> {
        self.index
            .get(&agent)
            .copied()
            .ok_or_else(|| EngineError::UnknownAgent {
                agent: agent.to_string(),
            })
    }
}

impl TradeSink for Ledger<'_> {
    fn settle(&mut self, trade: &Trade) -> Result<(), EngineError> {
        let aggressor = self.slot(trade.aggressor)?;
        let provider = self.slot(trade.provider)?;

        // One leg each, so a self-trade nets flat
        self.agents[aggressor].position_mut().book(trade, Role::Aggressor);
        self.agents[provider].position_mut().book(trade, Role::Provider);
        self.series.record_trade(trade.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{BookHistory, TradeHistory};
    use matching_engine::Book;
    use rust_decimal::Decimal;
    use types::numeric::Price;
    use types::order::Side;

    struct Quotes(Vec<(Side, u64, u64)>);

    impl Quotes {
        fn orders(&self, agent: &Agent) -> Vec<Order> {
            let asset = agent.asset().cloned().unwrap_or_else(|| AssetId::new("AA"));
            self.0
                .iter()
                .map(|(side, price, size)| {
                    let (size, price) = (Quantity::from_u64(*size), Price::from_u64(*price));
                    Order::new(agent.id(), *side, size, asset.clone(), price)
                })
                .collect()
        }
    }

    impl MarketMaker for Quotes {
        fn get_orders(&mut self, agent: &Agent, _: &TradeHistory, _: &BookHistory) -> Vec<Order> {
            self.orders(agent)
        }
    }

    impl LiquidityTaker for Quotes {
        fn get_orders(
            &mut self,
            agent: &Agent,
            _: &TradeHistory,
            _: &BookHistory,
            _: &BookSet,
        ) -> Vec<Order> {
            self.orders(agent)
        }
    }

    #[test]
    fn test_register_requires_bound_asset() {
        let mut sim = Simulator::new(["AA"]);
        let err = sim.add_market_maker(Agent::new("MM"), Quotes(vec![])).unwrap_err();
        assert!(matches!(err, SimError::UnboundAgent { .. }));

        let err = sim
            .add_market_maker(Agent::new("MM").with_asset("ZZ"), Quotes(vec![]))
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownAsset { .. }));
        assert!(matches!(sim.agent(AgentId::new()), Err(SimError::UnknownAgent { .. })));
    }

    #[test]
    fn test_round_matches_maker_liquidity() {
        let mut sim = Simulator::new(["AA"]);
        let maker = sim
            .add_market_maker(
                Agent::new("MM").with_asset("AA"),
                Quotes(vec![(Side::BUY, 99, 1), (Side::SELL, 101, 1)]),
            )
            .unwrap();
        let taker = sim
            .add_liquidity_taker(Agent::new("LT").with_asset("AA"), Quotes(vec![(Side::BUY, 101, 1)]))
            .unwrap();

        let summary = sim.sim_round().unwrap();

        assert_eq!(summary.round, 1);
        assert_eq!(summary.orders_submitted, 3);
        assert_eq!(summary.trades, 1);
        assert_eq!(summary.matched_volume, Quantity::from_u64(1));
        assert_eq!(sim.agent(taker).unwrap().net_position(), Decimal::ONE);
        assert_eq!(sim.agent(maker).unwrap().net_position(), -Decimal::ONE);

        let composite = &sim.composites(&AssetId::new("AA"))[0];
        assert_eq!(composite.bid.as_ref().unwrap().price, Price::from_u64(99));
        assert_eq!(composite.ask.as_ref().unwrap().price, Price::from_u64(101));

        let books: &[Book] = sim.series().books_for(&AssetId::new("AA"));
        assert_eq!(books.len(), 1);
        assert!(books[0].best_ask().is_none());
    }

    #[test]
    fn test_starting_sequence_is_configurable() {
        let mut sim = Simulator::new(["AA"]).with_starting_sequence(500);
        sim.add_market_maker(
            Agent::new("MM").with_asset("AA"),
            Quotes(vec![(Side::SELL, 100, 2)]),
        )
        .unwrap();
        sim.add_liquidity_taker(Agent::new("LT").with_asset("AA"), Quotes(vec![(Side::BUY, 100, 1)]))
            .unwrap();

        sim.run(2).unwrap();

        let sequences: Vec<u64> = sim.trades(&AssetId::new("AA")).iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![500, 501]);
    }

    #[test]
    fn test_default_starting_sequence() {
        let mut sim = Simulator::new(["AA"]);
        sim.add_market_maker(
            Agent::new("MM").with_asset("AA"),
            Quotes(vec![(Side::SELL, 100, 1), (Side::BUY, 100, 1)]),
        )
        .unwrap();

        sim.sim_round().unwrap();

        assert_eq!(sim.trades(&AssetId::new("AA"))[0].sequence, DEFAULT_STARTING_SEQUENCE);
    }

    #[test]
    fn test_self_trade_nets_flat() {
        let mut sim = Simulator::new(["AA"]);
        let id = sim
            .add_market_maker(
                Agent::new("MM").with_asset("AA"),
                Quotes(vec![(Side::SELL, 100, 2), (Side::BUY, 100, 2)]),
            )
            .unwrap();

        sim.sim_round().unwrap();

        let agent = sim.agent(id).unwrap();
        assert_eq!(agent.net_position(), Decimal::ZERO);
        assert_eq!(agent.position().gross_volume(), Quantity::from_u64(4));
        assert_eq!(sim.trades(&AssetId::new("AA")).len(), 1);
    }

    #[test]
    fn test_order_for_unknown_agent_aborts_round() {
        struct Impostor;
        impl MarketMaker for Impostor {
            fn get_orders(&mut self, agent: &Agent, _: &TradeHistory, _: &BookHistory) -> Vec<Order> {
                let (size, asset, price) = (Quantity::from_u64(1), AssetId::new("AA"), Price::from_u64(100));
                vec![
                    Order::new(AgentId::new(), Side::SELL, size, asset.clone(), price),
                    Order::new(agent.id(), Side::BUY, size, asset, price),
                ]
            }
        }

        let mut sim = Simulator::new(["AA"]);
        sim.add_market_maker(Agent::new("MM").with_asset("AA"), Impostor).unwrap();

        let err = sim.sim_round().unwrap_err();
        assert!(matches!(err, SimError::Engine(EngineError::UnknownAgent { .. })));
        assert_eq!(sim.round(), 0);
    }
}
