//! Round scheduling tests
//!
//! Drives the simulator with scripted strategies and checks phase order,
//! per-round book isolation and double-entry booking.

use matching_engine::BookSet;
use proptest::prelude::*;
use rust_decimal::Decimal;
use simulation::series::{BookHistory, TradeHistory};
use simulation::{Agent, Arbitrageur, LiquidityTaker, MarketMaker, Simulator};
use std::cell::RefCell;
use std::rc::Rc;
use types::ids::AssetId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

type Log = Rc<RefCell<Vec<String>>>;

/// Submits a fixed script of orders in chosen rounds and logs each call
struct Scripted {
    log: Log,
    quotes: Vec<(Side, u64, u64)>,
    active_rounds: Option<Vec<usize>>,
    calls: usize,
}

impl Scripted {
    fn new(log: &Log, quotes: Vec<(Side, u64, u64)>) -> Self {
        Self {
            log: Rc::clone(log),
            quotes,
            active_rounds: None,
            calls: 0,
        }
    }

    fn only_in(mut self, rounds: Vec<usize>) -> Self {
        self.active_rounds = Some(rounds);
        self
    }

    fn next(&mut self, agent: &Agent, note: String) -> Vec<Order> {
        self.calls += 1;
        self.log.borrow_mut().push(format!("{}:{note}", agent.name()));
        if let Some(rounds) = &self.active_rounds {
            if !rounds.contains(&self.calls) {
                return Vec::new();
            }
        }
        let asset = agent.asset().cloned().unwrap();
        self.quotes
            .iter()
            .map(|(side, price, size)| {
                let (size, price) = (Quantity::from_u64(*size), Price::from_u64(*price));
                Order::new(agent.id(), *side, size, asset.clone(), price)
            })
            .collect()
    }
}

fn resting(current: &BookSet) -> usize {
    current.iter().map(|(_, book)| book.order_count()).sum()
}

impl MarketMaker for Scripted {
    fn get_orders(&mut self, agent: &Agent, trades: &TradeHistory, _: &BookHistory) -> Vec<Order> {
        let seen: usize = trades.values().map(Vec::len).sum();
        self.next(agent, format!("trades={seen}"))
    }
}

impl Arbitrageur for Scripted {
    fn get_orders(&mut self, agent: &Agent, current: &BookSet) -> Vec<Order> {
        self.next(agent, format!("resting={}", resting(current)))
    }
}

impl LiquidityTaker for Scripted {
    fn get_orders(
        &mut self,
        agent: &Agent,
        _: &TradeHistory,
        books: &BookHistory,
        current: &BookSet,
    ) -> Vec<Order> {
        let snapshots: usize = books.values().map(Vec::len).sum();
        self.next(agent, format!("resting={} snapshots={snapshots}", resting(current)))
    }
}

fn aa() -> AssetId {
    AssetId::new("AA")
}

#[test]
fn test_phase_order_follows_registration() {
    let log: Log = Rc::default();
    let mut sim = Simulator::new(["AA"]);

    // Registered out of phase order on purpose
    sim.add_liquidity_taker(Agent::new("T1").with_asset("AA"), Scripted::new(&log, vec![])).unwrap();
    sim.add_arbitrageur(Agent::new("X1").with_asset("AA"), Scripted::new(&log, vec![])).unwrap();
    let bid = Scripted::new(&log, vec![(Side::BUY, 99, 1)]);
    let ask = Scripted::new(&log, vec![(Side::SELL, 101, 1)]);
    sim.add_market_maker(Agent::new("M1").with_asset("AA"), bid).unwrap();
    sim.add_market_maker(Agent::new("M2").with_asset("AA"), ask).unwrap();
    sim.add_liquidity_taker(Agent::new("T2").with_asset("AA"), Scripted::new(&log, vec![])).unwrap();

    sim.sim_round().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "M1:trades=0",
            "M2:trades=0",
            "X1:resting=2",
            "T1:resting=2 snapshots=0",
            "T2:resting=2 snapshots=0",
        ]
    );
}

#[test]
fn test_composite_sampled_before_takers() {
    let log: Log = Rc::default();
    let mut sim = Simulator::new(["AA"]);
    sim.add_market_maker(
        Agent::new("MM").with_asset("AA"),
        Scripted::new(&log, vec![(Side::BUY, 99, 1), (Side::SELL, 101, 1)]),
    )
    .unwrap();
    sim.add_liquidity_taker(Agent::new("LT").with_asset("AA"), Scripted::new(&log, vec![(Side::BUY, 101, 1)]))
        .unwrap();

    sim.sim_round().unwrap();

    // The taker lifted the only offer, but the composite still shows it
    let composite = &sim.composites(&aa())[0];
    assert_eq!(composite.ask.as_ref().unwrap().price, Price::from_u64(101));
    let end_of_round = &sim.series().books_for(&aa())[0];
    assert!(end_of_round.best_ask().is_none());
}

#[test]
fn test_no_resting_leakage_across_rounds() {
    let log: Log = Rc::default();
    let mut sim = Simulator::new(["AA"]);
    sim.add_market_maker(
        Agent::new("MM").with_asset("AA"),
        Scripted::new(&log, vec![(Side::BUY, 99, 1), (Side::SELL, 101, 1)]).only_in(vec![1]),
    )
    .unwrap();
    sim.add_arbitrageur(Agent::new("ARB").with_asset("AA"), Scripted::new(&log, vec![])).unwrap();
    sim.add_liquidity_taker(Agent::new("LT").with_asset("AA"), Scripted::new(&log, vec![(Side::BUY, 105, 1)]))
        .unwrap();

    let first = sim.sim_round().unwrap();
    let second = sim.sim_round().unwrap();

    assert_eq!(first.trades, 1);
    // Round 2 starts empty: the leftover bid at 99 is gone and the taker's bid rests unmatched
    assert_eq!(second.trades, 0);
    assert!(log.borrow().contains(&"ARB:resting=0".to_string()));
    assert!(log.borrow().contains(&"LT:resting=0 snapshots=1".to_string()));
    assert_eq!(sim.composites(&aa())[1].bid, None);
    assert_eq!(sim.round(), 2);
}

#[test]
fn test_trade_history_visible_to_next_round_makers() {
    let log: Log = Rc::default();
    let mut sim = Simulator::new(["AA"]);
    sim.add_market_maker(Agent::new("MM").with_asset("AA"), Scripted::new(&log, vec![(Side::SELL, 100, 3)]))
        .unwrap();
    sim.add_liquidity_taker(Agent::new("LT").with_asset("AA"), Scripted::new(&log, vec![(Side::BUY, 100, 1)]))
        .unwrap();

    sim.run(3).unwrap();

    let makers: Vec<String> = log.borrow().iter().filter(|l| l.starts_with("MM")).cloned().collect();
    assert_eq!(makers, vec!["MM:trades=0", "MM:trades=1", "MM:trades=2"]);
    let rounds: Vec<u64> = sim.trades(&aa()).iter().map(|t| t.round).collect();
    assert_eq!(rounds, vec![1, 2, 3]);
}

#[test]
fn test_unknown_asset_order_aborts_run() {
    struct Stray;
    impl MarketMaker for Stray {
        fn get_orders(&mut self, agent: &Agent, _: &TradeHistory, _: &BookHistory) -> Vec<Order> {
            let stray = AssetId::new("ZZ");
            vec![Order::new(agent.id(), Side::BUY, Quantity::from_u64(1), stray, Price::from_u64(1))]
        }
    }

    let mut sim = Simulator::new(["AA"]);
    sim.add_market_maker(Agent::new("MM").with_asset("AA"), Stray).unwrap();

    assert!(sim.run(3).is_err());
    assert_eq!(sim.round(), 0);
}

proptest! {
    #[test]
    fn prop_double_entry_and_conservation(
        maker_quotes in prop::collection::vec((any::<bool>(), 95u64..105, 1u64..5), 1..8),
        taker_quotes in prop::collection::vec((any::<bool>(), 95u64..105, 1u64..5), 1..8),
        rounds in 1u64..5,
    ) {
        let to_script = |raw: &[(bool, u64, u64)]| -> Vec<(Side, u64, u64)> {
            raw.iter().map(|(b, p, s)| (if *b { Side::BUY } else { Side::SELL }, *p, *s)).collect()
        };
        let log: Log = Rc::default();
        let mut sim = Simulator::new(["AA"]);
        let maker_script = Scripted::new(&log, to_script(&maker_quotes));
        let taker_script = Scripted::new(&log, to_script(&taker_quotes));
        let maker = sim
            .add_market_maker(Agent::new("MM").with_asset("AA"), maker_script)
            .unwrap();
        let taker = sim
            .add_liquidity_taker(Agent::new("LT").with_asset("AA"), taker_script)
            .unwrap();

        let summaries = sim.run(rounds).unwrap();

        for summary in &summaries {
            prop_assert!(summary.matched_volume <= summary.volume_submitted);
        }

        let matched: Quantity = sim.trades(&aa()).iter().map(|t| t.size).sum();
        let maker = sim.agent(maker).unwrap().position();
        let taker = sim.agent(taker).unwrap().position();

        // Every trade books one buy leg and one sell leg
        prop_assert_eq!(maker.buy_volume() + taker.buy_volume(), matched);
        prop_assert_eq!(maker.sell_volume() + taker.sell_volume(), matched);
        prop_assert_eq!(maker.position() + taker.position(), Decimal::ZERO);
        prop_assert_eq!(maker.buy_value() + taker.buy_value(), maker.sell_value() + taker.sell_value());
    }
}
