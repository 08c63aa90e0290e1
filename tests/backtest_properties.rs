use approx::assert_relative_eq;
use proptest::prelude::*;
use voltlab::metrics::performance::max_drawdown;
use voltlab::prelude::*;
use voltlab::strategy::registry::{
    EXPONENTIAL_MOVING_AVERAGE, MOMENTUM_REGRESSION, RSI_STRATEGY, SIMPLE_MOVING_AVERAGE,
};

const DAY_MS: i64 = 86_400_000;
const START_MS: i64 = 1_672_531_200_000;

const ALL_STRATEGIES: [&str; 4] = [
    SIMPLE_MOVING_AVERAGE,
    EXPONENTIAL_MOVING_AVERAGE,
    RSI_STRATEGY,
    MOMENTUM_REGRESSION,
];

fn bars(closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| RawBar::from_close(START_MS + i as i64 * DAY_MS, c))
        .collect()
}

fn closes_from_returns(returns: &[f64]) -> Vec<f64> {
    let mut price = 100.0;
    returns
        .iter()
        .map(|r| {
            price *= 1.0 + r;
            price
        })
        .collect()
}

fn small_regression_params() -> StrategyParameters {
    StrategyParameters::new()
        .with("short_sma", 3.0)
        .with("mid_sma", 5.0)
        .with("long_sma", 8.0)
        .with("regression_window", 12.0)
}

#[test]
fn empty_series_is_rejected() {
    let engine = BacktestEngine::default();
    let err = engine
        .run_backtest(&[], SIMPLE_MOVING_AVERAGE, &StrategyParameters::new())
        .unwrap_err();
    assert_eq!(err, BacktestError::InvalidData(DataError::EmptySeries));
}

#[test]
fn unknown_strategy_is_rejected() {
    let engine = BacktestEngine::default();
    let err = engine
        .run_backtest(
            &bars(&[1.0, 2.0, 3.0]),
            "not_a_strategy",
            &StrategyParameters::new(),
        )
        .unwrap_err();
    assert!(matches!(err, BacktestError::UnknownStrategy(id) if id == "not_a_strategy"));
}

#[test]
fn missing_close_is_rejected() {
    let engine = BacktestEngine::default();
    let mut raw = bars(&[1.0, 2.0, 3.0]);
    raw[1].close = None;
    let err = engine
        .run_backtest(&raw, RSI_STRATEGY, &StrategyParameters::new())
        .unwrap_err();
    assert!(matches!(err, BacktestError::InvalidData(DataError::MissingClose { index: 1 })));
}

#[test]
fn rising_series_sma_crossover_is_long_in_steady_state() {
    let closes: Vec<f64> = (0..120).map(|i| 50.0 + i as f64 * 0.75).collect();
    let engine = BacktestEngine::default();
    let result = engine
        .run_backtest(&bars(&closes), SIMPLE_MOVING_AVERAGE, &StrategyParameters::new())
        .unwrap();

    assert!(result.signals[..49].iter().all(|s| *s == 0.0));
    assert!(result.signals[49..].iter().all(|s| *s == 1.0));
    assert!(result.total_return > 0.0);
    assert_eq!(result.max_drawdown, 0.0);
}

#[test]
fn all_gain_series_rsi_is_short_after_window() {
    //non-decreasing with flat steps, no bar ever closes lower
    let closes: Vec<f64> = (0..60).map(|i| 10.0 + (i / 2) as f64).collect();
    let engine = BacktestEngine::default();
    let result = engine
        .run_backtest(&bars(&closes), RSI_STRATEGY, &StrategyParameters::new())
        .unwrap();

    assert!(result.signals[..14].iter().all(|s| *s == 0.0));
    assert!(result.signals[14..].iter().all(|s| *s == -1.0));
}

#[test]
fn constant_return_regression_weights_take_the_sign_of_the_return() {
    let engine = BacktestEngine::default();

    let up = closes_from_returns(&[0.004; 60]);
    let result = engine
        .run_backtest(&bars(&up), MOMENTUM_REGRESSION, &small_regression_params())
        .unwrap();
    assert!(!result.degraded);
    //step 12 only has five usable rows (long sma needs 8 bars), under half the window
    assert!(result.signals[..13].iter().all(|s| *s == 0.0));
    assert!(result.signals[13..].iter().all(|s| *s == 1.0));

    let down = closes_from_returns(&[-0.004; 60]);
    let result = engine
        .run_backtest(&bars(&down), MOMENTUM_REGRESSION, &small_regression_params())
        .unwrap();
    assert!(result.signals[13..].iter().all(|s| *s == -1.0));
}

#[test]
fn unbounded_regression_leverage_keeps_equity_and_totals_consistent() {
    let closes = closes_from_returns(&[0.004; 60]);
    let params = small_regression_params()
        .with("epsilon", 0.0)
        .with("max_weight", 1e300);
    let engine = BacktestEngine::default();
    let result = engine
        .run_backtest(&bars(&closes), MOMENTUM_REGRESSION, &params)
        .unwrap();

    assert!(result.signals.iter().all(|s| s.is_finite()));
    assert!(result.equity_curve.iter().all(|e| e.is_finite()));
    let last = *result.equity_curve.last().unwrap();
    assert!(last > 1.0);
    assert_eq!(result.total_return, last - 1.0);
    assert_eq!(result.max_drawdown, max_drawdown(&result.equity_curve));
    assert!(result.max_drawdown <= 0.0);
}

#[test]
fn bars_out_of_order_give_the_same_result() {
    let closes = closes_from_returns(
        &(0..90)
            .map(|i| ((i * 7 % 11) as f64 - 5.0) / 400.0)
            .collect::<Vec<_>>(),
    );
    let ordered = bars(&closes);
    let mut shuffled = ordered.clone();
    shuffled.reverse();
    shuffled.swap(3, 40);

    let engine = BacktestEngine::default();
    let params = StrategyParameters::new()
        .with("short_window", 5.0)
        .with("long_window", 15.0);
    let a = engine
        .run_backtest(&ordered, SIMPLE_MOVING_AVERAGE, &params)
        .unwrap();
    let b = engine
        .run_backtest(&shuffled, SIMPLE_MOVING_AVERAGE, &params)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn concurrent_runs_share_one_engine() {
    let engine = BacktestEngine::default();
    let closes = closes_from_returns(
        &(0..200)
            .map(|i| ((i * 13 % 17) as f64 - 8.0) / 500.0)
            .collect::<Vec<_>>(),
    );
    let raw = bars(&closes);
    let params = StrategyParameters::new();

    let expected: Vec<BacktestResult> = ALL_STRATEGIES
        .iter()
        .map(|&id| engine.run_backtest(&raw, id, &params).unwrap())
        .collect();

    let results: Vec<BacktestResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = ALL_STRATEGIES
            .iter()
            .map(|&id| {
                let engine = &engine;
                let raw = &raw;
                let params = &params;
                scope.spawn(move || engine.run_backtest(raw, id, params).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn results_are_aligned_finite_and_repeatable(
        returns in prop::collection::vec(-0.08f64..0.08, 1..160),
        strategy in 0usize..4,
    ) {
        let closes = closes_from_returns(&returns);
        let raw = bars(&closes);
        let id = ALL_STRATEGIES[strategy];
        let params = if id == MOMENTUM_REGRESSION {
            small_regression_params()
        } else {
            StrategyParameters::new()
                .with("short_window", 4.0)
                .with("long_window", 12.0)
                .with("period", 6.0)
        };

        let engine = BacktestEngine::default();
        let first = engine.run_backtest(&raw, id, &params).unwrap();
        let second = engine.run_backtest(&raw, id, &params).unwrap();

        prop_assert_eq!(first.signals.len(), closes.len());
        prop_assert_eq!(first.equity_curve.len(), closes.len());
        prop_assert!(first.sharpe_ratio.is_finite());
        prop_assert!(first.max_drawdown.is_finite());
        prop_assert!(first.max_drawdown <= 0.0);
        prop_assert!(first.total_return.is_finite());
        prop_assert!(first.signals.iter().all(|s| s.is_finite()));
        prop_assert!(first.equity_curve.iter().all(|e| e.is_finite()));
        prop_assert_eq!(first.equity_curve[0], 1.0);

        let last = *first.equity_curve.last().unwrap();
        assert_relative_eq!(first.total_return, last - 1.0, epsilon = 1e-12);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn regression_weights_respect_the_clamp(
        returns in prop::collection::vec(-0.05f64..0.05, 20..120),
        max_weight in 0.1f64..2.0,
    ) {
        let closes = closes_from_returns(&returns);
        let params = small_regression_params().with("max_weight", max_weight);
        let engine = BacktestEngine::default();
        let result = engine
            .run_backtest(&bars(&closes), MOMENTUM_REGRESSION, &params)
            .unwrap();
        prop_assert!(result.signals.iter().all(|s| s.abs() <= max_weight));
    }
}
