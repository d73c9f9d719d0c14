use serde::{Deserialize, Serialize};

//starting capital, every curve is normalized to it
pub const SEED_EQUITY: f64 = 1.0;

//directional position implied by a tpi signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Long,
    Short,
    Flat,
}

impl Position {
    //only the sign of the signal matters, zero and nan are flat
    pub fn from_signal(signal: f64) -> Self {
        if signal > 0.0 {
            Position::Long
        } else if signal < 0.0 {
            Position::Short
        } else {
            Position::Flat
        }
    }

    //growth factor for one day held in this position
    pub fn growth_factor(self, daily_return: f64) -> f64 {
        match self {
            Position::Long => 1.0 + daily_return,
            Position::Short => 1.0 - daily_return,
            Position::Flat => 1.0,
        }
    }
}

//strategy and buy-and-hold equity curves, both seeded at 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurves {
    pub strategy: Vec<f64>,
    pub benchmark: Vec<f64>,
}

impl EquityCurves {
    //number of points including the seed
    pub fn len(&self) -> usize {
        self.strategy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategy.is_empty()
    }

    pub fn final_strategy(&self) -> f64 {
        self.strategy.last().copied().unwrap_or(SEED_EQUITY)
    }

    pub fn final_benchmark(&self) -> f64 {
        self.benchmark.last().copied().unwrap_or(SEED_EQUITY)
    }

    //curves with the seed dropped, one point per signal row
    pub fn without_seed(&self) -> (&[f64], &[f64]) {
        (
            self.strategy.get(1..).unwrap_or(&[]),
            self.benchmark.get(1..).unwrap_or(&[]),
        )
    }
}

//folds daily returns and signals into strategy and benchmark equity
//
//output always has signals.len() + 1 points. once the returns run out both
//curves are carried forward unchanged; returns past the last signal are ignored.
pub fn calculate_equities(daily_returns: &[f64], signals: &[f64]) -> EquityCurves {
    let mut strategy = Vec::with_capacity(signals.len() + 1);
    let mut benchmark = Vec::with_capacity(signals.len() + 1);
    strategy.push(SEED_EQUITY);
    benchmark.push(SEED_EQUITY);

    let mut strategy_equity = SEED_EQUITY;
    let mut benchmark_equity = SEED_EQUITY;

    for (i, &signal) in signals.iter().enumerate() {
        if let Some(&daily_return) = daily_returns.get(i) {
            strategy_equity *= Position::from_signal(signal).growth_factor(daily_return);
            benchmark_equity *= 1.0 + daily_return;
        }

        strategy.push(strategy_equity);
        benchmark.push(benchmark_equity);
    }

    EquityCurves {
        strategy,
        benchmark,
    }
}
