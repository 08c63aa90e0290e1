use crate::engine::BacktestResult;
use crate::metrics::performance::exposure;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//presentation summary for a backtest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub strategy_id: String,
    pub display_name: String,
    pub num_periods: usize,
    pub final_equity: f64,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub exposure: f64,
    pub degraded: bool,
}

impl SummaryMetrics {
    pub fn from_result(result: &BacktestResult) -> Self {
        SummaryMetrics {
            strategy_id: result.strategy_id.clone(),
            display_name: result.display_name.clone(),
            num_periods: result.signals.len(),
            final_equity: result.equity_curve.last().copied().unwrap_or(1.0),
            total_return: result.total_return,
            sharpe_ratio: result.sharpe_ratio,
            max_drawdown: result.max_drawdown,
            exposure: exposure(&result.signals),
            degraded: result.degraded,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Strategy"),
            Cell::new(&format!("{} ({})", self.display_name, self.strategy_id)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Periods"),
            Cell::new(&format!("{}", self.num_periods)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Equity"),
            Cell::new(&format!("{:.4}x", self.final_equity)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!("{:.2}%", self.total_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format!("{:.2}%", self.max_drawdown * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Exposure"),
            Cell::new(&format!("{:.2}%", self.exposure * 100.0)),
        ]));

        if self.degraded {
            table.add_row(Row::new(vec![
                Cell::new("Note"),
                Cell::new("strategy failed, signals replaced by a flat series"),
            ]));
        }

        table
    }
}
