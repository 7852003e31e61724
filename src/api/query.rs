//! GraphQL query documents for each feed.

use chrono::NaiveDate;
use std::fmt;

pub const SIGNALS_QUERY: &str = r#"query {
  signals {
    id
    symbol
    confidence
    type
    metrics {
      key
      value
    }
  }
}"#;

pub const POSITIONS_QUERY: &str = r#"query {
  Positions {
    id
    symbol {
      ticker
      name
      price
    }
    quantity
    price
    stop_loss
    take_profit
    annotation
    created_at
  }
}"#;

/// Bucket size for profit summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfitInterval {
    H1,
    #[default]
    D1,
    W1,
}

impl fmt::Display for ProfitInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::H1 => "H1",
            Self::D1 => "D1",
            Self::W1 => "W1",
        })
    }
}

/// GraphQL literal for an optional string argument.
fn string_arg(value: Option<&str>) -> String {
    match value {
        // serde_json quoting escapes quotes and backslashes inside cursors
        Some(s) => serde_json::Value::from(s).to_string(),
        None => "null".to_string(),
    }
}

/// One page of profit summaries after `after`.
pub fn profits_query(interval: ProfitInterval, after: Option<&str>, first: usize) -> String {
    format!(
        r#"query {{
  Profits(interval: {interval}, after: {after}, first: {first}) {{
    edges {{
      id
      start_time
      end_time
      profit
      trade_count
      win_rate
      winning_trades
      losing_trades
    }}
    page_info {{
      start_cursor
      end_cursor
      has_next_page
      has_previous_page
    }}
  }}
}}"#,
        after = string_arg(after),
    )
}

/// Intraday detail for one trading day.
pub fn order_log_query(date: NaiveDate) -> String {
    format!(
        r#"query {{
  OrderLog(date: "{date}") {{
    profit {{
      id
      start_time
      end_time
      profit
      trade_count
      win_rate
      winning_trades
      losing_trades
    }}
    log {{
      time
      equity
      invested
      running_positions
    }}
    orders {{
      id
      symbol
      quantity
      price
      created_at
      profit
      duration
    }}
  }}
}}"#,
        date = date.format("%Y-%m-%d"),
    )
}
