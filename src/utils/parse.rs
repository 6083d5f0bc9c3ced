//! Parse utilities for common data transformations

use crate::types::{OrderSide, OrderType};

/// Parse order side from string
pub fn parse_order_side(side: &str) -> Option<OrderSide> {
    match side.to_lowercase().as_str() {
        "buy" | "bid" => Some(OrderSide::Buy),
        "sell" | "ask" => Some(OrderSide::Sell),
        _ => None,
    }
}

/// Parse order type from string
pub fn parse_order_type(order_type: &str) -> Option<OrderType> {
    match order_type.to_lowercase().as_str() {
        "market" => Some(OrderType::Market),
        "limit" => Some(OrderType::Limit),
        "stop_market" | "stop-market" => Some(OrderType::StopMarket),
        "stop_limit" | "stop-limit" | "stoplimit" => Some(OrderType::StopLimit),
        "stop_loss" | "stop-loss" | "stoploss" => Some(OrderType::StopLoss),
        "stop_loss_limit" | "stop-loss-limit" => Some(OrderType::StopLossLimit),
        "take_profit" | "take-profit" | "takeprofit" => Some(OrderType::TakeProfit),
        "take_profit_limit" | "take-profit-limit" => Some(OrderType::TakeProfitLimit),
        "limit_maker" | "limit-maker" => Some(OrderType::LimitMaker),
        "trigger" | "stop" => Some(OrderType::Trigger),
        "iceberg" | "icebergs" => Some(OrderType::Iceberg),
        _ => None,
    }
}

/// URL-encode ordered key/value pairs into a query string
pub fn urlencode(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Drop entries older than `since`, then keep at most `limit` of them
pub fn filter_by_since_limit<T, F>(
    items: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
    timestamp: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    let mut filtered: Vec<T> = match since {
        Some(since) => items
            .into_iter()
            .filter(|item| timestamp(item).is_some_and(|ts| ts >= since))
            .collect(),
        None => items,
    };
    if let Some(limit) = limit {
        filtered.truncate(limit as usize);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_side() {
        assert_eq!(parse_order_side("BUY"), Some(OrderSide::Buy));
        assert_eq!(parse_order_side("sell"), Some(OrderSide::Sell));
        assert_eq!(parse_order_side("invalid"), None);
    }

    #[test]
    fn test_parse_order_type() {
        assert_eq!(parse_order_type("LIMIT"), Some(OrderType::Limit));
        assert_eq!(parse_order_type("STOP_LOSS_LIMIT"), Some(OrderType::StopLossLimit));
        assert_eq!(parse_order_type("take_profit"), Some(OrderType::TakeProfit));
        assert_eq!(parse_order_type("ICEBERG"), Some(OrderType::Iceberg));
        assert_eq!(parse_order_type("TRIGGER"), Some(OrderType::Trigger));
        assert_eq!(parse_order_type("oco"), None);
    }

    #[test]
    fn test_urlencode_keeps_order() {
        let params = vec![
            ("timestamp".to_string(), "1700000000000".to_string()),
            ("recv_window".to_string(), "5000".to_string()),
            ("pair".to_string(), "ETH/BTC".to_string()),
        ];
        assert_eq!(
            urlencode(&params),
            "timestamp=1700000000000&recv_window=5000&pair=ETH%2FBTC"
        );
    }

    #[test]
    fn test_filter_by_since_limit() {
        let items = vec![(1, Some(100)), (2, Some(200)), (3, Some(300)), (4, None)];
        let filtered = filter_by_since_limit(items.clone(), Some(200), None, |i| i.1);
        assert_eq!(filtered.iter().map(|i| i.0).collect::<Vec<_>>(), vec![2, 3]);

        let limited = filter_by_since_limit(items, None, Some(2), |i| i.1);
        assert_eq!(limited.len(), 2);
    }
}
