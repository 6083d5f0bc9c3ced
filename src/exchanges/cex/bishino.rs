//! Bishino Exchange Implementation
//!
//! Seychelles spot exchange. Public REST endpoints plus an HMAC-SHA256 signed
//! private API under the `auth/` prefix.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::client::{ExchangeConfig, HttpClient, HttpResponse, RateLimiter};
use crate::errors::{CcxtError, CcxtResult};
use crate::types::{
    Balance, Balances, DepositWithdrawFee, Exchange, ExchangeFeatures, ExchangeId,
    ExchangeStatus, ExchangeUrls, Fee, FeeEstimate, FeeInfo, FundingFees, Market, MinMax,
    Order, OrderBook, OrderBookEntry, OrderSide, OrderStatus, OrderType, SignedRequest,
    TakerOrMaker, Ticker, Timeframe, Trade, Transaction, TransactionStatus, TransactionType,
    OHLCV,
};
use crate::utils::crypto::hmac_sha256_base64;
use crate::utils::time::now_ms;
use crate::utils::{
    amount_to_precision, filter_by_since_limit, parse_order_side, parse_order_type,
    round_to_precision, urlencode, PrecisionMode, RoundingMode,
};

/// Exchange codes that differ from the unified currency code.
const COMMON_CURRENCIES: &[(&str, &str)] = &[("KEY", "Bihu"), ("PAI", "PCHAIN")];

/// Adapter options, the ccxt `options` block.
#[derive(Debug, Clone)]
pub struct BishinoOptions {
    /// `recv_window` sent with every signed request (ms)
    pub recv_window: u64,
    /// Calibrate the clock offset whenever markets are fetched
    pub adjust_for_time_difference: bool,
    /// Initial clock offset (ms), local minus server
    pub time_difference: i64,
}

impl Default for BishinoOptions {
    fn default() -> Self {
        Self {
            recv_window: 5000,
            adjust_for_time_difference: false,
            time_difference: 0,
        }
    }
}

/// Extra order fields that only some order shapes use.
#[derive(Debug, Clone, Default)]
pub struct OrderParams {
    /// Trigger price for stop, take-profit and trigger orders
    pub stop_price: Option<Decimal>,
    /// Visible slice for iceberg orders
    pub icebergs: Option<Decimal>,
    /// Ask the exchange to validate without placing
    pub test: bool,
}

/// The eight order shapes Bishino accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BishinoOrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    Trigger,
    Iceberg,
}

/// Endpoint and required fields of one order shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderShape {
    pub endpoint: &'static str,
    pub requires_price: bool,
    pub requires_trigger_price: bool,
    pub requires_icebergs: bool,
}

impl BishinoOrderType {
    /// Map a unified order type onto a Bishino shape.
    pub fn from_unified(order_type: OrderType) -> CcxtResult<Self> {
        match order_type {
            OrderType::Limit => Ok(Self::Limit),
            OrderType::Market => Ok(Self::Market),
            OrderType::StopLoss => Ok(Self::StopLoss),
            OrderType::StopLossLimit => Ok(Self::StopLossLimit),
            OrderType::TakeProfit => Ok(Self::TakeProfit),
            OrderType::TakeProfitLimit => Ok(Self::TakeProfitLimit),
            OrderType::Trigger => Ok(Self::Trigger),
            OrderType::Iceberg => Ok(Self::Iceberg),
            other => Err(CcxtError::NotSupported {
                feature: format!("createOrder type {other:?}"),
            }),
        }
    }

    /// Upper-case name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLoss => "STOP_LOSS",
            Self::StopLossLimit => "STOP_LOSS_LIMIT",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            Self::Trigger => "TRIGGER",
            Self::Iceberg => "ICEBERG",
        }
    }

    pub fn shape(&self) -> OrderShape {
        let (endpoint, requires_price, requires_trigger_price, requires_icebergs) = match self {
            Self::Limit => ("auth/limit", true, false, false),
            Self::Market => ("auth/market", false, false, false),
            Self::StopLoss | Self::TakeProfit => ("auth/market_trigger", false, true, false),
            Self::StopLossLimit | Self::TakeProfitLimit => ("auth/limit_trigger", true, true, false),
            Self::Trigger => ("auth/stop", true, true, false),
            Self::Iceberg => ("auth/icebergs", true, false, true),
        };
        OrderShape {
            endpoint,
            requires_price,
            requires_trigger_price,
            requires_icebergs,
        }
    }

    /// Check the required fields in order: price, trigger price, icebergs.
    pub fn validate(&self, price: Option<Decimal>, params: &OrderParams) -> CcxtResult<()> {
        let shape = self.shape();
        let missing = if shape.requires_price && price.is_none() {
            Some("a price argument")
        } else if shape.requires_trigger_price && params.stop_price.is_none() {
            Some("a trigger_price as an extra param")
        } else if shape.requires_icebergs && params.icebergs.is_none() {
            Some("icebergs as an extra param")
        } else {
            None
        };
        match missing {
            Some(parameter) => Err(CcxtError::MissingOrderParameter {
                order_type: self.name().into(),
                parameter: parameter.into(),
            }),
            None => Ok(()),
        }
    }
}

/// Bishino exchange
pub struct Bishino {
    config: ExchangeConfig,
    client: HttpClient,
    rate_limiter: RateLimiter,
    options: BishinoOptions,
    time_difference: AtomicI64,
    markets: RwLock<HashMap<String, Market>>,
    markets_by_id: RwLock<HashMap<String, String>>,
    features: ExchangeFeatures,
    urls: ExchangeUrls,
    timeframes: HashMap<Timeframe, String>,
}

impl Bishino {
    const BASE_URL: &'static str = "https://api.bishino.com";
    const RATE_LIMIT_MS: u64 = 500;
    const TAKER_FEE: Decimal = Decimal::from_parts(75, 0, 0, false, 4);

    /// Create new Bishino instance
    pub fn new(config: ExchangeConfig) -> CcxtResult<Self> {
        Self::with_options(config, BishinoOptions::default())
    }

    /// Create a Bishino instance with explicit adapter options
    pub fn with_options(config: ExchangeConfig, options: BishinoOptions) -> CcxtResult<Self> {
        let client = HttpClient::new(Self::BASE_URL, &config)?;
        let rate_limiter = match config.rate_limit_ms() {
            0 => RateLimiter::new(Self::RATE_LIMIT_MS),
            ms => RateLimiter::new(ms),
        };

        let features = crate::feature_flags! {
            spot,
            fetch_markets,
            fetch_ticker,
            fetch_tickers,
            fetch_order_book,
            fetch_trades,
            fetch_ohlcv,
            fetch_status,
            fetch_time,
            fetch_balance,
            create_order,
            create_limit_order,
            create_market_order,
            create_stop_order,
            cancel_order,
            fetch_order,
            fetch_orders,
            fetch_open_orders,
            fetch_closed_orders,
            fetch_my_trades,
            fetch_deposits,
            fetch_withdrawals,
            withdraw,
            fetch_funding_fees,
            fetch_deposit_withdraw_fees,
        };

        let urls = crate::exchange_urls! {
            logo: "https://bishino.com/img/wolf.png",
            www: "https://www.bishino.com",
            api: {
                "public" => Self::BASE_URL,
                "private" => Self::BASE_URL,
            },
            doc: [
                "https://docs.bishino.com",
            ],
            fees: "https://bishinosupport.zendesk.com/hc/en-us/articles/360004987079-Fee-structure",
        };

        let timeframes = crate::timeframe_map! {
            Minute5 => "5min",
        };

        Ok(Self {
            time_difference: AtomicI64::new(options.time_difference),
            config,
            client,
            rate_limiter,
            options,
            markets: RwLock::new(HashMap::new()),
            markets_by_id: RwLock::new(HashMap::new()),
            features,
            urls,
            timeframes,
        })
    }

    pub fn options(&self) -> &BishinoOptions {
        &self.options
    }

    /// Current clock offset (ms), local minus server
    pub fn time_difference(&self) -> i64 {
        self.time_difference.load(Ordering::Relaxed)
    }

    /// Request timestamp: local time corrected by the measured offset
    pub fn nonce(&self) -> i64 {
        now_ms() - self.time_difference()
    }

    /// Measure the offset between the local clock and the server clock.
    pub async fn load_time_difference(&self) -> CcxtResult<i64> {
        let server_time = self.fetch_time().await?;
        let after = now_ms();
        let difference = after - server_time;
        self.time_difference.store(difference, Ordering::Relaxed);
        tracing::info!(difference, "calibrated bishino clock offset");
        Ok(difference)
    }

    /// Unified currency code for an exchange asset id
    pub fn common_currency_code(code: &str) -> String {
        COMMON_CURRENCIES
            .iter()
            .find(|(id, _)| *id == code)
            .map(|(_, common)| (*common).to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Exchange asset id for a unified currency code
    pub fn currency_id(code: &str) -> String {
        COMMON_CURRENCIES
            .iter()
            .find(|(_, common)| *common == code)
            .map(|(id, _)| (*id).to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Reject empty addresses, addresses with spaces, and one repeated character.
    pub fn check_address(address: &str) -> CcxtResult<&str> {
        let mut chars = address.chars();
        let single_char = match chars.next() {
            Some(first) => chars.all(|c| c == first),
            None => true,
        };
        if single_char || address.contains(' ') {
            return Err(CcxtError::InvalidAddress {
                address: address.to_string(),
            });
        }
        Ok(address)
    }

    /// Estimate the fee of an order from the cached market schedule.
    ///
    /// Sells are charged in the quote currency, buys in the base currency.
    pub fn calculate_fee(
        &self,
        symbol: &str,
        _order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
        taker_or_maker: TakerOrMaker,
    ) -> CcxtResult<FeeEstimate> {
        let market = self.market(symbol)?;
        let rate = match taker_or_maker {
            TakerOrMaker::Taker => market.taker,
            TakerOrMaker::Maker => market.maker,
        }
        .unwrap_or_default();

        let mut cost = amount * rate;
        let (currency, precision, mode) = match side {
            OrderSide::Sell => {
                cost *= price;
                (
                    market.quote.clone(),
                    market.precision.price,
                    market.precision.price_mode,
                )
            },
            OrderSide::Buy => (
                market.base.clone(),
                market.precision.amount,
                market.precision.amount_mode,
            ),
        };
        if let Some(precision) = precision {
            cost = round_to_precision(cost, precision, mode, RoundingMode::HalfUp);
        }

        Ok(FeeEstimate {
            fee_type: taker_or_maker,
            currency,
            rate,
            cost,
        })
    }

    /// Place an order, with the extra fields some shapes need.
    pub async fn create_order_with_params(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        params: &OrderParams,
    ) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let bishino_type = BishinoOrderType::from_unified(order_type)?;
        bishino_type.validate(price, params)?;

        let shape = bishino_type.shape();
        let mut body: Vec<(String, String)> = vec![
            ("pair".into(), market.id.clone()),
            (
                "qty".into(),
                amount_to_precision(
                    amount,
                    market.precision.amount,
                    market.precision.amount_mode,
                ),
            ),
            ("side".into(), side.as_str().to_uppercase()),
            ("is_test".into(), params.test.to_string()),
        ];
        if shape.requires_trigger_price {
            if let Some(stop_price) = params.stop_price {
                body.push(("trigger_price".into(), decimal_param(stop_price)));
            }
        }
        if shape.requires_icebergs {
            if let Some(icebergs) = params.icebergs {
                body.push(("icebergs".into(), decimal_param(icebergs)));
            }
        }
        if shape.requires_price {
            if let Some(price) = price {
                body.push(("price".into(), decimal_param(price)));
            }
        }

        tracing::debug!(
            symbol,
            order_type = bishino_type.name(),
            endpoint = shape.endpoint,
            "creating bishino order"
        );
        let result: serde_json::Value = self.private_post(shape.endpoint, body).await?;
        self.parse_order(&result, Some(&market))
    }

    // === Transport ===

    async fn request_raw(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: Vec<(String, String)>,
    ) -> CcxtResult<HttpResponse> {
        self.rate_limiter.throttle(1.0).await;
        let request = self.sign(path, api, method, &params)?;
        let response = self.client.execute(&request).await?;
        self.handle_errors(&response)?;
        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: Vec<(String, String)>,
    ) -> CcxtResult<T> {
        let response = self.request_raw(path, api, method, params).await?;
        let envelope: BishinoResponse<T> = response.json()?;
        Ok(envelope.result)
    }

    /// Public API call
    async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> CcxtResult<T> {
        self.request(path, "public", "GET", params).await
    }

    /// Private API call (GET)
    async fn private_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> CcxtResult<T> {
        self.request(path, "private", "GET", params).await
    }

    /// Private API call (POST)
    async fn private_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> CcxtResult<T> {
        self.request(path, "private", "POST", params).await
    }

    /// Translate error responses. Body codes first, then 401/500, then the
    /// generic status table.
    fn handle_errors(&self, response: &HttpResponse) -> CcxtResult<()> {
        if let Ok(body) = serde_json::from_str::<BishinoErrorBody>(&response.body) {
            if let Some(code) = body.code.as_ref().and_then(error_code) {
                let message = body.msg.as_deref().unwrap_or(&response.body);
                let mapped = crate::map_exchange_error! {
                    code, message, Bishino,
                    2021 | 2027 => InsufficientFunds,
                    2015 | 3012 | 3025 => AuthenticationError,
                    2033 => OrderNotFound,
                    2067 | 2068 | 2085 => InvalidOrder,
                    3024 => PermissionDenied,
                    4000 => ExchangeNotAvailable,
                    4003 => DDoSProtection,
                };
                if let Some(err) = mapped {
                    tracing::warn!(code, url = %response.url, "bishino returned an error code");
                    return Err(err);
                }
            }
        }

        if matches!(response.status, 401 | 500) {
            tracing::warn!(status = response.status, url = %response.url, "bishino request failed");
            return Err(CcxtError::ExchangeError {
                message: format!("[Bishino] HTTP {}: {}", response.status, response.body),
            });
        }

        response.error_for_status()
    }

    // === Market cache ===

    fn market(&self, symbol: &str) -> CcxtResult<Market> {
        let markets = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        markets
            .get(symbol)
            .cloned()
            .ok_or_else(|| CcxtError::BadSymbol {
                symbol: symbol.to_string(),
            })
    }

    fn symbol_for_id(&self, market_id: &str) -> Option<String> {
        let by_id = self
            .markets_by_id
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        by_id.get(market_id).cloned()
    }

    // === Parsers ===

    fn parse_market(&self, id: &str, raw: &serde_json::Value) -> CcxtResult<Market> {
        let pair: BishinoPair = decode("market", raw)?;
        let symbol = format!("{}/{}", pair.base, pair.quote);

        let mut market = Market::spot(id.to_string(), symbol, pair.base, pair.quote);
        market.active = pair.status.as_deref() == Some("TRADING");
        market.taker = Some(Self::TAKER_FEE);
        market.maker = Some(Decimal::ZERO);
        market.percentage = true;
        market.tier_based = false;
        market.precision.base = Some(pair.base_precision);
        market.precision.quote = Some(pair.quote_precision);
        market.precision.amount = Some(pair.base_precision);
        market.precision.price = Some(pair.quote_precision);

        market.limits.amount = MinMax {
            min: pow10_neg(pair.base_precision),
            max: None,
        };
        market.limits.cost = MinMax {
            min: neg_log10(pair.base_precision),
            max: None,
        };

        for filter in &pair.filters {
            match filter.filter_type.as_str() {
                "PRICE_FILTER" => {
                    market.limits.price = MinMax {
                        min: filter.min_price,
                        max: filter.max_price.filter(|max| *max > Decimal::ZERO),
                    };
                    market.precision.price = filter.tick_size;
                    market.precision.price_mode = PrecisionMode::TickSize;
                },
                "LOT_SIZE" => {
                    market.precision.amount = filter.tick_size;
                    market.precision.amount_mode = PrecisionMode::TickSize;
                    market.limits.amount = MinMax {
                        min: filter.min_qty,
                        max: filter.max_qty,
                    };
                },
                _ => {},
            }
        }

        market.info = raw.clone();
        Ok(market)
    }

    fn parse_ticker(&self, raw: &serde_json::Value, symbol: &str) -> CcxtResult<Ticker> {
        let data: BishinoTicker = decode("ticker", raw)?;
        let mut ticker = Ticker::new(symbol.to_string());
        if let Some(ts) = data.close_time {
            ticker = ticker.with_timestamp(ts);
        }
        ticker.high = data.high_price;
        ticker.low = data.low_price;
        ticker.bid = data.bid_price;
        ticker.bid_volume = data.bid_qty;
        ticker.ask = data.ask_price;
        ticker.ask_volume = data.ask_qty;
        ticker.open = data.open_price;
        ticker.close = data.last_price;
        ticker.last = data.last_price;
        ticker.change = data.price_change;
        ticker.percentage = data.price_change_percent;
        ticker.base_volume = data.base_volume;
        ticker.quote_volume = data.quote_volume;
        Ok(ticker.with_info(raw.clone()))
    }

    fn parse_trade(&self, raw: &serde_json::Value, market: Option<&Market>) -> CcxtResult<Trade> {
        let data: BishinoTrade = decode("trade", raw)?;
        let symbol = data
            .pair
            .as_deref()
            .map(|pair| pair.replace('_', "/"))
            .or_else(|| market.map(|m| m.symbol.clone()))
            .unwrap_or_default();

        let mut trade = Trade::new(data.id.unwrap_or_default(), symbol, data.price, data.qty);
        if let Some(ts) = data.time {
            trade = trade.with_timestamp(ts);
        }
        trade.side = data
            .side
            .as_deref()
            .and_then(parse_order_side)
            .map(|side| side.as_str().to_string());
        if data.net_commission.is_some() || data.net_commission_asset.is_some() {
            trade = trade.with_fee(Fee {
                cost: data.net_commission,
                currency: data
                    .net_commission_asset
                    .as_deref()
                    .map(Self::common_currency_code),
                rate: None,
            });
        }
        Ok(trade.with_info(raw.clone()))
    }

    fn parse_trades(
        &self,
        raw: &[serde_json::Value],
        market: Option<&Market>,
    ) -> CcxtResult<Vec<Trade>> {
        raw.iter().map(|t| self.parse_trade(t, market)).collect()
    }

    fn parse_order(&self, raw: &serde_json::Value, market: Option<&Market>) -> CcxtResult<Order> {
        let data: BishinoOrder = decode("order", raw)?;

        let symbol = data
            .pair
            .as_deref()
            .and_then(|id| self.symbol_for_id(id))
            .or_else(|| market.map(|m| m.symbol.clone()))
            .or_else(|| data.pair.as_deref().map(|id| id.replace('_', "/")))
            .unwrap_or_default();
        let side = data
            .side
            .as_deref()
            .and_then(parse_order_side)
            .ok_or_else(|| CcxtError::parse("order", format!("unknown side {:?}", data.side)))?;
        let order_type = data.order_type.as_deref().and_then(parse_order_type);

        let amount = data.qty_orig;
        let remaining = data.qty_remaining;
        let cost = data.price.map(|price| price * amount);

        let fills = data.fills.unwrap_or_default();
        let trades = self.parse_trades(&fills, market)?;
        let average = if trades.is_empty() {
            data.price
        } else {
            let sum: Decimal = trades.iter().map(|t| t.price).sum();
            Some(sum / Decimal::from(trades.len()))
        };

        let mut order = Order::new(
            data.id.unwrap_or_default(),
            symbol,
            order_type,
            side,
            amount,
        )
        .with_timestamp(data.time)
        .with_status(parse_status(data.status.as_deref().unwrap_or_default()));
        order.price = average;
        order.average = average;
        order.cost = cost;
        order.filled = amount - remaining;
        order.remaining = Some(remaining);
        order.trades = trades;
        order.info = raw.clone();
        Ok(order)
    }

    fn parse_orders(
        &self,
        raw: &[serde_json::Value],
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol)?),
            None => None,
        };
        let orders = raw
            .iter()
            .map(|o| self.parse_order(o, market.as_ref()))
            .collect::<CcxtResult<Vec<_>>>()?
            .into_iter()
            .filter(|o| symbol.map_or(true, |s| o.symbol == s))
            .collect();
        Ok(filter_by_since_limit(orders, since, limit, |o| o.timestamp))
    }

    fn parse_transaction(&self, raw: &serde_json::Value) -> CcxtResult<Transaction> {
        let data: BishinoTransaction = decode("transaction", raw)?;
        let currency = Self::common_currency_code(&data.asset);
        let tx_type = if data.id.contains(&data.asset) {
            TransactionType::Deposit
        } else {
            TransactionType::Withdrawal
        };
        let status = match parse_status(data.status.as_deref().unwrap_or_default()) {
            OrderStatus::Open => TransactionStatus::Pending,
            OrderStatus::Closed => TransactionStatus::Ok,
            OrderStatus::Canceled => TransactionStatus::Canceled,
            OrderStatus::Rejected | OrderStatus::Expired => TransactionStatus::Failed,
            OrderStatus::Unknown(raw_status) if raw_status.is_empty() => TransactionStatus::Pending,
            OrderStatus::Unknown(raw_status) => TransactionStatus::Unknown(raw_status),
        };

        let mut tx = match tx_type {
            TransactionType::Deposit => {
                Transaction::deposit(data.id.clone(), currency.clone(), data.net)
            },
            TransactionType::Withdrawal => {
                Transaction::withdrawal(data.id.clone(), currency.clone(), data.net)
            },
        }
        .with_status(status);
        if let Some(ts) = data.time {
            tx = tx.with_timestamp(ts);
        }
        if let Some(address) = data.address {
            tx = tx.with_address(address, None);
        }
        if let Some(hash) = data.transaction.and_then(|t| t.hash) {
            tx = tx.with_txid(hash);
        }
        if let Some(gross) = data.qty {
            tx = tx.with_fee(Fee::new(gross - data.net, currency));
        }
        tx.info = raw.clone();
        Ok(tx)
    }

    fn parse_transactions(
        &self,
        raw: &[serde_json::Value],
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        let transactions = raw
            .iter()
            .map(|t| self.parse_transaction(t))
            .collect::<CcxtResult<Vec<_>>>()?
            .into_iter()
            .filter(|t| code.map_or(true, |c| t.currency == c))
            .collect();
        Ok(filter_by_since_limit(transactions, since, limit, |t| {
            t.timestamp
        }))
    }

    fn parse_funding_fees(
        &self,
        raw: &HashMap<String, serde_json::Value>,
    ) -> CcxtResult<FundingFees> {
        let mut fees = FundingFees::default();
        for (id, asset) in raw {
            let code = Self::common_currency_code(id);
            let asset: BishinoAsset = decode("asset", asset)?;
            let Some(asset_fees) = asset.fees else {
                continue;
            };
            if let Some(withdrawal) = asset_fees.withdrawal {
                fees.withdraw.insert(code.clone(), withdrawal);
            }
            if let Some(deposit) = asset_fees.deposit {
                fees.deposit.insert(code, deposit);
            }
        }
        fees.info = serde_json::to_value(raw)?;
        Ok(fees)
    }
}

#[async_trait]
impl Exchange for Bishino {
    fn id(&self) -> ExchangeId {
        ExchangeId::Bishino
    }

    fn name(&self) -> &str {
        "Bishino"
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn countries(&self) -> &[&str] {
        &["SC"]
    }

    fn rate_limit(&self) -> u64 {
        self.rate_limiter.rate_limit_ms()
    }

    fn has(&self) -> &ExchangeFeatures {
        &self.features
    }

    fn urls(&self) -> &ExchangeUrls {
        &self.urls
    }

    fn timeframes(&self) -> &HashMap<Timeframe, String> {
        &self.timeframes
    }

    async fn load_markets(&self, reload: bool) -> CcxtResult<HashMap<String, Market>> {
        if !reload {
            let cached = self.markets.read().unwrap_or_else(PoisonError::into_inner);
            if !cached.is_empty() {
                return Ok(cached.clone());
            }
        }

        let markets = self.fetch_markets().await?;

        let mut cache = self.markets.write().unwrap_or_else(PoisonError::into_inner);
        let mut by_id = self
            .markets_by_id
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        cache.clear();
        by_id.clear();
        for market in markets {
            by_id.insert(market.id.clone(), market.symbol.clone());
            cache.insert(market.symbol.clone(), market);
        }
        tracing::info!(count = cache.len(), "loaded bishino markets");

        Ok(cache.clone())
    }

    async fn fetch_markets(&self) -> CcxtResult<Vec<Market>> {
        let pairs: HashMap<String, serde_json::Value> = self.public_get("pairs", vec![]).await?;
        if self.options.adjust_for_time_difference {
            self.load_time_difference().await?;
        }

        let mut markets = pairs
            .iter()
            .map(|(id, raw)| self.parse_market(id, raw))
            .collect::<CcxtResult<Vec<_>>>()?;
        markets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(markets)
    }

    async fn fetch_ticker(&self, symbol: &str) -> CcxtResult<Ticker> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let tickers: HashMap<String, serde_json::Value> =
            self.public_get("ticker", vec![]).await?;
        let raw = tickers
            .get(&market.id)
            .ok_or_else(|| CcxtError::BadSymbol {
                symbol: symbol.to_string(),
            })?;
        self.parse_ticker(raw, &market.symbol)
    }

    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> CcxtResult<HashMap<String, Ticker>> {
        self.load_markets(false).await?;
        let tickers: HashMap<String, serde_json::Value> =
            self.public_get("ticker", vec![]).await?;

        let mut result = HashMap::new();
        for (id, raw) in &tickers {
            let Some(symbol) = self.symbol_for_id(id) else {
                continue;
            };
            if symbols.is_some_and(|wanted| !wanted.contains(&symbol.as_str())) {
                continue;
            }
            let ticker = self.parse_ticker(raw, &symbol)?;
            result.insert(symbol, ticker);
        }
        Ok(result)
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> CcxtResult<OrderBook> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut params = vec![("pair".to_string(), market.id.replace('/', "_"))];
        if let Some(limit) = limit {
            params.push(("limit".into(), limit.to_string()));
        }

        let depth: BishinoDepth = self.public_get("depth", params).await?;
        let mut book = OrderBook::new(market.symbol.clone());
        book.bids = depth.bids.into_iter().map(BishinoBookLevel::into_entry).collect();
        book.asks = depth.asks.into_iter().map(BishinoBookLevel::into_entry).collect();
        Ok(book)
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let params = paging_params(Some(("pair", market.id.clone())), since, limit);

        let raw: Vec<serde_json::Value> = self.public_get("trades", params).await?;
        let trades = self.parse_trades(&raw, Some(&market))?;
        Ok(filter_by_since_limit(trades, since, limit, |t| t.timestamp))
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<OHLCV>> {
        if !self.timeframes.contains_key(&timeframe) {
            return Err(CcxtError::NotSupported {
                feature: format!("fetchOHLCV timeframe {}", timeframe.as_str()),
            });
        }
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let params = paging_params(Some(("pair", market.id.clone())), since, limit);

        let candles: Vec<BishinoCandle> = self.public_get("ohlcv", params).await?;
        Ok(candles
            .into_iter()
            .map(|c| OHLCV::new(c.open_time, c.open, c.high, c.low, c.close, c.base_volume))
            .collect())
    }

    async fn fetch_time(&self) -> CcxtResult<i64> {
        self.public_get("time", vec![]).await
    }

    async fn fetch_status(&self) -> CcxtResult<ExchangeStatus> {
        let response = self.request_raw("ping", "public", "GET", vec![]).await?;
        let mut status = ExchangeStatus::ok();
        // 응답 내용과 무관하게 ping 성공이면 ok
        match response.json::<serde_json::Value>() {
            Ok(info) => status.info = info,
            Err(e) => tracing::debug!(error = %e, "bishino ping body is not JSON"),
        }
        Ok(status)
    }

    async fn fetch_balance(&self) -> CcxtResult<Balances> {
        self.load_markets(false).await?;
        let account: serde_json::Value = self.private_get("account_info", vec![]).await?;
        let info: BishinoAccountInfo = decode("balance", &account)?;

        let mut balances = Balances::new();
        for entry in info.balances.into_entries() {
            let code = Self::common_currency_code(&entry.asset);
            balances.add(code, Balance::new(entry.free, entry.locked));
        }
        balances.info = account;
        Ok(balances)
    }

    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> CcxtResult<Order> {
        self.create_order_with_params(symbol, order_type, side, amount, price, &OrderParams::default())
            .await
    }

    async fn create_stop_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        stop_price: Decimal,
    ) -> CcxtResult<Order> {
        let params = OrderParams {
            stop_price: Some(stop_price),
            ..Default::default()
        };
        self.create_order_with_params(symbol, order_type, side, amount, price, &params)
            .await
    }

    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol)?),
            None => None,
        };
        let result: serde_json::Value = self
            .private_post("auth/cancel", vec![("id".into(), id.to_string())])
            .await?;
        self.parse_order(&result, market.as_ref())
    }

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol)?),
            None => None,
        };
        let result: serde_json::Value = self
            .private_get("offer_by_id", vec![("id".into(), id.to_string())])
            .await?;
        self.parse_order(&result, market.as_ref())
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let raw: Vec<serde_json::Value> = self
            .private_get("active_offers_by_account", paging_params(None, since, limit))
            .await?;
        self.parse_orders(&raw, symbol, since, limit)
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let raw: Vec<serde_json::Value> = self
            .private_get("completed_offers_by_account", paging_params(None, since, limit))
            .await?;
        self.parse_orders(&raw, symbol, since, limit)
    }

    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let raw: Vec<serde_json::Value> = self
            .private_get("offers_by_account", paging_params(None, since, limit))
            .await?;
        self.parse_orders(&raw, symbol, since, limit)
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Trade>> {
        self.load_markets(false).await?;
        let market = match symbol {
            Some(symbol) => Some(self.market(symbol)?),
            None => None,
        };
        let raw: Vec<serde_json::Value> = self
            .private_get("trades_by_account", paging_params(None, since, limit))
            .await?;
        let trades = self
            .parse_trades(&raw, market.as_ref())?
            .into_iter()
            .filter(|t| symbol.map_or(true, |s| t.symbol == s))
            .collect();
        Ok(filter_by_since_limit(trades, since, limit, |t| t.timestamp))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        self.load_markets(false).await?;
        let raw: Vec<serde_json::Value> = self.private_get("deposits", vec![]).await?;
        self.parse_transactions(&raw, code, since, limit)
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> CcxtResult<Vec<Transaction>> {
        self.load_markets(false).await?;
        let raw: Vec<serde_json::Value> = self.private_get("withdrawals", vec![]).await?;
        self.parse_transactions(&raw, code, since, limit)
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> CcxtResult<Transaction> {
        Self::check_address(address)?;
        self.load_markets(false).await?;
        let params = vec![
            ("asset".to_string(), Self::currency_id(code)),
            ("address".to_string(), address.to_string()),
            ("qty".to_string(), decimal_param(amount)),
        ];
        let result: serde_json::Value = self.private_post("auth/withdraw", params).await?;
        let receipt: BishinoWithdrawal = decode("withdrawal", &result)?;

        let mut tx = Transaction::withdrawal(receipt.id.unwrap_or_default(), code.to_string(), amount)
            .with_address(address.to_string(), tag.map(str::to_string));
        tx.info = result;
        Ok(tx)
    }

    async fn fetch_funding_fees(&self) -> CcxtResult<FundingFees> {
        let assets: HashMap<String, serde_json::Value> = self.public_get("assets", vec![]).await?;
        self.parse_funding_fees(&assets)
    }

    async fn fetch_deposit_withdraw_fees(
        &self,
        codes: Option<&[&str]>,
    ) -> CcxtResult<HashMap<String, DepositWithdrawFee>> {
        let fees = self.fetch_funding_fees().await?;
        let mut result: HashMap<String, DepositWithdrawFee> = HashMap::new();
        for (code, fee) in &fees.withdraw {
            result
                .entry(code.clone())
                .or_insert_with(|| DepositWithdrawFee::new(code))
                .withdraw = Some(FeeInfo::fixed(*fee));
        }
        for (code, fee) in &fees.deposit {
            result
                .entry(code.clone())
                .or_insert_with(|| DepositWithdrawFee::new(code))
                .deposit = Some(FeeInfo::fixed(*fee));
        }
        if let Some(codes) = codes {
            result.retain(|code, _| codes.contains(&code.as_str()));
        }
        for (code, entry) in result.iter_mut() {
            let id = Self::currency_id(code);
            entry.info = fees.info.get(&id).cloned().unwrap_or_default();
        }
        Ok(result)
    }

    fn market_id(&self, symbol: &str) -> Option<String> {
        let markets = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        markets.get(symbol).map(|m| m.id.clone())
    }

    fn symbol(&self, market_id: &str) -> Option<String> {
        self.symbol_for_id(market_id)
    }

    fn sign(
        &self,
        path: &str,
        api: &str,
        method: &str,
        params: &[(String, String)],
    ) -> CcxtResult<SignedRequest> {
        let mut url = format!("{}/{}", self.client.base_url(), path);
        if method == "GET" && !params.is_empty() {
            url.push('?');
            url.push_str(&urlencode(params));
        }

        let mut headers = HashMap::new();
        let mut body = None;

        if api == "private" {
            let (api_key, secret) = crate::require_credentials!(self.config)?;
            let mut signed_params = vec![
                ("timestamp".to_string(), self.nonce().to_string()),
                ("recv_window".to_string(), self.options.recv_window.to_string()),
            ];
            signed_params.extend(params.iter().cloned());
            let query = urlencode(&signed_params);
            let signature = hmac_sha256_base64(secret, &query)?;

            headers.insert("x-api-key".into(), api_key.to_string());
            headers.insert("x-signature".into(), signature);
            headers.insert(
                "Content-Type".into(),
                "application/x-www-form-urlencoded".into(),
            );
            body = Some(query);
        } else {
            headers.insert("Content-Type".into(), "application/json".into());
        }

        Ok(SignedRequest {
            url,
            method: method.to_string(),
            headers,
            body,
        })
    }
}

/// Order status as reported by Bishino. Unrecognised values pass through.
pub fn parse_status(status: &str) -> OrderStatus {
    match status {
        "ACTIVE" | "PENDING" => OrderStatus::Open,
        "COMPLETED" => OrderStatus::Closed,
        "CANCELLED" => OrderStatus::Canceled,
        "REJECTED" => OrderStatus::Rejected,
        other => OrderStatus::Unknown(other.to_string()),
    }
}

fn decode<T: DeserializeOwned>(data_type: &str, raw: &serde_json::Value) -> CcxtResult<T> {
    T::deserialize(raw).map_err(|e| CcxtError::parse(data_type, e.to_string()))
}

fn decimal_param(value: Decimal) -> String {
    value.normalize().to_string()
}

fn paging_params(
    pair: Option<(&str, String)>,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some((key, value)) = pair {
        params.push((key.to_string(), value));
    }
    if let Some(since) = since {
        params.push(("start".into(), since.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit".into(), limit.to_string()));
    }
    params
}

/// `10^-precision`, for the default minimum amount
fn pow10_neg(precision: Decimal) -> Option<Decimal> {
    if precision.fract().is_zero() && precision >= Decimal::ZERO && precision <= Decimal::from(28) {
        Some(Decimal::new(1, precision.to_u32()?))
    } else {
        Decimal::TEN.checked_powd(-precision)
    }
}

/// `-log10(precision)`, for the default minimum cost
fn neg_log10(precision: Decimal) -> Option<Decimal> {
    if precision <= Decimal::ZERO {
        return None;
    }
    precision.checked_log10().map(|v| -v)
}

fn error_code(code: &serde_json::Value) -> Option<i64> {
    match code {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn de_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// === Response Types ===

#[derive(Debug, Deserialize)]
struct BishinoResponse<T> {
    result: T,
}

#[derive(Debug, Default, Deserialize)]
struct BishinoErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BishinoPair {
    base: String,
    quote: String,
    base_precision: Decimal,
    quote_precision: Decimal,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    filters: Vec<BishinoFilter>,
}

#[derive(Debug, Deserialize)]
struct BishinoFilter {
    filter_type: String,
    #[serde(default)]
    min_price: Option<Decimal>,
    #[serde(default)]
    max_price: Option<Decimal>,
    #[serde(default)]
    tick_size: Option<Decimal>,
    #[serde(default)]
    min_qty: Option<Decimal>,
    #[serde(default)]
    max_qty: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct BishinoTicker {
    #[serde(default)]
    close_time: Option<i64>,
    #[serde(default)]
    last_price: Option<Decimal>,
    #[serde(default)]
    high_price: Option<Decimal>,
    #[serde(default)]
    low_price: Option<Decimal>,
    #[serde(default)]
    bid_price: Option<Decimal>,
    #[serde(default)]
    bid_qty: Option<Decimal>,
    #[serde(default)]
    ask_price: Option<Decimal>,
    #[serde(default)]
    ask_qty: Option<Decimal>,
    #[serde(default)]
    open_price: Option<Decimal>,
    #[serde(default)]
    price_change: Option<Decimal>,
    #[serde(default)]
    price_change_percent: Option<Decimal>,
    #[serde(default)]
    base_volume: Option<Decimal>,
    #[serde(default)]
    quote_volume: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct BishinoDepth {
    #[serde(default)]
    bids: Vec<BishinoBookLevel>,
    #[serde(default)]
    asks: Vec<BishinoBookLevel>,
}

/// Depth levels arrive either as `[price, qty]` or `{price, qty}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BishinoBookLevel {
    Pair(Decimal, Decimal),
    Object { price: Decimal, qty: Decimal },
}

impl BishinoBookLevel {
    fn into_entry(self) -> OrderBookEntry {
        let (price, amount) = match self {
            BishinoBookLevel::Pair(price, qty) => (price, qty),
            BishinoBookLevel::Object { price, qty } => (price, qty),
        };
        OrderBookEntry { price, amount }
    }
}

#[derive(Debug, Deserialize)]
struct BishinoCandle {
    open_time: i64,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    base_volume: Decimal,
}

#[derive(Debug, Deserialize)]
struct BishinoTrade {
    #[serde(default, deserialize_with = "de_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    price: Decimal,
    qty: Decimal,
    #[serde(default)]
    pair: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    net_commission: Option<Decimal>,
    #[serde(default)]
    net_commission_asset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BishinoOrder {
    #[serde(default, deserialize_with = "de_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    pair: Option<String>,
    time: i64,
    #[serde(default)]
    price: Option<Decimal>,
    qty_orig: Decimal,
    qty_remaining: Decimal,
    #[serde(default, rename = "type")]
    order_type: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    fills: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct BishinoAccountInfo {
    balances: BishinoBalances,
}

/// `balances` is documented as a list but has been seen keyed by asset.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BishinoBalances {
    List(Vec<BishinoBalance>),
    Keyed(HashMap<String, BishinoBalance>),
}

impl BishinoBalances {
    fn into_entries(self) -> Vec<BishinoBalance> {
        match self {
            BishinoBalances::List(entries) => entries,
            BishinoBalances::Keyed(entries) => entries.into_values().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BishinoBalance {
    asset: String,
    free: Decimal,
    locked: Decimal,
}

#[derive(Debug, Deserialize)]
struct BishinoTransaction {
    id: String,
    asset: String,
    net: Decimal,
    #[serde(default)]
    qty: Option<Decimal>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    transaction: Option<BishinoTxDetail>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BishinoTxDetail {
    #[serde(default)]
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BishinoAsset {
    #[serde(default)]
    fees: Option<BishinoAssetFees>,
}

#[derive(Debug, Deserialize)]
struct BishinoAssetFees {
    #[serde(default)]
    withdrawal: Option<Decimal>,
    #[serde(default)]
    deposit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct BishinoWithdrawal {
    #[serde(default, deserialize_with = "de_string_or_number")]
    id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn exchange() -> Bishino {
        Bishino::new(ExchangeConfig::new()).unwrap()
    }

    fn eth_btc() -> serde_json::Value {
        json!({
            "base": "ETH",
            "quote": "BTC",
            "base_precision": 8,
            "quote_precision": 8,
            "status": "TRADING",
            "filters": [
                {"filter_type": "PRICE_FILTER", "min_price": "0.000001", "max_price": "0", "tick_size": "0.000001"},
                {"filter_type": "LOT_SIZE", "min_qty": "0.001", "max_qty": "100000", "tick_size": "0.001"}
            ]
        })
    }

    fn seed_market(exchange: &Bishino, id: &str, raw: serde_json::Value) -> Market {
        let market = exchange.parse_market(id, &raw).unwrap();
        exchange
            .markets_by_id
            .write()
            .unwrap()
            .insert(market.id.clone(), market.symbol.clone());
        exchange
            .markets
            .write()
            .unwrap()
            .insert(market.symbol.clone(), market.clone());
        market
    }

    #[test]
    fn test_exchange_info() {
        let exchange = exchange();
        assert_eq!(exchange.id(), ExchangeId::Bishino);
        assert_eq!(exchange.name(), "Bishino");
        assert_eq!(exchange.countries(), &["SC"]);
        assert_eq!(exchange.rate_limit(), 500);
        assert!(exchange.has().spot);
        assert!(exchange.has().withdraw);
        assert!(exchange.has_feature("fetchFundingFees"));
        assert!(!exchange.has().fetch_deposit_address);
        assert!(!exchange.has().cors);
    }

    #[test]
    fn test_timeframes() {
        let exchange = exchange();
        assert_eq!(
            exchange.timeframes().get(&Timeframe::Minute5),
            Some(&"5min".to_string())
        );
        assert_eq!(exchange.timeframes().len(), 1);
    }

    #[test]
    fn test_default_options() {
        let exchange = exchange();
        assert_eq!(exchange.options().recv_window, 5000);
        assert!(!exchange.options().adjust_for_time_difference);
        assert_eq!(exchange.time_difference(), 0);
    }

    #[test]
    fn test_parse_market_with_filters() {
        let market = exchange().parse_market("ETH_BTC", &eth_btc()).unwrap();
        assert_eq!(market.symbol, "ETH/BTC");
        assert_eq!(market.base_id, "ETH");
        assert!(market.active);
        assert_eq!(market.taker, Some(dec!(0.0075)));
        assert_eq!(market.maker, Some(dec!(0)));
        assert_eq!(market.precision.amount, Some(dec!(0.001)));
        assert_eq!(market.precision.price, Some(dec!(0.000001)));
        assert_eq!(market.precision.amount_mode, PrecisionMode::TickSize);
        assert_eq!(market.precision.price_mode, PrecisionMode::TickSize);
        assert_eq!(market.precision.base, Some(dec!(8)));
        assert_eq!(market.limits.amount.min, Some(dec!(0.001)));
        assert_eq!(market.limits.amount.max, Some(dec!(100000)));
        assert_eq!(market.limits.price.min, Some(dec!(0.000001)));
        assert_eq!(market.limits.price.max, None);
    }

    #[test]
    fn test_parse_market_defaults_without_filters() {
        let raw = json!({
            "base": "KEY",
            "quote": "USDT",
            "base_precision": 2,
            "quote_precision": 4,
            "status": "HALT",
            "filters": []
        });
        let market = exchange().parse_market("KEY_USDT", &raw).unwrap();
        assert!(!market.active);
        assert_eq!(market.base, "KEY");
        assert_eq!(market.limits.amount.min, Some(dec!(0.01)));
        let cost_min = market.limits.cost.min.unwrap();
        assert!((cost_min - dec!(-0.30103)).abs() < dec!(0.0001));
        assert_eq!(market.precision.price, Some(dec!(4)));
        assert_eq!(market.precision.price_mode, PrecisionMode::DecimalPlaces);
        assert_eq!(market.precision.amount_mode, PrecisionMode::DecimalPlaces);
    }

    #[test]
    fn test_parse_market_whole_number_lot_size() {
        let raw = json!({
            "base": "DOGE",
            "quote": "USDT",
            "base_precision": 8,
            "quote_precision": 8,
            "status": "TRADING",
            "filters": [
                {"filter_type": "LOT_SIZE", "min_qty": "1", "max_qty": "1000000", "tick_size": "1.00000000"}
            ]
        });
        let market = exchange().parse_market("DOGE_USDT", &raw).unwrap();
        assert_eq!(market.precision.amount, Some(dec!(1)));
        assert_eq!(market.precision.amount_mode, PrecisionMode::TickSize);
        assert_eq!(market.precision.price, Some(dec!(8)));
        assert_eq!(market.precision.price_mode, PrecisionMode::DecimalPlaces);
    }

    #[test]
    fn test_parse_market_rejects_malformed_entry() {
        let err = exchange()
            .parse_market("BAD", &json!({"base": "X"}))
            .unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_parse_status_is_total() {
        assert_eq!(parse_status("ACTIVE"), OrderStatus::Open);
        assert_eq!(parse_status("PENDING"), OrderStatus::Open);
        assert_eq!(parse_status("COMPLETED"), OrderStatus::Closed);
        assert_eq!(parse_status("CANCELLED"), OrderStatus::Canceled);
        assert_eq!(parse_status("REJECTED"), OrderStatus::Rejected);
        assert_eq!(
            parse_status("PARTIAL"),
            OrderStatus::Unknown("PARTIAL".into())
        );
    }

    #[test]
    fn test_order_shapes() {
        let shape = BishinoOrderType::Iceberg.shape();
        assert_eq!(shape.endpoint, "auth/icebergs");
        assert!(shape.requires_price && shape.requires_icebergs);
        assert!(!shape.requires_trigger_price);

        assert_eq!(BishinoOrderType::TakeProfit.shape().endpoint, "auth/market_trigger");
        assert_eq!(BishinoOrderType::StopLossLimit.shape().endpoint, "auth/limit_trigger");
        assert_eq!(BishinoOrderType::Trigger.shape().endpoint, "auth/stop");
        assert!(matches!(
            BishinoOrderType::from_unified(OrderType::StopMarket),
            Err(CcxtError::NotSupported { .. })
        ));
    }

    #[test]
    fn test_validation_order() {
        let none = OrderParams::default();
        match BishinoOrderType::Trigger.validate(None, &none) {
            Err(CcxtError::MissingOrderParameter { order_type, parameter }) => {
                assert_eq!(order_type, "TRIGGER");
                assert!(parameter.contains("price"));
                assert!(!parameter.contains("trigger"));
            },
            other => panic!("unexpected {other:?}"),
        }
        match BishinoOrderType::Trigger.validate(Some(dec!(1)), &none) {
            Err(CcxtError::MissingOrderParameter { parameter, .. }) => {
                assert!(parameter.contains("trigger_price"));
            },
            other => panic!("unexpected {other:?}"),
        }
        match BishinoOrderType::Iceberg.validate(Some(dec!(1)), &none) {
            Err(CcxtError::MissingOrderParameter { order_type, parameter }) => {
                assert_eq!(order_type, "ICEBERG");
                assert!(parameter.contains("icebergs"));
            },
            other => panic!("unexpected {other:?}"),
        }
        assert!(BishinoOrderType::Market.validate(None, &none).is_ok());
    }

    #[test]
    fn test_parse_order_average_from_fills() {
        let exchange = exchange();
        let market = seed_market(&exchange, "ETH_BTC", eth_btc());
        let raw = json!({
            "id": 42,
            "pair": "ETH_BTC",
            "time": 1700000000000i64,
            "price": "9",
            "qty_orig": "2",
            "qty_remaining": "0.5",
            "type": "LIMIT",
            "side": "BUY",
            "status": "ACTIVE",
            "fills": [
                {"id": 1, "time": 1700000000100i64, "price": "10", "qty": "1", "pair": "ETH_BTC"},
                {"id": 2, "time": 1700000000200i64, "price": "12", "qty": "0.5", "pair": "ETH_BTC"}
            ]
        });
        let order = exchange.parse_order(&raw, Some(&market)).unwrap();
        assert_eq!(order.id, "42");
        assert_eq!(order.symbol, "ETH/BTC");
        assert_eq!(order.average, Some(dec!(11)));
        assert_eq!(order.price, Some(dec!(11)));
        assert_eq!(order.cost, Some(dec!(18)));
        assert_eq!(order.filled, dec!(1.5));
        assert_eq!(order.remaining, Some(dec!(0.5)));
        assert_eq!(order.order_type, Some(OrderType::Limit));
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.trades.len(), 2);
    }

    #[test]
    fn test_parse_order_without_fills_keeps_price() {
        let raw = json!({
            "id": "7",
            "pair": "XRP_USDT",
            "time": 1700000000000i64,
            "price": "0.5",
            "qty_orig": "100",
            "qty_remaining": "100",
            "type": "limit",
            "side": "sell",
            "status": "SUSPENDED"
        });
        let order = exchange().parse_order(&raw, None).unwrap();
        assert_eq!(order.symbol, "XRP/USDT");
        assert_eq!(order.average, Some(dec!(0.5)));
        assert_eq!(order.filled, dec!(0));
        assert_eq!(order.status, OrderStatus::Unknown("SUSPENDED".into()));
    }

    #[test]
    fn test_parse_trade_fee_uses_common_code() {
        let raw = json!({
            "id": 9,
            "time": 1700000000000i64,
            "price": "2",
            "qty": "3",
            "pair": "KEY_USDT",
            "net_commission": "0.01",
            "net_commission_asset": "KEY"
        });
        let trade = exchange().parse_trade(&raw, None).unwrap();
        assert_eq!(trade.symbol, "KEY/USDT");
        assert_eq!(trade.cost, Some(dec!(6)));
        let fee = trade.fee.unwrap();
        assert_eq!(fee.cost, Some(dec!(0.01)));
        assert_eq!(fee.currency.as_deref(), Some("Bihu"));
    }

    #[test]
    fn test_parse_transaction_classification() {
        let exchange = exchange();
        let deposit = exchange
            .parse_transaction(&json!({
                "id": "BTC-0001",
                "asset": "BTC",
                "net": "0.99",
                "qty": "1",
                "address": "1BoatSLRHtKNngkdXEeobR76b53LETtpyT",
                "transaction": {"hash": "abc"},
                "time": 1700000000000i64,
                "status": "COMPLETED"
            }))
            .unwrap();
        assert!(deposit.is_deposit());
        assert_eq!(deposit.status, TransactionStatus::Ok);
        assert_eq!(deposit.txid.as_deref(), Some("abc"));
        assert_eq!(deposit.fee.unwrap().cost, Some(dec!(0.01)));

        let withdrawal = exchange
            .parse_transaction(&json!({
                "id": "88231",
                "asset": "PAI",
                "net": "5",
                "status": "REJECTED"
            }))
            .unwrap();
        assert!(withdrawal.is_withdrawal());
        assert_eq!(withdrawal.currency, "PCHAIN");
        assert_eq!(withdrawal.status, TransactionStatus::Failed);
    }

    #[test]
    fn test_calculate_fee_sell_in_quote() {
        let exchange = exchange();
        seed_market(
            &exchange,
            "ETH_BTC",
            json!({
                "base": "ETH",
                "quote": "BTC",
                "base_precision": 8,
                "quote_precision": 8,
                "status": "TRADING",
                "filters": []
            }),
        );
        let fee = exchange
            .calculate_fee(
                "ETH/BTC",
                OrderType::Limit,
                OrderSide::Sell,
                dec!(2),
                dec!(100),
                TakerOrMaker::Taker,
            )
            .unwrap();
        assert_eq!(fee.cost, dec!(1.5));
        assert_eq!(fee.currency, "BTC");
        assert_eq!(fee.rate, dec!(0.0075));

        let buy = exchange
            .calculate_fee(
                "ETH/BTC",
                OrderType::Limit,
                OrderSide::Buy,
                dec!(2),
                dec!(100),
                TakerOrMaker::Maker,
            )
            .unwrap();
        assert_eq!(buy.currency, "ETH");
        assert_eq!(buy.cost, dec!(0));
    }

    #[test]
    fn test_calculate_fee_buy_on_whole_lot_market() {
        let exchange = exchange();
        seed_market(
            &exchange,
            "DOGE_USDT",
            json!({
                "base": "DOGE",
                "quote": "USDT",
                "base_precision": 8,
                "quote_precision": 8,
                "status": "TRADING",
                "filters": [
                    {"filter_type": "LOT_SIZE", "min_qty": "1", "max_qty": "1000000", "tick_size": "1"}
                ]
            }),
        );
        // 0.0075 * 300 = 2.25, rounded to a whole lot
        let fee = exchange
            .calculate_fee(
                "DOGE/USDT",
                OrderType::Market,
                OrderSide::Buy,
                dec!(300),
                dec!(0.1),
                TakerOrMaker::Taker,
            )
            .unwrap();
        assert_eq!(fee.cost, dec!(2));
        assert_eq!(fee.currency, "DOGE");
    }

    #[test]
    fn test_calculate_fee_large_amount_with_18_places() {
        let exchange = exchange();
        seed_market(
            &exchange,
            "ETH_BTC",
            json!({
                "base": "ETH",
                "quote": "BTC",
                "base_precision": 18,
                "quote_precision": 18,
                "status": "TRADING",
                "filters": []
            }),
        );
        let fee = exchange
            .calculate_fee(
                "ETH/BTC",
                OrderType::Limit,
                OrderSide::Buy,
                dec!(100000000000),
                dec!(1),
                TakerOrMaker::Taker,
            )
            .unwrap();
        assert_eq!(fee.cost, dec!(750000000));
    }

    #[test]
    fn test_calculate_fee_unknown_symbol() {
        let err = exchange()
            .calculate_fee(
                "NOPE/BTC",
                OrderType::Market,
                OrderSide::Buy,
                dec!(1),
                dec!(1),
                TakerOrMaker::Taker,
            )
            .unwrap_err();
        assert!(matches!(err, CcxtError::BadSymbol { .. }));
    }

    #[test]
    fn test_check_address() {
        assert!(Bishino::check_address("0x52908400098527886E0F7030069857D2E4169EE7").is_ok());
        assert!(Bishino::check_address("").is_err());
        assert!(Bishino::check_address("aaaaaaa").is_err());
        assert!(Bishino::check_address("abc def").is_err());
    }

    #[test]
    fn test_common_currency_code() {
        assert_eq!(Bishino::common_currency_code("KEY"), "Bihu");
        assert_eq!(Bishino::common_currency_code("PAI"), "PCHAIN");
        assert_eq!(Bishino::common_currency_code("BTC"), "BTC");
        assert_eq!(Bishino::currency_id("Bihu"), "KEY");
    }

    #[test]
    fn test_sign_public_get() {
        let exchange = exchange();
        let request = exchange
            .sign(
                "depth",
                "public",
                "GET",
                &[("pair".into(), "ETH_BTC".into()), ("limit".into(), "5".into())],
            )
            .unwrap();
        assert_eq!(request.url, "https://api.bishino.com/depth?pair=ETH_BTC&limit=5");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_sign_private_requires_credentials() {
        let err = exchange()
            .sign("account_info", "private", "GET", &[])
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_sign_private_post() {
        let config = ExchangeConfig::new().with_credentials("my-key", "my-secret");
        let options = BishinoOptions {
            time_difference: 1000,
            ..Default::default()
        };
        let exchange = Bishino::with_options(config, options).unwrap();
        let request = exchange
            .sign("auth/cancel", "private", "POST", &[("id".into(), "77".into())])
            .unwrap();

        assert_eq!(request.url, "https://api.bishino.com/auth/cancel");
        let body = request.body.unwrap();
        assert!(body.starts_with("timestamp="));
        assert!(body.ends_with("&recv_window=5000&id=77"));
        let expected = hmac_sha256_base64("my-secret", &body).unwrap();
        assert_eq!(request.headers.get("x-signature"), Some(&expected));
        assert_eq!(request.headers.get("x-api-key").map(String::as_str), Some("my-key"));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_nonce_applies_time_difference() {
        let options = BishinoOptions {
            time_difference: 60_000,
            ..Default::default()
        };
        let exchange = Bishino::with_options(ExchangeConfig::new(), options).unwrap();
        let drift = now_ms() - exchange.nonce();
        assert!((59_000..=61_000).contains(&drift));
    }

    #[test]
    fn test_handle_errors_maps_body_codes() {
        let exchange = exchange();
        let response = |status: u16, body: &str| HttpResponse {
            status,
            url: "https://api.bishino.com/auth/limit".into(),
            body: body.into(),
        };

        assert!(matches!(
            exchange.handle_errors(&response(400, r#"{"code":2027,"msg":"Insufficient balance"}"#)),
            Err(CcxtError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            exchange.handle_errors(&response(400, r#"{"code":"3024","msg":"no"}"#)),
            Err(CcxtError::PermissionDenied { .. })
        ));
        assert!(matches!(
            exchange.handle_errors(&response(200, r#"{"code":4003,"msg":"slow down"}"#)),
            Err(CcxtError::DDoSProtection { .. })
        ));
        assert!(matches!(
            exchange.handle_errors(&response(500, "oops")),
            Err(CcxtError::ExchangeError { .. })
        ));
        assert!(matches!(
            exchange.handle_errors(&response(401, "{}")),
            Err(CcxtError::ExchangeError { .. })
        ));
        assert!(matches!(
            exchange.handle_errors(&response(429, "{}")),
            Err(CcxtError::RateLimitExceeded { .. })
        ));
        assert!(exchange.handle_errors(&response(200, r#"{"result":[]}"#)).is_ok());
    }

    #[test]
    fn test_book_level_shapes() {
        let depth: BishinoDepth = serde_json::from_value(json!({
            "bids": [["0.05", "1.5"]],
            "asks": [{"price": "0.06", "qty": "2"}]
        }))
        .unwrap();
        let bids: Vec<_> = depth.bids.into_iter().map(BishinoBookLevel::into_entry).collect();
        let asks: Vec<_> = depth.asks.into_iter().map(BishinoBookLevel::into_entry).collect();
        assert_eq!(bids[0].price, dec!(0.05));
        assert_eq!(asks[0].amount, dec!(2));
    }
}
