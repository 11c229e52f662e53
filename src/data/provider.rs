use {
    crate::{
        config::{BINANCE, DF},
        data::{
            WeightBudget,
            kline::{parse_klines, parse_ticker},
            rate_limiter::USED_WEIGHT_HEADER,
        },
        domain::{Candle, MarketType, Ticker, Timeframe, exchange_symbol},
    },
    anyhow::{Context, Result, bail},
    async_trait::async_trait,
    serde_json::Value,
    std::time::Duration,
};

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent `limit` candles, oldest first.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
        market: MarketType,
    ) -> Result<Vec<Candle>>;

    async fn fetch_ticker(&self, symbol: &str, market: MarketType) -> Result<Ticker>;

    /// Cheap round trip proving the venue is reachable.
    async fn check_connection(&self, market: MarketType) -> Result<()>;
}

/// Public Binance REST endpoints for spot and USD-M futures. No keys needed.
pub struct BinanceProvider {
    client: reqwest::Client,
    limiter: WeightBudget,
}

impl BinanceProvider {
    pub fn new(limiter: WeightBudget) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(BINANCE.client.timeout_ms))
            .build()
            .context("Failed to build Binance HTTP client")?;
        Ok(Self { client, limiter })
    }

    fn base_url(market: MarketType) -> &'static str {
        match market {
            MarketType::Futures => BINANCE.endpoints.futures_base_url,
            MarketType::Spot => BINANCE.endpoints.spot_base_url,
        }
    }

    async fn get_json(
        &self,
        market: MarketType,
        path: &str,
        query: &[(&str, String)],
        weight: u32,
        context: &str,
    ) -> Result<Value> {
        let waited = self.limiter.acquire(market, weight, context).await;
        if !waited.is_zero() {
            log::debug!("{} held {:.1}s for request weight", context, waited.as_secs_f64());
        }

        let url = format!("{}{}", Self::base_url(market), path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("{} request failed for {}", market, context))?;

        let server_used = response
            .headers()
            .get(USED_WEIGHT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        if let Some(used) = server_used {
            self.limiter.observe_used(market, used).await;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} {} returned HTTP {}: {}", market, path, status, body);
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("{} {} returned invalid JSON", market, path))
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
        market: MarketType,
    ) -> Result<Vec<Candle>> {
        let context = format!("{} {}", symbol, timeframe);
        let query = [
            ("symbol", exchange_symbol(symbol)),
            ("interval", timeframe.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        let payload = self
            .get_json(
                market,
                "/klines",
                &query,
                BINANCE.limits.kline_call_weight,
                &context,
            )
            .await?;
        let candles =
            parse_klines(&payload).with_context(|| format!("Bad kline payload for {}", context))?;

        if DF.log_fetches {
            log::info!(
                "📥 {} candles for {} [{}]",
                candles.len(),
                context,
                market
            );
        }
        Ok(candles)
    }

    async fn fetch_ticker(&self, symbol: &str, market: MarketType) -> Result<Ticker> {
        let query = [("symbol", exchange_symbol(symbol))];
        let payload = self
            .get_json(
                market,
                "/ticker/24hr",
                &query,
                BINANCE.limits.ticker_call_weight,
                symbol,
            )
            .await?;
        parse_ticker(&payload).with_context(|| format!("Bad ticker payload for {}", symbol))
    }

    async fn check_connection(&self, market: MarketType) -> Result<()> {
        self.get_json(market, "/time", &[], 1, "server time")
            .await
            .map(|_| ())
    }
}
