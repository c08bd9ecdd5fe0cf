// region:    --- Imports
use crate::auction::clock::ClockMatchPolicy;
use crate::bidding::commands::BidPricePolicy;
use crate::error::{Result, StoreError};

// endregion: --- Imports

// region:    --- Store Config
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 저장소 설정
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bid_price_policy: BidPricePolicy,
    pub clock_match_policy: ClockMatchPolicy,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bid_price_policy: BidPricePolicy::default(),
            clock_match_policy: ClockMatchPolicy::default(),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_bid_price_policy(mut self, policy: BidPricePolicy) -> Self {
        self.bid_price_policy = policy;
        self
    }

    pub fn with_clock_match_policy(mut self, policy: ClockMatchPolicy) -> Self {
        self.clock_match_policy = policy;
        self
    }

    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StoreError::Config("DATABASE_URL must be set".to_string()))?;

        let mut config = Self::new(database_url);

        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            let max = raw.trim().parse::<u32>().map_err(|_| {
                StoreError::Config(format!("DATABASE_MAX_CONNECTIONS 값이 잘못되었습니다: {raw}"))
            })?;
            if max == 0 {
                return Err(StoreError::Config(
                    "DATABASE_MAX_CONNECTIONS는 1 이상이어야 합니다".to_string(),
                ));
            }
            config.max_connections = max;
        }

        if let Some(raw) = lookup("AUCTION_BID_RAISES_CURRENT") {
            config.bid_price_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => BidPricePolicy::RaiseCurrent,
                "false" | "0" | "no" => BidPricePolicy::LeaveCurrent,
                _ => {
                    return Err(StoreError::Config(format!(
                        "AUCTION_BID_RAISES_CURRENT 값이 잘못되었습니다: {raw}"
                    )))
                }
            };
        }

        if let Some(raw) = lookup("AUCTION_CLOCK_MATCH") {
            config.clock_match_policy = raw.trim().parse()?;
        }

        Ok(config)
    }
}

// endregion: --- Store Config

// endregion: --- Tests
