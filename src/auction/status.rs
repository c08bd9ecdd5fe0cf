use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 경매 상태 (CurrentTime 기준)
/// - Open: Started <= 현재 시간 <= Ends
/// - Closed: 현재 시간 > Ends 또는 Currently >= Buy_Price
/// - NotStarted: 현재 시간 < Started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "close")]
    Closed,
    #[serde(rename = "notStarted")]
    NotStarted,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Open => "open",
            AuctionStatus::Closed => "close",
            AuctionStatus::NotStarted => "notStarted",
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(AuctionStatus::Open),
            "close" => Ok(AuctionStatus::Closed),
            "notStarted" => Ok(AuctionStatus::NotStarted),
            other => Err(StoreError::validation(format!(
                "알 수 없는 경매 상태: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
