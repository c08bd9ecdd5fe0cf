/// 호환 모드
/// 요청 계층에서 받은 문자열 입력을 그대로 받아 실패 시 None / false 로 반환한다.
/// 오류 내용은 반환하지 않고 로그로만 남긴다.
// region:    --- Imports
use super::AuctionStore;
use crate::auction::status::AuctionStatus;
use crate::bidding::commands::PlaceBidCommand;
use crate::bidding::model::{Item, ItemSummary};
use crate::error::{ErrorKind, Result};
use chrono::NaiveDateTime;
use tracing::{error, warn};

// endregion: --- Imports

/// CurrentTime 및 경매 시간 문자열 형식
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

fn parse_item_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(raw: &str) -> Option<&str> {
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// 오류를 로그로 남기고 None 으로 변환
fn degrade<T>(op: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            match e.kind() {
                ErrorKind::Query | ErrorKind::Config => {
                    error!("{:<12} --> {} 실패: {}", "Compat", op, e)
                }
                _ => warn!("{:<12} --> {} 실패: {}", "Compat", op, e),
            }
            None
        }
    }
}

// region:    --- Compat Store
pub struct CompatStore<'a> {
    store: &'a AuctionStore,
}

impl<'a> CompatStore<'a> {
    pub fn new(store: &'a AuctionStore) -> Self {
        Self { store }
    }

    pub async fn get_item_by_id(&self, item_id: &str) -> Option<Item> {
        let item_id = parse_item_id(item_id)?;
        degrade("getItemById", self.store.item_by_id(item_id).await)
    }

    pub async fn get_current_price(&self, item_id: &str) -> Option<f64> {
        let item_id = parse_item_id(item_id)?;
        degrade("getCurrentPrice", self.store.current_price(item_id).await)
    }

    pub async fn get_user(&self, user_id: &str) -> Option<String> {
        let user_id = non_empty(user_id)?;
        degrade("getUser", self.store.user(user_id).await)
    }

    pub async fn get_time(&self) -> Option<NaiveDateTime> {
        degrade("getTime", self.store.current_time().await)
    }

    pub async fn get_by_id(&self, item_id: &str) -> Option<Vec<ItemSummary>> {
        let item_id = parse_item_id(non_empty(item_id)?)?;
        degrade("getByID", self.store.search_by_item_id(item_id).await)
    }

    pub async fn get_by_user_id(&self, user_id: &str) -> Option<Vec<ItemSummary>> {
        let user_id = non_empty(user_id)?;
        degrade("getByUserId", self.store.search_by_seller(user_id).await)
    }

    pub async fn get_by_min_price(&self, min_price: &str) -> Option<Vec<ItemSummary>> {
        let min_price = parse_price(non_empty(min_price)?)?;
        degrade("getByMinPrice", self.store.search_by_min_price(min_price).await)
    }

    pub async fn get_by_max_price(&self, max_price: &str) -> Option<Vec<ItemSummary>> {
        let max_price = parse_price(non_empty(max_price)?)?;
        degrade("getByMaxPrice", self.store.search_by_max_price(max_price).await)
    }

    /// 알 수 없는 상태 문자열은 None
    pub async fn get_by_status(&self, status: &str) -> Option<Vec<ItemSummary>> {
        let status = degrade("getByStatus", status.parse::<AuctionStatus>())?;
        degrade("getByStatus", self.store.search_by_status(status).await)
    }

    pub async fn get_by_category(&self, category: &str) -> Option<Vec<ItemSummary>> {
        let category = non_empty(category)?;
        degrade("getByCategory", self.store.search_by_category(category).await)
    }

    pub async fn get_by_description(&self, description: &str) -> Option<Vec<ItemSummary>> {
        let description = non_empty(description)?;
        degrade(
            "getByDescription",
            self.store.search_by_description(description).await,
        )
    }

    pub async fn add_bid(&self, item_id: &str, user_id: &str, price: &str) -> bool {
        let (Some(item_id), Some(amount)) = (parse_item_id(item_id), parse_price(price)) else {
            warn!(
                "{:<12} --> addBid 입력 오류: item_id={:?}, price={:?}",
                "Compat", item_id, price
            );
            return false;
        };
        let cmd = PlaceBidCommand {
            item_id,
            user_id: user_id.to_string(),
            amount,
        };
        degrade("addBid", self.store.place_bid(cmd).await).is_some()
    }

    pub async fn update_curr_time(&self, old_time: &str, new_time: &str) -> bool {
        let (Some(old_time), Some(new_time)) = (parse_time(old_time), parse_time(new_time)) else {
            warn!(
                "{:<12} --> updateCurrTime 입력 오류: {:?} -> {:?}",
                "Compat", old_time, new_time
            );
            return false;
        };
        degrade(
            "updateCurrTime",
            self.store.advance_clock(old_time, new_time).await,
        )
        .is_some()
    }
}
// endregion: --- Compat Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_inputs() {
        assert_eq!(parse_item_id(" 1043374545 "), Some(1043374545));
        assert_eq!(parse_item_id("abc"), None);
        assert_eq!(parse_price("12.50"), Some(12.5));
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(
            parse_time("2001-12-20 00:00:01").map(|t| t.format(TIME_FORMAT).to_string()),
            Some("2001-12-20 00:00:01".to_string())
        );
        assert_eq!(parse_time("2001-12-20"), None);
    }
}
// endregion: --- Tests
