// region:    --- Imports
use super::queries;
use crate::auction::status::AuctionStatus;
use crate::bidding::model::{Bid, Item, ItemSummary};
use crate::database::DatabaseManager;
use crate::error::{Result, StoreError};
use chrono::NaiveDateTime;
use tracing::info;

// endregion: --- Imports

// region:    --- Input Validation
fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{field} 값이 비어 있습니다")));
    }
    Ok(value)
}

fn require_price(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(StoreError::validation(format!(
            "{field} 값이 숫자가 아닙니다: {value}"
        )));
    }
    Ok(value)
}

/// LIKE 패턴의 특수 문자(%, _, \)를 이스케이프
pub(crate) fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// endregion: --- Input Validation

// region:    --- Query Handlers

/// 상품 조회
pub async fn get_item(db_manager: &DatabaseManager, item_id: i64) -> Result<Item> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", item_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Item>(queries::GET_ITEM)
                    .bind(item_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await?
        .ok_or(StoreError::ItemNotFound(item_id))
}

/// 상품 현재 가격 조회
pub async fn get_item_current_price(db_manager: &DatabaseManager, item_id: i64) -> Result<f64> {
    info!("{:<12} --> 상품 현재 가격 조회 id: {}", "Query", item_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, f64>(queries::GET_ITEM_CURRENT_PRICE)
                    .bind(item_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await?
        .ok_or(StoreError::ItemNotFound(item_id))
}

/// 사용자 조회 (존재 여부 확인, 사용자 ID 반환)
pub async fn get_user(db_manager: &DatabaseManager, user_id: &str) -> Result<String> {
    let user_id = require_text("UserID", user_id)?.to_owned();
    info!("{:<12} --> 사용자 조회 id: {}", "Query", user_id);
    let bound = user_id.clone();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, String>(queries::GET_USER)
                    .bind(bound)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await?
        .ok_or(StoreError::UserNotFound(user_id))
}

/// 현재 시간 조회
pub async fn get_current_time(db_manager: &DatabaseManager) -> Result<NaiveDateTime> {
    info!("{:<12} --> 현재 시간 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, NaiveDateTime>(queries::GET_CURRENT_TIME)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await?
        .ok_or(StoreError::ClockNotSet)
}

/// 요약 검색 공통 처리
async fn search(
    db_manager: &DatabaseManager,
    sql: &'static str,
    param: Option<SearchParam>,
) -> Result<Vec<ItemSummary>> {
    let items = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let query = sqlx::query_as::<_, ItemSummary>(sql);
                let query = match param {
                    Some(SearchParam::Id(v)) => query.bind(v),
                    Some(SearchParam::Price(v)) => query.bind(v),
                    Some(SearchParam::Text(v)) => query.bind(v),
                    None => query,
                };
                query.fetch_all(&mut **tx).await
            })
        })
        .await?;
    info!("{:<12} --> 검색 결과: {}건", "Query", items.len());
    Ok(items)
}

enum SearchParam {
    Id(i64),
    Price(f64),
    Text(String),
}

/// 상품 ID로 검색
pub async fn search_by_item_id(
    db_manager: &DatabaseManager,
    item_id: i64,
) -> Result<Vec<ItemSummary>> {
    info!("{:<12} --> 상품 ID 검색: {}", "Query", item_id);
    search(db_manager, queries::SEARCH_BY_ITEM_ID, Some(SearchParam::Id(item_id))).await
}

/// 판매자로 검색
pub async fn search_by_seller(
    db_manager: &DatabaseManager,
    seller_id: &str,
) -> Result<Vec<ItemSummary>> {
    let seller_id = require_text("Seller_UserID", seller_id)?;
    info!("{:<12} --> 판매자 검색: {}", "Query", seller_id);
    search(
        db_manager,
        queries::SEARCH_BY_SELLER,
        Some(SearchParam::Text(seller_id.to_owned())),
    )
    .await
}

/// 최소 가격으로 검색
pub async fn search_by_min_price(
    db_manager: &DatabaseManager,
    min_price: f64,
) -> Result<Vec<ItemSummary>> {
    let min_price = require_price("min_price", min_price)?;
    info!("{:<12} --> 최소 가격 검색: {}", "Query", min_price);
    search(db_manager, queries::SEARCH_BY_MIN_PRICE, Some(SearchParam::Price(min_price))).await
}

/// 최대 가격으로 검색
pub async fn search_by_max_price(
    db_manager: &DatabaseManager,
    max_price: f64,
) -> Result<Vec<ItemSummary>> {
    let max_price = require_price("max_price", max_price)?;
    info!("{:<12} --> 최대 가격 검색: {}", "Query", max_price);
    search(db_manager, queries::SEARCH_BY_MAX_PRICE, Some(SearchParam::Price(max_price))).await
}

/// 경매 상태로 검색
pub async fn search_by_status(
    db_manager: &DatabaseManager,
    status: AuctionStatus,
) -> Result<Vec<ItemSummary>> {
    info!("{:<12} --> 경매 상태 검색: {}", "Query", status);
    let sql = match status {
        AuctionStatus::Open => queries::SEARCH_OPEN,
        AuctionStatus::Closed => queries::SEARCH_CLOSED,
        AuctionStatus::NotStarted => queries::SEARCH_NOT_STARTED,
    };
    search(db_manager, sql, None).await
}

/// 카테고리로 검색
pub async fn search_by_category(
    db_manager: &DatabaseManager,
    category: &str,
) -> Result<Vec<ItemSummary>> {
    let category = require_text("Category", category)?;
    info!("{:<12} --> 카테고리 검색: {}", "Query", category);
    search(
        db_manager,
        queries::SEARCH_BY_CATEGORY,
        Some(SearchParam::Text(escape_like(category))),
    )
    .await
}

/// 설명으로 검색
pub async fn search_by_description(
    db_manager: &DatabaseManager,
    description: &str,
) -> Result<Vec<ItemSummary>> {
    let description = require_text("Description", description)?;
    info!("{:<12} --> 설명 검색: {}", "Query", description);
    search(
        db_manager,
        queries::SEARCH_BY_DESCRIPTION,
        Some(SearchParam::Text(escape_like(description))),
    )
    .await
}

/// 상품 입찰 이력 조회 (최신순)
pub async fn get_item_bids(db_manager: &DatabaseManager, item_id: i64) -> Result<Vec<Bid>> {
    info!("{:<12} --> 상품 입찰 조회 id: {}", "Query", item_id);
    Ok(db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bid>(queries::GET_ITEM_BIDS)
                    .bind(item_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await?)
}

/// 상품 카테고리 조회
pub async fn get_item_categories(
    db_manager: &DatabaseManager,
    item_id: i64,
) -> Result<Vec<String>> {
    info!("{:<12} --> 상품 카테고리 조회 id: {}", "Query", item_id);
    Ok(db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, String>(queries::GET_ITEM_CATEGORIES)
                    .bind(item_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await?)
}

// endregion: --- Query Handlers

// endregion: --- Tests
