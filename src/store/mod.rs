/// 경매 저장소 파사드
/// 조회는 query::handlers, 변경은 bidding::commands / auction::clock 에 위임한다.
// region:    --- Imports
use crate::auction::clock::{self, AdvanceClockCommand, ClockMatchPolicy};
use crate::auction::status::AuctionStatus;
use crate::bidding::commands::{self, BidPricePolicy, PlaceBidCommand};
use crate::bidding::model::{Bid, Item, ItemSummary};
use crate::config::StoreConfig;
use crate::database::executor::{Param, Row};
use crate::database::DatabaseManager;
use crate::error::Result;
use crate::query::handlers;
use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

pub mod compat;

// endregion: --- Imports

// region:    --- Auction Store
#[derive(Clone)]
pub struct AuctionStore {
    db_manager: Arc<DatabaseManager>,
    bid_price_policy: BidPricePolicy,
    clock_match_policy: ClockMatchPolicy,
}

impl AuctionStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self {
            db_manager,
            bid_price_policy: BidPricePolicy::default(),
            clock_match_policy: ClockMatchPolicy::default(),
        }
    }

    /// 외부에서 만든 풀로 저장소 생성 (외래 키 검사 확인 포함)
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let db_manager = Arc::new(DatabaseManager::from_pool(pool).await?);
        Ok(Self::new(db_manager))
    }

    /// 설정으로 연결 후 저장소 생성
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db_manager = Arc::new(DatabaseManager::connect(config).await?);
        Ok(Self::new(db_manager)
            .with_bid_price_policy(config.bid_price_policy)
            .with_clock_match_policy(config.clock_match_policy))
    }

    pub fn with_bid_price_policy(mut self, policy: BidPricePolicy) -> Self {
        self.bid_price_policy = policy;
        self
    }

    pub fn with_clock_match_policy(mut self, policy: ClockMatchPolicy) -> Self {
        self.clock_match_policy = policy;
        self
    }

    pub fn db_manager(&self) -> Arc<DatabaseManager> {
        Arc::clone(&self.db_manager)
    }

    pub fn compat(&self) -> compat::CompatStore<'_> {
        compat::CompatStore::new(self)
    }

    // region:    --- Reads
    pub async fn item_by_id(&self, item_id: i64) -> Result<Item> {
        handlers::get_item(&self.db_manager, item_id).await
    }

    pub async fn current_price(&self, item_id: i64) -> Result<f64> {
        handlers::get_item_current_price(&self.db_manager, item_id).await
    }

    pub async fn user(&self, user_id: &str) -> Result<String> {
        handlers::get_user(&self.db_manager, user_id).await
    }

    pub async fn current_time(&self) -> Result<NaiveDateTime> {
        handlers::get_current_time(&self.db_manager).await
    }

    pub async fn search_by_item_id(&self, item_id: i64) -> Result<Vec<ItemSummary>> {
        handlers::search_by_item_id(&self.db_manager, item_id).await
    }

    pub async fn search_by_seller(&self, seller_id: &str) -> Result<Vec<ItemSummary>> {
        handlers::search_by_seller(&self.db_manager, seller_id).await
    }

    pub async fn search_by_min_price(&self, min_price: f64) -> Result<Vec<ItemSummary>> {
        handlers::search_by_min_price(&self.db_manager, min_price).await
    }

    pub async fn search_by_max_price(&self, max_price: f64) -> Result<Vec<ItemSummary>> {
        handlers::search_by_max_price(&self.db_manager, max_price).await
    }

    pub async fn search_by_status(&self, status: AuctionStatus) -> Result<Vec<ItemSummary>> {
        handlers::search_by_status(&self.db_manager, status).await
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<ItemSummary>> {
        handlers::search_by_category(&self.db_manager, category).await
    }

    pub async fn search_by_description(&self, description: &str) -> Result<Vec<ItemSummary>> {
        handlers::search_by_description(&self.db_manager, description).await
    }

    pub async fn bids_for_item(&self, item_id: i64) -> Result<Vec<Bid>> {
        handlers::get_item_bids(&self.db_manager, item_id).await
    }

    pub async fn categories_for_item(&self, item_id: i64) -> Result<Vec<String>> {
        handlers::get_item_categories(&self.db_manager, item_id).await
    }

    /// 임의 쿼리 실행 (파라미터 바인딩 필수)
    pub async fn query(&self, template: &str, params: &[Param]) -> Result<Vec<Row>> {
        self.db_manager.query(template, params).await
    }
    // endregion: --- Reads

    // region:    --- Mutations
    pub async fn place_bid(&self, cmd: PlaceBidCommand) -> Result<Bid> {
        commands::handle_place_bid(&self.db_manager, cmd, self.bid_price_policy).await
    }

    pub async fn advance_clock(
        &self,
        old_time: NaiveDateTime,
        new_time: NaiveDateTime,
    ) -> Result<u64> {
        clock::handle_advance_clock(
            &self.db_manager,
            AdvanceClockCommand { old_time, new_time },
            self.clock_match_policy,
        )
        .await
    }
    // endregion: --- Mutations
}
// endregion: --- Auction Store
