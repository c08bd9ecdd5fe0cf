use auctionbase::auction::clock::ClockMatchPolicy;
use auctionbase::auction::status::AuctionStatus;
use auctionbase::bidding::commands::{BidPricePolicy, PlaceBidCommand};
use auctionbase::bidding::model::ItemSummary;
use auctionbase::database::executor::Param;
use auctionbase::{AuctionStore, ErrorKind, StoreConfig, StoreError};
use chrono::NaiveDateTime;
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 인메모리 저장소 설정 (테스트 스키마 및 데이터 적재)
async fn setup() -> AuctionStore {
    setup_with(StoreConfig::new("sqlite::memory:")).await
}

async fn setup_with(config: StoreConfig) -> AuctionStore {
    init_tracing();
    let store = AuctionStore::connect(&config)
        .await
        .expect("저장소 연결 실패");
    sqlx::raw_sql(include_str!("fixtures/schema.sql"))
        .execute(store.db_manager().pool())
        .await
        .expect("테스트 스키마 적재 실패");
    store
}

fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn ids(items: &[ItemSummary]) -> Vec<i64> {
    items.iter().map(|item| item.item_id).collect()
}

fn bid(item_id: i64, user_id: &str, amount: f64) -> PlaceBidCommand {
    PlaceBidCommand {
        item_id,
        user_id: user_id.to_string(),
        amount,
    }
}

async fn bid_count(store: &AuctionStore) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM Bids")
        .fetch_one(store.db_manager().pool())
        .await
        .unwrap()
}

// region:    --- Connection

/// 외래 키 검사 활성화 테스트
#[tokio::test]
async fn test_foreign_keys_enforced() {
    let store = setup().await;

    let rows = store.query("PRAGMA foreign_keys", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("foreign_keys"), Some(&json!(1)));

    // 존재하지 않는 상품에 대한 입찰은 제약 조건 위반
    let err = sqlx::query("INSERT INTO Bids (ItemID, UserID, Amount, Time) VALUES (?, ?, ?, ?)")
        .bind(999_i64)
        .bind("bob")
        .bind(20.0_f64)
        .bind(ts("2001-12-10 12:00:00"))
        .execute(store.db_manager().pool())
        .await
        .unwrap_err();
    let err = StoreError::from(err);
    assert_eq!(err.kind(), ErrorKind::Constraint);
}

/// 파라미터 바인딩 쿼리 테스트
#[tokio::test]
async fn test_query_returns_row_mappings() {
    let store = setup().await;

    let rows = store
        .query(
            "SELECT ItemID, Name, Buy_Price FROM Items WHERE Seller_UserID = ? ORDER BY ItemID",
            &[Param::from("alice")],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("ItemID"), Some(&json!(1)));
    assert_eq!(rows[0].get("Name"), Some(&json!("Antique Lamp")));
    assert_eq!(rows[0].get("Buy_Price"), Some(&json!(100.0)));
    assert_eq!(rows[1].get("ItemID"), Some(&json!(3)));
    assert_eq!(rows[1].get("Buy_Price"), Some(&json!(null)));

    // 결과가 없으면 빈 Vec
    let rows = store
        .query(
            "SELECT * FROM Items WHERE Seller_UserID = ?",
            &[Param::from("alice' OR '1'='1")],
        )
        .await
        .unwrap();
    assert!(rows.is_empty());

    // 잘못된 SQL은 Query 오류
    let err = store.query("SELEC * FROM Items", &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
}

/// 외래 키 검사가 꺼진 풀을 주입해도 검사가 적용되는지 테스트
#[tokio::test]
async fn test_injected_pool_enforces_foreign_keys() {
    init_tracing();
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true)
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    let store = AuctionStore::from_pool(pool).await.unwrap();
    sqlx::raw_sql(include_str!("fixtures/schema.sql"))
        .execute(store.db_manager().pool())
        .await
        .unwrap();

    let rows = store.query("PRAGMA foreign_keys", &[]).await.unwrap();
    assert_eq!(rows[0].get("foreign_keys"), Some(&json!(1)));

    // 풀 연결에서 검사를 다시 꺼도 트랜잭션 시작 전에 다시 켜짐
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(store.db_manager().pool())
        .await
        .unwrap();
    let err = store
        .query(
            "INSERT INTO Bids (ItemID, UserID, Amount, Time) VALUES (?, ?, ?, ?)",
            &[
                Param::from(999_i64),
                Param::from("ghost"),
                Param::from(20.0_f64),
                Param::from(ts("2001-12-10 12:00:00")),
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Constraint);
    assert_eq!(bid_count(&store).await, 0);
}

/// 존재하지 않는 데이터베이스 파일은 생성하지 않음
#[tokio::test]
async fn test_missing_database_file_is_not_created() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auction.db");

    let config = StoreConfig::new(format!("sqlite://{}", path.display()));
    let err = match AuctionStore::connect(&config).await {
        Ok(_) => panic!("존재하지 않는 파일에 연결됨"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ErrorKind::Query);
    assert!(!path.exists());
}

/// 롤백이 실패해도 원래 오류를 반환
#[tokio::test]
async fn test_rollback_failure_keeps_original_error() {
    let store = setup().await;

    let result: Result<(), StoreError> = store
        .db_manager()
        .transaction(|tx| {
            Box::pin(async move {
                // 트랜잭션을 먼저 끝내서 이후 롤백이 실패하도록 함
                sqlx::query("ROLLBACK").execute(&mut **tx).await?;
                Err(StoreError::ClockNotSet)
            })
        })
        .await;
    assert!(matches!(result, Err(StoreError::ClockNotSet)));
}

// endregion: --- Connection

// region:    --- Lookups

/// 상품 조회 테스트
#[tokio::test]
async fn test_item_by_id() {
    let store = setup().await;

    let item = store.item_by_id(1).await.unwrap();
    assert_eq!(item.name, "Antique Lamp");
    assert_eq!(item.seller_user_id, "alice");
    assert_eq!(item.currently, 10.0);
    assert_eq!(item.buy_price, Some(100.0));
    assert_eq!(item.started, ts("2001-12-01 00:00:00"));
    assert_eq!(item.ends, ts("2001-12-20 00:00:00"));

    let item = store.item_by_id(5).await.unwrap();
    assert_eq!(item.buy_price, None);
    assert_eq!(item.description, None);

    // 존재하지 않는 상품은 NotFound
    let err = store.item_by_id(999).await.unwrap_err();
    assert!(matches!(err, StoreError::ItemNotFound(999)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// 현재 가격 / 사용자 / 현재 시간 조회 테스트
#[tokio::test]
async fn test_scalar_lookups() {
    let store = setup().await;

    assert_eq!(store.current_price(2).await.unwrap(), 250.0);
    assert!(matches!(
        store.current_price(999).await,
        Err(StoreError::ItemNotFound(999))
    ));

    assert_eq!(store.user("alice").await.unwrap(), "alice");
    assert!(matches!(
        store.user("nobody").await,
        Err(StoreError::UserNotFound(_))
    ));
    assert!(matches!(store.user("").await, Err(StoreError::Validation(_))));

    assert_eq!(store.current_time().await.unwrap(), ts("2001-12-10 12:00:00"));

    sqlx::query("DELETE FROM CurrentTime")
        .execute(store.db_manager().pool())
        .await
        .unwrap();
    assert!(matches!(
        store.current_time().await,
        Err(StoreError::ClockNotSet)
    ));
}

/// 상품 입찰 이력 / 카테고리 조회 테스트
#[tokio::test]
async fn test_item_bids_and_categories() {
    let store = setup().await;

    assert!(store.bids_for_item(1).await.unwrap().is_empty());
    assert_eq!(
        store.categories_for_item(2).await.unwrap(),
        vec!["Art", "Fine Art", "Paintings"]
    );
    assert!(store.categories_for_item(999).await.unwrap().is_empty());
}

// endregion: --- Lookups

// region:    --- Searches

/// 판매자 / 가격 / ID 검색 테스트
#[tokio::test]
async fn test_search_by_seller_and_price() {
    let store = setup().await;

    assert_eq!(ids(&store.search_by_seller("alice").await.unwrap()), vec![1, 3]);
    assert!(store
        .search_by_seller("alice' OR '1'='1")
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        store.search_by_seller("").await,
        Err(StoreError::Validation(_))
    ));

    assert_eq!(ids(&store.search_by_min_price(40.0).await.unwrap()), vec![2, 4]);
    assert_eq!(ids(&store.search_by_max_price(10.0).await.unwrap()), vec![1, 3, 5]);
    assert!(matches!(
        store.search_by_min_price(f64::NAN).await,
        Err(StoreError::Validation(_))
    ));

    let found = store.search_by_item_id(2).await.unwrap();
    assert_eq!(
        found,
        vec![ItemSummary {
            item_id: 2,
            name: "Oil Painting".to_string(),
            currently: 250.0,
        }]
    );
    assert!(store.search_by_item_id(999).await.unwrap().is_empty());
}

/// 경매 상태 검색 테스트
#[tokio::test]
async fn test_search_by_status() {
    let store = setup().await;

    // 시작 시간 = 종료 시간 = 현재 시간인 5번은 진행 중
    assert_eq!(
        ids(&store.search_by_status(AuctionStatus::Open).await.unwrap()),
        vec![1, 2, 5]
    );
    // 기간 만료(3) 또는 즉시 구매가 도달(2)
    assert_eq!(
        ids(&store.search_by_status(AuctionStatus::Closed).await.unwrap()),
        vec![2, 3]
    );
    assert_eq!(
        ids(&store.search_by_status(AuctionStatus::NotStarted).await.unwrap()),
        vec![4]
    );

    assert!(matches!(
        "finished".parse::<AuctionStatus>(),
        Err(StoreError::Validation(_))
    ));

    // 현재 시간 변경 후 상태 재계산
    store
        .advance_clock(ts("2001-12-10 12:00:00"), ts("2001-12-16 00:00:00"))
        .await
        .unwrap();
    assert_eq!(
        ids(&store.search_by_status(AuctionStatus::Open).await.unwrap()),
        vec![1, 2, 4]
    );
    assert_eq!(
        ids(&store.search_by_status(AuctionStatus::Closed).await.unwrap()),
        vec![2, 3, 5]
    );
    assert!(store
        .search_by_status(AuctionStatus::NotStarted)
        .await
        .unwrap()
        .is_empty());
}

/// 카테고리 / 설명 검색 테스트 (대소문자 무시)
#[tokio::test]
async fn test_search_by_category_and_description() {
    let store = setup().await;

    let lower = store.search_by_category("art").await.unwrap();
    let upper = store.search_by_category("ART").await.unwrap();
    assert_eq!(lower, upper);
    assert_eq!(ids(&lower), vec![2, 3, 4]);

    assert_eq!(ids(&store.search_by_category("antiq").await.unwrap()), vec![1, 4]);
    assert_eq!(ids(&store.search_by_category(" & ").await.unwrap()), vec![1, 5]);
    assert!(matches!(
        store.search_by_category("").await,
        Err(StoreError::Validation(_))
    ));

    assert_eq!(ids(&store.search_by_description("vase").await.unwrap()), vec![4]);
    assert_eq!(ids(&store.search_by_description("VASE").await.unwrap()), vec![4]);
    // 와일드카드 문자는 문자 그대로 비교
    assert_eq!(ids(&store.search_by_description("%").await.unwrap()), vec![1]);
    assert_eq!(ids(&store.search_by_description("_").await.unwrap()), vec![4]);
    assert_eq!(ids(&store.search_by_description("it's").await.unwrap()), vec![2]);
    assert!(store
        .search_by_description("no such text")
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        store.search_by_description("").await,
        Err(StoreError::Validation(_))
    ));
}

// endregion: --- Searches

// region:    --- Bids

/// 입찰 테스트
#[tokio::test]
async fn test_place_bid() {
    let store = setup().await;

    let placed = store.place_bid(bid(1, "bob", 15.0)).await.unwrap();
    assert_eq!(placed.item_id, 1);
    assert_eq!(placed.user_id, "bob");
    assert_eq!(placed.amount, 15.0);
    assert_eq!(placed.time, store.current_time().await.unwrap());

    let history = store.bids_for_item(1).await.unwrap();
    assert_eq!(history, vec![placed]);
    assert_eq!(bid_count(&store).await, 1);

    // 기본 정책에서는 Currently를 변경하지 않음
    assert_eq!(store.current_price(1).await.unwrap(), 10.0);
}

/// 입찰 거부 테스트 (모든 거부 경로에서 데이터 변경 없음)
#[tokio::test]
async fn test_place_bid_rejections_leave_bids_unchanged() {
    let store = setup().await;

    // 현재 가격과 같은 금액은 거부
    let err = store.place_bid(bid(1, "bob", 10.0)).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::BidTooLow {
            amount,
            current
        } if amount == 10.0 && current == 10.0
    ));
    assert_eq!(err.kind(), ErrorKind::Rejected);

    assert!(matches!(
        store.place_bid(bid(1, "bob", 9.99)).await,
        Err(StoreError::BidTooLow { .. })
    ));
    assert!(matches!(
        store.place_bid(bid(999, "bob", 50.0)).await,
        Err(StoreError::ItemNotFound(999))
    ));
    assert!(matches!(
        store.place_bid(bid(1, "mallory", 50.0)).await,
        Err(StoreError::UserNotFound(_))
    ));
    assert!(matches!(
        store.place_bid(bid(1, "", 50.0)).await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.place_bid(bid(1, "bob", f64::INFINITY)).await,
        Err(StoreError::Validation(_))
    ));

    assert_eq!(bid_count(&store).await, 0);
    assert_eq!(store.current_price(1).await.unwrap(), 10.0);
}

/// 같은 시간에 같은 사용자의 중복 입찰은 제약 조건 위반 후 롤백
#[tokio::test]
async fn test_place_bid_constraint_violation_rolls_back() {
    let store = setup_with(
        StoreConfig::new("sqlite::memory:").with_bid_price_policy(BidPricePolicy::RaiseCurrent),
    )
    .await;

    store.place_bid(bid(1, "bob", 15.0)).await.unwrap();
    let err = store.place_bid(bid(1, "bob", 16.0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Constraint);

    assert_eq!(bid_count(&store).await, 1);
    assert_eq!(store.current_price(1).await.unwrap(), 15.0);
}

/// 입찰 시 Currently 갱신 정책 테스트
#[tokio::test]
async fn test_place_bid_raises_current_price() {
    let store = setup_with(
        StoreConfig::new("sqlite::memory:").with_bid_price_policy(BidPricePolicy::RaiseCurrent),
    )
    .await;

    store.place_bid(bid(1, "bob", 20.0)).await.unwrap();
    assert_eq!(store.current_price(1).await.unwrap(), 20.0);

    // 갱신된 가격 기준으로 검증
    assert!(matches!(
        store.place_bid(bid(1, "carol", 18.0)).await,
        Err(StoreError::BidTooLow { current, .. }) if current == 20.0
    ));
    store.place_bid(bid(1, "carol", 21.5)).await.unwrap();
    assert_eq!(store.current_price(1).await.unwrap(), 21.5);
    assert_eq!(store.bids_for_item(1).await.unwrap().len(), 2);
}

// endregion: --- Bids

// region:    --- Clock

/// 현재 시간 변경 테스트
#[tokio::test]
async fn test_advance_clock() {
    let store = setup().await;
    let old = ts("2001-12-10 12:00:00");
    let new = ts("2001-12-11 08:30:00");

    assert_eq!(store.advance_clock(old, new).await.unwrap(), 1);
    assert_eq!(store.current_time().await.unwrap(), new);

    // 이전 값이 일치하지 않으면 변경 없음
    let err = store.advance_clock(old, new).await.unwrap_err();
    assert!(matches!(err, StoreError::ClockMismatch { matched: 0 }));
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(store.current_time().await.unwrap(), new);

    // 새 시간으로 입찰하면 해당 시간으로 기록
    let placed = store.place_bid(bid(1, "carol", 11.0)).await.unwrap();
    assert_eq!(placed.time, new);
}

/// 여러 행이 일치하는 경우 정책별 동작 테스트
#[tokio::test]
async fn test_advance_clock_multiple_rows() {
    let old = ts("2001-12-10 12:00:00");
    let new = ts("2001-12-12 00:00:00");

    // ExactlyOne: 두 행이 일치하면 롤백
    let store = setup().await;
    insert_duplicate_clock_row(&store, old).await;
    let err = store.advance_clock(old, new).await.unwrap_err();
    assert!(matches!(err, StoreError::ClockMismatch { matched: 2 }));
    assert_eq!(clock_rows(&store, old).await, 2);
    assert_eq!(clock_rows(&store, new).await, 0);

    // All: 일치하는 모든 행 갱신
    let store = setup_with(
        StoreConfig::new("sqlite::memory:").with_clock_match_policy(ClockMatchPolicy::All),
    )
    .await;
    insert_duplicate_clock_row(&store, old).await;
    assert_eq!(store.advance_clock(old, new).await.unwrap(), 2);
    assert_eq!(clock_rows(&store, old).await, 0);
    assert_eq!(clock_rows(&store, new).await, 2);

    // All 정책도 일치하는 행이 없으면 실패
    assert!(matches!(
        store.advance_clock(old, new).await,
        Err(StoreError::ClockMismatch { matched: 0 })
    ));
}

async fn insert_duplicate_clock_row(store: &AuctionStore, time: NaiveDateTime) {
    sqlx::query("INSERT INTO CurrentTime (Time) VALUES (?)")
        .bind(time)
        .execute(store.db_manager().pool())
        .await
        .unwrap();
}

async fn clock_rows(store: &AuctionStore, time: NaiveDateTime) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM CurrentTime WHERE Time = ?")
        .bind(time)
        .fetch_one(store.db_manager().pool())
        .await
        .unwrap()
}

// endregion: --- Clock
