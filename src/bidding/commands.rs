/// 입찰 관련 커맨드 처리
/// 1. 입찰
// region:    --- Imports
use super::model::Bid;
use crate::database::DatabaseManager;
use crate::error::{Result, StoreError};
use crate::query::queries;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Connection, SqliteConnection};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub item_id: i64,
    pub user_id: String,
    pub amount: f64,
}

/// 입찰 성공 후 상품 현재 가격(Currently) 처리 정책
/// 스키마 트리거가 Currently를 갱신하는 경우 LeaveCurrent를 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidPricePolicy {
    #[default]
    LeaveCurrent,
    RaiseCurrent,
}

/// 1. 입찰
/// 상품/사용자 확인, 현재 가격 검증, 입찰 등록을 하나의 트랜잭션에서 처리
pub async fn handle_place_bid(
    db_manager: &DatabaseManager,
    cmd: PlaceBidCommand,
    policy: BidPricePolicy,
) -> Result<Bid> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    if cmd.user_id.trim().is_empty() {
        return Err(StoreError::validation("UserID 값이 비어 있습니다"));
    }
    if !cmd.amount.is_finite() {
        return Err(StoreError::validation(format!(
            "입찰 금액이 숫자가 아닙니다: {}",
            cmd.amount
        )));
    }

    // 외래 키 검사가 켜진 연결에서 트랜잭션 시작
    let mut conn = db_manager.acquire().await?;
    let mut tx = conn.begin().await?;

    match place_bid(&mut *tx, &cmd, policy).await {
        Ok(bid) => {
            // 트랜잭션 커밋
            tx.commit().await?;
            info!(
                "{:<12} --> 입찰 성공: 상품 {} 금액 {}",
                "Command", bid.item_id, bid.amount
            );
            Ok(bid)
        }
        Err(e) => {
            // 롤백 실패는 기록만 하고 원래 오류를 반환
            if let Err(rollback_err) = tx.rollback().await {
                error!("{:<12} --> 롤백 실패: {:?}", "Command", rollback_err);
            }
            warn!("{:<12} --> 입찰 실패: {}", "Command", e);
            Err(e)
        }
    }
}

async fn place_bid(
    conn: &mut SqliteConnection,
    cmd: &PlaceBidCommand,
    policy: BidPricePolicy,
) -> Result<Bid> {
    // 현재 시간 조회
    let now = sqlx::query_scalar::<_, NaiveDateTime>(queries::GET_CURRENT_TIME)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::ClockNotSet)?;

    // 상품 존재 여부 및 현재 가격 확인
    let current_price = sqlx::query_scalar::<_, f64>(queries::GET_ITEM_CURRENT_PRICE)
        .bind(cmd.item_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::ItemNotFound(cmd.item_id))?;

    // 사용자 존재 여부 확인
    sqlx::query_scalar::<_, String>(queries::GET_USER)
        .bind(&cmd.user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StoreError::UserNotFound(cmd.user_id.clone()))?;

    // 입찰 금액은 현재 가격보다 높아야 함
    if cmd.amount <= current_price {
        return Err(StoreError::BidTooLow {
            amount: cmd.amount,
            current: current_price,
        });
    }

    // 입찰 기록 추가
    sqlx::query(queries::INSERT_BID)
        .bind(cmd.item_id)
        .bind(&cmd.user_id)
        .bind(cmd.amount)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    if policy == BidPricePolicy::RaiseCurrent {
        sqlx::query(queries::UPDATE_ITEM_CURRENT_PRICE)
            .bind(cmd.amount)
            .bind(cmd.item_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(Bid {
        item_id: cmd.item_id,
        user_id: cmd.user_id.clone(),
        amount: cmd.amount,
        time: now,
    })
}

// endregion: --- Commands
