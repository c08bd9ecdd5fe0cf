/// 경매 시계(CurrentTime) 관련 커맨드 처리
/// 실제 시간이 아닌 CurrentTime 테이블의 값이 "현재"가 된다.
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::{Result, StoreError};
use crate::query::queries;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::str::FromStr;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Clock Match Policy
/// 이전 시간 값과 일치하는 행 수에 대한 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMatchPolicy {
    /// 정확히 한 행만 일치해야 함
    #[default]
    ExactlyOne,
    /// 일치하는 모든 행 갱신 (최소 한 행)
    All,
}

impl ClockMatchPolicy {
    pub fn accepts(&self, matched: u64) -> bool {
        match self {
            ClockMatchPolicy::ExactlyOne => matched == 1,
            ClockMatchPolicy::All => matched >= 1,
        }
    }
}

impl FromStr for ClockMatchPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" | "exactly_one" => Ok(ClockMatchPolicy::ExactlyOne),
            "all" => Ok(ClockMatchPolicy::All),
            other => Err(StoreError::Config(format!(
                "알 수 없는 시계 일치 정책: {other}"
            ))),
        }
    }
}

// endregion: --- Clock Match Policy

// region:    --- Commands
/// 현재 시간 변경 명령
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct AdvanceClockCommand {
    pub old_time: NaiveDateTime,
    pub new_time: NaiveDateTime,
}

/// 현재 시간 변경
/// 갱신된 행 수가 정책에 맞지 않으면 롤백
pub async fn handle_advance_clock(
    db_manager: &DatabaseManager,
    cmd: AdvanceClockCommand,
    policy: ClockMatchPolicy,
) -> Result<u64> {
    info!("{:<12} --> 현재 시간 변경 요청: {:?}", "Clock", cmd);
    let result = db_manager
        .transaction(|tx| Box::pin(async move { update_clock(&mut **tx, cmd, policy).await }))
        .await;

    match &result {
        Ok(matched) => info!(
            "{:<12} --> 현재 시간 변경 완료: {} ({}행)",
            "Clock", cmd.new_time, matched
        ),
        Err(e) => warn!("{:<12} --> 현재 시간 변경 실패: {}", "Clock", e),
    }
    result
}

async fn update_clock(
    conn: &mut SqliteConnection,
    cmd: AdvanceClockCommand,
    policy: ClockMatchPolicy,
) -> Result<u64> {
    let matched = sqlx::query(queries::UPDATE_CURRENT_TIME)
        .bind(cmd.new_time)
        .bind(cmd.old_time)
        .execute(conn)
        .await?
        .rows_affected();

    if !policy.accepts(matched) {
        return Err(StoreError::ClockMismatch { matched });
    }
    Ok(matched)
}

// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_accepts_single_match_only() {
        let policy = ClockMatchPolicy::ExactlyOne;
        assert!(!policy.accepts(0));
        assert!(policy.accepts(1));
        assert!(!policy.accepts(2));
    }

    #[test]
    fn all_accepts_any_positive_match() {
        let policy = ClockMatchPolicy::All;
        assert!(!policy.accepts(0));
        assert!(policy.accepts(1));
        assert!(policy.accepts(3));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("exact".parse::<ClockMatchPolicy>().unwrap(), ClockMatchPolicy::ExactlyOne);
        assert_eq!("ALL".parse::<ClockMatchPolicy>().unwrap(), ClockMatchPolicy::All);
        assert!("first".parse::<ClockMatchPolicy>().is_err());
    }
}
// endregion: --- Tests
