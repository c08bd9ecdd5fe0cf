// region:    --- Imports
use sqlx::error::ErrorKind as DbErrorKind;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Store Error
pub type Result<T> = std::result::Result<T, StoreError>;

/// 저장소 오류 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 잘못된 입력 (저장소 접근 전 거부)
    Validation,
    NotFound,
    /// 비즈니스 규칙에 의한 거부 (낮은 입찰가, 시계 불일치)
    Rejected,
    Constraint,
    Query,
    Config,
}

/// 저장소 오류
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("잘못된 입력: {0}")]
    Validation(String),

    #[error("상품이 존재하지 않습니다: {0}")]
    ItemNotFound(i64),

    #[error("사용자가 존재하지 않습니다: {0}")]
    UserNotFound(String),

    #[error("현재 시간이 설정되어 있지 않습니다")]
    ClockNotSet,

    #[error("입찰 금액({amount})이 현재 가격({current})보다 높아야 합니다")]
    BidTooLow { amount: f64, current: f64 },

    #[error("현재 시간 갱신 실패: 일치하는 행 {matched}개")]
    ClockMismatch { matched: u64 },

    #[error("제약 조건 위반: {0}")]
    Constraint(String),

    #[error("쿼리 오류: {0}")]
    Query(#[source] sqlx::Error),

    #[error("외래 키 검사가 비활성화되어 있습니다")]
    IntegrityDisabled,

    #[error("설정 오류: {0}")]
    Config(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::ItemNotFound(_) | StoreError::UserNotFound(_) | StoreError::ClockNotSet => {
                ErrorKind::NotFound
            }
            StoreError::BidTooLow { .. } | StoreError::ClockMismatch { .. } => ErrorKind::Rejected,
            StoreError::Constraint(_) => ErrorKind::Constraint,
            StoreError::Query(_) => ErrorKind::Query,
            StoreError::IntegrityDisabled | StoreError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                DbErrorKind::ForeignKeyViolation
                | DbErrorKind::UniqueViolation
                | DbErrorKind::NotNullViolation
                | DbErrorKind::CheckViolation => {
                    return StoreError::Constraint(db_err.message().to_string())
                }
                _ => {}
            }
        }
        StoreError::Query(err)
    }
}

// endregion: --- Store Error

// endregion: --- Tests
