// region:    --- Imports
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use executor::{Param, Row};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, Sqlite, Transaction};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

pub mod executor;

// endregion: --- Imports

// region:    --- Database Manager
pub struct DatabaseManager {
    pub pool: Arc<SqlitePool>,
}

impl DatabaseManager {
    /// 기존 풀로 데이터베이스 매니저 생성
    /// 외래 키 검사를 켤 수 없는 풀은 거부한다.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let manager = Self {
            pool: Arc::new(pool),
        };
        manager.enforce_integrity().await?;
        Ok(manager)
    }

    /// 설정으로 데이터베이스 연결 후 외래 키 검사 활성화
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        // 인메모리 DB는 연결마다 별도이므로 단일 연결을 유지
        let in_memory = config.database_url.contains(":memory:")
            || config.database_url.contains("mode=memory");

        // 데이터베이스 파일은 생성하지 않음
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::Config(format!("DATABASE_URL: {e}")))?
            .create_if_missing(in_memory)
            .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Database", e);
            StoreError::from(e)
        })?;

        let manager = Self::from_pool(pool).await?;
        info!(
            "{:<12} --> 데이터베이스 연결 성공: {}",
            "Database", config.database_url
        );
        Ok(manager)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 외래 키 검사 활성화 및 확인
    pub async fn enforce_integrity(&self) -> Result<()> {
        self.acquire().await.map(drop)
    }

    /// 외래 키 검사가 켜진 연결 획득
    /// 트랜잭션 안에서는 PRAGMA가 무시되므로 BEGIN 전에 호출해야 한다.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        let mut conn = self.pool.acquire().await?;
        enable_foreign_keys(&mut conn).await?;
        Ok(conn)
    }

    /// 트랜잭션 실행
    /// 성공 시 커밋, 실패 시 롤백 후 오류 반환
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(
            &'c mut Transaction<'_, Sqlite>,
        ) -> Pin<Box<dyn Future<Output = std::result::Result<R, E>> + Send + 'c>>,
        E: Into<StoreError>,
    {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;
        match f(&mut tx).await {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                // 롤백 실패는 기록만 하고 원래 오류를 반환
                if let Err(rollback_err) = tx.rollback().await {
                    error!("{:<12} --> 롤백 실패: {:?}", "Database", rollback_err);
                }
                Err(e.into())
            }
        }
    }

    /// 파라미터 바인딩 쿼리 실행 (행을 컬럼명-값 맵으로 반환)
    pub async fn query(&self, template: &str, params: &[Param]) -> Result<Vec<Row>> {
        let template = template.to_owned();
        let params = params.to_vec();
        self.transaction(|tx| {
            Box::pin(async move {
                executor::fetch_rows(&mut **tx, &template, &params)
                    .await
                    .map_err(StoreError::from)
            })
        })
        .await
    }
}

async fn enable_foreign_keys(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&mut *conn)
        .await?;
    if enabled != 1 {
        error!("{:<12} --> 외래 키 검사가 비활성화되어 있습니다", "Database");
        return Err(StoreError::IntegrityDisabled);
    }
    Ok(())
}
// endregion: --- Database Manager
