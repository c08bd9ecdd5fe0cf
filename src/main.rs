// region:    --- Imports
use auctionbase::store::compat::parse_time;
use auctionbase::{AuctionStore, StoreConfig};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
/// 사용법: auctionbase [새 현재 시간 "YYYY-MM-DD HH:MM:SS"]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = StoreConfig::from_env()?;

    // 저장소 연결 (외래 키 검사 포함)
    let store = match AuctionStore::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    let now = store.current_time().await?;
    info!("{:<12} --> 현재 시간: {}", "Main", now);

    // 새 시간이 주어지면 현재 시간 변경
    if let Some(raw) = std::env::args().nth(1) {
        let new_time = parse_time(&raw).ok_or_else(|| format!("잘못된 시간 형식: {raw}"))?;
        let updated = store.advance_clock(now, new_time).await?;
        info!(
            "{:<12} --> 현재 시간 변경: {} -> {} ({}행)",
            "Main", now, new_time, updated
        );
    }

    Ok(())
}
// endregion: --- Main
