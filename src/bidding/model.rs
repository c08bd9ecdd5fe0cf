use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    #[sqlx(rename = "ItemID")]
    pub item_id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Seller_UserID")]
    pub seller_user_id: String,
    #[sqlx(rename = "Currently")]
    pub currently: f64,
    #[sqlx(rename = "Buy_Price")]
    pub buy_price: Option<f64>,
    #[sqlx(rename = "Started")]
    pub started: NaiveDateTime,
    #[sqlx(rename = "Ends")]
    pub ends: NaiveDateTime,
    #[sqlx(rename = "Description")]
    pub description: Option<String>,
}

// 검색 결과 모델 (Name, ItemID, Currently)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemSummary {
    #[sqlx(rename = "ItemID")]
    pub item_id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Currently")]
    pub currently: f64,
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    #[sqlx(rename = "ItemID")]
    pub item_id: i64,
    #[sqlx(rename = "UserID")]
    pub user_id: String,
    #[sqlx(rename = "Amount")]
    pub amount: f64,
    #[sqlx(rename = "Time")]
    pub time: NaiveDateTime,
}
