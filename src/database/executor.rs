// region:    --- Imports
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row as SqlxRow, Sqlite, SqliteConnection, TypeInfo, ValueRef};

// endregion: --- Imports

// region:    --- Params / Rows
/// 컬럼명 -> 값 매핑 한 행
pub type Row = Map<String, Value>;

/// 바인딩 파라미터
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Integer(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Real(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<NaiveDateTime> for Param {
    fn from(v: NaiveDateTime) -> Self {
        Param::Timestamp(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Param::Null)
    }
}

// endregion: --- Params / Rows

// region:    --- Executor
type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_param<'q>(query: SqliteQuery<'q>, param: &Param) -> SqliteQuery<'q> {
    match param {
        Param::Null => query.bind(None::<String>),
        Param::Integer(v) => query.bind(*v),
        Param::Real(v) => query.bind(*v),
        Param::Text(v) => query.bind(v.clone()),
        Param::Timestamp(v) => query.bind(*v),
    }
}

/// 파라미터 바인딩 후 쿼리 실행
/// 결과가 없으면 빈 Vec 반환
pub async fn fetch_rows(
    conn: &mut SqliteConnection,
    template: &str,
    params: &[Param],
) -> Result<Vec<Row>, sqlx::Error> {
    let query = params
        .iter()
        .fold(sqlx::query(template), |query, param| bind_param(query, param));

    let rows = query.fetch_all(conn).await?;
    rows.iter().map(row_to_map).collect()
}

/// 저장 타입(storage class)에 따라 JSON 값으로 변환
fn row_to_map(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut map = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_string();
            match storage.as_str() {
                "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(idx)?),
                "REAL" => Number::from_f64(row.try_get::<f64, _>(idx)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(idx)?),
                _ => Value::from(row.try_get::<String, _>(idx)?),
            }
        };
        map.insert(column.name().to_string(), value);
    }
    Ok(map)
}

// endregion: --- Executor
