/// 상품 조회
pub const GET_ITEM: &str = r#"
    SELECT ItemID, Name, Seller_UserID, Currently, Buy_Price, Started, Ends, Description
    FROM Items
    WHERE ItemID = ?
"#;

/// 상품 현재 가격 조회
pub const GET_ITEM_CURRENT_PRICE: &str = "SELECT Currently FROM Items WHERE ItemID = ?";

/// 사용자 조회
pub const GET_USER: &str = "SELECT UserID FROM Users WHERE UserID = ?";

/// 현재 시간 조회
pub const GET_CURRENT_TIME: &str = "SELECT Time FROM CurrentTime LIMIT 1";

/// 상품 ID로 검색
pub const SEARCH_BY_ITEM_ID: &str =
    "SELECT ItemID, Name, Currently FROM Items WHERE ItemID = ? ORDER BY ItemID";

/// 판매자로 검색
pub const SEARCH_BY_SELLER: &str =
    "SELECT ItemID, Name, Currently FROM Items WHERE Seller_UserID = ? ORDER BY ItemID";

/// 최소 가격으로 검색
pub const SEARCH_BY_MIN_PRICE: &str =
    "SELECT ItemID, Name, Currently FROM Items WHERE Currently >= ? ORDER BY ItemID";

/// 최대 가격으로 검색
pub const SEARCH_BY_MAX_PRICE: &str =
    "SELECT ItemID, Name, Currently FROM Items WHERE Currently <= ? ORDER BY ItemID";

/// 진행 중인 경매 검색 (Started <= 현재 시간 <= Ends)
pub const SEARCH_OPEN: &str = r#"
    SELECT DISTINCT Items.ItemID AS ItemID, Items.Name AS Name, Items.Currently AS Currently
    FROM Items, CurrentTime
    WHERE CurrentTime.Time >= Items.Started AND CurrentTime.Time <= Items.Ends
    ORDER BY Items.ItemID
"#;

/// 종료된 경매 검색 (현재 시간 > Ends 또는 즉시 구매가 도달)
pub const SEARCH_CLOSED: &str = r#"
    SELECT DISTINCT Items.ItemID AS ItemID, Items.Name AS Name, Items.Currently AS Currently
    FROM Items, CurrentTime
    WHERE CurrentTime.Time > Items.Ends OR Items.Currently >= Items.Buy_Price
    ORDER BY Items.ItemID
"#;

/// 시작 전 경매 검색 (현재 시간 < Started)
pub const SEARCH_NOT_STARTED: &str = r#"
    SELECT DISTINCT Items.ItemID AS ItemID, Items.Name AS Name, Items.Currently AS Currently
    FROM Items, CurrentTime
    WHERE CurrentTime.Time < Items.Started
    ORDER BY Items.ItemID
"#;

/// 카테고리로 검색 (대소문자 무시 부분 일치)
pub const SEARCH_BY_CATEGORY: &str = r#"
    SELECT DISTINCT Items.ItemID AS ItemID, Items.Name AS Name, Items.Currently AS Currently
    FROM Items
    JOIN Categories ON Categories.ItemID = Items.ItemID
    WHERE LOWER(Categories.Category) LIKE '%' || LOWER(?) || '%' ESCAPE '\'
    ORDER BY Items.ItemID
"#;

/// 설명으로 검색 (대소문자 무시 부분 일치)
pub const SEARCH_BY_DESCRIPTION: &str = r#"
    SELECT ItemID, Name, Currently
    FROM Items
    WHERE LOWER(Description) LIKE '%' || LOWER(?) || '%' ESCAPE '\'
    ORDER BY ItemID
"#;

/// 상품 입찰 이력 조회
pub const GET_ITEM_BIDS: &str = r#"
    SELECT ItemID, UserID, Amount, Time
    FROM Bids
    WHERE ItemID = ?
    ORDER BY Time DESC, Amount DESC
"#;

/// 상품 카테고리 조회
pub const GET_ITEM_CATEGORIES: &str =
    "SELECT Category FROM Categories WHERE ItemID = ? ORDER BY Category";

/// 입찰 등록
pub const INSERT_BID: &str = "INSERT INTO Bids (ItemID, UserID, Amount, Time) VALUES (?, ?, ?, ?)";

/// 상품 현재 가격 갱신
pub const UPDATE_ITEM_CURRENT_PRICE: &str = "UPDATE Items SET Currently = ? WHERE ItemID = ?";

/// 현재 시간 변경
pub const UPDATE_CURRENT_TIME: &str = "UPDATE CurrentTime SET Time = ? WHERE Time = ?";
