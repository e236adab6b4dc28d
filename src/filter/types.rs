/// An equality condition, rendered as `column=eq.value`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// A related table joined through a foreign key column, rendered as
/// `table:foreign_key(col, ...)` inside the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub table: String,
    pub foreign_key: String,
    pub columns: Vec<String>,
}

pub type QueryParams = Vec<(String, String)>;
