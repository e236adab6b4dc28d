use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Embed, FilterOrderInfo, FilterWhereInfo, QueryParams};

/// A row query against one provider table: select list, nested embeds,
/// equality conditions, ordering and a row limit.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    embeds: Vec<Embed>,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_identifier(&table_name)
            .map_err(|_| FilterError::InvalidTableName(format!("Invalid table name format: {}", table_name)))?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            embeds: vec![],
            conditions: vec![],
            order_data: vec![],
            limit: None,
        })
    }

    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Result<Self, FilterError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            if column != "*" {
                Self::validate_identifier(column)?;
            }
        }
        self.select_columns = columns;
        Ok(self)
    }

    /// Join `table` through `foreign_key` on this table, e.g. a subscription's package
    pub fn embed(mut self, table: &str, foreign_key: &str, columns: &[&str]) -> Result<Self, FilterError> {
        Self::validate_identifier(table)
            .map_err(|_| FilterError::InvalidTableName(format!("Invalid embedded table: {}", table)))?;
        Self::validate_identifier(foreign_key)?;
        for column in columns {
            Self::validate_identifier(column)?;
        }
        self.embeds.push(Embed {
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        Ok(self)
    }

    pub fn where_clause(mut self, conditions: Value) -> Result<Self, FilterError> {
        self.conditions.extend(FilterWhere::validate_and_parse(&conditions)?);
        Ok(self)
    }

    pub fn order(mut self, order_spec: &str) -> Result<Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order_spec)?;
        Ok(self)
    }

    pub fn limit(mut self, limit: i32) -> Result<Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn embeds(&self) -> &[Embed] {
        &self.embeds
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.conditions
    }

    pub fn order_by(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn limit_value(&self) -> Option<i32> {
        self.limit
    }

    /// Query string parameters for `GET /rest/v1/{table}`
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = vec![("select".to_string(), self.build_select_clause())];
        params.extend(FilterWhere::generate(&self.conditions));
        if let Some(order) = FilterOrder::generate(&self.order_data) {
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    pub(crate) fn validate_identifier(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
        }
        Ok(())
    }

    fn build_select_clause(&self) -> String {
        let mut parts: Vec<String> = if self.select_columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.select_columns.clone()
        };
        for embed in &self.embeds {
            parts.push(format!("{}:{}({})", embed.table, embed.foreign_key, embed.columns.join(",")));
        }
        parts.join(",")
    }
}
