use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterWhereInfo, QueryParams};

pub struct FilterWhere;

impl FilterWhere {
    /// Parses `{ "user_id": "...", "is_active": true }`. Every entry is an
    /// equality condition on a scalar value; all conditions are AND-ed.
    pub fn validate_and_parse(where_data: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(vec![]),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        };

        let mut conditions = Vec::new();
        for (column, value) in obj {
            if column.starts_with('$') {
                return Err(FilterError::UnsupportedOperator(column.clone()));
            }
            Filter::validate_identifier(column)?;

            match value {
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "{} expects a scalar value, got {}",
                        column, value
                    )))
                }
                _ => conditions.push(FilterWhereInfo { column: column.clone(), data: value.clone() }),
            }
        }
        Ok(conditions)
    }

    /// Renders each condition as `(column, "eq.value")`
    pub fn generate(conditions: &[FilterWhereInfo]) -> QueryParams {
        conditions
            .iter()
            .map(|c| {
                let rendered = match &c.data {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (c.column.clone(), format!("eq.{}", rendered))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_become_equality() {
        let conditions = FilterWhere::validate_and_parse(&json!({ "is_active": true, "name": "Freemium" })).unwrap();
        let params = FilterWhere::generate(&conditions);
        assert!(params.contains(&("is_active".to_string(), "eq.true".to_string())));
        assert!(params.contains(&("name".to_string(), "eq.Freemium".to_string())));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(FilterWhere::validate_and_parse(&json!("raw sql")).is_err());
        assert!(FilterWhere::validate_and_parse(&json!({ "id": { "$gt": 1 } })).is_err());
        assert!(FilterWhere::validate_and_parse(&json!({ "id": ["a", "b"] })).is_err());
        assert!(FilterWhere::validate_and_parse(&json!({ "deleted_at": null })).is_err());
        assert!(FilterWhere::validate_and_parse(&json!({ "$or": 1 })).is_err());
        assert!(FilterWhere::validate_and_parse(&json!({ "bad-column": 1 })).is_err());
    }
}
