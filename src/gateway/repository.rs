use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{BackendGateway, GatewayError};
use crate::filter::Filter;

/// Typed access to one provider table
pub struct Table<T> {
    table_name: String,
    gateway: Arc<dyn BackendGateway>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Table<T>
where
    T: DeserializeOwned,
{
    pub fn new(table_name: impl Into<String>, gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            table_name: table_name.into(),
            gateway,
            _phantom: PhantomData,
        }
    }

    /// Start a query against this table
    pub fn query(&self) -> Result<Filter, GatewayError> {
        Ok(Filter::new(&self.table_name)?)
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, GatewayError> {
        let rows = self.gateway.select(&filter).await?;
        Self::decode_rows(rows)
    }

    pub async fn select_one(&self, filter: Filter) -> Result<Option<T>, GatewayError> {
        let filter = filter.limit(1)?;
        Ok(self.select_any(filter).await?.into_iter().next())
    }

    /// Single-row fetch where absence is an error
    pub async fn select_404(&self, filter: Filter) -> Result<T, GatewayError> {
        self.select_one(filter)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("No matching row in {}", self.table_name)))
    }

    pub async fn insert<R: Serialize>(&self, row: &R) -> Result<T, GatewayError> {
        let payload = serde_json::to_value(row)?;
        let rows = self.gateway.insert(&self.table_name, payload).await?;
        Self::decode_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(format!("Insert into {} returned no row", self.table_name)))
    }

    fn decode_rows(rows: Vec<Value>) -> Result<Vec<T>, GatewayError> {
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(GatewayError::from))
            .collect()
    }
}
