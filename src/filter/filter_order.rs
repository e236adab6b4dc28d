use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `"created_at desc, id"`; a missing direction means ascending
    pub fn validate_and_parse(order: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut tokens = part.split_whitespace();
            let Some(column) = tokens.next() else { continue };
            Filter::validate_identifier(column)?;
            let sort = Self::parse_direction(tokens.next().unwrap_or("asc"))?;
            out.push(FilterOrderInfo { column: column.to_string(), sort });
        }
        Ok(out)
    }

    fn parse_direction(dir: &str) -> Result<SortDirection, FilterError> {
        if dir.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if dir.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(FilterError::InvalidOperatorData(format!("Unknown sort direction: {}", dir)))
        }
    }

    /// Renders the `order` query parameter, e.g. `created_at.desc,id.asc`
    pub fn generate(infos: &[FilterOrderInfo]) -> Option<String> {
        if infos.is_empty() {
            return None;
        }
        Some(
            infos
                .iter()
                .map(|i| format!("{}.{}", i.column, i.sort.to_param()))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}
