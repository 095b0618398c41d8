use itertools::Itertools;

use crate::model::{DateLevel, Filter, FilterKind};

/// Identity of the dimension a filter constrains.
///
/// Two filters with equal compare ids replace each other on merge. Date-level filters
/// append their granularity (read from the filter JAQL), cascading filters join the ids
/// of their levels with `-`, and exclusion keeps the id of the excluded filter.
pub fn get_filter_compare_id(filter: &Filter) -> String {
    match &filter.kind {
        FilterKind::Cascading { filters } => filters.iter().map(get_filter_compare_id).join("-"),
        FilterKind::Exclude { filter } => get_filter_compare_id(filter),
        _ => {
            let granularity = filter.jaql()["jaql"]["level"]
                .as_str()
                .and_then(DateLevel::from_jaql_level)
                .map(|level| level.to_string())
                .unwrap_or_default();
            format!("{}{}", filter.attribute.expression, granularity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, NumericOperator, RelationsFilter};

    #[test]
    fn test_plain_filter_uses_attribute_expression() {
        let members = Filter::members(Attribute::new("Gender", "[Commerce.Gender]"), ["Male"]);
        let other = Filter::members(Attribute::new("Gender", "[Commerce.Gender]"), ["Female"]);

        assert_eq!(get_filter_compare_id(&members), "[Commerce.Gender]");
        assert_eq!(members.compare_id(), other.compare_id());
    }

    #[test]
    fn test_date_level_filter_appends_granularity() {
        let months = Filter::date_range(
            Attribute::date_level("Date", "[Commerce.Date]", DateLevel::Months),
            Some("2024-01"),
            None,
        );
        let years = Filter::date_range(
            Attribute::date_level("Date", "[Commerce.Date]", DateLevel::Years),
            Some("2024"),
            None,
        );

        assert_eq!(get_filter_compare_id(&months), "[Commerce.Date]Months");
        assert_ne!(get_filter_compare_id(&months), get_filter_compare_id(&years));
    }

    #[test]
    fn test_cascading_filter_joins_levels() {
        let cascading = Filter::cascading(vec![
            Filter::members(Attribute::new("Country", "[Geo.Country]"), ["US"]),
            Filter::members(Attribute::new("City", "[Geo.City]"), ["Boston"]),
        ]);

        assert_eq!(get_filter_compare_id(&cascading), "[Geo.Country]-[Geo.City]");
    }

    #[test]
    fn test_exclude_keeps_inner_dimension() {
        let cost = Attribute::numeric("Cost", "[Commerce.Cost]");
        let inner = Filter::numeric(cost, NumericOperator::LessThan, 10.0);
        let excluded = Filter::exclude(inner.clone());

        assert_eq!(get_filter_compare_id(&excluded), get_filter_compare_id(&inner));
    }
}
