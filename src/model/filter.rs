use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::{generate_id, Id, RelationOperator, RelationsFilter};

/// Date granularity of a datetime attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DateLevel {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
}

impl DateLevel {
    /// Level name as written in the `level` key of a JAQL element
    pub fn jaql_level(&self) -> &'static str {
        match self {
            DateLevel::Years => "years",
            DateLevel::Quarters => "quarters",
            DateLevel::Months => "months",
            DateLevel::Weeks => "weeks",
            DateLevel::Days => "days",
            DateLevel::Hours => "hours",
            DateLevel::Minutes => "minutes",
        }
    }

    pub fn from_jaql_level(level: &str) -> Option<Self> {
        match level.to_lowercase().as_str() {
            "years" => Some(DateLevel::Years),
            "quarters" => Some(DateLevel::Quarters),
            "months" => Some(DateLevel::Months),
            "weeks" => Some(DateLevel::Weeks),
            "days" => Some(DateLevel::Days),
            "hours" => Some(DateLevel::Hours),
            "minutes" => Some(DateLevel::Minutes),
            _ => None,
        }
    }
}

impl std::fmt::Display for DateLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DateLevel::Years => write!(f, "Years"),
            DateLevel::Quarters => write!(f, "Quarters"),
            DateLevel::Months => write!(f, "Months"),
            DateLevel::Weeks => write!(f, "Weeks"),
            DateLevel::Days => write!(f, "Days"),
            DateLevel::Hours => write!(f, "Hours"),
            DateLevel::Minutes => write!(f, "Minutes"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    Text,
    Numeric,
    Datetime,
}

/// Dimensional attribute a filter constrains
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    /// Model expression, e.g. `[Commerce.Gender]`
    pub expression: String,
    #[serde(default)]
    pub data_type: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<DateLevel>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            data_type: AttributeType::Text,
            granularity: None,
        }
    }

    pub fn numeric(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            data_type: AttributeType::Numeric,
            ..Self::new(name, expression)
        }
    }

    pub fn date_level(
        name: impl Into<String>,
        expression: impl Into<String>,
        granularity: DateLevel,
    ) -> Self {
        Self {
            data_type: AttributeType::Datetime,
            granularity: Some(granularity),
            ..Self::new(name, expression)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default = "generate_id")]
    pub guid: Id,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub locked: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            guid: generate_id(),
            disabled: false,
            locked: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericOperator {
    Equals,
    DoesntEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl NumericOperator {
    fn jaql_key(&self) -> &'static str {
        match self {
            NumericOperator::Equals => "equals",
            NumericOperator::DoesntEqual => "doesntEqual",
            NumericOperator::GreaterThan => "fromNotEqual",
            NumericOperator::GreaterThanOrEqual => "from",
            NumericOperator::LessThan => "toNotEqual",
            NumericOperator::LessThanOrEqual => "to",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOperator {
    Equals,
    DoesntEqual,
    Contains,
    DoesntContain,
    StartsWith,
    EndsWith,
}

impl TextOperator {
    fn jaql_key(&self) -> &'static str {
        match self {
            TextOperator::Equals => "equals",
            TextOperator::DoesntEqual => "doesntEqual",
            TextOperator::Contains => "contains",
            TextOperator::DoesntContain => "doesntContain",
            TextOperator::StartsWith => "startsWith",
            TextOperator::EndsWith => "endsWith",
        }
    }
}

/// Filter variants. The discriminator is written as `filterType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filterType", rename_all = "camelCase")]
pub enum FilterKind {
    Members {
        members: Vec<String>,
    },
    Exclude {
        filter: Box<Filter>,
    },
    Numeric {
        operator: NumericOperator,
        value: f64,
    },
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    Text {
        operator: TextOperator,
        value: String,
    },
    /// Ordered per-level filters acting as one logical filter
    Cascading {
        filters: Vec<Filter>,
    },
    LogicalAttribute {
        operator: RelationOperator,
        filters: Vec<Filter>,
    },
}

/// Filter value object. Treated as an immutable snapshot by the relations engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub config: FilterConfig,
    pub attribute: Attribute,
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl Filter {
    pub fn new(attribute: Attribute, kind: FilterKind) -> Self {
        Self {
            config: FilterConfig::default(),
            attribute,
            kind,
        }
    }

    pub fn members<I, S>(attribute: Attribute, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            attribute,
            FilterKind::Members {
                members: members.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn exclude(filter: Filter) -> Self {
        Self::new(
            filter.attribute.clone(),
            FilterKind::Exclude {
                filter: Box::new(filter),
            },
        )
    }

    pub fn numeric(attribute: Attribute, operator: NumericOperator, value: f64) -> Self {
        Self::new(attribute, FilterKind::Numeric { operator, value })
    }

    pub fn date_range(attribute: Attribute, from: Option<&str>, to: Option<&str>) -> Self {
        Self::new(
            attribute,
            FilterKind::DateRange {
                from: from.map(str::to_string),
                to: to.map(str::to_string),
            },
        )
    }

    pub fn text(attribute: Attribute, operator: TextOperator, value: impl Into<String>) -> Self {
        Self::new(
            attribute,
            FilterKind::Text {
                operator,
                value: value.into(),
            },
        )
    }

    /// Cascading filter over the given levels; it takes the first level's attribute
    pub fn cascading(levels: Vec<Filter>) -> Self {
        let attribute = levels
            .first()
            .map(|level| level.attribute.clone())
            .unwrap_or_default();
        Self::new(attribute, FilterKind::Cascading { filters: levels })
    }

    pub fn logical_attribute(operator: RelationOperator, filters: Vec<Filter>) -> Self {
        let attribute = filters
            .first()
            .map(|filter| filter.attribute.clone())
            .unwrap_or_default();
        Self::new(attribute, FilterKind::LogicalAttribute { operator, filters })
    }

    pub fn with_guid(mut self, guid: impl Into<Id>) -> Self {
        self.config.guid = guid.into();
        self
    }

    pub fn guid(&self) -> &str {
        &self.config.guid
    }

    pub fn is_cascading(&self) -> bool {
        matches!(self.kind, FilterKind::Cascading { .. })
    }

    /// Per-level filters of a cascading filter
    pub fn cascade_levels(&self) -> Option<&[Filter]> {
        match &self.kind {
            FilterKind::Cascading { filters } => Some(filters),
            _ => None,
        }
    }

    /// The JAQL `filter` fragment
    pub fn filter_jaql(&self) -> Value {
        match &self.kind {
            FilterKind::Members { members } => json!({ "members": members }),
            FilterKind::Exclude { filter } => json!({ "exclude": filter.filter_jaql() }),
            FilterKind::Numeric { operator, value } => {
                let mut fragment = Map::new();
                fragment.insert(operator.jaql_key().to_string(), json!(value));
                Value::Object(fragment)
            }
            FilterKind::DateRange { from, to } => {
                let mut fragment = Map::new();
                if let Some(from) = from {
                    fragment.insert("from".to_string(), json!(from));
                }
                if let Some(to) = to {
                    fragment.insert("to".to_string(), json!(to));
                }
                Value::Object(fragment)
            }
            FilterKind::Text { operator, value } => {
                let mut fragment = Map::new();
                fragment.insert(operator.jaql_key().to_string(), json!(value));
                Value::Object(fragment)
            }
            FilterKind::Cascading { filters } => {
                Value::Array(filters.iter().map(Filter::filter_jaql).collect())
            }
            FilterKind::LogicalAttribute { operator, filters } => {
                let key = match operator {
                    RelationOperator::And => "and",
                    RelationOperator::Or => "or",
                };
                let mut fragment = Map::new();
                fragment.insert(
                    key.to_string(),
                    Value::Array(filters.iter().map(Filter::filter_jaql).collect()),
                );
                Value::Object(fragment)
            }
        }
    }

    /// Full JAQL element. A cascading filter serializes as the list of its level elements.
    pub fn jaql(&self) -> Value {
        if let FilterKind::Cascading { filters } = &self.kind {
            return Value::Array(filters.iter().map(Filter::jaql).collect());
        }

        let mut element = Map::new();
        element.insert("title".to_string(), json!(self.attribute.name));
        element.insert("dim".to_string(), json!(self.attribute.expression));
        element.insert("datatype".to_string(), json!(self.attribute.data_type));
        if let Some(level) = self.attribute.granularity {
            element.insert("level".to_string(), json!(level.jaql_level()));
        }
        element.insert("filter".to_string(), self.filter_jaql());

        json!({ "jaql": element })
    }
}

impl RelationsFilter for Filter {
    fn guid(&self) -> &str {
        Filter::guid(self)
    }

    fn cascade_level_guids(&self) -> Option<Vec<&str>> {
        self.cascade_levels()
            .map(|levels| levels.iter().map(Filter::guid).collect())
    }

    fn compare_id(&self) -> String {
        crate::logic::get_filter_compare_id(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender() -> Attribute {
        Attribute::new("Gender", "[Commerce.Gender]")
    }

    #[test]
    fn test_members_filter_jaql() {
        let filter = Filter::members(gender(), ["Female", "Male"]).with_guid("gender");
        let jaql = filter.jaql();

        assert_eq!(jaql["jaql"]["dim"], "[Commerce.Gender]");
        assert_eq!(jaql["jaql"]["datatype"], "text");
        assert_eq!(jaql["jaql"]["filter"]["members"], json!(["Female", "Male"]));
        assert!(jaql["jaql"].get("level").is_none());
    }

    #[test]
    fn test_date_level_jaql_carries_level() {
        let attribute = Attribute::date_level("Date", "[Commerce.Date]", DateLevel::Months);
        let filter = Filter::date_range(attribute, Some("2024-01"), None);
        let jaql = filter.jaql();

        assert_eq!(jaql["jaql"]["level"], "months");
        assert_eq!(jaql["jaql"]["datatype"], "datetime");
        assert_eq!(jaql["jaql"]["filter"], json!({ "from": "2024-01" }));
    }

    #[test]
    fn test_exclude_wraps_inner_filter() {
        let inner = Filter::members(gender(), ["Unspecified"]);
        let filter = Filter::exclude(inner.clone());

        assert_eq!(filter.attribute, inner.attribute);
        assert_eq!(
            filter.filter_jaql(),
            json!({ "exclude": { "members": ["Unspecified"] } })
        );
    }

    #[test]
    fn test_cascading_levels() {
        let country = Filter::members(Attribute::new("Country", "[Geo.Country]"), ["US"])
            .with_guid("country");
        let city = Filter::members(Attribute::new("City", "[Geo.City]"), ["Boston"])
            .with_guid("city");
        let cascading = Filter::cascading(vec![country, city]).with_guid("geo");

        assert!(cascading.is_cascading());
        assert_eq!(cascading.attribute.expression, "[Geo.Country]");
        assert_eq!(
            cascading.cascade_level_guids(),
            Some(vec!["country", "city"])
        );
        assert_eq!(cascading.jaql().as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_filter_deserialization() {
        let json = r#"{
            "config": { "guid": "cost" },
            "attribute": { "name": "Cost", "expression": "[Commerce.Cost]", "dataType": "numeric" },
            "filterType": "numeric",
            "operator": "greaterThan",
            "value": 100
        }"#;

        let filter: Filter = serde_json::from_str(json).unwrap();

        assert_eq!(filter.guid(), "cost");
        assert_eq!(
            filter.kind,
            FilterKind::Numeric {
                operator: NumericOperator::GreaterThan,
                value: 100.0
            }
        );
        assert_eq!(filter.filter_jaql(), json!({ "fromNotEqual": 100.0 }));
    }

    #[test]
    fn test_missing_guid_is_generated() {
        let json = r#"{
            "attribute": { "name": "Gender", "expression": "[Commerce.Gender]" },
            "filterType": "members",
            "members": ["Female"]
        }"#;

        let filter: Filter = serde_json::from_str(json).unwrap();

        assert!(!filter.guid().is_empty());
    }
}
