use serde::{Deserialize, Serialize};

use crate::model::Filter;

/// Capability the relations engine needs from a filter.
///
/// Keeps the engine independent from a concrete filter hierarchy: a filter only has to
/// report its stable identity, whether it is a cascading filter (and its level
/// identities), and which dimension it constrains.
pub trait RelationsFilter: Clone {
    /// Stable identity referenced by relations leaves
    fn guid(&self) -> &str;

    /// Ordered guids of the per-level filters when this is a cascading filter
    fn cascade_level_guids(&self) -> Option<Vec<&str>> {
        None
    }

    /// Dimension identity used for same-dimension replacement on merge
    fn compare_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationOperator {
    And,
    Or,
}

impl std::fmt::Display for RelationOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RelationOperator::And => write!(f, "AND"),
            RelationOperator::Or => write!(f, "OR"),
        }
    }
}

/// Boolean tree over filter guids.
///
/// Also the wire shape of the `filterRelations` part of a JAQL query:
/// `{ "instanceid": .. }` leaves and `{ "operator", "left", "right" }` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationsRuleNode {
    Id {
        instanceid: String,
    },
    Rule {
        left: Box<RelationsRuleNode>,
        right: Box<RelationsRuleNode>,
        operator: RelationOperator,
    },
}

impl RelationsRuleNode {
    pub fn id(instanceid: impl Into<String>) -> Self {
        RelationsRuleNode::Id {
            instanceid: instanceid.into(),
        }
    }

    pub fn rule(left: RelationsRuleNode, operator: RelationOperator, right: RelationsRuleNode) -> Self {
        RelationsRuleNode::Rule {
            left: Box::new(left),
            right: Box::new(right),
            operator,
        }
    }

    pub fn and(left: RelationsRuleNode, right: RelationsRuleNode) -> Self {
        Self::rule(left, RelationOperator::And, right)
    }

    pub fn or(left: RelationsRuleNode, right: RelationsRuleNode) -> Self {
        Self::rule(left, RelationOperator::Or, right)
    }

    pub fn instance_id(&self) -> Option<&str> {
        match self {
            RelationsRuleNode::Id { instanceid } => Some(instanceid),
            RelationsRuleNode::Rule { .. } => None,
        }
    }
}

/// `None` means no relation constraints were recorded
pub type RelationsRules = Option<RelationsRuleNode>;

/// Wire form of relations inside a JAQL payload
pub type FilterRelationsJaql = RelationsRuleNode;

/// Boolean tree holding live filters in its leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRelations<F = Filter> {
    pub left: FilterRelationsNode<F>,
    pub right: FilterRelationsNode<F>,
    pub operator: RelationOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterRelationsNode<F = Filter> {
    Relations(Box<FilterRelations<F>>),
    Filter(F),
    /// Leaf whose filter was absent when the tree was assembled; `null` on the wire
    Missing,
}

impl<F> FilterRelations<F> {
    pub fn new(
        left: impl Into<FilterRelationsNode<F>>,
        operator: RelationOperator,
        right: impl Into<FilterRelationsNode<F>>,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            operator,
        }
    }

    pub fn and(left: impl Into<FilterRelationsNode<F>>, right: impl Into<FilterRelationsNode<F>>) -> Self {
        Self::new(left, RelationOperator::And, right)
    }

    pub fn or(left: impl Into<FilterRelationsNode<F>>, right: impl Into<FilterRelationsNode<F>>) -> Self {
        Self::new(left, RelationOperator::Or, right)
    }
}

impl From<Filter> for FilterRelationsNode<Filter> {
    fn from(filter: Filter) -> Self {
        FilterRelationsNode::Filter(filter)
    }
}

impl<F> From<FilterRelations<F>> for FilterRelationsNode<F> {
    fn from(relations: FilterRelations<F>) -> Self {
        FilterRelationsNode::Relations(Box::new(relations))
    }
}

/// Either a plain filter list or a relations tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FiltersOrRelations<F = Filter> {
    Filters(Vec<F>),
    Relations(FilterRelations<F>),
}

impl<F> FiltersOrRelations<F> {
    pub fn is_relations(&self) -> bool {
        matches!(self, FiltersOrRelations::Relations(_))
    }
}

impl<F> From<Vec<F>> for FiltersOrRelations<F> {
    fn from(filters: Vec<F>) -> Self {
        FiltersOrRelations::Filters(filters)
    }
}

impl<F> From<FilterRelations<F>> for FiltersOrRelations<F> {
    fn from(relations: FilterRelations<F>) -> Self {
        FiltersOrRelations::Relations(relations)
    }
}
