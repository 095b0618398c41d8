use serde::{Deserialize, Serialize};

use crate::model::RelationOperator;

/// Relations tree as consumed and produced by the filter relations editor.
///
/// Unlike [`RelationsRuleNode`](crate::model::RelationsRuleNode) it keeps explicit
/// brackets and lists the levels of a cascading filter instead of the cascading
/// filter itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterRelationsModelNode {
    Identifier {
        #[serde(rename = "instanceId")]
        instance_id: String,
    },
    CascadingIdentifier {
        levels: Vec<FilterRelationsModelNode>,
    },
    ParenthesizedLogicalExpression {
        value: Box<FilterRelationsModelNode>,
    },
    LogicalExpression {
        operator: RelationOperator,
        left: Box<FilterRelationsModelNode>,
        right: Box<FilterRelationsModelNode>,
    },
    /// Any node type this crate does not know about
    #[serde(other)]
    Unknown,
}

impl FilterRelationsModelNode {
    pub fn identifier(instance_id: impl Into<String>) -> Self {
        FilterRelationsModelNode::Identifier {
            instance_id: instance_id.into(),
        }
    }

    pub fn cascading<I, S>(level_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterRelationsModelNode::CascadingIdentifier {
            levels: level_ids.into_iter().map(Self::identifier).collect(),
        }
    }

    pub fn bracket(value: FilterRelationsModelNode) -> Self {
        FilterRelationsModelNode::ParenthesizedLogicalExpression {
            value: Box::new(value),
        }
    }

    pub fn logical(
        left: FilterRelationsModelNode,
        operator: RelationOperator,
        right: FilterRelationsModelNode,
    ) -> Self {
        FilterRelationsModelNode::LogicalExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
