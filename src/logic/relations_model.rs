use log::trace;

use crate::error::{RelationsError, RelationsResult};
use crate::model::{FilterRelationsModelNode, RelationsFilter, RelationsRuleNode, RelationsRules};

/// Convert an editor model into relations rules.
///
/// Brackets are dropped since the binary tree already fixes grouping. A cascading
/// identifier turns into a leaf of the cascading filter whose level guids match its
/// levels exactly.
pub fn convert_filter_relations_model_to_relation_rules<F: RelationsFilter>(
    model: Option<&FilterRelationsModelNode>,
    filters: &[F],
) -> RelationsResult<RelationsRules> {
    match model {
        None => Ok(None),
        Some(node) => model_node_to_rules(node, filters).map(Some),
    }
}

fn model_node_to_rules<F: RelationsFilter>(
    node: &FilterRelationsModelNode,
    filters: &[F],
) -> RelationsResult<RelationsRuleNode> {
    match node {
        FilterRelationsModelNode::Identifier { instance_id } => {
            Ok(RelationsRuleNode::id(instance_id.as_str()))
        }
        FilterRelationsModelNode::CascadingIdentifier { levels } => {
            let level_ids = levels
                .iter()
                .map(|level| match level {
                    FilterRelationsModelNode::Identifier { instance_id } => Ok(instance_id.as_str()),
                    _ => Err(RelationsError::UnknownNodeType),
                })
                .collect::<RelationsResult<Vec<_>>>()?;

            let cascading_filter = find_cascading_filter(&level_ids, filters).ok_or_else(|| {
                RelationsError::CascadingFilterNotFound {
                    levels: level_ids.iter().map(|id| id.to_string()).collect(),
                }
            })?;
            trace!(
                "Resolved cascading levels {:?} to filter '{}'",
                level_ids,
                cascading_filter.guid()
            );

            Ok(RelationsRuleNode::id(cascading_filter.guid()))
        }
        FilterRelationsModelNode::ParenthesizedLogicalExpression { value } => {
            model_node_to_rules(value, filters)
        }
        FilterRelationsModelNode::LogicalExpression {
            operator,
            left,
            right,
        } => Ok(RelationsRuleNode::rule(
            model_node_to_rules(left, filters)?,
            *operator,
            model_node_to_rules(right, filters)?,
        )),
        FilterRelationsModelNode::Unknown => Err(RelationsError::UnknownNodeType),
    }
}

/// Cascading filter whose level guids are exactly `level_ids`, in any order
fn find_cascading_filter<'a, F: RelationsFilter>(
    level_ids: &[&str],
    filters: &'a [F],
) -> Option<&'a F> {
    filters.iter().find(|filter| match filter.cascade_level_guids() {
        Some(level_guids) => {
            level_ids.iter().all(|id| level_guids.contains(id))
                && level_guids.iter().all(|guid| level_ids.contains(guid))
        }
        None => false,
    })
}

/// Convert relations rules into an editor model.
///
/// Leaves of cascading filters expand into their levels. Other leaves keep their guid
/// even when it is not among `filters`.
pub fn filter_relation_rules_to_filter_relations_model<F: RelationsFilter>(
    rules: &RelationsRules,
    filters: &[F],
) -> Option<FilterRelationsModelNode> {
    rules.as_ref().map(|node| rules_to_model_node(node, filters))
}

fn rules_to_model_node<F: RelationsFilter>(
    node: &RelationsRuleNode,
    filters: &[F],
) -> FilterRelationsModelNode {
    match node {
        RelationsRuleNode::Id { instanceid } => {
            let level_guids = filters
                .iter()
                .find(|filter| filter.guid() == instanceid.as_str())
                .and_then(|filter| filter.cascade_level_guids());

            match level_guids {
                Some(level_guids) => FilterRelationsModelNode::cascading(level_guids),
                None => FilterRelationsModelNode::identifier(instanceid.as_str()),
            }
        }
        RelationsRuleNode::Rule {
            left,
            right,
            operator,
        } => FilterRelationsModelNode::logical(
            rules_to_model_node(left, filters),
            *operator,
            rules_to_model_node(right, filters),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Filter, RelationOperator};

    fn gender() -> Filter {
        Filter::members(Attribute::new("Gender", "[Commerce.Gender]"), ["Female"])
            .with_guid("gender")
    }

    fn geo() -> Filter {
        let country = Filter::members(Attribute::new("Country", "[Geo.Country]"), ["US"])
            .with_guid("country");
        let city = Filter::members(Attribute::new("City", "[Geo.City]"), ["Boston"])
            .with_guid("city");
        Filter::cascading(vec![country, city]).with_guid("geo")
    }

    #[test]
    fn test_undefined_model() {
        let rules = convert_filter_relations_model_to_relation_rules::<Filter>(None, &[]).unwrap();
        assert_eq!(rules, None);
        assert_eq!(
            filter_relation_rules_to_filter_relations_model::<Filter>(&None, &[]),
            None
        );
    }

    #[test]
    fn test_brackets_are_dropped() {
        let model = FilterRelationsModelNode::logical(
            FilterRelationsModelNode::bracket(FilterRelationsModelNode::logical(
                FilterRelationsModelNode::identifier("a"),
                RelationOperator::Or,
                FilterRelationsModelNode::identifier("b"),
            )),
            RelationOperator::And,
            FilterRelationsModelNode::bracket(FilterRelationsModelNode::identifier("c")),
        );

        let rules =
            convert_filter_relations_model_to_relation_rules::<Filter>(Some(&model), &[]).unwrap();

        assert_eq!(
            rules,
            Some(RelationsRuleNode::and(
                RelationsRuleNode::or(RelationsRuleNode::id("a"), RelationsRuleNode::id("b")),
                RelationsRuleNode::id("c"),
            ))
        );
    }

    #[test]
    fn test_cascading_identifier_resolves_to_cascading_filter() {
        let filters = vec![gender(), geo()];
        let model = FilterRelationsModelNode::logical(
            FilterRelationsModelNode::identifier("gender"),
            RelationOperator::Or,
            FilterRelationsModelNode::cascading(["city", "country"]),
        );

        let rules = convert_filter_relations_model_to_relation_rules(Some(&model), &filters).unwrap();

        assert_eq!(
            rules,
            Some(RelationsRuleNode::or(
                RelationsRuleNode::id("gender"),
                RelationsRuleNode::id("geo"),
            ))
        );
    }

    #[test]
    fn test_cascading_identifier_requires_exact_level_set() {
        let filters = vec![gender(), geo()];
        let partial = FilterRelationsModelNode::cascading(["country"]);
        let extra = FilterRelationsModelNode::cascading(["country", "city", "street"]);

        for model in [partial, extra] {
            let err = convert_filter_relations_model_to_relation_rules(Some(&model), &filters)
                .unwrap_err();
            assert!(matches!(err, RelationsError::CascadingFilterNotFound { .. }));
        }
    }

    #[test]
    fn test_unknown_model_node() {
        let model = FilterRelationsModelNode::logical(
            FilterRelationsModelNode::identifier("gender"),
            RelationOperator::And,
            FilterRelationsModelNode::Unknown,
        );

        let err =
            convert_filter_relations_model_to_relation_rules(Some(&model), &[gender()]).unwrap_err();
        assert_eq!(err, RelationsError::UnknownNodeType);
    }

    #[test]
    fn test_rules_to_model_expands_cascading_levels() {
        let filters = vec![gender(), geo()];
        let rules = Some(RelationsRuleNode::and(
            RelationsRuleNode::id("geo"),
            RelationsRuleNode::id("gender"),
        ));

        let model = filter_relation_rules_to_filter_relations_model(&rules, &filters);

        assert_eq!(
            model,
            Some(FilterRelationsModelNode::logical(
                FilterRelationsModelNode::cascading(["country", "city"]),
                RelationOperator::And,
                FilterRelationsModelNode::identifier("gender"),
            ))
        );
    }

    #[test]
    fn test_rules_to_model_keeps_unknown_identity() {
        let rules = Some(RelationsRuleNode::id("not-provided"));

        let model = filter_relation_rules_to_filter_relations_model(&rules, &[gender()]);

        assert_eq!(model, Some(FilterRelationsModelNode::identifier("not-provided")));
    }

    #[test]
    fn test_model_round_trip() {
        let filters = vec![gender(), geo()];
        let rules = Some(RelationsRuleNode::or(
            RelationsRuleNode::and(RelationsRuleNode::id("gender"), RelationsRuleNode::id("geo")),
            RelationsRuleNode::id("gender"),
        ));

        let model = filter_relation_rules_to_filter_relations_model(&rules, &filters);
        let restored =
            convert_filter_relations_model_to_relation_rules(model.as_ref(), &filters).unwrap();

        assert_eq!(restored, rules);
    }
}
