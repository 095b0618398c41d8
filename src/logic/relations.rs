use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{RelationsError, RelationsResult};
use crate::model::{
    FilterRelations, FilterRelationsJaql, FilterRelationsNode, FiltersOrRelations,
    RelationOperator, RelationsFilter, RelationsRuleNode, RelationsRules,
};

/// Flat filters and the relations tree referencing them by guid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitFiltersAndRelations<F> {
    pub filters: Vec<F>,
    pub relations: RelationsRules,
}

/// Split filters or a filter relations tree into a flat filter list and a guid tree.
///
/// Leaves are collected depth-first, left to right, keeping the first occurrence of
/// each guid.
pub fn split_filters_and_relations<F: RelationsFilter>(
    input: Option<&FiltersOrRelations<F>>,
) -> RelationsResult<SplitFiltersAndRelations<F>> {
    match input {
        None => Ok(SplitFiltersAndRelations {
            filters: Vec::new(),
            relations: None,
        }),
        Some(FiltersOrRelations::Filters(filters)) => Ok(SplitFiltersAndRelations {
            filters: filters.clone(),
            relations: None,
        }),
        Some(FiltersOrRelations::Relations(relations)) => {
            let mut filters = Vec::new();
            let mut seen = HashSet::new();
            let rules = relations_to_rules(relations, &mut filters, &mut seen)?;
            Ok(SplitFiltersAndRelations {
                filters,
                relations: Some(rules),
            })
        }
    }
}

fn relations_to_rules<F: RelationsFilter>(
    relations: &FilterRelations<F>,
    filters: &mut Vec<F>,
    seen: &mut HashSet<String>,
) -> RelationsResult<RelationsRuleNode> {
    let left = node_to_rules(&relations.left, filters, seen)?;
    let right = node_to_rules(&relations.right, filters, seen)?;
    Ok(RelationsRuleNode::rule(left, relations.operator, right))
}

fn node_to_rules<F: RelationsFilter>(
    node: &FilterRelationsNode<F>,
    filters: &mut Vec<F>,
    seen: &mut HashSet<String>,
) -> RelationsResult<RelationsRuleNode> {
    match node {
        FilterRelationsNode::Filter(filter) => {
            if seen.insert(filter.guid().to_string()) {
                filters.push(filter.clone());
            }
            Ok(RelationsRuleNode::id(filter.guid()))
        }
        FilterRelationsNode::Relations(relations) => relations_to_rules(relations, filters, seen),
        FilterRelationsNode::Missing => Err(RelationsError::UnknownNodeType),
    }
}

/// Flat filter list of filters or a filter relations tree
pub fn get_filters_array<F: RelationsFilter>(
    input: Option<&FiltersOrRelations<F>>,
) -> RelationsResult<Vec<F>> {
    Ok(split_filters_and_relations(input)?.filters)
}

/// True for a bare leaf, which carries no more information than a plain filter list
pub fn is_trivial_single_node_relations(relations: &RelationsRules) -> bool {
    matches!(relations, Some(RelationsRuleNode::Id { .. }))
}

/// Guids referenced by the leaves of a relations tree, left to right
pub fn get_relations_filters_guids(relations: &RelationsRuleNode) -> Vec<&str> {
    let mut guids = Vec::new();
    collect_guids(relations, &mut guids);
    guids
}

fn collect_guids<'a>(node: &'a RelationsRuleNode, guids: &mut Vec<&'a str>) {
    match node {
        RelationsRuleNode::Id { instanceid } => guids.push(instanceid),
        RelationsRuleNode::Rule { left, right, .. } => {
            collect_guids(left, guids);
            collect_guids(right, guids);
        }
    }
}

/// Index filters by guid; the first filter wins on duplicate guids
fn index_by_guid<F: RelationsFilter>(filters: &[F]) -> HashMap<&str, &F> {
    let mut index = HashMap::with_capacity(filters.len());
    for filter in filters {
        index.entry(filter.guid()).or_insert(filter);
    }
    index
}

fn resolve_relations<'a, F, L>(
    left: &RelationsRuleNode,
    operator: RelationOperator,
    right: &RelationsRuleNode,
    lookup: &L,
) -> FilterRelations<F>
where
    F: RelationsFilter + 'a,
    L: Fn(&str) -> Option<&'a F>,
{
    FilterRelations {
        left: resolve_node(left, lookup),
        right: resolve_node(right, lookup),
        operator,
    }
}

fn resolve_node<'a, F, L>(node: &RelationsRuleNode, lookup: &L) -> FilterRelationsNode<F>
where
    F: RelationsFilter + 'a,
    L: Fn(&str) -> Option<&'a F>,
{
    match node {
        RelationsRuleNode::Id { instanceid } => match lookup(instanceid) {
            Some(filter) => FilterRelationsNode::Filter(filter.clone()),
            None => {
                warn!("Filter relations reference filter '{}' which is not provided", instanceid);
                FilterRelationsNode::Missing
            }
        },
        RelationsRuleNode::Rule {
            left,
            right,
            operator,
        } => FilterRelationsNode::Relations(Box::new(resolve_relations(
            left, *operator, right, lookup,
        ))),
    }
}

/// Pair a relations tree with filters.
///
/// Trivial relations come back as the plain filter list. Leaves whose guid is not in
/// `filters` become [`FilterRelationsNode::Missing`].
pub fn combine_filters_and_relations<F: RelationsFilter>(
    filters: &[F],
    relations: &RelationsRules,
) -> FiltersOrRelations<F> {
    match relations {
        None | Some(RelationsRuleNode::Id { .. }) => FiltersOrRelations::Filters(filters.to_vec()),
        Some(RelationsRuleNode::Rule {
            left,
            right,
            operator,
        }) => {
            let index = index_by_guid(filters);
            let lookup = |guid: &str| index.get(guid).copied();
            trace!("Combining {} filters with relations", filters.len());
            FiltersOrRelations::Relations(resolve_relations(left, *operator, right, &lookup))
        }
    }
}

/// Restore filters or a filter relations tree from a JAQL query payload.
///
/// Highlights never take part in relations: when every leaf references a highlight the
/// relations are dropped and the plain `filters` are returned.
pub fn get_filter_relations_from_jaql<F: RelationsFilter>(
    filters: &[F],
    highlights: &[F],
    jaql: Option<&FilterRelationsJaql>,
) -> RelationsResult<FiltersOrRelations<F>> {
    let Some(jaql) = jaql else {
        return Ok(FiltersOrRelations::Filters(Vec::new()));
    };

    let filters_index = index_by_guid(filters);
    let highlights_index = index_by_guid(highlights);
    let guids = get_relations_filters_guids(jaql);

    if let Some(unknown) = guids
        .iter()
        .find(|guid| !filters_index.contains_key(*guid) && !highlights_index.contains_key(*guid))
    {
        return Err(RelationsError::UnknownFilterInRelations {
            instance_id: unknown.to_string(),
        });
    }

    let highlights_only = guids.iter().all(|guid| !filters_index.contains_key(guid));
    if highlights_only {
        trace!("Filter relations reference only highlights, dropping relations");
        return Ok(FiltersOrRelations::Filters(filters.to_vec()));
    }

    match jaql {
        RelationsRuleNode::Id { .. } => Ok(FiltersOrRelations::Filters(filters.to_vec())),
        RelationsRuleNode::Rule {
            left,
            right,
            operator,
        } => {
            let lookup = |guid: &str| {
                filters_index
                    .get(guid)
                    .or_else(|| highlights_index.get(guid))
                    .copied()
            };
            Ok(FiltersOrRelations::Relations(resolve_relations(
                left, *operator, right, &lookup,
            )))
        }
    }
}
