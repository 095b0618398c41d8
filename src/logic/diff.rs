use log::debug;
use std::collections::HashSet;

use crate::model::{FilterAction, RelationOperator, RelationsFilter, RelationsRuleNode, RelationsRules};

/// Presence diff between two filter lists, compared by guid only.
///
/// Removals come first in `prev` order, then additions in `next` order. Rebuilding
/// relations relies on this order when a dimension is replaced.
pub fn diff_filters<F: RelationsFilter>(prev: &[F], next: &[F]) -> Vec<FilterAction<F>> {
    let prev_guids: HashSet<&str> = prev.iter().map(|filter| filter.guid()).collect();
    let next_guids: HashSet<&str> = next.iter().map(|filter| filter.guid()).collect();

    let removed = prev
        .iter()
        .filter(|filter| !next_guids.contains(filter.guid()))
        .map(|filter| FilterAction::Remove(filter.clone()));
    let added = next
        .iter()
        .filter(|filter| !prev_guids.contains(filter.guid()))
        .map(|filter| FilterAction::Add(filter.clone()));

    removed.chain(added).collect()
}

/// Relations of `next_filters`, derived from the relations of `prev_filters`.
///
/// Relations are maintained only once a tree exists: with no previous relations the
/// result stays `None`. Added filters join the root with AND; removed filters are cut
/// out and operators left with a single child collapse into that child.
pub fn calculate_new_relations<F: RelationsFilter>(
    prev_filters: &[F],
    prev_relations: &RelationsRules,
    next_filters: &[F],
) -> RelationsRules {
    let actions = diff_filters(prev_filters, next_filters);
    if actions.is_empty() {
        return prev_relations.clone();
    }
    if prev_relations.is_none() {
        return None;
    }

    actions
        .iter()
        .fold(prev_relations.clone(), |relations, action| {
            debug!(
                "Applying {} of filter '{}' to relations",
                match action {
                    FilterAction::Add(_) => "add",
                    FilterAction::Remove(_) => "remove",
                },
                action.payload().guid()
            );
            match action {
                FilterAction::Add(filter) => add_filter_to_relations(relations, filter.guid()),
                FilterAction::Remove(filter) => relations
                    .and_then(|node| remove_filter_from_relations(&node, filter.guid())),
            }
        })
}

fn add_filter_to_relations(relations: RelationsRules, guid: &str) -> RelationsRules {
    let leaf = RelationsRuleNode::id(guid);
    Some(match relations {
        Some(node) => RelationsRuleNode::rule(node, RelationOperator::And, leaf),
        None => leaf,
    })
}

fn remove_filter_from_relations(node: &RelationsRuleNode, guid: &str) -> RelationsRules {
    match node {
        RelationsRuleNode::Id { instanceid } if instanceid == guid => None,
        RelationsRuleNode::Id { .. } => Some(node.clone()),
        RelationsRuleNode::Rule {
            left,
            right,
            operator,
        } => match (
            remove_filter_from_relations(left, guid),
            remove_filter_from_relations(right, guid),
        ) {
            (None, None) => None,
            (Some(remaining), None) | (None, Some(remaining)) => Some(remaining),
            (Some(left), Some(right)) => Some(RelationsRuleNode::rule(left, *operator, right)),
        },
    }
}

/// Relations with every leaf of `filter_to_replace` pointing to `new_filter` instead
pub fn get_relations_with_replaced_filter<F: RelationsFilter>(
    relations: &RelationsRules,
    filter_to_replace: &F,
    new_filter: &F,
) -> RelationsRules {
    relations
        .as_ref()
        .map(|node| replace_guid(node, filter_to_replace.guid(), new_filter.guid()))
}

fn replace_guid(node: &RelationsRuleNode, from: &str, to: &str) -> RelationsRuleNode {
    match node {
        RelationsRuleNode::Id { instanceid } if instanceid == from => RelationsRuleNode::id(to),
        RelationsRuleNode::Id { .. } => node.clone(),
        RelationsRuleNode::Rule {
            left,
            right,
            operator,
        } => RelationsRuleNode::rule(
            replace_guid(left, from, to),
            *operator,
            replace_guid(right, from, to),
        ),
    }
}
