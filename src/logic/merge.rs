use log::debug;

use crate::error::RelationsResult;
use crate::logic::{
    calculate_new_relations, combine_filters_and_relations, get_filters_array,
    get_relations_with_replaced_filter, split_filters_and_relations,
};
use crate::model::{FiltersOrRelations, RelationsFilter};

/// Merges filters and filter relations coming from two places (e.g. dashboard and widget)
pub struct MergeEngine;

impl MergeEngine {
    /// Overlay `source` filters onto `target` filters.
    ///
    /// A source filter replaces the target filter on the same dimension at its position;
    /// filters on new dimensions are appended.
    pub fn merge_filters<F: RelationsFilter>(target: &[F], source: &[F]) -> Vec<F> {
        let mut merged = target.to_vec();

        for filter in source {
            let compare_id = filter.compare_id();
            match merged
                .iter()
                .position(|existing| existing.compare_id() == compare_id)
            {
                Some(index) => merged[index] = filter.clone(),
                None => merged.push(filter.clone()),
            }
        }

        merged
    }

    /// Merge `target` into `source`, keeping the relations of `source`.
    ///
    /// Relations of `target` are flattened away. Filters replacing a source filter on the
    /// same dimension take its place in the tree; filters on new dimensions join the root
    /// with AND.
    pub fn merge_filters_or_filter_relations<F: RelationsFilter>(
        source: Option<&FiltersOrRelations<F>>,
        target: Option<&FiltersOrRelations<F>>,
    ) -> RelationsResult<FiltersOrRelations<F>> {
        let source_is_relations = source.map_or(false, FiltersOrRelations::is_relations);
        let target_is_relations = target.map_or(false, FiltersOrRelations::is_relations);

        if !source_is_relations && !target_is_relations {
            return Ok(FiltersOrRelations::Filters(Self::merge_filters(
                &get_filters_array(source)?,
                &get_filters_array(target)?,
            )));
        }

        let split = split_filters_and_relations(source)?;
        let pure_target_filters = get_filters_array(target)?;
        let merged_filters = Self::merge_filters(&split.filters, &pure_target_filters);

        // merge_filters keeps source filters at their positions, so replaced ones line up
        let mut prev_filters = split.filters;
        let mut relations = split.relations;
        for (prev, merged) in prev_filters.iter_mut().zip(&merged_filters) {
            if prev.guid() != merged.guid() {
                debug!(
                    "Filter '{}' replaced by '{}' on the same dimension",
                    prev.guid(),
                    merged.guid()
                );
                relations = get_relations_with_replaced_filter(&relations, prev, merged);
                *prev = merged.clone();
            }
        }

        let merged_relations = calculate_new_relations(&prev_filters, &relations, &merged_filters);

        Ok(combine_filters_and_relations(&merged_filters, &merged_relations))
    }
}

/// See [`MergeEngine::merge_filters`]
pub fn merge_filters<F: RelationsFilter>(target: &[F], source: &[F]) -> Vec<F> {
    MergeEngine::merge_filters(target, source)
}

/// See [`MergeEngine::merge_filters_or_filter_relations`]
pub fn merge_filters_or_filter_relations<F: RelationsFilter>(
    source: Option<&FiltersOrRelations<F>>,
    target: Option<&FiltersOrRelations<F>>,
) -> RelationsResult<FiltersOrRelations<F>> {
    MergeEngine::merge_filters_or_filter_relations(source, target)
}
