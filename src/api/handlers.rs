use axum::{http::StatusCode, response::Json, Json as RequestJson};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RelationsError;
use crate::logic::{
    calculate_new_relations, combine_filters_and_relations,
    convert_filter_relations_model_to_relation_rules, diff_filters,
    filter_relation_rules_to_filter_relations_model, get_filter_compare_id,
    get_filter_relations_from_jaql, get_relations_with_replaced_filter,
    merge_filters_or_filter_relations, split_filters_and_relations, SplitFiltersAndRelations,
};
use crate::model::{
    Filter, FilterAction, FilterRelationsJaql, FilterRelationsModelNode, FiltersOrRelations,
    RelationsRules,
};

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            translation_key: None,
            params: HashMap::new(),
        }
    }
}

impl From<&RelationsError> for ErrorResponse {
    fn from(err: &RelationsError) -> Self {
        Self {
            error: err.to_string(),
            translation_key: err.translation_key().map(str::to_string),
            params: err
                .translation_params()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }
}

fn relations_error(err: RelationsError) -> (StatusCode, Json<ErrorResponse>) {
    log::warn!("Rejected filter relations request: {}", err);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(&err)))
}

#[derive(Debug, Serialize)]
pub struct RelationsResponse {
    pub relations: RelationsRules,
}

#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub input: Option<FiltersOrRelations>,
}

/// POST /relations/split
pub async fn split(
    RequestJson(req): RequestJson<SplitRequest>,
) -> ApiResult<SplitFiltersAndRelations<Filter>> {
    split_filters_and_relations(req.input.as_ref())
        .map(Json)
        .map_err(relations_error)
}

#[derive(Debug, Deserialize)]
pub struct CombineRequest {
    pub filters: Vec<Filter>,
    pub relations: RelationsRules,
}

/// POST /relations/combine
pub async fn combine(RequestJson(req): RequestJson<CombineRequest>) -> Json<FiltersOrRelations> {
    Json(combine_filters_and_relations(&req.filters, &req.relations))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub prev_filters: Vec<Filter>,
    pub prev_relations: RelationsRules,
    pub next_filters: Vec<Filter>,
}

/// POST /relations/calculate
pub async fn calculate(RequestJson(req): RequestJson<CalculateRequest>) -> Json<RelationsResponse> {
    Json(RelationsResponse {
        relations: calculate_new_relations(&req.prev_filters, &req.prev_relations, &req.next_filters),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub relations: RelationsRules,
    pub filter_to_replace: Filter,
    pub new_filter: Filter,
}

/// POST /relations/replace
pub async fn replace(RequestJson(req): RequestJson<ReplaceRequest>) -> Json<RelationsResponse> {
    Json(RelationsResponse {
        relations: get_relations_with_replaced_filter(
            &req.relations,
            &req.filter_to_replace,
            &req.new_filter,
        ),
    })
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub source: Option<FiltersOrRelations>,
    pub target: Option<FiltersOrRelations>,
}

/// POST /relations/merge
pub async fn merge(RequestJson(req): RequestJson<MergeRequest>) -> ApiResult<FiltersOrRelations> {
    merge_filters_or_filter_relations(req.source.as_ref(), req.target.as_ref())
        .map(Json)
        .map_err(relations_error)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FromJaqlRequest {
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub highlights: Vec<Filter>,
    pub filter_relations: Option<FilterRelationsJaql>,
}

/// POST /relations/from-jaql
pub async fn from_jaql(RequestJson(req): RequestJson<FromJaqlRequest>) -> ApiResult<FiltersOrRelations> {
    get_filter_relations_from_jaql(&req.filters, &req.highlights, req.filter_relations.as_ref())
        .map(Json)
        .map_err(relations_error)
}

#[derive(Debug, Deserialize)]
pub struct ModelToRulesRequest {
    pub model: Option<FilterRelationsModelNode>,
    pub filters: Vec<Filter>,
}

/// POST /relations/model/to-rules
pub async fn model_to_rules(
    RequestJson(req): RequestJson<ModelToRulesRequest>,
) -> ApiResult<RelationsResponse> {
    convert_filter_relations_model_to_relation_rules(req.model.as_ref(), &req.filters)
        .map(|relations| Json(RelationsResponse { relations }))
        .map_err(relations_error)
}

#[derive(Debug, Deserialize)]
pub struct ModelFromRulesRequest {
    pub relations: RelationsRules,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model: Option<FilterRelationsModelNode>,
}

/// POST /relations/model/from-rules
pub async fn model_from_rules(
    RequestJson(req): RequestJson<ModelFromRulesRequest>,
) -> Json<ModelResponse> {
    Json(ModelResponse {
        model: filter_relation_rules_to_filter_relations_model(&req.relations, &req.filters),
    })
}

#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub prev: Vec<Filter>,
    pub next: Vec<Filter>,
}

/// POST /filters/diff
pub async fn diff(RequestJson(req): RequestJson<DiffRequest>) -> Json<Vec<FilterAction>> {
    Json(diff_filters(&req.prev, &req.next))
}

#[derive(Debug, Deserialize)]
pub struct CompareIdRequest {
    pub filter: Filter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareIdResponse {
    pub compare_id: String,
}

/// POST /filters/compare-id
pub async fn compare_id(RequestJson(req): RequestJson<CompareIdRequest>) -> Json<CompareIdResponse> {
    Json(CompareIdResponse {
        compare_id: get_filter_compare_id(&req.filter),
    })
}
