//! Filter relations engine.
//!
//! Keeps the boolean AND/OR relations between dashboard filters in sync with the
//! filter list, and converts them between the live filter tree, the JAQL wire form and
//! the relations editor model.

pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;

pub use error::{RelationsError, RelationsResult};

// Export engine operations
pub use logic::{
    calculate_new_relations, combine_filters_and_relations,
    convert_filter_relations_model_to_relation_rules, diff_filters,
    filter_relation_rules_to_filter_relations_model, get_filter_compare_id,
    get_filter_relations_from_jaql, get_filters_array, get_relations_filters_guids,
    get_relations_with_replaced_filter, is_trivial_single_node_relations, merge_filters,
    merge_filters_or_filter_relations, split_filters_and_relations, MergeEngine,
    SplitFiltersAndRelations,
};

// Export all model types
pub use model::*;

/// Start the HTTP service with the given configuration
pub async fn run_server(app_config: &crate::config::AppConfig) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    let app = api::routes::create_router();

    let bind_address = app_config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Filter relations service listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
