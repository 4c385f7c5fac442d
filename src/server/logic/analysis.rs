use std::sync::Arc;

use rmcp::model::CallToolResult;
use serde_json::json;

use crate::config::AppState;
use crate::server::params::{GetDependenciesParams, GetHierarchyParams, GetStatisticsParams};
use crate::types::AppError;

use super::{error_response, not_found_response, success_json, success_serialize, SUGGESTION_LIMIT};

pub async fn get_hierarchy(
    state: &Arc<AppState>,
    params: GetHierarchyParams,
) -> anyhow::Result<CallToolResult> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    match engine.hierarchy(&params.name) {
        Some(hierarchy) => Ok(success_serialize(&hierarchy)),
        None => Ok(not_found_response(
            AppError::NameNotFound(params.name.clone()),
            &engine.fuzzy_search(&params.name, SUGGESTION_LIMIT),
        )),
    }
}

pub async fn get_dependencies(
    state: &Arc<AppState>,
    params: GetDependenciesParams,
) -> anyhow::Result<CallToolResult> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    match params.module.as_deref() {
        Some(module) => match engine.dependencies_of(module) {
            Some(info) => Ok(success_serialize(&info)),
            None => Ok(error_response(AppError::ModuleNotFound(module.to_string()))),
        },
        None => {
            let modules = engine.dependencies();
            Ok(success_json(json!({
                "modules": modules,
                "count": modules.len()
            })))
        }
    }
}

pub async fn get_statistics(
    state: &Arc<AppState>,
    _params: GetStatisticsParams,
) -> anyhow::Result<CallToolResult> {
    match state.engine().await {
        Ok(engine) => Ok(success_serialize(&engine.statistics())),
        Err(e) => Ok(error_response(e)),
    }
}
