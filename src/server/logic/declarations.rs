use std::sync::Arc;

use rmcp::model::CallToolResult;
use serde_json::json;

use crate::config::AppState;
use crate::server::params::{
    FindDeclarationParams, ListDeclarationsParams, SearchDeclarationsParams,
};
use crate::types::{AppError, Declaration, DeclarationKind, Lookup};

use super::{error_response, normalize_limit, not_found_response, success_json, SUGGESTION_LIMIT};

pub async fn list_declarations(
    state: &Arc<AppState>,
    params: ListDeclarationsParams,
) -> anyhow::Result<CallToolResult> {
    let kind = match params
        .kind
        .as_deref()
        .map(str::parse::<DeclarationKind>)
        .transpose()
    {
        Ok(kind) => kind,
        Err(message) => return Ok(error_response(AppError::InvalidArgument(message))),
    };

    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    let base: Vec<&Declaration> = match params.module.as_deref() {
        Some(module) => engine.by_module(module),
        None => engine.all().iter().collect(),
    };
    let mut declarations: Vec<&Declaration> = base
        .into_iter()
        .filter(|d| kind.map_or(true, |k| d.kind() == k))
        .collect();

    let total = declarations.len();
    declarations.truncate(normalize_limit(params.limit));

    Ok(success_json(json!({
        "declarations": declarations,
        "count": declarations.len(),
        "total": total
    })))
}

pub async fn find_declaration(
    state: &Arc<AppState>,
    params: FindDeclarationParams,
) -> anyhow::Result<CallToolResult> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    let result = match engine.lookup(&params.name, SUGGESTION_LIMIT) {
        Lookup::Found(declaration) => success_json(json!({
            "declaration": declaration,
            "matches": engine.find_all_by_name(&params.name).len()
        })),
        Lookup::NotFound { name, suggestions } => {
            not_found_response(AppError::NameNotFound(name), &suggestions)
        }
    };
    Ok(result)
}

pub async fn search_declarations(
    state: &Arc<AppState>,
    params: SearchDeclarationsParams,
) -> anyhow::Result<CallToolResult> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    let results = engine.fuzzy_search(&params.query, normalize_limit(params.limit));
    Ok(success_json(json!({
        "results": results,
        "count": results.len(),
        "query": params.query
    })))
}
