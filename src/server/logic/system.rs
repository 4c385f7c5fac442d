use std::sync::Arc;

use rmcp::model::CallToolResult;
use serde_json::json;

use crate::config::AppState;
use crate::server::params::{GetScanReportParams, RefreshIndexParams};

use super::{error_response, success_json};

pub async fn refresh_index(
    state: &Arc<AppState>,
    _params: RefreshIndexParams,
) -> anyhow::Result<CallToolResult> {
    let dropped = state.refresh();
    tracing::info!(root = %state.config.root.display(), dropped, "Index cache invalidated");

    match state.engine().await {
        Ok(engine) => Ok(success_json(json!({
            "status": "rebuilt",
            "dropped_cached": dropped,
            "report": engine.report()
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_scan_report(
    state: &Arc<AppState>,
    _params: GetScanReportParams,
) -> anyhow::Result<CallToolResult> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return Ok(error_response(e)),
    };

    Ok(success_json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "report": engine.report(),
        "modules": engine.modules(),
        "cache": state.cache.stats()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::server::logic::response_json;
    use crate::test_utils::{FixtureTree, TestContext};

    #[tokio::test]
    async fn test_scan_report_lists_failures() {
        let ctx = TestContext::new(
            FixtureTree::new()
                .file("good.ts", "export const good = 1;\n")
                .file("bad.ts", "export function (\n"),
        );

        let json = response_json(
            &get_scan_report(&ctx.state, GetScanReportParams::default())
                .await
                .unwrap(),
        );
        assert_eq!(json["report"]["files_scanned"], 2);
        assert_eq!(json["report"]["failures"][0]["file"], "bad.ts");
        assert_eq!(json["modules"][0], "good");
        assert_eq!(json["cache"]["misses"], 1);
    }

    #[tokio::test]
    async fn test_refresh_rebuilds_after_edit() {
        let ctx = TestContext::new(FixtureTree::new().file("index.ts", "export const a = 1;\n"));
        get_scan_report(&ctx.state, GetScanReportParams::default())
            .await
            .unwrap();

        ctx.tree.write("extra.ts", "export const b = 2;\n");
        let json = response_json(
            &refresh_index(&ctx.state, RefreshIndexParams::default())
                .await
                .unwrap(),
        );
        assert_eq!(json["status"], "rebuilt");
        assert_eq!(json["dropped_cached"], true);
        assert_eq!(json["report"]["declarations"], 2);
    }

    #[tokio::test]
    async fn test_missing_root_is_reported_as_error() {
        let state = Arc::new(AppState::new(AppConfig {
            root: "/definitely/not/here".into(),
            ..AppConfig::default()
        }));
        let json = response_json(
            &get_scan_report(&state, GetScanReportParams::default())
                .await
                .unwrap(),
        );
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Root path not found"));
    }
}
