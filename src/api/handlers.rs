//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ErrorResponse, GeneratorRecord, SnapshotQuery, SnapshotRecord, SummaryResponse,
};

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse::new(&state.result, &state.report))
}

/// Returns snapshot records, optionally filtered by index range.
///
/// `GET /snapshots` → 200 + `Vec<SnapshotRecord>` JSON
/// `GET /snapshots?from=N&to=M` → filtered range (inclusive)
/// `GET /snapshots?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_snapshots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let generators = &state.result.generators;
    let records: Vec<SnapshotRecord> = state
        .result
        .snapshots
        .iter()
        .filter(|s| s.snapshot >= from && s.snapshot <= to)
        .map(|s| SnapshotRecord::new(s, generators))
        .collect();

    Ok(Json(records))
}

/// `GET /generators` → 200 + `Vec<GeneratorRecord>` JSON, in fleet order.
pub async fn get_generators(State(state): State<Arc<AppState>>) -> Json<Vec<GeneratorRecord>> {
    let records = state
        .result
        .generators
        .iter()
        .zip(&state.report.technologies)
        .map(|(g, t)| GeneratorRecord {
            name: g.name.clone(),
            technology: g.technology.clone(),
            p_nom_mw: g.p_nom_mw,
            marginal_cost: g.marginal_cost,
            renewable: g.renewable,
            energy_mwh: t.energy_mwh,
            capacity_factor_pct: t.capacity_factor_pct,
            price_setting_snapshots: t.price_setting_snapshots,
        })
        .collect();
    Json(records)
}
