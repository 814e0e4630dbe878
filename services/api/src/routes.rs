use crate::infra::{deserialize_optional_date, today, AppState, ComplianceState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use fleet_compliance::compliance::report::views::FleetReportSummary;
use fleet_compliance::compliance::{
    ComplianceDocument, ComplianceScore, DatedItem, Entity, HierarchyBuilder, MissingParentPolicy,
    SeverityTier, StatusClassifier,
};
use fleet_compliance::error::AppError;
use fleet_compliance::import::FleetImporter;
use fleet_compliance::notifications::{
    CategoryState, NotificationChannel, NotificationPreference, NotificationType,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassifyRequest {
    pub(crate) items: Vec<ComplianceDocument>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifiedItem {
    pub(crate) item_id: String,
    pub(crate) item_kind: &'static str,
    pub(crate) expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) days_remaining: Option<i64>,
    pub(crate) tier: SeverityTier,
    pub(crate) tier_label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyResponse {
    pub(crate) as_of: NaiveDate,
    pub(crate) items: Vec<ClassifiedItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateRequest {
    pub(crate) tiers: Vec<SeverityTier>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AggregateResponse {
    #[serde(flatten)]
    pub(crate) score: ComplianceScore,
    pub(crate) tier_label: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportRequest {
    #[serde(default)]
    pub(crate) entities: Vec<Entity>,
    #[serde(default)]
    pub(crate) fleet_csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) horizon_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HierarchyRequest {
    pub(crate) entities: Vec<Entity>,
    #[serde(default)]
    pub(crate) missing_parent: Option<MissingParentPolicy>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveRequest {
    pub(crate) preferences: Vec<NotificationPreference>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResolvedRoute {
    #[serde(rename = "type")]
    pub(crate) notification_type: NotificationType,
    pub(crate) enabled: bool,
    pub(crate) critical: bool,
    pub(crate) channels: Vec<NotificationChannel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryToggleRequest {
    pub(crate) preferences: Vec<NotificationPreference>,
    pub(crate) category: String,
    pub(crate) enabled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryToggleResponse {
    pub(crate) category: String,
    pub(crate) state: CategoryState,
    pub(crate) preferences: Vec<NotificationPreference>,
}

pub(crate) fn with_compliance_routes(state: ComplianceState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(compliance_router(state))
}

pub(crate) fn compliance_router(state: ComplianceState) -> Router {
    Router::new()
        .route("/api/v1/compliance/classify", post(classify_endpoint))
        .route("/api/v1/compliance/aggregate", post(aggregate_endpoint))
        .route("/api/v1/compliance/report", post(report_endpoint))
        .route("/api/v1/hierarchy", post(hierarchy_endpoint))
        .route("/api/v1/notifications/resolve", post(resolve_endpoint))
        .route("/api/v1/notifications/category", post(category_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn classify_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    let as_of = payload.as_of.unwrap_or_else(today);
    let classifier = state.engine.classifier();

    let items = payload
        .items
        .iter()
        .map(|item| {
            let expiry_date = item.expiry_date();
            let tier = classifier.classify_item(item, as_of);
            ClassifiedItem {
                item_id: item.item_id().to_string(),
                item_kind: item.kind_label(),
                expiry_date,
                days_remaining: expiry_date
                    .map(|expiry| StatusClassifier::days_remaining(expiry, as_of)),
                tier,
                tier_label: tier.label(),
            }
        })
        .collect();

    Json(ClassifyResponse { as_of, items })
}

pub(crate) async fn aggregate_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<AggregateRequest>,
) -> Json<AggregateResponse> {
    let score = state.engine.aggregator().aggregate(&payload.tiers);
    let tier_label = score.dominant_tier.label();
    Json(AggregateResponse { score, tier_label })
}

pub(crate) async fn report_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<FleetReportSummary>, AppError> {
    let ReportRequest {
        mut entities,
        fleet_csv,
        as_of,
        horizon_days,
    } = payload;

    if let Some(csv) = fleet_csv {
        let imported = FleetImporter::from_reader(Cursor::new(csv.into_bytes()))?;
        entities.extend(imported);
    }

    let as_of = as_of.unwrap_or_else(today);
    let engine = match horizon_days {
        Some(days) => state.engine.with_upcoming_horizon(days),
        None => state.engine,
    };

    let report = engine.report(&entities, as_of)?;
    debug!(
        entities = report.entities.len(),
        orphans = report.orphans.len(),
        %as_of,
        "fleet report built"
    );
    Ok(Json(report.summary()))
}

pub(crate) async fn hierarchy_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<HierarchyRequest>,
) -> Result<Response, AppError> {
    let builder = match payload.missing_parent {
        Some(policy) => HierarchyBuilder::new(policy),
        None => *state.engine.hierarchy_builder(),
    };

    let hierarchy = builder.build(&payload.entities)?;
    Ok(Json(hierarchy).into_response())
}

pub(crate) async fn resolve_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<ResolveRequest>,
) -> Json<Vec<ResolvedRoute>> {
    let routes = payload
        .preferences
        .iter()
        .map(|pref| ResolvedRoute {
            notification_type: pref.notification_type,
            enabled: pref.enabled,
            critical: state.routing.is_critical(pref.notification_type),
            channels: state.routing.resolve_channels(pref).into_iter().collect(),
        })
        .collect();

    Json(routes)
}

pub(crate) async fn category_endpoint(
    State(state): State<ComplianceState>,
    Json(payload): Json<CategoryToggleRequest>,
) -> Result<Json<CategoryToggleResponse>, AppError> {
    let preferences = state.routing.set_category_enabled(
        &payload.preferences,
        &payload.category,
        payload.enabled,
    )?;
    let state_after = state.routing.category_state(&preferences, &payload.category)?;
    let category = state.routing.category(&payload.category)?.name.clone();

    Ok(Json(CategoryToggleResponse {
        category,
        state: state_after,
        preferences,
    }))
}
