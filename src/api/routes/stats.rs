use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::config::{ViewConfig, ViewOverrides};
use crate::models::{
    AggregateEntry, CompositionRecord, GemCombination, GemUsage, KeyLevelBucket, KeyLevelRecord,
    RankedView, Role, SlotChoice, SlotUsage, SpecChoice, SpecUsage, TalentBuild,
    TalentBuildUsage, TeamComposition,
};
use crate::views::{self, CompositionScope};

/// Body of every stats request: the records plus view parameters.
#[derive(Debug, Deserialize)]
pub struct StatsRequest<R> {
    pub records: Vec<R>,
    #[serde(default)]
    pub config: ViewOverrides,
    #[serde(default)]
    pub dungeon: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub spec_name: Option<String>,
}

impl<R> StatsRequest<R> {
    fn view_config(&self, state: &AppState) -> ViewConfig {
        state.view_defaults.merged(&self.config)
    }

    fn dungeon(&self) -> Option<&str> {
        self.dungeon
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

fn required_param(value: &Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
}

pub async fn best_items(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<SlotUsage>>, JsonRejection>,
) -> Result<Json<Vec<AggregateEntry<SlotChoice>>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("best items over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::best_items_by_slot(&req.records, &config)?))
}

pub async fn best_enchants(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<SlotUsage>>, JsonRejection>,
) -> Result<Json<Vec<AggregateEntry<SlotChoice>>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("best enchants over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::best_enchants_by_slot(&req.records, &config)?))
}

pub async fn slot_table(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<SlotUsage>>, JsonRejection>,
) -> Result<Json<Vec<RankedView<SlotChoice>>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("slot table over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::slot_usage_table(&req.records, &config)?))
}

pub async fn gem_overview(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<GemUsage>>, JsonRejection>,
) -> Result<Json<RankedView<GemCombination>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("gem overview over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::gem_combination_overview(&req.records, &config)?))
}

pub async fn gems_by_slot(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<GemUsage>>, JsonRejection>,
) -> Result<Json<Vec<RankedView<GemCombination>>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("gems by slot over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::gem_combinations_by_slot(&req.records, &config)?))
}

pub async fn compositions(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<CompositionRecord>>, JsonRejection>,
) -> Result<Json<RankedView<TeamComposition>>, ApiError> {
    let Json(req) = payload?;
    let config = req.view_config(&state);
    let scope = match req.dungeon() {
        Some(dungeon) => CompositionScope::Dungeon(dungeon.to_string()),
        None => CompositionScope::Global,
    };
    tracing::debug!(
        "compositions over {} records, scope {:?}",
        req.records.len(),
        scope
    );
    Ok(Json(views::team_compositions(&req.records, &scope, &config)?))
}

pub async fn key_levels(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<KeyLevelRecord>>, JsonRejection>,
) -> Result<Json<RankedView<KeyLevelBucket>>, ApiError> {
    let Json(req) = payload?;
    tracing::debug!("key levels over {} records", req.records.len());
    let config = req.view_config(&state);
    Ok(Json(views::key_level_distribution(&req.records, &config)?))
}

pub async fn specs(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<SpecUsage>>, JsonRejection>,
) -> Result<Json<RankedView<SpecChoice>>, ApiError> {
    let Json(req) = payload?;
    let config = req.view_config(&state);
    let role: Role = required_param(&req.role, "role")?
        .parse()
        .map_err(ApiError::BadRequest)?;
    tracing::debug!("{} specs over {} records", role, req.records.len());

    let view = match req.dungeon() {
        Some(dungeon) => views::spec_usage_by_dungeon_role(&req.records, dungeon, role, &config)?,
        None => views::spec_usage_by_role(&req.records, role, &config)?,
    };
    Ok(Json(view))
}

pub async fn talents(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest<TalentBuildUsage>>, JsonRejection>,
) -> Result<Json<RankedView<TalentBuild>>, ApiError> {
    let Json(req) = payload?;
    let config = req.view_config(&state);
    let class_name = required_param(&req.class_name, "class_name")?;
    let spec_name = required_param(&req.spec_name, "spec_name")?;
    tracing::debug!(
        "talent builds for {} {} over {} records",
        spec_name,
        class_name,
        req.records.len()
    );

    Ok(Json(views::talent_builds(
        &req.records,
        &class_name,
        &spec_name,
        &config,
    )?))
}
