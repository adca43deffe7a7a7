//! Trim copy — duplicate a configuration across model years.
//!
//! DESIGN
//! ======
//! A copy runs in two phases. The planning phase looks up, for every target
//! year, whether a configuration with the source's name already exists, and
//! refuses the whole batch when any would be overwritten without permission.
//! Nothing is written until planning succeeds. The write phase then issues one
//! create-or-update per year.
//!
//! Field selection works on named groups (basic info, components,
//! dimensions) or on individual fields. A selected field is copied only when
//! its source value passes the value filter: `truthy` skips NULL, `""`, `0`
//! and `false`; `present` skips only NULL.
//!
//! ERROR HANDLING
//! ==============
//! Per-year writes are independent and not rolled back on a sibling's
//! failure. Each failure is logged and recorded on that year's outcome, so
//! `created + updated + failed` always equals the number of target years.
//! A failed lookup during planning aborts before any write.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use super::configuration::{self, Configuration};
use super::motorcycle;
use super::payload::require_text;
use super::rows::{self, ColumnValue, Columns};
use crate::error::CatalogError;

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    BasicInfo,
    Components,
    Dimensions,
}

/// A copyable configuration column. `name` and `is_default` are not copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    Description,
    TrimLevel,
    MarketRegion,
    MsrpUsd,
    PricePremiumUsd,
    ColorOptions,
    EngineId,
    BrakeSystemId,
    FrameId,
    SuspensionId,
    WheelId,
    SeatHeightMm,
    WeightKg,
    WheelbaseMm,
    GroundClearanceMm,
    FuelCapacityL,
}

impl ConfigField {
    pub const ALL: [Self; 16] = [
        Self::Description,
        Self::TrimLevel,
        Self::MarketRegion,
        Self::MsrpUsd,
        Self::PricePremiumUsd,
        Self::ColorOptions,
        Self::EngineId,
        Self::BrakeSystemId,
        Self::FrameId,
        Self::SuspensionId,
        Self::WheelId,
        Self::SeatHeightMm,
        Self::WeightKg,
        Self::WheelbaseMm,
        Self::GroundClearanceMm,
        Self::FuelCapacityL,
    ];

    #[must_use]
    pub fn group(self) -> FieldGroup {
        match self {
            Self::Description
            | Self::TrimLevel
            | Self::MarketRegion
            | Self::MsrpUsd
            | Self::PricePremiumUsd
            | Self::ColorOptions => FieldGroup::BasicInfo,
            Self::EngineId | Self::BrakeSystemId | Self::FrameId | Self::SuspensionId | Self::WheelId => {
                FieldGroup::Components
            }
            Self::SeatHeightMm
            | Self::WeightKg
            | Self::WheelbaseMm
            | Self::GroundClearanceMm
            | Self::FuelCapacityL => FieldGroup::Dimensions,
        }
    }

    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::TrimLevel => "trim_level",
            Self::MarketRegion => "market_region",
            Self::MsrpUsd => "msrp_usd",
            Self::PricePremiumUsd => "price_premium_usd",
            Self::ColorOptions => "color_options",
            Self::EngineId => "engine_id",
            Self::BrakeSystemId => "brake_system_id",
            Self::FrameId => "frame_id",
            Self::SuspensionId => "suspension_id",
            Self::WheelId => "wheel_id",
            Self::SeatHeightMm => "seat_height_mm",
            Self::WeightKg => "weight_kg",
            Self::WheelbaseMm => "wheelbase_mm",
            Self::GroundClearanceMm => "ground_clearance_mm",
            Self::FuelCapacityL => "fuel_capacity_l",
        }
    }

    /// Read this field from a configuration as a typed column value.
    #[must_use]
    pub fn read(self, source: &Configuration) -> ColumnValue {
        match self {
            Self::Description => ColumnValue::Text(source.description.clone()),
            Self::TrimLevel => ColumnValue::Text(source.trim_level.clone()),
            Self::MarketRegion => ColumnValue::Text(source.market_region.clone()),
            Self::MsrpUsd => ColumnValue::Int(source.msrp_usd),
            Self::PricePremiumUsd => ColumnValue::Int(source.price_premium_usd),
            Self::ColorOptions => ColumnValue::TextList(source.color_options.clone()),
            Self::EngineId => ColumnValue::Id(source.engine_id),
            Self::BrakeSystemId => ColumnValue::Id(source.brake_system_id),
            Self::FrameId => ColumnValue::Id(source.frame_id),
            Self::SuspensionId => ColumnValue::Id(source.suspension_id),
            Self::WheelId => ColumnValue::Id(source.wheel_id),
            Self::SeatHeightMm => ColumnValue::Int(source.seat_height_mm),
            Self::WeightKg => ColumnValue::Float(source.weight_kg),
            Self::WheelbaseMm => ColumnValue::Int(source.wheelbase_mm),
            Self::GroundClearanceMm => ColumnValue::Int(source.ground_clearance_mm),
            Self::FuelCapacityL => ColumnValue::Float(source.fuel_capacity_l),
        }
    }
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FieldSelection {
    Groups {
        #[serde(default)]
        basic_info: bool,
        #[serde(default)]
        components: bool,
        #[serde(default)]
        dimensions: bool,
    },
    Fields {
        #[serde(default)]
        fields: BTreeSet<ConfigField>,
    },
}

impl FieldSelection {
    #[must_use]
    pub fn all() -> Self {
        Self::Groups { basic_info: true, components: true, dimensions: true }
    }

    #[must_use]
    pub fn includes(&self, field: ConfigField) -> bool {
        match self {
            Self::Groups { basic_info, components, dimensions } => match field.group() {
                FieldGroup::BasicInfo => *basic_info,
                FieldGroup::Components => *components,
                FieldGroup::Dimensions => *dimensions,
            },
            Self::Fields { fields } => fields.contains(&field),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !ConfigField::ALL.iter().any(|f| self.includes(*f))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFilter {
    /// Skip NULL, empty text, zero and `false`.
    #[default]
    Truthy,
    /// Skip only NULL.
    Present,
}

impl ValueFilter {
    #[must_use]
    pub fn accepts(self, value: &ColumnValue) -> bool {
        match self {
            Self::Truthy => value.is_truthy(),
            Self::Present => !value.is_null(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopyRequest {
    pub target_year_ids: Vec<Uuid>,
    pub selection: FieldSelection,
    #[serde(default)]
    pub allow_overwrite: bool,
    #[serde(default)]
    pub value_filter: ValueFilter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickCopyRequest {
    pub name: Option<String>,
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Fields to write on each target, keyed by field.
pub type CopyPayload = BTreeMap<ConfigField, ColumnValue>;

/// Pick the selected source fields that pass the value filter.
#[must_use]
pub fn build_payload(source: &Configuration, selection: &FieldSelection, filter: ValueFilter) -> CopyPayload {
    ConfigField::ALL
        .iter()
        .filter(|field| selection.includes(**field))
        .filter_map(|field| {
            let value = field.read(source);
            filter.accepts(&value).then_some((*field, value))
        })
        .collect()
}

#[must_use]
pub fn payload_columns(payload: &CopyPayload) -> Columns {
    payload
        .iter()
        .map(|(field, value)| (field.column(), value.clone()))
        .collect()
}

// =============================================================================
// PLAN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedWrite {
    pub model_year_id: Uuid,
    /// Same-named configuration already in the target year.
    pub existing: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    pub writes: Vec<PlannedWrite>,
}

impl CopyPlan {
    #[must_use]
    pub fn creates(&self) -> usize {
        self.writes.iter().filter(|w| w.existing.is_none()).count()
    }

    #[must_use]
    pub fn updates(&self) -> usize {
        self.writes.iter().filter(|w| w.existing.is_some()).count()
    }

    /// # Errors
    ///
    /// Returns `OverwriteBlocked` with the number of years that would be
    /// overwritten when `allow_overwrite` is false.
    pub fn check_overwrite(&self, allow_overwrite: bool) -> Result<(), CatalogError> {
        let blocked = self.updates();
        if blocked > 0 && !allow_overwrite {
            return Err(CatalogError::OverwriteBlocked { blocked });
        }
        Ok(())
    }
}

/// Drop repeated target ids, keeping first-seen order.
#[must_use]
pub fn dedupe_targets(targets: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    targets.iter().copied().filter(|id| seen.insert(*id)).collect()
}

// =============================================================================
// STORE
// =============================================================================

/// The three configuration operations a copy needs.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn find_by_name(&self, model_year_id: Uuid, name: &str) -> Result<Option<Uuid>, CatalogError>;

    async fn create(&self, model_year_id: Uuid, name: &str, payload: &CopyPayload) -> Result<Uuid, CatalogError>;

    async fn update(&self, configuration_id: Uuid, payload: &CopyPayload) -> Result<(), CatalogError>;
}

/// Postgres-backed store over `model_configurations`.
pub struct PgConfigurationStore {
    pool: PgPool,
}

impl PgConfigurationStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigurationStore for PgConfigurationStore {
    async fn find_by_name(&self, model_year_id: Uuid, name: &str) -> Result<Option<Uuid>, CatalogError> {
        configuration::find_id_by_name(&self.pool, model_year_id, name).await
    }

    async fn create(&self, model_year_id: Uuid, name: &str, payload: &CopyPayload) -> Result<Uuid, CatalogError> {
        let mut columns = payload_columns(payload);
        columns.push(("model_year_id", ColumnValue::Id(Some(model_year_id))));
        columns.push(("name", ColumnValue::Text(Some(name.to_owned()))));
        rows::insert_row(&self.pool, "model_configurations", &columns).await
    }

    async fn update(&self, configuration_id: Uuid, payload: &CopyPayload) -> Result<(), CatalogError> {
        let columns = payload_columns(payload);
        rows::update_row(&self.pool, "model_configurations", "configuration", configuration_id, &columns).await
    }
}

// =============================================================================
// COPY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOutcome {
    pub model_year_id: Uuid,
    pub action: CopyAction,
    pub success: bool,
    pub configuration_id: Option<Uuid>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopySummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub copied_fields: Vec<ConfigField>,
    pub outcomes: Vec<YearOutcome>,
}

impl CopySummary {
    fn record(&mut self, outcome: YearOutcome) {
        match (outcome.success, outcome.action) {
            (false, _) => self.failed += 1,
            (true, CopyAction::Created) => self.created += 1,
            (true, CopyAction::Updated) => self.updated += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Look up every target year and build the write plan.
///
/// # Errors
///
/// Returns the first lookup error.
pub async fn plan_copy<S: ConfigurationStore + ?Sized>(
    store: &S,
    name: &str,
    targets: &[Uuid],
) -> Result<CopyPlan, CatalogError> {
    let mut plan = CopyPlan::default();
    for model_year_id in targets {
        let existing = store.find_by_name(*model_year_id, name).await?;
        plan.writes.push(PlannedWrite { model_year_id: *model_year_id, existing });
    }
    Ok(plan)
}

/// Copy `source` into each target year, creating or updating by name.
///
/// # Errors
///
/// Returns a validation error for an empty target list, an empty field
/// selection, or a target equal to the source's own year; `OverwriteBlocked`
/// when same-named configurations exist and overwrite is off; or a lookup
/// error. Per-year write failures do not error; they are counted in the
/// summary.
pub async fn copy_configuration<S: ConfigurationStore + ?Sized>(
    store: &S,
    source: &Configuration,
    request: &CopyRequest,
) -> Result<CopySummary, CatalogError> {
    let targets = dedupe_targets(&request.target_year_ids);
    if targets.is_empty() {
        return Err(CatalogError::validation("select at least one target year"));
    }
    if targets.contains(&source.model_year_id) {
        return Err(CatalogError::validation(
            "target years must not include the source configuration's own year",
        ));
    }
    if request.selection.is_empty() {
        return Err(CatalogError::validation("select at least one field to copy"));
    }

    // PHASE: PLAN
    // No writes happen unless every lookup succeeds and overwrite is allowed.
    let plan = plan_copy(store, &source.name, &targets).await?;
    plan.check_overwrite(request.allow_overwrite)?;

    let payload = build_payload(source, &request.selection, request.value_filter);
    let mut summary = CopySummary { copied_fields: payload.keys().copied().collect(), ..CopySummary::default() };

    // PHASE: WRITE
    for write in &plan.writes {
        let (action, result) = match write.existing {
            None => (CopyAction::Created, store.create(write.model_year_id, &source.name, &payload).await),
            Some(existing_id) => (
                CopyAction::Updated,
                store.update(existing_id, &payload).await.map(|()| existing_id),
            ),
        };
        let outcome = match result {
            Ok(configuration_id) => YearOutcome {
                model_year_id: write.model_year_id,
                action,
                success: true,
                configuration_id: Some(configuration_id),
                error: None,
            },
            Err(e) => {
                error!(
                    error = %e,
                    source_id = %source.id,
                    model_year_id = %write.model_year_id,
                    ?action,
                    "configuration copy failed for year"
                );
                YearOutcome {
                    model_year_id: write.model_year_id,
                    action,
                    success: false,
                    configuration_id: write.existing,
                    error: Some(e.to_string()),
                }
            }
        };
        summary.record(outcome);
    }

    info!(
        source_id = %source.id,
        created = summary.created,
        updated = summary.updated,
        failed = summary.failed,
        fields = summary.copied_fields.len(),
        "configuration copy finished"
    );
    Ok(summary)
}

/// Duplicate `source` inside its own year under `new_name`, copying every
/// non-NULL field. The copy is never the default.
///
/// # Errors
///
/// Returns a validation error for a blank name, a conflict when the name is
/// taken in that year, or the store's error.
pub async fn quick_copy<S: ConfigurationStore + ?Sized>(
    store: &S,
    source: &Configuration,
    new_name: Option<String>,
) -> Result<Uuid, CatalogError> {
    let name = require_text("name", new_name)?;
    if store.find_by_name(source.model_year_id, &name).await?.is_some() {
        return Err(CatalogError::Conflict(format!(
            "a configuration named \"{name}\" already exists in this year"
        )));
    }
    let payload = build_payload(source, &FieldSelection::all(), ValueFilter::Present);
    let id = store.create(source.model_year_id, &name, &payload).await?;
    info!(source_id = %source.id, %id, "configuration duplicated");
    Ok(id)
}

// =============================================================================
// POSTGRES ENTRY POINTS
// =============================================================================

/// Load the source, check targets belong to the same model, then copy.
///
/// # Errors
///
/// Returns `NotFound` for an unknown source, a validation error for targets
/// outside the source's model, or any error of [`copy_configuration`].
pub async fn copy_to_years(pool: &PgPool, source_id: Uuid, request: &CopyRequest) -> Result<CopySummary, CatalogError> {
    let source = configuration::get_configuration(pool, source_id).await?;
    let source_year = motorcycle::get_year(pool, source.model_year_id).await?;
    let sibling_years: HashSet<Uuid> = motorcycle::list_years(pool, source_year.model_id)
        .await?
        .into_iter()
        .map(|y| y.id)
        .collect();
    if let Some(stranger) = request
        .target_year_ids
        .iter()
        .find(|id| !sibling_years.contains(id))
    {
        return Err(CatalogError::validation(format!(
            "target year {stranger} does not belong to this model"
        )));
    }

    let store = PgConfigurationStore::new(pool.clone());
    copy_configuration(&store, &source, request).await
}

/// Duplicate a stored configuration within its year.
///
/// # Errors
///
/// Returns `NotFound` for an unknown source or any error of [`quick_copy`].
pub async fn quick_copy_by_id(pool: &PgPool, source_id: Uuid, new_name: Option<String>) -> Result<Configuration, CatalogError> {
    let source = configuration::get_configuration(pool, source_id).await?;
    let store = PgConfigurationStore::new(pool.clone());
    let id = quick_copy(&store, &source, new_name).await?;
    configuration::get_configuration(pool, id).await
}

#[cfg(test)]
#[path = "trim_copy_test.rs"]
mod tests;
