//! vizbind: bind ad-hoc query results to persisted chart definitions.
//!
//! Covers the pipeline from a tabular query result to a ready-to-plot
//! dataset (column extraction, optional grouped aggregation with a mean
//! reduction, total numeric coercion) and the validation/save state machine
//! around it, including the post-save keep-query and full-reset branches.
//! Chart rendering, query execution, and persistence are collaborator
//! contracts (see [`backend`]), not part of this crate.

pub mod backend;
pub mod catalog;
pub mod chart_data;
pub mod config;
pub mod definition;
pub mod error;
pub mod format;
pub mod result_set;
pub mod validate;
pub mod workflow;

pub use backend::{ChartStore, DataBackend};
pub use catalog::Catalog;
pub use chart_data::{prepare_chart_data, AxisSelection, ChartType};
pub use config::{AppConfig, ConfigManager};
pub use definition::{ChartDefinition, ChartParameters, SaveRequest};
pub use error::Error;
pub use result_set::{columns, ResultSet, Row, Scalar};
pub use validate::{validate_selection, ValidationFlags};
pub use workflow::{
    ChartWorkflow, PostSaveChoice, SaveOutcome, WorkflowSnapshot, WorkflowState,
};

/// Application name used for the config directory and other app-specific
/// paths.
pub const APP_NAME: &str = "vizbind";
