//! The query/save workflow: query-result lifecycle, chart-parameter
//! lifecycle, and the validation/persistence state machine with its
//! post-save branches.
//!
//! One workflow instance owns its result set and axis selection exclusively.
//! Each user action issues at most one outstanding collaborator request;
//! persistence failures are surfaced, never retried automatically.

use std::time::{Duration, Instant};
use tracing::warn;

use crate::backend::{ChartStore, DataBackend};
use crate::chart_data::{prepare_chart_data, AxisSelection, ChartType};
use crate::config::AppConfig;
use crate::definition::SaveRequest;
use crate::error::Error;
use crate::result_set::{self, ResultSet, Row};
use crate::validate::{validate_selection, ValidationFlags};

/// Observable workflow state. Validation, rejection, and the reset branches
/// are instantaneous transitions surfaced through flags and method results;
/// only persistence and the post-save confirmation are waiting states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// A save request has been handed to the persistence collaborator and
    /// its outcome has not been reported yet. Further saves are rejected.
    Persisting,
    /// The save succeeded; the user must choose a post-save branch before
    /// query and save actions unblock.
    AwaitingConfirmation,
}

/// Outcome of a save request.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    /// Validation failed; the flags say which fields. No collaborator call
    /// was made and the workflow stayed idle.
    Rejected(ValidationFlags),
    /// Validation passed. Submit this request to the store, then report the
    /// result via [`ChartWorkflow::complete_save`].
    Submit(SaveRequest),
}

/// The user's answer to the post-save prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostSaveChoice {
    /// Reuse the same query and result; only the chart bindings reset.
    KeepQuery,
    /// Start over: query text, result, columns, and chart type all reset.
    ResetAll,
}

/// Derived view-facing state, recomputed after every relevant input change.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowSnapshot {
    pub available_columns: Vec<String>,
    pub chart_data: Vec<Row>,
    pub flags: ValidationFlags,
    pub state: WorkflowState,
}

pub struct ChartWorkflow {
    sql_query: String,
    result: ResultSet,
    available_columns: Vec<String>,
    selection: AxisSelection,
    chart_type: ChartType,
    chart_data: Vec<Row>,
    title: String,
    description: String,
    flags: ValidationFlags,
    query_error: Option<String>,
    save_error: bool,
    query_success_until: Option<Instant>,
    save_success_until: Option<Instant>,
    state: WorkflowState,
    default_chart_type: ChartType,
    banner_duration: Duration,
}

impl Default for ChartWorkflow {
    fn default() -> Self {
        Self::with_config(&AppConfig::default())
    }
}

impl ChartWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            sql_query: String::new(),
            result: Vec::new(),
            available_columns: Vec::new(),
            selection: AxisSelection::default(),
            chart_type: config.default_chart_type,
            chart_data: Vec::new(),
            title: String::new(),
            description: String::new(),
            flags: ValidationFlags::default(),
            query_error: None,
            save_error: false,
            query_success_until: None,
            save_success_until: None,
            state: WorkflowState::Idle,
            default_chart_type: config.default_chart_type,
            banner_duration: Duration::from_secs(config.banner_secs),
        }
    }

    // --- accessors -------------------------------------------------------

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn sql_query(&self) -> &str {
        &self.sql_query
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn selection(&self) -> &AxisSelection {
        &self.selection
    }

    pub fn result(&self) -> &[Row] {
        &self.result
    }

    pub fn available_columns(&self) -> &[String] {
        &self.available_columns
    }

    pub fn chart_data(&self) -> &[Row] {
        &self.chart_data
    }

    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    pub fn query_error(&self) -> Option<&str> {
        self.query_error.as_deref()
    }

    pub fn save_error(&self) -> bool {
        self.save_error
    }

    /// Transient query-success banner; self-clears after the configured
    /// delay.
    pub fn query_success_visible(&self, now: Instant) -> bool {
        self.query_success_until.is_some_and(|until| now < until)
    }

    /// Transient save-success banner; self-clears after the configured
    /// delay. Independent of the confirmation prompt, which blocks until
    /// resolved.
    pub fn save_success_visible(&self, now: Instant) -> bool {
        self.save_success_until.is_some_and(|until| now < until)
    }

    /// Drop expired banner deadlines.
    pub fn tick(&mut self, now: Instant) {
        if !self.query_success_visible(now) {
            self.query_success_until = None;
        }
        if !self.save_success_visible(now) {
            self.save_success_until = None;
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            available_columns: self.available_columns.clone(),
            chart_data: self.chart_data.clone(),
            flags: self.flags,
            state: self.state,
        }
    }

    // --- form mutators ---------------------------------------------------

    pub fn set_sql(&mut self, text: impl Into<String>) {
        self.sql_query = text.into();
    }

    /// Corrective edits clear the field's error until the next save attempt.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.flags.title_error = false;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    pub fn set_x_axis(&mut self, column: impl Into<String>) {
        self.selection.x_axis = column.into();
        self.refresh_chart_data();
    }

    pub fn set_y_axis(&mut self, column: impl Into<String>) {
        self.selection.y_axis = column.into();
        self.refresh_chart_data();
    }

    pub fn set_group_by(&mut self, column: impl Into<String>) {
        self.selection.group_by = column.into();
        self.refresh_chart_data();
    }

    /// Recompute the derived dataset from the current (result, selection).
    /// Pure recomputation: no hidden state feeds into it.
    fn refresh_chart_data(&mut self) {
        self.chart_data = prepare_chart_data(&self.result, &self.selection);
        if !self.chart_data.is_empty() {
            self.flags.visualization_error = false;
        }
    }

    // --- query lifecycle -------------------------------------------------

    /// Run the current query text through the backend.
    ///
    /// Empty text is an input error, surfaced inline without a backend
    /// call. On success, all chart-derived state (selection, chart data,
    /// chart type, title, description, flags) resets before the new result
    /// and its columns become visible, so no stale bindings survive. On
    /// failure, the collaborator's message is stored and the prior result
    /// is cleared.
    pub fn run_query(&mut self, backend: &impl DataBackend, now: Instant) -> Result<(), Error> {
        self.ensure_idle()?;

        if self.sql_query.trim().is_empty() {
            let err = Error::Input("query text is required".into());
            self.query_error = Some(err.to_string());
            return Err(err);
        }

        self.query_error = None;
        match backend.execute_query(&self.sql_query) {
            Ok(rows) => {
                self.reset_chart_bindings();
                self.chart_type = self.default_chart_type;
                self.save_success_until = None;
                self.result = rows;
                self.available_columns = result_set::columns(&self.result);
                self.refresh_chart_data();
                self.query_success_until = Some(now + self.banner_duration);
                Ok(())
            }
            Err(err) => {
                self.result.clear();
                self.available_columns.clear();
                self.refresh_chart_data();
                self.query_success_until = None;
                self.query_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // --- save state machine ----------------------------------------------

    /// Request a save: validate, and either reject (flags set, no
    /// collaborator call) or construct the atomic save request and enter
    /// `Persisting`. Re-entrant requests while persisting or awaiting
    /// confirmation are rejected.
    pub fn begin_save(&mut self) -> Result<SaveOutcome, Error> {
        self.ensure_idle()?;

        self.save_error = false;
        self.save_success_until = None;
        self.flags = validate_selection(&self.title, &self.chart_data, &self.selection);
        if !self.flags.ok() {
            return Ok(SaveOutcome::Rejected(self.flags));
        }

        let request = SaveRequest::from_form(
            &self.title,
            &self.description,
            self.chart_type,
            &self.sql_query,
            &self.selection,
            &self.chart_data,
        )
        .map_err(|e| Error::Persistence(e.to_string()))?;

        self.state = WorkflowState::Persisting;
        Ok(SaveOutcome::Submit(request))
    }

    /// Report the persistence outcome for the in-flight save. Failure keeps
    /// the form editable for a manual retry; success arms the save banner
    /// and blocks on the post-save confirmation.
    pub fn complete_save(&mut self, outcome: Result<(), Error>, now: Instant) {
        if self.state != WorkflowState::Persisting {
            warn!("save completion reported with no save in flight");
            return;
        }
        match outcome {
            Ok(()) => {
                self.save_success_until = Some(now + self.banner_duration);
                self.state = WorkflowState::AwaitingConfirmation;
            }
            Err(err) => {
                warn!(error = %err, "chart save failed");
                self.save_error = true;
                self.state = WorkflowState::Idle;
            }
        }
    }

    /// Convenience driver composing [`Self::begin_save`], the store call,
    /// and [`Self::complete_save`].
    pub fn save_with(
        &mut self,
        store: &impl ChartStore,
        now: Instant,
    ) -> Result<SaveOutcome, Error> {
        match self.begin_save()? {
            SaveOutcome::Rejected(flags) => Ok(SaveOutcome::Rejected(flags)),
            SaveOutcome::Submit(request) => {
                let result = store.save_chart(&request);
                self.complete_save(result, now);
                Ok(SaveOutcome::Submit(request))
            }
        }
    }

    /// Resolve the post-save prompt. `KeepQuery` retains the query text and
    /// result set; `ResetAll` clears everything and reverts the chart type
    /// to its default. Both branches return to `Idle`.
    pub fn resolve_confirmation(&mut self, choice: PostSaveChoice) -> Result<(), Error> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Err(Error::Input("no save confirmation to resolve".into()));
        }
        self.reset_chart_bindings();
        if choice == PostSaveChoice::ResetAll {
            self.sql_query.clear();
            self.result.clear();
            self.available_columns.clear();
            self.chart_type = self.default_chart_type;
            self.query_error = None;
            self.query_success_until = None;
        }
        self.state = WorkflowState::Idle;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), Error> {
        match self.state {
            WorkflowState::Idle => Ok(()),
            WorkflowState::Persisting => Err(Error::SaveInFlight),
            WorkflowState::AwaitingConfirmation => Err(Error::ConfirmationPending),
        }
    }

    /// Clear the chart bindings shared by both reset branches and by a new
    /// query: selection, chart data, title, description, and flags.
    fn reset_chart_bindings(&mut self) {
        self.selection.clear();
        self.chart_data.clear();
        self.title.clear();
        self.description.clear();
        self.flags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_set::Scalar;

    struct StaticBackend {
        rows: ResultSet,
    }

    impl DataBackend for StaticBackend {
        fn list_tables(&self) -> Result<Vec<String>, Error> {
            Ok(Vec::new())
        }

        fn fetch_table(&self, _name: &str) -> Result<ResultSet, Error> {
            Ok(Vec::new())
        }

        fn execute_query(&self, _sql: &str) -> Result<ResultSet, Error> {
            Ok(self.rows.clone())
        }
    }

    fn backend() -> StaticBackend {
        StaticBackend {
            rows: vec![
                [("region", Scalar::from("A")), ("sales", Scalar::from("10"))]
                    .into_iter()
                    .collect(),
            ],
        }
    }

    #[test]
    fn snapshot_tracks_derived_state() {
        let mut wf = ChartWorkflow::new();
        wf.set_sql("select * from orders");
        wf.run_query(&backend(), Instant::now()).unwrap();

        let snap = wf.snapshot();
        assert_eq!(snap.available_columns, ["region", "sales"]);
        assert!(snap.chart_data.is_empty());
        assert_eq!(snap.state, WorkflowState::Idle);

        wf.set_x_axis("region");
        wf.set_y_axis("sales");
        assert_eq!(wf.snapshot().chart_data.len(), 1);
    }

    #[test]
    fn axis_edits_recompute_chart_data() {
        let mut wf = ChartWorkflow::new();
        wf.set_sql("q");
        wf.run_query(&backend(), Instant::now()).unwrap();

        wf.set_x_axis("region");
        assert!(wf.chart_data().is_empty());
        wf.set_y_axis("sales");
        assert_eq!(wf.chart_data().len(), 1);
        wf.set_y_axis("");
        assert!(wf.chart_data().is_empty());
    }

    #[test]
    fn banners_expire_after_configured_delay() {
        let mut wf = ChartWorkflow::new();
        wf.set_sql("q");
        let t0 = Instant::now();
        wf.run_query(&backend(), t0).unwrap();

        assert!(wf.query_success_visible(t0 + Duration::from_secs(2)));
        assert!(!wf.query_success_visible(t0 + Duration::from_secs(4)));
    }

    #[test]
    fn title_edit_clears_title_error() {
        let mut wf = ChartWorkflow::new();
        wf.begin_save().unwrap(); // rejected: everything empty
        assert!(wf.flags().title_error);
        wf.set_title("Sales");
        assert!(!wf.flags().title_error);
    }
}
