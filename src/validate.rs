//! Save precondition checks for the chart binding form.

use crate::chart_data::AxisSelection;
use crate::result_set::Row;

/// Field-level validation results for a save attempt. Both flags false
/// permits the save; either flag true rejects it before any network call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationFlags {
    /// The trimmed title is empty (title is required).
    pub title_error: bool,
    /// No chart to save: chart data is empty or an axis is unselected.
    pub visualization_error: bool,
}

impl ValidationFlags {
    pub fn ok(self) -> bool {
        !self.title_error && !self.visualization_error
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Validate the form ahead of a save. Pure: no side effects, callable
/// independently of the save action. Description and group-by are optional
/// and never block.
pub fn validate_selection(
    title: &str,
    chart_data: &[Row],
    selection: &AxisSelection,
) -> ValidationFlags {
    ValidationFlags {
        title_error: title.trim().is_empty(),
        visualization_error: chart_data.is_empty() || !selection.chart_ready(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_set::Scalar;

    fn ready_selection() -> AxisSelection {
        AxisSelection {
            x_axis: "region".into(),
            y_axis: "sales".into(),
            group_by: String::new(),
        }
    }

    fn chart_rows() -> Vec<Row> {
        vec![[("region", Scalar::from("A")), ("sales", Scalar::Num(1.0))]
            .into_iter()
            .collect()]
    }

    #[test]
    fn valid_form_passes() {
        let flags = validate_selection("My chart", &chart_rows(), &ready_selection());
        assert!(flags.ok());
    }

    #[test]
    fn empty_title_with_valid_chart() {
        let flags = validate_selection("", &chart_rows(), &ready_selection());
        assert!(flags.title_error);
        assert!(!flags.visualization_error);
        assert!(!flags.ok());
    }

    #[test]
    fn whitespace_title_is_empty() {
        let flags = validate_selection("   \t", &chart_rows(), &ready_selection());
        assert!(flags.title_error);
    }

    #[test]
    fn never_ok_with_empty_chart_data() {
        let flags = validate_selection("Title", &[], &ready_selection());
        assert!(flags.visualization_error);
        assert!(!flags.ok());
    }

    #[test]
    fn missing_axis_flags_visualization() {
        let mut selection = ready_selection();
        selection.y_axis.clear();
        let flags = validate_selection("Title", &chart_rows(), &selection);
        assert!(flags.visualization_error);
    }

    #[test]
    fn group_by_and_description_never_block() {
        let mut selection = ready_selection();
        selection.group_by = "region".into();
        let flags = validate_selection("Title", &chart_rows(), &selection);
        assert!(flags.ok());
    }
}
