//! Prepare chart data from a result set: pass every row through with a
//! numeric y value, or reduce groups to their mean when grouping is active.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::result_set::{Row, Scalar};

/// Chart type offered by the binding form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
}

impl ChartType {
    pub const ALL: [Self; 4] = [Self::Bar, Self::Line, Self::Pie, Self::Scatter];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
        }
    }
}

/// The user's current choice of x column, y column, and optional grouping
/// column. An empty string means unselected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisSelection {
    pub x_axis: String,
    pub y_axis: String,
    pub group_by: String,
}

impl AxisSelection {
    /// Chart rendering requires both x and y; group-by stays optional.
    pub fn chart_ready(&self) -> bool {
        !self.x_axis.is_empty() && !self.y_axis.is_empty()
    }

    /// True when any axis or the grouping column is selected (the
    /// `isParameterized` marker of a saved definition).
    pub fn any_selected(&self) -> bool {
        !self.x_axis.is_empty() || !self.y_axis.is_empty() || !self.group_by.is_empty()
    }

    pub fn group_active(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub fn clear(&mut self) {
        self.x_axis.clear();
        self.y_axis.clear();
        self.group_by.clear();
    }
}

/// Build the ready-to-plot dataset for the current `(rows, selection)`.
///
/// Purely a function of its inputs: identical inputs yield identical output.
/// Returns an empty dataset unless both x and y are selected and `rows` is
/// non-empty. Without grouping, every row passes through with its y field
/// coerced to a number (output length == input length). With grouping, one
/// row is emitted per distinct group key, in first-appearance order.
pub fn prepare_chart_data(rows: &[Row], selection: &AxisSelection) -> Vec<Row> {
    if rows.is_empty() || !selection.chart_ready() {
        return Vec::new();
    }

    let data = if selection.group_active() {
        aggregate_groups(rows, selection)
    } else {
        rows.to_vec()
    };

    // Every output row carries a numeric y. Grouped rows already do (the
    // mean of a non-empty group is finite); pass-through rows get the lossy
    // zero-default coercion here.
    data.into_iter()
        .map(|mut row| {
            let y = row.value(&selection.y_axis).to_number();
            row.set(selection.y_axis.clone(), Scalar::Num(y));
            row
        })
        .collect()
}

struct Group {
    x: Scalar,
    key_value: Scalar,
    sum: f64,
    count: usize,
}

/// Partition by the canonical string form of the group-by value and reduce
/// each group's y to its arithmetic mean. First-seen x and group values are
/// retained; a y parse failure contributes 0 to the sum but still counts.
fn aggregate_groups(rows: &[Row], selection: &AxisSelection) -> Vec<Row> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for row in rows {
        let key_value = row.value(&selection.group_by);
        let key = key_value.canonical_key();
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                x: row.value(&selection.x_axis),
                key_value,
                sum: 0.0,
                count: 0,
            }
        });
        group.sum += row.value(&selection.y_axis).to_number();
        group.count += 1;
    }

    order
        .iter()
        .map(|key| {
            let group = &groups[key];
            let mut row = Row::new();
            row.set(selection.x_axis.clone(), group.x.clone());
            row.set(selection.group_by.clone(), group.key_value.clone());
            row.set(
                selection.y_axis.clone(),
                Scalar::Num(group.sum / group.count as f64),
            );
            row
        })
        .collect()
}
