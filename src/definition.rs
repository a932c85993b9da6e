//! Persisted chart records: the write-once definition and its 1:1 parameter
//! row, bundled into a single atomic save request.

use serde::{Deserialize, Serialize};

use crate::chart_data::{AxisSelection, ChartType};
use crate::result_set::Row;

/// The chart definition as persisted. `chart_data` holds the prepared chart
/// points serialized as JSON, stored verbatim alongside the definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDefinition {
    pub title: String,
    pub description: String,
    pub chart_type: ChartType,
    pub sql_query: String,
    pub is_parameterized: bool,
    pub chart_data: String,
}

/// Axis/grouping parameters persisted 1:1 with a [`ChartDefinition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartParameters {
    pub param_x: String,
    pub param_y: String,
    pub group_by: Option<String>,
}

/// One atomic persistence submission: definition plus parameter record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub definition: ChartDefinition,
    pub parameters: ChartParameters,
}

impl SaveRequest {
    /// Materialize the records from the current form state. Only called
    /// after validation has passed; chart data is serialized here.
    pub fn from_form(
        title: &str,
        description: &str,
        chart_type: ChartType,
        sql_query: &str,
        selection: &AxisSelection,
        chart_data: &[Row],
    ) -> serde_json::Result<Self> {
        let definition = ChartDefinition {
            title: title.to_string(),
            description: description.to_string(),
            chart_type,
            sql_query: sql_query.to_string(),
            is_parameterized: selection.any_selected(),
            chart_data: serde_json::to_string(chart_data)?,
        };
        let parameters = ChartParameters {
            param_x: selection.x_axis.clone(),
            param_y: selection.y_axis.clone(),
            group_by: if selection.group_by.is_empty() {
                None
            } else {
                Some(selection.group_by.clone())
            },
        };
        Ok(SaveRequest {
            definition,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_set::Scalar;

    fn selection() -> AxisSelection {
        AxisSelection {
            x_axis: "region".into(),
            y_axis: "sales".into(),
            group_by: String::new(),
        }
    }

    fn chart_rows() -> Vec<Row> {
        vec![[("region", Scalar::from("A")), ("sales", Scalar::Num(15.0))]
            .into_iter()
            .collect()]
    }

    #[test]
    fn builds_records_from_form_state() {
        let request = SaveRequest::from_form(
            "Sales by region",
            "",
            ChartType::Bar,
            "select region, sales from orders",
            &selection(),
            &chart_rows(),
        )
        .unwrap();

        assert_eq!(request.definition.title, "Sales by region");
        assert!(request.definition.is_parameterized);
        assert_eq!(
            request.definition.chart_data,
            r#"[{"region":"A","sales":15.0}]"#
        );
        assert_eq!(request.parameters.param_x, "region");
        assert_eq!(request.parameters.param_y, "sales");
        assert_eq!(request.parameters.group_by, None);
    }

    #[test]
    fn empty_group_by_persists_as_null() {
        let mut sel = selection();
        let request =
            SaveRequest::from_form("t", "", ChartType::Line, "q", &sel, &chart_rows()).unwrap();
        assert_eq!(request.parameters.group_by, None);

        sel.group_by = "region".into();
        let request =
            SaveRequest::from_form("t", "", ChartType::Line, "q", &sel, &chart_rows()).unwrap();
        assert_eq!(request.parameters.group_by.as_deref(), Some("region"));
    }

    #[test]
    fn serializes_in_camel_case() {
        let request = SaveRequest::from_form(
            "t",
            "d",
            ChartType::Pie,
            "q",
            &selection(),
            &chart_rows(),
        )
        .unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"chartType\":\"pie\""));
        assert!(json.contains("\"sqlQuery\":\"q\""));
        assert!(json.contains("\"isParameterized\":true"));
        assert!(json.contains("\"paramX\":\"region\""));
        assert!(json.contains("\"groupBy\":null"));
    }
}
