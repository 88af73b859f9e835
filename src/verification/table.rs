use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::chemistry::{depict, StructureToolkit, Visualization};
use crate::verification::{PredictionResult, FAILED_TO_RETRANSLATE};

pub const TABLE_STYLE: &str = r#"<style>
table.dataframe {
    border-collapse: collapse;
    font-family: sans-serif;
    font-size: 0.9em;
    width: 100%;
}
table.dataframe th {
    background-color: #3f51b5;
    color: #ffffff;
    text-align: left;
    padding: 8px 12px;
}
table.dataframe td {
    border-bottom: 1px solid #dddddd;
    padding: 8px 12px;
    white-space: pre-wrap;
}
table.dataframe tr:nth-of-type(even) {
    background-color: #f3f3f3;
}
</style>
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub retranslate: bool,
    pub visualize: bool,
}

/// Row-major table payload.
#[derive(Debug, Clone, PartialEq, Eq, Object, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub data: Vec<Vec<String>>,
}

/// Batch results laid out as a table with one row per input, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn build(
        results: &[PredictionResult],
        options: TableOptions,
        toolkit: &dyn StructureToolkit,
    ) -> Self {
        let mut columns = vec!["Original SMILES".to_string()];
        if options.visualize {
            columns.push("Original Structure".to_string());
        }
        columns.push("Predicted IUPAC name".to_string());
        if options.retranslate {
            columns.push("Retranslation".to_string());
            columns.push("Retranslated SMILES".to_string());
            if options.visualize {
                columns.push("Retranslated Structure".to_string());
            }
        }

        let rows = results
            .iter()
            .map(|result| Self::row(result, options, toolkit))
            .collect();

        Self { columns, rows }
    }

    fn row(
        result: &PredictionResult,
        options: TableOptions,
        toolkit: &dyn StructureToolkit,
    ) -> Vec<String> {
        let mut row = vec![result.input.clone()];
        if options.visualize {
            row.push(depict(toolkit, &result.input, Visualization::TwoD));
        }

        row.push(match &result.error {
            Some(error) => format!("error: {error}"),
            None => result.predicted.clone(),
        });

        if options.retranslate {
            let status = result
                .status
                .map(|status| status.label().to_string())
                .unwrap_or_default();
            let round_trip = result.round_trip.clone().unwrap_or_default();

            if options.visualize {
                let structure = if round_trip.is_empty() || round_trip == FAILED_TO_RETRANSLATE {
                    String::new()
                } else {
                    depict(toolkit, &round_trip, Visualization::TwoD)
                };
                row.extend([status, round_trip, structure]);
            } else {
                row.extend([status, round_trip]);
            }
        }

        row
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn to_data(&self) -> TableData {
        TableData {
            columns: self.columns.clone(),
            data: self.rows.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "columns": self.columns,
            "data": self.rows,
        })
    }

    /// Stylesheet followed by a `dataframe` table. Every cell is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from(TABLE_STYLE);
        html.push_str("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n");
        for column in &self.columns {
            html.push_str(&format!("      <th>{}</th>\n", escape_html(column)));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for row in &self.rows {
            html.push_str("    <tr>\n");
            for cell in row {
                html.push_str(&format!("      <td>{}</td>\n", escape_html(cell)));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
