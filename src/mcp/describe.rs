//! Flat display records for MCP tool descriptors.

use rmcp::model::Tool;
use serde::Serialize;

/// Display-oriented view of one tool: everything the catalog listing prints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolSummary {
    pub name: String,
    /// Human-readable title, when the server annotated one.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Read-only behavioral hint; `None` when the server did not declare it.
    pub read_only: Option<bool>,
    /// Destructive behavioral hint; `None` when the server did not declare it.
    pub destructive: Option<bool>,
    /// Input field names, in the order the schema declares them.
    pub inputs: Vec<String>,
}

/// Flatten a tool descriptor for display.
///
/// Pure and total over well-formed tools: absent annotations yield `None`
/// fields, an absent `properties` object yields an empty input list.
#[must_use]
pub fn summarize(tool: &Tool) -> ToolSummary {
    let annotations = tool.annotations.as_ref();

    let inputs = tool
        .input_schema
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    ToolSummary {
        name: tool.name.to_string(),
        title: annotations.and_then(|a| a.title.clone()),
        description: tool.description.as_ref().map(ToString::to_string),
        read_only: annotations.and_then(|a| a.read_only_hint),
        destructive: annotations.and_then(|a| a.destructive_hint),
        inputs,
    }
}

/// Render summaries as an aligned plain-text table.
#[must_use]
pub fn render_table(tools: &[ToolSummary]) -> String {
    fn flag(v: Option<bool>) -> &'static str {
        match v {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        }
    }

    let headers = ["NAME", "RO", "DESTRUCTIVE", "INPUTS"];
    let rows: Vec<[String; 4]> = tools
        .iter()
        .map(|t| {
            [
                t.name.clone(),
                flag(t.read_only).to_string(),
                flag(t.destructive).to_string(),
                t.inputs.join(", "),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for (&w, h) in widths.iter().zip(headers.iter()) {
        out.push_str(&format!("{h:<w$}  "));
    }
    out.push_str("DESCRIPTION\n");

    for (row, t) in rows.iter().zip(tools.iter()) {
        for (&w, cell) in widths.iter().zip(row.iter()) {
            out.push_str(&format!("{cell:<w$}  "));
        }
        out.push_str(&truncate(t.description.as_deref().unwrap_or("-"), 72));
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let head: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ToolAnnotations;
    use serde_json::json;
    use std::sync::Arc;

    fn tool(annotations: Option<ToolAnnotations>, schema: serde_json::Value) -> Tool {
        Tool {
            name: "web_search".to_string().into(),
            description: Some("Search the web for a query".to_string().into()),
            input_schema: Arc::new(schema.as_object().unwrap().clone()),
            title: None,
            output_schema: None,
            annotations,
            icons: None,
            meta: None,
        }
    }

    #[test]
    fn missing_annotations_yield_none_fields() {
        let summary = summarize(&tool(None, json!({ "type": "object" })));
        assert_eq!(summary.name, "web_search");
        assert_eq!(summary.title, None);
        assert_eq!(summary.read_only, None);
        assert_eq!(summary.destructive, None);
    }

    #[test]
    fn missing_properties_yield_empty_inputs() {
        let summary = summarize(&tool(None, json!({ "type": "object" })));
        assert!(summary.inputs.is_empty());
    }

    #[test]
    fn inputs_follow_schema_declaration_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "url": { "type": "string" },
                "count": { "type": "integer" }
            },
            "required": ["url"]
        });
        let summary = summarize(&tool(None, schema));
        assert_eq!(summary.inputs, vec!["url", "count"]);
    }

    #[test]
    fn annotations_propagate() {
        let annotations = ToolAnnotations {
            title: Some("Web Search".to_string()),
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: None,
            open_world_hint: None,
        };
        let summary = summarize(&tool(Some(annotations), json!({ "type": "object" })));
        assert_eq!(summary.title.as_deref(), Some("Web Search"));
        assert_eq!(summary.read_only, Some(true));
        assert_eq!(summary.destructive, Some(false));
    }

    #[test]
    fn table_lists_every_tool() {
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } }
        });
        let summaries = vec![summarize(&tool(None, schema))];
        let table = render_table(&summaries);

        let mut lines = table.lines();
        assert!(lines.next().unwrap().starts_with("NAME"));
        let row = lines.next().unwrap();
        assert!(row.contains("web_search"));
        assert!(row.contains("query"));
    }
}
