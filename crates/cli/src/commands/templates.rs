//! Known templates and motor types

use anyhow::Result;
use motortest_common::NamedOption;
use serde::Serialize;

use crate::client::ApiClient;
use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRow {
    pub kind: &'static str,
    pub id: String,
    pub name: String,
}

impl OptionRow {
    fn new(kind: &'static str, option: NamedOption) -> Self {
        Self {
            kind,
            id: option.id,
            name: option.name,
        }
    }
}

impl TableDisplay for OptionRow {
    fn headers() -> Vec<&'static str> {
        vec!["Kind", "ID", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.kind.to_string(), self.id.clone(), self.name.clone()]
    }
}

pub fn rows(templates: Vec<NamedOption>, motor_types: Vec<NamedOption>) -> Vec<OptionRow> {
    templates
        .into_iter()
        .map(|o| OptionRow::new("template", o))
        .chain(motor_types.into_iter().map(|o| OptionRow::new("motor type", o)))
        .collect()
}

pub async fn execute(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (templates, motor_types) = tokio::join!(client.templates(), client.motor_types());
    print_list(&rows(templates?, motor_types?), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motortest_common::seed;

    fn options(source: Vec<seed::FieldSource>) -> Vec<NamedOption> {
        source.into_iter().map(|s| s.option).collect()
    }

    #[test]
    fn test_rows_list_templates_then_types() {
        let rows = rows(options(seed::templates()), options(seed::motor_types()));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].id, "template1");
        assert_eq!(rows[0].name, "Standard Test Protocol");
        assert_eq!(rows[3].kind, "motor type");
        assert_eq!(rows[3].id, "type1");
    }
}
