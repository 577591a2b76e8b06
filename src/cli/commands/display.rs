//! Shared rendering for dependency listings.

use crate::requirements::Dependency;
use crate::ui::{Table, UserInterface};

const DASH: &str = "—";

/// Table of dependencies with an optional trailing column per row.
pub fn dependency_table<'a, I>(
    ui: &dyn UserInterface,
    rows: I,
    extra_header: Option<&str>,
) -> Table
where
    I: IntoIterator<Item = (&'a Dependency, Option<String>)>,
{
    let mut headers = vec!["Package", "Policy", "Target", "Installed", "Latest", "Status"];
    if let Some(header) = extra_header {
        headers.push(header);
    }
    let mut table = Table::new(headers);

    for (dep, extra) in rows {
        let mut row = vec![
            dep.package.clone(),
            dep.policy.to_string(),
            dep.target.clone(),
            dep.installed.clone().unwrap_or_else(|| DASH.to_string()),
            dep.latest.clone().unwrap_or_else(|| DASH.to_string()),
            ui.format_status(dep.status),
        ];
        if extra_header.is_some() {
            row.push(extra.unwrap_or_default());
        }
        table.add_row(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DependencyStatus, Policy};
    use crate::ui::MockUI;

    #[test]
    fn unknown_versions_render_as_dash() {
        let ui = MockUI::new();
        let mut dep = Dependency::new("jq", Policy::Restricted, "1.7.1");
        dep.status = DependencyStatus::Installing;

        let rendered = dependency_table(&ui, [(&dep, None)], None).render();

        assert!(rendered.contains("jq"));
        assert!(rendered.contains("restricted"));
        assert!(rendered.contains("installing"));
        assert!(rendered.contains(DASH));
    }

    #[test]
    fn extra_column_is_optional() {
        let ui = MockUI::new();
        let dep = Dependency::new("jq", Policy::Latest, "1.7.1");

        let with = dependency_table(&ui, [(&dep, Some("install 1.7.1".to_string()))], Some("Action"));
        assert!(with.render().contains("install 1.7.1"));

        let without = dependency_table(&ui, [(&dep, None)], None);
        assert!(!without.render().contains("Action"));
    }
}
