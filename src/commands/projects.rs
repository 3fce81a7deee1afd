//! Project commands.

use jiff::Zoned;
use serde_json::json;

use super::browse::run_browse;
use super::{
    CommandOutput, Workspace, ack_text, fetch_page, meta_json, render_list,
};
use crate::api::ApiClient;
use crate::api::projects::{ProjectForm, parse_categories};
use crate::cli::{OutputOptions, ProjectArgs, ProjectListArgs};
use crate::display::{project_status_badge, tables};
use crate::error::{DeskError, Result};
use crate::list::{
    FilterSet, ListController, ListQuery, ListSource, LiveList, ProjectDimension, ProjectFilters,
};
use crate::types::Project;

const CREATE_COMMAND: &str = "projects create";

fn project_query(args: &ProjectListArgs, default_limit: u32) -> Result<ListQuery<ProjectFilters>> {
    let mut query = ListQuery::<ProjectFilters>::new(args.limit.unwrap_or(default_limit));
    if let Some(search) = &args.search {
        query.search = search.trim().to_string();
    }
    if let Some(status) = &args.status {
        query.filters.set(ProjectDimension::Status, status)?;
    }
    query.page = args.page.max(1);
    Ok(query)
}

/// Resolve user input to a project id: an id, a key or a name from the
/// project names list. Unknown input is passed through as an id.
pub(crate) async fn resolve_project_id(client: &ApiClient, input: &str) -> Result<String> {
    let input = input.trim();
    let names = client.project_names().await?;
    let found = names.iter().find(|p| p.id == input).or_else(|| {
        names.iter().find(|p| {
            p.key
                .as_deref()
                .is_some_and(|key| key.eq_ignore_ascii_case(input))
                || p.name.eq_ignore_ascii_case(input)
        })
    });
    match found {
        Some(project) => Ok(project.id.clone()),
        None => {
            tracing::debug!(input, "no project name matched, using input as id");
            Ok(input.to_string())
        }
    }
}

/// Find the full project record for an id or key by searching the list.
async fn find_project(client: &ApiClient, input: &str) -> Result<Project> {
    let input = input.trim();
    let mut query = ListQuery::<ProjectFilters>::new(100);
    query.search = input.to_string();
    let page = client.fetch(&query).await?;
    let found = page
        .items
        .iter()
        .find(|p| p.id == input || p.key.eq_ignore_ascii_case(input))
        .cloned();
    if let Some(project) = found {
        return Ok(project);
    }

    // Ids are not searchable, so fall back to scanning unfiltered pages.
    let id = resolve_project_id(client, input).await?;
    let mut query = ListQuery::<ProjectFilters>::new(100);
    loop {
        let page = client.fetch(&query).await?.normalized();
        if let Some(project) = page.items.into_iter().find(|p| p.id == id) {
            return Ok(project);
        }
        if query.page >= page.total_pages {
            return Err(DeskError::Other(format!("project '{input}' not found")));
        }
        query.page += 1;
    }
}

pub async fn cmd_projects_ls(args: ProjectListArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let query = project_query(&args, workspace.page_size())?;
    let controller: ListController<Project, ProjectFilters> =
        fetch_page(&workspace.client, "projects", query).await?;

    CommandOutput::new(json!({
        "projects": controller.items(),
        "meta": meta_json(controller.meta()),
    }))
    .with_text(render_list(&controller, tables::project_table, CREATE_COMMAND))
    .print(output)
}

pub async fn cmd_projects_browse(args: ProjectListArgs) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let query = project_query(&args, workspace.page_size())?;
    let list = LiveList::new(
        workspace.client.clone(),
        ListController::<Project, ProjectFilters>::with_query("projects", query),
    );
    run_browse(list, tables::project_table, CREATE_COMMAND).await
}

pub async fn cmd_project_names(output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let names = workspace.client.project_names().await?;

    let text = if names.is_empty() {
        format!("No projects yet. Create the first one with `issuedesk {CREATE_COMMAND}`.")
    } else {
        names
            .iter()
            .map(|p| format!("{:10} {} ({})", p.key.as_deref().unwrap_or("-"), p.name, p.id))
            .collect::<Vec<_>>()
            .join("\n")
    };
    CommandOutput::new(json!({ "projects": names }))
        .with_text(text)
        .print(output)
}

/// Overlay the flags that were given onto `form`.
fn apply_changes(form: &mut ProjectForm, changes: ProjectArgs) {
    if let Some(name) = changes.name {
        form.name = name;
    }
    if let Some(key) = changes.key {
        form.key = key;
    }
    if let Some(description) = changes.description {
        form.description = description;
    }
    if let Some(lead) = changes.lead {
        form.project_lead = lead;
    }
    if !changes.members.is_empty() {
        form.team_members = changes.members;
    }
    if let Some(start) = changes.start {
        form.start_date = start;
    }
    if let Some(end) = changes.end {
        form.end_date = (!end.eq_ignore_ascii_case("none")).then_some(end);
    }
    if let Some(status) = changes.status {
        form.status = status;
    }
    if let Some(categories) = changes.categories {
        form.categories = parse_categories(&categories);
    }
}

fn project_text(verb: &str, project: &Project) -> String {
    format!(
        "{verb} project {} {} {}",
        project.key,
        project_status_badge(project.status),
        project.name
    )
}

pub async fn cmd_project_create(args: ProjectArgs, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let me = workspace.session().user().map(|u| u.id).unwrap_or_default();

    let mut form = ProjectForm {
        project_lead: me.clone(),
        start_date: Zoned::now().date().to_string(),
        ..Default::default()
    };
    apply_changes(&mut form, args);
    if form.team_members.is_empty() && !form.project_lead.is_empty() {
        form.team_members.push(form.project_lead.clone());
    }

    let project = workspace.client.create_project(&form).await?;
    CommandOutput::new(json!({ "project": project, "action": "created" }))
        .with_text(project_text("Created", &project))
        .print(output)
}

pub async fn cmd_project_update(
    input: &str,
    changes: ProjectArgs,
    output: OutputOptions,
) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let existing = find_project(&workspace.client, input).await?;
    let mut form = ProjectForm::from_project(&existing);
    apply_changes(&mut form, changes);

    let project = workspace.client.update_project(&existing.id, &form).await?;
    CommandOutput::new(json!({ "project": project, "action": "updated" }))
        .with_text(project_text("Updated", &project))
        .print(output)
}

pub async fn cmd_project_delete(input: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let id = resolve_project_id(&workspace.client, input).await?;
    let message = workspace.client.delete_project(&id).await?;
    CommandOutput::new(json!({ "id": id, "action": "deleted", "message": message }))
        .with_text(ack_text(message, format!("Deleted project {id}")))
        .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectStatus;

    #[test]
    fn test_project_query_from_flags() {
        let args = ProjectListArgs {
            search: Some(" web ".to_string()),
            status: Some("archived".to_string()),
            page: 2,
            limit: None,
        };
        let query = project_query(&args, 20).unwrap();
        assert_eq!(query.search, "web");
        assert_eq!(query.limit, 20);
        assert_eq!(query.page, 2);
        assert!(query.filters.is_active());
        assert!(project_query(
            &ProjectListArgs {
                status: Some("frozen".to_string()),
                ..Default::default()
            },
            10
        )
        .is_err());
    }

    #[test]
    fn test_apply_changes_only_touches_given_flags() {
        let mut form = ProjectForm {
            name: "Website".to_string(),
            key: "WEB".to_string(),
            end_date: Some("2024-09-01".to_string()),
            ..Default::default()
        };
        apply_changes(
            &mut form,
            ProjectArgs {
                end: Some("none".to_string()),
                status: Some(ProjectStatus::Completed),
                categories: Some("ui, api".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(form.name, "Website");
        assert_eq!(form.end_date, None);
        assert_eq!(form.status, ProjectStatus::Completed);
        assert_eq!(form.categories, vec!["ui", "api"]);
    }
}
