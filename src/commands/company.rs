use serde_json::json;

use super::{CommandOutput, Workspace};
use crate::api::companies::NewCompany;
use crate::cli::OutputOptions;
use crate::error::Result;

pub async fn cmd_company_create(name: String, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let company = workspace
        .client
        .create_company(&NewCompany {
            name: name.trim().to_string(),
        })
        .await?;

    let mut text = format!("Created company {} ({})", company.name, company.id);
    if let Some(code) = &company.code {
        text.push_str(&format!("\nJoin code: {code}"));
    }
    CommandOutput::new(json!({ "company": company, "action": "created" }))
        .with_text(text)
        .print(output)
}

pub async fn cmd_company_lookup(code: &str, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::load()?;
    let company = workspace.client.company_by_code(code).await?;
    CommandOutput::new(json!({ "company": company }))
        .with_text(format!("{} ({})", company.name, company.id))
        .print(output)
}
