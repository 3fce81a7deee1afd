//! Session commands: login, register, logout, whoami, members.

use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::{CommandOutput, Workspace, value_or_stdin};
use crate::api::auth::{Credentials, Registration};
use crate::cli::OutputOptions;
use crate::display::{initials, resolve_avatar, tables};
use crate::error::Result;
use crate::types::{User, UserRole};

fn signed_in_text(verb: &str, user: &User) -> String {
    format!(
        "{verb} as {} <{}>",
        user.display_name().if_supports_color(Stdout, |s| s.bold()),
        user.email
    )
}

pub async fn cmd_login(email: String, password: Option<String>, output: OutputOptions) -> Result<()> {
    let workspace = Workspace::load()?;
    let password = value_or_stdin(password, "password")?;
    let user = workspace
        .client
        .login(&Credentials { email, password })
        .await?;

    CommandOutput::new(json!({ "user": user, "company_id": workspace.session().company_id() }))
        .with_text(signed_in_text("Signed in", &user))
        .print(output)
}

pub async fn cmd_register(
    fullname: String,
    email: String,
    password: Option<String>,
    role: Option<UserRole>,
    output: OutputOptions,
) -> Result<()> {
    let workspace = Workspace::load()?;
    let password = value_or_stdin(password, "password")?;
    let user = workspace
        .client
        .register(&Registration {
            fullname,
            email,
            password,
            role,
        })
        .await?;

    CommandOutput::new(json!({ "user": user }))
        .with_text(signed_in_text("Registered and signed in", &user))
        .print(output)
}

pub fn cmd_logout() -> Result<()> {
    let workspace = Workspace::load()?;
    if !workspace.session().is_signed_in() {
        println!("Not signed in");
        return Ok(());
    }
    workspace.session().sign_out()?;
    println!("Signed out");
    Ok(())
}

pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let user = workspace.session().user().unwrap_or_default();
    let company_id = workspace.session().company_id();
    let avatar = resolve_avatar(user.avatar.as_deref(), workspace.client.base_url());

    let mut text = format!(
        "[{}] {}\n",
        initials(&user.fullname),
        user.display_name().if_supports_color(Stdout, |s| s.bold())
    );
    text.push_str(&format!("email:   {}\n", user.email));
    if let Some(role) = user.role {
        text.push_str(&format!("role:    {role}\n"));
    }
    text.push_str(&format!(
        "company: {}",
        company_id.as_deref().unwrap_or("(none)")
    ));
    if let Some(avatar) = &avatar {
        if !avatar.starts_with("data:") {
            text.push_str(&format!("\navatar:  {avatar}"));
        }
    }

    CommandOutput::new(json!({
        "user": user,
        "company_id": company_id,
        "avatar": avatar,
        "api": workspace.client.base_url(),
    }))
    .with_text(text)
    .print(output)
}

pub async fn cmd_members(output: OutputOptions) -> Result<()> {
    let workspace = Workspace::signed_in()?;
    let company_id = workspace.company_id()?;
    let members = workspace.client.company_members(&company_id).await?;

    let text = if members.is_empty() {
        "No members yet".to_string()
    } else {
        tables::member_table(&members)
    };
    CommandOutput::new(json!({ "company_id": company_id, "members": members }))
        .with_text(text)
        .print(output)
}
