//! Company creation and lookup.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::HasId;
use crate::validate::{self, FormCheck};

use super::ApiClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Join code handed out to members.
    #[serde(default)]
    pub code: Option<String>,
}

impl HasId for Company {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCompany {
    pub name: String,
}

impl ApiClient {
    pub async fn create_company(&self, company: &NewCompany) -> Result<Company> {
        FormCheck::new()
            .check("name", validate::required(&company.name, "Company name"))
            .finish()?;
        let created: Company = self.post(&["companies"], company).await?;
        self.session().set_company_id(Some(created.id.clone()))?;
        Ok(created)
    }

    pub async fn company_by_code(&self, code: &str) -> Result<Company> {
        self.get(&["companies", "code", code.trim()]).await
    }
}
