//! Canned API payloads.

use serde_json::{Value, json};

pub fn user() -> Value {
    json!({
        "_id": "u1",
        "fullname": "Ada Lovelace",
        "email": "ada@example.com",
        "role": "developer",
        "company_id": "c1"
    })
}

pub fn issue(id: &str, title: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "issue_key": format!("WEB-{}", id.trim_start_matches('i')),
        "title": title,
        "issue_type": "bug",
        "status": status,
        "priority": "high",
        "project_id": { "_id": "p1", "name": "Website", "key": "WEB" },
        "updated_at": "2024-05-02T10:00:00Z"
    })
}

pub fn project(id: &str, name: &str, key: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "key": key,
        "status": "active",
        "categories": ["web"],
        "start_date": "2024-01-01"
    })
}

/// `{ success: true, data }`
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// A successful envelope around one page of `docs`.
pub fn page(docs: Vec<Value>, page: u32, limit: u32, total_docs: u64) -> Value {
    ok(json!({
        "docs": docs,
        "page": page,
        "limit": limit,
        "totalDocs": total_docs,
    }))
}
