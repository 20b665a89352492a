//! Student (user) request types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Update user request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    /// Student to update; the query string is taken by the borrow route
    #[serde(rename = "StudentID")]
    pub student_id: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub mid_initial: Option<String>,
    pub email: Option<String>,
    pub contact_num: Option<String>,
}

/// Fields written to every student matched by an update
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid_initial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_num: Option<String>,
}

impl From<UpdateStudent> for StudentChanges {
    fn from(data: UpdateStudent) -> Self {
        Self {
            last_name: data.last_name,
            first_name: data.first_name,
            mid_initial: data.mid_initial,
            email: data.email,
            contact_num: data.contact_num,
        }
    }
}
