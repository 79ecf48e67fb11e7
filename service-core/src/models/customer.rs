use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Writable customer document, used for create and for full replacement on
/// update. Email uniqueness is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CustomerFields {
    #[validate(length(min = 1, message = "name and email are required"))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, message = "name and email are required"))]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Display name and email resolved for invoice listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerContact {
    pub id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_and_email_share_one_message() {
        let fields: CustomerFields = serde_json::from_str(r#"{"phone": "123"}"#).unwrap();
        let err = crate::error::AppError::from(fields.validate().unwrap_err());
        assert_eq!(err.client_message(), "name and email are required");
    }
}
