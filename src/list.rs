//! Value types passed in and out of [`MailManager`](crate::MailManager).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Name of a list as Mailman knows it. Case-sensitive, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListName(String);

impl ListName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Configuration("list name must not be empty".to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ListName {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<ListName> for String {
    fn from(name: ListName) -> Self {
        name.0
    }
}

/// One row of `list_lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    /// Empty when Mailman has no description for the list.
    pub description: String,
}

/// Arguments for `newlist`. Required fields are optional here so a request
/// built from loose input can be checked in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateListRequest {
    pub name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub url_host: Option<String>,
    pub email_host: Option<String>,
    pub language: Option<String>,
}

/// A request that passed [`CreateListRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList<'a> {
    pub name: &'a str,
    pub admin_email: &'a str,
    pub admin_password: &'a str,
    pub url_host: Option<&'a str>,
    pub email_host: Option<&'a str>,
    pub language: Option<&'a str>,
}

impl CreateListRequest {
    pub fn new(
        name: impl Into<String>,
        admin_email: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            admin_email: Some(admin_email.into()),
            admin_password: Some(admin_password.into()),
            ..Self::default()
        }
    }

    /// Fail on the first missing or empty required field.
    pub fn validate(&self) -> Result<NewList<'_>> {
        fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
            match value.as_deref() {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(Error::Configuration(format!("missing required field: {field}"))),
            }
        }

        Ok(NewList {
            name: required("name", &self.name)?,
            admin_email: required("admin_email", &self.admin_email)?,
            admin_password: required("admin_password", &self.admin_password)?,
            url_host: self.url_host.as_deref().filter(|v| !v.is_empty()),
            email_host: self.email_host.as_deref().filter(|v| !v.is_empty()),
            language: self.language.as_deref().filter(|v| !v.is_empty()),
        })
    }
}

/// What a successful [`create_list`](crate::MailManager::create_list) did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCreated {
    pub name: String,
    /// The alias block appended to the aliases file, header included.
    pub aliases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_name_is_rejected() {
        assert!(matches!(ListName::new(""), Err(Error::Configuration(_))));
        assert_eq!(ListName::new("Foo").unwrap().as_str(), "Foo");
    }

    #[test]
    fn list_name_deserializes_through_validation() {
        let name: ListName = serde_json::from_str("\"foo\"").unwrap();
        assert_eq!(name.to_string(), "foo");
        assert!(serde_json::from_str::<ListName>("\"\"").is_err());
    }

    #[test]
    fn validate_accepts_complete_request() {
        let req = CreateListRequest::new("foo", "foo@bar.baz", "qux");
        let list = req.validate().unwrap();
        assert_eq!(list.name, "foo");
        assert_eq!(list.admin_email, "foo@bar.baz");
        assert_eq!(list.admin_password, "qux");
        assert_eq!(list.url_host, None);
    }

    #[test]
    fn validate_names_the_missing_field() {
        let cases = [
            ("name", CreateListRequest { name: None, ..CreateListRequest::new("", "a@b.c", "p") }),
            ("admin_email", CreateListRequest { admin_email: None, ..CreateListRequest::new("foo", "", "p") }),
            ("admin_password", CreateListRequest { admin_password: None, ..CreateListRequest::new("foo", "a@b.c", "") }),
        ];
        for (field, req) in cases {
            match req.validate() {
                Err(Error::Configuration(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected configuration error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_required_string_counts_as_missing() {
        let req = CreateListRequest::new("foo", "foo@bar.baz", "");
        assert!(matches!(req.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn request_deserializes_from_partial_json() {
        let req: CreateListRequest =
            serde_json::from_str(r#"{"name": "foo", "url_host": "lists.example.org"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("foo"));
        assert_eq!(req.url_host.as_deref(), Some("lists.example.org"));
        assert!(req.admin_email.is_none());
    }
}
