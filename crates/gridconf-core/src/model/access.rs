//! Access-control records: user-set lists, projects and users

use super::Entity;
use serde::{Deserialize, Serialize};

/// A user-set list (ACL or department)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSetListConfig {
    pub name: String,
    /// `ACL`, `DEPT` or both
    #[serde(rename = "type")]
    pub list_type: String,
    pub fshare: i64,
    pub oticket: i64,
    /// Users and `@group`s
    pub entries: Vec<String>,
}

impl Entity for UserSetListConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub oticket: i64,
    pub fshare: i64,
    /// User-set lists allowed to submit into the project
    pub acl: Vec<String>,
    /// User-set lists denied
    pub xacl: Vec<String>,
}

impl Entity for ProjectConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    pub oticket: i64,
    pub fshare: i64,
    pub delete_time: i64,
    /// Project name or `NONE`
    pub default_project: String,
}

impl Entity for UserConfig {
    fn name(&self) -> &str {
        &self.name
    }
}
