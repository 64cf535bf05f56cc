//! Host groups and execution hosts

use super::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named set of hosts, referenced elsewhere as `@name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostGroupConfig {
    #[serde(rename = "group_name")]
    pub name: String,
    /// Hosts and nested `@hostgroup`s
    pub hostlist: Vec<String>,
}

impl Entity for HostGroupConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Execution host configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostExecConfig {
    #[serde(rename = "hostname")]
    pub name: String,
    /// Scales the reported load of a resource
    pub load_scaling: BTreeMap<String, f64>,
    /// Scales the reported usage of a resource
    pub usage_scaling: BTreeMap<String, f64>,
    pub complex_values: BTreeMap<String, String>,
    pub user_lists: Vec<String>,
    pub xuser_lists: Vec<String>,
    pub projects: Vec<String>,
    pub xprojects: Vec<String>,
    /// Resources reported by the host
    pub report_variables: Vec<String>,
}

impl Entity for HostExecConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HostExecConfig {
    /// Mutably borrow one of the ACL/project lists by attribute name
    pub fn list_attribute_mut(&mut self, attr: &str) -> Option<&mut Vec<String>> {
        match attr {
            "user_lists" => Some(&mut self.user_lists),
            "xuser_lists" => Some(&mut self.xuser_lists),
            "projects" => Some(&mut self.projects),
            "xprojects" => Some(&mut self.xprojects),
            "report_variables" => Some(&mut self.report_variables),
            _ => None,
        }
    }
}
