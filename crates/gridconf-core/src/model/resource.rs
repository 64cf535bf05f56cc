//! Schedulable resources: calendars, complex entries, checkpoint
//! interfaces, parallel environments and resource quota sets

use super::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    #[serde(rename = "calendar_name")]
    pub name: String,
    pub year: String,
    pub week: String,
}

impl Entity for CalendarConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One row of the complex (resource attribute) table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexEntryConfig {
    pub name: String,
    pub shortcut: String,
    /// `INT`, `DOUBLE`, `MEMORY`, `TIME`, `STRING`, `BOOL`, `RSMAP`, ...
    #[serde(rename = "type")]
    pub value_type: String,
    pub relop: String,
    /// `YES` or `NO`
    pub requestable: String,
    /// `YES`, `NO`, `JOB` or `HOST`
    pub consumable: String,
    pub default: String,
    pub urgency: i64,
}

impl Entity for ComplexEntryConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Checkpointing interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CkptInterfaceConfig {
    #[serde(rename = "ckpt_name")]
    pub name: String,
    pub interface: String,
    pub clean_command: String,
    #[serde(rename = "ckpt_command")]
    pub checkpoint_command: String,
    pub migr_command: String,
    pub restart_command: String,
    #[serde(rename = "ckpt_dir")]
    pub checkpoint_dir: String,
    pub signal: String,
    pub when: String,
}

impl Entity for CkptInterfaceConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Parallel environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelEnvironmentConfig {
    #[serde(rename = "pe_name")]
    pub name: String,
    pub slots: i64,
    pub user_lists: Vec<String>,
    pub xuser_lists: Vec<String>,
    pub start_proc_args: String,
    pub stop_proc_args: String,
    pub allocation_rule: String,
    pub control_slaves: String,
    pub job_is_first_task: bool,
    pub urgency_slots: String,
    pub accounting_summary: bool,
    #[serde(rename = "ign_sreq_on_mhost")]
    pub ignore_slave_requests_on_master_host: bool,
    pub master_forks_slaves: bool,
    pub daemon_forks_slaves: bool,
}

impl Entity for ParallelEnvironmentConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Resource quota set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotaSetConfig {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Rule lines, e.g. `users {*} to slots=10`
    pub limits: Vec<String>,
}

impl Entity for ResourceQuotaSetConfig {
    fn name(&self) -> &str {
        &self.name
    }
}
