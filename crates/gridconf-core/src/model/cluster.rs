//! Cluster-wide records: environment, global and scheduler configuration,
//! and per-host configuration overrides.

use super::Entity;
use serde::{Deserialize, Serialize};

/// Installation identity of a cluster (read-only, never diffed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterEnvironment {
    #[serde(rename = "sge_name")]
    pub name: String,
    #[serde(rename = "sge_root")]
    pub root: String,
    #[serde(rename = "sge_cell")]
    pub cell: String,
    #[serde(rename = "sge_qmaster_port")]
    pub qmaster_port: u16,
    #[serde(rename = "sge_execd_port")]
    pub execd_port: u16,
    #[serde(rename = "sge_version")]
    pub version: String,
}

/// The global cluster configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub execd_spool_dir: String,
    pub mailer: String,
    pub xterm: String,
    #[serde(rename = "load_sensor")]
    pub load_sensors: Vec<String>,
    pub prolog: String,
    pub epilog: String,
    pub shell_start_mode: String,
    pub login_shells: Vec<String>,
    pub min_uid: i64,
    pub min_gid: i64,
    pub user_lists: Vec<String>,
    pub xuser_lists: Vec<String>,
    pub projects: Vec<String>,
    pub xprojects: Vec<String>,
    pub enforce_project: String,
    pub enforce_user: String,
    pub load_report_time: String,
    pub max_unheard: String,
    pub reschedule_unknown: String,
    #[serde(rename = "loglevel")]
    pub log_level: String,
    pub administrator_mail: String,
    pub set_token_cmd: String,
    pub pag_cmd: String,
    pub token_extend_time: String,
    pub shepherd_cmd: String,
    pub qmaster_params: Vec<String>,
    pub execd_params: Vec<String>,
    pub reporting_params: Vec<String>,
    pub finished_jobs: i64,
    pub gid_range: Vec<String>,
    pub qlogin_command: String,
    pub qlogin_daemon: String,
    pub rlogin_command: String,
    pub rlogin_daemon: String,
    pub rsh_command: String,
    pub rsh_daemon: String,
    pub max_aj_instances: i64,
    pub max_aj_tasks: i64,
    pub max_u_jobs: i64,
    pub max_jobs: i64,
    pub max_advance_reservations: i64,
    pub auto_user_oticket: i64,
    pub auto_user_fshare: i64,
    pub auto_user_default_project: String,
    pub auto_user_delete_time: i64,
    pub delegated_file_staging: bool,
    pub reprioritize: i64,
    pub jsv_url: String,
    pub jsv_allowed_mod: Vec<String>,
}

/// Scheduler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub algorithm: String,
    pub schedule_interval: String,
    #[serde(rename = "maxujobs")]
    pub max_u_jobs: i64,
    pub queue_sort_method: String,
    pub job_load_adjustments: Vec<String>,
    pub load_adjustment_decay_time: String,
    pub load_formula: String,
    pub schedd_job_info: String,
    pub flush_submit_sec: i64,
    pub flush_finish_sec: i64,
    pub params: Vec<String>,
    pub reprioritize_interval: String,
    pub halftime: i64,
    pub usage_weight_list: Vec<String>,
    pub compensation_factor: f64,
    pub weight_user: f64,
    pub weight_project: f64,
    pub weight_department: f64,
    pub weight_job: f64,
    pub weight_tickets_functional: i64,
    pub weight_tickets_share: i64,
    pub share_override_tickets: bool,
    pub share_functional_shares: bool,
    pub max_functional_jobs_to_schedule: i64,
    pub report_pjob_tickets: bool,
    pub max_pending_tasks_per_job: i64,
    pub halflife_decay_list: Vec<String>,
    pub policy_hierarchy: String,
    pub weight_ticket: f64,
    pub weight_waiting_time: f64,
    pub weight_deadline: f64,
    pub weight_urgency: f64,
    pub weight_priority: f64,
    pub max_reservation: i64,
    pub default_duration: String,
}

/// Host-local configuration overriding the global one
///
/// `None` means "inherit from the global configuration", which is distinct
/// from an explicitly empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfiguration {
    #[serde(rename = "hostname")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execd_spool_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xterm: Option<String>,
    #[serde(rename = "load_sensor", skip_serializing_if = "Vec::is_empty")]
    pub load_sensors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prolog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epilog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell_start_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub login_shells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_report_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_token_cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pag_cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_extend_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shepherd_cmd: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub execd_params: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reporting_params: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gid_range: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qlogin_daemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qlogin_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsh_daemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsh_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rlogin_daemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rlogin_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reschedule_unknown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libjvm_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_jvm_args: Option<String>,
}

impl Entity for HostConfiguration {
    fn name(&self) -> &str {
        &self.name
    }
}
