//! Cluster configuration data model
//!
//! A [`Snapshot`] aggregates singleton records, named collections and
//! scalar lists. Every collection is a `BTreeMap` keyed by entity name so
//! iteration (and therefore diffing, planning and serialization) is
//! deterministic.

pub mod access;
pub mod cluster;
pub mod host;
pub mod queue;
pub mod resource;
pub mod snapshot;

pub use access::{ProjectConfig, UserConfig, UserSetListConfig};
pub use cluster::{ClusterEnvironment, GlobalConfig, HostConfiguration, SchedulerConfig};
pub use host::{HostExecConfig, HostGroupConfig};
pub use queue::ClusterQueueConfig;
pub use resource::{
    CalendarConfig, CkptInterfaceConfig, ComplexEntryConfig, ParallelEnvironmentConfig,
    ResourceQuotaSetConfig,
};
pub use snapshot::{collection_from_entities, Collection, Snapshot};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name under which the global configuration is modified
pub const GLOBAL_CONFIG_NAME: &str = "global";
/// Name under which the scheduler configuration is modified
pub const SCHEDULER_CONFIG_NAME: &str = "scheduler";

/// Capabilities the diff engine needs from a collection member
///
/// Identity is the name alone; "unchanged" is structural equality of the
/// whole record.
pub trait Entity: Clone + PartialEq + fmt::Debug {
    fn name(&self) -> &str;
}

/// Scalar list members (admin hosts, managers, ...) are their own key.
impl Entity for String {
    fn name(&self) -> &str {
        self
    }
}

/// Every kind of managed object in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    UserSetList,
    Project,
    User,
    Manager,
    Operator,
    ComplexEntry,
    Calendar,
    CkptInterface,
    ParallelEnvironment,
    HostConfiguration,
    HostGroup,
    AdminHost,
    SubmitHost,
    ExecHost,
    ResourceQuotaSet,
    ClusterQueue,
    GlobalConfig,
    SchedulerConfig,
}

impl EntityKind {
    /// Kinds stored as named collections or scalar lists, in apply order
    ///
    /// Referenceable kinds come before the kinds that reference them so a
    /// plan can add in this order and delete in reverse.
    pub const APPLY_ORDER: [EntityKind; 16] = [
        EntityKind::UserSetList,
        EntityKind::Project,
        EntityKind::User,
        EntityKind::Manager,
        EntityKind::Operator,
        EntityKind::ComplexEntry,
        EntityKind::Calendar,
        EntityKind::CkptInterface,
        EntityKind::ParallelEnvironment,
        EntityKind::HostConfiguration,
        EntityKind::HostGroup,
        EntityKind::AdminHost,
        EntityKind::SubmitHost,
        EntityKind::ExecHost,
        EntityKind::ResourceQuotaSet,
        EntityKind::ClusterQueue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::UserSetList => "user_set_list",
            EntityKind::Project => "project",
            EntityKind::User => "user",
            EntityKind::Manager => "manager",
            EntityKind::Operator => "operator",
            EntityKind::ComplexEntry => "complex_entry",
            EntityKind::Calendar => "calendar",
            EntityKind::CkptInterface => "ckpt_interface",
            EntityKind::ParallelEnvironment => "parallel_environment",
            EntityKind::HostConfiguration => "host_configuration",
            EntityKind::HostGroup => "host_group",
            EntityKind::AdminHost => "admin_host",
            EntityKind::SubmitHost => "submit_host",
            EntityKind::ExecHost => "exec_host",
            EntityKind::ResourceQuotaSet => "resource_quota_set",
            EntityKind::ClusterQueue => "cluster_queue",
            EntityKind::GlobalConfig => "global_config",
            EntityKind::SchedulerConfig => "scheduler_config",
        }
    }

    /// True for kinds held as unordered string lists
    pub fn is_scalar_list(&self) -> bool {
        matches!(
            self,
            EntityKind::AdminHost
                | EntityKind::SubmitHost
                | EntityKind::Manager
                | EntityKind::Operator
        )
    }

    /// True for the global and scheduler configuration records
    pub fn is_singleton(&self) -> bool {
        matches!(self, EntityKind::GlobalConfig | EntityKind::SchedulerConfig)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entity record of any kind, as handed to the apply collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRecord {
    /// Member of a scalar list (admin host, submit host, manager, operator)
    Member(String),
    UserSetList(UserSetListConfig),
    Project(ProjectConfig),
    User(UserConfig),
    ComplexEntry(ComplexEntryConfig),
    Calendar(CalendarConfig),
    CkptInterface(CkptInterfaceConfig),
    ParallelEnvironment(ParallelEnvironmentConfig),
    HostConfiguration(HostConfiguration),
    HostGroup(HostGroupConfig),
    ExecHost(HostExecConfig),
    ResourceQuotaSet(ResourceQuotaSetConfig),
    ClusterQueue(ClusterQueueConfig),
    GlobalConfig(GlobalConfig),
    SchedulerConfig(SchedulerConfig),
}

impl EntityRecord {
    /// Identity of the record within its kind
    pub fn name(&self) -> &str {
        match self {
            EntityRecord::Member(name) => name,
            EntityRecord::UserSetList(r) => r.name(),
            EntityRecord::Project(r) => r.name(),
            EntityRecord::User(r) => r.name(),
            EntityRecord::ComplexEntry(r) => r.name(),
            EntityRecord::Calendar(r) => r.name(),
            EntityRecord::CkptInterface(r) => r.name(),
            EntityRecord::ParallelEnvironment(r) => r.name(),
            EntityRecord::HostConfiguration(r) => r.name(),
            EntityRecord::HostGroup(r) => r.name(),
            EntityRecord::ExecHost(r) => r.name(),
            EntityRecord::ResourceQuotaSet(r) => r.name(),
            EntityRecord::ClusterQueue(r) => r.name(),
            EntityRecord::GlobalConfig(_) => GLOBAL_CONFIG_NAME,
            EntityRecord::SchedulerConfig(_) => SCHEDULER_CONFIG_NAME,
        }
    }

    /// Kind of the record; `None` for a bare scalar-list member, whose kind
    /// is only known from the list it sits in
    pub fn kind(&self) -> Option<EntityKind> {
        let kind = match self {
            EntityRecord::Member(_) => return None,
            EntityRecord::UserSetList(_) => EntityKind::UserSetList,
            EntityRecord::Project(_) => EntityKind::Project,
            EntityRecord::User(_) => EntityKind::User,
            EntityRecord::ComplexEntry(_) => EntityKind::ComplexEntry,
            EntityRecord::Calendar(_) => EntityKind::Calendar,
            EntityRecord::CkptInterface(_) => EntityKind::CkptInterface,
            EntityRecord::ParallelEnvironment(_) => EntityKind::ParallelEnvironment,
            EntityRecord::HostConfiguration(_) => EntityKind::HostConfiguration,
            EntityRecord::HostGroup(_) => EntityKind::HostGroup,
            EntityRecord::ExecHost(_) => EntityKind::ExecHost,
            EntityRecord::ResourceQuotaSet(_) => EntityKind::ResourceQuotaSet,
            EntityRecord::ClusterQueue(_) => EntityKind::ClusterQueue,
            EntityRecord::GlobalConfig(_) => EntityKind::GlobalConfig,
            EntityRecord::SchedulerConfig(_) => EntityKind::SchedulerConfig,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_order_covers_every_non_singleton_kind_once() {
        let mut seen = std::collections::BTreeSet::new();
        for kind in EntityKind::APPLY_ORDER {
            assert!(!kind.is_singleton());
            assert!(seen.insert(kind), "{} listed twice", kind);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_referenceable_kinds_precede_queues() {
        let pos = |k: EntityKind| {
            EntityKind::APPLY_ORDER
                .iter()
                .position(|x| *x == k)
                .expect("kind in order")
        };
        let queue = pos(EntityKind::ClusterQueue);
        for k in [
            EntityKind::ParallelEnvironment,
            EntityKind::Project,
            EntityKind::HostGroup,
            EntityKind::UserSetList,
            EntityKind::CkptInterface,
            EntityKind::Calendar,
        ] {
            assert!(pos(k) < queue, "{} must come before cluster_queue", k);
        }
    }

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&EntityKind::ParallelEnvironment).unwrap();
        assert_eq!(json, "\"parallel_environment\"");
        assert_eq!(EntityKind::ClusterQueue.to_string(), "cluster_queue");
    }

    #[test]
    fn test_record_name_for_singletons() {
        let rec = EntityRecord::GlobalConfig(GlobalConfig::default());
        assert_eq!(rec.name(), GLOBAL_CONFIG_NAME);
        assert_eq!(rec.kind(), Some(EntityKind::GlobalConfig));
        assert_eq!(EntityRecord::Member("h1".into()).kind(), None);
    }
}
