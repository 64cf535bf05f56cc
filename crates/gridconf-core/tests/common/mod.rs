use gridconf_core::apply::ApplyCollaborator;
use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::model::{
    ClusterQueueConfig, EntityKind, EntityRecord, GlobalConfig, HostExecConfig, HostGroupConfig,
    ParallelEnvironmentConfig, ProjectConfig, Snapshot, UserConfig, UserSetListConfig,
};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(dead_code)]
pub fn pe(name: &str, slots: i64) -> ParallelEnvironmentConfig {
    ParallelEnvironmentConfig {
        name: name.to_string(),
        slots,
        allocation_rule: "$round_robin".to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn queue(name: &str, hostlist: &[&str], pes: &[&str]) -> ClusterQueueConfig {
    let mut q = ClusterQueueConfig::new(name);
    q.hostlist = strings(hostlist);
    q.pe_list = strings(pes);
    q.slots = strings(&["1"]);
    q
}

#[allow(dead_code)]
pub fn host_group(name: &str, hosts: &[&str]) -> HostGroupConfig {
    HostGroupConfig {
        name: name.to_string(),
        hostlist: strings(hosts),
    }
}

#[allow(dead_code)]
pub fn user_set(name: &str, entries: &[&str]) -> UserSetListConfig {
    UserSetListConfig {
        name: name.to_string(),
        list_type: "ACL".to_string(),
        entries: strings(entries),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn project(name: &str, acl: &[&str]) -> ProjectConfig {
    ProjectConfig {
        name: name.to_string(),
        acl: strings(acl),
        ..Default::default()
    }
}

/// A small but fully cross-referenced cluster
///
/// - `all.q` spans `@allhosts` and offers `mpi` and `smp`
/// - `gpu.q` spans `@gpu`, offers `mpi`, is restricted to `staff` and `physics`
/// - `@allhosts` nests `@gpu`
/// - `physics` is gated by `staff`; `alice` defaults to `physics`
#[allow(dead_code)]
pub fn cluster_snapshot() -> Snapshot {
    let mut snap = Snapshot::empty();
    snap.global_config = Some(GlobalConfig {
        execd_spool_dir: "/var/spool/sge".to_string(),
        mailer: "/bin/mail".to_string(),
        max_jobs: 0,
        ..Default::default()
    });
    snap.managers = strings(&["root"]);
    snap.operators = strings(&["ops"]);
    snap.admin_hosts = strings(&["master", "node1"]);
    snap.submit_hosts = strings(&["master"]);

    for us in [user_set("staff", &["alice", "bob"]), user_set("deadline", &["bob"])] {
        snap.user_set_lists.insert(us.name.clone(), us);
    }
    let physics = project("physics", &["staff"]);
    snap.projects.insert(physics.name.clone(), physics);
    snap.users.insert(
        "alice".to_string(),
        UserConfig {
            name: "alice".to_string(),
            default_project: "physics".to_string(),
            ..Default::default()
        },
    );
    for p in [pe("mpi", 64), pe("smp", 16)] {
        snap.parallel_environments.insert(p.name.clone(), p);
    }
    for g in [
        host_group("@gpu", &["gpu1", "gpu2"]),
        host_group("@allhosts", &["@gpu", "node1", "node2"]),
    ] {
        snap.host_groups.insert(g.name.clone(), g);
    }
    snap.exec_hosts.insert(
        "node1".to_string(),
        HostExecConfig {
            name: "node1".to_string(),
            user_lists: strings(&["staff"]),
            ..Default::default()
        },
    );

    let all_q = queue("all.q", &["@allhosts"], &["mpi", "smp"]);
    let mut gpu_q = queue("gpu.q", &["@gpu"], &["mpi"]);
    gpu_q.user_lists = strings(&["staff"]);
    gpu_q.projects = strings(&["physics"]);
    for q in [all_q, gpu_q] {
        snap.cluster_queues.insert(q.qname.clone(), q);
    }
    snap
}

/// One call received by [`RecordingApplier`]
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Add(EntityKind, String),
    Modify(EntityKind, String),
    ModifyInPlace(EntityKind, String, EntityRecord),
    Delete(EntityKind, String),
}

/// Apply collaborator that records every call and can be told to reject
/// specific ones
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingApplier {
    pub calls: Vec<Call>,
    pub fail_add: Vec<(EntityKind, String)>,
    pub fail_modify_in_place: Vec<(EntityKind, String)>,
    pub fail_delete: Vec<(EntityKind, String)>,
}

#[allow(dead_code)]
impl RecordingApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }
}

fn rejected(kind: EntityKind, name: &str) -> GcError {
    GcError::new(GcErrorKind::ExternalService)
        .with_entity_kind(kind)
        .with_entity_name(name)
        .with_message("rejected by test collaborator")
}

fn listed(list: &[(EntityKind, String)], kind: EntityKind, name: &str) -> bool {
    list.iter().any(|(k, n)| *k == kind && n == name)
}

impl ApplyCollaborator for RecordingApplier {
    fn add(&mut self, kind: EntityKind, name: &str, _record: &EntityRecord) -> Result<(), GcError> {
        if listed(&self.fail_add, kind, name) {
            return Err(rejected(kind, name));
        }
        self.calls.push(Call::Add(kind, name.to_string()));
        Ok(())
    }

    fn modify(
        &mut self,
        kind: EntityKind,
        name: &str,
        _record: &EntityRecord,
    ) -> Result<(), GcError> {
        self.calls.push(Call::Modify(kind, name.to_string()));
        Ok(())
    }

    fn modify_in_place(
        &mut self,
        kind: EntityKind,
        name: &str,
        record: &EntityRecord,
    ) -> Result<(), GcError> {
        if listed(&self.fail_modify_in_place, kind, name) {
            return Err(rejected(kind, name));
        }
        self.calls
            .push(Call::ModifyInPlace(kind, name.to_string(), record.clone()));
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, name: &str) -> Result<(), GcError> {
        if listed(&self.fail_delete, kind, name) {
            return Err(rejected(kind, name));
        }
        self.calls.push(Call::Delete(kind, name.to_string()));
        Ok(())
    }
}
