#![allow(dead_code)]

use gridconf_core::model::{
    ClusterQueueConfig, GlobalConfig, HostGroupConfig, ParallelEnvironmentConfig, ProjectConfig,
    Snapshot, UserSetListConfig,
};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn pe(name: &str) -> ParallelEnvironmentConfig {
    ParallelEnvironmentConfig {
        name: name.to_string(),
        slots: 64,
        allocation_rule: "$fill_up".to_string(),
        ..Default::default()
    }
}

/// One queue over one host group, offering `mpi` and `smp` to `staff`
/// members working on `physics`
pub fn live_cluster() -> Snapshot {
    let mut snap = Snapshot::empty();
    snap.global_config = Some(GlobalConfig {
        execd_spool_dir: "/var/spool/sge".to_string(),
        mailer: "/bin/mail".to_string(),
        ..Default::default()
    });
    snap.managers = strings(&["root"]);
    snap.admin_hosts = strings(&["master"]);

    snap.user_set_lists.insert(
        "staff".into(),
        UserSetListConfig {
            name: "staff".to_string(),
            list_type: "ACL".to_string(),
            entries: strings(&["alice"]),
            ..Default::default()
        },
    );
    snap.projects.insert(
        "physics".into(),
        ProjectConfig {
            name: "physics".to_string(),
            acl: strings(&["staff"]),
            ..Default::default()
        },
    );
    for name in ["mpi", "smp"] {
        snap.parallel_environments.insert(name.into(), pe(name));
    }
    snap.host_groups.insert(
        "@allhosts".into(),
        HostGroupConfig {
            name: "@allhosts".to_string(),
            hostlist: strings(&["node1", "node2"]),
        },
    );

    let mut queue = ClusterQueueConfig::new("all.q");
    queue.hostlist = strings(&["@allhosts"]);
    queue.pe_list = strings(&["mpi", "smp"]);
    queue.user_lists = strings(&["staff"]);
    queue.projects = strings(&["physics"]);
    queue.slots = strings(&["1", "[node1=4]"]);
    snap.cluster_queues.insert("all.q".into(), queue);

    snap
}
