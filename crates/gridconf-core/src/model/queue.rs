//! Cluster queue record

use super::Entity;
use serde::{Deserialize, Serialize};

macro_rules! cluster_queue {
    ($($(#[$meta:meta])* $attr:ident),* $(,)?) => {
        /// Cluster queue configuration
        ///
        /// Apart from `qname` every attribute is a token list. All lists
        /// except `hostlist` accept host and host-group overrides, e.g.
        /// `slots` = `["1", "[node1=4]", "[@gpu=8]"]`.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ClusterQueueConfig {
            pub qname: String,
            $($(#[$meta])* pub $attr: Vec<String>,)*
        }

        /// Attribute names of all list-valued queue attributes, in the order
        /// the administrative tool prints them
        pub const QUEUE_LIST_ATTRIBUTES: &[&str] = &[$(stringify!($attr)),*];

        impl ClusterQueueConfig {
            /// Borrow a list attribute by its attribute name
            pub fn list_attribute(&self, attr: &str) -> Option<&Vec<String>> {
                match attr {
                    $(stringify!($attr) => Some(&self.$attr),)*
                    _ => None,
                }
            }

            /// Mutably borrow a list attribute by its attribute name
            pub fn list_attribute_mut(&mut self, attr: &str) -> Option<&mut Vec<String>> {
                match attr {
                    $(stringify!($attr) => Some(&mut self.$attr),)*
                    _ => None,
                }
            }
        }
    };
}

cluster_queue! {
    /// Hosts and `@hostgroup`s the queue spans (plain space list)
    hostlist,
    seq_no,
    load_thresholds,
    suspend_thresholds,
    nsuspend,
    suspend_interval,
    priority,
    min_cpu_interval,
    processors,
    qtype,
    ckpt_list,
    pe_list,
    rerun,
    slots,
    tmpdir,
    shell,
    prolog,
    epilog,
    shell_start_mode,
    starter_method,
    suspend_method,
    resume_method,
    terminate_method,
    notify,
    owner_list,
    user_lists,
    xuser_lists,
    subordinate_list,
    complex_values,
    projects,
    xprojects,
    calendar,
    initial_state,
    s_rt,
    h_rt,
    s_cpu,
    h_cpu,
    s_fsize,
    h_fsize,
    s_data,
    h_data,
    s_stack,
    h_stack,
    s_core,
    h_core,
    s_rss,
    h_rss,
    s_vmem,
    h_vmem,
}

impl ClusterQueueConfig {
    pub fn new(qname: impl Into<String>) -> Self {
        Self {
            qname: qname.into(),
            ..Default::default()
        }
    }
}

impl Entity for ClusterQueueConfig {
    fn name(&self) -> &str {
        &self.qname
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_accessors_cover_all_lists() {
        let mut q = ClusterQueueConfig::new("all.q");
        for attr in QUEUE_LIST_ATTRIBUTES {
            q.list_attribute_mut(attr)
                .expect("accessor for every listed attribute")
                .push(format!("v-{}", attr));
        }
        assert_eq!(q.pe_list, vec!["v-pe_list".to_string()]);
        assert_eq!(q.h_vmem, vec!["v-h_vmem".to_string()]);
        assert!(q.list_attribute("qname").is_none());
        assert_eq!(QUEUE_LIST_ATTRIBUTES.len(), 49);
    }

    #[test]
    fn test_json_keys_are_attribute_names() {
        let mut q = ClusterQueueConfig::new("all.q");
        q.pe_list = vec!["make".to_string(), "[node1=smp]".to_string()];
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["qname"], "all.q");
        assert_eq!(json["pe_list"][1], "[node1=smp]");
        assert!(json.get("tmpdir").is_some());
    }
}
