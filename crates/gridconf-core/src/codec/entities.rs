//! Record codecs for the entity kinds the tool edits as attribute blocks

use crate::codec::override_list::ListFormat;
use crate::codec::record::{Record, RecordCodec};
use crate::errors::Result;
use crate::model::queue::QUEUE_LIST_ATTRIBUTES;
use crate::model::{
    CalendarConfig, CkptInterfaceConfig, ClusterQueueConfig, HostExecConfig, HostGroupConfig,
    ParallelEnvironmentConfig, ProjectConfig, UserConfig, UserSetListConfig,
};

/// How a queue list attribute is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueListEncoding {
    /// Plain whitespace-separated list without overrides
    Plain,
    Overrides(ListFormat),
}

/// Encoding of a queue list attribute
///
/// Name-list attributes (PEs, ACLs, projects, ...) lead with spaces; value
/// attributes (slots, limits, methods, ...) are comma lists.
pub fn queue_list_encoding(attr: &str) -> QueueListEncoding {
    match attr {
        "hostlist" => QueueListEncoding::Plain,
        "qtype" | "ckpt_list" | "pe_list" | "owner_list" | "user_lists" | "xuser_lists"
        | "subordinate_list" | "projects" | "xprojects" | "calendar" | "initial_state" => {
            QueueListEncoding::Overrides(ListFormat::SpaceLeading)
        }
        _ => QueueListEncoding::Overrides(ListFormat::Comma),
    }
}

impl RecordCodec for ClusterQueueConfig {
    fn from_record(record: &Record) -> Result<Self> {
        let mut queue = ClusterQueueConfig::new(record.string("qname")?);
        for attr in QUEUE_LIST_ATTRIBUTES {
            let value = match queue_list_encoding(attr) {
                QueueListEncoding::Plain => record.space_list(attr),
                QueueListEncoding::Overrides(format) => record.override_list(attr, format)?,
            };
            if let Some(slot) = queue.list_attribute_mut(attr) {
                *slot = value;
            }
        }
        Ok(queue)
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new().with("qname", &self.qname);
        for attr in QUEUE_LIST_ATTRIBUTES {
            let Some(tokens) = self.list_attribute(attr) else {
                continue;
            };
            record = match queue_list_encoding(attr) {
                QueueListEncoding::Plain => record.with_list(*attr, tokens, " "),
                QueueListEncoding::Overrides(format) => {
                    record.with_override_list(*attr, tokens, format)
                }
            };
        }
        record
    }
}

impl RecordCodec for ParallelEnvironmentConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("pe_name")?,
            slots: record.int_or_zero("slots")?,
            user_lists: record.space_list("user_lists"),
            xuser_lists: record.space_list("xuser_lists"),
            start_proc_args: record.string_or_empty("start_proc_args"),
            stop_proc_args: record.string_or_empty("stop_proc_args"),
            allocation_rule: record.string_or_empty("allocation_rule"),
            control_slaves: record.string_or_empty("control_slaves"),
            job_is_first_task: record.bool("job_is_first_task")?,
            urgency_slots: record.string_or_empty("urgency_slots"),
            accounting_summary: record.bool("accounting_summary")?,
            ignore_slave_requests_on_master_host: record.bool("ign_sreq_on_mhost")?,
            master_forks_slaves: record.bool("master_forks_slaves")?,
            daemon_forks_slaves: record.bool("daemon_forks_slaves")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("pe_name", &self.name)
            .with("slots", self.slots)
            .with_list("user_lists", &self.user_lists, " ")
            .with_list("xuser_lists", &self.xuser_lists, " ")
            .with("start_proc_args", &self.start_proc_args)
            .with("stop_proc_args", &self.stop_proc_args)
            .with("allocation_rule", &self.allocation_rule)
            .with("control_slaves", &self.control_slaves)
            .with_bool("job_is_first_task", self.job_is_first_task)
            .with("urgency_slots", &self.urgency_slots)
            .with_bool("accounting_summary", self.accounting_summary)
            .with_bool("ign_sreq_on_mhost", self.ignore_slave_requests_on_master_host)
            .with_bool("master_forks_slaves", self.master_forks_slaves)
            .with_bool("daemon_forks_slaves", self.daemon_forks_slaves)
    }
}

impl RecordCodec for HostGroupConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("group_name")?,
            hostlist: record.space_list("hostlist"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("group_name", &self.name)
            .with_list("hostlist", &self.hostlist, " ")
    }
}

impl RecordCodec for UserSetListConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("name")?,
            list_type: record.string_or_empty("type"),
            fshare: record.int_or_zero("fshare")?,
            oticket: record.int_or_zero("oticket")?,
            entries: record.space_or_comma_list("entries"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", &self.name)
            .with("type", &self.list_type)
            .with("fshare", self.fshare)
            .with("oticket", self.oticket)
            .with_list("entries", &self.entries, ",")
    }
}

impl RecordCodec for ProjectConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("name")?,
            oticket: record.int_or_zero("oticket")?,
            fshare: record.int_or_zero("fshare")?,
            acl: record.space_list("acl"),
            xacl: record.space_list("xacl"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", &self.name)
            .with("oticket", self.oticket)
            .with("fshare", self.fshare)
            .with_list("acl", &self.acl, " ")
            .with_list("xacl", &self.xacl, " ")
    }
}

impl RecordCodec for UserConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("name")?,
            oticket: record.int_or_zero("oticket")?,
            fshare: record.int_or_zero("fshare")?,
            delete_time: record.int_or_zero("delete_time")?,
            default_project: record.string_or_empty("default_project"),
        })
    }

    fn to_record(&self) -> Record {
        let default_project = if self.default_project.is_empty() {
            "NONE"
        } else {
            &self.default_project
        };
        Record::new()
            .with("name", &self.name)
            .with("oticket", self.oticket)
            .with("fshare", self.fshare)
            .with("delete_time", self.delete_time)
            .with("default_project", default_project)
    }
}

impl RecordCodec for CalendarConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("calendar_name")?,
            year: record.string_or_empty("year"),
            week: record.string_or_empty("week"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("calendar_name", &self.name)
            .with("year", &self.year)
            .with("week", &self.week)
    }
}

impl RecordCodec for CkptInterfaceConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("ckpt_name")?,
            interface: record.string_or_empty("interface"),
            clean_command: record.string_or_empty("clean_command"),
            checkpoint_command: record.string_or_empty("ckpt_command"),
            migr_command: record.string_or_empty("migr_command"),
            restart_command: record.string_or_empty("restart_command"),
            checkpoint_dir: record.string_or_empty("ckpt_dir"),
            signal: record.string_or_empty("signal"),
            when: record.string_or_empty("when"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("ckpt_name", &self.name)
            .with("interface", &self.interface)
            .with("clean_command", &self.clean_command)
            .with("ckpt_command", &self.checkpoint_command)
            .with("migr_command", &self.migr_command)
            .with("restart_command", &self.restart_command)
            .with("ckpt_dir", &self.checkpoint_dir)
            .with("signal", &self.signal)
            .with("when", &self.when)
    }
}

impl RecordCodec for HostExecConfig {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.string("hostname")?,
            load_scaling: record.float_map("load_scaling")?,
            usage_scaling: record.float_map("usage_scaling")?,
            complex_values: record.key_value_map("complex_values")?,
            user_lists: record.space_list("user_lists"),
            xuser_lists: record.space_list("xuser_lists"),
            projects: record.space_list("projects"),
            xprojects: record.space_list("xprojects"),
            report_variables: record.comma_list("report_variables"),
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("hostname", &self.name)
            .with_float_map("load_scaling", &self.load_scaling)
            .with_map("complex_values", &self.complex_values)
            .with_list("user_lists", &self.user_lists, " ")
            .with_list("xuser_lists", &self.xuser_lists, " ")
            .with_list("projects", &self.projects, " ")
            .with_list("xprojects", &self.xprojects, " ")
            .with_float_map("usage_scaling", &self.usage_scaling)
            .with_list("report_variables", &self.report_variables, ",")
    }
}
