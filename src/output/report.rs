// Sun Oct 18 2026 - Alex

use crate::finders::process_event::LocatedFunction;
use crate::memory::Address;
use crate::runtime::RuntimeHandles;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub index: i32,
    pub address: Address,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionReport {
    pub version: String,
    pub pid: i32,
    pub handles: RuntimeHandles,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_event: Option<LocatedFunction>,
}

impl IntrospectionReport {
    pub fn new(pid: i32, handles: RuntimeHandles) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            pid,
            handles,
            objects: Vec::new(),
            process_event: None,
        }
    }

    pub fn add_object(&mut self, index: i32, address: Address, name: String) {
        self.objects.push(ObjectRecord { index, address, name });
    }

    pub fn set_process_event(&mut self, found: Option<LocatedFunction>) {
        self.process_event = found;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}
