use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::io::BufRead;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::RegistryError;

/// Internal device identifier assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps a hardware identifier, as sent by the unit, to an internal device.
///
/// Lookups happen concurrently from every connection, so implementors must
/// be safe for shared reads.
pub trait DeviceRegistry: Send + Sync {
    fn lookup(&self, hardware_id: &str) -> Option<DeviceId>;
}

impl<R: DeviceRegistry + ?Sized> DeviceRegistry for Arc<R> {
    fn lookup(&self, hardware_id: &str) -> Option<DeviceId> {
        (**self).lookup(hardware_id)
    }
}

impl DeviceRegistry for HashMap<String, DeviceId> {
    fn lookup(&self, hardware_id: &str) -> Option<DeviceId> {
        self.get(hardware_id).copied()
    }
}

/// A read-mostly registry held in memory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    devices: RwLock<HashMap<String, DeviceId>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<hardware-id> <internal-id>` pairs, one per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<B: BufRead>(reader: B) -> Result<Self, RegistryError> {
        let mut devices = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let mut parts = text.split_whitespace();
            let (Some(hardware_id), Some(id), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(RegistryError::Malformed { line: number, text: line.clone() });
            };
            let Ok(id) = id.parse::<u64>() else {
                return Err(RegistryError::Malformed { line: number, text: line.clone() });
            };

            match devices.entry(hardware_id.to_string()) {
                Entry::Occupied(_) => {
                    return Err(RegistryError::Duplicate {
                        line: number,
                        hardware_id: hardware_id.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(DeviceId(id));
                }
            }
        }

        debug!("loaded {} device(s)", devices.len());
        Ok(Self { devices: RwLock::new(devices) })
    }

    /// Register or re-map a hardware id. Returns the previous mapping.
    pub fn register(&self, hardware_id: impl Into<String>, id: DeviceId) -> Option<DeviceId> {
        self.write().insert(hardware_id.into(), id)
    }

    pub fn remove(&self, hardware_id: &str) -> Option<DeviceId> {
        self.write().remove(hardware_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, DeviceId>> {
        self.devices.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, DeviceId>> {
        self.devices.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn lookup(&self, hardware_id: &str) -> Option<DeviceId> {
        self.read().get(hardware_id).copied()
    }
}
