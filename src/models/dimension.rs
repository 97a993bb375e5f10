// Measurable quantities: interned handles into a process-wide registry

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Unit a dimension's magnitude is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Milliseconds,
    Bytes,
    Count,
}

/// Handle for one measurable quantity.
///
/// Handles are interned by name: registering the same name twice yields the same
/// handle, and two handles are equal iff they refer to the same registry slot.
/// Ordering follows registration order, so built-ins sort before custom dimensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dimension(u32);

struct Entry {
    name: &'static str,
    unit: Unit,
    description: &'static str,
}

struct Registry {
    entries: Vec<Entry>,
    by_name: HashMap<&'static str, u32>,
}

/// Built-in dimensions, in the order of the `Dimension` constants below.
const BUILTINS: [(&str, Unit, &str); 14] = [
    ("USER_TIME", Unit::Milliseconds, "User time"),
    ("KERNEL_TIME", Unit::Milliseconds, "Kernel time"),
    ("CPU_TIME", Unit::Milliseconds, "CPU time"),
    ("SOFT_PAGE_FAULTS", Unit::Count, "Soft page faults"),
    ("HARD_PAGE_FAULTS", Unit::Count, "Hard page faults"),
    ("WORKING_SET", Unit::Bytes, "Working set"),
    ("TRS", Unit::Bytes, "Text size"),
    ("DRS", Unit::Bytes, "Data size"),
    ("LRS", Unit::Bytes, "Library size"),
    ("PHYSICAL_TOTAL", Unit::Bytes, "Physical memory"),
    ("USED_MEM", Unit::Bytes, "Used memory"),
    ("FREE_MEM", Unit::Bytes, "Free memory"),
    ("BUFFERS", Unit::Bytes, "Buffers"),
    ("SYSTEM_CACHE", Unit::Bytes, "System cache"),
];

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = Registry {
            entries: Vec::with_capacity(BUILTINS.len()),
            by_name: HashMap::with_capacity(BUILTINS.len()),
        };
        for (name, unit, description) in BUILTINS {
            registry
                .by_name
                .insert(name, registry.entries.len() as u32);
            registry.entries.push(Entry {
                name,
                unit,
                description,
            });
        }
        RwLock::new(registry)
    })
}

impl Dimension {
    pub const USER_TIME: Dimension = Dimension(0);
    pub const KERNEL_TIME: Dimension = Dimension(1);
    pub const CPU_TIME: Dimension = Dimension(2);
    pub const SOFT_PAGE_FAULTS: Dimension = Dimension(3);
    pub const HARD_PAGE_FAULTS: Dimension = Dimension(4);
    pub const WORKING_SET: Dimension = Dimension(5);
    pub const TRS: Dimension = Dimension(6);
    pub const DRS: Dimension = Dimension(7);
    pub const LRS: Dimension = Dimension(8);
    pub const PHYSICAL_TOTAL: Dimension = Dimension(9);
    pub const USED_MEM: Dimension = Dimension(10);
    pub const FREE_MEM: Dimension = Dimension(11);
    pub const BUFFERS: Dimension = Dimension(12);
    pub const SYSTEM_CACHE: Dimension = Dimension(13);

    /// Returns the canonical handle for `name`, registering it as a plain count if new.
    pub fn register(name: &str) -> Dimension {
        Self::register_with_unit(name, Unit::Count)
    }

    /// Returns the canonical handle for `name`. The unit only applies to new names.
    pub fn register_with_unit(name: &str, unit: Unit) -> Dimension {
        if let Some(existing) = Self::lookup(name) {
            return existing;
        }
        let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have registered it between the read and write lock.
        if let Some(&id) = registry.by_name.get(name) {
            return Dimension(id);
        }
        let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
        let id = registry.entries.len() as u32;
        registry.entries.push(Entry {
            name,
            unit,
            description: name,
        });
        registry.by_name.insert(name, id);
        tracing::debug!(dimension = name, id, "registered dimension");
        Dimension(id)
    }

    /// Finds an already registered dimension without creating one.
    pub fn lookup(name: &str) -> Option<Dimension> {
        let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
        registry.by_name.get(name).copied().map(Dimension)
    }

    /// All built-in dimensions, in declaration order.
    pub fn builtins() -> impl Iterator<Item = Dimension> {
        (0..BUILTINS.len() as u32).map(Dimension)
    }

    pub fn name(self) -> &'static str {
        self.with_entry(|e| e.name)
    }

    pub fn unit(self) -> Unit {
        self.with_entry(|e| e.unit)
    }

    pub fn description(self) -> &'static str {
        self.with_entry(|e| e.description)
    }

    fn with_entry<T>(self, f: impl FnOnce(&Entry) -> T) -> T {
        let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
        // Handles are only minted by the registry, and entries are never removed.
        f(&registry.entries[self.0 as usize])
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dimension({})", self.name())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Dimension::register(&name))
    }
}
