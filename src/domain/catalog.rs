use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

catalog_id!(
    /// Catalog key of an application type (e.g. Permanent Registration).
    ApplicationTypeId
);
catalog_id!(
    /// Catalog key of a registration screen.
    ProcessId
);
catalog_id!(
    /// Catalog key of a healthcare profession.
    ProfessionId
);

/// A category of registration application that owns a default screen sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationType {
    pub id: ApplicationTypeId,
    /// Short stable code, e.g. `PR`.
    pub form_code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A single registration screen that can be placed into a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: ProcessId,
    pub name: String,
    /// Stable routing key of the screen.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profession {
    pub id: ProfessionId,
    pub name: String,
}

/// Which kind of catalog record a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ApplicationType,
    Process,
    Profession,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::ApplicationType => "application type",
            EntityKind::Process => "process",
            EntityKind::Profession => "profession",
        };
        f.write_str(label)
    }
}
