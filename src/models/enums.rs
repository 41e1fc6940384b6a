use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercase wire-format enumerations with `as_str`, `ALL` and `FromStr`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant { kind: $kind, value: s.to_string() })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(Role, "role" {
    Customer => "customer",
    Doctor => "doctor",
    HospitalOwner => "hospital_owner",
    Admin => "admin",
});

wire_enum!(Specialty, "specialty" {
    Pediatrician => "pediatrician",
    Optometrist => "optometrist",
    Dentist => "dentist",
    Surgeon => "surgeon",
    Cardiologist => "cardiologist",
    Dermatologist => "dermatologist",
    GeneralPractitioner => "general_practitioner",
});

wire_enum!(InviteStatus, "invite status" {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
});

wire_enum!(AppointmentStatus, "appointment status" {
    Waiting => "waiting",
    Ongoing => "ongoing",
    Done => "done",
});

impl Role {
    /// True when any held role is in `allowed`.
    pub fn any_of(allowed: &[Role], held: &[Role]) -> bool {
        held.iter().any(|role| allowed.contains(role))
    }
}

impl Default for InviteStatus {
    fn default() -> Self {
        InviteStatus::Pending
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Waiting
    }
}
