use crate::types::coordinates::LatLon;
use std::fmt;

/// The kind of hazard a marker represents. Part of the notification de-duplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// A government flood-gauge station ([`crate::FloodWatch`]).
    FloodWatch,
    /// A user-submitted, community-verified report ([`crate::SpecialWarning`]).
    SpecialWarning,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HazardKind::FloodWatch => write!(f, "floodwatch"),
            HazardKind::SpecialWarning => write!(f, "specialwarning"),
        }
    }
}

/// Common view over anything that can be placed on the map and measured against
/// the user's position.
pub trait Hazard {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn coordinates(&self) -> LatLon;
    fn kind(&self) -> HazardKind;
}

/// Any hazard, owned. Returned by queries that mix both hazard lists.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyHazard {
    FloodWatch(crate::FloodWatch),
    SpecialWarning(crate::SpecialWarning),
}

impl Hazard for AnyHazard {
    fn id(&self) -> &str {
        match self {
            AnyHazard::FloodWatch(h) => h.id(),
            AnyHazard::SpecialWarning(h) => h.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            AnyHazard::FloodWatch(h) => h.name(),
            AnyHazard::SpecialWarning(h) => h.name(),
        }
    }

    fn coordinates(&self) -> LatLon {
        match self {
            AnyHazard::FloodWatch(h) => h.coordinates(),
            AnyHazard::SpecialWarning(h) => h.coordinates(),
        }
    }

    fn kind(&self) -> HazardKind {
        match self {
            AnyHazard::FloodWatch(_) => HazardKind::FloodWatch,
            AnyHazard::SpecialWarning(_) => HazardKind::SpecialWarning,
        }
    }
}
