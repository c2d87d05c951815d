//! Error types for sky-map.

use sky_core::{GridPoint, HubId, ZoneId};
use thiserror::Error;

/// Construction-time graph defects: bad names, bad references, bad links.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("hub name '{0}' is empty or contains '-' or whitespace")]
    BadHubName(String),

    #[error("duplicate hub name '{0}'")]
    DuplicateHub(String),

    #[error("hubs '{first}' and '{second}' share coordinate {at}")]
    CoordinateClash {
        first:  String,
        second: String,
        at:     GridPoint,
    },

    #[error("hub '{0}' has base cost 0 (must be at least 1)")]
    ZeroHubCost(String),

    #[error("link references unknown hub {0}")]
    UnknownHub(HubId),

    #[error("hub {0} links to itself")]
    SelfLink(HubId),

    #[error("duplicate link between {0} and {1}")]
    DuplicateLink(HubId, HubId),

    #[error("link between {0} and {1} has zero traversal duration")]
    ZeroDuration(HubId, HubId),
}

/// Construction-time zone defects: membership and capacity inconsistencies.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("zone name '{0}' is empty or contains '-' or whitespace")]
    BadZoneName(String),

    #[error("duplicate zone name '{0}'")]
    DuplicateZone(String),

    #[error("unknown zone {0}")]
    UnknownZone(ZoneId),

    #[error("hub {hub} assigned to both {first} and {second}")]
    HubInTwoZones {
        hub:    HubId,
        first:  ZoneId,
        second: ZoneId,
    },

    #[error("zone '{0}' has no member hubs")]
    EmptyZone(String),

    #[error("zone '{0}' is not restricted but has capacity 0")]
    ZeroCapacity(String),
}

/// Errors raised while building an airspace map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("invalid zone: {0}")]
    Zone(#[from] ZoneError),
}

/// Alias for `Result<T, MapError>`.
pub type MapResult<T> = Result<T, MapError>;
