pub mod codec;
mod error;
mod ibtracs;
pub mod metrics;
pub mod parsing;
pub mod processing;
pub mod store;
pub mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use error::IbtracsError;
pub use ibtracs::*;

pub use codec::error::CodecError;
pub use codec::frame::{storm_from_frame, storm_to_frame};
pub use codec::json::{from_json, from_json_value, to_json, to_json_pretty, to_json_value};
pub use parsing::archive_reader::{ArchiveReader, StormBlock};
pub use parsing::error::ParseError;
pub use parsing::record_parser::parse_storm;
pub use processing::dedup::{resolve_duplicates, Deduplicated};
pub use store::error::StoreError;
pub use store::StormTable;

pub use metrics::ace::{accumulated_cyclone_energy, AceOptions, WindAveraging};
pub use metrics::intersect::{intersects_box, BoundingBox};
pub use metrics::speed::forward_speed_kt;

pub use types::basin::{Basin, Classification, Subbasin, UnknownCode};
pub use types::observation::{ExtendedObservation, Observation, Quadrant, Quadrants, WindRadii, WindThreshold};
pub use types::schema::{FieldSet, ObservationField};
pub use types::storm::{Genesis, InvariantViolation, Storm, StormIdentity, UNNAMED};

pub use utils::{earth_distance_km, earth_distances_km, EARTH_RADIUS_KM, KM_TO_NM};
