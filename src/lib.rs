//! Codec for the Grid Definition Section (section 3) and the Data
//! Representation Section (section 5) of GRIB2 messages, together with the
//! packing of the Data Section payload those sections describe.
//!
//! ```
//! use grib2_sections::{
//!     DataRepresentationSection, GridDefinitionSection, LatLonGridDefinition, PackingOptions,
//!     ProjectionTemplate, Section,
//! };
//!
//! let projection = ProjectionTemplate::LatLon(LatLonGridDefinition {
//!     ni: 4,
//!     nj: 3,
//!     ..Default::default()
//! });
//! let gds = GridDefinitionSection::new(projection).unwrap();
//!
//! let values = (0..12).map(|i| i as f32 * 0.5).collect::<Vec<_>>();
//! let options = PackingOptions::default().decimal_scale(1);
//! let (drs, payload) = grib2_sections::encode_field(&gds, 2, &values, &options).unwrap();
//!
//! let buf = drs.to_vec().unwrap();
//! let drs = DataRepresentationSection::unpack(&buf).unwrap();
//! assert_eq!(drs.decode(&payload).unwrap(), values);
//! ```

pub mod codetables;
mod error;
mod field;
mod grid;
mod helpers;
mod packing;
mod sections;
mod time;

pub use crate::{
    error::*,
    field::{FieldCodec, encode_field},
    grid::*,
    packing::*,
    sections::*,
    time::*,
};
