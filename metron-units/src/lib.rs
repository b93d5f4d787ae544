//! Metron Units - Unit data files
//!
//! Reads the JSON data files that define linear units and ships a built-in
//! catalogue covering the common categories:
//! - Length, Area, Volume (m, km, ft, mi, ha, acre, L, gal, etc.)
//! - Mass (kg, g, lb, oz, etc.)
//! - Time (s, min, h, d, etc.)
//! - Temperature (K, °C, °F, °R)
//! - Velocity, Force, Pressure (m/s, mph, N, lbf, Pa, bar, psi, etc.)
//! - Energy, Power (J, cal, kWh, W, hp, etc.)
//! - Frequency, Data, Angle (Hz, rpm, bit, byte, MiB, rad, °, etc.)

mod schema;
mod reader;
mod builtin;

pub use schema::{UnitFile, UnitEntry};
pub use reader::{LinearReader, ReadError};
pub use builtin::{BUILTIN_FILES, load_builtin, builtin_registry};
