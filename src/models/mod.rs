//! Data models for ClimateWatch
//!
//! - Location: coordinates and geocoding matches
//! - Weather: weather snapshots and the marker view built from them

pub mod location;
pub mod weather;

pub use location::{Coordinate, LocationMatch};
pub use weather::{
    Conditions, MarkerLocation, MarkerView, SunTimes, WeatherSnapshot, WeatherSource, Wind,
};
