//! Domain entities mirrored from the port operations view.

use serde::{Deserialize, Serialize};

/// A vessel currently in (or about to leave) port.
///
/// Field names on the wire follow the port system's column naming, so the
/// JSON shape is `Llegada`, `Buque`, `Tipo`, ... regardless of origin (cache
/// or database).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselEntry {
    #[serde(rename = "Llegada")]
    pub arrival: String,
    #[serde(rename = "Buque")]
    pub vessel: String,
    #[serde(rename = "Tipo")]
    pub kind: String,
    #[serde(rename = "Eslora")]
    pub length: f64,
    #[serde(rename = "Agente")]
    pub agent: String,
    /// Empty string while the vessel has not departed; never null.
    #[serde(rename = "Partida")]
    pub departure: String,
    #[serde(rename = "Sitio")]
    pub berth: String,
    #[serde(rename = "SitioImagen")]
    pub berth_image: String,
    #[serde(rename = "NumBuque")]
    pub berth_code: i32,
}

/// Vessels in source order (arrival order).
pub type VesselList = Vec<VesselEntry>;
