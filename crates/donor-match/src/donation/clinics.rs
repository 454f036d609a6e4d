//! Static directory of Mexico City blood banks.
//!
//! Reference data only; proximity annotation reuses the geospatial module so
//! the listing can be rendered nearest-first for a located caller.

use super::geo::{distance_km, format_distance};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Clinic {
    pub id: u32,
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub phone: &'static str,
    pub hours: &'static str,
}

/// A clinic annotated with the caller's distance to it.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicView {
    #[serde(flatten)]
    pub clinic: Clinic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
}

pub const CLINICS: &[Clinic] = &[
    Clinic {
        id: 1,
        name: "Banco de Sangre Cruz Roja Mexicana",
        address: "Juan Luis Vives 200, Los Morales, Polanco, 11510 Ciudad de México, CDMX",
        lat: 19.4363,
        lng: -99.2081,
        phone: "55 5395 1111",
        hours: "Lun-Dom 7:00 - 19:00",
    },
    Clinic {
        id: 2,
        name: "Centro Nacional de la Transfusión Sanguínea",
        address: "Av. Othón de Mendizábal 195, Zacatenco, Gustavo A. Madero, 07360 Ciudad de México, CDMX",
        lat: 19.5034,
        lng: -99.1476,
        phone: "55 5119 4620",
        hours: "Lun-Vie 8:00 - 15:00",
    },
    Clinic {
        id: 3,
        name: "Banco de Sangre Hospital General de México",
        address: "Dr. Balmis 148, Doctores, Cuauhtémoc, 06726 Ciudad de México, CDMX",
        lat: 19.4132,
        lng: -99.1517,
        phone: "55 2789 2000",
        hours: "24 Horas",
    },
    Clinic {
        id: 4,
        name: "Banco de Sangre Hospital Juárez de México",
        address: "Av. Instituto Politécnico Nacional 5160, Magdalena de las Salinas, 07760 Ciudad de México, CDMX",
        lat: 19.4912,
        lng: -99.1265,
        phone: "55 5747 7560",
        hours: "Lun-Vie 7:00 - 14:00",
    },
    Clinic {
        id: 5,
        name: "Banco de Sangre Instituto Nacional de Cardiología",
        address: "Juan Badiano 1, Belisario Domínguez Sección XVI, Tlalpan, 14080 Ciudad de México, CDMX",
        lat: 19.2889,
        lng: -99.1600,
        phone: "55 5573 2911",
        hours: "Lun-Vie 8:00 - 13:00",
    },
];

/// All clinics, nearest-first when a caller location is given, directory
/// order otherwise.
pub fn nearby(location: Option<(f64, f64)>) -> Vec<ClinicView> {
    let mut views: Vec<ClinicView> = CLINICS
        .iter()
        .map(|clinic| {
            let distance =
                location.map(|(lat, lng)| distance_km(lat, lng, clinic.lat, clinic.lng));
            ClinicView {
                clinic: *clinic,
                distance_km: distance,
                distance_label: distance.map(format_distance),
            }
        })
        .collect();

    if location.is_some() {
        views.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    views
}
