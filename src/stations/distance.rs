use crate::stations::error::CatalogError;
use crate::stations::inventory::Inventory;
use crate::types::query::{Candidate, Target};
use crate::types::span::DistanceRange;
use crate::types::station::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};
use log::debug;
use ordered_float::OrderedFloat;

/// Great-circle distance between two points in kilometers.
pub fn great_circle_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.latitude(),
            longitude: a.longitude(),
        },
        HaversineLocation {
            latitude: b.latitude(),
            longitude: b.longitude(),
        },
        Units::Kilometers,
    )
}

/// Turns a query target into coordinates. Station targets are looked up in the
/// full inventory, not only in the stations that survived earlier filters.
pub fn resolve_target(inventory: &Inventory, target: Target) -> Result<LatLon, CatalogError> {
    match target {
        Target::Coordinates(point) => Ok(point),
        Target::Station(id) => {
            let station = inventory
                .get(id)
                .ok_or(CatalogError::StationNotFound(id))?;
            station
                .coordinates()
                .ok_or(CatalogError::TargetWithoutCoordinates(id))
        }
    }
}

/// Attaches the distance to `origin` to every candidate with known coordinates, keeps
/// those within `range` and sorts them by distance.
///
/// Candidates without coordinates are dropped. The sort is stable, so equally distant
/// stations keep their relative order.
pub fn rank_by_distance<'a>(
    candidates: Vec<Candidate<'a>>,
    origin: LatLon,
    range: DistanceRange,
) -> Vec<Candidate<'a>> {
    let mut ranked: Vec<Candidate<'a>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let Some(point) = candidate.station.coordinates() else {
                debug!(
                    "Station {} has no coordinates, skipping distance filter",
                    candidate.station.id
                );
                return None;
            };
            let distance_km = great_circle_km(origin, point);
            range.contains(distance_km).then_some(Candidate {
                distance_km: Some(distance_km),
                ..candidate
            })
        })
        .collect();
    ranked.sort_by_key(|c| OrderedFloat(c.distance_km.unwrap_or(f64::INFINITY)));
    ranked
}
