//! Detection of station recodes.
//!
//! ECCC sometimes gives an existing site a new station ID, splitting its record over
//! two or more inventory rows at the same coordinates. None of these rows covers a
//! long period alone, but together they might.
//!
//! The joint test compares the group's smallest last year with its largest first
//! year. For two stations that means their records touch or overlap. For three or
//! more it does not prove the timeline is gap-free; groups are only suggestions.

use crate::types::query::{Candidate, CoverageRequest, RecodeSuggestion};
use crate::types::station::LatLon;
use log::info;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

type CoordinateKey = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Finds groups of co-located stations among `outside` that may jointly cover `request`.
///
/// Groups are reported in ascending (latitude, longitude) order and numbered from 1.
/// Members keep their inventory order. Stations without coordinates never group.
pub fn detect_recodes(outside: &[Candidate<'_>], request: CoverageRequest) -> Vec<RecodeSuggestion> {
    let mut groups: BTreeMap<CoordinateKey, Vec<&Candidate<'_>>> = BTreeMap::new();
    for candidate in outside {
        if let Some(LatLon(lat, lon)) = candidate.station.coordinates() {
            groups
                .entry((OrderedFloat(lat), OrderedFloat(lon)))
                .or_default()
                .push(candidate);
        }
    }

    let mut suggestions = Vec::new();
    for ((lat, lon), mut members) in groups {
        if members.len() < 2 || !jointly_covers(&members, request) {
            continue;
        }
        members.sort_by_key(|c| c.position);
        let suggestion = RecodeSuggestion {
            group: suggestions.len() + 1,
            location: LatLon(lat.into_inner(), lon.into_inner()),
            stations: members.iter().map(|c| c.station.to_owned()).collect(),
        };
        info!(
            "Combination {} at {}, {}: stations {:?}",
            suggestion.group,
            suggestion.location.latitude(),
            suggestion.location.longitude(),
            suggestion.stations.iter().map(|s| s.id).collect::<Vec<_>>()
        );
        suggestions.push(suggestion);
    }
    suggestions
}

fn jointly_covers(members: &[&Candidate<'_>], request: CoverageRequest) -> bool {
    let ranges = members
        .iter()
        .map(|c| c.station.coverage(request.frequency));
    let Some(firsts) = ranges.clone().map(|r| r.start).collect::<Option<Vec<i32>>>() else {
        return false;
    };
    let Some(lasts) = ranges.map(|r| r.end).collect::<Option<Vec<i32>>>() else {
        return false;
    };
    let (Some(&min_first), Some(&max_first)) = (firsts.iter().min(), firsts.iter().max()) else {
        return false;
    };
    let (Some(&min_last), Some(&max_last)) = (lasts.iter().min(), lasts.iter().max()) else {
        return false;
    };

    min_first <= request.period.start && max_last >= request.period.end && min_last <= max_first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::data_source::Frequency;
    use crate::types::span::YearSpan;
    use crate::types::station::{DataInventory, Location, Station, YearRange};

    fn station(id: u32, coords: (f64, f64), first: Option<i32>, last: Option<i32>) -> Station {
        Station {
            id,
            name: format!("STATION {}", id),
            province: None,
            climate_id: None,
            wmo_id: None,
            tc_id: None,
            location: Location::from_inventory(Some(coords.0), Some(coords.1), None),
            inventory: DataInventory {
                daily: YearRange::new(first, last),
                ..DataInventory::default()
            },
        }
    }

    fn detect(stations: &[Station]) -> Vec<RecodeSuggestion> {
        let candidates: Vec<_> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| Candidate::new(i, s))
            .collect();
        detect_recodes(
            &candidates,
            CoverageRequest::new(YearSpan::new(1960, 2019), Frequency::Daily),
        )
    }

    const SITE: (f64, f64) = (43.6, -79.4);

    #[test]
    fn test_overlap_by_one_year_is_not_enough() {
        // min(last) = 1980 is not <= max(first) = 1979
        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, SITE, Some(1979), Some(2020)),
        ];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_adjacent_records_form_a_group() {
        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, SITE, Some(1980), Some(2020)),
        ];
        let found = detect(&stations);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].group, 1);
        assert_eq!(found[0].location, LatLon(43.6, -79.4));
        assert_eq!(found[0].stations.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, SITE, Some(1981), Some(2020)),
        ];
        assert_eq!(detect(&stations).len(), 1);
    }

    #[test]
    fn test_group_must_span_period() {
        let stations = vec![
            station(1, SITE, Some(1965), Some(1980)),
            station(2, SITE, Some(1980), Some(2020)),
        ];
        assert!(detect(&stations).is_empty());

        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, SITE, Some(1980), Some(2015)),
        ];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_single_station_never_groups() {
        let stations = vec![station(1, SITE, Some(1950), Some(1980))];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_different_coordinates_never_group() {
        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, (43.61, -79.4), Some(1980), Some(2020)),
        ];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_unknown_coordinates_never_group() {
        let stations = vec![
            station(1, (40.0, -50.0), Some(1950), Some(1980)),
            station(2, (40.0, -50.0), Some(1980), Some(2020)),
        ];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_missing_year_disqualifies_group() {
        let stations = vec![
            station(1, SITE, Some(1950), Some(1980)),
            station(2, SITE, Some(1980), Some(2020)),
            station(3, SITE, None, None),
        ];
        assert!(detect(&stations).is_empty());
    }

    #[test]
    fn test_counter_and_member_order() {
        let stations = vec![
            station(30, (50.0, -100.0), Some(1990), Some(2020)),
            station(10, SITE, Some(1970), Some(2020)),
            station(31, (50.0, -100.0), Some(1940), Some(1990)),
            station(11, SITE, Some(1950), Some(1970)),
            station(20, (45.0, -75.0), Some(1950), Some(1960)),
        ];
        let found = detect(&stations);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].group, 1);
        assert_eq!(found[0].location, LatLon(43.6, -79.4));
        assert_eq!(found[0].stations.iter().map(|s| s.id).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(found[1].group, 2);
        assert_eq!(found[1].stations.iter().map(|s| s.id).collect::<Vec<_>>(), vec![30, 31]);
    }
}
