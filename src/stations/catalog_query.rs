use crate::stations::coverage::split_by_coverage;
use crate::stations::distance::{rank_by_distance, resolve_target};
use crate::stations::error::CatalogError;
use crate::stations::inventory::Inventory;
use crate::stations::recode::detect_recodes;
use crate::types::error::ConfigError;
use crate::types::query::{Candidate, FilterStage, QueryResult, StationQuery};
use log::{debug, info};
use regex::{Regex, RegexBuilder};

/// Runs a query against the inventory.
///
/// Filters apply in order: name, province, distance, coverage. As soon as a stage
/// leaves no station the query stops and reports that stage; an empty inventory
/// stops before the first one. Recode detection only looks at stations the
/// coverage stage rejected.
///
/// # Errors
///
/// Fails on an invalid name pattern or when a station target cannot be resolved.
/// An empty result is not an error.
pub fn run_query(inventory: &Inventory, query: &StationQuery) -> Result<QueryResult, CatalogError> {
    if inventory.is_empty() {
        return Ok(no_results(FilterStage::Inventory));
    }

    let mut candidates: Vec<Candidate<'_>> = inventory
        .iter()
        .enumerate()
        .map(|(position, station)| Candidate::new(position, station))
        .collect();

    if let Some(pattern) = &query.name {
        let regex = name_regex(pattern)?;
        candidates.retain(|c| regex.is_match(&c.station.name));
        debug!("{} stations match name '{}'", candidates.len(), pattern);
        if candidates.is_empty() {
            return Ok(no_results(FilterStage::Name));
        }
    }

    if !query.provinces.is_empty() {
        candidates.retain(|c| {
            c.station
                .province
                .is_some_and(|p| query.provinces.contains(&p))
        });
        debug!("{} stations in provinces {:?}", candidates.len(), query.provinces);
        if candidates.is_empty() {
            return Ok(no_results(FilterStage::Province));
        }
    }

    if let Some(target) = query.target {
        let origin = resolve_target(inventory, target)?;
        candidates = rank_by_distance(candidates, origin, query.distance);
        debug!(
            "{} stations within {}-{} km",
            candidates.len(),
            query.distance.min_km,
            query.distance.max_km
        );
        if candidates.is_empty() {
            return Ok(no_results(FilterStage::Distance));
        }
    }

    let mut recode_suggestions = Vec::new();
    if let Some(request) = query.coverage {
        let (inside, outside) = split_by_coverage(candidates, request);
        debug!(
            "{} stations cover {}-{}, {} do not",
            inside.len(),
            request.period.start,
            request.period.end,
            outside.len()
        );
        if query.detect_recodes {
            recode_suggestions = detect_recodes(&outside, request);
        }
        candidates = inside;
        if candidates.is_empty() {
            info!("No results!");
            return Ok(QueryResult::empty(FilterStage::Coverage, recode_suggestions)
                .with_coverage_frequency(Some(request.frequency)));
        }
    }

    Ok(QueryResult::rows(
        candidates.into_iter().map(Into::into).collect(),
        recode_suggestions,
    )
    .with_coverage_frequency(query.coverage.map(|c| c.frequency)))
}

/// Case-insensitive pattern anchored at the start of the name.
fn name_regex(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(&format!("^(?:{})", pattern))
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidNamePattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn no_results(stage: FilterStage) -> QueryResult {
    info!("No results!");
    QueryResult::empty(stage, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::inventory::tests::SAMPLE_INVENTORY;
    use crate::types::data_source::Frequency;
    use crate::types::province::Province;
    use crate::types::query::{CoverageRequest, QueryOutcome, Target};
    use crate::types::span::{DistanceRange, YearSpan};
    use crate::types::station::{DataInventory, LatLon, Location, Station, YearRange};

    fn sample() -> Inventory {
        Inventory::parse(SAMPLE_INVENTORY).unwrap()
    }

    fn ids(result: &QueryResult) -> Vec<u32> {
        result.stations().iter().map(|m| m.station.id).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let inventory = sample();
        let result = run_query(&inventory, &StationQuery::default()).unwrap();
        assert_eq!(ids(&result), vec![5051, 31688, 51157, 999]);
        assert!(result.recode_suggestions.is_empty());
    }

    #[test]
    fn test_province_filter() {
        let inventory = sample();
        let query = StationQuery::builder()
            .provinces(vec![Province::Ontario, Province::Quebec])
            .build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(ids(&result), vec![5051, 31688, 51157]);
        assert!(result
            .stations()
            .iter()
            .all(|m| matches!(m.station.province, Some(Province::Ontario | Province::Quebec))));
    }

    #[test]
    fn test_name_matches_prefix_case_insensitively() {
        let inventory = sample();
        let query = StationQuery::builder().name("toronto".to_string()).build();
        assert_eq!(ids(&run_query(&inventory, &query).unwrap()), vec![5051, 31688]);

        // anchored at the start of the name
        let query = StationQuery::builder().name("city".to_string()).build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(result.outcome, QueryOutcome::Empty { stage: FilterStage::Name });

        let query = StationQuery::builder().name(".*city".to_string()).build();
        assert_eq!(ids(&run_query(&inventory, &query).unwrap()), vec![31688]);
    }

    #[test]
    fn test_invalid_name_pattern() {
        let inventory = sample();
        let query = StationQuery::builder().name("toronto(".to_string()).build();
        assert!(matches!(
            run_query(&inventory, &query),
            Err(CatalogError::Config(ConfigError::InvalidNamePattern { .. }))
        ));
    }

    #[test]
    fn test_empty_stage_short_circuits() {
        let inventory = sample();
        let query = StationQuery::builder()
            .provinces(vec![Province::Yukon])
            .target(Target::Station(424242))
            .build();
        // the unknown target is never resolved
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(
            result.outcome,
            QueryOutcome::Empty {
                stage: FilterStage::Province
            }
        );
    }

    #[test]
    fn test_target_station_ranks_by_distance() {
        let inventory = sample();
        let query = StationQuery::builder()
            .target(Target::Station(51157))
            .distance(DistanceRange::new(0.0, 1000.0))
            .build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(ids(&result), vec![51157, 5051, 31688]);
        assert_eq!(result.stations()[0].distance_km, Some(0.0));

        let query = StationQuery::builder()
            .target(Target::Coordinates(LatLon(60.0, -135.0)))
            .build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(
            result.outcome,
            QueryOutcome::Empty {
                stage: FilterStage::Distance
            }
        );
    }

    #[test]
    fn test_target_not_found() {
        let inventory = sample();
        let query = StationQuery::builder().target(Target::Station(1)).build();
        assert!(matches!(
            run_query(&inventory, &query),
            Err(CatalogError::StationNotFound(1))
        ));
    }

    #[test]
    fn test_coverage_filter() {
        let inventory = sample();
        let query = StationQuery::builder()
            .coverage(CoverageRequest::new(YearSpan::new(1955, 1969), Frequency::Hourly))
            .build();
        assert_eq!(ids(&run_query(&inventory, &query).unwrap()), vec![5051]);
    }

    fn recoded_site() -> Inventory {
        let station = |id: u32, first: i32, last: i32| Station {
            id,
            name: format!("SITE {}", id),
            province: Some(Province::Ontario),
            climate_id: None,
            wmo_id: None,
            tc_id: None,
            location: Location::from_inventory(Some(43.6), Some(-79.4), None),
            inventory: DataInventory {
                daily: YearRange::new(Some(first), Some(last)),
                ..DataInventory::default()
            },
        };
        Inventory::new(vec![station(1, 1950, 1980), station(2, 1980, 2020)])
    }

    #[test]
    fn test_recode_suggestions_survive_empty_coverage() {
        let inventory = recoded_site();
        let query = StationQuery::builder()
            .coverage(CoverageRequest::new(YearSpan::new(1960, 2019), Frequency::Daily))
            .detect_recodes(true)
            .build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(
            result.outcome,
            QueryOutcome::Empty {
                stage: FilterStage::Coverage
            }
        );
        assert_eq!(result.recode_suggestions.len(), 1);
        assert_eq!(result.recode_suggestions[0].stations.len(), 2);
    }

    #[test]
    fn test_recodes_only_when_requested() {
        let inventory = recoded_site();
        let query = StationQuery::builder()
            .coverage(CoverageRequest::new(YearSpan::new(1960, 2019), Frequency::Daily))
            .build();
        assert!(run_query(&inventory, &query)
            .unwrap()
            .recode_suggestions
            .is_empty());
    }

    #[test]
    fn test_empty_inventory_is_no_results() {
        let header_only = SAMPLE_INVENTORY
            .lines()
            .take(4)
            .map(|line| format!("{line}\n"))
            .collect::<String>();
        for inventory in [Inventory::parse(&header_only).unwrap(), Inventory::new(vec![])] {
            assert!(inventory.is_empty());
            let result = run_query(&inventory, &StationQuery::default()).unwrap();
            assert!(result.is_empty());
            assert_eq!(
                result.outcome,
                QueryOutcome::Empty {
                    stage: FilterStage::Inventory
                }
            );
        }
    }

    #[test]
    fn test_coverage_frequency_is_recorded() {
        let inventory = sample();
        let query = StationQuery::builder()
            .coverage(CoverageRequest::new(YearSpan::new(1955, 1969), Frequency::Hourly))
            .build();
        let result = run_query(&inventory, &query).unwrap();
        assert_eq!(result.coverage_frequency, Some(Frequency::Hourly));
        assert!(result.to_dataframe().unwrap().column("DLY First Year").is_err());

        let result = run_query(&inventory, &StationQuery::default()).unwrap();
        assert_eq!(result.coverage_frequency, None);
    }
}
