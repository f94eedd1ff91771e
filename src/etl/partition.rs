//! The Partition Resolver: picks the enumeration axis for a chunked dataset
//! and produces the ordered partition keys to process.
//!
//! Only the hourly emissions feed is partitioned today, but the resolver
//! works off the dimension enum rather than that dataset's field names, so
//! the partition axis stays configurable per dataset.

use std::fmt;

use crate::etl::params::EmissionsConfig;

/// Which requested dimension a dataset is chunked along. The current scheme
/// partitions along exactly one axis at a time; a cross-product strategy
/// would be a new variant here, not a change to the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionDimension {
    Years,
    States,
}

impl PartitionDimension {
    /// Parses the `partition` settings field, which names one of the
    /// dataset's own dimension keys.
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "emissions_years" => Some(PartitionDimension::Years),
            "emissions_states" => Some(PartitionDimension::States),
            _ => None,
        }
    }

    pub fn raw_key(self) -> &'static str {
        match self {
            PartitionDimension::Years => "emissions_years",
            PartitionDimension::States => "emissions_states",
        }
    }
}

/// One unit of streamed work: a single year or a single state. Generated
/// per run and discarded once its chunk is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionKey {
    Year(i32),
    State(String),
}

impl PartitionKey {
    /// Filename-safe suffix for the partition's physical output table.
    pub fn slug(&self) -> String {
        match self {
            PartitionKey::Year(year) => year.to_string(),
            PartitionKey::State(state) => state.to_lowercase(),
        }
    }

    /// Narrows the full requested dimensions down to this single key,
    /// leaving the other axis untouched.
    pub fn scope(&self, years: &[i32], states: &[String]) -> (Vec<i32>, Vec<String>) {
        match self {
            PartitionKey::Year(year) => (vec![*year], states.to_vec()),
            PartitionKey::State(state) => (years.to_vec(), vec![state.clone()]),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug())
    }
}

/// The ordered partition keys for one validated emissions config, in the
/// order the dimension was requested.
pub fn resolve_partitions(config: &EmissionsConfig) -> Vec<PartitionKey> {
    match config.partition {
        PartitionDimension::Years => config
            .emissions_years
            .iter()
            .copied()
            .map(PartitionKey::Year)
            .collect(),
        PartitionDimension::States => config
            .emissions_states
            .iter()
            .cloned()
            .map(PartitionKey::State)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(partition: PartitionDimension) -> EmissionsConfig {
        EmissionsConfig {
            emissions_years: vec![2016, 2017, 2018],
            emissions_states: vec!["WA".to_string(), "OR".to_string()],
            partition,
        }
    }

    #[test]
    fn resolves_year_partitions_in_request_order() {
        let keys = resolve_partitions(&config(PartitionDimension::Years));
        assert_eq!(
            keys,
            vec![
                PartitionKey::Year(2016),
                PartitionKey::Year(2017),
                PartitionKey::Year(2018)
            ]
        );
    }

    #[test]
    fn resolves_state_partitions() {
        let keys = resolve_partitions(&config(PartitionDimension::States));
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].slug(), "wa");
    }

    #[test]
    fn scope_narrows_only_the_partitioned_axis() {
        let years = vec![2016, 2017];
        let states = vec!["WA".to_string(), "OR".to_string()];

        let (y, s) = PartitionKey::Year(2016).scope(&years, &states);
        assert_eq!(y, vec![2016]);
        assert_eq!(s, states);

        let (y, s) = PartitionKey::State("OR".to_string()).scope(&years, &states);
        assert_eq!(y, years);
        assert_eq!(s, vec!["OR"]);
    }

    #[test]
    fn parse_rejects_unknown_dimension_keys() {
        assert_eq!(
            PartitionDimension::parse("emissions_years"),
            Some(PartitionDimension::Years)
        );
        assert_eq!(PartitionDimension::parse("emissions_months"), None);
    }
}
