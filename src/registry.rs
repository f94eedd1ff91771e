//! The registry of fixed universes the Input Validator checks requests
//! against. Injected explicitly rather than read as ambient globals so tests
//! can run with restricted universes.

use crate::constants;

#[derive(Debug, Clone)]
pub struct TableRegistry {
    pub generator_tables: Vec<String>,
    pub filing_tables: Vec<String>,
    pub minimal_filing_tables: Vec<String>,
    pub finance_tables: Vec<String>,
    pub reference_tables: Vec<String>,
    pub generator_years: Vec<i32>,
    pub filing_years: Vec<i32>,
    pub finance_years: Vec<i32>,
    pub emissions_years: Vec<i32>,
    pub emissions_states: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self {
            generator_tables: owned(constants::GENERATOR_TABLES),
            filing_tables: owned(constants::FILING_TABLES),
            minimal_filing_tables: owned(constants::MINIMAL_FILING_TABLES),
            finance_tables: owned(constants::FINANCE_TABLES),
            reference_tables: owned(constants::REFERENCE_TABLES),
            generator_years: constants::GENERATOR_YEARS.clone(),
            filing_years: constants::FILING_YEARS.clone(),
            finance_years: constants::FINANCE_YEARS.clone(),
            emissions_years: constants::EMISSIONS_YEARS.clone(),
            emissions_states: owned(constants::EMISSIONS_STATES),
        }
    }
}

impl TableRegistry {
    pub fn contains_state(&self, state: &str) -> bool {
        self.emissions_states
            .iter()
            .any(|s| s.eq_ignore_ascii_case(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_all_kinds() {
        let reg = TableRegistry::default();
        assert!(reg.generator_tables.contains(&"generators_gen".to_string()));
        assert!(reg.filing_tables.contains(&"generation_filing".to_string()));
        assert!(reg.finance_years.contains(&1994));
        assert!(reg.contains_state("wa"));
        assert!(!reg.contains_state("ZZ"));
    }

    #[test]
    fn minimal_filing_subset_is_within_filing_universe() {
        let reg = TableRegistry::default();
        for t in &reg.minimal_filing_tables {
            assert!(reg.filing_tables.contains(t), "{t} missing from universe");
        }
    }
}
