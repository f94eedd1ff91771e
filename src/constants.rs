//! Built-in constant tables: the fixed universes of valid output tables,
//! working years, and state codes per dataset kind, plus the small lookup
//! tables that get materialized as static package resources.
//!
//! Validators should not read these directly; they go through a
//! [`crate::registry::TableRegistry`] so tests can swap in restricted
//! universes.

use once_cell::sync::Lazy;

// Dataset kind config keys (used in bundle settings files)
pub const GENERATORS_KIND: &str = "generators";
pub const FINANCE_KIND: &str = "finance";
pub const EMISSIONS_KIND: &str = "emissions";
pub const REFERENCE_KIND: &str = "reference";
pub const LINKAGE_KIND: &str = "linkage";

/// Aggregate logical table name for the streamed emissions output. Physical
/// resources are written per partition as `hourly_emissions_<slug>`.
pub const EMISSIONS_TABLE: &str = "hourly_emissions";

/// Output tables derived from the generator reporting form.
pub const GENERATOR_TABLES: &[&str] = &[
    "generators_gen",
    "plants_gen",
    "utilities_gen",
    "ownership_gen",
    "boiler_generator_assn_gen",
];

/// Output tables derived from the companion operations filing form.
pub const FILING_TABLES: &[&str] = &[
    "generation_fuel_filing",
    "boiler_fuel_filing",
    "generation_filing",
    "fuel_receipts_costs_filing",
    "mine_info_filing",
];

/// The minimal companion filing subset forced in when only generator-form
/// years are requested. Harvesting and the boiler/generator association both
/// need these two tables for cross-referencing.
pub const MINIMAL_FILING_TABLES: &[&str] = &["boiler_fuel_filing", "generation_filing"];

/// Output tables derived from the annual financial filing form.
pub const FINANCE_TABLES: &[&str] = &[
    "fuel_finance",
    "plants_steam_finance",
    "plants_hydro_finance",
    "plant_in_service_finance",
    "purchased_power_finance",
    "accumulated_depreciation_finance",
];

/// Output tables derived from the auxiliary modeling-platform reference data.
pub const REFERENCE_TABLES: &[&str] = &[
    "load_curves_ref",
    "plant_region_map_ref",
    "transmission_joints_ref",
];

pub static GENERATOR_YEARS: Lazy<Vec<i32>> = Lazy::new(|| (2011..=2018).collect());
pub static FILING_YEARS: Lazy<Vec<i32>> = Lazy::new(|| (2009..=2018).collect());
pub static FINANCE_YEARS: Lazy<Vec<i32>> = Lazy::new(|| (1994..=2018).collect());
pub static EMISSIONS_YEARS: Lazy<Vec<i32>> = Lazy::new(|| (1995..=2018).collect());

/// Continental state codes covered by the hourly emissions feed.
pub const EMISSIONS_STATES: &[&str] = &[
    "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "IA", "ID", "IL", "IN", "KS",
    "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ",
    "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT",
    "WA", "WI", "WV", "WY",
];

// Static lookup data materialized by the Static Table Loader. Abbreviation
// codes follow the filing form instructions.

pub const FUEL_TYPES: &[(&str, &str)] = &[
    ("BIT", "bituminous coal"),
    ("SUB", "subbituminous coal"),
    ("LIG", "lignite coal"),
    ("NG", "natural gas"),
    ("DFO", "distillate fuel oil"),
    ("RFO", "residual fuel oil"),
    ("NUC", "nuclear"),
    ("SUN", "solar"),
    ("WND", "wind"),
    ("WAT", "hydroelectric"),
    ("GEO", "geothermal"),
    ("WDS", "wood and wood waste"),
];

pub const PRIME_MOVERS: &[(&str, &str)] = &[
    ("ST", "steam turbine"),
    ("GT", "combustion gas turbine"),
    ("CT", "combined cycle combustion turbine"),
    ("CA", "combined cycle steam part"),
    ("IC", "internal combustion engine"),
    ("HY", "hydraulic turbine"),
    ("PS", "pumped storage"),
    ("WT", "onshore wind turbine"),
    ("PV", "photovoltaic"),
    ("BT", "binary cycle turbine"),
];

pub const ENERGY_SOURCES: &[(&str, &str)] = &[
    ("BIT", "bituminous coal"),
    ("SUB", "subbituminous coal"),
    ("NG", "natural gas"),
    ("DFO", "distillate fuel oil"),
    ("NUC", "uranium"),
    ("SUN", "solar radiation"),
    ("WND", "wind"),
    ("WAT", "water"),
    ("MWH", "electricity in storage"),
];

pub const TRANSPORT_MODES: &[(&str, &str)] = &[
    ("RR", "rail"),
    ("TK", "truck"),
    ("RV", "river barge"),
    ("GL", "great lakes vessel"),
    ("PL", "pipeline"),
    ("CV", "conveyor"),
    ("SP", "slurry pipeline"),
];

/// Uniform system of accounts for electric plant, filing form schedule A.
pub const FINANCE_ACCOUNTS: &[(&str, &str)] = &[
    ("101", "electric plant in service"),
    ("311", "structures and improvements"),
    ("312", "boiler plant equipment"),
    ("314", "turbogenerator units"),
    ("315", "accessory electric equipment"),
    ("331", "structures and improvements (hydro)"),
    ("332", "reservoirs, dams and waterways"),
    ("333", "water wheels, turbines and generators"),
    ("341", "structures and improvements (other)"),
    ("344", "generators"),
];

/// Row labels of the accumulated depreciation schedule.
pub const FINANCE_DEPRECIATION_LINES: &[(&str, &str)] = &[
    ("1", "balance at beginning of year"),
    ("4", "depreciation provision for year"),
    ("12", "book cost of plant retired"),
    ("13", "cost of removal"),
    ("14", "salvage"),
    ("16", "balance at end of year"),
];

/// Modeling-platform region identifiers, used as a foreign key by most of the
/// other reference tables.
pub const REFERENCE_REGIONS: &[&str] = &[
    "NEWE", "NYCW", "NYUP", "PJMD", "PJMW", "MISW", "MISE", "SPPN", "SPPS", "ERCT", "RMPA",
    "BASN", "CANO", "CASO", "PNWW",
];
