pub mod constants;
pub mod error;
pub mod etl;
pub mod load;
pub mod logging;
pub mod registry;
pub mod settings;
pub mod sources;
pub mod table;
