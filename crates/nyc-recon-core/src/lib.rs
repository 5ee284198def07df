pub mod clean;
pub mod coerce;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod validation;

pub use clean::{clean_payroll_data, clean_records, clean_spending_data, CleaningError};
pub use error::{ReconError, Result};
pub use model::{Dataset, ParseDatasetError};
pub use normalize::normalize_agency_name;
pub use reconcile::{agency_key_coverage, reconcile, KeyCoverage};
pub use validation::{inspect_raw_frame, ContractReport};
