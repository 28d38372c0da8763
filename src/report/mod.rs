pub mod history;
pub mod types;

pub use history::{keep_last, update_data_file};
pub use types::{CaseRecord, CaseStatus, HistoryStore, SuiteRecord, SuiteStatus};
