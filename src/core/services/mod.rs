pub mod filter_service;
pub mod report_service;
pub mod summary_service;
pub mod timeline_service;

pub use filter_service::{
    FilterService, FilteredTransactions, Page, PropertyScope, TransactionQuery, TypeFilter,
    UnitScope,
};
pub use report_service::{Report, ReportRequest, ReportRow, ReportService};
pub use summary_service::{Aggregate, Summary, SummaryService};
pub use timeline_service::{Granularity, Timeline, TimelineBucket, TimelineRange, TimelineService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
