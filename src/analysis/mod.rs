mod load;
mod report;
mod snapshot;

pub use load::{load_snapshot, parse_snapshot};
pub use report::{default_report_path, write_report};
pub use snapshot::{AccountNode, AnalysisSnapshot, FlaggedAccount, TransactionGraph, TransferEdge};
