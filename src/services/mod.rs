pub mod identifier_codec;
pub mod issue_collector;
pub mod task_reconciler;

pub use issue_collector::IssueCollector;
pub use task_reconciler::{ActionOutcome, ReconcileReport, SyncAction, TaskIndex, TaskReconciler};
