pub mod completion_worker;
pub mod confirmation;
pub mod dedup_registry;
pub mod intake;
pub mod scheduler;

pub use completion_worker::{CompletionJob, CompletionOutcome, CompletionWorker};
pub use confirmation::{ConfirmationBackend, ConfirmationError, DelayedConfirmation};
pub use dedup_registry::{DedupRegistry, RegistryLease};
pub use intake::{Admission, IntakeError, IntakeGate, TransferRequest};
pub use scheduler::{completion_queue, CompletionDispatcher, CompletionScheduler, SchedulerError};
