//! Scheduled posting of queued recommendations.
//!
//! - [`store`] -- the persistence port the poster reads and commits through.
//! - [`poster`] -- one select, format, deliver, commit cycle.
//! - [`scheduler`] -- fires the poster on the weekly calendar.

pub mod poster;
pub mod scheduler;
pub mod store;

pub use poster::{PostError, PostOutcome, PostStage, Poster, SkipReason};
pub use scheduler::{PostingScheduler, SchedulerHandle};
pub use store::{PgPostingStore, PostingStore, StoreError};
