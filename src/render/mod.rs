pub mod cache;
pub mod ticket;
pub mod worker;

pub use cache::{PageFrameCache, PageFrameKey};
pub use ticket::RenderTickets;
pub use worker::{RenderJob, RenderOutcome, RenderWorker};
