pub mod process_ctx;
pub mod process_flow;
pub mod step;
pub mod tab_watch;

pub use process_ctx::ProcessCtx;
pub use process_flow::{ProcessFlow, ProcessResult};
pub use step::{tolerate, FlowStep, OptionalStep};
pub use tab_watch::TabSnapshot;
