pub mod commit;
pub mod gate;
pub mod session;

pub use commit::{CommitPipeline, CommitStep};
pub use gate::{ConfirmGate, Decision};
pub use session::{TouchInput, Tracker};
