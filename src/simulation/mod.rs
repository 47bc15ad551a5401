pub mod draw;
pub mod record;
pub mod session;

pub use draw::{draw_hand, DepthWeights, HandDraw, MulliganDepth, PlayOrDraw, SamplingError};
pub use record::{Decision, RecordError, ResultRecord, Run, RunSnapshot, SelectionError};
pub use session::{
    DecisionSource, HandPrompt, Reply, SessionConfig, SessionState, SimulationError, Simulator,
};
