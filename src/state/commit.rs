use crate::model::{DeletionRequest, Pulse};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitStage {
    #[default]
    Pending,
    Animating,
    Requested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStep {
    Pulse(Pulse),
    Animate,
}

/// Haptic, then removal animation, then exactly one request.
#[derive(Debug)]
pub struct CommitPipeline {
    stage: CommitStage,
    request: DeletionRequest,
}

impl CommitPipeline {
    pub fn new(request: DeletionRequest) -> Self {
        Self {
            stage: CommitStage::Pending,
            request,
        }
    }

    pub fn stage(&self) -> CommitStage {
        self.stage
    }

    pub fn begin(&mut self) -> Option<[CommitStep; 2]> {
        if self.stage != CommitStage::Pending {
            return None;
        }
        self.stage = CommitStage::Animating;
        Some([CommitStep::Pulse(Pulse::Delete), CommitStep::Animate])
    }

    /// Called when the delete animation has run its course.
    pub fn finish(&mut self) -> Option<DeletionRequest> {
        if self.stage != CommitStage::Animating {
            return None;
        }
        self.stage = CommitStage::Requested;
        Some(self.request.clone())
    }
}
