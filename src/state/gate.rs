use crate::error::GateError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// One confirm-or-cancel question per armed release.
#[derive(Debug, Default)]
pub struct ConfirmGate {
    state: GateState,
}

impl ConfirmGate {
    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn open(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Open => Err(GateError::AlreadyOpen),
            GateState::Closed => {
                self.state = GateState::Open;
                Ok(())
            }
        }
    }

    /// Closes the gate. Only the first decision after `open` is accepted, so a
    /// double tap on the dialog cannot commit twice.
    pub fn resolve(&mut self, decision: Decision) -> Result<Decision, GateError> {
        match self.state {
            GateState::Closed => Err(GateError::NotOpen),
            GateState::Open => {
                self.state = GateState::Closed;
                Ok(decision)
            }
        }
    }
}
