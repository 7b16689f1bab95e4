use crate::model::{Effect, Pulse, SwipeState, Thresholds};

/// One touch interaction on one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub origin_x: f64,
    pub current_x: f64,
    /// Set once the finger has moved left past the dead band.
    pub is_tracking: bool,
    pub state: SwipeState,
}

impl GestureSession {
    pub fn start(x: f64) -> Self {
        Self {
            origin_x: x,
            current_x: x,
            is_tracking: false,
            state: SwipeState::Idle,
        }
    }

    /// Positive means the finger moved left.
    pub fn displacement(&self) -> f64 {
        self.origin_x - self.current_x
    }
}

/// Where the item rests between gestures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemPhase {
    #[default]
    Closed,
    /// Held at the reveal offset with the affordance showing.
    Open,
    /// Waiting on the confirmation dialog.
    Confirming,
    /// Commit in progress; the item no longer reacts to touch.
    Removing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchInput {
    Start { x: f64, touches: u32 },
    Move { x: f64, touches: u32 },
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerState {
    pub session: Option<GestureSession>,
    pub phase: ItemPhase,
}

impl TrackerState {
    fn displaced(&self) -> bool {
        self.phase == ItemPhase::Open || self.session.is_some_and(|s| s.is_tracking)
    }
}

/// Pure gesture transition. Returns the next state and the effects to render, in order.
pub fn transition(
    state: TrackerState,
    input: TouchInput,
    t: &Thresholds,
) -> (TrackerState, Vec<Effect>) {
    if matches!(state.phase, ItemPhase::Confirming | ItemPhase::Removing) {
        return (state, Vec::new());
    }
    match input {
        TouchInput::Start { x, touches } => on_start(state, x, touches),
        TouchInput::Move { x, touches } => on_move(state, x, touches, t),
        TouchInput::End => on_end(state, t),
        TouchInput::Cancel => abandon(state),
    }
}

fn on_start(state: TrackerState, x: f64, touches: u32) -> (TrackerState, Vec<Effect>) {
    if touches > 1 {
        return abandon(state);
    }
    // A touchend went missing mid-drag: put the item back before starting over.
    let stale = state.session.is_some_and(|s| s.is_tracking);
    let mut effects = Vec::with_capacity(2);
    if stale {
        effects.push(Effect::Reset);
    }
    effects.push(Effect::Interrupt);
    let next = TrackerState {
        session: Some(GestureSession::start(x)),
        phase: if stale { ItemPhase::Closed } else { state.phase },
    };
    (next, effects)
}

fn on_move(
    mut state: TrackerState,
    x: f64,
    touches: u32,
    t: &Thresholds,
) -> (TrackerState, Vec<Effect>) {
    if touches > 1 {
        return abandon(state);
    }
    let Some(mut s) = state.session else {
        return (state, Vec::new());
    };
    s.current_x = x;
    let diff = s.displacement();
    let mut effects = Vec::new();
    if diff > t.deadband {
        s.is_tracking = true;
        effects.push(Effect::PreventScroll);
        effects.push(Effect::Follow { offset: diff });
        let next = t.classify(diff);
        match (s.state, next) {
            (SwipeState::Armed, SwipeState::Armed) => {}
            (_, SwipeState::Armed) => {
                effects.push(Effect::Arm);
                effects.push(Effect::Pulse(Pulse::Arm));
            }
            (SwipeState::Idle, SwipeState::Revealed) => {
                effects.push(Effect::Reveal);
                effects.push(Effect::Pulse(Pulse::Reveal));
            }
            (SwipeState::Armed, SwipeState::Revealed) => effects.push(Effect::Reveal),
            (SwipeState::Revealed | SwipeState::Armed, SwipeState::Idle) => {
                effects.push(Effect::Conceal)
            }
            _ => {}
        }
        s.state = next;
    } else if diff < -t.deadband {
        s.is_tracking = false;
        s.state = SwipeState::Idle;
        state.phase = ItemPhase::Closed;
        effects.push(Effect::Reset);
    }
    state.session = Some(s);
    (state, effects)
}

fn on_end(state: TrackerState, t: &Thresholds) -> (TrackerState, Vec<Effect>) {
    let Some(s) = state.session else {
        return (state, Vec::new());
    };
    let diff = s.displacement();
    let (phase, effect) = if !s.is_tracking {
        match state.phase {
            ItemPhase::Open => (ItemPhase::Closed, Some(Effect::Reset)),
            phase => (phase, None),
        }
    } else {
        match s.state {
            SwipeState::Armed if diff >= t.arm => (ItemPhase::Confirming, Some(Effect::Confirm)),
            SwipeState::Revealed if diff >= t.reveal => (
                ItemPhase::Open,
                Some(Effect::Hold { offset: t.reveal }),
            ),
            _ => (ItemPhase::Closed, Some(Effect::Reset)),
        }
    };
    let next = TrackerState {
        session: None,
        phase,
    };
    (next, effect.into_iter().collect())
}

fn abandon(state: TrackerState) -> (TrackerState, Vec<Effect>) {
    let effects = if state.displaced() {
        vec![Effect::Reset]
    } else {
        Vec::new()
    };
    let next = TrackerState {
        session: None,
        phase: if effects.is_empty() {
            state.phase
        } else {
            ItemPhase::Closed
        },
    };
    (next, effects)
}

/// Gesture tracker for a single item: holds the current [`TrackerState`]
/// and feeds it through [`transition`].
#[derive(Debug, Default)]
pub struct Tracker {
    thresholds: Thresholds,
    state: TrackerState,
}

impl Tracker {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: TrackerState::default(),
        }
    }

    pub fn handle(&mut self, input: TouchInput) -> Vec<Effect> {
        let (next, effects) = transition(self.state, input, &self.thresholds);
        self.state = next;
        effects
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn phase(&self) -> ItemPhase {
        self.state.phase
    }

    /// The dialog was dismissed: go back to rest.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        self.state = TrackerState::default();
        vec![Effect::Reset]
    }

    /// Deletion confirmed; ignore all further touches.
    pub fn begin_removal(&mut self) {
        self.state = TrackerState {
            session: None,
            phase: ItemPhase::Removing,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tracker() -> Tracker {
        Tracker::new(Thresholds::default())
    }

    fn start(x: f64) -> TouchInput {
        TouchInput::Start { x, touches: 1 }
    }

    fn mv(x: f64) -> TouchInput {
        TouchInput::Move { x, touches: 1 }
    }

    fn drive(t: &mut Tracker, inputs: &[TouchInput]) -> Vec<Effect> {
        inputs.iter().flat_map(|i| t.handle(*i)).collect()
    }

    fn pulses(effects: &[Effect]) -> Vec<Pulse> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Pulse(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn dead_zone_moves_change_nothing() {
        let mut t = tracker();
        assert_eq!(t.handle(start(100.0)), vec![Effect::Interrupt]);
        for x in [95.0, 105.0, 91.0, 109.0, 100.0, 90.0, 110.0] {
            assert_eq!(t.handle(mv(x)), vec![]);
        }
        let session = t.state().session.unwrap();
        assert!(!session.is_tracking);
        assert_eq!(session.state, SwipeState::Idle);
        assert_eq!(t.handle(TouchInput::End), vec![]);
        assert_eq!(t.state(), TrackerState::default());
    }

    #[test]
    fn monotonic_drag_pulses_once_per_edge() {
        let mut t = tracker();
        let moves: Vec<TouchInput> = std::iter::once(start(400.0))
            .chain((1..=60).map(|i| mv(400.0 - i as f64 * 5.0)))
            .collect();
        let effects = drive(&mut t, &moves);
        assert_eq!(pulses(&effects), vec![Pulse::Reveal, Pulse::Arm]);
        assert_eq!(t.state().session.unwrap().state, SwipeState::Armed);
        assert_eq!(effects.iter().filter(|e| **e == Effect::Arm).count(), 1);
    }

    #[test]
    fn follows_finger_one_to_one_while_tracking() {
        let mut t = tracker();
        t.handle(start(300.0));
        assert_eq!(
            t.handle(mv(270.0)),
            vec![Effect::PreventScroll, Effect::Follow { offset: 30.0 }]
        );
        assert_eq!(
            t.handle(mv(220.0)),
            vec![
                Effect::PreventScroll,
                Effect::Follow { offset: 80.0 },
                Effect::Reveal,
                Effect::Pulse(Pulse::Reveal),
            ]
        );
    }

    #[test]
    fn reveal_then_arm_then_release_opens_confirmation() {
        let mut t = tracker();
        t.handle(start(300.0));
        let revealed = t.handle(mv(220.0));
        assert!(revealed.contains(&Effect::Reveal));
        assert_eq!(t.state().session.unwrap().state, SwipeState::Revealed);
        let armed = t.handle(mv(140.0));
        assert!(armed.contains(&Effect::Arm));
        assert!(armed.contains(&Effect::Pulse(Pulse::Arm)));
        assert_eq!(t.handle(TouchInput::End), vec![Effect::Confirm]);
        assert_eq!(t.phase(), ItemPhase::Confirming);
        assert_eq!(t.state().session, None);
    }

    #[test]
    fn touches_are_ignored_while_confirming() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(100.0), TouchInput::End]);
        assert_eq!(t.phase(), ItemPhase::Confirming);
        assert_eq!(drive(&mut t, &[start(300.0), mv(100.0), TouchInput::End]), vec![]);
        assert_eq!(t.dismiss(), vec![Effect::Reset]);
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn release_between_thresholds_holds_at_reveal_offset() {
        let mut t = tracker();
        let effects = drive(&mut t, &[start(300.0), mv(200.0), TouchInput::End]);
        assert_eq!(effects.last(), Some(&Effect::Hold { offset: 60.0 }));
        assert_eq!(t.phase(), ItemPhase::Open);
    }

    #[test]
    fn release_below_reveal_resets() {
        let mut t = tracker();
        let effects = drive(&mut t, &[start(300.0), mv(260.0), TouchInput::End]);
        assert_eq!(effects.last(), Some(&Effect::Reset));
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn drifting_back_into_dead_zone_after_arming_resets_on_release() {
        let mut t = tracker();
        let effects = drive(
            &mut t,
            &[start(300.0), mv(100.0), mv(295.0), TouchInput::End],
        );
        assert_eq!(effects.last(), Some(&Effect::Reset));
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn backing_out_of_armed_has_no_pulse() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(100.0)]);
        let back = t.handle(mv(200.0));
        assert_eq!(
            back,
            vec![
                Effect::PreventScroll,
                Effect::Follow { offset: 100.0 },
                Effect::Reveal
            ]
        );
        let idle = t.handle(mv(270.0));
        assert_eq!(pulses(&idle), vec![]);
        assert!(idle.contains(&Effect::Conceal));
        assert_eq!(t.state().session.unwrap().state, SwipeState::Idle);
    }

    #[test]
    fn rightward_drag_resets_from_any_state() {
        let mut t = tracker();
        assert_eq!(drive(&mut t, &[start(200.0), mv(250.0)]), vec![Effect::Interrupt, Effect::Reset]);
        assert_eq!(t.state().session.unwrap().state, SwipeState::Idle);

        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(100.0)]);
        let effects = t.handle(mv(320.0));
        assert_eq!(effects, vec![Effect::Reset]);
        let session = t.state().session.unwrap();
        assert_eq!(session.state, SwipeState::Idle);
        assert!(!session.is_tracking);
        assert_eq!(t.handle(TouchInput::End), vec![]);
    }

    #[test]
    fn tap_on_open_item_closes_it() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(200.0), TouchInput::End]);
        assert_eq!(t.phase(), ItemPhase::Open);

        let effects = drive(&mut t, &[start(150.0), mv(155.0), TouchInput::End]);
        assert_eq!(effects, vec![Effect::Interrupt, Effect::Reset]);
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn right_swipe_on_open_item_resets_once() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(200.0), TouchInput::End]);
        let effects = drive(&mut t, &[start(150.0), mv(180.0), TouchInput::End]);
        assert_eq!(effects, vec![Effect::Interrupt, Effect::Reset]);
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn second_finger_abandons_the_gesture() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(250.0)]);
        let effects = t.handle(TouchInput::Move {
            x: 100.0,
            touches: 2,
        });
        assert_eq!(effects, vec![Effect::Reset]);
        assert_eq!(t.state().session, None);
        assert_eq!(t.handle(mv(50.0)), vec![]);
        assert_eq!(t.handle(TouchInput::End), vec![]);
    }

    #[test]
    fn second_finger_on_untouched_item_is_silent() {
        let mut t = tracker();
        t.handle(start(300.0));
        assert_eq!(
            t.handle(TouchInput::Start {
                x: 200.0,
                touches: 2
            }),
            vec![]
        );
        assert_eq!(t.state().session, None);
    }

    #[test]
    fn cancel_resets_a_tracked_gesture() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(120.0)]);
        assert_eq!(t.handle(TouchInput::Cancel), vec![Effect::Reset]);
        assert_eq!(t.state(), TrackerState::default());
    }

    #[test]
    fn new_start_replaces_leftover_session() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(250.0)]);
        assert_eq!(t.handle(start(10.0)), vec![Effect::Reset, Effect::Interrupt]);
        assert_eq!(t.state().session, Some(GestureSession::start(10.0)));
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn lost_touchend_then_tap_leaves_item_at_rest() {
        let mut t = tracker();
        let dragged = drive(&mut t, &[start(300.0), mv(200.0)]);
        assert!(dragged.contains(&Effect::Follow { offset: 100.0 }));
        assert_eq!(t.handle(start(300.0)), vec![Effect::Reset, Effect::Interrupt]);
        assert_eq!(t.handle(TouchInput::End), vec![]);
        assert_eq!(t.state(), TrackerState::default());
    }

    #[test]
    fn untracked_leftover_session_is_replaced_quietly() {
        let mut t = tracker();
        drive(&mut t, &[start(300.0), mv(295.0)]);
        assert_eq!(t.handle(start(120.0)), vec![Effect::Interrupt]);
        assert_eq!(t.phase(), ItemPhase::Closed);
    }

    #[test]
    fn origin_at_zero_is_a_real_session() {
        let mut t = tracker();
        t.handle(start(0.0));
        assert_eq!(t.handle(mv(30.0)), vec![Effect::Reset]);
    }

    #[test]
    fn removal_freezes_the_tracker() {
        let mut t = tracker();
        t.begin_removal();
        assert_eq!(drive(&mut t, &[start(300.0), mv(100.0), TouchInput::End]), vec![]);
        assert_eq!(t.phase(), ItemPhase::Removing);
    }
}
