use log::{debug, error, info, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys::{HtmlElement, TouchEvent};
use yew::Callback;

use crate::components::{ConfirmDialogProps, DialogHandle};
use crate::config::{KindSpec, SwipeConfig};
use crate::error::Result;
use crate::feedback::FeedbackDriver;
use crate::model::{DeletionRequest, Effect};
use crate::platform::{Listener, Platform, defer};
use crate::state::{CommitPipeline, CommitStep, ConfirmGate, Decision, TouchInput, Tracker};

/// A list entry the user can swipe away.
pub struct DeletableItem {
    pub element: HtmlElement,
    pub endpoint: String,
    pub kind: KindSpec,
}

#[derive(Clone, Copy, Debug)]
enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Maps a raw touch event on an item to tracker input. `remaining` counts the
/// fingers still down on the item after the event.
fn touch_input(phase: TouchPhase, remaining: u32, first_x: Option<f64>) -> Option<TouchInput> {
    match (phase, first_x) {
        (TouchPhase::Start, Some(x)) => Some(TouchInput::Start {
            x,
            touches: remaining,
        }),
        (TouchPhase::Move, Some(x)) => Some(TouchInput::Move {
            x,
            touches: remaining,
        }),
        (TouchPhase::Start | TouchPhase::Move, None) => None,
        // Another finger on this item is still down, so the gesture is not over yet.
        (TouchPhase::End, _) if remaining > 0 => None,
        (TouchPhase::End, _) => Some(TouchInput::End),
        (TouchPhase::Cancel, _) => Some(TouchInput::Cancel),
    }
}

/// Wires one item's touch events through the tracker, the feedback driver,
/// the confirmation gate and the commit pipeline.
pub struct SwipeController {
    item: DeletableItem,
    config: SwipeConfig,
    platform: Platform,
    tracker: RefCell<Tracker>,
    gate: RefCell<ConfirmGate>,
    commit: RefCell<CommitPipeline>,
    dialog: RefCell<Option<DialogHandle>>,
    driver: FeedbackDriver,
    listeners: RefCell<Vec<Listener>>,
}

impl SwipeController {
    pub fn attach(
        item: DeletableItem,
        affordance: HtmlElement,
        config: &SwipeConfig,
        platform: &Platform,
    ) -> Result<Rc<Self>> {
        let driver = FeedbackDriver::new(
            platform.window.clone(),
            item.element.clone(),
            affordance,
            config.labels.clone(),
            config.timings.clone(),
        );
        let ctrl = Rc::new(Self {
            tracker: RefCell::new(Tracker::new(config.thresholds)),
            gate: RefCell::new(ConfirmGate::default()),
            commit: RefCell::new(CommitPipeline::new(DeletionRequest::get(&item.endpoint))),
            dialog: RefCell::new(None),
            driver,
            listeners: RefCell::new(Vec::new()),
            config: config.clone(),
            platform: platform.clone(),
            item,
        });
        // touchmove must stay non-passive so scrolling can be suppressed mid-swipe.
        let bindings = [
            ("touchstart", TouchPhase::Start, true),
            ("touchmove", TouchPhase::Move, false),
            ("touchend", TouchPhase::End, true),
            ("touchcancel", TouchPhase::Cancel, true),
        ];
        let mut listeners = Vec::with_capacity(bindings.len());
        for (event, phase, passive) in bindings {
            let weak: Weak<Self> = Rc::downgrade(&ctrl);
            listeners.push(Listener::new(
                &ctrl.item.element,
                event,
                passive,
                move |e: TouchEvent| {
                    if let Some(ctrl) = weak.upgrade() {
                        ctrl.on_touch(&e, phase);
                    }
                },
            )?);
        }
        *ctrl.listeners.borrow_mut() = listeners;
        debug!("attached {} -> {}", ctrl.item.kind.name, ctrl.item.endpoint);
        Ok(ctrl)
    }

    fn on_touch(self: &Rc<Self>, event: &TouchEvent, phase: TouchPhase) {
        // Only fingers that went down on this item count; others belong to other targets.
        let touches = event.target_touches();
        let first_x = touches.item(0).map(|t| f64::from(t.client_x()));
        if let Some(input) = touch_input(phase, touches.length(), first_x) {
            self.feed(input, Some(event));
        }
    }

    fn feed(self: &Rc<Self>, input: TouchInput, event: Option<&TouchEvent>) {
        let effects = self.tracker.borrow_mut().handle(input);
        trace!("{input:?} -> {:?} {effects:?}", self.tracker.borrow().state());
        self.render(&effects, event);
    }

    /// False once the page has removed the item.
    pub fn is_connected(&self) -> bool {
        self.item.element.is_connected()
    }

    fn render(self: &Rc<Self>, effects: &[Effect], event: Option<&TouchEvent>) {
        for effect in effects {
            match effect {
                Effect::PreventScroll => {
                    if let Some(e) = event {
                        e.prevent_default();
                    }
                }
                Effect::Pulse(p) => self.platform.haptics.pulse(*p),
                Effect::Confirm => self.open_gate(),
                visual => {
                    if let Err(e) = self.driver.apply(visual) {
                        error!("render {visual:?} failed: {e}");
                    }
                }
            }
        }
    }

    fn open_gate(self: &Rc<Self>) {
        let opened = self.gate.borrow_mut().open();
        if let Err(e) = opened {
            debug!("gate {:?}: {e}", self.gate.borrow().state());
            return;
        }
        let weak = Rc::downgrade(self);
        let props = ConfirmDialogProps {
            title: self.item.kind.title.clone().into(),
            confirm_label: self.config.labels.confirm.clone().into(),
            cancel_label: self.config.labels.cancel.clone().into(),
            show_delay_ms: self.config.timings.dialog_show_delay_ms,
            on_decide: Callback::from(move |d: Decision| {
                if let Some(ctrl) = weak.upgrade() {
                    ctrl.decide(d);
                }
            }),
        };
        match DialogHandle::mount(&self.platform.document, props) {
            Ok(handle) => *self.dialog.borrow_mut() = Some(handle),
            Err(e) => {
                error!("confirmation dialog failed to open: {e}");
                self.decide(Decision::Cancel);
            }
        }
    }

    fn decide(self: &Rc<Self>, decision: Decision) {
        let decision = match self.gate.borrow_mut().resolve(decision) {
            Ok(d) => d,
            Err(e) => {
                debug!("ignoring {decision:?}: {e}");
                return;
            }
        };
        // Called from inside the dialog's own handler, so tear it down on the next task.
        if let Some(dialog) = self.dialog.borrow_mut().take() {
            if let Err(e) = defer(&self.platform.window, move || dialog.close()) {
                error!("dialog teardown not scheduled: {e}");
            }
        }
        match decision {
            Decision::Confirm => self.commit(),
            Decision::Cancel => {
                let effects = self.tracker.borrow_mut().dismiss();
                self.render(&effects, None);
            }
        }
    }

    fn commit(self: &Rc<Self>) {
        self.tracker.borrow_mut().begin_removal();
        let Some(steps) = self.commit.borrow_mut().begin() else {
            return;
        };
        for step in steps {
            match step {
                CommitStep::Pulse(p) => self.platform.haptics.pulse(p),
                CommitStep::Animate => {
                    let weak = Rc::downgrade(self);
                    let played = self.driver.play_delete(move || {
                        if let Some(ctrl) = weak.upgrade() {
                            ctrl.finish_commit();
                        }
                    });
                    if let Err(e) = played {
                        error!("delete animation failed, sending request now: {e}");
                        self.finish_commit();
                    }
                }
            }
        }
    }

    fn finish_commit(&self) {
        let finished = self.commit.borrow_mut().finish();
        let Some(request) = finished else {
            debug!("commit already {:?}", self.commit.borrow().stage());
            return;
        };
        info!("deleting {} via {}", self.item.kind.name, request.target);
        if let Err(e) = self.platform.transport.send(&request) {
            error!("deletion request failed: {e}");
        }
    }

    /// Cleanup when the page goes away: an open dialog counts as cancelled,
    /// so a page restored from the back-forward cache shows the item closed.
    pub fn close_dialog(self: &Rc<Self>) {
        let Some(dialog) = self.dialog.borrow_mut().take() else {
            return;
        };
        dialog.close();
        self.decide(Decision::Cancel);
    }
}

impl Drop for SwipeController {
    fn drop(&mut self) {
        if let Some(dialog) = self.dialog.get_mut().take() {
            dialog.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn start_and_move_report_fingers_on_the_item() {
        assert_eq!(
            touch_input(TouchPhase::Start, 1, Some(240.0)),
            Some(TouchInput::Start {
                x: 240.0,
                touches: 1
            })
        );
        assert_eq!(
            touch_input(TouchPhase::Move, 2, Some(200.0)),
            Some(TouchInput::Move {
                x: 200.0,
                touches: 2
            })
        );
        assert_eq!(touch_input(TouchPhase::Move, 0, None), None);
    }

    #[test]
    fn release_finalizes_once_no_finger_remains_on_the_item() {
        // A finger resting elsewhere on the screen is not in the item's target list.
        assert_eq!(touch_input(TouchPhase::End, 0, None), Some(TouchInput::End));
        assert_eq!(touch_input(TouchPhase::End, 1, Some(90.0)), None);
    }

    #[test]
    fn cancel_always_reaches_the_tracker() {
        assert_eq!(touch_input(TouchPhase::Cancel, 1, Some(10.0)), Some(TouchInput::Cancel));
        assert_eq!(touch_input(TouchPhase::Cancel, 0, None), Some(TouchInput::Cancel));
    }
}
