//! The only code that writes to an item or its affordance.

use log::error;
use std::cell::RefCell;
use web_sys::{HtmlElement, Window};

use crate::config::{Labels, Timings};
use crate::error::{Result, SwipeError};
use crate::model::Effect;
use crate::platform::Timeout;
use crate::util::{delete_transition, reset_transition, translate_x};

const ARMED_CLASS: &str = "swiping";
const REMOVING_CLASS: &str = "swiping-delete";
const VISIBLE_CLASS: &str = "show";
const READY_CLASS: &str = "delete-ready";

pub struct FeedbackDriver {
    item: HtmlElement,
    affordance: HtmlElement,
    labels: Labels,
    timings: Timings,
    animation: RefCell<Timeout>,
}

impl FeedbackDriver {
    pub fn new(
        window: Window,
        item: HtmlElement,
        affordance: HtmlElement,
        labels: Labels,
        timings: Timings,
    ) -> Self {
        Self {
            item,
            affordance,
            labels,
            timings,
            animation: RefCell::new(Timeout::new(window)),
        }
    }

    /// Renders one visual effect. Effects that are not visual are ignored.
    pub fn apply(&self, effect: &Effect) -> Result<()> {
        match *effect {
            Effect::Interrupt => self.interrupt(),
            Effect::Follow { offset } | Effect::Hold { offset } => self.translate(offset),
            Effect::Reveal => {
                self.item.class_list().remove_1(ARMED_CLASS)?;
                self.affordance.class_list().remove_1(READY_CLASS)?;
                self.affordance.class_list().add_1(VISIBLE_CLASS)?;
                self.label(&self.labels.neutral_glyph);
                Ok(())
            }
            Effect::Arm => {
                self.affordance.class_list().add_2(VISIBLE_CLASS, READY_CLASS)?;
                self.label(&self.labels.armed);
                self.item.class_list().add_1(ARMED_CLASS)?;
                Ok(())
            }
            Effect::Conceal => self.clear_classes(),
            Effect::Reset => self.reset(),
            Effect::PreventScroll | Effect::Pulse(_) | Effect::Confirm => Ok(()),
        }
    }

    fn translate(&self, offset: f64) -> Result<()> {
        let style = self.item.style();
        let value = translate_x(offset);
        if value.is_empty() {
            style.remove_property("transform")?;
        } else {
            style.set_property("transform", &value)?;
        }
        Ok(())
    }

    fn label(&self, text: &str) {
        self.affordance.set_text_content(Some(text));
    }

    fn clear_classes(&self) -> Result<()> {
        self.item.class_list().remove_1(ARMED_CLASS)?;
        self.affordance
            .class_list()
            .remove_2(VISIBLE_CLASS, READY_CLASS)?;
        self.label(&self.labels.neutral_glyph);
        Ok(())
    }

    /// A new touch owns the item: drop any animation still in flight.
    fn interrupt(&self) -> Result<()> {
        if self.animation.borrow_mut().cancel() {
            self.item.style().remove_property("transition")?;
        }
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let style = self.item.style();
        style.set_property("transition", &reset_transition(self.timings.reset_ms))?;
        style.remove_property("transform")?;
        self.clear_classes()?;
        let item = self.item.clone();
        self.animation
            .borrow_mut()
            .schedule(self.timings.reset_ms, move || {
                if let Err(e) = item.style().remove_property("transition") {
                    error!("clearing reset transition failed: {}", SwipeError::from(e));
                }
            })
    }

    /// Plays the removal animation, then runs `then`.
    pub fn play_delete(&self, then: impl FnOnce() + 'static) -> Result<()> {
        self.item
            .style()
            .set_property("transition", &delete_transition(self.timings.delete_ms))?;
        self.item.class_list().add_1(REMOVING_CLASS)?;
        self.animation
            .borrow_mut()
            .schedule(self.timings.delete_ms, then)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn element(window: &Window) -> HtmlElement {
        let doc = window.document().unwrap();
        let el: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
        doc.body().unwrap().append_child(&el).unwrap();
        el
    }

    fn driver(reset_ms: i32) -> FeedbackDriver {
        let window = web_sys::window().unwrap();
        let timings = Timings {
            reset_ms,
            ..Timings::default()
        };
        FeedbackDriver::new(
            window.clone(),
            element(&window),
            element(&window),
            Labels::default(),
            timings,
        )
    }

    fn style(el: &HtmlElement, name: &str) -> String {
        el.style().get_property_value(name).unwrap()
    }

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }

    #[wasm_bindgen_test]
    fn reset_returns_an_armed_item_to_rest() {
        let d = driver(300);
        d.apply(&Effect::Follow { offset: 180.0 }).unwrap();
        d.apply(&Effect::Arm).unwrap();
        assert_eq!(style(&d.item, "transform"), "translateX(-180px)");
        assert!(d.item.class_list().contains(ARMED_CLASS));
        assert!(d.affordance.class_list().contains(READY_CLASS));
        assert_eq!(d.affordance.text_content().unwrap(), d.labels.armed);

        d.apply(&Effect::Reset).unwrap();
        assert_eq!(style(&d.item, "transform"), "");
        assert!(!style(&d.item, "transition").is_empty());
        assert!(!d.item.class_list().contains(ARMED_CLASS));
        assert!(!d.affordance.class_list().contains(VISIBLE_CLASS));
        assert!(!d.affordance.class_list().contains(READY_CLASS));
        assert_eq!(d.affordance.text_content().unwrap(), d.labels.neutral_glyph);
    }

    #[wasm_bindgen_test]
    fn touch_during_reset_cancels_the_pending_timer() {
        let d = driver(300);
        d.apply(&Effect::Reset).unwrap();
        d.apply(&Effect::Interrupt).unwrap();
        assert_eq!(style(&d.item, "transition"), "");
        assert!(!d.animation.borrow_mut().cancel());
    }

    #[wasm_bindgen_test]
    async fn restarted_reset_settles_once() {
        let d = driver(20);
        d.apply(&Effect::Follow { offset: 80.0 }).unwrap();
        d.apply(&Effect::Reset).unwrap();
        d.apply(&Effect::Reset).unwrap();
        sleep(80).await;
        assert_eq!(style(&d.item, "transition"), "");
        // The slot held one timer, and it has already fired.
        assert!(!d.animation.borrow_mut().cancel());
    }
}
