use js_sys::{Array, Reflect};
use log::trace;
use wasm_bindgen::JsValue;
use web_sys::{Navigator, Window};

use crate::model::Pulse;

pub trait Haptics {
    /// Fire and forget. Unsupported platforms do nothing.
    fn pulse(&self, pulse: Pulse);
}

pub struct NavigatorHaptics {
    navigator: Option<Navigator>,
}

impl NavigatorHaptics {
    pub fn detect(window: &Window) -> Self {
        let navigator = window.navigator();
        let supported = Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false);
        Self {
            navigator: supported.then_some(navigator),
        }
    }
}

impl Haptics for NavigatorHaptics {
    fn pulse(&self, pulse: Pulse) {
        let Some(nav) = &self.navigator else {
            return;
        };
        let accepted = match pulse.pattern() {
            [ms] => nav.vibrate_with_duration(*ms),
            pattern => {
                let arr: Array = pattern.iter().map(|ms| JsValue::from(*ms)).collect();
                nav.vibrate_with_pattern(&arr)
            }
        };
        trace!("vibrate {pulse:?} accepted={accepted}");
    }
}
