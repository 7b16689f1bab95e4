use log::{LevelFilter, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

mod components;
mod config;
mod controller;
mod error;
mod feedback;
mod lifecycle;
mod model;
mod platform;
mod state;
mod util;

use error::SwipeError;

/// Attach swipe-to-delete to an item the page just created.
/// Returns false when the item was skipped; the reason goes to the console.
#[wasm_bindgen(js_name = registerSwipeItem)]
pub fn register_swipe_item(element: HtmlElement, endpoint: String, kind: String) -> bool {
    let outcome = lifecycle::with_lifecycle(|lc| {
        let item_kind = lc
            .kind(&kind)
            .cloned()
            .ok_or_else(|| SwipeError::UnknownKind(kind.clone()))?;
        lc.register(element, endpoint, &item_kind)
    });
    match outcome {
        Some(Ok(attached)) => attached,
        Some(Err(e)) => {
            warn!("registerSwipeItem({kind}): {e}");
            false
        }
        None => {
            warn!("registerSwipeItem called before swipe-to-delete started");
            false
        }
    }
}

/// Re-run discovery by hand. Returns how many items were newly attached.
#[wasm_bindgen(js_name = rescanSwipeItems)]
pub fn rescan_swipe_items() -> u32 {
    lifecycle::with_lifecycle(|lc| lc.scan() as u32).unwrap_or(0)
}

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    console_error_panic_hook::set_once();
    util::init_logging(LevelFilter::Warn);
    lifecycle::start();
}
