use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::error::Result;

/// A single restartable `setTimeout` slot. Scheduling again cancels whatever
/// was pending, so timers never stack.
pub struct Timeout {
    window: Window,
    pending: Option<Pending>,
}

struct Pending {
    id: i32,
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn schedule(&mut self, ms: i32, f: impl FnOnce() + 'static) -> Result<()> {
        self.cancel();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let callback = Closure::<dyn FnMut()>::once(move || {
            flag.set(true);
            f();
        });
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms.max(0),
            )?;
        self.pending = Some(Pending {
            id,
            fired,
            _callback: callback,
        });
        Ok(())
    }

    /// Returns true if a callback was still waiting to run.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(p) if !p.fired.get() => {
                self.window.clear_timeout_with_handle(p.id);
                true
            }
            _ => false,
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `f` on a fresh task, outside whatever handler is currently executing.
pub fn defer(window: &Window, f: impl FnOnce() + 'static) -> Result<()> {
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)?;
    Ok(())
}
