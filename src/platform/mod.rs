pub mod deletion;
pub mod haptics;
pub mod listener;
pub mod timer;

use std::rc::Rc;
use web_sys::{Document, Window};

use crate::error::{Result, SwipeError};

pub use deletion::{DeletionTransport, PageNavigation};
pub use haptics::{Haptics, NavigatorHaptics};
pub use listener::Listener;
pub use timer::{Timeout, defer};

/// Browser handles shared by every controller on the page.
#[derive(Clone)]
pub struct Platform {
    pub window: Window,
    pub document: Document,
    pub haptics: Rc<dyn Haptics>,
    pub transport: Rc<dyn DeletionTransport>,
}

impl Platform {
    pub fn browser() -> Result<Self> {
        let window = web_sys::window().ok_or(SwipeError::NoWindow)?;
        let document = window
            .document()
            .ok_or_else(|| SwipeError::Dom("window has no document".into()))?;
        Ok(Self {
            haptics: Rc::new(NavigatorHaptics::detect(&window)),
            transport: Rc::new(PageNavigation::new(window.location())),
            window,
            document,
        })
    }
}
