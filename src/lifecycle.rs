//! Finds deletable items, prepares their markup once, and attaches a
//! [`SwipeController`] to each. Callers can register items explicitly; a
//! page-wide `MutationObserver` catches anything inserted without doing so.

use log::{debug, error, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlElement,
    MutationObserver, MutationObserverInit,
};

use crate::config::{INITIALIZED_ATTR, KindSpec, SwipeConfig};
use crate::controller::{DeletableItem, SwipeController};
use crate::error::{Result, SwipeError};
use crate::platform::{Listener, Platform};

thread_local! {
    static LIFECYCLE: RefCell<Option<Rc<Lifecycle>>> = const { RefCell::new(None) };
}

/// What the page currently looks like around one candidate item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Survey {
    pub initialized: bool,
    pub has_endpoint: bool,
    pub has_parent: bool,
    /// The parent already is this kind's wrapper.
    pub wrapped: bool,
    /// Affordance elements inside the wrapper (zero when not wrapped yet).
    pub affordances: usize,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("already initialized")]
    AlreadyInitialized,
    #[error("no delete endpoint")]
    MissingEndpoint,
    #[error("not attached to the document")]
    MissingParent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    Skip(SkipReason),
    Attach {
        wrap: bool,
        create_affordance: bool,
        /// Duplicate affordances to remove, keeping the first.
        remove_extra: usize,
    },
}

pub fn plan(survey: &Survey) -> Plan {
    if survey.initialized {
        return Plan::Skip(SkipReason::AlreadyInitialized);
    }
    if !survey.has_endpoint {
        return Plan::Skip(SkipReason::MissingEndpoint);
    }
    if !survey.has_parent {
        return Plan::Skip(SkipReason::MissingParent);
    }
    let affordances = if survey.wrapped { survey.affordances } else { 0 };
    Plan::Attach {
        wrap: !survey.wrapped,
        create_affordance: affordances == 0,
        remove_extra: affordances.saturating_sub(1),
    }
}

pub struct Lifecycle {
    config: SwipeConfig,
    platform: Platform,
    controllers: RefCell<Vec<Rc<SwipeController>>>,
    observer: RefCell<Option<(MutationObserver, Closure<dyn FnMut(js_sys::Array, MutationObserver)>)>>,
    pagehide: RefCell<Option<Listener>>,
}

impl Lifecycle {
    fn new(config: SwipeConfig, platform: Platform) -> Rc<Self> {
        Rc::new(Self {
            config,
            platform,
            controllers: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            pagehide: RefCell::new(None),
        })
    }

    fn document(&self) -> &Document {
        &self.platform.document
    }

    /// Attaches every eligible item on the page. Returns how many were new.
    pub fn scan(&self) -> usize {
        self.prune();
        let mut attached = 0;
        for kind in &self.config.kinds {
            let found = match self.document().query_selector_all(&kind.pending_selector()) {
                Ok(list) => list,
                Err(e) => {
                    warn!("bad selector for {}: {}", kind.name, SwipeError::from(e));
                    continue;
                }
            };
            for i in 0..found.length() {
                let Some(element) = found
                    .item(i)
                    .and_then(|n| n.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let endpoint = endpoint_for(&element, kind).unwrap_or_default();
                match self.register(element, endpoint, kind) {
                    Ok(true) => attached += 1,
                    Ok(false) => {}
                    Err(e) => debug!("skipping {} item: {e}", kind.name),
                }
            }
        }
        if attached > 0 {
            debug!("attached {attached} swipe item(s)");
        }
        attached
    }

    /// Drops controllers whose item has left the document.
    fn prune(&self) {
        let mut controllers = self.controllers.borrow_mut();
        let before = controllers.len();
        controllers.retain(|c| c.is_connected());
        let gone = before - controllers.len();
        if gone > 0 {
            debug!("released {gone} detached swipe item(s)");
        }
    }

    /// Explicit registration for items the page creates itself.
    /// `Ok(false)` means the item was skipped (usually: already attached).
    pub fn register(&self, element: HtmlElement, endpoint: String, kind: &KindSpec) -> Result<bool> {
        let endpoint = endpoint.trim().to_owned();
        let parent = element.parent_element();
        let wrapped = parent
            .as_ref()
            .is_some_and(|p| p.class_list().contains(&kind.wrapper_class()));
        let affordances = match (&parent, wrapped) {
            (Some(p), true) => p
                .query_selector_all(&format!(":scope > .{}", kind.affordance_class()))?
                .length() as usize,
            _ => 0,
        };
        let survey = Survey {
            initialized: element.has_attribute(INITIALIZED_ATTR),
            has_endpoint: !endpoint.is_empty(),
            has_parent: parent.is_some(),
            wrapped,
            affordances,
        };
        let (wrap, create_affordance, remove_extra) = match plan(&survey) {
            Plan::Skip(SkipReason::AlreadyInitialized) => return Ok(false),
            Plan::Skip(SkipReason::MissingEndpoint) => return Err(SwipeError::MissingEndpoint),
            Plan::Skip(SkipReason::MissingParent) => return Err(SwipeError::MissingParent),
            Plan::Attach {
                wrap,
                create_affordance,
                remove_extra,
            } => (wrap, create_affordance, remove_extra),
        };

        let wrapper = match parent {
            Some(p) if !wrap => p,
            Some(p) => {
                let w = self.document().create_element("div")?;
                w.set_class_name(&kind.wrapper_class());
                let anchor: &web_sys::Node = &element;
                p.insert_before(&w, Some(anchor))?;
                w.append_child(&element)?;
                w
            }
            None => return Err(SwipeError::MissingParent),
        };
        let affordance = self.affordance(&wrapper, kind, create_affordance, remove_extra)?;

        let item = DeletableItem {
            element: element.clone(),
            endpoint,
            kind: kind.clone(),
        };
        let ctrl = SwipeController::attach(item, affordance, &self.config, &self.platform)?;
        // Marked only once a live controller exists, so a failed attach can be retried.
        element.set_attribute(INITIALIZED_ATTR, "true")?;
        self.controllers.borrow_mut().push(ctrl);
        Ok(true)
    }

    fn affordance(
        &self,
        wrapper: &Element,
        kind: &KindSpec,
        create: bool,
        remove_extra: usize,
    ) -> Result<HtmlElement> {
        let selector = format!(":scope > .{}", kind.affordance_class());
        if create {
            let el = self.document().create_element("div")?;
            el.set_class_name(&kind.affordance_class());
            el.set_text_content(Some(&self.config.labels.neutral_glyph));
            wrapper.append_child(&el)?;
        } else if remove_extra > 0 {
            let all = wrapper.query_selector_all(&selector)?;
            for i in (1..all.length()).rev() {
                if let Some(extra) = all.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    extra.remove();
                }
            }
        }
        wrapper
            .query_selector(&selector)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| SwipeError::Dom("delete affordance missing after setup".into()))
    }

    fn observe(self: &Rc<Self>) -> Result<()> {
        let Some(body) = self.document().body() else {
            warn!("no document body; dynamic items will need explicit registration");
            return Ok(());
        };
        let weak: Weak<Self> = Rc::downgrade(self);
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _obs: MutationObserver| {
            if let Some(lc) = weak.upgrade() {
                lc.scan();
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;
        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    fn watch_pagehide(self: &Rc<Self>) -> Result<()> {
        let weak: Weak<Self> = Rc::downgrade(self);
        let listener = Listener::new(&self.platform.window, "pagehide", true, move |_: Event| {
            if let Some(lc) = weak.upgrade() {
                for ctrl in lc.controllers.borrow().iter() {
                    ctrl.close_dialog();
                }
            }
        })?;
        *self.pagehide.borrow_mut() = Some(listener);
        Ok(())
    }

    pub fn kind(&self, name: &str) -> Option<&KindSpec> {
        self.config.kind(name)
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        if let Some((observer, _)) = self.observer.get_mut().take() {
            observer.disconnect();
        }
    }
}

fn endpoint_for(item: &Element, kind: &KindSpec) -> Option<String> {
    let link = item.query_selector(&kind.action_selector).ok().flatten()?;
    let href = match link.dyn_ref::<HtmlAnchorElement>() {
        Some(a) => a.href(),
        None => link.get_attribute("href").unwrap_or_default(),
    };
    (!href.is_empty()).then_some(href)
}

fn install() -> Result<Rc<Lifecycle>> {
    let platform = Platform::browser()?;
    let config = SwipeConfig::from_page(&platform.document);
    log::set_max_level(config.log_filter());
    let lifecycle = Lifecycle::new(config, platform);
    lifecycle.scan();
    lifecycle.observe()?;
    lifecycle.watch_pagehide()?;
    LIFECYCLE.with(|slot| *slot.borrow_mut() = Some(lifecycle.clone()));
    Ok(lifecycle)
}

fn run_install() {
    if let Err(e) = install() {
        error!("swipe-to-delete not started: {e}");
    }
}

/// Starts the manager now, or once the document has finished parsing.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        error!("swipe-to-delete needs a browser document");
        return;
    };
    if document.ready_state() != "loading" {
        run_install();
        return;
    }
    let callback = Closure::once_into_js(run_install);
    let opts = web_sys::AddEventListenerOptions::new();
    opts.set_once(true);
    if let Err(e) = document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        callback.unchecked_ref(),
        &opts,
    ) {
        error!("could not wait for DOMContentLoaded: {}", SwipeError::from(e));
    }
}

/// Runs `f` against the installed manager, if any.
pub fn with_lifecycle<R>(f: impl FnOnce(&Rc<Lifecycle>) -> R) -> Option<R> {
    let lifecycle = LIFECYCLE.with(|slot| slot.borrow().clone())?;
    Some(f(&lifecycle))
}
