use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};
use yew::AppHandle;
use yew::prelude::*;

use crate::error::{Result, SwipeError};
use crate::platform::Timeout;
use crate::state::Decision;

#[derive(Properties, PartialEq, Clone)]
pub struct ConfirmDialogProps {
    pub title: AttrValue,
    pub confirm_label: AttrValue,
    pub cancel_label: AttrValue,
    /// Delay before the `show` class is added, letting the fade-in transition run.
    pub show_delay_ms: i32,
    pub on_decide: Callback<Decision>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let shown = use_state(|| false);
    let backdrop_ref = use_node_ref();

    {
        let shown = shown.clone();
        let delay = props.show_delay_ms;
        use_effect_with((), move |_| {
            let mut timer = web_sys::window().map(Timeout::new);
            if let Some(t) = timer.as_mut() {
                if let Err(e) = t.schedule(delay, move || shown.set(true)) {
                    warn!("dialog fade-in not scheduled: {e}");
                }
            }
            move || drop(timer)
        });
    }

    let confirm_cb = {
        let cb = props.on_decide.clone();
        Callback::from(move |_| cb.emit(Decision::Confirm))
    };
    let cancel_cb = {
        let cb = props.on_decide.clone();
        Callback::from(move |_| cb.emit(Decision::Cancel))
    };
    // Only presses on the backdrop itself count, not ones inside the content box.
    let backdrop_cb = {
        let cb = props.on_decide.clone();
        let backdrop_ref = backdrop_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Element>().ok());
            if target.is_some() && target == backdrop_ref.cast::<Element>() {
                cb.emit(Decision::Cancel);
            }
        })
    };

    let class = classes!("delete-confirmation-modal", (*shown).then_some("show"));
    let opacity = if *shown { "1" } else { "0" };
    html! {
        <div ref={backdrop_ref} class={class} onclick={backdrop_cb}
            style={format!("position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:10000; transition:opacity 0.2s ease; opacity:{opacity};")}>
            <div class="delete-confirmation-content" role="dialog" aria-modal="true"
                style="background:var(--card-bg, #fff); border-radius:12px; padding:20px 24px; min-width:260px; max-width:90%; display:flex; flex-direction:column; gap:16px; text-align:center;">
                <h3 style="margin:0; font-size:18px;">{ props.title.clone() }</h3>
                <div class="delete-confirmation-buttons" style="display:flex; gap:12px; justify-content:center;">
                    <button class="btn-confirm-delete" onclick={confirm_cb}
                        style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1; padding:10px 0; border-radius:8px;">
                        { props.confirm_label.clone() }
                    </button>
                    <button class="btn-cancel-delete" onclick={cancel_cb}
                        style="flex:1; padding:10px 0; border-radius:8px;">
                        { props.cancel_label.clone() }
                    </button>
                </div>
            </div>
        </div>
    }
}

/// A mounted dialog. Dropping the handle without [`DialogHandle::close`]
/// leaves the dialog on the page.
pub struct DialogHandle {
    app: AppHandle<ConfirmDialog>,
    host: Element,
}

impl DialogHandle {
    pub fn mount(document: &Document, props: ConfirmDialogProps) -> Result<Self> {
        let body = document
            .body()
            .ok_or_else(|| SwipeError::Dom("document has no body".into()))?;
        let host = document.create_element("div")?;
        host.set_class_name("delete-confirmation-host");
        body.append_child(&host)?;
        let app = yew::Renderer::<ConfirmDialog>::with_root_and_props(host.clone(), props).render();
        Ok(Self { app, host })
    }

    pub fn close(self) {
        self.app.destroy();
        self.host.remove();
    }
}
