//! Browser host (wasm32): a `web-sys` render target and event loop.
use crate::*;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context as _;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

thread_local! {
    static APP: RefCell<Option<App<WebDom>>> = const { RefCell::new(None) };
}

/// Mounts `view` into the page and keeps it alive for the page's lifetime.
pub fn run_web_app(
    view: impl Fn(&Component) + 'static,
    options: MountOptions,
) -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);

    let dom = WebDom::new()?;
    let app = mount(view, dom, Rc::new(WebLoop), options)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new() -> anyhow::Result<Self> {
        let document = web_sys::window()
            .context("no window")?
            .document()
            .context("no document")?;
        Ok(Self { document })
    }
}

fn translate(name: EventName, raw: &web_sys::Event) -> Event {
    let mut event = Event::new(name);
    if let Some(target) = raw.target() {
        if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
            event.value = Some(input.value());
        } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
            event.value = Some(area.value());
        }
    }
    if let Some(key) = raw.dyn_ref::<web_sys::KeyboardEvent>() {
        event.key = Some(key.key());
    }
    event
}

impl RenderTarget for WebDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Element {
        self.document
            .create_element(tag)
            .expect("intrinsic tags are valid element names")
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        if let Err(err) = el.set_attribute(name, value) {
            log::warn!("set_attribute({name}) failed: {err:?}");
        }
    }

    fn remove_attribute(&self, el: &Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn set_style(&self, el: &Element, property: &str, value: &str) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log::warn!("style {property} failed: {err:?}");
        }
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn set_value(&self, el: &Element, value: &str) {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn set_hidden(&self, el: &Element, hidden: bool) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.set_hidden(hidden);
        }
    }

    fn bind_event(&self, el: &Element, name: EventName, handler: Option<EventHandler>) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        // Ownership of the closure moves to JS; it is collected once unbound.
        let callback: Option<js_sys::Function> = handler.map(|handler| {
            Closure::<dyn Fn(web_sys::Event)>::new(move |raw: web_sys::Event| {
                handler(&translate(name, &raw));
            })
            .into_js_value()
            .unchecked_into()
        });
        let callback = callback.as_ref();
        match name {
            EventName::Click => html.set_onclick(callback),
            EventName::Input => html.set_oninput(callback),
            EventName::Change => html.set_onchange(callback),
            EventName::Focus => html.set_onfocus(callback),
            EventName::Blur => html.set_onblur(callback),
            EventName::KeyDown => html.set_onkeydown(callback),
            EventName::KeyUp => html.set_onkeyup(callback),
        }
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        if let Err(err) = parent.append_child(child) {
            log::warn!("append_child failed: {err:?}");
        }
    }

    fn replace_children(&self, parent: &Element, children: &[Element]) {
        while let Some(old) = parent.first_child() {
            let _ = parent.remove_child(&old);
        }
        for child in children {
            self.append_child(parent, child);
        }
    }

    fn replace_with(&self, old: &Element, new: &Element) {
        if let Err(err) = old.replace_with_with_node_1(new) {
            log::warn!("replace_with failed: {err:?}");
        }
    }
}

/// `setTimeout(0)` for deferred passes, `requestAnimationFrame` for frames.
pub struct WebLoop;

impl EventLoop for WebLoop {
    fn defer(&self, task: Task) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        {
            log::warn!("setTimeout failed: {err:?}");
        }
    }

    fn request_frame(&self, task: Task) -> FrameId {
        let Some(window) = web_sys::window() else {
            return FrameId(0);
        };
        let callback = Closure::once_into_js(move || task());
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => FrameId(handle as u64),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {err:?}");
                FrameId(0)
            }
        }
    }

    fn cancel_frame(&self, id: FrameId) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id.0 as i32);
        }
    }
}
