//! Platform runners: the headless in-memory host, and the browser DOM on wasm32.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context as _;
use sprig_core::*;
use sprig_devtools::Inspector;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// How and where an app is mounted.
#[derive(Clone, Debug)]
pub struct MountOptions {
    /// Id of the container element the root is mounted into.
    pub host_id: String,
    pub mode: RenderMode,
    /// Attach a devtools inspector that logs per-pass metrics.
    pub inspect: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            host_id: "app".to_owned(),
            mode: RenderMode::Deferred,
            inspect: false,
        }
    }
}

/// A mounted app. Dropping it stops continuous rendering.
pub struct App<T: RenderTarget + 'static> {
    scheduler: Scheduler,
    renderer: Rc<RefCell<Renderer<T>>>,
    inspector: Option<Rc<RefCell<Inspector>>>,
}

impl<T: RenderTarget + 'static> App<T> {
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn root(&self) -> Component {
        self.scheduler.root()
    }

    pub fn passes(&self) -> u64 {
        self.scheduler.passes()
    }

    pub fn inspector(&self) -> Option<&Rc<RefCell<Inspector>>> {
        self.inspector.as_ref()
    }

    /// Runs `f` against the renderer. Must not be called from inside a pass.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&Renderer<T>) -> R) -> R {
        f(&self.renderer.borrow())
    }
}

impl<T: RenderTarget + 'static> Drop for App<T> {
    fn drop(&mut self) {
        self.scheduler.stop_continuous();
    }
}

/// Mounts `view` into the element `options.host_id` of `target` and renders
/// it once. Fails fast when the host does not exist.
pub fn mount<T: RenderTarget + 'static>(
    view: impl Fn(&Component) + 'static,
    target: T,
    event_loop: Rc<dyn EventLoop>,
    options: MountOptions,
) -> Result<App<T>> {
    let renderer = Rc::new(RefCell::new(Renderer::new(target, &options.host_id)?));
    let r = renderer.clone();
    let scheduler = Scheduler::new(view, event_loop, move |write, readers, tree| {
        r.borrow_mut().render(write, readers, tree)
    });
    let inspector = options.inspect.then(|| Inspector::attach(&scheduler));

    scheduler.start();
    if options.mode == RenderMode::Continuous {
        scheduler.start_continuous();
    }
    log::info!("mounted into #{} ({:?})", options.host_id, options.mode);

    Ok(App {
        scheduler,
        renderer,
        inspector,
    })
}

/// An app mounted on a [`MemoryDom`] and driven by a [`ManualLoop`].
pub struct Headless {
    pub app: App<MemoryDom>,
    pub dom: MemoryDom,
    pub event_loop: Rc<ManualLoop>,
}

impl Headless {
    /// Runs pending deferred passes.
    pub fn settle(&self) -> usize {
        self.event_loop.run_until_idle()
    }

    /// Fires one animation frame.
    pub fn frame(&self) -> usize {
        self.event_loop.tick_frame()
    }

    pub fn element(&self, path: &str) -> Option<ElementKey> {
        self.dom.element_by_id(path)
    }

    /// Clicks the element rendered for `path`, then settles.
    pub fn click(&self, path: &str) -> bool {
        let handled = self.element(path).is_some_and(|el| self.dom.click(el));
        self.settle();
        handled
    }

    /// Types `text` into the input rendered for `path`, then settles.
    pub fn type_text(&self, path: &str, text: &str) -> bool {
        let handled = self.element(path).is_some_and(|el| {
            self.dom
                .dispatch(el, Event::new(EventName::Input).with_value(text))
        });
        self.settle();
        handled
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.element(path).and_then(|el| self.dom.text_of(el))
    }

    pub fn dump(&self) -> String {
        self.dom.dump()
    }
}

pub fn headless(view: impl Fn(&Component) + 'static) -> anyhow::Result<Headless> {
    headless_with(view, MountOptions::default())
}

pub fn headless_with(
    view: impl Fn(&Component) + 'static,
    options: MountOptions,
) -> anyhow::Result<Headless> {
    let dom = MemoryDom::with_host(&options.host_id);
    let event_loop = Rc::new(ManualLoop::new());
    let app = mount(view, dom.clone(), event_loop.clone(), options)
        .context("mounting headless app")?;
    Ok(Headless {
        app,
        dom,
        event_loop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_ui::{Button, Div, Stack, Text, TextInput};

    #[test]
    fn test_missing_host_is_a_configuration_error() {
        let result = mount(
            |_| {},
            MemoryDom::with_host("elsewhere"),
            Rc::new(ManualLoop::new()),
            MountOptions::default(),
        );
        assert!(matches!(result, Err(Error::HostNotFound(id)) if id == "app"));
    }

    #[test]
    fn test_headless_counter() {
        let app = headless(|root| {
            let count = root.state("count", || 0);
            Stack::new().vertical().body(move |_| {
                Text::new(format!("count: {}", count.get()));
                Button::new("+").on_click(move || count.update(|n| *n += 1));
            });
        })
        .expect("mount");

        assert!(app.click("0.0.1"));
        assert!(app.click("0.0.1"));
        assert_eq!(app.text("0.0.0").as_deref(), Some("count: 2"));
        assert_eq!(app.app.passes(), 3);
        insta::assert_snapshot!(app.dump(), @r#"
        div id="app"
          div id="0"
            div id="0.0" style="display: flex; flex-direction: column"
              span id="0.0.0" "count: 2"
              button id="0.0.1" @click "+"
        "#);
    }

    #[test]
    fn test_typing_updates_dependent_text() {
        let app = headless(|root| {
            let name = root.state("name", String::new);
            TextInput::new()
                .value(name.get())
                .on_change_text(move |v| name.set(v));
            Div::new().body(move |_| {
                Text::new(format!("hello {}", name.get()));
            });
        })
        .expect("mount");

        assert!(app.type_text("0.0", "ada"));
        assert_eq!(app.text("0.1.0").as_deref(), Some("hello ada"));
        let input = app.element("0.0").expect("input");
        assert_eq!(app.dom.value_of(input).as_deref(), Some("ada"));
    }

    #[test]
    fn test_write_elsewhere_updates_chained_input_value() {
        let app = headless(|root| {
            let name = root.state("name", || "a".to_string());
            TextInput::new().value(name.get());
            Text::new("label");
            Button::new("reset").on_click(move || name.set("reset".into()));
        })
        .expect("mount");
        let input = app.element("0.0").expect("input");
        assert_eq!(app.dom.value_of(input).as_deref(), Some("a"));

        assert!(app.click("0.2"));
        assert_eq!(app.element("0.0"), Some(input));
        assert_eq!(app.dom.value_of(input).as_deref(), Some("reset"));
        assert_eq!(app.text("0.1").as_deref(), Some("label"));
    }

    #[test]
    fn test_continuous_mode_and_drop() {
        let options = MountOptions {
            mode: RenderMode::Continuous,
            inspect: true,
            ..MountOptions::default()
        };
        let app = headless_with(|_| {}, options).expect("mount");
        assert!(app.app.scheduler().is_continuous());
        app.frame();
        app.frame();
        assert_eq!(app.app.passes(), 3);
        let inspected = app.app.inspector().map(|i| i.borrow().hud.pass_count());
        assert_eq!(inspected, Some(3));

        let lp = app.event_loop.clone();
        drop(app);
        assert_eq!(lp.pending_frames(), 0);
    }
}
