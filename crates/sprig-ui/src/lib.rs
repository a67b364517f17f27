//! Intrinsic elements: typed builders over [`Component`].
//!
//! Every constructor registers its node under the current owner right away,
//! so elements are declared in the order they should appear:
//!
//! ```rust
//! use sprig_core::*;
//! use sprig_ui::*;
//!
//! let root = Component::root(Props::default());
//! with_owner(&root, || {
//!     Stack::new().vertical().body(|_| {
//!         Text::new("Hello").as_title();
//!         Button::new("Go").on_click(|| log_click());
//!     });
//! });
//! assert_eq!(root.count(), 4);
//! # fn log_click() {}
//! ```

pub mod anim;
pub mod stack;
pub mod textfield;

pub use anim::{Animation, Easing};
pub use stack::{HorizontalAlignment, Stack, VerticalAlignment};
pub use textfield::{TextArea, TextInput};

use sprig_core::{
    ButtonType, Component, Content, ElementKind, Event, EventName, Props, Style, TextLevel,
};

/// Builder methods shared by every element wrapper. The wrapper must hold
/// its node in a `node: Component` field.
macro_rules! element_builder {
    ($name:ident) => {
        impl $name {
            pub fn body(mut self, f: impl FnOnce(&sprig_core::Component)) -> Self {
                self.node = self.node.body(f);
                self
            }

            pub fn on_appear(mut self, f: impl FnOnce(&sprig_core::Component) + 'static) -> Self {
                self.node = self.node.on_appear(f);
                self
            }

            pub fn with_props(mut self, props: sprig_core::Props) -> Self {
                self.node = self.node.with_props(props);
                self
            }

            pub fn with_style(mut self, style: impl Into<sprig_core::Style>) -> Self {
                self.node = self.node.with_style(style);
                self
            }

            pub fn with_extension(mut self, f: impl FnOnce(&sprig_core::Component)) -> Self {
                self.node = self.node.with_extension(f);
                self
            }

            pub fn id(self, id: impl Into<String>) -> Self {
                self.with_props(sprig_core::Props::new().id(id))
            }

            pub fn class(self, class: impl Into<String>) -> Self {
                self.with_props(sprig_core::Props::new().class(class))
            }

            pub fn title(self, title: impl Into<String>) -> Self {
                self.with_props(sprig_core::Props::new().title(title))
            }

            pub fn hidden(self, hidden: bool) -> Self {
                self.with_props(sprig_core::Props::new().hidden(hidden))
            }

            pub fn on(
                self,
                name: sprig_core::EventName,
                handler: impl Fn(&sprig_core::Event) + 'static,
            ) -> Self {
                self.with_props(sprig_core::Props::new().on(name, handler))
            }

            pub fn node(&self) -> &sprig_core::Component {
                &self.node
            }
        }

        impl std::ops::Deref for $name {
            type Target = sprig_core::Component;

            fn deref(&self) -> &sprig_core::Component {
                &self.node
            }
        }

        impl From<$name> for sprig_core::Component {
            fn from(element: $name) -> sprig_core::Component {
                element.node
            }
        }
    };
}

pub(crate) use element_builder;

fn create(kind: ElementKind, props: Props) -> Component {
    Component::new(kind, props)
}

macro_rules! plain_element {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            node: Component,
        }

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self {
                    node: create($kind, Props::default()),
                }
            }
        }

        element_builder!($name);
    };
}

plain_element!(
    /// Generic block container.
    Div => ElementKind::Div
);
plain_element!(Span => ElementKind::Span);
plain_element!(Form => ElementKind::Form);

/// Text content, a `span` until given a level.
#[derive(Clone, Debug)]
pub struct Text {
    node: Component,
}

impl Text {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            node: create(
                ElementKind::Text(TextLevel::Span),
                Props::new().content(content),
            ),
        }
    }

    /// Text produced by `f` each time the node's props are applied.
    pub fn dynamic(f: impl Fn() -> String + 'static) -> Self {
        Self::new(Content::dynamic(f))
    }

    fn level(mut self, level: TextLevel) -> Self {
        self.node = self.node.with_kind(ElementKind::Text(level));
        self
    }

    pub fn as_title(self) -> Self {
        self.level(TextLevel::H1)
    }

    pub fn as_subtitle(self) -> Self {
        self.level(TextLevel::H2)
    }

    pub fn as_h3(self) -> Self {
        self.level(TextLevel::H3)
    }

    pub fn as_h4(self) -> Self {
        self.level(TextLevel::H4)
    }

    pub fn as_h5(self) -> Self {
        self.level(TextLevel::H5)
    }

    pub fn as_body(self) -> Self {
        self.level(TextLevel::Body)
    }

    pub fn as_paragraph(self) -> Self {
        self.level(TextLevel::Paragraph)
    }
}

element_builder!(Text);

#[derive(Clone, Debug)]
pub struct Button {
    node: Component,
}

impl Button {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            node: create(ElementKind::Button, Props::new().content(content)),
        }
    }

    pub fn on_click(self, f: impl Fn() + 'static) -> Self {
        self.on(EventName::Click, move |_: &Event| f())
    }

    pub fn button_type(self, button_type: ButtonType) -> Self {
        self.with_props(Props {
            button_type: Some(button_type),
            ..Props::default()
        })
    }

    pub fn disabled(self, disabled: bool) -> Self {
        self.with_props(Props {
            disabled: Some(disabled),
            ..Props::default()
        })
    }
}

element_builder!(Button);

#[derive(Clone, Debug)]
pub struct Label {
    node: Component,
}

impl Label {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            node: create(ElementKind::Label, Props::new().content(content)),
        }
    }
}

element_builder!(Label);

#[derive(Clone, Debug)]
pub struct Link {
    node: Component,
}

impl Link {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            node: create(ElementKind::Anchor, Props::new().content(content)),
        }
    }

    pub fn href(self, href: impl Into<String>) -> Self {
        self.with_props(Props {
            href: Some(href.into()),
            ..Props::default()
        })
    }

    pub fn target(self, target: impl Into<String>) -> Self {
        self.with_props(Props {
            target: Some(target.into()),
            ..Props::default()
        })
    }
}

element_builder!(Link);

#[derive(Clone, Debug)]
pub struct Image {
    node: Component,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            node: create(
                ElementKind::Image,
                Props {
                    src: Some(src.into()),
                    ..Props::default()
                },
            ),
        }
    }

    pub fn alt(self, alt: impl Into<String>) -> Self {
        self.with_props(Props {
            alt: Some(alt.into()),
            ..Props::default()
        })
    }
}

element_builder!(Image);

/// Style helper: `Style` from property pairs.
pub fn style<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Style {
    let mut record = sprig_core::StyleRecord::new();
    for (property, value) in pairs {
        record.set(property, value);
    }
    Style::Record(record)
}


#[cfg(test)]
mod tests {
    use super::test_support::mounted;
    use super::*;
    use sprig_core::RenderTarget;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_text_levels_change_tag() {
        let (_, dom) = mounted(|| {
            Text::new("Title").as_title();
            Text::new("Sub").as_subtitle();
            Text::new(3).as_paragraph();
            Text::new("plain");
        });
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            h1 id="0.0" "Title"
            h2 id="0.1" "Sub"
            p id="0.2" "3"
            span id="0.3" "plain"
        "#);
    }

    #[test]
    fn test_button_click_and_flags() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let (_, dom) = mounted(move || {
            Button::new("Save")
                .button_type(ButtonType::Submit)
                .disabled(true)
                .on_click(move || h.set(h.get() + 1));
        });
        let button = dom.element_by_id("0.0").expect("button");
        assert!(dom.click(button));
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.attribute(button, "type").as_deref(), Some("submit"));
        assert_eq!(dom.attribute(button, "disabled").as_deref(), Some(""));
    }

    #[test]
    fn test_link_and_image_attributes() {
        let (_, dom) = mounted(|| {
            Div::new().class("card").body(|_| {
                Link::new("Docs").href("/docs").target("_blank");
                Image::new("logo.png").alt("logo");
                Label::new("Name");
            });
        });
        insta::assert_snapshot!(dom.dump(), @r#"
        div id="app"
          div id="0"
            div class="card" id="0.0"
              a href="/docs" id="0.0.0" target="_blank" "Docs"
              img alt="logo" id="0.0.1" src="logo.png"
              label id="0.0.2" "Name"
        "#);
    }

    #[test]
    fn test_wrappers_expose_the_node() {
        let root = Component::root(Props::default());
        let span = sprig_core::with_owner(&root, || Span::new().id("s").hidden(true));
        assert_eq!(span.path().as_str(), "0.0");
        assert_eq!(span.props().id.as_deref(), Some("s"));
        let node: Component = span.into();
        assert!(node.parent().is_some_and(|p| p.ptr_eq(&root)));
    }

    #[test]
    fn test_style_helper_builds_records() {
        let (root, _) = mounted(|| {
            Form::new().with_style(style([("gap", "4px"), ("display", "grid")]));
        });
        let form = root.children().remove(0);
        let Some(Style::Record(record)) = form.props().style else {
            panic!("expected a style record");
        };
        assert_eq!(record.get("gap"), Some("4px"));
        assert_eq!(record.len(), 2);
    }
}
