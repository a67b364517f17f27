//! Text entry elements.
//!
//! Both kinds translate raw input events into `on_change_text` calls carrying
//! the element's current value.

use sprig_core::{Component, ElementKind, InputType, Props};

use crate::element_builder;

fn entry_node(kind: ElementKind) -> Component {
    Component::new(kind, Props::default())
}

macro_rules! text_entry {
    ($name:ident, $kind:expr) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            node: Component,
        }

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self {
                    node: entry_node($kind),
                }
            }

            pub fn value(self, value: impl ToString) -> Self {
                self.with_props(Props::new().value(value.to_string()))
            }

            pub fn placeholder(self, text: impl Into<String>) -> Self {
                self.with_props(Props {
                    placeholder: Some(text.into()),
                    ..Props::default()
                })
            }

            pub fn required(self, required: bool) -> Self {
                self.with_props(Props {
                    required: Some(required),
                    ..Props::default()
                })
            }

            pub fn on_change_text(self, f: impl Fn(String) + 'static) -> Self {
                self.with_props(Props::new().on_text_change(f))
            }
        }

        element_builder!($name);
    };
}

text_entry!(TextInput, ElementKind::Input);
text_entry!(TextArea, ElementKind::TextArea);

impl TextInput {
    pub fn input_type(self, input_type: InputType) -> Self {
        self.with_props(Props {
            input_type: Some(input_type),
            ..Props::default()
        })
    }
}
