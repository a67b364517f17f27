//! Flex container.

use sprig_core::{Component, ElementKind, Props, StyleRecord};

use crate::element_builder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

fn flex_position(start: bool, center: bool) -> &'static str {
    if start {
        "flex-start"
    } else if center {
        "center"
    } else {
        "flex-end"
    }
}

/// A `div` with `display: flex`.
#[derive(Clone, Debug)]
pub struct Stack {
    node: Component,
}

impl Stack {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let node = Component::new(ElementKind::Div, Props::default())
            .with_style(StyleRecord::new().with("display", "flex"));
        Self { node }
    }

    pub fn horizontal(self) -> Self {
        self.with_style(StyleRecord::new().with("flex-direction", "row"))
    }

    pub fn vertical(self) -> Self {
        self.with_style(StyleRecord::new().with("flex-direction", "column"))
    }

    /// Grows to fill the parent's free space.
    pub fn expand(self) -> Self {
        self.with_style(StyleRecord::new().with("flex", "1"))
    }

    pub fn vertical_alignment(self, alignment: VerticalAlignment) -> Self {
        let value = flex_position(
            alignment == VerticalAlignment::Top,
            alignment == VerticalAlignment::Center,
        );
        self.with_style(StyleRecord::new().with("align-items", value))
    }

    pub fn horizontal_alignment(self, alignment: HorizontalAlignment) -> Self {
        let value = flex_position(
            alignment == HorizontalAlignment::Left,
            alignment == HorizontalAlignment::Center,
        );
        self.with_style(StyleRecord::new().with("justify-content", value))
    }
}

element_builder!(Stack);
