//! CSS transform and transition helpers.

use sprig_core::{Component, ElementKind, Props, StyleRecord};

use crate::element_builder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Ease,
    EaseInOut,
}

impl Easing {
    fn as_css(self) -> &'static str {
        match self {
            Easing::Ease => "ease",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// A `div` whose `transform` is composed from named parts. Setting a part
/// again replaces it in place, so the composition order is first-set order.
#[derive(Clone, Debug)]
pub struct Animation {
    node: Component,
    transforms: Vec<(&'static str, String)>,
}

impl Animation {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            node: Component::new(ElementKind::Div, Props::default()),
            transforms: Vec::new(),
        }
    }

    pub fn transition(self, secs: f32, easing: Easing) -> Self {
        self.with_style(
            StyleRecord::new().with("transition", format!("all {secs}s {}", easing.as_css())),
        )
    }

    pub fn translate_x(self, px: f32) -> Self {
        self.set_part("translateX", format!("translateX({px}px)"))
    }

    pub fn translate_y(self, px: f32) -> Self {
        self.set_part("translateY", format!("translateY({px}px)"))
    }

    pub fn translate_z(self, px: f32) -> Self {
        self.set_part("translateZ", format!("translateZ({px}px)"))
    }

    pub fn rotate(self, deg: f32) -> Self {
        self.set_part("rotate", format!("rotate({deg}deg)"))
    }

    pub fn scale(self, factor: f32) -> Self {
        self.set_part("scale", format!("scale({factor})"))
    }

    pub fn skew(self, x_deg: f32, y_deg: f32) -> Self {
        self.set_part("skew", format!("skew({x_deg}deg, {y_deg}deg)"))
    }

    /// Drops every transform part. The target's `transform` is cleared.
    pub fn reset(mut self) -> Self {
        self.transforms.clear();
        self.apply()
    }

    fn set_part(mut self, key: &'static str, value: String) -> Self {
        match self.transforms.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.transforms.push((key, value)),
        }
        self.apply()
    }

    fn apply(self) -> Self {
        let transform = self
            .transforms
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.with_style(StyleRecord::new().with("transform", transform))
    }
}

element_builder!(Animation);
