use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Heading/paragraph level of a text element. Each level maps to its own tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    Body,
    Paragraph,
    #[default]
    Span,
}

impl TextLevel {
    pub fn tag(self) -> &'static str {
        match self {
            TextLevel::H1 => "h1",
            TextLevel::H2 => "h2",
            TextLevel::H3 => "h3",
            TextLevel::H4 => "h4",
            TextLevel::H5 => "h5",
            TextLevel::Body => "body",
            TextLevel::Paragraph => "p",
            TextLevel::Span => "span",
        }
    }
}

/// The closed catalog of element kinds the renderer knows how to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Root,
    Div,
    Span,
    Text(TextLevel),
    Button,
    Input,
    Form,
    Label,
    Anchor,
    Image,
    TextArea,
}

impl ElementKind {
    /// Tag used when creating the target element.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Root | ElementKind::Div => "div",
            ElementKind::Span => "span",
            ElementKind::Text(level) => level.tag(),
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::Form => "form",
            ElementKind::Label => "label",
            ElementKind::Anchor => "a",
            ElementKind::Image => "img",
            ElementKind::TextArea => "textarea",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Root => "root",
            ElementKind::Text(_) => "text",
            ElementKind::Anchor => "link",
            ElementKind::Image => "image",
            other => other.tag(),
        }
    }

    /// Kinds whose raw input events are translated into text-value callbacks.
    pub fn is_text_input(self) -> bool {
        matches!(self, ElementKind::Input | ElementKind::TextArea)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    Click,
    Input,
    Change,
    Focus,
    Blur,
    KeyDown,
    KeyUp,
}

impl EventName {
    pub const ALL: [EventName; 7] = [
        EventName::Click,
        EventName::Input,
        EventName::Change,
        EventName::Focus,
        EventName::Blur,
        EventName::KeyDown,
        EventName::KeyUp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Click => "click",
            EventName::Input => "input",
            EventName::Change => "change",
            EventName::Focus => "focus",
            EventName::Blur => "blur",
            EventName::KeyDown => "keydown",
            EventName::KeyUp => "keyup",
        }
    }
}

/// Event payload handed to handlers by the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: EventName,
    /// Current value of the element for input-like events.
    pub value: Option<String>,
    pub key: Option<String>,
}

impl Event {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            value: None,
            key: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

pub type EventHandler = Rc<dyn Fn(&Event)>;
pub type TextHandler = Rc<dyn Fn(String)>;

#[derive(Clone, Default)]
pub struct Handlers([Option<EventHandler>; 7]);

impl Handlers {
    pub fn get(&self, name: EventName) -> Option<&EventHandler> {
        self.0[name as usize].as_ref()
    }

    pub fn set(&mut self, name: EventName, handler: EventHandler) {
        self.0[name as usize] = Some(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Handlers present in `other` replace ours.
    fn merge(&mut self, other: Handlers) {
        for (slot, h) in self.0.iter_mut().zip(other.0) {
            if h.is_some() {
                *slot = h;
            }
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                EventName::ALL
                    .iter()
                    .filter(|n| self.get(**n).is_some())
                    .map(|n| n.as_str()),
            )
            .finish()
    }
}

/// Style declarations keyed by CSS property name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRecord(BTreeMap<String, String>);

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// An empty value clears the property on the target.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn extend(&mut self, other: StyleRecord) {
        self.0.extend(other.0);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Style {
    /// Stylesheet text, set verbatim.
    Inline(String),
    Record(StyleRecord),
}

impl Style {
    /// Records merge key by key; any other combination replaces.
    pub fn merged(current: Option<Style>, next: Style) -> Style {
        match (current, next) {
            (Some(Style::Record(mut cur)), Style::Record(next)) => {
                cur.extend(next);
                Style::Record(cur)
            }
            (_, next) => next,
        }
    }
}

impl From<&str> for Style {
    fn from(s: &str) -> Self {
        Style::Inline(s.to_owned())
    }
}

impl From<String> for Style {
    fn from(s: String) -> Self {
        Style::Inline(s)
    }
}

impl From<StyleRecord> for Style {
    fn from(r: StyleRecord) -> Self {
        Style::Record(r)
    }
}

/// Text content: a literal or a producer evaluated each time props are applied.
#[derive(Clone)]
pub enum Content {
    Text(String),
    Dynamic(Rc<dyn Fn() -> String>),
}

impl Content {
    pub fn dynamic(f: impl Fn() -> String + 'static) -> Self {
        Content::Dynamic(Rc::new(f))
    }

    pub fn resolve(&self) -> String {
        match self {
            Content::Text(s) => s.clone(),
            Content::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Content::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

macro_rules! content_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Content {
            fn from(v: $t) -> Self {
                Content::Text(v.to_string())
            }
        })*
    };
}

content_from!(String, &str, i32, i64, u32, u64, usize, f32, f64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Password,
    Number,
    Date,
    Time,
    DateTimeLocal,
    Month,
    Week,
    Url,
    Search,
    Tel,
    Color,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Number => "number",
            InputType::Date => "date",
            InputType::Time => "time",
            InputType::DateTimeLocal => "datetime-local",
            InputType::Month => "month",
            InputType::Week => "week",
            InputType::Url => "url",
            InputType::Search => "search",
            InputType::Tel => "tel",
            InputType::Color => "color",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonType {
    Button,
    Submit,
    Reset,
}

impl ButtonType {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonType::Button => "button",
            ButtonType::Submit => "submit",
            ButtonType::Reset => "reset",
        }
    }
}

/// Property record of a node. Common fields apply to every kind; the rest
/// are read only by the kinds they belong to.
#[derive(Clone, Default)]
pub struct Props {
    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Option<Style>,
    pub title: Option<String>,
    pub hidden: Option<bool>,
    pub content: Option<Content>,
    pub handlers: Handlers,

    // input / textarea
    pub input_type: Option<InputType>,
    pub value: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub on_text_change: Option<TextHandler>,

    // button
    pub button_type: Option<ButtonType>,
    pub disabled: Option<bool>,

    // link
    pub href: Option<String>,
    pub target: Option<String>,

    // image
    pub src: Option<String>,
    pub alt: Option<String>,
}

macro_rules! replace_present {
    ($dst:expr, $src:expr, $($field:ident),* $(,)?) => {
        $(if $src.$field.is_some() {
            $dst.$field = $src.$field;
        })*
    };
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `patch` into `self`. Every key present in the patch replaces the
    /// current value, except a style record which is merged one level deep
    /// into an existing style record.
    pub fn merge(&mut self, mut patch: Props) {
        if let Some(style) = patch.style.take() {
            self.merge_style(style);
        }
        self.handlers.merge(std::mem::take(&mut patch.handlers));
        replace_present!(
            self,
            patch,
            id,
            class,
            title,
            hidden,
            content,
            input_type,
            value,
            placeholder,
            required,
            on_text_change,
            button_type,
            disabled,
            href,
            target,
            src,
            alt,
        );
    }

    pub fn merge_style(&mut self, style: Style) {
        self.style = Some(Style::merged(self.style.take(), style));
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn content(mut self, content: impl Into<Content>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn on(mut self, name: EventName, handler: impl Fn(&Event) + 'static) -> Self {
        self.handlers.set(name, Rc::new(handler));
        self
    }

    pub fn on_text_change(mut self, handler: impl Fn(String) + 'static) -> Self {
        self.on_text_change = Some(Rc::new(handler));
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("style", &self.style)
            .field("title", &self.title)
            .field("hidden", &self.hidden)
            .field("content", &self.content)
            .field("handlers", &self.handlers)
            .field("input_type", &self.input_type)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("required", &self.required)
            .field(
                "on_text_change",
                &self.on_text_change.as_ref().map(|_| "..."),
            )
            .field("button_type", &self.button_type)
            .field("disabled", &self.disabled)
            .field("href", &self.href)
            .field("target", &self.target)
            .field("src", &self.src)
            .field("alt", &self.alt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_merge_replaces_present_keys_only() {
        let mut props = Props::new().id("a").title("first").content("x");
        props.merge(Props::new().title("second"));
        assert_eq!(props.id.as_deref(), Some("a"));
        assert_eq!(props.title.as_deref(), Some("second"));
        assert_eq!(props.content.map(|c| c.resolve()).as_deref(), Some("x"));
    }

    #[test]
    fn test_style_records_merge_shallow() {
        let mut props =
            Props::new().style(StyleRecord::new().with("display", "flex").with("color", "red"));
        props.merge(Props::new().style(StyleRecord::new().with("color", "blue")));
        let Some(Style::Record(r)) = &props.style else {
            panic!("expected a style record");
        };
        assert_eq!(r.get("display"), Some("flex"));
        assert_eq!(r.get("color"), Some("blue"));
    }

    #[test]
    fn test_inline_style_replaces_record() {
        let mut props = Props::new().style(StyleRecord::new().with("display", "flex"));
        props.merge_style("color: red".into());
        assert_eq!(props.style, Some(Style::Inline("color: red".into())));

        props.merge_style(StyleRecord::new().with("gap", "4px").into());
        assert_eq!(
            props.style,
            Some(Style::Record(StyleRecord::new().with("gap", "4px")))
        );
    }

    #[test]
    fn test_handlers_merge() {
        let hits = Rc::new(Cell::new(0));
        let mut props = Props::new().on(EventName::Click, |_| {});
        let h = hits.clone();
        props.merge(Props::new().on(EventName::KeyUp, move |_| h.set(h.get() + 1)));
        assert!(props.handlers.get(EventName::Click).is_some());
        let key_up = props.handlers.get(EventName::KeyUp).cloned();
        if let Some(cb) = key_up {
            cb(&Event::new(EventName::KeyUp).with_key("a"));
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_dynamic_content_resolves_each_time() {
        let n = Rc::new(Cell::new(0));
        let c = {
            let n = n.clone();
            Content::dynamic(move || {
                n.set(n.get() + 1);
                n.get().to_string()
            })
        };
        assert_eq!(c.resolve(), "1");
        assert_eq!(c.resolve(), "2");
        assert_eq!(Content::from(3).resolve(), "3");
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ElementKind::Text(TextLevel::H1).tag(), "h1");
        assert_eq!(ElementKind::Text(TextLevel::Paragraph).tag(), "p");
        assert_eq!(ElementKind::Anchor.tag(), "a");
        assert_eq!(ElementKind::Root.name(), "root");
        assert!(ElementKind::Input.is_text_input());
        assert!(!ElementKind::Button.is_text_input());
    }
}
