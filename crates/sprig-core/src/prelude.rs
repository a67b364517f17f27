pub use crate::component::Component;
pub use crate::context::{current_owner, with_owner};
pub use crate::dom::MemoryDom;
pub use crate::effects::schedule_effect;
pub use crate::error::*;
pub use crate::event_loop::{EventLoop, ManualLoop};
pub use crate::props::{
    ButtonType, Content, ElementKind, Event, EventName, InputType, Props, Style, StyleRecord,
    TextLevel,
};
pub use crate::renderer::{RenderOutcome, Renderer};
pub use crate::scheduler::{RenderMode, Scheduler};
pub use crate::signal::{Signal, signal};
pub use crate::target::RenderTarget;
