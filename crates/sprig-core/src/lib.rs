//! # Signals, Components, and Passes
//!
//! Sprig builds its UI by re-running plain builder closures. There is no
//! retained widget state apart from two things:
//!
//! - `Signal<T>`: a value stored by cursor in a thread-local arena. Handles
//!   are recreated on every pass but keep pointing at the same storage.
//! - the renderer's shadow tree, used to decide whether a pass can patch
//!   props in place or has to replace a subtree.
//!
//! ## Signals
//!
//! ```rust
//! use sprig_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! A `signal()` call made while building a node is keyed by that node's path
//! and the call's ordinal within it, so the Nth call of a node always maps to
//! the same cursor. `Component::state` is the named variant and survives
//! reordered declarations. Outside of any node there is no site, and every
//! call gets a fresh cursor.
//!
//! ## Reads and writes
//!
//! Reading a signal while a node is the current owner records the read twice:
//! in the owner's cursor set, and as a reader path pointing at the owner's
//! most recently appended child (its first slot while it has none). So
//! `Text::new("").with_props(Props::new().content(s.get()))` charges the
//! text node, while `Text::new(s.get())` charges the sibling before it when
//! there is one. A write hands the reader paths of its cursor to the active
//! scheduler and then forgets every recorded read.
//!
//! ## Passes
//!
//! ```rust
//! use std::rc::Rc;
//! use sprig_core::*;
//!
//! let dom = MemoryDom::with_host("app");
//! let mut renderer = Renderer::new(dom.clone(), "app")?;
//! let event_loop = Rc::new(ManualLoop::new());
//!
//! let count = signal(0);
//! let scheduler = Scheduler::new(
//!     move |_root: &Component| {
//!         let n = count.get();
//!         Component::new(ElementKind::Text(TextLevel::Span), Props::new().content(n));
//!     },
//!     event_loop.clone(),
//!     move |write, readers, tree| renderer.render(write, readers, tree),
//! );
//! scheduler.start();
//!
//! count.set(5);
//! count.set(6);
//! event_loop.run_until_idle();
//! assert_eq!(scheduler.passes(), 2);
//! assert!(dom.dump().contains("\"6\""));
//! # Ok::<(), sprig_core::Error>(())
//! ```
//!
//! Writes made in the same tick produce a single pass. Writes made while a
//! pass is pending or running are dropped; the pass already reads the latest
//! values. `on_appear` callbacks run after the pass has been drawn.

pub mod component;
pub mod context;
pub mod dom;
pub mod effects;
pub mod error;
pub mod event_loop;
pub mod path;
pub mod prelude;
pub mod props;
pub mod renderer;
pub mod scheduler;
pub mod shadow;
pub mod signal;
pub mod target;
pub mod tests;

pub use component::*;
pub use context::{OwnerGuard, current_owner, with_owner};
pub use dom::*;
pub use effects::*;
pub use error::*;
pub use event_loop::*;
pub use path::*;
pub use props::*;
pub use renderer::*;
pub use scheduler::*;
pub use shadow::{ShadowNode, structure_changed, top_most};
pub use signal::*;
pub use target::*;
