//! # Composition, effects and signals
//!
//! Drift builds UI as a function from state to a `View` tree, re-run on
//! every frame by a `Composition`. There are four main pieces:
//!
//! - `remember*`: storage bound to a call site of a composition.
//! - `Signal<T>`: observable value; writes request a new frame.
//! - `after_commit` / `use_effect`: work that runs after a commit, with
//!   cleanup before the next run and at teardown.
//! - `Scope`: owner of teardown callbacks for one mounted instance.
//!
//! ## Composing
//!
//! ```rust
//! use drift_core::*;
//!
//! let composition = Composition::new();
//! let build = || {
//!     let count = remember(|| signal(0));
//!     View::new(0, ViewKind::Text {
//!         text: format!("Count = {}", count.get()),
//!         color: Color::WHITE,
//!         font_size: 16.0,
//!     })
//! };
//!
//! let view = composition.compose(build).unwrap();
//! assert!(matches!(view.kind, ViewKind::Text { .. }));
//! composition.dispose();
//! ```
//!
//! - `remember` is order‑based: the Nth call in a composition always refers
//!   to the Nth stored value.
//! - `remember_with_key` is key‑based and stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! `use_effect(key, f)` runs `f` after the first commit and after any commit
//! where `key` changed. The `Dispose` it returns runs before the next run
//! and at teardown:
//!
//! ```rust
//! use drift_core::*;
//!
//! fn example() -> View {
//!     use_mount_effect(|| {
//!         log::info!("Mounted Example");
//!         on_unmount(|| log::info!("Unmounted Example"))
//!     });
//!     View::new(0, ViewKind::Box)
//! }
//! ```

pub mod color;
pub mod effects;
pub mod effects_ext;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod modifier;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod view;

pub use color::*;
pub use effects::*;
pub use effects_ext::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use locals::*;
pub use modifier::*;
pub use runtime::*;
pub use scope::*;
pub use semantics::*;
pub use signal::*;
pub use view::*;
