//! Routewire: deferred, type-checked screen transitions
//!
//! Routewire sits between screens and the host container that presents
//! them. A source screen asks for a transition, receives a single-use node,
//! configures the destination through a strongly-typed input capability, and
//! fires. The block's return value becomes the destination's output
//! capability, retrievable later by identity.
//!
//! # Core Concepts
//!
//! - **Screen**: host-managed UI unit, seen through the [`Screen`] trait
//! - **Capability**: typed value a screen exposes on a port
//! - **Transition node**: configure-then-fire builder; fires at most once
//! - **Host**: container primitives plus a before-transition hook registry
//!
//! # Example
//!
//! ```rust
//! use routewire::capability::CapabilityRequest;
//! use routewire::host::{Host, Presentation, SplitStyle, TransitionHooks};
//! use routewire::screen::{Screen, ScreenRef};
//! use routewire::Navigator;
//! use std::any::Any;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Clone, Default)]
//! struct DetailInput(Rc<RefCell<String>>);
//!
//! #[derive(Default)]
//! struct DetailScreen {
//!     input: DetailInput,
//! }
//!
//! impl Screen for DetailScreen {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn provide_input(&self, request: &mut CapabilityRequest<'_>) {
//!         request.provide(|| self.input.clone());
//!     }
//! }
//!
//! struct HomeScreen;
//!
//! impl Screen for HomeScreen {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     hooks: TransitionHooks,
//!     shown: RefCell<Vec<ScreenRef>>,
//! }
//!
//! impl Host for App {
//!     fn present(&self, _: &ScreenRef, screen: ScreenRef, _: &Presentation) {
//!         self.shown.borrow_mut().push(screen);
//!     }
//!     fn push(&self, _: &ScreenRef, screen: ScreenRef, _: &Presentation) {
//!         self.shown.borrow_mut().push(screen);
//!     }
//!     fn pop_to(&self, _: &ScreenRef, _: &ScreenRef, _: bool) {}
//!     fn pop_to_root(&self, _: &ScreenRef, _: bool) {}
//!     fn dismiss(&self, _: &ScreenRef, _: bool) {}
//!     fn show_in_split(&self, _: &ScreenRef, screen: ScreenRef, _: SplitStyle, _: &Presentation) {
//!         self.shown.borrow_mut().push(screen);
//!     }
//!     fn resolve_scene_by_id(&self, _: &ScreenRef, id: &str) -> Option<ScreenRef> {
//!         let screen: ScreenRef = Rc::new(DetailScreen::default());
//!         (id == "detail").then_some(screen)
//!     }
//!     fn perform_declared_transition(&self, _: &ScreenRef, _: &str, _: &Presentation) {}
//!     fn transition_hooks(&self) -> &TransitionHooks {
//!         &self.hooks
//!     }
//!     fn schedule(&self, task: Box<dyn FnOnce()>) {
//!         task()
//!     }
//! }
//!
//! let app = Rc::new(App::default());
//! let navigator = Navigator::new(app.clone())?;
//! let home: ScreenRef = Rc::new(HomeScreen);
//!
//! navigator
//!     .to_scene_by_id::<DetailInput>(&home, "detail")?
//!     .configure_then_fire(|input| {
//!         *input.0.borrow_mut() = "hello".to_string();
//!         Some(true)
//!     })?;
//!
//! let detail = app.shown.borrow()[0].clone();
//! assert_eq!(navigator.output::<bool>(&detail).as_deref(), Some(&true));
//! # Ok::<(), routewire::RouteError>(())
//! ```

pub mod builder;
pub mod capability;
pub mod core;
pub mod error;
pub mod host;
pub mod interceptor;
pub mod navigator;
pub mod node;
pub mod screen;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use builder::{BuildError, NavigatorBuilder, NavigatorConfig};
pub use capability::{CapabilityRequest, CapabilityResolver, IntoOutput, OutputStore};
pub use crate::core::{NodeState, State, StateHistory, StateTransition};
pub use error::RouteError;
pub use host::{
    Host, ModalPresentation, ModalStyle, ModalTransition, Presentation, SceneFactory,
    ScreenFactory, SplitStyle, TransitionHooks, TransitionStrategy,
};
pub use navigator::Navigator;
pub use node::{
    CloseNavigationStyle, CloseStyle, CloseTransitionNode, CustomTransitionNode,
    DeclaredTransitionNode, DeferredAction, NavigationStyle, TransitionNode, TransitionStyle,
    TransitionTicket,
};
pub use screen::{ContainerKind, Screen, ScreenRef, WeakScreen};
