//! Entry points screens use to start transitions.

use crate::builder::NavigatorConfig;
use crate::capability::OutputStore;
use crate::error::RouteError;
use crate::host::{Host, ScreenFactory};
use crate::interceptor::DeclaredTransitionInterceptor;
use crate::node::{
    CloseStyle, CloseTransitionNode, DeclaredTransitionNode, NodeContext, TransitionNode,
};
use crate::screen::ScreenRef;
use std::any::Any;
use std::rc::Rc;
use tracing::debug;

/// Transition facade bound to one host.
///
/// Every entry point returns a fresh, single-use node; nothing fires until
/// the caller fires the node.
///
/// # Example
///
/// ```rust,ignore
/// let navigator = Navigator::new(host)?;
/// navigator
///     .to_scene_by_id::<DetailInput>(&screen, "detail")?
///     .configure_then_fire(|input| input.show("hello"))?;
/// ```
pub struct Navigator {
    context: NodeContext,
    config: NavigatorConfig,
    interceptor: Rc<DeclaredTransitionInterceptor>,
}

impl Navigator {
    /// Navigator with the default configuration.
    pub fn new(host: Rc<dyn Host>) -> Result<Self, RouteError> {
        Self::with_config(host, NavigatorConfig::default())
    }

    /// Navigator with an explicit configuration.
    ///
    /// An invalid configuration is refused before anything is installed on
    /// the host.
    pub fn with_config(host: Rc<dyn Host>, config: NavigatorConfig) -> Result<Self, RouteError> {
        config
            .validate()
            .map_err(|error| RouteError::custom(error.to_string()))?;
        let interceptor = DeclaredTransitionInterceptor::install(host.transition_hooks())?;
        debug!(
            input_port = config.input_port.as_str(),
            animated = config.animated,
            "Navigator ready"
        );
        Ok(Self {
            context: NodeContext::new(host, &config),
            config,
            interceptor,
        })
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.context.host
    }

    /// Declared-transition requests still waiting for the host.
    pub fn pending_declared(&self) -> usize {
        self.interceptor.pending_count()
    }

    /// Transition to a screen that already exists.
    pub fn to_screen<T: Any>(&self, source: &ScreenRef, destination: ScreenRef) -> TransitionNode<T> {
        TransitionNode::bound(self.context.clone(), source, destination)
    }

    /// Transition to the scene registered under `id` in the source's graph.
    pub fn to_scene_by_id<T: Any>(
        &self,
        source: &ScreenRef,
        id: &str,
    ) -> Result<TransitionNode<T>, RouteError> {
        let destination = self
            .context
            .host
            .resolve_scene_by_id(source, id)
            .ok_or(RouteError::DestinationUnavailable)?;
        Ok(self.to_screen(source, destination))
    }

    /// Transition to a screen produced by `factory`.
    pub fn to_factory<T: Any>(
        &self,
        source: &ScreenRef,
        factory: &dyn ScreenFactory,
    ) -> Result<TransitionNode<T>, RouteError> {
        let destination = factory.instantiate()?;
        Ok(self.to_screen(source, destination))
    }

    /// Transition the host performs under `id`.
    pub fn to_declared_transition<T: Any>(
        &self,
        source: &ScreenRef,
        id: &str,
    ) -> DeclaredTransitionNode<T> {
        DeclaredTransitionNode::new(
            self.context.clone(),
            Rc::clone(&self.interceptor),
            source,
            id,
        )
    }

    /// Close `source`: pop one level when possible, otherwise dismiss.
    pub fn close(&self, source: &ScreenRef) -> CloseTransitionNode {
        CloseTransitionNode::new(self.context.clone(), source, CloseStyle::Automatic)
    }

    /// Close the whole navigation stack `source` lives in.
    pub fn close_stack(&self, source: &ScreenRef) -> CloseTransitionNode {
        CloseTransitionNode::new(self.context.clone(), source, CloseStyle::RootOrDismiss)
    }

    /// Output capability previously attached to `screen`.
    pub fn output<O: Any>(&self, screen: &ScreenRef) -> Option<Rc<O>> {
        OutputStore::get_as::<O>(screen)
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("config", &self.config)
            .field("interceptor", &self.interceptor)
            .finish()
    }
}
