//! In-crate fixtures: a configurable screen and a recording host.

use crate::builder::NavigatorConfig;
use crate::capability::CapabilityRequest;
use crate::host::{DeclaredTransition, Host, ModalStyle, Presentation, SplitStyle, TransitionHooks};
use crate::node::NodeContext;
use crate::screen::{ContainerKind, Screen, ScreenRef, WeakScreen};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Input capability exposed by greeter screens. Clones share one slot.
#[derive(Clone, Debug, Default)]
pub struct Greeting(Rc<RefCell<Option<String>>>);

impl Greeting {
    pub fn set(&self, text: &str) {
        *self.0.borrow_mut() = Some(text.to_string());
    }

    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}

pub struct TestScreen {
    name: String,
    greeting: Option<Greeting>,
    kind: Option<ContainerKind>,
    children: RefCell<Vec<ScreenRef>>,
    selected: Cell<usize>,
    parent: RefCell<Option<WeakScreen>>,
    embeds: Cell<bool>,
}

impl TestScreen {
    fn build(name: &str, greeting: Option<Greeting>, kind: Option<ContainerKind>) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            greeting,
            kind,
            children: RefCell::new(Vec::new()),
            selected: Cell::new(0),
            parent: RefCell::new(None),
            embeds: Cell::new(false),
        })
    }

    /// Plain screen; its restoration id is its name.
    pub fn leaf(name: &str) -> Rc<Self> {
        Self::build(name, None, None)
    }

    /// Screen providing a [`Greeting`] on the conventional port and `7u32`
    /// on the `badge` port.
    pub fn greeter(name: &str) -> Rc<Self> {
        Self::build(name, Some(Greeting::default()), None)
    }

    pub fn container(name: &str, kind: ContainerKind) -> Rc<Self> {
        Self::build(name, None, Some(kind))
    }

    /// Append `child` to `container` and point the child back at it.
    pub fn embed(container: &Rc<Self>, child: ScreenRef) {
        if let Some(screen) = child.as_any().downcast_ref::<TestScreen>() {
            let parent: ScreenRef = container.clone();
            *screen.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        }
        container.children.borrow_mut().push(child);
    }

    /// Navigation container `nav` holding one leaf per name, bottom first.
    pub fn stack(names: &[&str]) -> (Rc<Self>, Vec<ScreenRef>) {
        let nav = Self::container("nav", ContainerKind::Navigation);
        let screens: Vec<ScreenRef> = names
            .iter()
            .map(|name| {
                let screen: ScreenRef = Self::leaf(name);
                Self::embed(&nav, screen.clone());
                screen
            })
            .collect();
        (nav, screens)
    }

    /// Select the active branch of a tab container.
    pub fn select(&self, index: usize) {
        self.selected.set(index);
    }

    /// Opt in to hosting embed transitions.
    pub fn accept_embeds(&self) {
        self.embeds.set(true);
    }

    pub fn greeting(&self) -> Greeting {
        self.greeting.clone().unwrap_or_default()
    }
}

impl Screen for TestScreen {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self) -> String {
        self.name.clone()
    }

    fn restoration_id(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn provide_input(&self, request: &mut CapabilityRequest<'_>) {
        if let Some(greeting) = &self.greeting {
            request
                .provide(|| greeting.clone())
                .provide_on("badge", || 7u32);
        }
    }

    fn container_kind(&self) -> Option<ContainerKind> {
        self.kind
    }

    fn children(&self) -> Vec<ScreenRef> {
        self.children.borrow().clone()
    }

    fn active_child(&self) -> Option<ScreenRef> {
        let children = self.children.borrow();
        match self.kind? {
            ContainerKind::Navigation | ContainerKind::Split => children.last().cloned(),
            ContainerKind::Tabs => children.get(self.selected.get()).cloned(),
        }
    }

    fn parent(&self) -> Option<ScreenRef> {
        self.parent.borrow().as_ref()?.upgrade()
    }

    fn is_embed_container(&self) -> bool {
        self.embeds.get()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    Present {
        presenter: String,
        screen: String,
        animated: bool,
    },
    Push {
        navigation: String,
        screen: String,
        animated: bool,
    },
    PopTo {
        navigation: String,
        screen: String,
    },
    PopToRoot {
        navigation: String,
    },
    Dismiss {
        screen: String,
    },
    Split {
        split: String,
        screen: String,
        style: SplitStyle,
    },
    Declared {
        source: String,
        identifier: String,
        destination: String,
    },
}

type SceneMaker = Rc<dyn Fn() -> Rc<TestScreen>>;

/// Host that records every primitive and keeps shown screens alive.
#[derive(Default)]
pub struct MockHost {
    hooks: TransitionHooks,
    scenes: RefCell<HashMap<String, SceneMaker>>,
    declared: RefCell<HashMap<String, SceneMaker>>,
    embeds: RefCell<Vec<String>>,
    calls: RefCell<Vec<HostCall>>,
    modal_styles: RefCell<Vec<Option<ModalStyle>>>,
    presented: RefCell<Vec<ScreenRef>>,
    tasks: RefCell<VecDeque<Box<dyn FnOnce()>>>,
    order: Rc<RefCell<Vec<String>>>,
}

impl MockHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn register_scene<F>(&self, id: &str, make: F)
    where
        F: Fn() -> Rc<TestScreen> + 'static,
    {
        self.scenes.borrow_mut().insert(id.to_string(), Rc::new(make));
    }

    pub fn register_declared<F>(&self, id: &str, make: F)
    where
        F: Fn() -> Rc<TestScreen> + 'static,
    {
        self.declared
            .borrow_mut()
            .insert(id.to_string(), Rc::new(make));
    }

    /// Register a declared transition that embeds its destination in the
    /// source.
    pub fn register_embed<F>(&self, id: &str, make: F)
    where
        F: Fn() -> Rc<TestScreen> + 'static,
    {
        self.register_declared(id, make);
        self.embeds.borrow_mut().push(id.to_string());
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Modal style of every `present` call, in order.
    pub fn modal_styles(&self) -> Vec<Option<ModalStyle>> {
        self.modal_styles.borrow().clone()
    }

    /// Shared log the host appends `complete:<id>` to when a declared
    /// transition completes.
    pub fn order(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.order)
    }

    /// Drop the host's hold on every presented screen.
    pub fn forget_presented(&self) {
        self.presented.borrow_mut().clear();
    }

    /// Run scheduled tasks until none remain.
    pub fn run_pending(&self) {
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Host for MockHost {
    fn present(&self, presenter: &ScreenRef, screen: ScreenRef, presentation: &Presentation) {
        self.record(HostCall::Present {
            presenter: presenter.describe(),
            screen: screen.describe(),
            animated: presentation.animated,
        });
        self.modal_styles.borrow_mut().push(presentation.modal);
        self.presented.borrow_mut().push(screen);
    }

    fn push(&self, navigation: &ScreenRef, screen: ScreenRef, presentation: &Presentation) {
        self.record(HostCall::Push {
            navigation: navigation.describe(),
            screen: screen.describe(),
            animated: presentation.animated,
        });
        self.presented.borrow_mut().push(screen);
    }

    fn pop_to(&self, navigation: &ScreenRef, screen: &ScreenRef, _animated: bool) {
        self.record(HostCall::PopTo {
            navigation: navigation.describe(),
            screen: screen.describe(),
        });
    }

    fn pop_to_root(&self, navigation: &ScreenRef, _animated: bool) {
        self.record(HostCall::PopToRoot {
            navigation: navigation.describe(),
        });
    }

    fn dismiss(&self, screen: &ScreenRef, _animated: bool) {
        self.record(HostCall::Dismiss {
            screen: screen.describe(),
        });
    }

    fn show_in_split(
        &self,
        split: &ScreenRef,
        screen: ScreenRef,
        style: SplitStyle,
        _presentation: &Presentation,
    ) {
        self.record(HostCall::Split {
            split: split.describe(),
            screen: screen.describe(),
            style,
        });
        self.presented.borrow_mut().push(screen);
    }

    fn resolve_scene_by_id(&self, _source: &ScreenRef, id: &str) -> Option<ScreenRef> {
        let make = self.scenes.borrow().get(id).cloned()?;
        let screen: ScreenRef = make();
        Some(screen)
    }

    fn perform_declared_transition(&self, source: &ScreenRef, id: &str, _presentation: &Presentation) {
        let Some(make) = self.declared.borrow().get(id).cloned() else {
            return;
        };
        let destination: ScreenRef = make();
        let embed = self.embeds.borrow().iter().any(|embed| embed == id);
        let transition = DeclaredTransition::new(id, source.clone(), destination.clone())
            .with_embed(embed);
        let order = Rc::clone(&self.order);
        let completed = self.hooks.dispatch(&transition, |transition| {
            order
                .borrow_mut()
                .push(format!("complete:{}", transition.identifier()));
        });
        if completed.is_ok() {
            self.record(HostCall::Declared {
                source: source.describe(),
                identifier: id.to_string(),
                destination: destination.describe(),
            });
            self.presented.borrow_mut().push(destination);
        }
    }

    fn transition_hooks(&self) -> &TransitionHooks {
        &self.hooks
    }

    fn schedule(&self, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Node settings with the default configuration.
pub fn context(host: &Rc<MockHost>) -> NodeContext {
    NodeContext::new(host.clone(), &NavigatorConfig::default())
}
