//! Shared fixtures for integration tests: pages and a recording host.

#![allow(dead_code)]

use routewire::host::DeclaredTransition;
use routewire::{
    CapabilityRequest, ContainerKind, Host, Presentation, Screen, ScreenRef, SplitStyle,
    TransitionHooks, WeakScreen,
};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Input capability of form pages; clones share the same lines.
#[derive(Clone, Debug, Default)]
pub struct FormInput(Rc<RefCell<Vec<String>>>);

impl FormInput {
    pub fn fill(&self, line: &str) {
        self.0.borrow_mut().push(line.to_string());
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Result a form page hands back to whoever opened it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted(pub String);

pub struct Page {
    name: String,
    input: Option<FormInput>,
    kind: Option<ContainerKind>,
    children: RefCell<Vec<ScreenRef>>,
    selected: Cell<usize>,
    parent: RefCell<Option<WeakScreen>>,
    embeds: Cell<bool>,
}

impl Page {
    fn make(name: &str, input: Option<FormInput>, kind: Option<ContainerKind>) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            input,
            kind,
            children: RefCell::new(Vec::new()),
            selected: Cell::new(0),
            parent: RefCell::new(None),
            embeds: Cell::new(false),
        })
    }

    pub fn plain(name: &str) -> Rc<Self> {
        Self::make(name, None, None)
    }

    pub fn form(name: &str) -> Rc<Self> {
        Self::make(name, Some(FormInput::default()), None)
    }

    pub fn nav(name: &str) -> Rc<Self> {
        Self::make(name, None, Some(ContainerKind::Navigation))
    }

    pub fn tabs(name: &str) -> Rc<Self> {
        Self::make(name, None, Some(ContainerKind::Tabs))
    }

    pub fn split(name: &str) -> Rc<Self> {
        Self::make(name, None, Some(ContainerKind::Split))
    }

    /// Page that hosts embedded children.
    pub fn panel_host(name: &str) -> Rc<Self> {
        let page = Self::plain(name);
        page.embeds.set(true);
        page
    }

    pub fn attach(container: &Rc<Self>, child: ScreenRef) {
        if let Some(page) = child.as_any().downcast_ref::<Page>() {
            let parent: ScreenRef = container.clone();
            *page.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        }
        container.children.borrow_mut().push(child);
    }

    /// Navigation stack of plain pages named `p0`, `p1`, ...
    pub fn stack_of(depth: usize) -> (Rc<Self>, Vec<ScreenRef>) {
        let nav = Self::nav("nav");
        let pages = (0..depth)
            .map(|index| {
                let page: ScreenRef = Self::plain(&format!("p{index}"));
                Self::attach(&nav, page.clone());
                page
            })
            .collect();
        (nav, pages)
    }

    pub fn select(&self, index: usize) {
        self.selected.set(index);
    }

    pub fn input(&self) -> Option<FormInput> {
        self.input.clone()
    }
}

impl Screen for Page {
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
        if let Some(input) = &self.input {
            request.provide(|| input.clone());
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

type PageMaker = Rc<dyn Fn() -> Rc<Page>>;

/// Host recording each primitive as a line of text.
#[derive(Default)]
pub struct AppHost {
    hooks: TransitionHooks,
    scenes: RefCell<HashMap<String, PageMaker>>,
    segues: RefCell<HashMap<String, PageMaker>>,
    embeds: RefCell<Vec<String>>,
    log: Rc<RefCell<Vec<String>>>,
    shown: RefCell<Vec<ScreenRef>>,
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl AppHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn scene(&self, id: &str, make: impl Fn() -> Rc<Page> + 'static) {
        self.scenes.borrow_mut().insert(id.to_string(), Rc::new(make));
    }

    pub fn segue(&self, id: &str, make: impl Fn() -> Rc<Page> + 'static) {
        self.segues.borrow_mut().insert(id.to_string(), Rc::new(make));
    }

    /// Segue that embeds its destination inside the source.
    pub fn embed_segue(&self, id: &str, make: impl Fn() -> Rc<Page> + 'static) {
        self.segue(id, make);
        self.embeds.borrow_mut().push(id.to_string());
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn shared_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.log)
    }

    pub fn last_shown(&self) -> Option<ScreenRef> {
        self.shown.borrow().last().cloned()
    }

    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn turn(&self) {
        loop {
            let task = self.queue.borrow_mut().pop_front();
            let Some(task) = task else { break };
            task();
        }
    }

    fn note(&self, line: String) {
        self.log.borrow_mut().push(line);
    }
}

impl Host for AppHost {
    fn present(&self, presenter: &ScreenRef, screen: ScreenRef, presentation: &Presentation) {
        let mut line = format!(
            "present {} -> {} animated={}",
            presenter.describe(),
            screen.describe(),
            presentation.animated
        );
        if let Some(modal) = presentation.modal {
            line.push_str(&format!(" modal={:?}/{:?}", modal.transition, modal.presentation));
        }
        self.note(line);
        self.shown.borrow_mut().push(screen);
    }

    fn push(&self, navigation: &ScreenRef, screen: ScreenRef, _presentation: &Presentation) {
        self.note(format!("push {} <- {}", navigation.describe(), screen.describe()));
        self.shown.borrow_mut().push(screen);
    }

    fn pop_to(&self, navigation: &ScreenRef, screen: &ScreenRef, _animated: bool) {
        self.note(format!("pop {} to {}", navigation.describe(), screen.describe()));
    }

    fn pop_to_root(&self, navigation: &ScreenRef, _animated: bool) {
        self.note(format!("pop {} to root", navigation.describe()));
    }

    fn dismiss(&self, screen: &ScreenRef, _animated: bool) {
        self.note(format!("dismiss {}", screen.describe()));
    }

    fn show_in_split(
        &self,
        split: &ScreenRef,
        screen: ScreenRef,
        style: SplitStyle,
        _presentation: &Presentation,
    ) {
        self.note(format!("show {} in {} ({style:?})", screen.describe(), split.describe()));
        self.shown.borrow_mut().push(screen);
    }

    fn resolve_scene_by_id(&self, _source: &ScreenRef, id: &str) -> Option<ScreenRef> {
        let make = self.scenes.borrow().get(id).cloned()?;
        let page: ScreenRef = make();
        Some(page)
    }

    fn perform_declared_transition(&self, source: &ScreenRef, id: &str, _presentation: &Presentation) {
        let make = self.segues.borrow().get(id).cloned();
        let Some(make) = make else {
            self.note(format!("unknown segue {id}"));
            return;
        };
        let destination: ScreenRef = make();
        let embed = self.embeds.borrow().iter().any(|embed| embed == id);
        let transition =
            DeclaredTransition::new(id, source.clone(), destination.clone()).with_embed(embed);
        let log = Rc::clone(&self.log);
        let outcome = self.hooks.dispatch(&transition, |transition| {
            log.borrow_mut().push(format!(
                "segue {} complete -> {}",
                transition.identifier(),
                transition.destination().describe()
            ));
        });
        if outcome.is_ok() {
            self.shown.borrow_mut().push(destination);
        }
    }

    fn transition_hooks(&self) -> &TransitionHooks {
        &self.hooks
    }

    fn schedule(&self, task: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push_back(task);
    }
}
