//! In-memory session for unit tests.
//!
//! [`FakeSession`] keeps a small node tree. Replacing or removing a node
//! detaches its subtree, after which references to it report staleness the
//! way a real driver does.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::binding::{BindingOptions, RetryPolicy};
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::{By, CollectionPredicate, ElementPredicate};
use crate::session::{
    DEFAULT_POLL_INTERVAL, ElementRef, NativeElement, Scope, Session, poll_until,
};

// ============================================================================
// Helpers
// ============================================================================

/// Options with immediate retries.
pub(crate) fn test_options() -> BindingOptions {
    BindingOptions::new().with_retry(RetryPolicy::immediate())
}

/// Installs a test subscriber honoring `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// NodeSpec
// ============================================================================

/// Declarative description of a node subtree.
#[derive(Debug, Clone)]
pub(crate) struct NodeSpec {
    by: By,
    text: String,
    value: String,
    attrs: FxHashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: bool,
    children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// A visible, enabled node matched by `by`.
    pub(crate) fn new(by: By) -> Self {
        Self {
            by,
            text: String::new(),
            value: String::new(),
            attrs: FxHashMap::default(),
            displayed: true,
            enabled: true,
            selected: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub(crate) fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub(crate) fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub(crate) fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub(crate) fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub(crate) fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

// ============================================================================
// Node
// ============================================================================

/// Snapshot of one node, including its interaction counters.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub by: By,
    pub text: String,
    pub value: String,
    pub attrs: FxHashMap<String, String>,
    pub displayed: bool,
    pub enabled: bool,
    pub selected: bool,
    pub parent: Option<u64>,
    pub children: Vec<u64>,
    pub attached: bool,
    /// Element operations attempted on this node, including failed ones.
    pub actions: u32,
    pub clicks: u32,
    pub submits: u32,
}

/// Failure injected into the next element operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    /// [`Error::StaleElement`].
    Stale,
    /// [`Error::DriverFault`].
    Driver,
    /// A non-transient error.
    Fatal,
}

#[derive(Default)]
struct Dom {
    nodes: FxHashMap<u64, Node>,
    roots: Vec<u64>,
    next_id: u64,
    find_calls: usize,
    faults: VecDeque<Fault>,
    visited: Vec<String>,
}

impl Dom {
    fn build(&mut self, spec: NodeSpec, parent: Option<u64>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        let children = spec
            .children
            .into_iter()
            .map(|child| self.build(child, Some(id)))
            .collect();

        self.nodes.insert(
            id,
            Node {
                by: spec.by,
                text: spec.text,
                value: spec.value,
                attrs: spec.attrs,
                displayed: spec.displayed,
                enabled: spec.enabled,
                selected: spec.selected,
                parent,
                children,
                attached: true,
                actions: 0,
                clicks: 0,
                submits: 0,
            },
        );
        id
    }

    fn snapshot(&self, id: u64) -> NodeSpec {
        let node = &self.nodes[&id];
        NodeSpec {
            by: node.by.clone(),
            text: node.text.clone(),
            value: node.value.clone(),
            attrs: node.attrs.clone(),
            displayed: node.displayed,
            enabled: node.enabled,
            selected: node.selected,
            children: node.children.iter().map(|&c| self.snapshot(c)).collect(),
        }
    }

    fn siblings_mut(&mut self, parent: Option<u64>) -> &mut Vec<u64> {
        match parent {
            Some(p) => &mut self.nodes.get_mut(&p).unwrap().children,
            None => &mut self.roots,
        }
    }

    fn detach(&mut self, id: u64) {
        let node = self.nodes.get_mut(&id).unwrap();
        node.attached = false;
        for child in node.children.clone() {
            self.detach(child);
        }
    }

    /// Swaps `old` for a subtree built from `spec` at the same position.
    fn swap(&mut self, old: u64, spec: NodeSpec) -> u64 {
        let parent = self.nodes[&old].parent;
        let new = self.build(spec, parent);
        let siblings = self.siblings_mut(parent);
        let pos = siblings.iter().position(|&id| id == old).unwrap();
        siblings[pos] = new;
        self.detach(old);
        new
    }

    fn descendants(&self, ids: &[u64], out: &mut Vec<u64>) {
        for &id in ids {
            out.push(id);
            self.descendants(&self.nodes[&id].children, out);
        }
    }

    /// Attached matches of `by` under `scope` in document order.
    fn query(&self, scope: &Scope, by: &By) -> Result<Vec<u64>> {
        let mut all = Vec::new();
        match scope {
            Scope::Document => self.descendants(&self.roots, &mut all),
            Scope::Element(element) => {
                let id = self.attached_node(element.id())?;
                self.descendants(&self.nodes[&id].children, &mut all);
            }
        }
        Ok(all
            .into_iter()
            .filter(|id| {
                let node = &self.nodes[id];
                node.attached && &node.by == by
            })
            .collect())
    }

    fn attached_node(&self, element_id: &ElementId) -> Result<u64> {
        element_id
            .as_str()
            .strip_prefix("node-")
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|id| self.nodes.get(id).is_some_and(|node| node.attached))
            .ok_or_else(|| Error::stale_element(element_id.clone()))
    }
}

// ============================================================================
// FakeSession
// ============================================================================

pub(crate) struct FakeSession {
    dom: Arc<Mutex<Dom>>,
}

impl FakeSession {
    pub(crate) const TITLE: &'static str = "Fake Page";

    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            dom: Arc::new(Mutex::new(Dom::default())),
        })
    }

    /// Element ID of node `id`.
    pub(crate) fn element_id(id: u64) -> ElementId {
        ElementId::new(format!("node-{id}"))
    }

    /// Appends a top-level subtree.
    pub(crate) fn insert(&self, spec: NodeSpec) -> u64 {
        let mut dom = self.dom.lock();
        let id = dom.build(spec, None);
        dom.roots.push(id);
        id
    }

    /// Re-renders a subtree: same content, new node identities.
    pub(crate) fn replace(&self, id: u64) -> u64 {
        let mut dom = self.dom.lock();
        let spec = dom.snapshot(id);
        dom.swap(id, spec)
    }

    /// Re-renders every document-level match of `by` from `render(index)`.
    pub(crate) fn replace_all(&self, by: &By, render: impl Fn(usize) -> NodeSpec) -> Vec<u64> {
        let mut dom = self.dom.lock();
        let old = dom.query(&Scope::Document, by).unwrap();
        old.into_iter()
            .enumerate()
            .map(|(index, id)| dom.swap(id, render(index)))
            .collect()
    }

    /// Removes a subtree.
    pub(crate) fn remove(&self, id: u64) {
        let mut dom = self.dom.lock();
        let parent = dom.nodes[&id].parent;
        dom.siblings_mut(parent).retain(|&sibling| sibling != id);
        dom.detach(id);
    }

    pub(crate) fn show(&self, id: u64) {
        self.dom.lock().nodes.get_mut(&id).unwrap().displayed = true;
    }

    /// Document-level matches of `by`.
    pub(crate) fn query(&self, by: &By) -> Vec<u64> {
        self.dom.lock().query(&Scope::Document, by).unwrap()
    }

    pub(crate) fn node(&self, id: u64) -> Node {
        self.dom.lock().nodes[&id].clone()
    }

    /// Number of `find_until` / `find_all_until` calls.
    pub(crate) fn find_calls(&self) -> usize {
        self.dom.lock().find_calls
    }

    /// Makes the next `count` element operations fail with `fault`.
    pub(crate) fn inject(&self, fault: Fault, count: usize) {
        self.dom.lock().faults.extend(std::iter::repeat_n(fault, count));
    }

    pub(crate) fn visited(&self) -> Vec<String> {
        self.dom.lock().visited.clone()
    }

    fn element(&self, id: u64) -> ElementRef {
        Arc::new(FakeElement {
            id: Self::element_id(id),
            node: id,
            dom: Arc::clone(&self.dom),
        })
    }

    fn probe(
        &self,
        scope: &Scope,
        by: &By,
        predicate: ElementPredicate,
    ) -> Result<Option<Option<u64>>> {
        let dom = self.dom.lock();
        let matches = dom.query(scope, by)?;
        let first = |test: fn(&Node) -> bool| {
            matches
                .iter()
                .copied()
                .find(|id| test(&dom.nodes[id]))
                .map(Some)
        };

        let found = match predicate {
            ElementPredicate::Present | ElementPredicate::FrameAvailable => first(|_| true),
            ElementPredicate::Visible => first(|node| node.displayed),
            ElementPredicate::Clickable => first(|node| node.displayed && node.enabled),
            ElementPredicate::Selected => first(|node| node.selected),
            ElementPredicate::Invisible => {
                if matches.iter().any(|id| dom.nodes[id].displayed) {
                    None
                } else {
                    Some(matches.first().copied())
                }
            }
        };
        Ok(found)
    }

    fn probe_all(
        &self,
        scope: &Scope,
        by: &By,
        predicate: CollectionPredicate,
    ) -> Result<Option<Vec<u64>>> {
        let dom = self.dom.lock();
        let mut matches = dom.query(scope, by)?;
        if predicate == CollectionPredicate::AnyVisible {
            matches.retain(|id| dom.nodes[id].displayed);
        }
        Ok((!matches.is_empty()).then_some(matches))
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn find_until(
        &self,
        scope: &Scope,
        by: &By,
        predicate: ElementPredicate,
        timeout: Duration,
    ) -> Result<Option<ElementRef>> {
        self.dom.lock().find_calls += 1;
        let description = format!("{predicate:?} {by}");

        let found = poll_until(&description, timeout, DEFAULT_POLL_INTERVAL, || {
            let probed = self.probe(scope, by, predicate);
            async move { probed }
        })
        .await?;
        Ok(found.map(|id| self.element(id)))
    }

    async fn find_all_until(
        &self,
        scope: &Scope,
        by: &By,
        predicate: CollectionPredicate,
        timeout: Duration,
    ) -> Result<Vec<ElementRef>> {
        self.dom.lock().find_calls += 1;
        let description = format!("{predicate:?} {by}");

        let found = poll_until(&description, timeout, DEFAULT_POLL_INTERVAL, || {
            let probed = self.probe_all(scope, by, predicate);
            async move { probed }
        })
        .await?;
        Ok(found.into_iter().map(|id| self.element(id)).collect())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.dom.lock().visited.push(url.to_string());
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(Self::TITLE.to_string())
    }

    async fn quit(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// FakeElement
// ============================================================================

struct FakeElement {
    id: ElementId,
    node: u64,
    dom: Arc<Mutex<Dom>>,
}

impl FakeElement {
    /// Applies `op` to the node, honoring injected faults and staleness.
    fn with_node<T>(&self, op: impl FnOnce(&mut Node) -> T) -> Result<T> {
        let mut dom = self.dom.lock();
        let fault = dom.faults.pop_front();
        let node = dom.nodes.get_mut(&self.node).unwrap();
        node.actions += 1;

        match fault {
            Some(Fault::Stale) => return Err(Error::stale_element(self.id.clone())),
            Some(Fault::Driver) => return Err(Error::driver_fault("injected fault")),
            Some(Fault::Fatal) => return Err(Error::element_not_found(self.id.as_str())),
            None => {}
        }
        if !node.attached {
            return Err(Error::stale_element(self.id.clone()));
        }
        Ok(op(node))
    }
}

#[async_trait]
impl NativeElement for FakeElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    async fn click(&self) -> Result<()> {
        self.with_node(|node| node.clicks += 1)
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.with_node(|node| node.value.push_str(text))
    }

    async fn clear(&self) -> Result<()> {
        self.with_node(|node| node.value.clear())
    }

    async fn text(&self) -> Result<String> {
        self.with_node(|node| node.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.with_node(|node| node.attrs.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.with_node(|node| node.displayed)
    }

    async fn submit(&self) -> Result<()> {
        self.with_node(|node| node.submits += 1)
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.with_node(|node| node.enabled)
    }

    async fn is_selected(&self) -> Result<bool> {
        self.with_node(|node| node.selected)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_detaches_old_subtree() {
        let session = FakeSession::new();
        let old = session.insert(NodeSpec::new(By::id("a")).child(NodeSpec::new(By::css("b"))));
        let old_child = session.node(old).children[0];

        let new = session.replace(old);

        assert!(!session.node(old).attached);
        assert!(!session.node(old_child).attached);
        assert!(session.node(new).attached);
        assert_eq!(session.query(&By::css("b")).len(), 1);
    }

    #[tokio::test]
    async fn test_scoped_find_under_detached_scope_is_stale() {
        let session = FakeSession::new();
        let a = session.insert(NodeSpec::new(By::id("a")).child(NodeSpec::new(By::css("b"))));
        let scope = Scope::Element(session.element(a));
        session.remove(a);

        let err = session
            .find_until(&scope, &By::css("b"), ElementPredicate::Present, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_stale());
    }

    #[tokio::test]
    async fn test_injected_fault_counts_as_action() {
        let session = FakeSession::new();
        let a = session.insert(NodeSpec::new(By::id("a")));
        let element = session.element(a);
        session.inject(Fault::Driver, 1);

        assert!(element.click().await.unwrap_err().is_transient());
        element.click().await.unwrap();
        assert_eq!(session.node(a).actions, 2);
        assert_eq!(session.node(a).clicks, 1);
    }
}
