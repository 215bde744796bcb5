//! In-memory [`Browser`] used by the unit tests.
//!
//! Pages are keyed by URL and hold a flat map of locator → elements; elements
//! hold their own children the same way. Waits never sleep: an element either
//! satisfies the condition right away or the wait fails as a timeout.

use super::{Browser, BrowserError, Condition, Locator, PageElement};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    text: String,
    attrs: HashMap<String, String>,
    children: HashMap<Locator, Vec<MockElement>>,
    hidden: bool,
    clicks: Rc<Cell<usize>>,
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, locator: Locator, child: MockElement) -> Self {
        self.children.entry(locator).or_default().push(child);
        self
    }

    /// Present in the DOM but neither displayed nor clickable.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Clicks received by this element or any clone of it.
    pub fn clicks(&self) -> usize {
        self.clicks.get()
    }

    fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::Present => true,
            Condition::Visible | Condition::Clickable => !self.hidden,
        }
    }
}

impl PageElement for MockElement {
    async fn find(&self, locator: &Locator) -> Result<Self, BrowserError> {
        self.children
            .get(locator)
            .and_then(|found| found.first())
            .cloned()
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, BrowserError> {
        Ok(self.children.get(locator).cloned().unwrap_or_default())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn text(&self) -> Result<String, BrowserError> {
        Ok(self.text.clone())
    }

    async fn click(&self) -> Result<(), BrowserError> {
        if self.hidden {
            return Err(BrowserError::Interaction("element not interactable".into()));
        }
        self.clicks.set(self.clicks.get() + 1);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPage {
    elements: HashMap<Locator, Vec<MockElement>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator, element: MockElement) -> Self {
        self.elements.entry(locator).or_default().push(element);
        self
    }
}

#[derive(Debug, Default)]
pub struct MockBrowser {
    pages: HashMap<String, MockPage>,
    unreachable: HashSet<String>,
    current: RefCell<Option<String>>,
    visits: RefCell<Vec<String>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Navigation to `url` fails outright.
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    /// Every URL passed to `goto`, in order, including failed ones.
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn visited(&self, url: &str) -> bool {
        self.visits.borrow().iter().any(|v| v == url)
    }
}

impl Browser for MockBrowser {
    type Element = MockElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.visits.borrow_mut().push(url.to_string());
        if self.unreachable.contains(url) {
            *self.current.borrow_mut() = None;
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "connection refused".into(),
            });
        }
        *self.current.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<MockElement, BrowserError> {
        let current = self.current.borrow();
        current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .and_then(|page| page.elements.get(locator))
            .and_then(|found| found.first())
            .filter(|element| element.satisfies(condition))
            .cloned()
            .ok_or(BrowserError::Timeout {
                locator: *locator,
                condition,
                timeout,
            })
    }
}
