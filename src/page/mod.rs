mod action;

use std::{collections::BTreeMap, time::Duration};

use log::debug;

use crate::{api::FormData, html::Markup};

pub use action::{Action, FormKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: BTreeMap<String, String>,
}

impl Location {
    /// Parses `/path?key=value&...`.
    pub fn parse(url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self {
            path: path.to_string(),
            query,
        }
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|d| d.into_owned())
        .unwrap_or(s)
}

#[derive(Debug, Clone)]
struct Child {
    id: Option<String>,
    html: Markup,
}

#[derive(Debug, Clone)]
pub struct Element {
    html: Markup,
    children: Vec<Child>,
    value: String,
    initial_value: String,
    visible: bool,
    disabled: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            html: Markup::default(),
            children: vec![],
            value: String::new(),
            initial_value: String::new(),
            visible: true,
            disabled: false,
        }
    }
}

impl Element {
    pub fn html(&self) -> Markup {
        let mut html = self.html.clone();
        for child in &self.children {
            html.push(child.html.clone());
        }
        html
    }
    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[derive(Debug, Clone)]
struct FormField {
    name: String,
    required: bool,
}

#[derive(Debug, Clone)]
struct Form {
    fields: Vec<FormField>,
    submit: String,
}

#[derive(Debug, Clone)]
pub struct Overlay {
    pub id: u64,
    pub html: Markup,
}

#[derive(Debug, Clone)]
pub enum Task {
    RemoveOverlay(u64),
    /// Clears the element, unless something else was written there since.
    ClearIfUnchanged { id: String, html: Markup },
    RestoreButton { id: String, label: Markup },
    Navigate(String),
}

#[derive(Debug, Clone)]
struct Timer {
    due: Duration,
    task: Task,
}

#[derive(Debug, Clone)]
struct Binding {
    scope: String,
    action: Action,
}

/// Headless document the views render into. Time only moves through
/// [`Page::advance`].
#[derive(Debug)]
pub struct Page {
    location: Location,
    elements: BTreeMap<String, Element>,
    forms: BTreeMap<String, Form>,
    bindings: BTreeMap<String, Binding>,
    overlays: Vec<Overlay>,
    timers: Vec<Timer>,
    clock: Duration,
    next_overlay: u64,
    confirm_answer: bool,
    dialogs: Vec<String>,
    navigated_to: Option<String>,
}

impl Page {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            elements: BTreeMap::new(),
            forms: BTreeMap::new(),
            bindings: BTreeMap::new(),
            overlays: vec![],
            timers: vec![],
            clock: Duration::ZERO,
            next_overlay: 0,
            confirm_answer: false,
            dialogs: vec![],
            navigated_to: None,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    //==========================================================================
    // Elements
    //==========================================================================

    /// Declares an element with its initial content, as the static HTML would.
    pub fn declare(&mut self, id: &str, html: Markup) -> &mut Self {
        let element = self.element_mut(id);
        element.html = html;
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    fn element_mut(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    /// Rendered content of an element, empty when it does not exist.
    #[cfg(test)]
    pub fn html(&self, id: &str) -> String {
        self.elements
            .get(id)
            .map(|e| e.html().into_string())
            .unwrap_or_default()
    }

    /// Drops the handlers scoped to `id` and to the child rows it holds.
    fn unbind_within(&mut self, id: &str) {
        let rows: Vec<String> = self
            .elements
            .get(id)
            .map(|e| e.children.iter().filter_map(|c| c.id.clone()).collect())
            .unwrap_or_default();
        self.bindings
            .retain(|_, binding| binding.scope != id && !rows.contains(&binding.scope));
    }

    /// Replaces the content of an element. Handlers bound inside it go away,
    /// including those of its rows.
    pub fn set_html(&mut self, id: &str, html: Markup) {
        self.unbind_within(id);
        let element = self.element_mut(id);
        element.html = html;
        element.children.clear();
    }

    pub fn set_text(&mut self, id: &str, text: impl AsRef<str>) {
        self.set_html(id, Markup::text(text.as_ref()));
    }

    pub fn append_child(&mut self, parent: &str, id: Option<&str>, html: Markup) {
        self.element_mut(parent).children.push(Child {
            id: id.map(str::to_string),
            html,
        });
    }

    /// Removes a top-level element or a child row. Returns whether anything
    /// was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.unbind_within(id);
        if self.elements.remove(id).is_some() {
            return true;
        }
        for element in self.elements.values_mut() {
            let before = element.children.len();
            element.children.retain(|c| c.id.as_deref() != Some(id));
            if element.children.len() != before {
                return true;
            }
        }
        false
    }

    /// Whether an element or child row with this id exists.
    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
            || self
                .elements
                .values()
                .any(|e| e.children.iter().any(|c| c.id.as_deref() == Some(id)))
    }

    pub fn value(&self, id: &str) -> &str {
        self.elements.get(id).map(Element::value).unwrap_or_default()
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        self.element_mut(id).value = value.into();
    }

    pub fn show(&mut self, id: &str) {
        self.element_mut(id).visible = true;
    }

    pub fn hide(&mut self, id: &str) {
        self.element_mut(id).visible = false;
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(Element::is_visible)
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.element_mut(id).disabled = disabled;
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(Element::is_disabled)
    }

    //==========================================================================
    // Forms
    //==========================================================================

    /// Declares a form whose inputs use their field name as element id.
    /// The submit button is bound to [`Action::Submit`].
    pub fn declare_form(
        &mut self,
        form: &str,
        kind: FormKind,
        submit: &str,
        label: Markup,
        fields: &[(&str, bool)],
    ) {
        for (name, _) in fields {
            self.element_mut(name);
        }
        self.declare(submit, label);
        self.bind(form, submit, Action::Submit(kind));
        self.forms.insert(
            form.to_string(),
            Form {
                fields: fields
                    .iter()
                    .map(|(name, required)| FormField {
                        name: name.to_string(),
                        required: *required,
                    })
                    .collect(),
                submit: submit.to_string(),
            },
        );
    }

    pub fn submit_button(&self, form: &str) -> Option<&str> {
        self.forms.get(form).map(|f| f.submit.as_str())
    }

    pub fn form_data(&self, form: &str) -> Option<FormData> {
        let form = self.forms.get(form)?;
        let mut data = FormData::new();
        for field in &form.fields {
            data.push(field.name.clone(), self.value(&field.name));
        }
        Some(data)
    }

    /// Required fields that are still empty.
    pub fn missing_fields(&self, form: &str) -> Vec<String> {
        let Some(form) = self.forms.get(form) else {
            return vec![];
        };
        form.fields
            .iter()
            .filter(|f| f.required && self.value(&f.name).trim().is_empty())
            .map(|f| f.name.clone())
            .collect()
    }

    /// Writes a value that also becomes the field's reset value.
    pub fn fill(&mut self, id: &str, value: impl Into<String>) {
        let value = value.into();
        let element = self.element_mut(id);
        element.initial_value = value.clone();
        element.value = value;
    }

    pub fn reset_form(&mut self, form: &str) {
        let Some(fields) = self.forms.get(form).map(|f| f.fields.clone()) else {
            return;
        };
        for field in fields {
            let element = self.element_mut(&field.name);
            element.value = element.initial_value.clone();
        }
    }

    //==========================================================================
    // Events
    //==========================================================================

    /// Binds a click handler to `id`. The binding lives as long as `scope`
    /// is not replaced or removed.
    pub fn bind(&mut self, scope: &str, id: &str, action: Action) {
        self.bindings.insert(
            id.to_string(),
            Binding {
                scope: scope.to_string(),
                action,
            },
        );
    }

    /// The handler a click on `id` runs. Disabled controls do nothing.
    pub fn click(&self, id: &str) -> Option<Action> {
        if self.is_disabled(id) {
            debug!("click on disabled #{} ignored", id);
            return None;
        }
        self.bindings.get(id).map(|b| b.action.clone())
    }

    #[cfg(test)]
    pub fn bound(&self, id: &str) -> Option<&Action> {
        self.bindings.get(id).map(|b| &b.action)
    }

    //==========================================================================
    // Overlays, dialogs, navigation
    //==========================================================================

    /// Adds an overlay rendered from its own id, so its controls can be
    /// named after it.
    pub fn add_overlay(&mut self, render: impl FnOnce(u64) -> Markup) -> u64 {
        self.next_overlay += 1;
        let id = self.next_overlay;
        let html = render(id);
        self.overlays.push(Overlay { id, html });
        id
    }

    pub fn remove_overlay(&mut self, id: u64) {
        self.overlays.retain(|o| o.id != id);
        self.bindings
            .retain(|_, binding| binding.scope != overlay_scope(id));
    }

    #[cfg(test)]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Answer given to every later [`Page::confirm`].
    pub fn answer_confirm(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    pub fn confirm(&mut self, message: &str) -> bool {
        self.dialogs.push(message.to_string());
        self.confirm_answer
    }

    pub fn dialogs(&self) -> &[String] {
        &self.dialogs
    }

    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }

    //==========================================================================
    // Time
    //==========================================================================

    pub fn schedule(&mut self, delay: Duration, task: Task) {
        let due = self.clock + delay;
        self.timers.push(Timer { due, task });
    }

    #[cfg(test)]
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.timers.iter().map(|t| &t.task)
    }

    /// Moves the clock forward and runs every timer that came due, in order.
    pub fn advance(&mut self, by: Duration) {
        self.clock += by;
        let now = self.clock;
        let (mut due, rest): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = rest;
        due.sort_by_key(|t| t.due);

        for timer in due {
            match timer.task {
                Task::RemoveOverlay(id) => self.remove_overlay(id),
                Task::ClearIfUnchanged { id, html } => {
                    if self.elements.get(&id).is_some_and(|e| e.html() == html) {
                        self.set_html(&id, Markup::default());
                    }
                }
                Task::RestoreButton { id, label } => {
                    self.set_html(&id, label);
                    self.set_disabled(&id, false);
                }
                Task::Navigate(url) => {
                    debug!("navigating to {}", url);
                    self.navigated_to = Some(url);
                }
            }
        }
    }

    //==========================================================================
    // Output
    //==========================================================================

    /// Visible elements that have content, in id order, followed by overlays.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (id, element) in &self.elements {
            let html = element.html();
            if !element.visible || html.is_empty() {
                continue;
            }
            out.push_str(&format!("<section id=\"{}\">\n{}\n</section>\n", id, html));
        }
        for overlay in &self.overlays {
            out.push_str(&format!("{}\n", overlay.html));
        }
        out
    }
}

/// Scope under which the controls of an overlay are bound.
pub fn overlay_scope(id: u64) -> String {
    format!("overlay-{}", id)
}
