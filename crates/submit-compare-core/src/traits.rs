//! Host ports.
//!
//! The block never reaches for a global runtime. Everything it needs from the
//! course platform (field persistence, event publishing, resource URLs,
//! pluralization, and HTML templating) is injected through these traits.
//! The `submit-compare-host` and `submit-compare-render` crates provide the
//! workbench implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::model::Scope;

// ---------------------------------------------------------------------------
// Field persistence
// ---------------------------------------------------------------------------

/// Address of one persisted field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    pub scope: Scope,
    /// Block usage the field belongs to.
    pub usage_id: String,
    /// Learner owning the field. Only set for [`Scope::UserState`].
    #[serde(default)]
    pub user_id: Option<String>,
    /// Field name (e.g. "count_attempts").
    pub name: String,
}

impl FieldKey {
    /// Build a key, dropping the learner for shared scopes.
    pub fn new(scope: Scope, usage_id: &str, user_id: &str, name: &str) -> Self {
        let user_id = match scope {
            Scope::UserState => Some(user_id.to_string()),
            Scope::Settings | Scope::Content => None,
        };
        Self {
            scope,
            usage_id: usage_id.to_string(),
            user_id,
            name: name.to_string(),
        }
    }
}

/// Key-value persistence provided by the host.
pub trait FieldStore: Send + Sync {
    /// Read a field. `Ok(None)` means the field was never written.
    fn get(&self, key: &FieldKey) -> Result<Option<Value>, StoreError>;

    /// Write several fields at once. Either every entry is stored or, on
    /// error, none is.
    fn set_many(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError>;

    /// Write a field.
    fn set(&self, key: &FieldKey, value: Value) -> Result<(), StoreError> {
        self.set_many(&[(key.clone(), value)])
    }
}

// ---------------------------------------------------------------------------
// Runtime services
// ---------------------------------------------------------------------------

/// Event publishing and URL resolution provided by the host.
pub trait Runtime: Send + Sync {
    /// Publish an event (e.g. "grade") to the host's event sink.
    fn publish(&self, event_type: &str, payload: Value);

    /// URL under which a packaged static resource is served.
    fn local_resource_url(&self, path: &str) -> String;

    /// URL the views post to for a JSON handler.
    fn handler_url(&self, handler: &str) -> String;
}

/// Pluralization provided by the host's localization layer.
pub trait Localizer: Send + Sync {
    /// Pick (and translate) the singular or plural message for `n`.
    ///
    /// Messages carry `{name}` placeholders that the caller fills in after
    /// selection.
    fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String;
}

// ---------------------------------------------------------------------------
// Templating
// ---------------------------------------------------------------------------

/// HTML templating provided by the host.
pub trait ViewRenderer: Send + Sync {
    fn render_student(&self, context: &StudentViewContext) -> String;

    fn render_studio(&self, context: &StudioViewContext) -> String;
}

/// Everything the learner view template needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentViewContext {
    pub display_name: String,
    pub problem_progress: String,
    pub used_attempts_feedback: String,
    pub submit_class: String,
    /// Raw `<body>` markup; the template must not escape it.
    pub prompt: String,
    pub student_answer: String,
    /// Raw `<explanation>` markup; the template must not escape it.
    pub explanation: String,
    pub your_answer_label: String,
    pub our_answer_label: String,
    pub submit_button_label: String,
    pub submit_url: String,
    pub hints_url: String,
    pub publish_event_url: String,
}

/// Everything the author view template needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioViewContext {
    pub display_name: String,
    pub weight: u32,
    pub max_attempts: u32,
    /// Question XML as stored; the template must escape it.
    pub xml_data: String,
    pub your_answer_label: String,
    pub our_answer_label: String,
    pub submit_button_label: String,
    pub submit_url: String,
}

/// Rendered view plus the resources it depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub content: String,
    #[serde(default)]
    pub css_urls: Vec<String>,
    #[serde(default)]
    pub javascript_urls: Vec<String>,
    /// Name of the JS function the host calls to initialize the view.
    #[serde(default)]
    pub js_init_fn: Option<String>,
}

impl Fragment {
    pub fn new(content: String) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    pub fn add_css_url(&mut self, url: String) {
        self.css_urls.push(url);
    }

    pub fn add_javascript_url(&mut self, url: String) {
        self.javascript_urls.push(url);
    }

    pub fn initialize_js(&mut self, function_name: &str) {
        self.js_init_fn = Some(function_name.to_string());
    }
}
