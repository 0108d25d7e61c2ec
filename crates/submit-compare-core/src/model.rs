//! Core data model types for the submit-and-compare block.
//!
//! Author configuration, per-learner attempt state, and the small enums that
//! describe persistence scopes and submit actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Question shown by a freshly created block.
pub const DEFAULT_QUESTION_XML: &str = r#"<submit_and_compare schema_version='1'>
    <body>
        <p>
            Before you begin the simulation,
            think for a minute about your hypothesis.
            What do you expect the outcome of the simulation
            will be?  What data do you need to gather in order
            to prove or disprove your hypothesis?
        </p>
    </body>
    <explanation>
        <p>
            We would expect the simulation to show that
            there is no difference between the two scenarios.
            Relevant data to gather would include time and
            temperature.
        </p>
    </explanation>
    <demandhint>
        <hint>
            A hypothesis is a proposed explanation for a
            phenomenon. In this case, the hypothesis is what
            we think the simulation will show.
        </hint>
        <hint>
            Once you've decided on your hypothesis, which data
            would help you determine if that hypothesis is
            correct or incorrect?
        </hint>
    </demandhint>
</submit_and_compare>
"#;

/// Persistence partition of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Author settings, shared by every learner of one block usage.
    Settings,
    /// Authored content, shared by every learner of one block usage.
    Content,
    /// Private to one learner in one block usage.
    UserState,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Settings => write!(f, "settings"),
            Scope::Content => write!(f, "content"),
            Scope::UserState => write!(f, "user_state"),
        }
    }
}

/// What the learner asked for when sending an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitAction {
    /// A scored attempt.
    Submit,
    /// A draft save; stores the answer without using an attempt.
    Save,
}

impl SubmitAction {
    /// Interpret the `action` string sent by the student view.
    ///
    /// Only the exact string `"submit"` counts as an attempt; everything
    /// else is treated as a draft save.
    pub fn from_wire(action: &str) -> Self {
        if action == "submit" {
            SubmitAction::Submit
        } else {
            SubmitAction::Save
        }
    }
}

/// Author-controlled settings of one block usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name shown in the course navigation.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Points possible.
    #[serde(default)]
    pub weight: u32,
    /// Attempt ceiling; 0 means unlimited.
    #[serde(default)]
    pub max_attempts: u32,
    #[serde(default = "default_your_answer_label")]
    pub your_answer_label: String,
    #[serde(default = "default_our_answer_label")]
    pub our_answer_label: String,
    #[serde(default = "default_submit_button_label")]
    pub submit_button_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            weight: 0,
            max_attempts: 0,
            your_answer_label: default_your_answer_label(),
            our_answer_label: default_our_answer_label(),
            submit_button_label: default_submit_button_label(),
        }
    }
}

pub fn default_display_name() -> String {
    "Submit and Compare".to_string()
}

pub fn default_your_answer_label() -> String {
    "Your Answer:".to_string()
}

pub fn default_our_answer_label() -> String {
    "Our Answer:".to_string()
}

pub fn default_submit_button_label() -> String {
    "Submit and Compare".to_string()
}

/// One learner's progress on one block usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptState {
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub count_attempts: u32,
    /// Always within `[0.0, 1.0]`.
    #[serde(default)]
    pub score: f64,
}

impl AttemptState {
    /// Where this learner stands against an attempt ceiling.
    pub fn phase(&self, max_attempts: u32) -> AttemptPhase {
        if max_attempts > 0 && self.count_attempts >= max_attempts {
            AttemptPhase::Exhausted {
                count: self.count_attempts,
                max: max_attempts,
            }
        } else if self.count_attempts == 0 {
            AttemptPhase::Unattempted
        } else {
            AttemptPhase::Attempted {
                count: self.count_attempts,
            }
        }
    }
}

/// Derived submission phase. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Unattempted,
    Attempted { count: u32 },
    /// No further scoring; the block stays viewable.
    Exhausted { count: u32, max: u32 },
}

impl AttemptPhase {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, AttemptPhase::Exhausted { .. })
    }
}

/// Identifies who is looking at which block usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeIds {
    pub user_id: String,
    /// Usage (location) name of the block; absent in bare workbench setups.
    #[serde(default)]
    pub usage_id: Option<String>,
}

/// The parsed sections of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Outer markup of `<body>`.
    pub body: String,
    /// Outer markup of `<explanation>`.
    pub explanation: String,
    /// Outer markup of each `<hint>`, in document order.
    pub hints: Vec<String>,
}
