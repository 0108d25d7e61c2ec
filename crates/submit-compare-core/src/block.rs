//! The submit-and-compare block.
//!
//! Reads its fields through a [`FieldStore`], enforces the attempt ceiling,
//! scores answers, and publishes grading events through the [`Runtime`].
//! One instance serves one learner on one block usage; the host is expected
//! to serialize requests for the same learner.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{BlockError, StoreError};
use crate::model::{
    default_display_name, default_our_answer_label, default_submit_button_label,
    default_your_answer_label, AttemptState, Scope, ScopeIds, Settings, SubmitAction,
    DEFAULT_QUESTION_XML,
};
use crate::parser;
use crate::progress;
use crate::traits::{
    FieldKey, FieldStore, Fragment, Localizer, Runtime, StudentViewContext, StudioViewContext,
    ViewRenderer,
};

/// Component id reported when the host gives the block no usage id.
pub const FALLBACK_COMPONENT_ID: &str = "workbench-component";

pub const STUDENT_CSS: &str = "static/css/submit_and_compare.css";
pub const STUDENT_JS: &str = "static/js/submit_and_compare_view.js";
pub const STUDIO_JS: &str = "static/js/submit_and_compare_edit.js";
const STUDENT_INIT_FN: &str = "SubmitAndCompareXBlockInitView";
const STUDIO_INIT_FN: &str = "SubmitAndCompareXBlockInitEdit";

pub const GRADE_EVENT: &str = "grade";
pub const PROBLEM_CHECK_EVENT: &str = "problem_check";

/// Field names as persisted.
pub mod fields {
    pub const DISPLAY_NAME: &str = "display_name";
    pub const WEIGHT: &str = "weight";
    pub const MAX_ATTEMPTS: &str = "max_attempts";
    pub const YOUR_ANSWER_LABEL: &str = "your_answer_label";
    pub const OUR_ANSWER_LABEL: &str = "our_answer_label";
    pub const SUBMIT_BUTTON_LABEL: &str = "submit_button_label";
    pub const QUESTION_STRING: &str = "question_string";
    pub const STUDENT_ANSWER: &str = "student_answer";
    pub const COUNT_ATTEMPTS: &str = "count_attempts";
    pub const SCORE: &str = "score";
}

/// Host services injected into a block.
#[derive(Clone)]
pub struct BlockServices {
    pub store: Arc<dyn FieldStore>,
    pub runtime: Arc<dyn Runtime>,
    pub localizer: Arc<dyn Localizer>,
    pub renderer: Arc<dyn ViewRenderer>,
}

/// Strings the student view refreshes after every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub problem_progress: String,
    pub submit_class: String,
    pub used_attempts_feedback: String,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub state: AttemptState,
    pub presentation: Presentation,
}

/// An author edit as sent by the studio view.
///
/// `weight` and `max_attempts` arrive as whatever the form produced (usually
/// strings) and are coerced by [`SubmitAndCompareBlock::author_submit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorEdit {
    pub display_name: String,
    pub weight: Value,
    pub max_attempts: Value,
    pub your_answer_label: String,
    pub our_answer_label: String,
    pub submit_button_label: String,
    /// Question XML.
    pub data: String,
}

/// Parse an integer form value. Anything that is not an integer becomes 0.
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// One learner's view of one block usage.
pub struct SubmitAndCompareBlock {
    scope_ids: ScopeIds,
    services: BlockServices,
}

impl SubmitAndCompareBlock {
    pub fn new(scope_ids: ScopeIds, services: BlockServices) -> Self {
        Self {
            scope_ids,
            services,
        }
    }

    pub fn scope_ids(&self) -> &ScopeIds {
        &self.scope_ids
    }

    /// Usage id, or [`FALLBACK_COMPONENT_ID`] outside a real course.
    pub fn component_id(&self) -> &str {
        self.scope_ids
            .usage_id
            .as_deref()
            .unwrap_or(FALLBACK_COMPONENT_ID)
    }

    // -----------------------------------------------------------------------
    // Field access
    // -----------------------------------------------------------------------

    fn key(&self, scope: Scope, name: &str) -> FieldKey {
        FieldKey::new(scope, self.component_id(), &self.scope_ids.user_id, name)
    }

    fn read<T: DeserializeOwned>(&self, scope: Scope, name: &str) -> Result<Option<T>, StoreError> {
        match self.services.store.get(&self.key(scope, name))? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Decode {
                    field: name.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn read_or<T: DeserializeOwned>(
        &self,
        scope: Scope,
        name: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, StoreError> {
        Ok(self.read(scope, name)?.unwrap_or_else(default))
    }

    fn entry<T: Serialize>(
        &self,
        scope: Scope,
        name: &str,
        value: &T,
    ) -> Result<(FieldKey, Value), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Decode {
            field: name.to_string(),
            message: e.to_string(),
        })?;
        Ok((self.key(scope, name), value))
    }

    /// Persist `entries` in one store call.
    fn commit(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError> {
        for (key, _) in entries {
            tracing::debug!(field = %key.name, scope = %key.scope, "writing field");
        }
        self.services.store.set_many(entries)
    }

    /// Current author settings, defaults filled in.
    pub fn settings(&self) -> Result<Settings, StoreError> {
        Ok(Settings {
            display_name: self.read_or(Scope::Settings, fields::DISPLAY_NAME, default_display_name)?,
            weight: self.read_or(Scope::Settings, fields::WEIGHT, || 0)?,
            max_attempts: self.read_or(Scope::Settings, fields::MAX_ATTEMPTS, || 0)?,
            your_answer_label: self.read_or(
                Scope::Settings,
                fields::YOUR_ANSWER_LABEL,
                default_your_answer_label,
            )?,
            our_answer_label: self.read_or(
                Scope::Settings,
                fields::OUR_ANSWER_LABEL,
                default_our_answer_label,
            )?,
            submit_button_label: self.read_or(
                Scope::Settings,
                fields::SUBMIT_BUTTON_LABEL,
                default_submit_button_label,
            )?,
        })
    }

    fn settings_entries(&self, settings: &Settings) -> Result<Vec<(FieldKey, Value)>, StoreError> {
        Ok(vec![
            self.entry(Scope::Settings, fields::DISPLAY_NAME, &settings.display_name)?,
            self.entry(Scope::Settings, fields::WEIGHT, &settings.weight)?,
            self.entry(Scope::Settings, fields::MAX_ATTEMPTS, &settings.max_attempts)?,
            self.entry(
                Scope::Settings,
                fields::YOUR_ANSWER_LABEL,
                &settings.your_answer_label,
            )?,
            self.entry(
                Scope::Settings,
                fields::OUR_ANSWER_LABEL,
                &settings.our_answer_label,
            )?,
            self.entry(
                Scope::Settings,
                fields::SUBMIT_BUTTON_LABEL,
                &settings.submit_button_label,
            )?,
        ])
    }

    /// Stored question XML.
    pub fn question_string(&self) -> Result<String, StoreError> {
        self.read_or(Scope::Content, fields::QUESTION_STRING, || {
            DEFAULT_QUESTION_XML.to_string()
        })
    }

    /// This learner's attempt state.
    pub fn attempt_state(&self) -> Result<AttemptState, StoreError> {
        Ok(AttemptState {
            student_answer: self.read_or(Scope::UserState, fields::STUDENT_ANSWER, String::new)?,
            count_attempts: self.read_or(Scope::UserState, fields::COUNT_ATTEMPTS, || 0)?,
            score: self.read_or(Scope::UserState, fields::SCORE, || 0.0)?,
        })
    }

    fn save_attempt_state(&self, state: &AttemptState) -> Result<(), StoreError> {
        self.commit(&[
            self.entry(Scope::UserState, fields::STUDENT_ANSWER, &state.student_answer)?,
            self.entry(Scope::UserState, fields::COUNT_ATTEMPTS, &state.count_attempts)?,
            self.entry(Scope::UserState, fields::SCORE, &state.score)?,
        ])
    }

    /// Points possible.
    pub fn max_score(&self) -> Result<u32, StoreError> {
        Ok(self.settings()?.weight)
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    fn presentation(&self, settings: &Settings, state: &AttemptState) -> Presentation {
        let localizer = self.services.localizer.as_ref();
        Presentation {
            problem_progress: progress::problem_progress(settings.weight, state.score, localizer),
            submit_class: progress::submit_class(state.count_attempts, settings.max_attempts)
                .to_string(),
            used_attempts_feedback: progress::used_attempts_feedback(
                state.count_attempts,
                settings.max_attempts,
                localizer,
            ),
        }
    }

    /// Presentation strings for the stored state.
    pub fn current_presentation(&self) -> Result<Presentation, StoreError> {
        Ok(self.presentation(&self.settings()?, &self.attempt_state()?))
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The learner-facing view. Never mutates state.
    pub fn student_view(&self) -> Result<Fragment, BlockError> {
        let settings = self.settings()?;
        let state = self.attempt_state()?;
        let question = parser::parse_question(&self.question_string()?)?;
        let presentation = self.presentation(&settings, &state);
        let runtime = self.services.runtime.as_ref();

        let context = StudentViewContext {
            display_name: settings.display_name,
            problem_progress: presentation.problem_progress,
            used_attempts_feedback: presentation.used_attempts_feedback,
            submit_class: presentation.submit_class,
            prompt: question.body,
            student_answer: state.student_answer,
            explanation: question.explanation,
            your_answer_label: settings.your_answer_label,
            our_answer_label: settings.our_answer_label,
            submit_button_label: settings.submit_button_label,
            submit_url: runtime.handler_url("student_submit"),
            hints_url: runtime.handler_url("send_hints"),
            publish_event_url: runtime.handler_url("publish_event"),
        };

        let mut fragment = Fragment::new(self.services.renderer.render_student(&context));
        fragment.add_css_url(runtime.local_resource_url(STUDENT_CSS));
        fragment.add_javascript_url(runtime.local_resource_url(STUDENT_JS));
        fragment.initialize_js(STUDENT_INIT_FN);
        Ok(fragment)
    }

    /// The author-facing editor view.
    pub fn studio_view(&self) -> Result<Fragment, BlockError> {
        let settings = self.settings()?;
        let runtime = self.services.runtime.as_ref();

        let context = StudioViewContext {
            display_name: settings.display_name,
            weight: settings.weight,
            max_attempts: settings.max_attempts,
            xml_data: self.question_string()?,
            your_answer_label: settings.your_answer_label,
            our_answer_label: settings.our_answer_label,
            submit_button_label: settings.submit_button_label,
            submit_url: runtime.handler_url("studio_submit"),
        };

        let mut fragment = Fragment::new(self.services.renderer.render_studio(&context));
        fragment.add_javascript_url(runtime.local_resource_url(STUDIO_JS));
        fragment.initialize_js(STUDIO_INIT_FN);
        Ok(fragment)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Store an answer and score it.
    ///
    /// Only [`SubmitAction::Submit`] uses an attempt, but draft saves still
    /// overwrite the stored answer and rescore it. Rejected with
    /// [`BlockError::AttemptsExhausted`] once the ceiling is reached.
    pub fn submit(&self, answer: &str, action: SubmitAction) -> Result<SubmitOutcome, BlockError> {
        let settings = self.settings()?;
        let mut state = self.attempt_state()?;

        if state.phase(settings.max_attempts).is_exhausted() {
            tracing::error!(
                user_id = %self.scope_ids.user_id,
                component_id = self.component_id(),
                count_attempts = state.count_attempts,
                max_attempts = settings.max_attempts,
                "user has already exceeded the maximum number of allowed attempts"
            );
            return Err(BlockError::AttemptsExhausted {
                count: state.count_attempts,
                max: settings.max_attempts,
            });
        }

        state.student_answer = answer.to_string();
        if action == SubmitAction::Submit {
            state.count_attempts += 1;
        }
        state.score = if answer.trim().is_empty() { 0.0 } else { 1.0 };
        self.save_attempt_state(&state)?;

        self.publish_grade(state.score);
        self.publish_problem_check(state.score);

        let presentation = self.presentation(&settings, &state);
        Ok(SubmitOutcome {
            state,
            presentation,
        })
    }

    /// Apply an author edit.
    ///
    /// The question XML is checked first; if it is malformed nothing is
    /// written. Settings and question are stored in one batch. A negative
    /// `max_attempts` keeps the previous ceiling.
    pub fn author_submit(&self, edit: &AuthorEdit) -> Result<(), BlockError> {
        if let Err(e) = parser::check_well_formed(&edit.data) {
            tracing::warn!(component_id = self.component_id(), "rejecting author edit: {e}");
            return Err(e.into());
        }

        for warning in parser::validate_question(&edit.data) {
            tracing::warn!(
                component_id = self.component_id(),
                section = warning.section.as_deref().unwrap_or("-"),
                "question: {}",
                warning.message
            );
        }

        let previous = self.settings()?;
        let max_attempts = match coerce_int(&edit.max_attempts) {
            n if n < 0 => previous.max_attempts,
            n => clamp_u32(n),
        };

        let settings = Settings {
            display_name: edit.display_name.clone(),
            weight: clamp_u32(coerce_int(&edit.weight)),
            max_attempts,
            your_answer_label: edit.your_answer_label.clone(),
            our_answer_label: edit.our_answer_label.clone(),
            submit_button_label: edit.submit_button_label.clone(),
        };

        let mut entries = self.settings_entries(&settings)?;
        entries.push(self.entry(Scope::Content, fields::QUESTION_STRING, &edit.data)?);
        self.commit(&entries)?;
        Ok(())
    }

    /// Hints decorated with their position, ready for display.
    pub fn hints(&self) -> Result<Vec<String>, BlockError> {
        let hints = parser::extract_hints(&self.question_string()?)?;
        Ok(parser::decorate_hints(&hints))
    }

    /// Forward a client-side event to the host.
    ///
    /// `payload` must be an object with a string `event_type`; the learner
    /// and component ids are added before publishing.
    pub fn publish_event(&self, payload: Value) -> Result<(), BlockError> {
        let Value::Object(mut data) = payload else {
            return Err(BlockError::MissingField("event_type".into()));
        };
        let event_type = match data.remove("event_type") {
            Some(Value::String(event_type)) => event_type,
            _ => return Err(BlockError::MissingField("event_type".into())),
        };

        data.insert("user_id".into(), json!(self.scope_ids.user_id));
        data.insert("component_id".into(), json!(self.component_id()));
        self.publish(&event_type, Value::Object(data));
        Ok(())
    }

    fn publish(&self, event_type: &str, payload: Value) {
        tracing::debug!(event_type, %payload, "publishing event");
        self.services.runtime.publish(event_type, payload);
    }

    fn publish_grade(&self, score: f64) {
        self.publish(GRADE_EVENT, json!({ "value": score, "max_value": 1.0 }));
    }

    fn publish_problem_check(&self, score: f64) {
        self.publish(
            PROBLEM_CHECK_EVENT,
            json!({ "grade": score, "max_grade": 1.0 }),
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct Fixture {
        fields: Mutex<HashMap<FieldKey, Value>>,
        pub(crate) events: Mutex<Vec<(String, Value)>>,
    }

    impl FieldStore for Fixture {
        fn get(&self, key: &FieldKey) -> Result<Option<Value>, StoreError> {
            Ok(self.fields.lock().unwrap().get(key).cloned())
        }

        fn set_many(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError> {
            self.fields.lock().unwrap().extend(entries.iter().cloned());
            Ok(())
        }
    }

    impl Runtime for Fixture {
        fn publish(&self, event_type: &str, payload: Value) {
            self.events
                .lock()
                .unwrap()
                .push((event_type.to_string(), payload));
        }

        fn local_resource_url(&self, path: &str) -> String {
            format!("/resource/{path}")
        }

        fn handler_url(&self, handler: &str) -> String {
            format!("/handler/{handler}")
        }
    }

    impl Localizer for Fixture {
        fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
            let form = if n == 1 { singular } else { plural };
            form.to_string()
        }
    }

    impl ViewRenderer for Fixture {
        fn render_student(&self, context: &StudentViewContext) -> String {
            serde_json::to_string(context).unwrap()
        }

        fn render_studio(&self, context: &StudioViewContext) -> String {
            serde_json::to_string(context).unwrap()
        }
    }

    pub(crate) fn make_block(user: &str) -> (Arc<Fixture>, SubmitAndCompareBlock) {
        let fixture = Arc::new(Fixture::default());
        (Arc::clone(&fixture), block_for(&fixture, user))
    }

    pub(crate) fn block_for(fixture: &Arc<Fixture>, user: &str) -> SubmitAndCompareBlock {
        let services = BlockServices {
            store: fixture.clone(),
            runtime: fixture.clone(),
            localizer: fixture.clone(),
            renderer: fixture.clone(),
        };
        SubmitAndCompareBlock::new(
            ScopeIds {
                user_id: user.into(),
                usage_id: Some("block-1".into()),
            },
            services,
        )
    }

    pub(crate) fn edit(weight: Value, max_attempts: Value, data: &str) -> AuthorEdit {
        AuthorEdit {
            display_name: "Hypothesis".into(),
            weight,
            max_attempts,
            your_answer_label: "Yours:".into(),
            our_answer_label: "Ours:".into(),
            submit_button_label: "Check".into(),
            data: data.into(),
        }
    }

    /// Store whose `fail_on`-th write call fails without storing anything.
    struct FlakyStore {
        fields: Mutex<HashMap<FieldKey, Value>>,
        writes: Mutex<usize>,
        fail_on: usize,
    }

    impl FlakyStore {
        fn failing_on(fail_on: usize) -> Self {
            Self {
                fields: Mutex::default(),
                writes: Mutex::new(0),
                fail_on,
            }
        }
    }

    impl FieldStore for FlakyStore {
        fn get(&self, key: &FieldKey) -> Result<Option<Value>, StoreError> {
            Ok(self.fields.lock().unwrap().get(key).cloned())
        }

        fn set_many(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError> {
            let mut writes = self.writes.lock().unwrap();
            *writes += 1;
            if *writes == self.fail_on {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.fields.lock().unwrap().extend(entries.iter().cloned());
            Ok(())
        }
    }

    fn block_on_store(store: Arc<FlakyStore>) -> (Arc<Fixture>, SubmitAndCompareBlock) {
        let fixture = Arc::new(Fixture::default());
        let services = BlockServices {
            store,
            runtime: fixture.clone(),
            localizer: fixture.clone(),
            renderer: fixture.clone(),
        };
        let block = SubmitAndCompareBlock::new(
            ScopeIds {
                user_id: "alice".into(),
                usage_id: Some("block-1".into()),
            },
            services,
        );
        (fixture, block)
    }

    const QUESTION: &str = "<submit_and_compare><body><p>Why?</p></body>\
        <explanation><p>Because.</p></explanation>\
        <demandhint><hint>Think.</hint></demandhint></submit_and_compare>";

    #[test]
    fn fresh_block_has_defaults() {
        let (_, block) = make_block("alice");
        assert_eq!(block.settings().unwrap(), Settings::default());
        assert_eq!(block.attempt_state().unwrap(), AttemptState::default());
        assert!(block
            .question_string()
            .unwrap()
            .contains("Before you begin the simulation"));
        assert_eq!(block.max_score().unwrap(), 0);
    }

    #[test]
    fn worked_example_with_two_attempts() {
        let (fixture, block) = make_block("alice");
        block.author_submit(&edit(json!("1"), json!("2"), QUESTION)).unwrap();

        let outcome = block.submit("", SubmitAction::Submit).unwrap();
        assert_eq!(outcome.state.score, 0.0);
        assert_eq!(outcome.state.count_attempts, 1);

        let outcome = block.submit("x", SubmitAction::Submit).unwrap();
        assert_eq!(outcome.state.score, 1.0);
        assert_eq!(outcome.state.count_attempts, 2);
        assert_eq!(outcome.presentation.submit_class, "nodisplay");

        let err = block.submit("y", SubmitAction::Submit).unwrap_err();
        assert!(matches!(
            err,
            BlockError::AttemptsExhausted { count: 2, max: 2 }
        ));

        let state = block.attempt_state().unwrap();
        assert_eq!(state.student_answer, "x");
        assert_eq!(state.score, 1.0);
        assert_eq!(state.count_attempts, 2);

        // Two events per accepted submission, none for the rejected one.
        assert_eq!(fixture.events.lock().unwrap().len(), 4);
    }

    #[test]
    fn failed_store_write_keeps_previous_attempt() {
        let (fixture, block) = block_on_store(Arc::new(FlakyStore::failing_on(2)));
        block.submit("first", SubmitAction::Submit).unwrap();

        let err = block.submit("second", SubmitAction::Submit).unwrap_err();
        assert!(matches!(err, BlockError::Store(_)));

        let state = block.attempt_state().unwrap();
        assert_eq!(state.student_answer, "first");
        assert_eq!(state.count_attempts, 1);
        assert_eq!(state.score, 1.0);
        // Only the successful submission was graded.
        assert_eq!(fixture.events.lock().unwrap().len(), 2);
    }

    #[test]
    fn failed_store_write_keeps_previous_authoring() {
        let (_, block) = block_on_store(Arc::new(FlakyStore::failing_on(2)));
        block.author_submit(&edit(json!(3), json!(5), QUESTION)).unwrap();

        let other = "<submit_and_compare><body>B</body><explanation>E</explanation></submit_and_compare>";
        let err = block.author_submit(&edit(json!(9), json!(9), other)).unwrap_err();
        assert!(matches!(err, BlockError::Store(_)));

        let settings = block.settings().unwrap();
        assert_eq!(settings.weight, 3);
        assert_eq!(settings.max_attempts, 5);
        assert_eq!(block.question_string().unwrap(), QUESTION);
    }

    #[test]
    fn exhausted_draft_save_is_rejected_too() {
        let (_, block) = make_block("alice");
        block.author_submit(&edit(json!(1), json!(1), QUESTION)).unwrap();
        block.submit("first", SubmitAction::Submit).unwrap();

        assert!(block.submit("draft", SubmitAction::Save).is_err());
        assert_eq!(block.attempt_state().unwrap().student_answer, "first");
    }

    #[test]
    fn draft_save_does_not_use_an_attempt() {
        let (_, block) = make_block("alice");
        let outcome = block.submit("draft answer", SubmitAction::Save).unwrap();
        assert_eq!(outcome.state.count_attempts, 0);
        assert_eq!(outcome.state.student_answer, "draft answer");
        assert_eq!(outcome.state.score, 1.0);
    }

    #[test]
    fn whitespace_answer_scores_zero() {
        let (_, block) = make_block("alice");
        block.submit("real answer", SubmitAction::Submit).unwrap();
        let outcome = block.submit("   \n\t", SubmitAction::Submit).unwrap();
        assert_eq!(outcome.state.score, 0.0);
        assert_eq!(outcome.state.count_attempts, 2);
    }

    #[test]
    fn submit_publishes_grade_then_problem_check() {
        let (fixture, block) = make_block("alice");
        block.submit("answer", SubmitAction::Submit).unwrap();

        let events = fixture.events.lock().unwrap();
        assert_eq!(events[0].0, "grade");
        assert_eq!(events[0].1, json!({ "value": 1.0, "max_value": 1.0 }));
        assert_eq!(events[1].0, "problem_check");
        assert_eq!(events[1].1, json!({ "grade": 1.0, "max_grade": 1.0 }));
    }

    #[test]
    fn learners_do_not_share_state() {
        let (fixture, alice) = make_block("alice");
        let bob = block_for(&fixture, "bob");

        alice.author_submit(&edit(json!(2), json!(0), QUESTION)).unwrap();
        alice.submit("mine", SubmitAction::Submit).unwrap();

        assert_eq!(bob.attempt_state().unwrap(), AttemptState::default());
        assert_eq!(bob.settings().unwrap().weight, 2);
    }

    #[test]
    fn malformed_author_edit_changes_nothing() {
        let (_, block) = make_block("alice");
        block.author_submit(&edit(json!(3), json!(5), QUESTION)).unwrap();

        let mut bad = edit(json!(9), json!(9), "<submit_and_compare><body>");
        bad.display_name = "Changed".into();
        let err = block.author_submit(&bad).unwrap_err();
        assert!(matches!(err, BlockError::Content(_)));

        let settings = block.settings().unwrap();
        assert_eq!(settings.display_name, "Hypothesis");
        assert_eq!(settings.weight, 3);
        assert_eq!(settings.max_attempts, 5);
        assert_eq!(block.question_string().unwrap(), QUESTION);
    }

    #[test]
    fn author_edit_coerces_numbers() {
        let (_, block) = make_block("alice");
        block.author_submit(&edit(json!("4"), json!("3"), QUESTION)).unwrap();

        block.author_submit(&edit(json!("lots"), json!("-1"), QUESTION)).unwrap();
        let settings = block.settings().unwrap();
        assert_eq!(settings.weight, 0);
        assert_eq!(settings.max_attempts, 3);

        block.author_submit(&edit(json!(-5), json!("abc"), QUESTION)).unwrap();
        let settings = block.settings().unwrap();
        assert_eq!(settings.weight, 0);
        assert_eq!(settings.max_attempts, 0);
    }

    #[test]
    fn coerce_int_handles_form_values() {
        assert_eq!(coerce_int(&json!("7")), 7);
        assert_eq!(coerce_int(&json!(" 7 ")), 7);
        assert_eq!(coerce_int(&json!("-2")), -2);
        assert_eq!(coerce_int(&json!("2.5")), 0);
        assert_eq!(coerce_int(&json!(2.9)), 2);
        assert_eq!(coerce_int(&json!(null)), 0);
        assert_eq!(coerce_int(&json!(true)), 0);
    }

    #[test]
    fn student_view_renders_sections_and_resources() {
        let (_, block) = make_block("alice");
        block.author_submit(&edit(json!(1), json!(0), QUESTION)).unwrap();

        let fragment = block.student_view().unwrap();
        let context: StudentViewContext = serde_json::from_str(&fragment.content).unwrap();
        assert_eq!(context.prompt, "<body><p>Why?</p></body>");
        assert_eq!(context.explanation, "<explanation><p>Because.</p></explanation>");
        assert_eq!(context.problem_progress, "(1 point possible)");
        assert_eq!(context.submit_url, "/handler/student_submit");
        assert_eq!(fragment.css_urls, vec![format!("/resource/{STUDENT_CSS}")]);
        assert_eq!(
            fragment.js_init_fn.as_deref(),
            Some("SubmitAndCompareXBlockInitView")
        );
    }

    #[test]
    fn student_view_does_not_mutate() {
        let (fixture, block) = make_block("alice");
        block.student_view().unwrap();
        assert!(fixture.fields.lock().unwrap().is_empty());
        assert!(fixture.events.lock().unwrap().is_empty());
    }

    #[test]
    fn studio_view_carries_raw_xml() {
        let (_, block) = make_block("alice");
        let fragment = block.studio_view().unwrap();
        let context: StudioViewContext = serde_json::from_str(&fragment.content).unwrap();
        assert_eq!(context.xml_data, DEFAULT_QUESTION_XML);
        assert_eq!(context.max_attempts, 0);
        assert_eq!(
            fragment.js_init_fn.as_deref(),
            Some("SubmitAndCompareXBlockInitEdit")
        );
    }

    #[test]
    fn hints_are_decorated() {
        let (_, block) = make_block("alice");
        let hints = block.hints().unwrap();
        assert_eq!(hints.len(), 2);
        assert!(hints[0].starts_with("Hint (1 of 2): <hint>"));
        assert!(hints[1].starts_with("Hint (2 of 2): <hint>"));
    }

    #[test]
    fn publish_event_adds_ids() {
        let (fixture, block) = make_block("alice");
        block
            .publish_event(json!({ "event_type": "hint_shown", "hint": 1 }))
            .unwrap();

        let events = fixture.events.lock().unwrap();
        assert_eq!(events[0].0, "hint_shown");
        assert_eq!(
            events[0].1,
            json!({ "hint": 1, "user_id": "alice", "component_id": "block-1" })
        );
    }

    #[test]
    fn publish_event_requires_event_type() {
        let (fixture, block) = make_block("alice");
        let err = block.publish_event(json!({ "hint": 1 })).unwrap_err();
        assert!(matches!(err, BlockError::MissingField(ref f) if f == "event_type"));
        assert!(block.publish_event(json!([1, 2])).is_err());
        assert!(fixture.events.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_usage_id_falls_back() {
        let fixture = Arc::new(Fixture::default());
        let services = BlockServices {
            store: fixture.clone(),
            runtime: fixture.clone(),
            localizer: fixture.clone(),
            renderer: fixture.clone(),
        };
        let block = SubmitAndCompareBlock::new(
            ScopeIds {
                user_id: "alice".into(),
                usage_id: None,
            },
            services,
        );
        assert_eq!(block.component_id(), FALLBACK_COMPONENT_ID);
    }
}
