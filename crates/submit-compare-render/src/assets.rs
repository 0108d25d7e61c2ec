//! Static resources referenced by the views.

use submit_compare_core::block::{STUDENT_CSS, STUDENT_JS, STUDIO_JS};

/// Look up a packaged resource by its path (e.g. `static/css/...`).
pub fn resource(path: &str) -> Option<&'static str> {
    match path.trim_start_matches('/') {
        p if p == STUDENT_CSS => Some(VIEW_CSS),
        p if p == STUDENT_JS => Some(VIEW_JS),
        p if p == STUDIO_JS => Some(EDIT_JS),
        _ => None,
    }
}

/// Find the resource a resolved URL points at.
pub fn resource_for_url(url: &str) -> Option<&'static str> {
    [STUDENT_CSS, STUDENT_JS, STUDIO_JS]
        .into_iter()
        .find(|path| url.ends_with(path))
        .and_then(resource)
}

pub const VIEW_CSS: &str = r#".submit_and_compare { font-family: "Open Sans", Verdana, Arial, sans-serif; max-width: 960px; }
.submit_and_compare .problem-progress { color: #646464; font-size: 0.875em; margin-left: 0.5em; }
.submit_and_compare .prompt { margin: 1em 0; }
.submit_and_compare textarea.answer { width: 100%; min-height: 8em; box-sizing: border-box; }
.submit_and_compare .expert-answer { display: none; border-left: 4px solid #0075b4; padding: 0.5em 1em; margin-top: 1em; background: #f5f5f5; }
.submit_and_compare .expert-answer.shown { display: block; }
.submit_and_compare .hints li { margin: 0.25em 0; }
.submit_and_compare .used-attempts-feedback { color: #646464; font-size: 0.875em; }
.submit_and_compare .nodisplay { display: none; }
"#;

pub const VIEW_JS: &str = r#"function SubmitAndCompareXBlockInitView(runtime, element) {
    'use strict';
    var root = element.querySelector('.submit_and_compare');
    var answer = root.querySelector('textarea.answer');
    var hints = [];
    var nextHint = 0;

    function post(url, body) {
        return fetch(url, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body)
        }).then(function (response) { return response.json(); });
    }

    function refresh(result) {
        root.querySelector('.problem-progress').textContent = result.problem_progress;
        root.querySelector('.used-attempts-feedback').textContent = result.used_attempts_feedback;
        root.querySelector('button.submit').className = 'submit ' + result.submit_class;
    }

    function send(action) {
        return post(root.dataset.submitUrl, { answer: answer.value, action: action }).then(function (result) {
            refresh(result);
            if (result.success && action === 'submit') {
                root.querySelector('.expert-answer').classList.add('shown');
            }
        });
    }

    root.querySelector('button.submit').addEventListener('click', function () { send('submit'); });
    root.querySelector('button.save').addEventListener('click', function () { send('save'); });

    post(root.dataset.hintsUrl, {}).then(function (result) {
        hints = result.hints || [];
        root.querySelector('button.hint').classList.toggle('nodisplay', hints.length === 0);
    });

    root.querySelector('button.hint').addEventListener('click', function () {
        if (hints.length === 0) { return; }
        var item = document.createElement('li');
        item.innerHTML = hints[nextHint % hints.length];
        root.querySelector('.hints').appendChild(item);
        post(root.dataset.publishEventUrl, { event_type: 'hint_shown', hint_index: nextHint % hints.length });
        nextHint += 1;
    });
}
"#;

pub const EDIT_JS: &str = r#"function SubmitAndCompareXBlockInitEdit(runtime, element) {
    'use strict';
    var form = element.querySelector('form.submit_and_compare_edit');

    form.addEventListener('submit', function (event) {
        event.preventDefault();
        var data = {};
        ['display_name', 'weight', 'max_attempts', 'your_answer_label',
         'our_answer_label', 'submit_button_label', 'data'].forEach(function (name) {
            data[name] = form.elements[name].value;
        });
        fetch(form.dataset.submitUrl, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(data)
        }).then(function (response) { return response.json(); }).then(function (result) {
            var status = form.querySelector('.status');
            status.textContent = result.result === 'success' ? 'Saved.' : (result.message || 'Error');
        });
    });
}
"#;
