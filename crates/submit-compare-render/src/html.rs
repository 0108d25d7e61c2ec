//! HTML views.
//!
//! The prompt and explanation are author markup and go in unescaped; every
//! other value is escaped.

use submit_compare_core::traits::{Fragment, StudentViewContext, StudioViewContext, ViewRenderer};

use crate::assets;

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Plain string-building [`ViewRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl ViewRenderer for HtmlRenderer {
    fn render_student(&self, ctx: &StudentViewContext) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            "<div class=\"submit_and_compare\" data-submit-url=\"{}\" data-hints-url=\"{}\" data-publish-event-url=\"{}\">\n",
            html_escape(&ctx.submit_url),
            html_escape(&ctx.hints_url),
            html_escape(&ctx.publish_event_url),
        ));

        // Header
        html.push_str(&format!(
            "<h3 class=\"problem-header\">{}<span class=\"problem-progress\">{}</span></h3>\n",
            html_escape(&ctx.display_name),
            html_escape(&ctx.problem_progress),
        ));

        html.push_str("<div class=\"prompt\">\n");
        html.push_str(&ctx.prompt);
        html.push_str("\n</div>\n");

        html.push_str(&format!(
            "<label class=\"your-answer-label\">{}</label>\n",
            html_escape(&ctx.your_answer_label)
        ));
        html.push_str(&format!(
            "<textarea class=\"answer\" name=\"answer\">{}</textarea>\n",
            html_escape(&ctx.student_answer)
        ));

        html.push_str("<div class=\"actions\">\n");
        html.push_str(&format!(
            "<button type=\"button\" class=\"submit {}\">{}</button>\n",
            html_escape(&ctx.submit_class),
            html_escape(&ctx.submit_button_label),
        ));
        html.push_str("<button type=\"button\" class=\"save\">Save</button>\n");
        html.push_str("<button type=\"button\" class=\"hint nodisplay\">Hint</button>\n");
        html.push_str(&format!(
            "<span class=\"used-attempts-feedback\">{}</span>\n",
            html_escape(&ctx.used_attempts_feedback)
        ));
        html.push_str("</div>\n");

        html.push_str("<ul class=\"hints\"></ul>\n");

        // Revealed after the first submission
        let shown = if ctx.student_answer.is_empty() {
            ""
        } else {
            " shown"
        };
        html.push_str(&format!("<div class=\"expert-answer{shown}\">\n"));
        html.push_str(&format!(
            "<label class=\"our-answer-label\">{}</label>\n",
            html_escape(&ctx.our_answer_label)
        ));
        html.push_str(&ctx.explanation);
        html.push_str("\n</div>\n");

        html.push_str("</div>\n");
        html
    }

    fn render_studio(&self, ctx: &StudioViewContext) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            "<form class=\"submit_and_compare_edit\" data-submit-url=\"{}\">\n",
            html_escape(&ctx.submit_url)
        ));
        html.push_str("<ul class=\"settings-list\">\n");

        let text_fields = [
            ("display_name", "Display Name", &ctx.display_name),
            ("your_answer_label", "Your Answer Label", &ctx.your_answer_label),
            ("our_answer_label", "Our Answer Label", &ctx.our_answer_label),
            ("submit_button_label", "Submit Button Label", &ctx.submit_button_label),
        ];
        for (name, label, value) in text_fields {
            html.push_str(&text_input(name, label, value));
        }
        html.push_str(&text_input("weight", "Weight", &ctx.weight.to_string()));
        html.push_str(&text_input(
            "max_attempts",
            "Maximum Attempts",
            &ctx.max_attempts.to_string(),
        ));

        html.push_str("<li class=\"field\">\n<label for=\"data\">Question XML</label>\n");
        html.push_str(&format!(
            "<textarea id=\"data\" name=\"data\" rows=\"20\">{}</textarea>\n",
            html_escape(&ctx.xml_data)
        ));
        html.push_str("</li>\n</ul>\n");

        html.push_str("<div class=\"actions\">\n<button type=\"submit\">Save</button>\n");
        html.push_str("<span class=\"status\"></span>\n</div>\n");
        html.push_str("</form>\n");
        html
    }
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        "<li class=\"field\">\n<label for=\"{name}\">{label}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">\n</li>\n",
        html_escape(value)
    )
}

/// Wrap a fragment in a standalone HTML page with its CSS/JS inlined.
pub fn render_page(title: &str, fragment: &Fragment) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    for url in &fragment.css_urls {
        match assets::resource_for_url(url) {
            Some(css) => {
                html.push_str("<style>\n");
                html.push_str(css);
                html.push_str("</style>\n");
            }
            None => html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                html_escape(url)
            )),
        }
    }
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"xblock\" id=\"block\">\n");
    html.push_str(&fragment.content);
    html.push_str("</div>\n");

    for url in &fragment.javascript_urls {
        match assets::resource_for_url(url) {
            Some(js) => {
                html.push_str("<script>\n");
                html.push_str(js);
                html.push_str("</script>\n");
            }
            None => html.push_str(&format!("<script src=\"{}\"></script>\n", html_escape(url))),
        }
    }
    if let Some(init) = &fragment.js_init_fn {
        html.push_str(&format!(
            "<script>{init}(null, document.getElementById('block'));</script>\n"
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_context() -> StudentViewContext {
        StudentViewContext {
            display_name: "Hypothesis <draft>".into(),
            problem_progress: "(1 point possible)".into(),
            used_attempts_feedback: "You have used 0 of 2 submissions".into(),
            submit_class: String::new(),
            prompt: "<body><p>Why?</p></body>".into(),
            student_answer: String::new(),
            explanation: "<explanation><p>Because.</p></explanation>".into(),
            your_answer_label: "Your Answer:".into(),
            our_answer_label: "Our Answer:".into(),
            submit_button_label: "Submit and Compare".into(),
            submit_url: "/handler/student_submit".into(),
            hints_url: "/handler/send_hints".into(),
            publish_event_url: "/handler/publish_event".into(),
        }
    }

    #[test]
    fn escape_special_chars() {
        assert_eq!(
            html_escape("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn student_view_keeps_markup_and_escapes_text() {
        let html = HtmlRenderer.render_student(&student_context());
        assert!(html.contains("<body><p>Why?</p></body>"));
        assert!(html.contains("<explanation><p>Because.</p></explanation>"));
        assert!(html.contains("Hypothesis &lt;draft&gt;"));
        assert!(html.contains("(1 point possible)"));
        assert!(html.contains("data-submit-url=\"/handler/student_submit\""));
        assert!(html.contains("<div class=\"expert-answer\">"));
    }

    #[test]
    fn student_view_escapes_answer() {
        let mut ctx = student_context();
        ctx.student_answer = "</textarea><script>".into();
        ctx.submit_class = "nodisplay".into();
        let html = HtmlRenderer.render_student(&ctx);
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
        assert!(html.contains("class=\"submit nodisplay\""));
        assert!(html.contains("<div class=\"expert-answer shown\">"));
    }

    #[test]
    fn studio_view_escapes_xml() {
        let ctx = StudioViewContext {
            display_name: "Submit and Compare".into(),
            weight: 2,
            max_attempts: 3,
            xml_data: "<submit_and_compare><body>Q</body></submit_and_compare>".into(),
            your_answer_label: "Your Answer:".into(),
            our_answer_label: "Our Answer:".into(),
            submit_button_label: "Submit and Compare".into(),
            submit_url: "/handler/studio_submit".into(),
        };
        let html = HtmlRenderer.render_studio(&ctx);
        assert!(html.contains("&lt;submit_and_compare&gt;&lt;body&gt;Q&lt;/body&gt;"));
        assert!(html.contains("name=\"max_attempts\" value=\"3\""));
        assert!(html.contains("name=\"weight\" value=\"2\""));
        assert!(html.contains("value=\"Submit and Compare\""));
    }

    #[test]
    fn page_inlines_known_assets() {
        let mut fragment = Fragment::new("<p>content</p>".into());
        fragment.add_css_url("/static/static/css/submit_and_compare.css".into());
        fragment.add_javascript_url("/static/static/js/submit_and_compare_view.js".into());
        fragment.add_javascript_url("https://example.org/extra.js".into());
        fragment.initialize_js("SubmitAndCompareXBlockInitView");

        let page = render_page("Preview", &fragment);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(".submit_and_compare .nodisplay"));
        assert!(page.contains("function SubmitAndCompareXBlockInitView"));
        assert!(page.contains("<script src=\"https://example.org/extra.js\"></script>"));
        assert!(page.contains("SubmitAndCompareXBlockInitView(null, document.getElementById('block'))"));
    }
}
