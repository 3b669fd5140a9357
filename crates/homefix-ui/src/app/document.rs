//! Document binding for the visual scope: `<style>` blocks in `<head>` and
//! mode classes on `<body>`.

use gloo::console;
use gloo::utils::document;
use homefix_prefs::VisualScope;
use web_sys::HtmlElement;

/// Visual scope rooted at the current document's `<body>`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DocumentScope;

impl DocumentScope {
    fn body() -> Option<HtmlElement> {
        document().body()
    }
}

impl VisualScope for DocumentScope {
    fn has_style(&self, id: &str) -> bool {
        document().get_element_by_id(id).is_some()
    }

    fn insert_style(&mut self, id: &str, css: &str) {
        let doc = document();
        let Some(head) = doc.head() else {
            console::warn!("document has no head; dark mode styles skipped");
            return;
        };
        match doc.create_element("style") {
            Ok(style) => {
                style.set_id(id);
                style.set_text_content(Some(css));
                if let Err(err) = head.append_child(&style) {
                    console::error!("failed to register style block", id, err);
                }
            }
            Err(err) => console::error!("failed to create style block", id, err),
        }
    }

    fn has_flag(&self, name: &str) -> bool {
        Self::body().is_some_and(|body| body.class_list().contains(name))
    }

    fn set_flag(&mut self, name: &str, enabled: bool) {
        let Some(body) = Self::body() else {
            return;
        };
        let classes = body.class_list();
        let result = if enabled {
            classes.add_1(name)
        } else {
            classes.remove_1(name)
        };
        if let Err(err) = result {
            console::error!("failed to toggle body class", name, err);
        }
    }
}
