//! Page-level queries against the target application's DOM
//!
//! All queries run as JavaScript evaluations over CDP and locate elements
//! the way an accessibility locator would: by role and accessible name, or
//! by visible text content. The Lab/Hardware tab buttons carry their names
//! in `sr-only` spans, so accessible-name matching must include text content
//! alongside `aria-label` and `title`.

use tracing::debug;

use super::{BrowserError, BrowserSession};

/// DOM queries for the verification checklist
pub struct PageActions;

/// Build a JavaScript string literal from a Rust string
fn js_string_literal(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// CSS selector covering a given accessible role
fn role_selector(role: &str) -> String {
    match role {
        // Native buttons and elements with an explicit button role
        "button" => r#"button, [role="button"]"#.to_string(),
        other => format!(r#"[role="{}"]"#, other),
    }
}

/// Script counting elements matching a role and accessible name
fn count_by_role_script(role: &str, name: &str) -> String {
    format!(
        r#"
        (function() {{
            const name = {name};
            const matches = Array.from(document.querySelectorAll('{selector}'))
                .filter((el) => {{
                    const label = el.getAttribute('aria-label') || '';
                    const title = el.getAttribute('title') || '';
                    const text = (el.textContent || '').trim();
                    return label.includes(name) || title.includes(name) || text.includes(name);
                }});
            return {{ count: matches.length }};
        }})()
        "#,
        name = js_string_literal(name),
        selector = role_selector(role),
    )
}

/// Script clicking the first element matching a role and accessible name
fn click_by_role_script(role: &str, name: &str) -> String {
    format!(
        r#"
        (function() {{
            const name = {name};
            const matches = Array.from(document.querySelectorAll('{selector}'))
                .filter((el) => {{
                    const label = el.getAttribute('aria-label') || '';
                    const title = el.getAttribute('title') || '';
                    const text = (el.textContent || '').trim();
                    return label.includes(name) || title.includes(name) || text.includes(name);
                }});
            // Prefer a visible match over a hidden one
            const target = matches.find((el) => el.offsetParent !== null) || matches[0];
            if (!target) {{
                return {{ clicked: false }};
            }}
            target.click();
            return {{ clicked: true }};
        }})()
        "#,
        name = js_string_literal(name),
        selector = role_selector(role),
    )
}

/// Script checking whether any element owning the text fragment is visible
fn text_visible_script(fragment: &str) -> String {
    format!(
        r#"
        (function() {{
            const fragment = {fragment};
            // Elements that directly own a text node with the fragment,
            // not every ancestor whose subtree contains it
            const owners = Array.from(document.querySelectorAll('body *'))
                .filter((el) => {{
                    if (!el.textContent || !el.textContent.includes(fragment)) return false;
                    return Array.from(el.childNodes).some(
                        (n) => n.nodeType === Node.TEXT_NODE && n.textContent.includes(fragment)
                    );
                }});
            const visible = owners.some((el) => {{
                if (el.offsetParent === null) return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }});
            return {{ visible: visible }};
        }})()
        "#,
        fragment = js_string_literal(fragment),
    )
}

impl PageActions {
    /// Count elements matching an accessible role and name
    pub async fn count_by_role(
        session: &BrowserSession,
        role: &str,
        name: &str,
    ) -> Result<u64, BrowserError> {
        let result = session.execute_js(&count_by_role_script(role, name)).await?;

        let count = result
            .get("count")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        debug!("Role query '{}' name '{}': {} match(es)", role, name, count);
        Ok(count)
    }

    /// Click the first element matching an accessible role and name
    ///
    /// Returns `ElementNotFound` when nothing matches.
    pub async fn click_by_role(
        session: &BrowserSession,
        role: &str,
        name: &str,
    ) -> Result<(), BrowserError> {
        let result = session.execute_js(&click_by_role_script(role, name)).await?;

        let clicked = result
            .get("clicked")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !clicked {
            return Err(BrowserError::ElementNotFound(format!(
                "{} '{}'",
                role, name
            )));
        }

        debug!("Clicked {} '{}'", role, name);
        Ok(())
    }

    /// Check whether a literal text fragment is visible anywhere on the page
    pub async fn is_text_visible(
        session: &BrowserSession,
        fragment: &str,
    ) -> Result<bool, BrowserError> {
        let result = session.execute_js(&text_visible_script(fragment)).await?;

        let visible = result
            .get("visible")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        debug!("Text '{}' visible: {}", fragment, visible);
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_literal_plain() {
        assert_eq!(js_string_literal("RAM"), "\"RAM\"");
    }

    #[test]
    fn test_js_string_literal_escapes_quotes_and_backslashes() {
        assert_eq!(js_string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_js_string_literal_keeps_unicode() {
        assert_eq!(js_string_literal("Chłodzenie"), "\"Chłodzenie\"");
    }

    #[test]
    fn test_role_selector_button_covers_native_and_aria() {
        let selector = role_selector("button");
        assert!(selector.contains("button"));
        assert!(selector.contains(r#"[role="button"]"#));
    }

    #[test]
    fn test_role_selector_other_roles() {
        assert_eq!(role_selector("tab"), r#"[role="tab"]"#);
    }

    #[test]
    fn test_count_script_embeds_escaped_name() {
        let script = count_by_role_script("button", "Laboratorium");
        assert!(script.contains("\"Laboratorium\""));
        assert!(script.contains("aria-label"));
    }

    #[test]
    fn test_text_visible_script_embeds_fragment() {
        let script = text_visible_script("Badania nad Kofeiną");
        assert!(script.contains("\"Badania nad Kofeiną\""));
        assert!(script.contains("offsetParent"));
    }
}
