use crate::core::markup::context::{Element, ParseContext};
use crate::core::markup::extractors::MarkupExtractor;

/// Element name that is a translate directive by itself.
const DIRECTIVE_TAG: &str = "translate";
/// Attribute that activates the directive and optionally carries the id.
const DIRECTIVE_ATTRIBUTE: &str = "translate";
/// Default text of the element-level translation.
const DEFAULT_ATTRIBUTE: &str = "translate-default";
const ATTR_PREFIX: &str = "translate-attr-";
const DEFAULT_ATTR_PREFIX: &str = "translate-default-attr-";

/// `<p translate>ID</p>`, `<p translate="ID">`, `<translate>ID</translate>` and
/// `translate-attr-<name>="ID"` with an optional `translate-default-attr-<name>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveExtractor;

impl DirectiveExtractor {
    /// Set the directive flags of a freshly opened element.
    pub fn mark(element: &mut Element) {
        let id = element
            .attribute(DIRECTIVE_ATTRIBUTE)
            .map(|a| a.value.trim().to_string());
        if element.tag_name != DIRECTIVE_TAG && id.is_none() {
            return;
        }
        element.translate_directive_active = true;
        element.translate_attr_id_override = id.filter(|id| !id.is_empty());
        element.default_text_override = element
            .attribute(DEFAULT_ATTRIBUTE)
            .map(|a| a.value.clone())
            .filter(|text| !text.is_empty());
    }

    /// Register every `translate-attr-*` attribute. Returns whether any exist.
    fn extract_attributes(element: &Element, context: &mut ParseContext<'_>) -> bool {
        let mut found = false;
        for attribute in &element.attributes {
            let Some(target) = attribute.name.strip_prefix(ATTR_PREFIX) else {
                continue;
            };
            found = true;
            let default_text = element
                .attribute(&format!("{}{}", DEFAULT_ATTR_PREFIX, target))
                .map(|a| a.value.as_str())
                .filter(|v| !v.is_empty());
            context.register_translation(&attribute.value, default_text, attribute.start);
        }
        found
    }
}

impl MarkupExtractor for DirectiveExtractor {
    fn name(&self) -> &'static str {
        "directive"
    }

    fn extract(&self, element: &Element, context: &mut ParseContext<'_>) {
        // Filter expressions of inactive elements are scanned by the parser as they arrive.
        if !element.translate_directive_active {
            return;
        }

        let has_translated_attributes = Self::extract_attributes(element, context);
        let default_text = element.default_text_override.as_deref();

        if let Some(id) = &element.translate_attr_id_override {
            context.register_translation(id, default_text, element.start);
            return;
        }

        match element.texts.as_slice() {
            [segment] => context.register_translation(&segment.text, default_text, element.start),
            [] if !has_translated_attributes => context.emit_suppressable_error(
                format!(
                    "{}: translate directive used without id or attributed content",
                    element.as_html()
                ),
                element.start,
            ),
            [] => {}
            _ => context.emit_error(
                format!(
                    "{}: translate directive content has {} text segments, expected exactly one or an explicit id",
                    element.as_html(),
                    element.texts.len()
                ),
                element.start,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::host::{FileKind, Session};

    fn extract(source: &str) -> Session {
        let mut session = Session::default();
        session.process_file("a.html", source, FileKind::Markup).unwrap();
        session
    }

    fn entries(session: &Session) -> Vec<(String, String)> {
        session.registry().to_serializable().into_iter().collect()
    }

    fn messages(session: &Session) -> Vec<String> {
        session.diagnostics().iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_attribute_value_is_id() {
        let session = extract("<span translate='HOME.TITLE'></span>");
        assert_eq!(
            entries(&session),
            vec![("HOME.TITLE".to_string(), "HOME.TITLE".to_string())]
        );
    }

    #[test]
    fn test_single_text_is_id() {
        let session = extract("<p translate>\n  HOME.TITLE\n</p>");
        assert_eq!(session.registry().ids_of("a.html"), vec!["HOME.TITLE"]);
        let usage = session.registry().get("HOME.TITLE").unwrap().usages.first().cloned().unwrap();
        assert_eq!(usage.location.to_string(), "1:0");
    }

    #[test]
    fn test_directive_element() {
        let session = extract("<translate>GREETING</translate>");
        assert_eq!(session.registry().ids_of("a.html"), vec!["GREETING"]);
    }

    #[test]
    fn test_translate_default() {
        let session = extract("<p translate='HOME' translate-default='Home page'></p>");
        assert_eq!(entries(&session), vec![("HOME".to_string(), "Home page".to_string())]);
    }

    #[test]
    fn test_attribute_and_content_both_registered() {
        let session = extract(
            "<a translate translate-attr-title='LINK.TITLE' translate-default-attr-title='Open'>LINK.TEXT</a>",
        );
        assert_eq!(
            entries(&session),
            vec![
                ("LINK.TEXT".to_string(), "LINK.TEXT".to_string()),
                ("LINK.TITLE".to_string(), "Open".to_string()),
            ]
        );
        assert_eq!(session.registry().get("LINK.TITLE").unwrap().usages.len(), 1);
    }

    #[test]
    fn test_translated_attribute_without_content_is_fine() {
        let session = extract("<img translate translate-attr-alt='LOGO'>");
        assert_eq!(session.registry().ids_of("a.html"), vec!["LOGO"]);
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_missing_id_is_suppressable() {
        let session = extract("<p translate></p>");
        assert_eq!(
            messages(&session),
            vec!["a.html:1:0: <p translate>...</p>: translate directive used without id or attributed content"]
        );

        let session = extract(
            "<div suppress-dynamic-translation-error><p translate></p></div>",
        );
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_multiple_text_segments_without_id() {
        let session = extract("<p translate>ONE<br>TWO</p>");
        assert!(session.registry().is_empty());
        assert_eq!(session.diagnostics().len(), 1);
        assert!(session.diagnostics()[0].message.contains("2 text segments"));
    }

    #[test]
    fn test_explicit_id_wins_over_text() {
        let session = extract("<p translate='ID'>{{ 'OTHER' | translate }}</p>");
        assert_eq!(session.registry().ids_of("a.html"), vec!["ID", "OTHER"]);
    }

    #[test]
    fn test_expression_as_id_rejected() {
        let session = extract("<p translate>{{ vm.key }}</p>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0].message.contains("expression as translation id"));
    }
}
