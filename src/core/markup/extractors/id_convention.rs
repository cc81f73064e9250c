use crate::core::markup::context::{Element, ParseContext};
use crate::core::markup::extractors::MarkupExtractor;

pub const DEFAULT_MARKER: &str = "i18n";
pub const DEFAULT_ID_DELIMITER: &str = "@@";

/// `<h1 i18n="meaning@@id">Default</h1>` and `<img i18n-alt="@@id" alt="Default">`.
///
/// The id follows the delimiter in the marker attribute. The default text is the
/// element's content, or the value of the attribute a `<marker>-<attr>` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdConventionExtractor {
    marker: String,
    id_delimiter: String,
}

impl Default for IdConventionExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER, DEFAULT_ID_DELIMITER)
    }
}

impl IdConventionExtractor {
    pub fn new(marker: impl Into<String>, id_delimiter: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            id_delimiter: id_delimiter.into(),
        }
    }

    /// The id after the delimiter, or the reason there is none.
    fn split_id<'v>(&self, value: &'v str) -> Result<&'v str, String> {
        let Some((_, id)) = value.rsplit_once(self.id_delimiter.as_str()) else {
            return Err(format!(
                "'{}' is missing the custom id indicator '{}'",
                value, self.id_delimiter
            ));
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("'{}' has an empty custom id", value));
        }
        Ok(id)
    }

    fn extract_element(&self, element: &Element, context: &mut ParseContext<'_>) {
        let Some(marker) = element.attribute(&self.marker) else {
            return;
        };
        let id = match self.split_id(&marker.value) {
            Ok(id) => id,
            Err(reason) => {
                context.emit_error(format!("{}: {}", element.as_html(), reason), marker.start);
                return;
            }
        };

        match element.texts.as_slice() {
            [segment] => context.register_translation(id, Some(&segment.text), element.start),
            [] => context.emit_error(
                format!(
                    "{}: {} element is empty, missing default translation",
                    element.as_html(),
                    self.marker
                ),
                element.start,
            ),
            _ => context.emit_error(
                format!(
                    "{}: {} element has {} text segments, expected exactly one",
                    element.as_html(),
                    self.marker,
                    element.texts.len()
                ),
                element.start,
            ),
        }
    }

    fn extract_attributes(&self, element: &Element, context: &mut ParseContext<'_>) {
        let prefix = format!("{}-", self.marker);
        for attribute in &element.attributes {
            let Some(target) = attribute.name.strip_prefix(&prefix) else {
                continue;
            };
            let id = match self.split_id(&attribute.value) {
                Ok(id) => id,
                Err(reason) => {
                    context.emit_error(
                        format!("{}: {}", element.as_html(), reason),
                        attribute.start,
                    );
                    continue;
                }
            };
            match element.attribute(target) {
                None => context.emit_error(
                    format!(
                        "{}: '{}' refers to missing attribute '{}'",
                        element.as_html(),
                        attribute.name,
                        target
                    ),
                    attribute.start,
                ),
                Some(translated) if translated.value.is_empty() => context.emit_error(
                    format!(
                        "{}: attribute '{}' is empty, missing default translation",
                        element.as_html(),
                        target
                    ),
                    translated.start,
                ),
                Some(translated) => {
                    context.register_translation(id, Some(&translated.value), attribute.start)
                }
            }
        }
    }
}

impl MarkupExtractor for IdConventionExtractor {
    fn name(&self) -> &'static str {
        "idConvention"
    }

    fn extract(&self, element: &Element, context: &mut ParseContext<'_>) {
        self.extract_element(element, context);
        self.extract_attributes(element, context);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::host::{FileKind, Session, SessionOptions};
    use crate::core::markup::extractors::id_convention::*;
    use crate::core::markup::extractors::Extractor;

    fn extract(source: &str) -> Session {
        let mut session = Session::default();
        session.process_file("a.html", source, FileKind::Markup).unwrap();
        session
    }

    fn entries(session: &Session) -> Vec<(String, String)> {
        session.registry().to_serializable().into_iter().collect()
    }

    #[test]
    fn test_marker_with_id() {
        let session = extract("<div i18n='@@greet'>Hi</div>");
        assert_eq!(entries(&session), vec![("greet".to_string(), "Hi".to_string())]);
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_meaning_before_delimiter_is_ignored() {
        let session = extract("<h1 i18n='site header|Welcome@@welcome'>Hello</h1>");
        assert_eq!(entries(&session), vec![("welcome".to_string(), "Hello".to_string())]);
    }

    #[test]
    fn test_missing_delimiter() {
        let session = extract("<div i18n='greet'>Hi</div>");
        assert!(session.registry().is_empty());
        assert_eq!(session.diagnostics().len(), 1);
        assert!(session.diagnostics()[0]
            .message
            .contains("missing the custom id indicator"));
        assert_eq!(session.diagnostics()[0].location.unwrap().column, 5);
    }

    #[test]
    fn test_empty_id() {
        let session = extract("<div i18n='Hi@@'>Hi</div>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0].message.contains("empty custom id"));
    }

    #[test]
    fn test_empty_element() {
        let session = extract("<div i18n='@@greet'></div>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0]
            .message
            .contains("empty, missing default translation"));
    }

    #[test]
    fn test_multiple_text_segments() {
        let session = extract("<div i18n='@@greet'>Hi<br>there</div>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0].message.contains("expected exactly one"));
    }

    #[test]
    fn test_marked_attribute() {
        let session = extract("<img i18n-alt='@@logo' alt='Company logo'>");
        assert_eq!(
            entries(&session),
            vec![("logo".to_string(), "Company logo".to_string())]
        );
    }

    #[test]
    fn test_marked_attribute_missing_sibling() {
        let session = extract("<img i18n-title='@@logo' alt='Company logo'>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0]
            .message
            .contains("refers to missing attribute 'title'"));
    }

    #[test]
    fn test_marked_attribute_empty_sibling() {
        let session = extract("<img i18n-alt='@@logo' alt=''>");
        assert!(session.registry().is_empty());
        assert!(session.diagnostics()[0].message.contains("attribute 'alt' is empty"));
    }

    #[test]
    fn test_element_and_attribute_together() {
        let session = extract("<a i18n='@@link' i18n-title='@@link.title' title='Go'>Click</a>");
        assert_eq!(
            entries(&session),
            vec![
                ("link".to_string(), "Click".to_string()),
                ("link.title".to_string(), "Go".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_marker_and_delimiter() {
        let options = SessionOptions {
            extractors: vec![Extractor::from_name("idConvention", "data-t", "#").unwrap()],
            ..Default::default()
        };
        let mut session = Session::new(options);
        session
            .process_file("a.html", "<b data-t='x#bold'>Bold</b><i i18n='@@skip'>x</i>", FileKind::Markup)
            .unwrap();
        assert_eq!(entries(&session), vec![("bold".to_string(), "Bold".to_string())]);
    }

    #[test]
    fn test_split_id() {
        let extractor = IdConventionExtractor::default();
        assert_eq!(extractor.split_id("a@@b"), Ok("b"));
        assert_eq!(extractor.split_id("@@ b "), Ok("b"));
        assert!(extractor.split_id("ab").is_err());
    }
}
