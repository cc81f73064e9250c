use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceFile, SourceMap, Spanned,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// All comments of a file, sorted by start position.
///
/// Copied out of `SingleThreadedComments` during parsing so they outlive the parser.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    comments: Vec<Comment>,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        let mut comments: Vec<Comment> = leading
            .values()
            .chain(trailing.values())
            .flatten()
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.span.lo);
        comments.dedup_by_key(|c| c.span.lo);
        Self { comments }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

pub struct ParsedScript {
    pub program: Program,
    pub source: ScriptSource,
}

/// Everything about a parsed file except its syntax tree.
pub struct ScriptSource {
    pub source_map: Arc<SourceMap>,
    pub source_file: Arc<SourceFile>,
    pub comments: ExtractedComments,
}

impl ScriptSource {
    /// Byte offset of `pos` within the parsed text.
    pub fn offset_of(&self, pos: BytePos) -> usize {
        (pos.0 - self.source_file.start_pos.0) as usize
    }

    /// 1-based line and 0-based column of `pos`.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col.0)
    }

    pub fn line_of(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }
}

/// Pick the syntax from the resource's extension. Unknown extensions parse as
/// JavaScript with JSX enabled.
pub fn syntax_for(resource: &str) -> Syntax {
    let extension = Path::new(resource)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parse JavaScript or TypeScript source text into a program.
///
/// Each call uses its own SourceMap, so files can be parsed in parallel.
pub fn parse_script_source(code: String, resource: &str) -> Result<ParsedScript> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(resource.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(resource),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let program = parser.parse_program().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            anyhow!(
                "failed to parse script at {}:{}: {}",
                loc.line,
                loc.col.0,
                e.kind().msg()
            )
        })?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedScript {
            program,
            source: ScriptSource {
                source_map: source_map.clone(),
                source_file,
                comments: extracted_comments,
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::core::parsers::script::*;

    #[test]
    fn test_parse_plain_script() {
        let parsed = parse_script_source(
            "// top\nvar a = $translate('X'); /* trailing */".to_string(),
            "app.js",
        )
        .unwrap();

        assert!(matches!(parsed.program, Program::Script(_)));
        assert_eq!(parsed.source.comments.len(), 2);
        let texts: Vec<_> = parsed.source.comments.iter().map(|c| c.text.trim()).collect();
        assert_eq!(texts, vec!["top", "trailing"]);
    }

    #[test]
    fn test_parse_module_typescript() {
        let parsed = parse_script_source(
            "export const id: string = i18n.registerTranslation('A');".to_string(),
            "app.ts",
        )
        .unwrap();
        assert!(matches!(parsed.program, Program::Module(_)));
    }

    #[test]
    fn test_parse_jsx() {
        let parsed =
            parse_script_source("const x = <b>{$translate('A')}</b>;".to_string(), "view.jsx");
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_parse_error_has_location() {
        let err = parse_script_source("var = ;".to_string(), "broken.js")
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("failed to parse script at 1:"));
    }

    #[test]
    fn test_offset_of_is_relative_to_file() {
        let code = "a;\nb;".to_string();
        let parsed = parse_script_source(code, "x.js").unwrap();
        let Program::Script(script) = &parsed.program else {
            panic!("expected script");
        };
        let second = &script.body[1];
        assert_eq!(parsed.source.offset_of(second.span().lo), 3);
        assert_eq!(parsed.source.line_col(second.span().lo), (2, 0));
    }

    #[test]
    fn test_syntax_for_extension() {
        assert!(matches!(syntax_for("a.tsx"), Syntax::Typescript(TsSyntax { tsx: true, .. })));
        assert!(matches!(syntax_for("a.ts"), Syntax::Typescript(TsSyntax { tsx: false, .. })));
        assert!(matches!(syntax_for("a.js"), Syntax::Es(_)));
        assert!(matches!(syntax_for("a.MJS"), Syntax::Es(_)));
    }
}
