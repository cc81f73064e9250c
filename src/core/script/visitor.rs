//! Syntax tree visitor recognizing translation calls in scripts.
//!
//! Three call shapes are handled:
//!
//! | Call                                   | Registers                 | Rewritten to      |
//! |----------------------------------------|---------------------------|-------------------|
//! | `$translate(id, _, _, default?)`       | each id (string or array) | unchanged         |
//! | `i18n.registerTranslation(id, text?)`  | one translation           | `"id"`            |
//! | `i18n.registerTranslations({id: text})`| one per property          | `["id", ...]`     |
//!
//! Calls are handled after their arguments, so a registration nested inside another
//! call has already been replaced by its literal when the outer call is validated.

use std::ops::Range;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrayLit, BlockStmt, CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberExpr, MemberProp,
    ObjectLit, Prop, PropName, PropOrSpread, Str, SwitchCase,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::core::data::{Location, Translation, Usage};
use crate::core::host::TranslationHost;
use crate::core::parsers::script::ScriptSource;
use crate::core::script::ScriptOptions;
use crate::core::script::comments::SuppressionComments;
use crate::issues::Diagnostic;

/// Replacement of a byte range of the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// The call shapes the visitor acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallPattern {
    /// `$translate(...)` or `<anything>.$translate(...)`
    Service,
    /// `<namespace>.registerTranslation(...)`
    RegisterTranslation,
    /// `<namespace>.registerTranslations(...)`
    RegisterTranslations,
}

/// How a failed validation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// Silenced by a suppression comment in the enclosing block.
    Suppressable,
    Hard,
}

pub struct TranslationVisitor<'a> {
    source: &'a ScriptSource,
    resource: &'a str,
    options: &'a ScriptOptions,
    suppressions: &'a SuppressionComments,
    host: &'a mut dyn TranslationHost,
    /// Start lines of the enclosing statement lists; the program root is line 1.
    block_lines: Vec<usize>,
    edits: Vec<TextEdit>,
}

impl<'a> TranslationVisitor<'a> {
    pub fn new(
        source: &'a ScriptSource,
        resource: &'a str,
        options: &'a ScriptOptions,
        suppressions: &'a SuppressionComments,
        host: &'a mut dyn TranslationHost,
    ) -> Self {
        Self {
            source,
            resource,
            options,
            suppressions,
            host,
            block_lines: vec![1],
            edits: Vec::new(),
        }
    }

    /// Whether the tree was rewritten.
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Text edits mirroring every tree rewrite, in visit order.
    pub fn into_edits(self) -> Vec<TextEdit> {
        self.edits
    }

    fn classify(&self, call: &CallExpr) -> Option<CallPattern> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        match &**callee {
            Expr::Ident(ident) if ident.sym.as_str() == self.options.service_identifier => {
                Some(CallPattern::Service)
            }
            Expr::Member(MemberExpr {
                obj,
                prop: MemberProp::Ident(prop),
                ..
            }) => {
                let method = prop.sym.as_str();
                if method == self.options.service_identifier {
                    return Some(CallPattern::Service);
                }
                let Expr::Ident(namespace) = &**obj else {
                    return None;
                };
                if namespace.sym.as_str() != self.options.registration_namespace {
                    return None;
                }
                match method {
                    "registerTranslation" => Some(CallPattern::RegisterTranslation),
                    "registerTranslations" => Some(CallPattern::RegisterTranslations),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn location(&self, span: Span) -> Location {
        let (line, column) = self.source.line_col(span.lo);
        Location::new(line, column)
    }

    fn report(&mut self, severity: Severity, message: String, span: Span) {
        let location = self.location(span);
        if severity == Severity::Suppressable {
            let block_line = self.block_lines.last().copied().unwrap_or(1);
            if self.suppressions.suppresses(block_line, location.line) {
                return;
            }
        }
        self.host
            .emit_error(Diagnostic::error(self.resource, Some(location), message));
    }

    fn register(&mut self, id: &str, default_text: Option<String>, span: Span) {
        let usage = Usage::new(self.resource, self.location(span));
        self.host
            .register_translation(Translation::new(id, default_text, usage));
    }

    fn record_edit(&mut self, span: Span, replacement: String) {
        let range = self.source.offset_of(span.lo)..self.source.offset_of(span.hi);
        self.edits.push(TextEdit { range, replacement });
    }

    fn visit_service_call(&mut self, call: &CallExpr) {
        let options = self.options;
        let service = &options.service_identifier;
        let Some(first) = call.args.first() else {
            self.report(
                Severity::Hard,
                format!("{}() called without a translation id", service),
                call.span,
            );
            return;
        };

        let ids = match string_or_string_array(first) {
            Some(ids) => ids,
            None => {
                let message = format!(
                    "{}() argument is not a string literal or an array of string literals, dynamic translation ids are not supported",
                    service
                );
                self.report(Severity::Suppressable, message, call.span);
                return;
            }
        };

        // Only a literal 4th argument is a default text.
        let default_text = call.args.get(3).and_then(argument_string);

        for id in ids {
            self.register(&id, default_text.clone(), call.span);
        }
    }

    fn visit_register_translation(&mut self, call: &CallExpr) -> Option<Expr> {
        let callee = format!("{}.registerTranslation", self.options.registration_namespace);
        let Some(first) = call.args.first() else {
            self.report(
                Severity::Hard,
                format!("{}() requires a translation id argument", callee),
                call.span,
            );
            return None;
        };
        let Some(id) = argument_string(first) else {
            self.report(
                Severity::Hard,
                format!("{}() translation id must be a string literal", callee),
                first.expr.span(),
            );
            return None;
        };

        let default_text = match call.args.get(1) {
            None => None,
            Some(arg) => match argument_string(arg) {
                Some(text) => Some(text),
                None => {
                    self.report(
                        Severity::Hard,
                        format!("{}() default text must be a string literal", callee),
                        arg.expr.span(),
                    );
                    return None;
                }
            },
        };

        self.register(&id, default_text, call.span);
        self.record_edit(call.span, serde_json::Value::from(id.as_str()).to_string());
        Some(string_literal(&id, call.span))
    }

    fn visit_register_translations(&mut self, call: &CallExpr) -> Option<Expr> {
        let callee = format!("{}.registerTranslations", self.options.registration_namespace);
        let Some(first) = call.args.first() else {
            self.report(
                Severity::Hard,
                format!("{}() requires an object literal argument", callee),
                call.span,
            );
            return None;
        };
        let Expr::Object(ObjectLit { props, .. }) = &*first.expr else {
            self.report(
                Severity::Hard,
                format!("{}() argument must be an object literal", callee),
                first.expr.span(),
            );
            return None;
        };

        let mut ids = Vec::new();
        for prop in props {
            let (key, value) = match prop {
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(kv) => (property_key(&kv.key), literal_string(&kv.value)),
                    other => {
                        self.report(
                            Severity::Hard,
                            format!(
                                "{}() properties must be 'id: \"default text\"' pairs",
                                callee
                            ),
                            other.span(),
                        );
                        continue;
                    }
                },
                PropOrSpread::Spread(spread) => {
                    self.report(
                        Severity::Hard,
                        format!("{}() does not support spread properties", callee),
                        spread.expr.span(),
                    );
                    continue;
                }
            };

            let Some(key) = key else {
                self.report(
                    Severity::Hard,
                    format!("{}() property key must be an identifier or a literal", callee),
                    prop.span(),
                );
                continue;
            };
            let Some(value) = value else {
                self.report(
                    Severity::Hard,
                    format!(
                        "{}() default text of '{}' must be a string literal",
                        callee, key
                    ),
                    prop.span(),
                );
                continue;
            };

            self.register(&key, Some(value), prop.span());
            ids.push(key);
        }

        self.record_edit(call.span, serde_json::Value::from(ids.clone()).to_string());
        Some(Expr::Array(ArrayLit {
            span: call.span,
            elems: ids
                .iter()
                .map(|id| {
                    Some(ExprOrSpread {
                        spread: None,
                        expr: Box::new(string_literal(id, call.span)),
                    })
                })
                .collect(),
        }))
    }
}

impl VisitMut for TranslationVisitor<'_> {
    fn visit_mut_block_stmt(&mut self, node: &mut BlockStmt) {
        self.block_lines.push(self.source.line_of(node.span.lo));
        node.visit_mut_children_with(self);
        self.block_lines.pop();
    }

    fn visit_mut_switch_case(&mut self, node: &mut SwitchCase) {
        self.block_lines.push(self.source.line_of(node.span.lo));
        node.visit_mut_children_with(self);
        self.block_lines.pop();
    }

    fn visit_mut_expr(&mut self, node: &mut Expr) {
        node.visit_mut_children_with(self);

        let Expr::Call(call) = node else {
            return;
        };
        let replacement = match self.classify(call) {
            Some(CallPattern::Service) => {
                self.visit_service_call(call);
                None
            }
            Some(CallPattern::RegisterTranslation) => self.visit_register_translation(call),
            Some(CallPattern::RegisterTranslations) => self.visit_register_translations(call),
            None => None,
        };
        if let Some(replacement) = replacement {
            *node = replacement;
        }
    }
}

/// Apply edits to `code`. An edit inside the range of an earlier-starting edit is
/// dropped, the enclosing replacement already covers it.
pub fn apply_edits(code: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });

    let mut output = String::with_capacity(code.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            continue;
        }
        output.push_str(&code[cursor..edit.range.start]);
        output.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    output.push_str(&code[cursor..]);
    output
}

fn string_literal(value: &str, span: Span) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span,
        value: value.into(),
        raw: None,
    }))
}

fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_paren(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_paren(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_paren(&ts_sat.expr),
        _ => expr,
    }
}

/// A string literal or a template literal without substitutions.
fn literal_string(expr: &Expr) -> Option<String> {
    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

fn argument_string(arg: &ExprOrSpread) -> Option<String> {
    if arg.spread.is_some() {
        return None;
    }
    literal_string(&arg.expr)
}

fn string_or_string_array(arg: &ExprOrSpread) -> Option<Vec<String>> {
    if arg.spread.is_some() {
        return None;
    }
    if let Some(id) = literal_string(&arg.expr) {
        return Some(vec![id]);
    }
    let Expr::Array(array) = unwrap_paren(&arg.expr) else {
        return None;
    };
    array
        .elems
        .iter()
        .map(|elem| elem.as_ref().and_then(argument_string))
        .collect()
}

fn property_key(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
