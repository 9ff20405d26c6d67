//! Recursive-descent parser, precedence-climbing for expressions.
//!
//! Arrow-function parameter lists are syntactically indistinguishable from a
//! parenthesized expression until the `=>` is seen, so the parser
//! speculatively parses a binding-target list and rewinds the scanner via
//! `try_parse` if that guess turns out wrong.

use crate::error::ParseError;
use revive_ast::kind::{
    ClassData, ClassMember, FunctionData, FunctionFlavor, FunctionId, Literal, NodeKind,
    PropertyKind, VarKind,
};
use revive_ast::node::{BindingTarget, NodeArena, NodeId, NodeList};
use revive_common::{Atom, Interner, Span, SourceKind, Strictness};
use revive_scanner::{ScannerState, SyntaxKind, Token};
use smallvec::smallvec;

pub struct Parser<'a> {
    scanner: ScannerState<'a>,
    arena: NodeArena,
    interner: Interner,
    tok: Token,
    prev_end: u32,
    next_function_id: u32,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut scanner = ScannerState::new(source);
        let _ = scanner.scan(true);
        let tok = scanner.current_token();
        Parser { scanner, arena: NodeArena::new(), interner: Interner::new(), tok, prev_end: 0, next_function_id: 0 }
    }

    pub fn into_parts(self) -> (NodeArena, Interner) {
        (self.arena, self.interner)
    }

    fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    fn alloc(&mut self, kind: NodeKind, start: u32) -> NodeId {
        self.arena.alloc(kind, Span::new(start, self.prev_end))
    }

    fn span_here(&self) -> u32 {
        self.tok.span.start
    }

    fn kind(&self) -> SyntaxKind {
        self.tok.kind
    }

    fn text(&self) -> String {
        self.tok.text.clone()
    }

    fn next_function_id(&mut self) -> FunctionId {
        let id = FunctionId(self.next_function_id);
        self.next_function_id += 1;
        id
    }

    /// `/` following these tokens must be division; everywhere else it can
    /// start a regex literal.
    fn next_regex_allowed(&self) -> bool {
        !matches!(
            self.tok.kind,
            SyntaxKind::Identifier
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateTail
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::UndefinedKeyword
        )
    }

    fn bump(&mut self) {
        self.prev_end = self.tok.span.end;
        let allowed = self.next_regex_allowed();
        let _ = self.scanner.scan(allowed);
        self.tok = self.scanner.current_token();
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> PResult<()> {
        if self.kind() == kind {
            self.bump();
            Ok(())
        } else {
            Err(ParseError::new(self.tok.span, format!("expected {what}, found {:?}", self.kind())))
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Automatic-semicolon-insertion: a statement terminator is present if
    /// an explicit `;` is consumed, or if the next token is `}`/EOF, or if a
    /// newline separated it from the previous token.
    fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat(SyntaxKind::SemicolonToken) {
            return Ok(());
        }
        if matches!(self.kind(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFile) || self.tok.preceded_by_newline {
            return Ok(());
        }
        Err(ParseError::new(self.tok.span, "expected `;`"))
    }

    /// Runs `f` speculatively: rewinds the scanner and restores the lookahead
    /// token if it returns `Err`, leaving the parser exactly as it was.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let pos = self.scanner.position();
        let saved_tok = self.tok.clone();
        let saved_prev_end = self.prev_end;
        match f(self) {
            Ok(v) => Some(v),
            Err(_) => {
                self.scanner.seek(pos);
                self.tok = saved_tok;
                self.prev_end = saved_prev_end;
                None
            }
        }
    }

    // ---------------------------------------------------------------
    // Program
    // ---------------------------------------------------------------

    pub fn parse_program(mut self, source_kind: SourceKind) -> PResult<(NodeArena, Interner, NodeId)> {
        let start = self.span_here();
        let body = self.parse_statement_list_until(SyntaxKind::EndOfFile)?;
        let _ = source_kind;
        let root = self.alloc(NodeKind::Program { body }, start);
        Ok((self.arena, self.interner, root))
    }

    fn parse_statement_list_until(&mut self, terminator: SyntaxKind) -> PResult<NodeList> {
        let mut out = NodeList::new();
        let mut in_prologue = true;
        while self.kind() != terminator && self.kind() != SyntaxKind::EndOfFile {
            if in_prologue {
                if let Some(directive) = self.try_parse_directive()? {
                    out.push(directive);
                    continue;
                }
                in_prologue = false;
            }
            out.push(self.parse_statement()?);
        }
        Ok(out)
    }

    fn try_parse_directive(&mut self) -> PResult<Option<NodeId>> {
        if self.kind() != SyntaxKind::StringLiteral {
            return Ok(None);
        }
        self.try_parse(|p| {
            let start = p.span_here();
            let raw_text = p.text();
            p.bump();
            p.consume_semicolon()?;
            let inner = &raw_text[1..raw_text.len().saturating_sub(1)];
            let is_use_strict = inner == "use strict";
            let raw = p.intern(inner);
            Ok(p.alloc(NodeKind::Directive { is_use_strict, raw }, start))
        })
        .map(Some)
        .or(Ok(None))
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn parse_statement(&mut self) -> PResult<NodeId> {
        match self.kind() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                let decl = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                Ok(decl)
            }
            SyntaxKind::IfKeyword => self.parse_if(),
            SyntaxKind::ForKeyword => self.parse_for(),
            SyntaxKind::WhileKeyword => self.parse_while(),
            SyntaxKind::DoKeyword => self.parse_do_while(),
            SyntaxKind::SwitchKeyword => self.parse_switch(),
            SyntaxKind::BreakKeyword => self.parse_break_continue(true),
            SyntaxKind::ContinueKeyword => self.parse_break_continue(false),
            SyntaxKind::ReturnKeyword => self.parse_return(),
            SyntaxKind::ThrowKeyword => self.parse_throw(),
            SyntaxKind::TryKeyword => self.parse_try(),
            SyntaxKind::WithKeyword => self.parse_with(),
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionFlavor::Plain, true).map(|(id, _)| id),
            SyntaxKind::AsyncKeyword => self.parse_async_statement(),
            SyntaxKind::ClassKeyword => self.parse_class(true),
            SyntaxKind::SemicolonToken => {
                let start = self.span_here();
                self.bump();
                Ok(self.alloc(NodeKind::Empty, start))
            }
            SyntaxKind::DebuggerKeyword => {
                let start = self.span_here();
                self.bump();
                self.consume_semicolon()?;
                Ok(self.alloc(NodeKind::Debugger, start))
            }
            SyntaxKind::Identifier => self.parse_labeled_or_expression_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_async_statement(&mut self) -> PResult<NodeId> {
        // `async function` is a declaration; any other use of `async` here is
        // an expression statement beginning with an identifier-like keyword.
        if self.try_peek_async_function() {
            self.bump();
            return self.parse_function(FunctionFlavor::Async, true).map(|(id, _)| id);
        }
        self.parse_expression_statement()
    }

    fn try_peek_async_function(&mut self) -> bool {
        self.try_parse(|p| {
            p.bump();
            if p.kind() == SyntaxKind::FunctionKeyword && !p.tok.preceded_by_newline {
                Ok(())
            } else {
                Err(ParseError::new(p.tok.span, "not an async function"))
            }
        })
        .is_some()
    }

    fn parse_block(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::OpenBraceToken, "`{`")?;
        let body = self.parse_statement_list_until(SyntaxKind::CloseBraceToken)?;
        self.expect(SyntaxKind::CloseBraceToken, "`}`")?;
        Ok(self.alloc(NodeKind::Block { body }, start))
    }

    fn parse_variable_declaration(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let kind = match self.kind() {
            SyntaxKind::VarKeyword => VarKind::Var,
            SyntaxKind::LetKeyword => VarKind::Let,
            SyntaxKind::ConstKeyword => VarKind::Const,
            _ => unreachable!("caller checked"),
        };
        self.bump();
        let mut declarators = Vec::new();
        loop {
            let target = self.parse_binding_target_as_target()?;
            let init = if self.eat(SyntaxKind::EqualsToken) { Some(self.parse_assignment_expression()?) } else { None };
            declarators.push((target, init));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        Ok(self.alloc(NodeKind::VarDecl { kind, declarators }, start))
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let test = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(SyntaxKind::ElseKeyword) { Some(self.parse_statement()?) } else { None };
        Ok(self.alloc(NodeKind::If { test, consequent, alternate }, start))
    }

    fn parse_for(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;

        let head: Option<NodeId> = if self.kind() == SyntaxKind::SemicolonToken {
            None
        } else if matches!(self.kind(), SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword) {
            Some(self.parse_variable_declaration()?)
        } else {
            Some(self.parse_expression_no_in()?)
        };

        if self.eat(SyntaxKind::InKeyword) {
            let right = self.parse_expression()?;
            self.expect(SyntaxKind::CloseParenToken, "`)`")?;
            let body = self.parse_statement()?;
            let left = head.ok_or_else(|| ParseError::new(self.tok.span, "missing for-in binding"))?;
            return Ok(self.alloc(NodeKind::ForIn { left, right, body }, start));
        }
        if self.kind() == SyntaxKind::OfKeyword {
            self.bump();
            let right = self.parse_assignment_expression()?;
            self.expect(SyntaxKind::CloseParenToken, "`)`")?;
            let body = self.parse_statement()?;
            let left = head.ok_or_else(|| ParseError::new(self.tok.span, "missing for-of binding"))?;
            return Ok(self.alloc(NodeKind::ForOf { left, right, body, is_await: false }, start));
        }

        self.expect(SyntaxKind::SemicolonToken, "`;`")?;
        let test = if self.kind() == SyntaxKind::SemicolonToken { None } else { Some(self.parse_expression()?) };
        self.expect(SyntaxKind::SemicolonToken, "`;`")?;
        let update = if self.kind() == SyntaxKind::CloseParenToken { None } else { Some(self.parse_expression()?) };
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        let body = self.parse_statement()?;
        Ok(self.alloc(NodeKind::For { init: head, test, update, body }, start))
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let test = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        let body = self.parse_statement()?;
        Ok(self.alloc(NodeKind::While { test, body }, start))
    }

    fn parse_do_while(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let body = self.parse_statement()?;
        self.expect(SyntaxKind::WhileKeyword, "`while`")?;
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let test = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        self.eat(SyntaxKind::SemicolonToken);
        Ok(self.alloc(NodeKind::DoWhile { test, body }, start))
    }

    fn parse_switch(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let discriminant = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        self.expect(SyntaxKind::OpenBraceToken, "`{`")?;
        let mut cases = Vec::new();
        while self.kind() != SyntaxKind::CloseBraceToken {
            let test = if self.eat(SyntaxKind::CaseKeyword) {
                let t = self.parse_expression()?;
                Some(t)
            } else {
                self.expect(SyntaxKind::DefaultKeyword, "`default`")?;
                None
            };
            self.expect(SyntaxKind::ColonToken, "`:`")?;
            let mut body = NodeList::new();
            while !matches!(
                self.kind(),
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
            ) {
                body.push(self.parse_statement()?);
            }
            cases.push((test, body));
        }
        self.expect(SyntaxKind::CloseBraceToken, "`}`")?;
        Ok(self.alloc(NodeKind::Switch { discriminant, cases }, start))
    }

    fn parse_break_continue(&mut self, is_break: bool) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let label = if self.kind() == SyntaxKind::Identifier && !self.tok.preceded_by_newline {
            let name = self.text();
            self.bump();
            Some(self.intern(&name))
        } else {
            None
        };
        self.consume_semicolon()?;
        let kind = if is_break { NodeKind::Break { label } } else { NodeKind::Continue { label } };
        Ok(self.alloc(kind, start))
    }

    fn parse_return(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let argument = if matches!(self.kind(), SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFile)
            || self.tok.preceded_by_newline
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(self.alloc(NodeKind::Return { argument }, start))
    }

    fn parse_throw(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.alloc(NodeKind::Throw { argument }, start))
    }

    fn parse_try(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let block = self.parse_block()?;
        let handler = if self.eat(SyntaxKind::CatchKeyword) {
            let binding = if self.eat(SyntaxKind::OpenParenToken) {
                let target = self.parse_binding_target_as_target()?;
                self.expect(SyntaxKind::CloseParenToken, "`)`")?;
                Some(target)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some((binding, body))
        } else {
            None
        };
        let finalizer = if self.eat(SyntaxKind::FinallyKeyword) { Some(self.parse_block()?) } else { None };
        Ok(self.alloc(NodeKind::Try { block, handler, finalizer }, start))
    }

    fn parse_with(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let object = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        let body = self.parse_statement()?;
        Ok(self.alloc(NodeKind::With { object, body }, start))
    }

    fn parse_labeled_or_expression_statement(&mut self) -> PResult<NodeId> {
        if let Some(id) = self.try_parse(|p| {
            let start = p.span_here();
            let name = p.text();
            p.bump();
            p.expect(SyntaxKind::ColonToken, "`:`")?;
            let label = p.intern(&name);
            let body = p.parse_statement()?;
            Ok(p.alloc(NodeKind::Labeled { label, body }, start))
        }) {
            return Ok(id);
        }
        self.parse_expression_statement()
    }

    fn parse_expression_statement(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.alloc(NodeKind::ExpressionStmt { expression }, start))
    }

    // ---------------------------------------------------------------
    // Functions & classes
    // ---------------------------------------------------------------

    fn parse_function(&mut self, mut flavor: FunctionFlavor, as_declaration: bool) -> PResult<(NodeId, FunctionId)> {
        let start = self.span_here();
        self.expect(SyntaxKind::FunctionKeyword, "`function`")?;
        if self.eat(SyntaxKind::AsteriskToken) {
            flavor = if flavor.is_async() { FunctionFlavor::AsyncGenerator } else { FunctionFlavor::Generator };
        }
        let name = if self.kind() == SyntaxKind::Identifier {
            let n = self.text();
            self.bump();
            Some(self.intern(&n))
        } else if as_declaration {
            return Err(ParseError::new(self.tok.span, "function declaration requires a name"));
        } else {
            None
        };
        let (params, has_non_simple_parameters) = self.parse_params()?;
        let body = self.parse_block()?;
        let strictness = if self.body_has_use_strict(body) { Strictness::Strict } else { Strictness::Sloppy };
        let id = self.next_function_id();
        let data = FunctionData {
            id,
            flavor,
            name,
            params,
            body,
            is_concise_arrow_body: false,
            strictness,
            has_non_simple_parameters,
        };
        Ok((self.alloc(NodeKind::Function(Box::new(data)), start), id))
    }

    fn body_has_use_strict(&self, body: NodeId) -> bool {
        if let NodeKind::Block { body: stmts } = self.arena.kind(body) {
            if let Some(first) = stmts.first() {
                if let NodeKind::Directive { is_use_strict, .. } = self.arena.kind(*first) {
                    return *is_use_strict;
                }
            }
        }
        false
    }

    fn parse_params(&mut self) -> PResult<(NodeList, bool)> {
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let mut params = NodeList::new();
        let mut non_simple = false;
        while self.kind() != SyntaxKind::CloseParenToken {
            if self.kind() == SyntaxKind::DotDotDotToken {
                let start = self.span_here();
                self.bump();
                let argument = self.parse_binding_target()?;
                params.push(self.alloc(NodeKind::RestElement { argument }, start));
                non_simple = true;
                break;
            }
            let target = self.parse_binding_target()?;
            if self.eat(SyntaxKind::EqualsToken) {
                let start = self.arena.get(target).span.start;
                let default = self.parse_assignment_expression()?;
                params.push(self.alloc(NodeKind::AssignmentPattern { target, default }, start));
                non_simple = true;
            } else {
                if !matches!(self.arena.kind(target), NodeKind::Identifier(_)) {
                    non_simple = true;
                }
                params.push(target);
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        Ok((params, non_simple))
    }

    /// Binding pattern used by parameters, catch clauses and declarators
    /// that only need a `NodeId`, not the `Identifier`-vs-`Pattern`
    /// distinction `BindingTarget` adds for `var`/`let`/`const`.
    fn parse_binding_target(&mut self) -> PResult<NodeId> {
        match self.kind() {
            SyntaxKind::Identifier => {
                let start = self.span_here();
                let name = self.text();
                self.bump();
                let atom = self.intern(&name);
                Ok(self.alloc(NodeKind::Identifier(atom), start))
            }
            SyntaxKind::OpenBracketToken => self.parse_array_pattern(),
            SyntaxKind::OpenBraceToken => self.parse_object_pattern(),
            _ => Err(ParseError::new(self.tok.span, "expected binding target")),
        }
    }

    fn parse_binding_target_as_target(&mut self) -> PResult<BindingTarget> {
        if self.kind() == SyntaxKind::Identifier {
            let name = self.text();
            self.bump();
            Ok(BindingTarget::Identifier(self.intern(&name)))
        } else {
            Ok(BindingTarget::Pattern(self.parse_binding_target()?))
        }
    }

    fn parse_array_pattern(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::OpenBracketToken, "`[`")?;
        let mut elements = NodeList::new();
        while self.kind() != SyntaxKind::CloseBracketToken {
            if self.kind() == SyntaxKind::CommaToken {
                // elision: empty slot in a destructuring array pattern
                elements.push(NodeId::DUMMY);
                self.bump();
                continue;
            }
            if self.kind() == SyntaxKind::DotDotDotToken {
                let rest_start = self.span_here();
                self.bump();
                let argument = self.parse_binding_target()?;
                elements.push(self.alloc(NodeKind::RestElement { argument }, rest_start));
                break;
            }
            let mut target = self.parse_binding_target()?;
            if self.eat(SyntaxKind::EqualsToken) {
                let s = self.arena.get(target).span.start;
                let default = self.parse_assignment_expression()?;
                target = self.alloc(NodeKind::AssignmentPattern { target, default }, s);
            }
            elements.push(target);
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
        Ok(self.alloc(NodeKind::ArrayPattern { elements }, start))
    }

    fn parse_object_pattern(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::OpenBraceToken, "`{`")?;
        let mut properties = Vec::new();
        let mut rest = None;
        while self.kind() != SyntaxKind::CloseBraceToken {
            if self.kind() == SyntaxKind::DotDotDotToken {
                self.bump();
                rest = Some(self.parse_binding_target()?);
                break;
            }
            let (key, computed) = self.parse_property_key()?;
            let key_start = self.arena.get(key).span.start;
            let (mut value, shorthand) = if self.eat(SyntaxKind::ColonToken) {
                (self.parse_binding_target()?, false)
            } else if let NodeKind::Identifier(atom) = self.arena.kind(key) {
                (self.alloc(NodeKind::Identifier(*atom), key_start), true)
            } else {
                return Err(ParseError::new(self.tok.span, "expected `:` in object pattern"));
            };
            if self.eat(SyntaxKind::EqualsToken) {
                let default = self.parse_assignment_expression()?;
                value = self.alloc(NodeKind::AssignmentPattern { target: value, default }, key_start);
            }
            properties.push(revive_ast::kind::Property { key, value, computed, shorthand, kind: PropertyKind::Init });
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken, "`}`")?;
        Ok(self.alloc(NodeKind::ObjectPattern { properties, rest }, start))
    }

    fn parse_class(&mut self, as_declaration: bool) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::ClassKeyword, "`class`")?;
        let name = if self.kind() == SyntaxKind::Identifier {
            let n = self.text();
            self.bump();
            Some(self.intern(&n))
        } else if as_declaration {
            return Err(ParseError::new(self.tok.span, "class declaration requires a name"));
        } else {
            None
        };
        let super_class = if self.eat(SyntaxKind::ExtendsKeyword) { Some(self.parse_lhs_expression()?) } else { None };
        self.expect(SyntaxKind::OpenBraceToken, "`{`")?;
        let mut members = Vec::new();
        while self.kind() != SyntaxKind::CloseBraceToken {
            if self.eat(SyntaxKind::SemicolonToken) {
                continue;
            }
            members.push(self.parse_class_member()?);
        }
        self.expect(SyntaxKind::CloseBraceToken, "`}`")?;
        let has_trivial_super_call = super_class.is_none();
        let data = ClassData { name, super_class, members, has_trivial_super_call };
        Ok(self.alloc(NodeKind::Class(Box::new(data)), start))
    }

    fn parse_class_member(&mut self) -> PResult<ClassMember> {
        let is_static = if self.kind() == SyntaxKind::StaticKeyword && !self.peek_is_class_member_terminator() {
            self.bump();
            true
        } else {
            false
        };
        let mut property_kind = PropertyKind::Method;
        if matches!(self.kind(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword) && !self.peek_is_class_member_terminator() {
            property_kind = if self.kind() == SyntaxKind::GetKeyword { PropertyKind::Get } else { PropertyKind::Set };
            self.bump();
        }
        let is_async = self.kind() == SyntaxKind::AsyncKeyword && !self.peek_is_class_member_terminator();
        if is_async {
            self.bump();
        }
        let is_generator = self.eat(SyntaxKind::AsteriskToken);

        let (key, computed) = self.parse_property_key()?;

        if self.kind() == SyntaxKind::OpenParenToken {
            let flavor = match (is_async, is_generator) {
                (true, true) => FunctionFlavor::AsyncGenerator,
                (true, false) => FunctionFlavor::Async,
                (false, true) => FunctionFlavor::Generator,
                (false, false) => FunctionFlavor::Method,
            };
            let method_start = self.arena.get(key).span.start;
            let (params, has_non_simple_parameters) = self.parse_params()?;
            let body = self.parse_block()?;
            let strictness = Strictness::Strict;
            let id = self.next_function_id();
            let data = FunctionData {
                id,
                flavor,
                name: None,
                params,
                body,
                is_concise_arrow_body: false,
                strictness,
                has_non_simple_parameters,
            };
            let value = self.alloc(NodeKind::Function(Box::new(data)), method_start);
            return Ok(ClassMember { key, computed, is_static, kind: property_kind, value: Some(value) });
        }

        let value = if self.eat(SyntaxKind::EqualsToken) { Some(self.parse_assignment_expression()?) } else { None };
        self.consume_semicolon()?;
        Ok(ClassMember { key, computed, is_static, kind: PropertyKind::Init, value })
    }

    fn peek_is_class_member_terminator(&mut self) -> bool {
        self.try_parse(|p| {
            p.bump();
            if matches!(p.kind(), SyntaxKind::OpenParenToken | SyntaxKind::EqualsToken | SyntaxKind::SemicolonToken) {
                Ok(())
            } else {
                Err(ParseError::new(p.tok.span, "not a terminator"))
            }
        })
        .is_some()
    }

    fn parse_property_key(&mut self) -> PResult<(NodeId, bool)> {
        let start = self.span_here();
        if self.eat(SyntaxKind::OpenBracketToken) {
            let expr = self.parse_assignment_expression()?;
            self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
            return Ok((expr, true));
        }
        if self.kind() == SyntaxKind::StringLiteral {
            let raw = self.text();
            self.bump();
            let inner = raw[1..raw.len().saturating_sub(1)].to_string();
            let atom = self.intern(&inner);
            return Ok((self.alloc(NodeKind::Literal(Literal::String(atom)), start), false));
        }
        if self.kind() == SyntaxKind::NumericLiteral {
            let raw = self.text();
            self.bump();
            let n: f64 = raw.parse().unwrap_or(0.0);
            return Ok((self.alloc(NodeKind::Literal(Literal::Number(n)), start), false));
        }
        if self.kind() == SyntaxKind::PrivateIdentifier {
            let raw = self.text();
            self.bump();
            let atom = self.intern(&raw);
            return Ok((self.alloc(NodeKind::Identifier(atom), start), false));
        }
        // keywords are valid as (non-computed) property names
        let name = self.text();
        self.bump();
        let atom = self.intern(&name);
        Ok((self.alloc(NodeKind::Identifier(atom), start), false))
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    fn parse_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let first = self.parse_assignment_expression()?;
        if self.kind() != SyntaxKind::CommaToken {
            return Ok(first);
        }
        let mut expressions = smallvec![first];
        while self.eat(SyntaxKind::CommaToken) {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(self.alloc(NodeKind::Sequence { expressions }, start))
    }

    /// Same as `parse_expression` but used inside a `for (...)` head, where
    /// an un-parenthesized `in` must not be consumed as the relational
    /// operator — grammar carve-out is approximated here by parsing a
    /// restricted assignment expression that stops before `in`.
    fn parse_expression_no_in(&mut self) -> PResult<NodeId> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> PResult<NodeId> {
        if self.kind() == SyntaxKind::YieldKeyword {
            return self.parse_yield();
        }
        if let Some(arrow) = self.try_parse_arrow_function() {
            return Ok(arrow);
        }
        let start = self.span_here();
        let target = self.parse_conditional_expression()?;
        let operator_text = assignment_operator_text(self.kind());
        if let Some(op_text) = operator_text {
            self.bump();
            let value = self.parse_assignment_expression()?;
            let operator = self.intern(op_text);
            return Ok(self.alloc(NodeKind::Assignment { operator, target, value }, start));
        }
        Ok(target)
    }

    fn parse_yield(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.bump();
        let delegate = self.eat(SyntaxKind::AsteriskToken);
        let argument = if matches!(
            self.kind(),
            SyntaxKind::SemicolonToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CommaToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EndOfFile
        ) || self.tok.preceded_by_newline
        {
            None
        } else {
            Some(self.parse_assignment_expression()?)
        };
        Ok(self.alloc(NodeKind::Yield { argument, delegate }, start))
    }

    fn try_parse_arrow_function(&mut self) -> Option<NodeId> {
        if self.kind() == SyntaxKind::Identifier {
            return self.try_parse(|p| {
                let start = p.span_here();
                let name = p.text();
                p.bump();
                p.expect(SyntaxKind::EqualsGreaterThanToken, "`=>`")?;
                let atom = p.intern(&name);
                let param_start = start;
                let param = p.alloc(NodeKind::Identifier(atom), param_start);
                p.finish_arrow(start, smallvec![param], FunctionFlavor::Arrow)
            });
        }
        if self.kind() == SyntaxKind::AsyncKeyword {
            if let Some(id) = self.try_parse(|p| {
                let start = p.span_here();
                p.bump();
                if p.tok.preceded_by_newline {
                    return Err(ParseError::new(p.tok.span, "not an async arrow"));
                }
                let (params, _) = p.parse_params()?;
                p.expect(SyntaxKind::EqualsGreaterThanToken, "`=>`")?;
                p.finish_arrow(start, params, FunctionFlavor::AsyncArrow)
            }) {
                return Some(id);
            }
        }
        if self.kind() == SyntaxKind::OpenParenToken {
            return self.try_parse(|p| {
                let start = p.span_here();
                let (params, _) = p.parse_params()?;
                p.expect(SyntaxKind::EqualsGreaterThanToken, "`=>`")?;
                p.finish_arrow(start, params, FunctionFlavor::Arrow)
            });
        }
        None
    }

    fn finish_arrow(&mut self, start: u32, params: NodeList, flavor: FunctionFlavor) -> PResult<NodeId> {
        let (body, is_concise_arrow_body) = if self.kind() == SyntaxKind::OpenBraceToken {
            (self.parse_block()?, false)
        } else {
            (self.parse_assignment_expression()?, true)
        };
        let strictness =
            if !is_concise_arrow_body && self.body_has_use_strict(body) { Strictness::Strict } else { Strictness::Sloppy };
        let non_simple = params.iter().any(|p| !matches!(self.arena.kind(*p), NodeKind::Identifier(_)));
        let id = self.next_function_id();
        let data = FunctionData {
            id,
            flavor,
            name: None,
            params,
            body,
            is_concise_arrow_body,
            strictness,
            has_non_simple_parameters: non_simple,
        };
        Ok(self.alloc(NodeKind::Function(Box::new(data)), start))
    }

    fn parse_conditional_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let test = self.parse_binary_expression(0)?;
        if self.eat(SyntaxKind::QuestionToken) {
            let consequent = self.parse_assignment_expression()?;
            self.expect(SyntaxKind::ColonToken, "`:`")?;
            let alternate = self.parse_assignment_expression()?;
            return Ok(self.alloc(NodeKind::Conditional { test, consequent, alternate }, start));
        }
        Ok(test)
    }

    fn parse_binary_expression(&mut self, min_prec: u8) -> PResult<NodeId> {
        let start = self.span_here();
        let mut left = self.parse_unary_expression()?;
        loop {
            let Some((prec, right_assoc, op_text, is_logical)) = binary_operator_info(self.kind()) else { break };
            if prec < min_prec {
                break;
            }
            self.bump();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_binary_expression(next_min)?;
            let operator = self.intern(op_text);
            left = if is_logical {
                self.alloc(NodeKind::Logical { operator, left, right }, start)
            } else {
                self.alloc(NodeKind::Binary { operator, left, right }, start)
            };
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let op_text = match self.kind() {
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::TypeofKeyword => Some("typeof"),
            SyntaxKind::VoidKeyword => Some("void"),
            SyntaxKind::DeleteKeyword => Some("delete"),
            _ => None,
        };
        if let Some(text) = op_text {
            self.bump();
            let argument = self.parse_unary_expression()?;
            let operator = self.intern(text);
            return Ok(self.alloc(NodeKind::Unary { operator, argument, prefix: true }, start));
        }
        if matches!(self.kind(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) {
            let text = if self.kind() == SyntaxKind::PlusPlusToken { "++" } else { "--" };
            self.bump();
            let argument = self.parse_unary_expression()?;
            let operator = self.intern(text);
            return Ok(self.alloc(NodeKind::Unary { operator, argument, prefix: true }, start));
        }
        if self.kind() == SyntaxKind::AwaitKeyword {
            self.bump();
            let argument = self.parse_unary_expression()?;
            return Ok(self.alloc(NodeKind::Await { argument }, start));
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let expr = self.parse_lhs_expression()?;
        if !self.tok.preceded_by_newline && matches!(self.kind(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) {
            let text = if self.kind() == SyntaxKind::PlusPlusToken { "++" } else { "--" };
            self.bump();
            let operator = self.intern(text);
            return Ok(self.alloc(NodeKind::Unary { operator, argument: expr, prefix: false }, start));
        }
        Ok(expr)
    }

    fn parse_lhs_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let mut expr = if self.kind() == SyntaxKind::NewKeyword { self.parse_new_expression()? } else { self.parse_primary_expression()? };
        loop {
            expr = match self.kind() {
                SyntaxKind::DotToken => {
                    self.bump();
                    let (property, _) = self.parse_member_name()?;
                    self.alloc(NodeKind::Member { object: expr, property, computed: false, optional: false }, start)
                }
                SyntaxKind::QuestionDotToken => {
                    self.bump();
                    if self.kind() == SyntaxKind::OpenParenToken {
                        let arguments = self.parse_arguments()?;
                        self.alloc(NodeKind::Call { callee: expr, arguments, optional: true }, start)
                    } else if self.kind() == SyntaxKind::OpenBracketToken {
                        self.bump();
                        let property = self.parse_expression()?;
                        self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
                        self.alloc(NodeKind::Member { object: expr, property, computed: true, optional: true }, start)
                    } else {
                        let (property, _) = self.parse_member_name()?;
                        self.alloc(NodeKind::Member { object: expr, property, computed: false, optional: true }, start)
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    self.bump();
                    let property = self.parse_expression()?;
                    self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
                    self.alloc(NodeKind::Member { object: expr, property, computed: true, optional: false }, start)
                }
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_arguments()?;
                    self.alloc(NodeKind::Call { callee: expr, arguments, optional: false }, start)
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let quasi = self.parse_template_literal()?;
                    self.alloc(NodeKind::TaggedTemplate { tag: expr, quasi }, start)
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    fn parse_member_name(&mut self) -> PResult<(NodeId, bool)> {
        let start = self.span_here();
        let name = self.text();
        self.bump();
        let atom = self.intern(&name);
        Ok((self.alloc(NodeKind::Identifier(atom), start), false))
    }

    fn parse_new_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::NewKeyword, "`new`")?;
        if self.kind() == SyntaxKind::DotToken {
            self.bump();
            let prop_text = self.text();
            self.bump();
            let meta = self.intern("new");
            let property = self.intern(&prop_text);
            return Ok(self.alloc(NodeKind::MetaProperty { meta, property }, start));
        }
        let callee = if self.kind() == SyntaxKind::NewKeyword { self.parse_new_expression()? } else { self.parse_member_only_expression()? };
        let arguments = if self.kind() == SyntaxKind::OpenParenToken { self.parse_arguments()? } else { NodeList::new() };
        Ok(self.alloc(NodeKind::New { callee, arguments }, start))
    }

    /// Member-expression chain with no call tail, used as a `new` callee so
    /// `new a.b()` binds the call to the whole `new` expression.
    fn parse_member_only_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let mut expr = self.parse_primary_expression()?;
        loop {
            expr = match self.kind() {
                SyntaxKind::DotToken => {
                    self.bump();
                    let (property, _) = self.parse_member_name()?;
                    self.alloc(NodeKind::Member { object: expr, property, computed: false, optional: false }, start)
                }
                SyntaxKind::OpenBracketToken => {
                    self.bump();
                    let property = self.parse_expression()?;
                    self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
                    self.alloc(NodeKind::Member { object: expr, property, computed: true, optional: false }, start)
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> PResult<NodeList> {
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let mut arguments = NodeList::new();
        while self.kind() != SyntaxKind::CloseParenToken {
            if self.kind() == SyntaxKind::DotDotDotToken {
                let start = self.span_here();
                self.bump();
                let argument = self.parse_assignment_expression()?;
                arguments.push(self.alloc(NodeKind::Spread { argument }, start));
            } else {
                arguments.push(self.parse_assignment_expression()?);
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        match self.kind() {
            SyntaxKind::NumericLiteral => {
                let raw = self.text();
                self.bump();
                let n: f64 = raw.parse().unwrap_or(0.0);
                let lit = if n == 0.0 && raw.starts_with('-') { Literal::NegativeZero } else { Literal::Number(n) };
                Ok(self.alloc(NodeKind::Literal(lit), start))
            }
            SyntaxKind::BigIntLiteral => {
                let raw = self.text();
                self.bump();
                let digits = raw.trim_end_matches('n').to_string();
                Ok(self.alloc(NodeKind::Literal(Literal::BigInt(digits)), start))
            }
            SyntaxKind::StringLiteral => {
                let raw = self.text();
                self.bump();
                let inner = raw[1..raw.len().saturating_sub(1)].to_string();
                let atom = self.intern(&inner);
                Ok(self.alloc(NodeKind::Literal(Literal::String(atom)), start))
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => self.parse_template_literal(),
            SyntaxKind::RegularExpressionLiteral => {
                let raw = self.text();
                self.bump();
                let last_slash = raw.rfind('/').unwrap_or(raw.len());
                let pattern_text = &raw[1..last_slash];
                let flags_text = &raw[last_slash + 1..];
                let pattern = self.intern(pattern_text);
                let flags = self.intern(flags_text);
                Ok(self.alloc(NodeKind::Literal(Literal::Regex { pattern, flags }), start))
            }
            SyntaxKind::TrueKeyword => {
                self.bump();
                Ok(self.alloc(NodeKind::Literal(Literal::Boolean(true)), start))
            }
            SyntaxKind::FalseKeyword => {
                self.bump();
                Ok(self.alloc(NodeKind::Literal(Literal::Boolean(false)), start))
            }
            SyntaxKind::NullKeyword => {
                self.bump();
                Ok(self.alloc(NodeKind::Literal(Literal::Null), start))
            }
            SyntaxKind::UndefinedKeyword => {
                self.bump();
                Ok(self.alloc(NodeKind::Literal(Literal::Undefined), start))
            }
            SyntaxKind::ThisKeyword => {
                self.bump();
                Ok(self.alloc(NodeKind::ThisExpr, start))
            }
            SyntaxKind::SuperKeyword => {
                self.bump();
                if self.eat(SyntaxKind::DotToken) {
                    let (property, _) = self.parse_member_name()?;
                    Ok(self.alloc(NodeKind::SuperMember { property, computed: false }, start))
                } else if self.eat(SyntaxKind::OpenBracketToken) {
                    let property = self.parse_expression()?;
                    self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
                    Ok(self.alloc(NodeKind::SuperMember { property, computed: true }, start))
                } else if self.kind() == SyntaxKind::OpenParenToken {
                    let arguments = self.parse_arguments()?;
                    Ok(self.alloc(NodeKind::SuperCall { arguments }, start))
                } else {
                    Ok(self.alloc(NodeKind::SuperExpr, start))
                }
            }
            SyntaxKind::Identifier | SyntaxKind::EvalKeyword | SyntaxKind::OfKeyword | SyntaxKind::GetKeyword | SyntaxKind::SetKeyword | SyntaxKind::StaticKeyword => {
                let name = self.text();
                self.bump();
                let atom = self.intern(&name);
                Ok(self.alloc(NodeKind::Identifier(atom), start))
            }
            SyntaxKind::AsyncKeyword => {
                if let Some(id) = self.try_parse(|p| {
                    let s = p.span_here();
                    p.bump();
                    if p.kind() == SyntaxKind::FunctionKeyword && !p.tok.preceded_by_newline {
                        p.parse_function(FunctionFlavor::Async, false).map(|(id, _)| {
                            let _ = s;
                            id
                        })
                    } else {
                        Err(ParseError::new(p.tok.span, "not an async function expression"))
                    }
                }) {
                    return Ok(id);
                }
                let name = self.text();
                self.bump();
                let atom = self.intern(&name);
                Ok(self.alloc(NodeKind::Identifier(atom), start))
            }
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionFlavor::Plain, false).map(|(id, _)| id),
            SyntaxKind::ClassKeyword => self.parse_class(false),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            _ => Err(ParseError::new(self.tok.span, format!("unexpected token {:?}", self.kind()))),
        }
    }

    fn parse_parenthesized_expression(&mut self) -> PResult<NodeId> {
        self.expect(SyntaxKind::OpenParenToken, "`(`")?;
        let expr = self.parse_expression()?;
        self.expect(SyntaxKind::CloseParenToken, "`)`")?;
        Ok(expr)
    }

    fn parse_array_literal(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::OpenBracketToken, "`[`")?;
        let mut elements = NodeList::new();
        let mut has_holes = false;
        while self.kind() != SyntaxKind::CloseBracketToken {
            if self.kind() == SyntaxKind::CommaToken {
                has_holes = true;
                elements.push(NodeId::DUMMY);
                self.bump();
                continue;
            }
            if self.kind() == SyntaxKind::DotDotDotToken {
                let s = self.span_here();
                self.bump();
                let argument = self.parse_assignment_expression()?;
                elements.push(self.alloc(NodeKind::Spread { argument }, s));
            } else {
                elements.push(self.parse_assignment_expression()?);
            }
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken, "`]`")?;
        Ok(self.alloc(NodeKind::ArrayExpr { elements, has_holes }, start))
    }

    fn parse_object_literal(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        self.expect(SyntaxKind::OpenBraceToken, "`{`")?;
        let mut properties = Vec::new();
        while self.kind() != SyntaxKind::CloseBraceToken {
            if self.kind() == SyntaxKind::DotDotDotToken {
                let s = self.span_here();
                self.bump();
                let argument = self.parse_assignment_expression()?;
                let value = self.alloc(NodeKind::Spread { argument }, s);
                properties.push(revive_ast::kind::Property { key: value, value, computed: false, shorthand: false, kind: PropertyKind::Spread });
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
                continue;
            }
            properties.push(self.parse_object_property()?);
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken, "`}`")?;
        Ok(self.alloc(NodeKind::ObjectExpr { properties }, start))
    }

    fn parse_object_property(&mut self) -> PResult<revive_ast::kind::Property> {
        let mut accessor_kind: Option<PropertyKind> = None;
        if matches!(self.kind(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword) {
            let is_get = self.kind() == SyntaxKind::GetKeyword;
            if self.peek_is_property_name_start() {
                accessor_kind = Some(if is_get { PropertyKind::Get } else { PropertyKind::Set });
                self.bump();
            }
        }
        let is_generator_or_method_async = self.kind() == SyntaxKind::AsyncKeyword && self.peek_is_property_name_start();
        if is_generator_or_method_async {
            self.bump();
        }
        let is_generator = self.eat(SyntaxKind::AsteriskToken);

        let (key, computed) = self.parse_property_key()?;
        let key_start = self.arena.get(key).span.start;

        if let Some(kind) = accessor_kind {
            let (params, has_non_simple_parameters) = self.parse_params()?;
            let body = self.parse_block()?;
            let id = self.next_function_id();
            let data = FunctionData {
                id,
                flavor: FunctionFlavor::Method,
                name: None,
                params,
                body,
                is_concise_arrow_body: false,
                strictness: Strictness::Sloppy,
                has_non_simple_parameters,
            };
            let value = self.alloc(NodeKind::Function(Box::new(data)), key_start);
            return Ok(revive_ast::kind::Property { key, value, computed, shorthand: false, kind });
        }

        if self.kind() == SyntaxKind::OpenParenToken {
            let flavor = match (is_generator_or_method_async, is_generator) {
                (true, true) => FunctionFlavor::AsyncGenerator,
                (true, false) => FunctionFlavor::Async,
                (false, true) => FunctionFlavor::Generator,
                (false, false) => FunctionFlavor::Method,
            };
            let (params, has_non_simple_parameters) = self.parse_params()?;
            let body = self.parse_block()?;
            let id = self.next_function_id();
            let data = FunctionData {
                id,
                flavor,
                name: None,
                params,
                body,
                is_concise_arrow_body: false,
                strictness: Strictness::Sloppy,
                has_non_simple_parameters,
            };
            let value = self.alloc(NodeKind::Function(Box::new(data)), key_start);
            return Ok(revive_ast::kind::Property { key, value, computed, shorthand: false, kind: PropertyKind::Method });
        }

        if self.eat(SyntaxKind::ColonToken) {
            let value = self.parse_assignment_expression()?;
            return Ok(revive_ast::kind::Property { key, value, computed, shorthand: false, kind: PropertyKind::Init });
        }

        // shorthand `{ x }` or `{ x = default }` (the latter only valid when
        // this object literal turns out to be a destructuring target).
        if let NodeKind::Identifier(atom) = self.arena.kind(key) {
            let mut value = self.alloc(NodeKind::Identifier(*atom), key_start);
            if self.eat(SyntaxKind::EqualsToken) {
                let default = self.parse_assignment_expression()?;
                value = self.alloc(NodeKind::AssignmentPattern { target: value, default }, key_start);
            }
            return Ok(revive_ast::kind::Property { key, value, computed, shorthand: true, kind: PropertyKind::Init });
        }

        Err(ParseError::new(self.tok.span, "invalid object literal property"))
    }

    fn peek_is_property_name_start(&mut self) -> bool {
        self.try_parse(|p| {
            p.bump();
            if matches!(
                p.kind(),
                SyntaxKind::ColonToken | SyntaxKind::OpenParenToken | SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
            ) {
                Err(ParseError::new(p.tok.span, "that keyword is the property name itself"))
            } else {
                Ok(())
            }
        })
        .is_some()
    }

    fn parse_template_literal(&mut self) -> PResult<NodeId> {
        let start = self.span_here();
        let mut quasis = Vec::new();
        let mut expressions = NodeList::new();
        if self.kind() == SyntaxKind::NoSubstitutionTemplateLiteral {
            let raw = self.text();
            quasis.push(self.intern(template_cooked(&raw, true, true).as_str()));
            self.bump();
            return Ok(self.alloc(NodeKind::TemplateLiteral { quasis, expressions }, start));
        }
        let head_raw = self.text();
        quasis.push(self.intern(template_cooked(&head_raw, true, false).as_str()));
        self.bump();
        loop {
            expressions.push(self.parse_expression()?);
            if self.kind() != SyntaxKind::CloseBraceToken {
                return Err(ParseError::new(self.tok.span, "expected `}` in template literal"));
            }
            let continuation = self.scanner.re_scan_template_continuation();
            let text = self.scanner.get_token_value().to_string();
            self.tok = self.scanner.current_token();
            match continuation {
                SyntaxKind::TemplateTail => {
                    quasis.push(self.intern(template_cooked(&text, false, true).as_str()));
                    self.bump();
                    break;
                }
                SyntaxKind::TemplateMiddle => {
                    quasis.push(self.intern(template_cooked(&text, false, false).as_str()));
                    self.bump();
                }
                _ => return Err(ParseError::new(self.tok.span, "malformed template literal")),
            }
        }
        Ok(self.alloc(NodeKind::TemplateLiteral { quasis, expressions }, start))
    }
}

/// Strips template-literal delimiters: a leading backtick or `}`, and a
/// trailing backtick (`tail`) or `${` (otherwise).
fn template_cooked(raw: &str, _head: bool, tail: bool) -> String {
    let end_trim = if tail { 1 } else { 2 };
    raw.get(1..raw.len().saturating_sub(end_trim)).unwrap_or("").to_string()
}

fn assignment_operator_text(kind: SyntaxKind) -> Option<&'static str> {
    use SyntaxKind::*;
    Some(match kind {
        EqualsToken => "=",
        PlusEqualsToken => "+=",
        MinusEqualsToken => "-=",
        AsteriskEqualsToken => "*=",
        AsteriskAsteriskEqualsToken => "**=",
        SlashEqualsToken => "/=",
        PercentEqualsToken => "%=",
        LessThanLessThanEqualsToken => "<<=",
        GreaterThanGreaterThanEqualsToken => ">>=",
        GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
        AmpersandEqualsToken => "&=",
        BarEqualsToken => "|=",
        CaretEqualsToken => "^=",
        AmpersandAmpersandEqualsToken => "&&=",
        BarBarEqualsToken => "||=",
        QuestionQuestionEqualsToken => "??=",
        _ => return None,
    })
}

/// `(precedence, right_associative, operator_text, is_logical)`.
fn binary_operator_info(kind: SyntaxKind) -> Option<(u8, bool, &'static str, bool)> {
    use SyntaxKind::*;
    Some(match kind {
        QuestionQuestionToken => (1, false, "??", true),
        BarBarToken => (2, false, "||", true),
        AmpersandAmpersandToken => (3, false, "&&", true),
        BarToken => (4, false, "|", false),
        CaretToken => (5, false, "^", false),
        AmpersandToken => (6, false, "&", false),
        EqualsEqualsToken => (7, false, "==", false),
        ExclamationEqualsToken => (7, false, "!=", false),
        EqualsEqualsEqualsToken => (7, false, "===", false),
        ExclamationEqualsEqualsToken => (7, false, "!==", false),
        LessThanToken => (8, false, "<", false),
        GreaterThanToken => (8, false, ">", false),
        LessThanEqualsToken => (8, false, "<=", false),
        GreaterThanEqualsToken => (8, false, ">=", false),
        InstanceofKeyword => (8, false, "instanceof", false),
        InKeyword => (8, false, "in", false),
        LessThanLessThanToken => (9, false, "<<", false),
        GreaterThanGreaterThanToken => (9, false, ">>", false),
        GreaterThanGreaterThanGreaterThanToken => (9, false, ">>>", false),
        PlusToken => (10, false, "+", false),
        MinusToken => (10, false, "-", false),
        AsteriskToken => (11, false, "*", false),
        SlashToken => (11, false, "/", false),
        PercentToken => (11, false, "%", false),
        AsteriskAsteriskToken => (12, true, "**", false),
        _ => return None,
    })
}
