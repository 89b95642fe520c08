//! Hand-written recursive-descent parser.
//!
//! One grammar production per method. Expressions are folded strictly
//! left to right: the language defines no operator precedence, so
//! `a + b * c` parses as `(a + b) * c`.
//!
//! The parser also populates the global registry as it goes: the class
//! name on entry, each subroutine signature as its header is parsed.

use crate::{
    common::{
        ast::{
            BinaryOp, Class, ClassVarDec, ClassVarKind, DoStatement, Expression, ExpressionKind,
            IfStatement, KeywordConst, LetStatement, Parameter, ReturnStatement, ReturnType,
            Statement, SubroutineCall, SubroutineDec, SubroutineKind, Type, UnaryOp, VarDec,
            WhileStatement,
        },
        error::{CompileError, CompileResult, Diagnostic},
        Position,
    },
    lexer::{
        token::{Keyword, Token, TokenKind},
        Lexer,
    },
    registry::{GlobalRegistry, MethodSignature},
};

pub struct Parser<'s, 'r> {
    lexer: Lexer<'s>,
    registry: &'r GlobalRegistry,
    class_name: String,
}

impl<'s, 'r> Parser<'s, 'r> {
    pub fn new(lexer: Lexer<'s>, registry: &'r GlobalRegistry) -> Self {
        Self {
            lexer,
            registry,
            class_name: String::new(),
        }
    }

    /// Parse the single class this file must contain and assert nothing
    /// follows its closing brace.
    pub fn parse(mut self) -> CompileResult<Class> {
        let class = self.parse_class()?;
        if self.lexer.has_more() {
            return Err(self.error_here("extra tokens after class body"));
        }
        Ok(class)
    }

    // region: token plumbing

    fn current(&self) -> Token<'s> {
        self.lexer.current()
    }

    fn advance(&mut self) -> CompileResult<()> {
        self.lexer.advance()
    }

    fn error_here(&self, message: &str) -> CompileError {
        self.lexer.syntax_error_at(self.current().position, message)
    }

    fn semantic_error_at(&self, position: Position, message: String) -> CompileError {
        CompileError::Semantic(Diagnostic::new(self.lexer.file(), position, message))
    }

    fn check_symbol(&self, symbol: char) -> bool {
        self.current().is_symbol(symbol)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    fn consume_symbol(&mut self, symbol: char) -> CompileResult<()> {
        if self.check_symbol(symbol) {
            self.advance()
        } else {
            Err(self.error_here(&format!(
                "Expected '{symbol}', found {}",
                self.current().describe()
            )))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> CompileResult<()> {
        if self.check_keyword(keyword) {
            self.advance()
        } else {
            Err(self.error_here(&format!(
                "Expected '{keyword}', found {}",
                self.current().describe()
            )))
        }
    }

    fn consume_identifier(&mut self, context: &str) -> CompileResult<(String, Position)> {
        match self.current().kind {
            TokenKind::Identifier(name) => {
                let position = self.current().position;
                self.advance()?;
                Ok((name.to_string(), position))
            }
            _ => Err(self.error_here(&format!(
                "Expected {context}, found {}",
                self.current().describe()
            ))),
        }
    }

    /// `;` with a predictive message for the common slip of running into
    /// the closing brace or the next statement keyword.
    fn consume_semicolon(&mut self) -> CompileResult<()> {
        if self.check_symbol(';') {
            return self.advance();
        }

        let current = self.current();
        let at_statement_boundary = current.is_symbol('}')
            || matches!(
                current.kind,
                TokenKind::Keyword(
                    Keyword::Let | Keyword::Do | Keyword::If | Keyword::While | Keyword::Return
                )
            );
        if at_statement_boundary {
            Err(self.error_here("Missing ';'"))
        } else {
            Err(self.error_here(&format!("Expected ';', found {}", current.describe())))
        }
    }

    /// `)` with a predictive message when the writer jumped straight to
    /// the body.
    fn consume_closing_paren(&mut self) -> CompileResult<()> {
        if self.check_symbol(')') {
            return self.advance();
        }
        if self.check_symbol('{') {
            return Err(self.error_here("Missing ')' before opening brace"));
        }
        Err(self.error_here(&format!(
            "Expected ')', found {}",
            self.current().describe()
        )))
    }

    // endregion

    // region: declarations

    fn parse_class(&mut self) -> CompileResult<Class> {
        let position = self.current().position;
        self.consume_keyword(Keyword::Class)?;

        let (name, name_position) = self.consume_identifier("class name")?;
        if name != self.lexer.class_name() {
            return Err(self.lexer.syntax_error_at(
                name_position,
                &format!(
                    "Class name '{name}' does not match file name '{}'",
                    self.lexer.class_name()
                ),
            ));
        }
        if !self.registry.register_class(&name) {
            return Err(
                self.semantic_error_at(name_position, format!("Class '{name}' is already defined"))
            );
        }
        self.class_name.clone_from(&name);

        self.consume_symbol('{')?;

        let mut class_vars = Vec::new();
        while matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Static | Keyword::Field)
        ) {
            class_vars.push(self.parse_class_var_dec()?);
        }

        let mut subroutines = Vec::new();
        while matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)
        ) {
            subroutines.push(self.parse_subroutine()?);
        }

        self.consume_symbol('}')?;

        Ok(Class {
            name,
            class_vars,
            subroutines,
            position,
        })
    }

    fn parse_type(&mut self) -> CompileResult<Type> {
        let parsed = match self.current().kind {
            TokenKind::Keyword(Keyword::Int) => Type::Int,
            TokenKind::Keyword(Keyword::Char) => Type::Char,
            TokenKind::Keyword(Keyword::Boolean) => Type::Boolean,
            TokenKind::Identifier(name) => Type::Class(name.to_string()),
            _ => {
                return Err(self.error_here(&format!(
                    "Expected a type, found {}",
                    self.current().describe()
                )))
            }
        };
        self.advance()?;
        Ok(parsed)
    }

    fn parse_return_type(&mut self) -> CompileResult<ReturnType> {
        if self.check_keyword(Keyword::Void) {
            self.advance()?;
            return Ok(ReturnType::Void);
        }
        Ok(ReturnType::Of(self.parse_type()?))
    }

    fn parse_class_var_dec(&mut self) -> CompileResult<ClassVarDec> {
        let position = self.current().position;
        let kind = if self.check_keyword(Keyword::Static) {
            ClassVarKind::Static
        } else {
            ClassVarKind::Field
        };
        self.advance()?;

        let var_type = self.parse_type()?;
        let names = self.parse_name_list()?;

        Ok(ClassVarDec {
            kind,
            var_type,
            names,
            position,
        })
    }

    /// `ident (',' ident)* ';'`, hinting at the missing comma when two
    /// names are simply juxtaposed.
    fn parse_name_list(&mut self) -> CompileResult<Vec<String>> {
        let mut names = vec![self.consume_identifier("variable name")?.0];
        loop {
            if self.check_symbol(',') {
                self.advance()?;
                names.push(self.consume_identifier("variable name")?.0);
            } else if matches!(self.current().kind, TokenKind::Identifier(_)) {
                return Err(self.error_here("Missing ','"));
            } else {
                break;
            }
        }
        self.consume_semicolon()?;
        Ok(names)
    }

    fn parse_subroutine(&mut self) -> CompileResult<SubroutineDec> {
        let position = self.current().position;
        let kind = match self.current().kind {
            TokenKind::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            TokenKind::Keyword(Keyword::Function) => SubroutineKind::Function,
            _ => SubroutineKind::Method,
        };
        self.advance()?;

        let return_type = self.parse_return_type()?;
        let (name, name_position) = self.consume_identifier("subroutine name")?;

        self.consume_symbol('(')?;
        let parameters = self.parse_parameters()?;
        self.consume_closing_paren()?;

        self.register_subroutine(&name, kind, &return_type, &parameters, name_position)?;

        self.consume_symbol('{')?;
        let mut locals = Vec::new();
        while self.check_keyword(Keyword::Var) {
            locals.push(self.parse_var_dec()?);
        }
        let statements = self.parse_statements()?;
        self.consume_symbol('}')?;

        Ok(SubroutineDec {
            kind,
            return_type,
            name,
            parameters,
            locals,
            statements,
            position,
        })
    }

    fn parse_parameters(&mut self) -> CompileResult<Vec<Parameter>> {
        let mut parameters = Vec::new();
        if self.check_symbol(')') {
            return Ok(parameters);
        }

        loop {
            let param_type = self.parse_type()?;
            let (name, _) = self.consume_identifier("parameter name")?;
            parameters.push(Parameter { param_type, name });

            if self.check_symbol(',') {
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(parameters)
    }

    fn register_subroutine(
        &mut self,
        name: &str,
        kind: SubroutineKind,
        return_type: &ReturnType,
        parameters: &[Parameter],
        position: Position,
    ) -> CompileResult<()> {
        let signature = MethodSignature {
            return_type: return_type.clone(),
            parameters: parameters
                .iter()
                .map(|parameter| parameter.param_type.clone())
                .collect(),
            is_static: kind != SubroutineKind::Method,
            is_constructor: kind == SubroutineKind::Constructor,
            position,
        };

        self.registry
            .register_method(&self.class_name, name, signature)
            .map_err(|duplicate| {
                self.semantic_error_at(
                    position,
                    format!(
                        "Subroutine '{}' is already defined in class '{}' (previous declaration at [{}])",
                        duplicate.method_name, duplicate.class_name, duplicate.previous
                    ),
                )
            })
    }

    fn parse_var_dec(&mut self) -> CompileResult<VarDec> {
        let position = self.current().position;
        self.consume_keyword(Keyword::Var)?;
        let var_type = self.parse_type()?;
        let names = self.parse_name_list()?;

        Ok(VarDec {
            var_type,
            names,
            position,
        })
    }

    // endregion

    // region: statements

    fn parse_statements(&mut self) -> CompileResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let statement = match self.current().kind {
                TokenKind::Keyword(Keyword::Let) => Statement::Let(self.parse_let()?),
                TokenKind::Keyword(Keyword::If) => Statement::If(self.parse_if()?),
                TokenKind::Keyword(Keyword::While) => Statement::While(self.parse_while()?),
                TokenKind::Keyword(Keyword::Do) => Statement::Do(self.parse_do()?),
                TokenKind::Keyword(Keyword::Return) => Statement::Return(self.parse_return()?),
                _ => break,
            };
            statements.push(statement);
        }
        Ok(statements)
    }

    fn parse_let(&mut self) -> CompileResult<LetStatement> {
        let position = self.current().position;
        self.consume_keyword(Keyword::Let)?;
        let (target, _) = self.consume_identifier("variable name")?;

        // `let hi score = ...` — an identifier where '[' or '=' belongs
        if matches!(self.current().kind, TokenKind::Identifier(_)) {
            return Err(self.error_here("perhaps you forgot a '[' for an array?"));
        }

        let index = if self.check_symbol('[') {
            self.advance()?;
            let index = self.parse_expression()?;
            self.consume_symbol(']')?;
            Some(index)
        } else {
            None
        };

        self.consume_symbol('=')?;
        let value = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(LetStatement {
            target,
            index,
            value,
            position,
        })
    }

    fn parse_if(&mut self) -> CompileResult<IfStatement> {
        let position = self.current().position;
        self.consume_keyword(Keyword::If)?;

        self.consume_symbol('(')?;
        let condition = self.parse_expression()?;
        self.consume_closing_paren()?;

        self.consume_symbol('{')?;
        let then_branch = self.parse_statements()?;
        self.consume_symbol('}')?;

        let else_branch = if self.check_keyword(Keyword::Else) {
            self.advance()?;
            self.consume_symbol('{')?;
            let statements = self.parse_statements()?;
            self.consume_symbol('}')?;
            statements
        } else {
            Vec::new()
        };

        Ok(IfStatement {
            condition,
            then_branch,
            else_branch,
            position,
        })
    }

    fn parse_while(&mut self) -> CompileResult<WhileStatement> {
        let position = self.current().position;
        self.consume_keyword(Keyword::While)?;

        self.consume_symbol('(')?;
        let condition = self.parse_expression()?;
        self.consume_closing_paren()?;

        self.consume_symbol('{')?;
        let body = self.parse_statements()?;
        self.consume_symbol('}')?;

        Ok(WhileStatement {
            condition,
            body,
            position,
        })
    }

    fn parse_do(&mut self) -> CompileResult<DoStatement> {
        let position = self.current().position;
        self.consume_keyword(Keyword::Do)?;

        let (lead, lead_position) = self.consume_identifier("subroutine name")?;
        let call = self.parse_call_after_lead(lead, lead_position)?;
        self.consume_semicolon()?;

        Ok(DoStatement { call, position })
    }

    fn parse_return(&mut self) -> CompileResult<ReturnStatement> {
        let position = self.current().position;
        self.consume_keyword(Keyword::Return)?;

        let value = if self.check_symbol(';') {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(ReturnStatement { value, position })
    }

    // endregion

    // region: expressions

    fn parse_expression_list(&mut self) -> CompileResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.check_symbol(')') {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);
            if self.check_symbol(',') {
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(arguments)
    }

    /// `term (op term)*`, folded strictly left to right.
    fn parse_expression(&mut self) -> CompileResult<Expression> {
        let mut expression = self.parse_term()?;

        while let TokenKind::Symbol(symbol) = self.current().kind {
            let Some(op) = BinaryOp::from_symbol(symbol) else {
                break;
            };
            let position = expression.position;
            self.advance()?;
            let right = self.parse_term()?;

            expression = Expression {
                kind: ExpressionKind::Binary {
                    op,
                    left: Box::new(expression),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(expression)
    }

    fn parse_term(&mut self) -> CompileResult<Expression> {
        let token = self.current();
        let position = token.position;

        let kind = match token.kind {
            TokenKind::IntConst(value) => {
                self.advance()?;
                ExpressionKind::IntConst(value)
            }
            TokenKind::StringConst(text) => {
                self.advance()?;
                ExpressionKind::StringConst(text.to_string())
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance()?;
                ExpressionKind::KeywordConst(KeywordConst::True)
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance()?;
                ExpressionKind::KeywordConst(KeywordConst::False)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                ExpressionKind::KeywordConst(KeywordConst::Null)
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance()?;
                ExpressionKind::KeywordConst(KeywordConst::This)
            }
            TokenKind::Symbol('(') => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.consume_symbol(')')?;
                return Ok(inner);
            }
            TokenKind::Symbol('-') => {
                self.advance()?;
                let operand = self.parse_term()?;
                ExpressionKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Symbol('~') => {
                self.advance()?;
                let operand = self.parse_term()?;
                ExpressionKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Identifier(text) => {
                // the lookahead decides: plain variable, element access,
                // or a subroutine call
                let name = text.to_string();
                let next = self.lexer.peek()?;

                if next.is_symbol('(') || next.is_symbol('.') {
                    self.advance()?;
                    let call = self.parse_call_after_lead(name, position)?;
                    ExpressionKind::Call(call)
                } else if next.is_symbol('[') {
                    self.advance()?; // the identifier
                    self.advance()?; // '['
                    let index = self.parse_expression()?;
                    self.consume_symbol(']')?;
                    ExpressionKind::Var {
                        name,
                        index: Some(Box::new(index)),
                    }
                } else {
                    self.advance()?;
                    ExpressionKind::Var { name, index: None }
                }
            }
            _ => {
                return Err(
                    self.error_here(&format!("Expected a term, found {}", token.describe()))
                )
            }
        };

        Ok(Expression { kind, position })
    }

    /// The remainder of `lead(...)` or `lead.name(...)`; the lead
    /// identifier is already consumed.
    fn parse_call_after_lead(
        &mut self,
        lead: String,
        position: Position,
    ) -> CompileResult<SubroutineCall> {
        let (receiver, name) = if self.check_symbol('.') {
            self.advance()?;
            let (name, _) = self.consume_identifier("subroutine name")?;
            (Some(lead), name)
        } else {
            (None, lead)
        };

        self.consume_symbol('(')?;
        let arguments = self.parse_expression_list()?;
        self.consume_symbol(')')?;

        Ok(SubroutineCall {
            receiver,
            name,
            arguments,
            position,
        })
    }

    // endregion
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::{
        common::{
            ast::{
                BinaryOp, Class, ClassVarKind, ExpressionKind, ReturnType, Statement,
                SubroutineKind, Type,
            },
            error::{CompileError, CompileResult},
        },
        fileio::input::SourceFile,
        lexer::Lexer,
        registry::GlobalRegistry,
    };

    fn parse_with(registry: &GlobalRegistry, file: &str, source: &str) -> CompileResult<Class> {
        let source_file = SourceFile::from_content(file, source);
        let lexer = Lexer::new(&source_file)?;
        Parser::new(lexer, registry).parse()
    }

    fn parse(file: &str, source: &str) -> CompileResult<Class> {
        parse_with(&GlobalRegistry::new(), file, source)
    }

    fn syntax_message(result: CompileResult<Class>) -> String {
        match result {
            Err(CompileError::Syntax(diagnostic)) => diagnostic.message,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_class_shape() {
        let class = parse(
            "Point.jack",
            "class Point {
                field int x, y;
                static int count;

                constructor Point new(int ax, int ay) {
                    let x = ax;
                    let y = ay;
                    return this;
                }

                method int getX() { return x; }
            }",
        )
        .expect("class should parse");

        assert_eq!(class.name, "Point");
        assert_eq!(class.class_vars.len(), 2);
        assert_eq!(class.class_vars[0].kind, ClassVarKind::Field);
        assert_eq!(class.class_vars[0].names, vec!["x", "y"]);
        assert_eq!(class.class_vars[1].kind, ClassVarKind::Static);

        assert_eq!(class.subroutines.len(), 2);
        assert_eq!(class.subroutines[0].kind, SubroutineKind::Constructor);
        assert_eq!(class.subroutines[0].parameters.len(), 2);
        assert_eq!(class.subroutines[1].kind, SubroutineKind::Method);
        assert_eq!(class.subroutines[1].return_type, ReturnType::Of(Type::Int));
    }

    #[test]
    fn test_subroutines_are_registered() {
        let registry = GlobalRegistry::new();
        parse_with(
            &registry,
            "Main.jack",
            "class Main {
                function void main() { return; }
                function int helper(int a, boolean b) { return a; }
            }",
        )
        .expect("class should parse");

        assert!(registry.class_exists("Main"));

        let main = registry
            .get_signature("Main", "main")
            .expect("main should be registered");
        assert!(main.is_static);
        assert_eq!(main.return_type, ReturnType::Void);

        let helper = registry
            .get_signature("Main", "helper")
            .expect("helper should be registered");
        assert_eq!(helper.parameters, vec![Type::Int, Type::Boolean]);
    }

    #[test]
    fn test_expressions_fold_left_without_precedence() {
        let class = parse(
            "Main.jack",
            "class Main {
                function int main() { return 1 + 2 * 3; }
            }",
        )
        .expect("class should parse");

        let Statement::Return(ret) = &class.subroutines[0].statements[0] else {
            panic!("expected a return statement");
        };
        let value = ret.value.as_ref().expect("return should carry a value");

        // (1 + 2) * 3, never 1 + (2 * 3)
        let ExpressionKind::Binary { op, left, .. } = &value.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(
            left.kind,
            ExpressionKind::Binary { op: BinaryOp::Add, .. }
        ));
    }

    #[test]
    fn test_term_lookahead_distinguishes_var_index_call() {
        let class = parse(
            "Main.jack",
            "class Main {
                function int main() { return a + a[1] + a.size() + Main.zero(); }
            }",
        )
        .expect("class should parse");

        let Statement::Return(ret) = &class.subroutines[0].statements[0] else {
            panic!("expected a return statement");
        };
        // leftmost leaf of the fold is the plain variable
        let mut node = ret.value.as_ref().expect("value");
        let mut leaves = Vec::new();
        loop {
            match &node.kind {
                ExpressionKind::Binary { left, right, .. } => {
                    leaves.push(&right.kind);
                    node = left.as_ref();
                }
                other => {
                    leaves.push(other);
                    break;
                }
            }
        }
        leaves.reverse();

        assert!(matches!(leaves[0], ExpressionKind::Var { index: None, .. }));
        assert!(matches!(leaves[1], ExpressionKind::Var { index: Some(_), .. }));
        assert!(
            matches!(leaves[2], ExpressionKind::Call(call) if call.receiver.as_deref() == Some("a"))
        );
        assert!(
            matches!(leaves[3], ExpressionKind::Call(call) if call.receiver.as_deref() == Some("Main"))
        );
    }

    #[test]
    fn test_class_name_must_match_file_name() {
        let message = syntax_message(parse(
            "Main.jack",
            "class Game { function void main() { return; } }",
        ));

        assert_eq!(message, "Class name 'Game' does not match file name 'Main'");
    }

    #[test]
    fn test_extra_tokens_after_class_body() {
        let message = syntax_message(parse("Main.jack", "class Main { } class"));

        assert_eq!(message, "extra tokens after class body");
    }

    #[test]
    fn test_missing_comma_hint() {
        let message = syntax_message(parse(
            "Main.jack",
            "class Main { field int a b; }",
        ));

        assert_eq!(message, "Missing ','");
    }

    #[test]
    fn test_missing_semicolon_hint() {
        let message = syntax_message(parse(
            "Main.jack",
            "class Main { function void main() { let a = 1 return; } }",
        ));

        assert_eq!(message, "Missing ';'");
    }

    #[test]
    fn test_missing_paren_before_brace_hint() {
        let message = syntax_message(parse(
            "Main.jack",
            "class Main { function void main() { if (true { return; } } }",
        ));

        assert_eq!(message, "Missing ')' before opening brace");
    }

    #[test]
    fn test_forgotten_array_bracket_hint() {
        let message = syntax_message(parse(
            "Main.jack",
            "class Main { function void main() { let a i = 1; } }",
        ));

        assert_eq!(message, "perhaps you forgot a '[' for an array?");
    }

    #[test]
    fn test_duplicate_subroutine_is_semantic() {
        let result = parse(
            "Main.jack",
            "class Main {
                function void main() { return; }
                function int main() { return 1; }
            }",
        );

        let Err(CompileError::Semantic(diagnostic)) = result else {
            panic!("expected a semantic error");
        };
        assert!(diagnostic
            .message
            .starts_with("Subroutine 'main' is already defined in class 'Main'"));
    }

    #[test]
    fn test_duplicate_class_is_semantic() {
        let registry = GlobalRegistry::new();
        parse_with(&registry, "Main.jack", "class Main { }").expect("first parse");

        let result = parse_with(&registry, "Main.jack", "class Main { }");
        let Err(CompileError::Semantic(diagnostic)) = result else {
            panic!("expected a semantic error");
        };
        assert_eq!(diagnostic.message, "Class 'Main' is already defined");
    }

    #[test]
    fn test_empty_blocks_and_lists_are_legal() {
        let class = parse(
            "Main.jack",
            "class Main {
                function void main() {
                    if (true) { } else { }
                    while (false) { }
                    do Main.noop();
                    return;
                }
                function void noop() { return; }
            }",
        )
        .expect("class should parse");

        assert_eq!(class.subroutines[0].parameters.len(), 0);
        let Statement::Do(do_statement) = &class.subroutines[0].statements[2] else {
            panic!("expected a do statement");
        };
        assert!(do_statement.call.arguments.is_empty());
    }
}
