//! Semantic analysis: type checking, scope and kind resolution, call-shape
//! checks, and return-value rules.
//!
//! Analysis is read-only with respect to the registry, which the driver
//! freezes at the parse barrier. Each class yields a master symbol table
//! (its statics and fields) that code generation reuses.

pub mod symbol_table;

use crate::{
    common::{
        ast::{
            BinaryOp, Class, ClassVarKind, DoStatement, Expression, ExpressionKind, IfStatement,
            KeywordConst, LetStatement, ReturnStatement, ReturnType, Statement, SubroutineCall,
            SubroutineDec, SubroutineKind, Type, UnaryOp, WhileStatement,
        },
        error::{CompileError, CompileResult, Diagnostic},
        Position,
    },
    registry::GlobalRegistry,
};
use symbol_table::{Redefinition, SymbolKind, SymbolTable};

/// Static type of an expression. Extends the declarable types with the
/// two analysis-only values: `null` (matches any type) and `void` (the
/// "type" of a void call used in value position, always a mismatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprType {
    Int,
    Char,
    Boolean,
    Void,
    Null,
    Class(String),
}

impl ExprType {
    fn is_boolean(&self) -> bool {
        *self == Self::Boolean
    }
}

impl From<&Type> for ExprType {
    fn from(declared: &Type) -> Self {
        match declared {
            Type::Int => Self::Int,
            Type::Char => Self::Char,
            Type::Boolean => Self::Boolean,
            Type::Class(name) => Self::Class(name.clone()),
        }
    }
}

impl From<&ReturnType> for ExprType {
    fn from(declared: &ReturnType) -> Self {
        match declared {
            ReturnType::Void => Self::Void,
            ReturnType::Of(inner) => inner.into(),
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Char => write!(f, "char"),
            Self::Boolean => write!(f, "boolean"),
            Self::Void => write!(f, "void"),
            Self::Null => write!(f, "null"),
            Self::Class(name) => write!(f, "{name}"),
        }
    }
}

pub struct SemanticAnalyser<'r> {
    registry: &'r GlobalRegistry,
    file: String,
    class_name: String,
    subroutine_kind: SubroutineKind,
    return_type: ReturnType,
}

impl<'r> SemanticAnalyser<'r> {
    pub fn new(registry: &'r GlobalRegistry, file: impl Into<String>) -> Self {
        Self {
            registry,
            file: file.into(),
            class_name: String::new(),
            subroutine_kind: SubroutineKind::Function,
            return_type: ReturnType::Void,
        }
    }

    fn error<T>(&self, position: Position, message: impl Into<String>) -> CompileResult<T> {
        Err(CompileError::Semantic(Diagnostic::new(
            &self.file, position, message,
        )))
    }

    fn define(
        &self,
        table: &mut SymbolTable,
        name: &str,
        symbol_type: Type,
        kind: SymbolKind,
        position: Position,
    ) -> CompileResult<()> {
        table
            .define(name, symbol_type, kind, position)
            .map_err(|redefinition| self.redefinition_error(&redefinition, position))
    }

    fn redefinition_error(&self, redefinition: &Redefinition, position: Position) -> CompileError {
        CompileError::Semantic(Diagnostic::new(
            &self.file,
            position,
            format!(
                "Variable '{}' is already defined as a {} at [{}]",
                redefinition.name, redefinition.existing_kind, redefinition.existing_position
            ),
        ))
    }

    /// Equal types match; `null` matches anything; `int` is accepted
    /// where `char` is expected.
    fn check_type_match(
        &self,
        expected: &ExprType,
        actual: &ExprType,
        position: Position,
    ) -> CompileResult<()> {
        if expected == actual
            || *actual == ExprType::Null
            || (*expected == ExprType::Char && *actual == ExprType::Int)
        {
            return Ok(());
        }
        self.error(
            position,
            format!("Type Mismatch. Expected '{expected}', Got '{actual}'"),
        )
    }

    fn check_declared_type(&self, declared: &Type, position: Position) -> CompileResult<()> {
        if self.registry.type_exists(declared) {
            Ok(())
        } else {
            self.error(position, format!("Unknown type '{declared}'"))
        }
    }

    /// Validate a whole class; returns the class-level master symbol
    /// table reused by code generation.
    pub fn analyse_class(&mut self, class: &Class) -> CompileResult<SymbolTable> {
        self.class_name.clone_from(&class.name);

        let mut master_table = SymbolTable::new();

        for var in &class.class_vars {
            let kind = match var.kind {
                ClassVarKind::Static => SymbolKind::Static,
                ClassVarKind::Field => SymbolKind::Field,
            };
            self.check_declared_type(&var.var_type, var.position)?;
            for name in &var.names {
                self.define(&mut master_table, name, var.var_type.clone(), kind, var.position)?;
            }
        }

        for subroutine in &class.subroutines {
            self.analyse_subroutine(subroutine, &master_table)?;
        }

        Ok(master_table)
    }

    fn analyse_subroutine(
        &mut self,
        subroutine: &SubroutineDec,
        master_table: &SymbolTable,
    ) -> CompileResult<()> {
        self.subroutine_kind = subroutine.kind;
        self.return_type = subroutine.return_type.clone();

        if let ReturnType::Of(declared) = &subroutine.return_type {
            self.check_declared_type(declared, subroutine.position)?;
        }

        // class-scope symbols stay visible; the subroutine tier starts fresh
        let mut table = master_table.clone();
        table.start_subroutine();

        // methods receive the instance as a synthetic argument 0
        if subroutine.kind == SubroutineKind::Method {
            self.define(
                &mut table,
                "this",
                Type::Class(self.class_name.clone()),
                SymbolKind::Argument,
                subroutine.position,
            )?;
        }

        for parameter in &subroutine.parameters {
            if !self.registry.type_exists(&parameter.param_type) {
                return self.error(
                    subroutine.position,
                    format!(
                        "Unknown type '{}' for argument '{}'",
                        parameter.param_type, parameter.name
                    ),
                );
            }
            self.define(
                &mut table,
                &parameter.name,
                parameter.param_type.clone(),
                SymbolKind::Argument,
                subroutine.position,
            )?;
        }

        for var_dec in &subroutine.locals {
            self.check_declared_type(&var_dec.var_type, var_dec.position)?;
            for name in &var_dec.names {
                self.define(
                    &mut table,
                    name,
                    var_dec.var_type.clone(),
                    SymbolKind::Local,
                    var_dec.position,
                )?;
            }
        }

        self.analyse_statements(&subroutine.statements, &table)
    }

    fn analyse_statements(
        &self,
        statements: &[Statement],
        table: &SymbolTable,
    ) -> CompileResult<()> {
        for statement in statements {
            match statement {
                Statement::Let(inner) => self.analyse_let(inner, table)?,
                Statement::If(inner) => self.analyse_if(inner, table)?,
                Statement::While(inner) => self.analyse_while(inner, table)?,
                Statement::Do(inner) => self.analyse_do(inner, table)?,
                Statement::Return(inner) => self.analyse_return(inner, table)?,
            }
        }
        Ok(())
    }

    fn analyse_let(&self, statement: &LetStatement, table: &SymbolTable) -> CompileResult<()> {
        let Some(symbol) = table.lookup(&statement.target) else {
            return self.error(
                statement.position,
                format!("Undefined variable '{}'", statement.target),
            );
        };
        let target_type = symbol.symbol_type.clone();

        if let Some(index) = &statement.index {
            if !target_type.is_array() {
                return self.error(
                    statement.position,
                    format!("Cannot index non-array variable '{}'", statement.target),
                );
            }
            let index_type = self.analyse_expression(index, table)?;
            if index_type != ExprType::Int {
                return self.error(index.position, "Array index must be an integer.");
            }
        }

        let value_type = self.analyse_expression(&statement.value, table)?;

        // element writes are unchecked: Array is untyped at the element level
        if statement.index.is_none() {
            self.check_type_match(&(&target_type).into(), &value_type, statement.value.position)?;
        }
        Ok(())
    }

    fn analyse_if(&self, statement: &IfStatement, table: &SymbolTable) -> CompileResult<()> {
        let condition_type = self.analyse_expression(&statement.condition, table)?;
        if !condition_type.is_boolean() {
            return self.error(statement.condition.position, "If condition must be boolean.");
        }
        self.analyse_statements(&statement.then_branch, table)?;
        self.analyse_statements(&statement.else_branch, table)
    }

    fn analyse_while(&self, statement: &WhileStatement, table: &SymbolTable) -> CompileResult<()> {
        let condition_type = self.analyse_expression(&statement.condition, table)?;
        if !condition_type.is_boolean() {
            return self.error(
                statement.condition.position,
                "While condition must be boolean.",
            );
        }
        self.analyse_statements(&statement.body, table)
    }

    fn analyse_do(&self, statement: &DoStatement, table: &SymbolTable) -> CompileResult<()> {
        // the call's value, if any, is discarded
        self.analyse_call(&statement.call, table)?;
        Ok(())
    }

    fn analyse_return(&self, statement: &ReturnStatement, table: &SymbolTable) -> CompileResult<()> {
        if self.subroutine_kind == SubroutineKind::Constructor {
            match &statement.value {
                Some(expression)
                    if matches!(
                        expression.kind,
                        ExpressionKind::KeywordConst(KeywordConst::This)
                    ) => {}
                Some(expression) => {
                    return self.error(expression.position, "Constructor must return 'this'.")
                }
                None => return self.error(statement.position, "Constructor must return 'this'."),
            }
        }

        match (&self.return_type, &statement.value) {
            (ReturnType::Void, Some(expression)) => {
                self.error(expression.position, "Void function cannot return a value.")
            }
            (ReturnType::Void, None) => Ok(()),
            (ReturnType::Of(declared), None) => self.error(
                statement.position,
                format!("Function must return a value of type '{declared}'."),
            ),
            (ReturnType::Of(declared), Some(expression)) => {
                let actual = self.analyse_expression(expression, table)?;
                self.check_type_match(&declared.into(), &actual, expression.position)
            }
        }
    }

    fn analyse_expression(
        &self,
        expression: &Expression,
        table: &SymbolTable,
    ) -> CompileResult<ExprType> {
        match &expression.kind {
            ExpressionKind::IntConst(_) => Ok(ExprType::Int),
            ExpressionKind::StringConst(_) => Ok(ExprType::Class("String".to_string())),
            ExpressionKind::KeywordConst(keyword) => Ok(match keyword {
                KeywordConst::True | KeywordConst::False => ExprType::Boolean,
                KeywordConst::Null => ExprType::Null,
                KeywordConst::This => ExprType::Class(self.class_name.clone()),
            }),
            ExpressionKind::Var { name, index } => {
                let Some(symbol) = table.lookup(name) else {
                    return self.error(expression.position, format!("Undefined variable '{name}'"));
                };

                let Some(index) = index else {
                    return Ok((&symbol.symbol_type).into());
                };

                if !symbol.symbol_type.is_array() {
                    return self.error(
                        expression.position,
                        format!("Cannot index non-array variable '{name}'"),
                    );
                }
                if self.analyse_expression(index, table)? != ExprType::Int {
                    return self.error(index.position, "Array index must be an integer.");
                }
                // element reads are ints; Array is an untyped word store
                Ok(ExprType::Int)
            }
            ExpressionKind::Binary { op, left, right } => {
                let left_type = self.analyse_expression(left, table)?;
                let right_type = self.analyse_expression(right, table)?;

                match op {
                    BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                        self.check_type_match(&ExprType::Int, &left_type, left.position)?;
                        self.check_type_match(&ExprType::Int, &right_type, right.position)?;
                        Ok(ExprType::Int)
                    }
                    BinaryOp::Lt | BinaryOp::Gt => {
                        self.check_type_match(&ExprType::Int, &left_type, left.position)?;
                        self.check_type_match(&ExprType::Int, &right_type, right.position)?;
                        Ok(ExprType::Boolean)
                    }
                    BinaryOp::And | BinaryOp::Or => {
                        self.check_type_match(&ExprType::Boolean, &left_type, left.position)?;
                        self.check_type_match(&ExprType::Boolean, &right_type, right.position)?;
                        Ok(ExprType::Boolean)
                    }
                    BinaryOp::Eq => {
                        // operands must agree, unless either side is null
                        if left_type != right_type
                            && left_type != ExprType::Null
                            && right_type != ExprType::Null
                        {
                            return self.error(
                                expression.position,
                                format!("Comparison type mismatch: {left_type} vs {right_type}"),
                            );
                        }
                        Ok(ExprType::Boolean)
                    }
                }
            }
            ExpressionKind::Unary { op, operand } => {
                let operand_type = self.analyse_expression(operand, table)?;
                match op {
                    UnaryOp::Neg => {
                        self.check_type_match(&ExprType::Int, &operand_type, operand.position)?;
                        Ok(ExprType::Int)
                    }
                    UnaryOp::Not => {
                        self.check_type_match(&ExprType::Boolean, &operand_type, operand.position)?;
                        Ok(ExprType::Boolean)
                    }
                }
            }
            ExpressionKind::Call(call) => self.analyse_call(call, table),
        }
    }

    /// Resolve the target of a call, check its shape (static vs. method),
    /// arity and argument types; yields the signature's return type.
    fn analyse_call(&self, call: &SubroutineCall, table: &SymbolTable) -> CompileResult<ExprType> {
        let (signature, is_method_call) = match &call.receiver {
            // implicit receiver: the target lives in the current class
            None => {
                let Some(signature) = self.registry.get_signature(&self.class_name, &call.name)
                else {
                    return self.error(
                        call.position,
                        format!(
                            "Method '{}' not found in class '{}'",
                            call.name, self.class_name
                        ),
                    );
                };
                if self.subroutine_kind == SubroutineKind::Function && !signature.is_static {
                    return self.error(
                        call.position,
                        format!(
                            "Cannot call method '{}' from static function without object.",
                            call.name
                        ),
                    );
                }
                let is_method_call = !signature.is_static;
                (signature, is_method_call)
            }
            Some(receiver) => {
                let (target_class, is_method_call) = if let Some(symbol) = table.lookup(receiver) {
                    // a known variable: method call on its static type
                    (symbol.symbol_type.to_string(), true)
                } else if self.registry.class_exists(receiver) {
                    (receiver.clone(), false)
                } else {
                    return self.error(call.position, format!("Undefined class '{receiver}'"));
                };

                let Some(signature) = self.registry.get_signature(&target_class, &call.name) else {
                    return self.error(
                        call.position,
                        format!(
                            "Method '{}' not found in class '{target_class}'",
                            call.name
                        ),
                    );
                };
                (signature, is_method_call)
            }
        };

        if is_method_call && signature.is_static {
            return self.error(
                call.position,
                format!(
                    "Cannot call static function '{}' on an object instance.",
                    call.name
                ),
            );
        }
        if !is_method_call && !signature.is_static {
            return self.error(
                call.position,
                format!("Cannot call method '{}' as a static function.", call.name),
            );
        }

        if call.arguments.len() != signature.parameters.len() {
            return self.error(
                call.position,
                format!(
                    "Argument count mismatch. Expected {}, Got {}",
                    signature.parameters.len(),
                    call.arguments.len()
                ),
            );
        }

        for (argument, parameter) in call.arguments.iter().zip(&signature.parameters) {
            let argument_type = self.analyse_expression(argument, table)?;
            self.check_type_match(&parameter.into(), &argument_type, argument.position)?;
        }

        Ok((&signature.return_type).into())
    }
}
