//! Logic for converting an analysed class (_AST_) to Hack VM instructions.
//!
//! Assumes the semantic analyser has accepted the tree: name resolution
//! cannot fail here except through a compiler defect, which is reported
//! as an internal error rather than a panic.

pub mod vm;

use crate::{
    analyser::symbol_table::{SymbolKind, SymbolTable},
    common::{
        ast::{
            BinaryOp, Class, DoStatement, Expression, ExpressionKind, IfStatement, KeywordConst,
            LetStatement, ReturnStatement, Statement, SubroutineCall, SubroutineDec,
            SubroutineKind, Type, UnaryOp, WhileStatement,
        },
        error::{CompileError, CompileResult, Diagnostic},
        Position,
    },
    registry::GlobalRegistry,
};
use vm::{Segment, VMCommand, VMInstruction};

type FallibleInstructions = CompileResult<Vec<VMInstruction>>;

impl From<SymbolKind> for Segment {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Static => Self::Static,
            SymbolKind::Field => Self::This,
            SymbolKind::Argument => Self::Argument,
            SymbolKind::Local => Self::Local,
        }
    }
}

pub struct CodeGenerator<'r> {
    registry: &'r GlobalRegistry,
    file: String,
    class_name: String,
    symbol_table: SymbolTable,
    label_counter: usize,
}

impl<'r> CodeGenerator<'r> {
    pub fn new(registry: &'r GlobalRegistry, file: impl Into<String>) -> Self {
        Self {
            registry,
            file: file.into(),
            class_name: String::new(),
            symbol_table: SymbolTable::new(),
            label_counter: 0,
        }
    }

    /// Translate an analysed class into its textual VM module.
    pub fn compile_class(mut self, class: &Class, master_table: &SymbolTable) -> CompileResult<String> {
        self.class_name.clone_from(&class.name);
        self.symbol_table = master_table.clone();

        let mut module = vm::VMModule::new();
        for subroutine in &class.subroutines {
            module.add_block(self.compile_subroutine(subroutine)?.into());
        }
        Ok(module.compile())
    }

    fn internal_error(&self, position: Position, message: &str) -> CompileError {
        CompileError::Semantic(Diagnostic::new(
            &self.file,
            position,
            format!("Internal Compiler Error: {message}"),
        ))
    }

    /// Labels are unique per class compilation, keeping parallel codegen
    /// deterministic.
    fn unique_label(&mut self) -> String {
        let label = format!("L{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn define(
        &mut self,
        name: &str,
        symbol_type: Type,
        kind: SymbolKind,
        position: Position,
    ) -> CompileResult<()> {
        self.symbol_table
            .define(name, symbol_type, kind, position)
            .map_err(|_| {
                self.internal_error(position, &format!("symbol '{name}' defined twice after analysis"))
            })
    }

    fn resolve(&self, name: &str, position: Position) -> CompileResult<(Segment, usize)> {
        let (Some(kind), Some(index)) = (
            self.symbol_table.kind_of(name),
            self.symbol_table.index_of(name),
        ) else {
            return Err(
                self.internal_error(position, &format!("unresolved symbol '{name}' after analysis"))
            );
        };
        Ok((kind.into(), index))
    }

    fn compile_subroutine(&mut self, subroutine: &SubroutineDec) -> FallibleInstructions {
        self.symbol_table.start_subroutine();

        if subroutine.kind == SubroutineKind::Method {
            self.define(
                "this",
                Type::Class(self.class_name.clone()),
                SymbolKind::Argument,
                subroutine.position,
            )?;
        }
        for parameter in &subroutine.parameters {
            self.define(
                &parameter.name,
                parameter.param_type.clone(),
                SymbolKind::Argument,
                subroutine.position,
            )?;
        }
        for var_dec in &subroutine.locals {
            for name in &var_dec.names {
                self.define(name, var_dec.var_type.clone(), SymbolKind::Local, var_dec.position)?;
            }
        }

        let mut instructions = vec![vm::function(
            format!("{}.{}", self.class_name, subroutine.name),
            self.symbol_table.var_count(SymbolKind::Local),
        )];

        match subroutine.kind {
            SubroutineKind::Constructor => {
                // one word per field, `this` set to the fresh block
                instructions.extend([
                    vm::push(Segment::Constant, self.symbol_table.var_count(SymbolKind::Field)),
                    vm::call("Memory.alloc", 1),
                    vm::pop(Segment::Pointer, 0),
                ]);
            }
            SubroutineKind::Method => {
                instructions.extend([
                    vm::push(Segment::Argument, 0),
                    vm::pop(Segment::Pointer, 0),
                ]);
            }
            SubroutineKind::Function => {}
        }

        instructions.extend(self.compile_statements(&subroutine.statements)?);
        Ok(instructions)
    }

    fn compile_statements(&mut self, statements: &[Statement]) -> FallibleInstructions {
        let mut instructions = Vec::new();
        for statement in statements {
            instructions.extend(match statement {
                Statement::Let(inner) => self.compile_let(inner)?,
                Statement::If(inner) => self.compile_if(inner)?,
                Statement::While(inner) => self.compile_while(inner)?,
                Statement::Do(inner) => self.compile_do(inner)?,
                Statement::Return(inner) => self.compile_return(inner)?,
            });
        }
        Ok(instructions)
    }

    fn compile_let(&mut self, statement: &LetStatement) -> FallibleInstructions {
        let (segment, index) = self.resolve(&statement.target, statement.position)?;

        let Some(index_expression) = &statement.index else {
            return Ok([
                self.compile_expression(&statement.value)?,
                vec![vm::pop(segment, index)],
            ]
            .concat());
        };

        // the value expression may itself touch arrays, so the target
        // address is computed first and stashed across its evaluation
        Ok([
            vec![vm::push(segment, index)],
            self.compile_expression(index_expression)?,
            vec![vm::command(VMCommand::Add)],
            self.compile_expression(&statement.value)?,
            vec![
                vm::pop(Segment::Temp, 0),
                vm::pop(Segment::Pointer, 1),
                vm::push(Segment::Temp, 0),
                vm::pop(Segment::That, 0),
            ],
        ]
        .concat())
    }

    fn compile_if(&mut self, statement: &IfStatement) -> FallibleInstructions {
        let else_label = self.unique_label();
        let end_label = self.unique_label();

        Ok([
            self.compile_expression(&statement.condition)?,
            vec![vm::command(VMCommand::Not), vm::if_goto(&else_label)],
            self.compile_statements(&statement.then_branch)?,
            vec![vm::goto(&end_label), vm::label(&else_label)],
            self.compile_statements(&statement.else_branch)?,
            vec![vm::label(&end_label)],
        ]
        .concat())
    }

    fn compile_while(&mut self, statement: &WhileStatement) -> FallibleInstructions {
        let head_label = self.unique_label();
        let end_label = self.unique_label();

        Ok([
            vec![vm::label(&head_label)],
            self.compile_expression(&statement.condition)?,
            vec![vm::command(VMCommand::Not), vm::if_goto(&end_label)],
            self.compile_statements(&statement.body)?,
            vec![vm::goto(&head_label), vm::label(&end_label)],
        ]
        .concat())
    }

    fn compile_do(&mut self, statement: &DoStatement) -> FallibleInstructions {
        // the callee's value is discarded to keep the stack clean
        Ok([
            self.compile_call(&statement.call)?,
            vec![vm::pop(Segment::Temp, 0)],
        ]
        .concat())
    }

    fn compile_return(&mut self, statement: &ReturnStatement) -> FallibleInstructions {
        let value = match &statement.value {
            Some(expression) => self.compile_expression(expression)?,
            // void subroutines still return a word
            None => vec![vm::push(Segment::Constant, 0)],
        };
        Ok([value, vec![vm::vm_return()]].concat())
    }

    fn compile_expression(&mut self, expression: &Expression) -> FallibleInstructions {
        match &expression.kind {
            ExpressionKind::IntConst(value) => {
                Ok(vec![vm::push(Segment::Constant, usize::from(*value))])
            }
            ExpressionKind::StringConst(text) => Ok(Self::compile_string_constant(text)),
            ExpressionKind::KeywordConst(keyword) => Ok(Self::compile_keyword_constant(*keyword)),
            ExpressionKind::Var { name, index } => {
                let (segment, slot) = self.resolve(name, expression.position)?;

                let Some(index_expression) = index else {
                    return Ok(vec![vm::push(segment, slot)]);
                };

                Ok([
                    vec![vm::push(segment, slot)],
                    self.compile_expression(index_expression)?,
                    vec![
                        vm::command(VMCommand::Add),
                        vm::pop(Segment::Pointer, 1),
                        vm::push(Segment::That, 0),
                    ],
                ]
                .concat())
            }
            ExpressionKind::Call(call) => self.compile_call(call),
            ExpressionKind::Binary { op, left, right } => {
                // strict left-to-right; no precedence re-ordering
                Ok([
                    self.compile_expression(left)?,
                    self.compile_expression(right)?,
                    Self::compile_binary_op(*op),
                ]
                .concat())
            }
            ExpressionKind::Unary { op, operand } => {
                let operator = match op {
                    UnaryOp::Neg => VMCommand::Neg,
                    UnaryOp::Not => VMCommand::Not,
                };
                Ok([self.compile_expression(operand)?, vec![vm::command(operator)]].concat())
            }
        }
    }

    fn compile_binary_op(op: BinaryOp) -> Vec<VMInstruction> {
        match op {
            BinaryOp::Add => vec![vm::command(VMCommand::Add)],
            BinaryOp::Sub => vec![vm::command(VMCommand::Sub)],
            BinaryOp::And => vec![vm::command(VMCommand::And)],
            BinaryOp::Or => vec![vm::command(VMCommand::Or)],
            BinaryOp::Lt => vec![vm::command(VMCommand::Lt)],
            BinaryOp::Gt => vec![vm::command(VMCommand::Gt)],
            BinaryOp::Eq => vec![vm::command(VMCommand::Eq)],
            // no hardware multiply/divide; the OS provides both
            BinaryOp::Mul => vec![vm::call("Math.multiply", 2)],
            BinaryOp::Div => vec![vm::call("Math.divide", 2)],
        }
    }

    fn compile_keyword_constant(keyword: KeywordConst) -> Vec<VMInstruction> {
        match keyword {
            // true is all ones in the target's two's-complement arithmetic
            KeywordConst::True => vec![
                vm::push(Segment::Constant, 1),
                vm::command(VMCommand::Neg),
            ],
            KeywordConst::False | KeywordConst::Null => vec![vm::push(Segment::Constant, 0)],
            KeywordConst::This => vec![vm::push(Segment::Pointer, 0)],
        }
    }

    fn compile_string_constant(text: &str) -> Vec<VMInstruction> {
        let construction = vec![
            vm::push(Segment::Constant, text.len()),
            vm::call("String.new", 1),
        ];

        // appendChar returns the string, keeping the stack valid for the
        // next append
        let population = text
            .bytes()
            .flat_map(|c| {
                [
                    vm::push(Segment::Constant, usize::from(c)),
                    vm::call("String.appendChar", 2),
                ]
            })
            .collect();

        [construction, population].concat()
    }

    fn compile_call(&mut self, call: &SubroutineCall) -> FallibleInstructions {
        let mut instructions = Vec::new();

        let (function_name, mut argument_count) = match &call.receiver {
            None => {
                // implicit receiver: a method target takes `this` as
                // argument 0, a static target takes nothing
                let Some(signature) = self.registry.get_signature(&self.class_name, &call.name)
                else {
                    return Err(self.internal_error(
                        call.position,
                        &format!("signature lookup failed for {}.{}", self.class_name, call.name),
                    ));
                };

                if signature.is_static {
                    (format!("{}.{}", self.class_name, call.name), 0)
                } else {
                    instructions.push(vm::push(Segment::Pointer, 0));
                    (format!("{}.{}", self.class_name, call.name), 1)
                }
            }
            Some(receiver) => {
                if let Some(target_class) = self.symbol_table.type_of(receiver).map(ToString::to_string) {
                    // a variable: push the instance, dispatch on its type
                    let (segment, slot) = self.resolve(receiver, call.position)?;
                    instructions.push(vm::push(segment, slot));
                    (format!("{target_class}.{}", call.name), 1)
                } else {
                    // a class name: plain static call
                    (format!("{receiver}.{}", call.name), 0)
                }
            }
        };

        for argument in &call.arguments {
            instructions.extend(self.compile_expression(argument)?);
            argument_count += 1;
        }

        instructions.push(vm::call(function_name, argument_count));
        Ok(instructions)
    }
}
