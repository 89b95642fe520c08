//! Textual model of the target VM's instruction stream.
//!
//! A [`VMModule`] is the translation of one class: one instruction block
//! per subroutine, compiled to plain text at the end. Instructions render
//! exactly as the VM expects them (`push constant 7`, `if-goto L0`, ...).

// region: VMModule

#[derive(Debug, Default)]
pub struct VMModule {
    blocks: Vec<VMInstructionBlock>,
}

impl VMModule {
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn add_block(&mut self, block: VMInstructionBlock) {
        self.blocks.push(block);
    }

    /// The final file content, newline-terminated.
    pub fn compile(self) -> String {
        let mut output = self.to_string();
        output.push('\n');
        output
    }
}

impl std::fmt::Display for VMModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.blocks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

// endregion

// region: VMInstructionBlock

#[derive(Debug)]
pub struct VMInstructionBlock {
    instructions: Vec<VMInstruction>,
}

impl VMInstructionBlock {
    #[cfg(test)]
    pub fn compile(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for VMInstructionBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.instructions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl From<Vec<VMInstruction>> for VMInstructionBlock {
    fn from(instructions: Vec<VMInstruction>) -> Self {
        Self { instructions }
    }
}

// endregion

// region: VMInstruction

type Index = usize;
type Count = usize;
type Label = String;
type FunctionName = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VMInstruction {
    Push(Segment, Index),
    Pop(Segment, Index),
    Command(VMCommand),
    Label(Label),
    Goto(Label),
    IfGoto(Label),
    Function(FunctionName, Count),
    Call(FunctionName, Count),
}

impl std::fmt::Display for VMInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(segment, index) => write!(f, "push {segment} {index}"),
            Self::Pop(segment, index) => write!(f, "pop {segment} {index}"),
            Self::Command(command) => write!(f, "{command}"),
            Self::Label(label) => write!(f, "label {label}"),
            Self::Goto(label) => write!(f, "goto {label}"),
            Self::IfGoto(label) => write!(f, "if-goto {label}"),
            Self::Function(name, locals) => write!(f, "function {name} {locals}"),
            Self::Call(name, arguments) => write!(f, "call {name} {arguments}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum VMCommand {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

// endregion

// region: instruction builders

/// Utility function for the `push` VM instruction.
pub fn push(segment: Segment, index: usize) -> VMInstruction {
    VMInstruction::Push(segment, index)
}

/// Utility function for the `pop` VM instruction.
pub fn pop(segment: Segment, index: usize) -> VMInstruction {
    VMInstruction::Pop(segment, index)
}

/// Utility function for the arithmetic/logic VM commands.
pub fn command(command: VMCommand) -> VMInstruction {
    VMInstruction::Command(command)
}

/// Utility function for the `return` VM instruction.
pub fn vm_return() -> VMInstruction {
    VMInstruction::Command(VMCommand::Return)
}

/// Utility function for the `label` VM instruction.
pub fn label<S: Into<String>>(label: S) -> VMInstruction {
    VMInstruction::Label(label.into())
}

/// Utility function for the `goto` VM instruction.
pub fn goto<S: Into<String>>(label: S) -> VMInstruction {
    VMInstruction::Goto(label.into())
}

/// Utility function for the `if-goto` VM instruction.
pub fn if_goto<S: Into<String>>(label: S) -> VMInstruction {
    VMInstruction::IfGoto(label.into())
}

/// Utility function for the `function` VM instruction.
pub fn function<S: Into<String>>(function_name: S, local_count: usize) -> VMInstruction {
    VMInstruction::Function(function_name.into(), local_count)
}

/// Utility function for the `call` VM instruction.
pub fn call<S: Into<String>>(function_name: S, argument_count: usize) -> VMInstruction {
    VMInstruction::Call(function_name.into(), argument_count)
}

// endregion

#[cfg(test)]
mod tests {
    use super::{Segment, VMCommand, VMInstructionBlock};

    #[test]
    fn test_instruction_rendering() {
        let block = VMInstructionBlock::from(vec![
            super::function("Main.main", 2),
            super::push(Segment::Constant, 7),
            super::pop(Segment::Local, 0),
            super::label("L0"),
            super::push(Segment::Local, 0),
            super::command(VMCommand::Not),
            super::if_goto("L1"),
            super::goto("L0"),
            super::label("L1"),
            super::call("Math.multiply", 2),
            super::vm_return(),
        ]);

        let expected = [
            "function Main.main 2",
            "push constant 7",
            "pop local 0",
            "label L0",
            "push local 0",
            "not",
            "if-goto L1",
            "goto L0",
            "label L1",
            "call Math.multiply 2",
            "return",
        ]
        .join("\n");

        assert_eq!(block.compile(), expected);
    }
}
