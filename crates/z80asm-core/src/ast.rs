// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Z80 assembly.
//!
//! A program is a sequence of [`AssemblyLine`]s. Each line carries an
//! optional [`Label`], a [`LineNode`] describing what the line does, the
//! location of its consumed text and an optional trailing comment.
//!
//! # Example
//!
//! ```ignore
//! // Source: loop: djnz loop ; wait
//! AssemblyLine {
//!     label: Some(Label { name: "loop", location: ... }),
//!     node: LineNode::DjnzInstruction {
//!         target: Expression::Symbol { name: "loop", global: false, location: ... },
//!     },
//!     location: ...,
//!     comment: Some("; wait"),
//! }
//! ```

use ecow::EcoString;

use crate::source_analysis::{TokenLocation, TokenType};

/// One parsed source line.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyLine {
    /// The label that starts the line, if any.
    pub label: Option<Label>,
    /// What the line does.
    pub node: LineNode,
    /// Covers the line from its first to its last consumed significant token.
    pub location: TokenLocation,
    /// The trailing comment, delimiters included.
    pub comment: Option<EcoString>,
}

impl AssemblyLine {
    /// Returns the stable type tag of the line's node.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.node.type_name()
    }
}

/// A line label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub name: EcoString,
    pub location: TokenLocation,
}

/// An identifier used by a statement or directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: EcoString,
    pub location: TokenLocation,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, location: TokenLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

// ============================================================================
// Registers and conditions
// ============================================================================

/// A CPU register or register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    I,
    R,
    Xl,
    Xh,
    Yl,
    Yh,
    Bc,
    De,
    Hl,
    Sp,
    Ix,
    Iy,
    Af,
    /// The shadow `af'` pair.
    AfPrime,
}

impl Register {
    /// Maps a register token type to its register.
    #[must_use]
    pub const fn from_token_type(token_type: TokenType) -> Option<Self> {
        Some(match token_type {
            TokenType::A => Self::A,
            TokenType::B => Self::B,
            TokenType::C => Self::C,
            TokenType::D => Self::D,
            TokenType::E => Self::E,
            TokenType::H => Self::H,
            TokenType::L => Self::L,
            TokenType::I => Self::I,
            TokenType::R => Self::R,
            TokenType::Xl => Self::Xl,
            TokenType::Xh => Self::Xh,
            TokenType::Yl => Self::Yl,
            TokenType::Yh => Self::Yh,
            TokenType::Bc => Self::Bc,
            TokenType::De => Self::De,
            TokenType::Hl => Self::Hl,
            TokenType::Sp => Self::Sp,
            TokenType::Ix => Self::Ix,
            TokenType::Iy => Self::Iy,
            TokenType::Af => Self::Af,
            TokenType::AfPrime => Self::AfPrime,
            _ => return None,
        })
    }

    /// Returns the canonical lower-case spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
            Self::H => "h",
            Self::L => "l",
            Self::I => "i",
            Self::R => "r",
            Self::Xl => "xl",
            Self::Xh => "xh",
            Self::Yl => "yl",
            Self::Yh => "yh",
            Self::Bc => "bc",
            Self::De => "de",
            Self::Hl => "hl",
            Self::Sp => "sp",
            Self::Ix => "ix",
            Self::Iy => "iy",
            Self::Af => "af",
            Self::AfPrime => "af'",
        }
    }

    /// Returns the token type this register is lexed as.
    ///
    /// Register classes (8-bit, index halves, pairs) come from
    /// [`traits`](crate::source_analysis::traits) on this token type.
    #[must_use]
    pub const fn token_type(self) -> TokenType {
        match self {
            Self::A => TokenType::A,
            Self::B => TokenType::B,
            Self::C => TokenType::C,
            Self::D => TokenType::D,
            Self::E => TokenType::E,
            Self::H => TokenType::H,
            Self::L => TokenType::L,
            Self::I => TokenType::I,
            Self::R => TokenType::R,
            Self::Xl => TokenType::Xl,
            Self::Xh => TokenType::Xh,
            Self::Yl => TokenType::Yl,
            Self::Yh => TokenType::Yh,
            Self::Bc => TokenType::Bc,
            Self::De => TokenType::De,
            Self::Hl => TokenType::Hl,
            Self::Sp => TokenType::Sp,
            Self::Ix => TokenType::Ix,
            Self::Iy => TokenType::Iy,
            Self::Af => TokenType::Af,
            Self::AfPrime => TokenType::AfPrime,
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A jump, call or return condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Z,
    Nz,
    C,
    Nc,
    Po,
    Pe,
    P,
    M,
}

impl Condition {
    /// Maps a condition token type to its condition. `C` is the register
    /// token, which doubles as the carry condition.
    #[must_use]
    pub const fn from_token_type(token_type: TokenType) -> Option<Self> {
        Some(match token_type {
            TokenType::Z => Self::Z,
            TokenType::Nz => Self::Nz,
            TokenType::C => Self::C,
            TokenType::Nc => Self::Nc,
            TokenType::Po => Self::Po,
            TokenType::Pe => Self::Pe,
            TokenType::P => Self::P,
            TokenType::M => Self::M,
            _ => return None,
        })
    }

    /// Returns the lower-case spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Z => "z",
            Self::Nz => "nz",
            Self::C => "c",
            Self::Nc => "nc",
            Self::Po => "po",
            Self::Pe => "pe",
            Self::P => "p",
            Self::M => "m",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Condition {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

// ============================================================================
// Operands
// ============================================================================

/// Sign of an indexed address offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetSign {
    Plus,
    Minus,
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A register: `a`, `hl`, `ixh`, `af'`...
    Register {
        register: Register,
        location: TokenLocation,
    },

    /// A register pair used as an address: `(bc)`, `(de)`, `(hl)`, `(sp)`.
    RegisterIndirect {
        register: Register,
        location: TokenLocation,
    },

    /// `(ix)`, `(iy+e)`, `(ix-e)`.
    IndexedIndirect {
        register: Register,
        offset: Option<(OffsetSign, Box<Expression>)>,
        location: TokenLocation,
    },

    /// `(c)`
    CPort { location: TokenLocation },

    /// A memory address: `(expr)`.
    MemoryIndirect {
        address: Box<Expression>,
        location: TokenLocation,
    },

    /// An immediate value.
    Expression(Expression),

    /// A `{{name}}` macro parameter standing in for any operand.
    MacroParameter {
        name: EcoString,
        location: TokenLocation,
    },

    /// The `$<none>$` placeholder.
    NoneArg { location: TokenLocation },
}

impl Operand {
    /// Returns the source location of the operand.
    #[must_use]
    pub fn location(&self) -> TokenLocation {
        match self {
            Self::Register { location, .. }
            | Self::RegisterIndirect { location, .. }
            | Self::IndexedIndirect { location, .. }
            | Self::CPort { location }
            | Self::MemoryIndirect { location, .. }
            | Self::MacroParameter { location, .. }
            | Self::NoneArg { location } => *location,
            Self::Expression(expr) => expr.location(),
        }
    }

    /// Returns the register of a plain register operand.
    #[must_use]
    pub fn register(&self) -> Option<Register> {
        match self {
            Self::Register { register, .. } => Some(*register),
            _ => None,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    LogicalNot,
    /// `~`
    BitwiseNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equal,
    CaseInsensitiveEqual,
    NotEqual,
    CaseInsensitiveNotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LeftShift,
    RightShift,
    Min,
    Max,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    /// Maps an operator token type to its operator.
    #[must_use]
    pub const fn from_token_type(token_type: TokenType) -> Option<Self> {
        Some(match token_type {
            TokenType::VerticalBar => Self::BitwiseOr,
            TokenType::UpArrow => Self::BitwiseXor,
            TokenType::Ampersand => Self::BitwiseAnd,
            TokenType::Equal => Self::Equal,
            TokenType::CiEqual => Self::CaseInsensitiveEqual,
            TokenType::NotEqual => Self::NotEqual,
            TokenType::CiNotEqual => Self::CaseInsensitiveNotEqual,
            TokenType::LessThan => Self::LessThan,
            TokenType::LessThanOrEqual => Self::LessThanOrEqual,
            TokenType::GreaterThan => Self::GreaterThan,
            TokenType::GreaterThanOrEqual => Self::GreaterThanOrEqual,
            TokenType::LeftShift => Self::LeftShift,
            TokenType::RightShift => Self::RightShift,
            TokenType::MinOp => Self::Min,
            TokenType::MaxOp => Self::Max,
            TokenType::Plus => Self::Add,
            TokenType::Minus => Self::Subtract,
            TokenType::Multiplication => Self::Multiply,
            TokenType::Divide => Self::Divide,
            TokenType::Modulo => Self::Modulo,
            _ => return None,
        })
    }

    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::BitwiseAnd => "&",
            Self::Equal => "==",
            Self::CaseInsensitiveEqual => "===",
            Self::NotEqual => "!=",
            Self::CaseInsensitiveNotEqual => "!==",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Min => "<?",
            Self::Max => ">?",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// The argument of a built-in function such as `isreg8(a)` or `textof(ld)`.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltInArgument {
    Operand(Operand),
    Condition(Condition),
    /// An instruction mnemonic, lower-cased.
    Mnemonic(EcoString),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Binary, octal, decimal, hexadecimal and character literals.
    IntegerLiteral { value: i64, location: TokenLocation },

    RealLiteral { value: f64, location: TokenLocation },

    /// A string literal with its escapes resolved.
    StringLiteral {
        value: EcoString,
        location: TokenLocation,
    },

    BooleanLiteral { value: bool, location: TokenLocation },

    /// `$`, `.` or `*`
    CurrentAddress { location: TokenLocation },

    /// `$cnt` or `.cnt`
    CurrentCounter { location: TokenLocation },

    /// A symbol reference; `global` is set for the `::name` form.
    Symbol {
        name: EcoString,
        global: bool,
        location: TokenLocation,
    },

    /// `name(args)`
    FunctionInvocation {
        name: EcoString,
        arguments: Vec<Expression>,
        location: TokenLocation,
    },

    /// `isreg8(a)`, `textof(ld)`...; `function` is lower-cased.
    BuiltInFunctionInvocation {
        function: EcoString,
        argument: Box<BuiltInArgument>,
        location: TokenLocation,
    },

    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
        location: TokenLocation,
    },

    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        location: TokenLocation,
    },

    /// `condition ? consequent : alternate`
    Conditional {
        condition: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
        location: TokenLocation,
    },

    /// `(expr)` or `[expr]`
    Parenthesized {
        inner: Box<Expression>,
        location: TokenLocation,
    },

    /// `{{name}}`
    MacroParameter {
        name: EcoString,
        location: TokenLocation,
    },
}

impl Expression {
    /// Returns the source location of the expression.
    #[must_use]
    pub fn location(&self) -> TokenLocation {
        match self {
            Self::IntegerLiteral { location, .. }
            | Self::RealLiteral { location, .. }
            | Self::StringLiteral { location, .. }
            | Self::BooleanLiteral { location, .. }
            | Self::CurrentAddress { location }
            | Self::CurrentCounter { location }
            | Self::Symbol { location, .. }
            | Self::FunctionInvocation { location, .. }
            | Self::BuiltInFunctionInvocation { location, .. }
            | Self::Unary { location, .. }
            | Self::Binary { location, .. }
            | Self::Conditional { location, .. }
            | Self::Parenthesized { location, .. }
            | Self::MacroParameter { location, .. } => *location,
        }
    }

    /// Returns the stable type tag of the expression.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::IntegerLiteral { .. } => "IntegerLiteral",
            Self::RealLiteral { .. } => "RealLiteral",
            Self::StringLiteral { .. } => "StringLiteral",
            Self::BooleanLiteral { .. } => "BooleanLiteral",
            Self::CurrentAddress { .. } => "CurrentAddress",
            Self::CurrentCounter { .. } => "CurrentCounter",
            Self::Symbol { .. } => "Symbol",
            Self::FunctionInvocation { .. } => "FunctionInvocation",
            Self::BuiltInFunctionInvocation { .. } => "BuiltInFunctionInvocation",
            Self::Unary { .. } => "UnaryExpression",
            Self::Binary { .. } => "BinaryExpression",
            Self::Conditional { .. } => "ConditionalExpression",
            Self::Parenthesized { .. } => "ParenthesizedExpression",
            Self::MacroParameter { .. } => "MacroParameter",
        }
    }
}

// ============================================================================
// Line nodes
// ============================================================================

macro_rules! line_nodes {
    ($($(#[$meta:meta])* $name:ident $({ $($field:ident : $ty:ty),* $(,)? })?,)*) => {
        /// What an assembly line does.
        ///
        /// Variant names double as the stable type tags returned by
        /// [`LineNode::type_name`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum LineNode {
            $($(#[$meta])* $name $({ $($field: $ty),* })?,)*
        }

        impl LineNode {
            /// Returns the stable type tag of this node.
            #[must_use]
            pub const fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$name { .. } => stringify!($name),)*
                }
            }
        }
    };
}

line_nodes! {
    /// A line holding only a label.
    LabelOnlyLine,
    /// `name(args)`: a macro or structure invocation.
    MacroOrStructInvocation { name: EcoString, arguments: Vec<Operand> },

    // === Instructions ===
    /// An operand-less instruction, or a Next barrel shift (`bsla de,b`).
    SimpleZ80Instruction { mnemonic: EcoString },
    DjnzInstruction { target: Expression },
    RstInstruction { target: Expression },
    ImInstruction { mode: Expression },
    JrInstruction { condition: Option<Condition>, target: Expression },
    /// `target` is an expression operand or one of `(hl)`, `(ix)`, `(iy)`, `(c)`.
    JpInstruction { condition: Option<Condition>, target: Operand },
    CallInstruction { condition: Option<Condition>, target: Expression },
    RetInstruction { condition: Option<Condition> },
    TestInstruction { expr: Expression },
    /// `value` is `None` when the source is the `a` register.
    NextRegInstruction { register: Expression, value: Option<Expression> },
    MirrorInstruction,
    MulInstruction,
    LdInstruction { destination: Operand, source: Operand },
    IncInstruction { operand: Operand },
    DecInstruction { operand: Operand },
    ExInstruction { first: Operand, second: Operand },
    /// `add adc sub sbc and xor or cp`
    AluInstruction { mnemonic: EcoString, operands: Vec<Operand> },
    /// `push pop`
    StackInstruction { mnemonic: EcoString, operand: Operand },
    /// `rlc rrc rl rr sla sra sll srl`
    ShiftRotateInstruction { mnemonic: EcoString, operands: Vec<Operand> },
    /// `bit res set`
    BitInstruction { mnemonic: EcoString, operands: Vec<Operand> },
    /// `in out`
    IoInstruction { mnemonic: EcoString, operands: Vec<Operand> },

    // === Pragmas ===
    OrgPragma { address: Expression },
    XorgPragma { address: Expression },
    EntPragma { address: Expression },
    XentPragma { address: Expression },
    DispPragma { offset: Expression },
    EquPragma { value: Expression },
    /// `.var`, `=` and `:=`
    VarPragma { value: Expression },
    DefbPragma { values: Vec<Expression> },
    DefwPragma { values: Vec<Expression> },
    DefmPragma { message: Expression },
    DefnPragma { message: Expression },
    DefhPragma { bytes: Expression },
    DefgxPragma { pattern: Expression },
    DefgPragma { pattern: Expression },
    DefcPragma { message: Expression },
    DefsPragma { count: Expression, fill: Option<Expression> },
    SkipPragma { address: Expression, fill: Option<Expression> },
    FillbPragma { count: Expression, value: Expression },
    FillwPragma { count: Expression, value: Expression },
    ExternPragma,
    ZxBasicPragma,
    ModelPragma { model: EcoString },
    AlignPragma { alignment: Option<Expression> },
    RndSeedPragma { seed: Option<Expression> },
    TracePragma { values: Vec<Expression> },
    TraceHexPragma { values: Vec<Expression> },
    ErrorPragma { message: Expression },
    IncludeBinPragma { filename: Expression, offset: Option<Expression>, length: Option<Expression> },
    CompareBinPragma { filename: Expression, offset: Option<Expression>, length: Option<Expression> },
    BankPragma { bank: Expression, offset: Option<Expression> },
    InjectOptPragma { options: Vec<Identifier> },

    // === Statements ===
    MacroStatement { parameters: Vec<Identifier> },
    MacroEndStatement,
    ProcStatement,
    ProcEndStatement,
    LoopStatement { count: Expression },
    LoopEndStatement,
    RepeatStatement,
    UntilStatement { condition: Expression },
    WhileStatement { condition: Expression },
    WhileEndStatement,
    IfStatement { condition: Expression },
    IfUsedStatement { symbol: Expression },
    IfNUsedStatement { symbol: Expression },
    ElifStatement { condition: Expression },
    ElseStatement,
    EndIfStatement,
    ForStatement { variable: Identifier, from: Expression, to: Expression, step: Option<Expression> },
    NextStatement,
    BreakStatement,
    ContinueStatement,
    ModuleStatement { name: Option<Identifier> },
    ModuleEndStatement,
    StructStatement,
    StructEndStatement,
    LocalStatement { identifiers: Vec<Identifier> },

    // === Directives ===
    IfDefDirective { identifier: Identifier },
    IfNDefDirective { identifier: Identifier },
    DefineDirective { identifier: Identifier },
    UndefDirective { identifier: Identifier },
    IfModDirective { identifier: Identifier },
    IfNModDirective { identifier: Identifier },
    EndIfDirective,
    ElseDirective,
    IfDirective { condition: Expression },
    IncludeDirective { filename: EcoString },
    LineDirective { line: Expression, file: Option<EcoString> },
}
