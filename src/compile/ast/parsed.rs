use crate::compile::ast::SourcePos;

#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<FunctionDecl>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeTag>,
    pub body: Block,
    pub span: SourcePos,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeTag,
}

// Surface spelling of a type, checked during semantic analysis.
pub type TypeTag = String;

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Let {
        name: String,
        mutable: bool,
        ty: Option<TypeTag>,
        init: Option<Expr>,
        span: SourcePos,
    },
    Item(FunctionDecl),
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(String, SourcePos),
    Float(String, SourcePos),
    Str(String, SourcePos),
    Bool(bool, SourcePos),
    Path(String, SourcePos),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Assign(Box<Expr>, Box<Expr>),
    If(Box<Expr>, Block, Option<Box<Expr>>),
    While(Box<Expr>, Block),
    Block(Block),
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Expressions ending in a block may stand as statements without `;`.
    pub fn is_block_like(&self) -> bool {
        matches!(self, Self::If(..) | Self::While(..) | Self::Block(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Neg => "UnNeg",
            Self::Not => "UnNot",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "UnNeg" => Some(Self::Neg),
            "UnNot" => Some(Self::Not),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    //
    LogicalAnd,
    LogicalOr,
    //
    Eq,
    NotEq,
    //
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl BinaryOp {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Add => "BiAdd",
            Self::Sub => "BiSub",
            Self::Mul => "BiMul",
            Self::Div => "BiDiv",
            Self::Mod => "BiRem",
            Self::LogicalAnd => "BiAnd",
            Self::LogicalOr => "BiOr",
            Self::Eq => "BiEq",
            Self::NotEq => "BiNe",
            Self::Less => "BiLt",
            Self::LessEq => "BiLe",
            Self::Greater => "BiGt",
            Self::GreaterEq => "BiGe",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BiAdd" => Some(Self::Add),
            "BiSub" => Some(Self::Sub),
            "BiMul" => Some(Self::Mul),
            "BiDiv" => Some(Self::Div),
            "BiRem" => Some(Self::Mod),
            "BiAnd" => Some(Self::LogicalAnd),
            "BiOr" => Some(Self::LogicalOr),
            "BiEq" => Some(Self::Eq),
            "BiNe" => Some(Self::NotEq),
            "BiLt" => Some(Self::Less),
            "BiLe" => Some(Self::LessEq),
            "BiGt" => Some(Self::Greater),
            "BiGe" => Some(Self::GreaterEq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }
}
