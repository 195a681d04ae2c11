//! Grammar decisions made by bounded lookahead
//!
//! Each classifier inspects at most four tokens of a [`TokenSource`] without
//! consuming anything and names the alternative the parser must take. Rule
//! functions never peek on their own to choose between alternatives.

use crate::lexer::{TokenKind, TokenSource};

/// Alternatives of a primary expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryShape {
    /// `( expr )`
    Paren,
    /// `[ ... ]`
    Array,
    /// Number, character, string, `true`, `false` or `null`
    Literal,
    /// `< e1, ..., en >`
    ExBase,
    /// `<< e1, ..., en >>`
    DtBase,
    /// `cast[Type](expr)` or `typeof[Type](expr)`
    SystemCall,
    /// `name(args)`
    RegisteredCall,
    /// `name[args](expr)`
    SpecialCall,
    /// `a.b.Type::name(args)`
    ModuleCall,
    Ident,
    HostCode,
    CommandArg,
    /// `{ expr | conditions }`
    Involving,
    /// Nothing an expression can start with
    Invalid,
}

/// Classify the primary expression starting at the current token
pub fn classify_primary<S: TokenSource>(tokens: &S) -> PrimaryShape {
    let first = tokens.peek(1).kind;
    match first {
        TokenKind::LParen => PrimaryShape::Paren,
        TokenKind::LBracket => PrimaryShape::Array,
        TokenKind::Lt => PrimaryShape::ExBase,
        TokenKind::LtLt => PrimaryShape::DtBase,
        TokenKind::LBrace => PrimaryShape::Involving,
        TokenKind::HostCode => PrimaryShape::HostCode,
        TokenKind::CommandArg => PrimaryShape::CommandArg,
        TokenKind::Cast | TokenKind::Typeof if tokens.peek(2).kind == TokenKind::LBracket => {
            PrimaryShape::SystemCall
        }
        kind if kind.is_literal() => PrimaryShape::Literal,
        TokenKind::Ident => match tokens.peek(2).kind {
            TokenKind::LParen => PrimaryShape::RegisteredCall,
            TokenKind::LBracket => PrimaryShape::SpecialCall,
            TokenKind::ColonColon => PrimaryShape::ModuleCall,
            TokenKind::Dot
                if tokens.peek(3).kind == TokenKind::Ident
                    && matches!(
                        tokens.peek(4).kind,
                        TokenKind::ColonColon | TokenKind::Dot
                    ) =>
            {
                PrimaryShape::ModuleCall
            }
            _ => PrimaryShape::Ident,
        },
        _ => PrimaryShape::Invalid,
    }
}

/// Whether the current identifier is used as an infix named operator
///
/// True when the token after it can begin an operand, so `x = a y = b;`
/// never reads `y` as an operator.
pub(crate) fn is_named_operator<S: TokenSource>(tokens: &S) -> bool {
    tokens.peek(1).kind == TokenKind::Ident && tokens.peek(2).kind.begins_expression()
}

/// Alternatives of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtShape {
    Block,
    If,
    Var,
    Const,
    Break,
    Return,
    /// A lone `;`
    Empty,
    /// `name = expr;`
    Assign,
    /// `name <<- file;`
    InputBind,
    /// `name ->> file;`
    OutputBind,
    /// `expr;`
    Expr,
    Invalid,
}

/// Classify the statement starting at the current token
pub fn classify_statement<S: TokenSource>(tokens: &S) -> StmtShape {
    match tokens.peek(1).kind {
        TokenKind::LBrace => StmtShape::Block,
        TokenKind::Sif => StmtShape::If,
        TokenKind::Var => StmtShape::Var,
        TokenKind::Const => StmtShape::Const,
        TokenKind::Break => StmtShape::Break,
        TokenKind::Return => StmtShape::Return,
        TokenKind::Semicolon => StmtShape::Empty,
        TokenKind::Ident => match tokens.peek(2).kind {
            TokenKind::Eq => StmtShape::Assign,
            TokenKind::InputBind => StmtShape::InputBind,
            TokenKind::OutputBind => StmtShape::OutputBind,
            _ => StmtShape::Expr,
        },
        kind if kind.begins_expression() => StmtShape::Expr,
        _ => StmtShape::Invalid,
    }
}

/// How a brace block opening at the current `{` must be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    /// `{ }`
    Empty,
    /// Starts with something only a statement can start with
    StatementLed,
    /// Starts with an expression; the token after it decides between a
    /// void involving and an ordinary block
    ExpressionLed,
    /// Neither a statement nor an expression follows the brace
    Unrecognized,
}

/// Classify the block whose `{` is the current token
pub fn classify_block<S: TokenSource>(tokens: &S) -> BlockShape {
    debug_assert_eq!(tokens.peek(1).kind, TokenKind::LBrace);
    match tokens.peek(2).kind {
        TokenKind::RBrace => BlockShape::Empty,
        TokenKind::Var
        | TokenKind::Const
        | TokenKind::Sif
        | TokenKind::Break
        | TokenKind::Return
        | TokenKind::Semicolon
        | TokenKind::LBrace => BlockShape::StatementLed,
        TokenKind::Ident
            if matches!(
                tokens.peek(3).kind,
                TokenKind::Eq | TokenKind::InputBind | TokenKind::OutputBind
            ) =>
        {
            BlockShape::StatementLed
        }
        kind if kind.begins_expression() => BlockShape::ExpressionLed,
        _ => BlockShape::Unrecognized,
    }
}

/// Alternatives of one filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionShape {
    /// `name <- source`
    List,
    /// `name [: Type] = value`
    Alias,
    /// `{ statement* }`
    Block,
    /// A boolean expression
    Filter,
}

/// Classify the condition starting at the current token
pub fn classify_condition<S: TokenSource>(tokens: &S) -> ConditionShape {
    match (tokens.peek(1).kind, tokens.peek(2).kind) {
        (TokenKind::Ident, TokenKind::LArrow) => ConditionShape::List,
        (TokenKind::Ident, TokenKind::Colon | TokenKind::Eq) => ConditionShape::Alias,
        (TokenKind::LBrace, _) => ConditionShape::Block,
        _ => ConditionShape::Filter,
    }
}
