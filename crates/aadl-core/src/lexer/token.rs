//! Token kinds for the AADL tokenizer

use logos::Logos;
use serde::Serialize;

/// The kind of token produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("package")]
    Package,
    #[token("program")]
    Program,
    #[token("function")]
    Function,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("new")]
    New,
    #[token("sif")]
    Sif,
    #[token("selse")]
    Selse,
    #[token("break")]
    Break,
    #[token("return")]
    Return,
    #[token("header")]
    Header,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("cast")]
    Cast,
    #[token("typeof")]
    Typeof,
    #[token("txtfile")]
    TxtFile,
    #[token("csvfile")]
    CsvFile,
    #[token("xmlfile")]
    XmlFile,

    // ========== Literals ==========
    /// Decimal integer; a leading zero marks an octal literal
    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInt,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    /// Character literal, quotes included in the lexeme
    #[regex(r"'([^'\\\n]|\\.)'")]
    Char,

    /// String literal, quotes included in the lexeme
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    /// Command-line argument placeholder (`$1`)
    #[regex(r"\$[0-9]+")]
    CommandArg,

    /// Embedded host code `@{ ... }@`, passed through unparsed
    #[token("@{", lex_host_code)]
    HostCode,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // ========== Operators ==========
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("~")]
    Tilde,
    #[token("!")]
    Not,
    #[token("^")]
    Caret,

    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("|")]
    Pipe,

    /// List binding inside a filter (`x <- src`)
    #[token("<-")]
    LArrow,
    /// Input file binding (`x <<- csvfile(..)`)
    #[token("<<-")]
    InputBind,
    /// Output file binding (`x ->> csvfile(..)`)
    #[token("->>")]
    OutputBind,
    /// Opens a dtbase literal
    ///
    /// There is no matching `>>` token: a dtbase closes with two adjacent
    /// `>`, so nested `<a, <b, c>>` needs no space.
    #[token("<<")]
    LtLt,

    // ========== Delimiters ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,

    // ========== Trivia ==========
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // ========== Special ==========
    /// End of input (appended by the lexer)
    Eof,

    /// Unrecognised input
    Error,
}

/// Consume host code up to and including the closing `}@`
fn lex_host_code(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("}@") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl TokenKind {
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Package
                | Self::Program
                | Self::Function
                | Self::Const
                | Self::Var
                | Self::New
                | Self::Sif
                | Self::Selse
                | Self::Break
                | Self::Return
                | Self::Header
                | Self::True
                | Self::False
                | Self::Null
                | Self::Cast
                | Self::Typeof
                | Self::TxtFile
                | Self::CsvFile
                | Self::XmlFile
        )
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::HexInt
                | Self::Float
                | Self::Char
                | Self::String
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    /// Keywords that introduce a file declarator
    #[must_use]
    pub const fn is_file_kind(&self) -> bool {
        matches!(self, Self::TxtFile | Self::CsvFile | Self::XmlFile)
    }

    /// Tokens that may begin a unary-level expression
    #[must_use]
    pub const fn begins_expression(&self) -> bool {
        self.is_literal()
            || matches!(
                self,
                Self::Ident
                    | Self::CommandArg
                    | Self::HostCode
                    | Self::Cast
                    | Self::Typeof
                    | Self::LParen
                    | Self::LBracket
                    | Self::LBrace
                    | Self::Lt
                    | Self::LtLt
                    | Self::Plus
                    | Self::Minus
                    | Self::Tilde
                    | Self::Not
                    | Self::Caret
            )
    }

    /// Comments, dropped before parsing
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Package => "package",
            Self::Program => "program",
            Self::Function => "function",
            Self::Const => "const",
            Self::Var => "var",
            Self::New => "new",
            Self::Sif => "sif",
            Self::Selse => "selse",
            Self::Break => "break",
            Self::Return => "return",
            Self::Header => "header",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Cast => "cast",
            Self::Typeof => "typeof",
            Self::TxtFile => "txtfile",
            Self::CsvFile => "csvfile",
            Self::XmlFile => "xmlfile",
            Self::Int => "integer",
            Self::HexInt => "hex integer",
            Self::Float => "float",
            Self::Char => "character",
            Self::String => "string",
            Self::CommandArg => "command argument",
            Self::HostCode => "host code block",
            Self::Ident => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::At => "@",
            Self::Tilde => "~",
            Self::Not => "!",
            Self::Caret => "^",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Pipe => "|",
            Self::LArrow => "<-",
            Self::InputBind => "<<-",
            Self::OutputBind => "->>",
            Self::LtLt => "<<",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::ColonColon => "::",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::LineComment => "// comment",
            Self::BlockComment => "/* comment */",
            Self::Eof => "<EOF>",
            Self::Error => "error",
        };
        f.write_str(text)
    }
}
