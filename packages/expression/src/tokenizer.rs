use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::fmt;

/// Token types for form expressions
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token<'src> {
    // Keywords
    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("undefined")]
    Undefined,

    #[token("new")]
    New,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals keep their quotes; the parser unescapes them
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    // Operators
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

    #[token("!")]
    Bang,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEquals,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEquals,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    NotEquals,

    #[token("===")]
    StrictEquals,

    #[token("!==")]
    StrictNotEquals,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("??")]
    Coalesce,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Undefined => write!(f, "undefined"),
            Token::New => write!(f, "new"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Question => write!(f, "'?'"),
            Token::Colon => write!(f, "':'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Bang => write!(f, "'!'"),
            Token::Less => write!(f, "'<'"),
            Token::LessEquals => write!(f, "'<='"),
            Token::Greater => write!(f, "'>'"),
            Token::GreaterEquals => write!(f, "'>='"),
            Token::EqualsEquals => write!(f, "'=='"),
            Token::NotEquals => write!(f, "'!='"),
            Token::StrictEquals => write!(f, "'==='"),
            Token::StrictNotEquals => write!(f, "'!=='"),
            Token::And => write!(f, "'&&'"),
            Token::Or => write!(f, "'||'"),
            Token::Coalesce => write!(f, "'??'"),
        }
    }
}

/// Tokenize an expression, failing on the first unrecognized character
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, std::ops::Range<usize>)>> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok((token, span)),
            Err(()) => Err(ParseError::lexer_error(span.start)),
        })
        .collect()
}
