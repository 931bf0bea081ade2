//! Tokenizer built on `logos`.
//!
//! Newlines are real tokens: they separate statements. The parser skips
//! them wherever an expression obviously continues (inside brackets, after
//! a binary operator).

use logos::{FilterResult, Logos};
use sq_ir::Span;

use crate::SyntaxErrorKind;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("\n")]
    Newline,
    /// Never produced; the callback skips the comment or fails.
    #[token("/*", block_comment)]
    BlockComment,

    // Keywords
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("to")]
    To,
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("#include")]
    Include,

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("|")]
    Bar,
    #[token("->")]
    Arrow,
    #[token("=")]
    Assign,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?(k|M|B|T|%)?", number)]
    Number(f64),
    #[regex(r#""([^"\\]|\\.)*""#, string)]
    #[regex(r"'([^'\\]|\\.)*'", string)]
    String(String),
    /// Plain (`x`) or module-qualified (`List.map`) identifier.
    #[regex(r"[a-z_][A-Za-z0-9_]*", identifier)]
    #[regex(r"[A-Z][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", identifier)]
    Ident(String),
}

impl Token {
    /// Short human description used in "expected ..., found ..." messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Newline => "end of line".to_string(),
            Token::Number(n) => format!("number {n}"),
            Token::String(s) => format!("string \"{s}\""),
            Token::Ident(name) => format!("identifier `{name}`"),
            other => format!("`{}`", other.text()),
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::True => "true",
            Token::False => "false",
            Token::To => "to",
            Token::Import => "import",
            Token::As => "as",
            Token::Include => "#include",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Question => "?",
            Token::Dot => ".",
            Token::At => "@",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Bar => "|",
            Token::Arrow => "->",
            Token::Assign => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Caret => "^",
            Token::Newline | Token::BlockComment | Token::Number(_) | Token::String(_) | Token::Ident(_) => "",
        }
    }
}

/// Skip to the closing `*/`; an unterminated comment swallows the rest of
/// the source and fails.
fn block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

fn number(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    let slice = lex.slice();
    let (digits, scale) = match slice.as_bytes().last() {
        Some(b'k') => (&slice[..slice.len() - 1], 1e3),
        Some(b'M') => (&slice[..slice.len() - 1], 1e6),
        Some(b'B') => (&slice[..slice.len() - 1], 1e9),
        Some(b'T') => (&slice[..slice.len() - 1], 1e12),
        Some(b'%') => (&slice[..slice.len() - 1], 0.01),
        _ => (slice, 1.0),
    };
    digits.parse::<f64>().ok().map(|n| n * scale)
}

fn string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

fn identifier(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other @ ('\\' | '"' | '\'')) => result.push(other),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Lex the whole source. Fails on the first unrecognized character.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, (SyntaxErrorKind, Span)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) if lexer.slice().starts_with("/*") => {
                return Err((SyntaxErrorKind::UnterminatedComment, span));
            }
            Err(()) => {
                let text = lexer.slice().to_string();
                return Err((SyntaxErrorKind::UnexpectedCharacter(text), span));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests;
