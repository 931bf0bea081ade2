use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<Token> {
    match tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|(token, _)| token).collect(),
        Err((kind, span)) => panic!("lex error {kind} at {span}"),
    }
}

#[test]
fn lexes_binding() {
    assert_eq!(
        kinds("x = 1 + 2"),
        vec![
            Token::Ident("x".into()),
            Token::Assign,
            Token::Number(1.0),
            Token::Plus,
            Token::Number(2.0),
        ]
    );
}

#[test]
fn qualified_identifiers_are_one_token() {
    assert_eq!(
        kinds("List.map(xs, f)")[0],
        Token::Ident("List.map".into())
    );
    // lowercase receivers stay separate for field lookup
    assert_eq!(
        kinds("a.b"),
        vec![Token::Ident("a".into()), Token::Dot, Token::Ident("b".into())]
    );
}

#[test]
fn magnitude_suffixes_scale() {
    assert_eq!(kinds("5k"), vec![Token::Number(5000.0)]);
    assert_eq!(kinds("2M"), vec![Token::Number(2_000_000.0)]);
    assert_eq!(kinds("50%"), vec![Token::Number(0.5)]);
    assert_eq!(kinds("1e3"), vec![Token::Number(1000.0)]);
}

#[test]
fn strings_unescape() {
    assert_eq!(kinds(r#""a\"b""#), vec![Token::String("a\"b".into())]);
    assert_eq!(kinds(r"'it\'s'"), vec![Token::String("it's".into())]);
}

#[test]
fn comments_are_skipped_newlines_are_kept() {
    assert_eq!(
        kinds("a // one\n/* two\n lines */ b"),
        vec![
            Token::Ident("a".into()),
            Token::Newline,
            Token::Ident("b".into()),
        ]
    );
}

#[test]
fn block_comments_may_contain_stars_and_slashes() {
    assert_eq!(
        kinds("/* c */ 1 /* x * y / z **/ * 2"),
        vec![Token::Number(1.0), Token::Star, Token::Number(2.0)]
    );
    assert_eq!(kinds("a / b"), vec![Token::Ident("a".into()), Token::Slash, Token::Ident("b".into())]);
}

#[test]
fn unterminated_block_comment_fails() {
    let Err((kind, span)) = tokenize("x = 1 /* never closed") else {
        panic!("expected a lex error");
    };
    assert_eq!(kind, SyntaxErrorKind::UnterminatedComment);
    assert_eq!(span, Span::new(6, 21));
}

#[test]
fn include_directive() {
    assert_eq!(
        kinds("#include \"common\" as c"),
        vec![
            Token::Include,
            Token::String("common".into()),
            Token::As,
            Token::Ident("c".into()),
        ]
    );
}

#[test]
fn unknown_character_fails_with_span() {
    let Err((kind, span)) = tokenize("x = 1 ~ 2") else {
        panic!("expected a lex error");
    };
    assert_eq!(kind, SyntaxErrorKind::UnexpectedCharacter("~".into()));
    assert_eq!(span, Span::new(6, 7));
}
