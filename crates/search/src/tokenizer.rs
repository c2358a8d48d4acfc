//! Code-aware tokenizer.
//!
//! Produces a finite ordered sequence of byte slices from a UTF-8 input:
//! identifiers (plus their `camelCase`/`snake_case` subtokens), numerics,
//! and standalone punctuation bytes. Also infers a coarse content
//! classification from lexical markers in the full text — a heuristic, not
//! a contract; callers may always override it by passing a `ContentKind`
//! explicitly to `add_document`.

use tessera_core::ContentKind;

/// Tokenize `text` into an ordered sequence of borrowed slices.
///
/// Skip ASCII whitespace; an alphabetic/`_` byte starts an identifier
/// (maximal run of `[A-Za-z0-9_]`), which is emitted in full and then
/// split into subtokens (on `_` boundaries, or otherwise at uppercase
/// boundaries); a digit starts a numeric (`[0-9.]`); anything else is
/// emitted as a single non-whitespace byte.
pub fn tokenize(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'_' || b.is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && (bytes[i] == b'_' || bytes[i].is_ascii_alphanumeric()) {
                i += 1;
            }
            let ident = &text[start..i];
            out.push(ident);
            for sub in split_identifier(ident) {
                if sub != ident {
                    out.push(sub);
                }
            }
            continue;
        }
        if b.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            out.push(&text[start..i]);
            continue;
        }
        // Single non-whitespace byte. Safe: ASCII-range bytes are valid
        // one-byte UTF-8 slices on their own; multi-byte UTF-8 continuation
        // bytes fall through ascii_whitespace/alphabetic/digit checks above
        // as `false`, so we still emit one byte at a time here, which is a
        // deliberate simplification for non-ASCII punctuation runs.
        out.push(&text[i..i + 1]);
        i += 1;
    }
    out
}

/// Split an identifier into non-empty subtokens.
///
/// On `_`, splits into the non-empty parts. Otherwise splits at each
/// uppercase boundary (`getUserData` -> `get`, `User`, `Data`).
fn split_identifier(ident: &str) -> Vec<&str> {
    if ident.contains('_') {
        return ident.split('_').filter(|s| !s.is_empty()).collect();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    let bytes = ident.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i].is_ascii_uppercase() && !bytes[i - 1].is_ascii_uppercase() {
            parts.push(&ident[start..i]);
            start = i;
        }
    }
    parts.push(&ident[start..]);
    parts.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Infer a coarse content classification from lexical markers in `text`.
///
/// First match wins, checked in this order: function markers
/// (`function`/`def `/`fn `), type markers (`interface`/`struct`/`class`),
/// variable markers (`let `/`var `/`const `), comment markers
/// (`//`/`/*`/`#`); otherwise `Mixed`.
pub fn infer_content_kind(text: &str) -> ContentKind {
    if text.contains("function") || text.contains("def ") || text.contains("fn ") {
        ContentKind::FunctionBody
    } else if text.contains("interface") || text.contains("struct") || text.contains("class") {
        ContentKind::TypeDefinition
    } else if text.contains("let ") || text.contains("var ") || text.contains("const ") {
        ContentKind::VariableDeclaration
    } else if text.contains("//") || text.contains("/*") || text.contains('#') {
        ContentKind::CommentBlock
    } else {
        ContentKind::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_camel_case() {
        let tokens = tokenize("getUserData");
        assert!(tokens.contains(&"getUserData"));
        assert!(tokens.contains(&"get"));
        assert!(tokens.contains(&"User"));
        assert!(tokens.contains(&"Data"));
    }

    #[test]
    fn test_tokenize_snake_case() {
        let tokens = tokenize("parse_input_stream");
        assert!(tokens.contains(&"parse_input_stream"));
        assert!(tokens.contains(&"parse"));
        assert!(tokens.contains(&"input"));
        assert!(tokens.contains(&"stream"));
    }

    #[test]
    fn test_tokenize_numeric() {
        let tokens = tokenize("x = 3.14");
        assert!(tokens.contains(&"3.14"));
    }

    #[test]
    fn test_tokenize_punctuation() {
        let tokens = tokenize("a+b");
        assert_eq!(tokens, vec!["a", "+", "b"]);
    }

    #[test]
    fn test_tokenize_whitespace_skipped() {
        let tokens = tokenize("  a   b  ");
        assert_eq!(tokens, vec!["a", "b"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_single_word_no_subtokens() {
        let tokens = tokenize("hello");
        assert_eq!(tokens, vec!["hello"]);
    }

    #[test]
    fn test_infer_content_kind_function() {
        assert_eq!(
            infer_content_kind("function calc(a,b){return a+b}"),
            ContentKind::FunctionBody
        );
        assert_eq!(infer_content_kind("def foo(): pass"), ContentKind::FunctionBody);
        assert_eq!(infer_content_kind("fn main() {}"), ContentKind::FunctionBody);
    }

    #[test]
    fn test_infer_content_kind_type() {
        assert_eq!(
            infer_content_kind("interface U{id:number}"),
            ContentKind::TypeDefinition
        );
        assert_eq!(
            infer_content_kind("struct Point { x: f32 }"),
            ContentKind::TypeDefinition
        );
        assert_eq!(
            infer_content_kind("class Foo: pass"),
            ContentKind::TypeDefinition
        );
    }

    #[test]
    fn test_infer_content_kind_variable() {
        assert_eq!(
            infer_content_kind("const email=x=>x"),
            ContentKind::VariableDeclaration
        );
        assert_eq!(
            infer_content_kind("let x = 1"),
            ContentKind::VariableDeclaration
        );
        assert_eq!(
            infer_content_kind("var y = 2"),
            ContentKind::VariableDeclaration
        );
    }

    #[test]
    fn test_infer_content_kind_comment() {
        assert_eq!(infer_content_kind("// a comment"), ContentKind::CommentBlock);
        assert_eq!(infer_content_kind("/* block */"), ContentKind::CommentBlock);
        assert_eq!(infer_content_kind("# shebang"), ContentKind::CommentBlock);
    }

    #[test]
    fn test_infer_content_kind_mixed() {
        assert_eq!(infer_content_kind("just some text"), ContentKind::Mixed);
    }

    #[test]
    fn test_infer_content_kind_first_match_wins() {
        // Contains both a function marker and a type marker; function wins
        // because it is checked first.
        assert_eq!(
            infer_content_kind("function makeStruct() { struct X {} }"),
            ContentKind::FunctionBody
        );
    }
}
