use core::fmt;

use logos::{Lexer, Logos};
use smol_str::SmolStr;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// The text of the token. Quotes are already stripped from quoted strings.
    pub text: SmolStr,
    pub line: u32,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.line)
    }
}

#[derive(Logos, Debug, Eq, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(":")]
    Colon,

    #[token("\n")]
    Newline,

    #[regex(r#"\$[^\s{}:"]+"#)]
    Variable,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Quote,

    /// Words never start with `/*`, which opens a block comment
    #[regex(r#"[^\s{}:"$/][^\s{}:"]*|/([^\s{}:"*][^\s{}:"]*)?"#)]
    Word,

    #[regex(r"//[^\n]*", priority = 10)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    Error,

    EndOfInput,
}

/// Skips to the end of a block comment. Unterminated comments are errors.
fn block_comment(lexer: &mut Lexer<TokenKind>) -> bool {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            true
        }
        None => {
            lexer.bump(lexer.remainder().len());
            false
        }
    }
}

impl fmt::Display for TokenKind {
    #[allow(clippy::use_debug)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Whether this token can be the value of a statement
    pub fn is_value(self) -> bool {
        matches!(self, TokenKind::Word | TokenKind::Quote | TokenKind::Variable)
    }
}

/// Splits `input` into tokens, skipping comments.
///
/// Lines are counted starting at `first_line`.
/// The returned list always ends with a single [`TokenKind::EndOfInput`].
pub fn tokenize(input: &str, first_line: u32) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();
    let mut line = first_line;
    let mut offset = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += count_newlines(&input[offset..span.start]);
        offset = span.start;

        let kind = result.unwrap_or(TokenKind::Error);
        if kind.is_trivia() {
            continue;
        }

        let slice = lexer.slice();
        let text = match kind {
            TokenKind::Quote => &slice[1..slice.len() - 1],
            _ => slice,
        };
        tokens.push(Token {
            kind,
            text: text.into(),
            line,
        });
    }

    line += count_newlines(&input[offset..]);
    tokens.push(Token {
        kind: TokenKind::EndOfInput,
        text: SmolStr::default(),
        line,
    });
    tokens
}

fn count_newlines(text: &str) -> u32 {
    let count = text.bytes().filter(|byte| *byte == b'\n').count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{tokenize, TokenKind};

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, 1).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn object_header() {
        use TokenKind::*;
        assert_eq!(
            kinds("material a : b\n{\n}"),
            [Word, Word, Colon, Word, Newline, LeftBrace, Newline, RightBrace, EndOfInput]
        );
    }

    #[test]
    fn comments_are_skipped() {
        use TokenKind::*;
        assert_eq!(
            kinds("a // comment { }\n/* block\n comment */ b"),
            [Word, Newline, Word, EndOfInput]
        );
    }

    #[test]
    fn quotes_are_stripped() {
        let tokens = tokenize(r#"texture "my texture.png""#, 1);
        assert_eq!(tokens[1].kind, TokenKind::Quote);
        assert_eq!(tokens[1].text, "my texture.png");
    }

    #[test]
    fn variables_keep_their_sigil() {
        let tokens = tokenize("set $colour \"1 0 0\"", 1);
        assert_eq!(tokens[1].kind, TokenKind::Variable);
        assert_eq!(tokens[1].text, "$colour");
    }

    #[test]
    fn lines_are_tracked() {
        let tokens = tokenize("a\n\"multi\nline\" b\n/*\n\n*/ c", 5);
        let lines: Vec<_> = tokens.iter().map(|token| (token.text.as_str(), token.line)).collect();
        assert_eq!(
            lines,
            [
                ("a", 5),
                ("\n", 5),
                ("multi\nline", 6),
                ("b", 7),
                ("\n", 7),
                ("c", 10),
                ("", 10)
            ]
        );
    }

    #[test]
    fn comments_without_spaces() {
        use TokenKind::*;
        assert_eq!(kinds("a /*x*/b /**/ c"), [Word, Word, Word, EndOfInput]);
        assert_eq!(kinds("a /* never closed\n b"), [Word, Error, EndOfInput]);
    }

    #[test]
    fn paths_are_words() {
        let tokens = tokenize("texture textures/rock.png", 1);
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].text, "textures/rock.png");
    }
}
