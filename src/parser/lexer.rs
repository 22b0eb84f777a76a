use logos::Logos;
use crate::ast::Location;

/// Token types for Java declarations.
///
/// Only the keywords and separators the declaration parser looks at get
/// their own variant. Expression operators collapse into `Operator`; method
/// bodies are sliced out of the source by offset, never rebuilt from tokens.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,
    #[token("default")]
    Default,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("throws")]
    Throws,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("void")]
    Void,
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,

    // Separators
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
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,

    // Operators that show up in declarations. `>` is never merged into
    // `>>` so nested type arguments close one bracket at a time.
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,
    #[regex(r"[-+/%!~|^:]")]
    Operator,

    // Literals
    #[regex(r#""""([^"\\]|\\.|"[^"\\]|""[^"\\])*""""#, priority = 3)]
    TextBlock,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\\n]|\\u[0-9a-fA-F]{4}|\\.)'")]
    CharLiteral,
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    Number,

    // Identifiers
    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Identifier,

    // Comments and whitespace
    #[regex(r"//[^\n]*")]
    LineComment,
    // Block/Javadoc comment (handles /**...*/, /*...*/, and multiple '*')
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r\f]+", priority = 2)]
    Whitespace,

    // Unicode BOM (Byte Order Mark) - treat as ignorable whitespace
    #[token("\u{FEFF}")]
    Bom,
}

impl Token {
    /// Check if this token is a primitive type (`void` included)
    pub fn is_primitive_type(&self) -> bool {
        matches!(self,
            Token::Boolean | Token::Byte | Token::Short |
            Token::Int | Token::Long | Token::Char |
            Token::Float | Token::Double | Token::Void
        )
    }

    /// Tokens the lexer produces but the parser never sees
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Bom | Token::LineComment | Token::BlockComment)
    }
}

/// Lexical token with location information
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self { token, lexeme, location }
    }

    /// Get the token type
    pub fn token_type(&self) -> &Token {
        &self.token
    }

    /// Get the lexeme (actual text)
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Get the location
    pub fn location(&self) -> Location {
        self.location
    }

    /// Byte offset one past the last character of this token
    pub fn end_offset(&self) -> usize {
        self.location.offset + self.lexeme.len()
    }

    /// Check if this token matches the given token type
    pub fn is(&self, token_type: &Token) -> bool {
        std::mem::discriminant(&self.token) == std::mem::discriminant(token_type)
    }
}

/// Lexer for Java source
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, String>> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = Location::new(self.current_line, self.current_column, self.lexer.span().start);

        match token {
            Ok(token) => {
                self.update_position(&lexeme);
                Some(Ok(LexicalToken::new(token, lexeme, location)))
            }
            Err(_) => {
                self.update_position(&lexeme);
                Some(Err(format!(
                    "unexpected character {:?} at {}:{}",
                    lexeme, location.line, location.column
                )))
            }
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        for ch in lexeme.chars() {
            match ch {
                '\n' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                '\r' => {}
                _ => {
                    self.current_column += 1;
                }
            }
        }
    }

    /// Get all significant tokens from the source
    pub fn tokenize(mut self) -> Result<Vec<LexicalToken>, String> {
        let mut tokens = Vec::new();

        while let Some(result) = self.next_token() {
            let token = result?;
            if !token.token.is_trivia() {
                tokens.push(token);
            }
        }

        log::trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalToken, String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_keywords() {
        let source = "public class Test extends Object implements Interface";
        let lexer = Lexer::new(source);
        let tokens = lexer.tokenize().expect("Failed to tokenize");

        assert_eq!(tokens.len(), 7);
        assert!(tokens[0].is(&Token::Public));
        assert!(tokens[1].is(&Token::Class));
        assert!(tokens[2].is(&Token::Identifier));
        assert!(tokens[3].is(&Token::Extends));
        assert!(tokens[4].is(&Token::Identifier));
        assert!(tokens[5].is(&Token::Implements));
        assert!(tokens[6].is(&Token::Identifier));
    }

    #[test]
    fn test_lexer_nested_generics_close_separately() {
        let tokens = Lexer::new("Map<String, List<Integer>>").tokenize().expect("tokens");
        let kinds: Vec<&Token> = tokens.iter().map(|t| t.token_type()).collect();
        assert_eq!(kinds[kinds.len() - 2..], [&Token::Gt, &Token::Gt]);
    }

    #[test]
    fn test_lexer_literals() {
        let source = r#"42 "he said \"hi\"" 'a' '\n' 0x1F 3.5f"#;
        let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

        assert_eq!(tokens.len(), 6);
        assert!(tokens[0].is(&Token::Number));
        assert!(tokens[1].is(&Token::StringLiteral));
        assert!(tokens[2].is(&Token::CharLiteral));
        assert!(tokens[3].is(&Token::CharLiteral));
        assert!(tokens[4].is(&Token::Number));
        assert!(tokens[5].is(&Token::Number));
    }

    #[test]
    fn test_lexer_braces_inside_strings_are_not_separators() {
        let tokens = Lexer::new(r#"s = "{ not a block }";"#).tokenize().expect("tokens");
        assert!(!tokens.iter().any(|t| t.is(&Token::LBrace)));
    }

    #[test]
    fn test_lexer_comments() {
        let source = "// This is a comment\n/* This is a block comment */\n/** doc { } */";
        let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

        // Comments should be skipped
        assert_eq!(tokens.len(), 0);
    }

    #[test]
    fn test_lexer_locations_and_offsets() {
        let source = "class A {\n  int x;\n}";
        let tokens = Lexer::new(source).tokenize().expect("tokens");
        let int_tok = tokens.iter().find(|t| t.is(&Token::Int)).expect("int");
        assert_eq!(int_tok.location().line, 2);
        assert_eq!(int_tok.location().column, 3);
        assert_eq!(&source[int_tok.location().offset..int_tok.end_offset()], "int");
    }

    #[test]
    fn test_lexer_reports_unknown_character() {
        let err = Lexer::new("class A { # }").tokenize().unwrap_err();
        assert!(err.contains("1:11"), "{}", err);
    }
}
