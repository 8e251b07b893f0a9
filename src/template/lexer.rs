//! Tokenizer for template source.
//!
//! Splits the source into literal text runs and tag tokens. Outside a tag the
//! lexer scans for the next `{{` or `{%`; inside a tag it produces keywords,
//! symbols, identifiers, and literals until the matching `}}` or `%}`.

/// A single token produced by the [`Tokenizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    BlockStart, // {%
    BlockEnd,   // %}
    VarStart,   // {{
    VarEnd,     // }}

    // Keywords
    If,
    Elif,
    Else,
    EndIf,
    For,
    In,
    EndFor,
    And,
    Or,
    True,
    False,

    // Symbols
    EqEq,     // ==
    Plus,     // +
    Dot,      // .
    Comma,    // ,
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )

    // Data
    Ident(String),
    StringLit(String),
    IntLit(i64),
}

/// Streaming tokenizer over template source text.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
    in_tag: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            in_tag: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, String> {
        let rest = self.remaining();
        if rest.is_empty() {
            if self.in_tag {
                return Err("unexpected end of template inside a tag".to_string());
            }
            return Ok(None);
        }

        if !self.in_tag {
            return Ok(Some(self.next_text_token(rest)));
        }
        self.next_tag_token()
    }

    fn next_text_token(&mut self, rest: &str) -> Token {
        // Find the nearest tag opener; everything before it is literal text.
        let next_tag = rest.find("{%").into_iter().chain(rest.find("{{")).min();

        match next_tag {
            Some(0) => {
                self.advance(2);
                self.in_tag = true;
                if rest.starts_with("{%") {
                    Token::BlockStart
                } else {
                    Token::VarStart
                }
            }
            Some(idx) => {
                let text = rest[..idx].to_string();
                self.advance(idx);
                Token::Text(text)
            }
            None => {
                let text = rest.to_string();
                self.advance(rest.len());
                Token::Text(text)
            }
        }
    }

    fn next_tag_token(&mut self) -> Result<Option<Token>, String> {
        // Inside a tag: whitespace is insignificant.
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());

        let rest = self.remaining();
        if rest.is_empty() {
            return Err("unexpected end of template inside a tag".to_string());
        }

        if rest.starts_with("%}") {
            self.advance(2);
            self.in_tag = false;
            return Ok(Some(Token::BlockEnd));
        }
        if rest.starts_with("}}") {
            self.advance(2);
            self.in_tag = false;
            return Ok(Some(Token::VarEnd));
        }

        if rest.starts_with("==") {
            self.advance(2);
            return Ok(Some(Token::EqEq));
        }
        let single = [
            ("+", Token::Plus),
            (".", Token::Dot),
            (",", Token::Comma),
            ("[", Token::LBracket),
            ("]", Token::RBracket),
            ("(", Token::LParen),
            (")", Token::RParen),
        ];
        for (sym, token) in single {
            if rest.starts_with(sym) {
                self.advance(1);
                return Ok(Some(token));
            }
        }

        let first = match rest.chars().next() {
            Some(c) => c,
            None => return Ok(None),
        };

        if first == '\'' || first == '"' {
            return self.string_literal(first).map(Some);
        }

        if first.is_ascii_digit() {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            self.advance(digits.len());
            let value = digits
                .parse::<i64>()
                .map_err(|_| format!("integer literal '{}' out of range", digits))?;
            return Ok(Some(Token::IntLit(value)));
        }

        if first.is_alphabetic() || first == '_' {
            let ident: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            self.advance(ident.len());

            let token = match ident.as_str() {
                "if" => Token::If,
                "elif" => Token::Elif,
                "else" => Token::Else,
                "endif" => Token::EndIf,
                "for" => Token::For,
                "in" => Token::In,
                "endfor" => Token::EndFor,
                "and" => Token::And,
                "or" => Token::Or,
                "true" => Token::True,
                "false" => Token::False,
                _ => Token::Ident(ident),
            };
            return Ok(Some(token));
        }

        Err(format!("unexpected character '{}' in tag", first))
    }

    fn string_literal(&mut self, quote: char) -> Result<Token, String> {
        let rest = self.remaining();
        let mut consumed = 1; // opening quote
        let mut value = String::new();
        let mut chars = rest[1..].chars();

        while let Some(c) = chars.next() {
            consumed += c.len_utf8();
            if c == quote {
                self.advance(consumed);
                return Ok(Token::StringLit(value));
            }
            if c == '\\' {
                match chars.next() {
                    Some(esc) => {
                        consumed += esc.len_utf8();
                        match esc {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            other => value.push(other),
                        }
                    }
                    None => break,
                }
            } else {
                value.push(c);
            }
        }

        Err("unterminated string literal".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(token) = lexer.next_token().unwrap() {
            out.push(token);
        }
        out
    }

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(
            tokens("hello world"),
            vec![Token::Text("hello world".into())]
        );
    }

    #[test]
    fn output_tag_tokens() {
        assert_eq!(
            tokens("{{ user.email }}"),
            vec![
                Token::VarStart,
                Token::Ident("user".into()),
                Token::Dot,
                Token::Ident("email".into()),
                Token::VarEnd,
            ]
        );
    }

    #[test]
    fn for_tag_keywords() {
        assert_eq!(
            tokens("{% for item in items %}"),
            vec![
                Token::BlockStart,
                Token::For,
                Token::Ident("item".into()),
                Token::In,
                Token::Ident("items".into()),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn text_between_tags_preserved() {
        assert_eq!(
            tokens("a{{ x }}b"),
            vec![
                Token::Text("a".into()),
                Token::VarStart,
                Token::Ident("x".into()),
                Token::VarEnd,
                Token::Text("b".into()),
            ]
        );
    }

    #[test]
    fn string_literal_with_escapes() {
        assert_eq!(
            tokens(r#"{{ "a\nb" }}"#),
            vec![
                Token::VarStart,
                Token::StringLit("a\nb".into()),
                Token::VarEnd,
            ]
        );
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(
            tokens("{{ x['key'] }}"),
            vec![
                Token::VarStart,
                Token::Ident("x".into()),
                Token::LBracket,
                Token::StringLit("key".into()),
                Token::RBracket,
                Token::VarEnd,
            ]
        );
    }

    #[test]
    fn integer_literal() {
        assert_eq!(
            tokens("{{ xs[0] }}"),
            vec![
                Token::VarStart,
                Token::Ident("xs".into()),
                Token::LBracket,
                Token::IntLit(0),
                Token::RBracket,
                Token::VarEnd,
            ]
        );
    }

    #[test]
    fn comma_in_loop_target() {
        assert_eq!(
            tokens("{% for k, v in pairs %}"),
            vec![
                Token::BlockStart,
                Token::For,
                Token::Ident("k".into()),
                Token::Comma,
                Token::Ident("v".into()),
                Token::In,
                Token::Ident("pairs".into()),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_error() {
        let mut lexer = Tokenizer::new("{{ 'oops }}");
        assert!(lexer.next_token().unwrap().is_some()); // {{
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn unterminated_tag_is_error() {
        let mut lexer = Tokenizer::new("{{ name");
        assert!(lexer.next_token().unwrap().is_some()); // {{
        assert!(lexer.next_token().unwrap().is_some()); // name
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn unexpected_character_is_error() {
        let mut lexer = Tokenizer::new("{{ a ? b }}");
        assert!(lexer.next_token().unwrap().is_some()); // {{
        assert!(lexer.next_token().unwrap().is_some()); // a
        assert!(lexer.next_token().is_err());
    }
}
