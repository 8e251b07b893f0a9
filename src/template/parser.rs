//! Recursive-descent parser producing a [`Template`] syntax tree.

use std::collections::VecDeque;

use super::ast::{BinOp, Expr, Node, Template};
use super::lexer::{Token, Tokenizer};

/// Parse template source into a syntax tree.
pub fn parse(source: &str) -> Result<Template, String> {
    let mut parser = Parser::new(source);
    let nodes = parser.parse_nodes()?;
    if let Some(token) = parser.peek(0)? {
        return Err(format!("Unexpected {:?} outside any open block", token));
    }
    Ok(nodes)
}

struct Parser<'a> {
    lexer: Tokenizer<'a>,
    buffer: VecDeque<Token>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Tokenizer::new(input),
            buffer: VecDeque::new(),
        }
    }

    fn peek(&mut self, n: usize) -> Result<Option<&Token>, String> {
        while self.buffer.len() <= n {
            match self.lexer.next_token()? {
                Some(token) => self.buffer.push_back(token),
                None => return Ok(None),
            }
        }
        Ok(self.buffer.get(n))
    }

    fn consume(&mut self) -> Result<Option<Token>, String> {
        if self.buffer.is_empty() {
            self.lexer.next_token()
        } else {
            Ok(self.buffer.pop_front())
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        match self.consume()? {
            Some(t) if t == token => Ok(()),
            Some(t) => Err(format!("Expected {:?}, got {:?}", token, t)),
            None => Err(format!("Expected {:?}, got end of template", token)),
        }
    }

    /// Parse a node sequence until EOF or a block terminator
    /// (`endfor`/`endif`/`else`/`elif`) owned by an enclosing construct.
    fn parse_nodes(&mut self) -> Result<Vec<Node>, String> {
        let mut nodes = Vec::new();
        loop {
            if let Some(Token::BlockStart) = self.peek(0)? {
                if let Some(Token::EndFor | Token::EndIf | Token::Else | Token::Elif) =
                    self.peek(1)?
                {
                    break;
                }
            }

            match self.peek(0)?.cloned() {
                None => break,
                Some(Token::Text(s)) => {
                    self.consume()?;
                    nodes.push(Node::Text(s));
                }
                Some(Token::VarStart) => {
                    self.consume()?;
                    let expr = self.parse_expr()?;
                    self.expect(Token::VarEnd)?;
                    nodes.push(Node::Output(expr));
                }
                Some(Token::BlockStart) => {
                    self.consume()?;
                    match self.peek(0)? {
                        Some(Token::For) => nodes.push(self.parse_for()?),
                        Some(Token::If) => nodes.push(self.parse_if()?),
                        Some(t) => return Err(format!("Unexpected tag {:?}", t)),
                        None => return Err("Unexpected end of template after '{%'".to_string()),
                    }
                }
                Some(t) => return Err(format!("Unexpected {:?}", t)),
            }
        }
        Ok(nodes)
    }

    fn parse_for(&mut self) -> Result<Node, String> {
        self.expect(Token::For)?;
        let targets = self.parse_targets()?;
        self.expect(Token::In)?;
        let iter = self.parse_expr()?;
        self.expect(Token::BlockEnd)?;

        let body = self.parse_nodes()?;

        self.expect(Token::BlockStart)?;
        let mut else_body = Vec::new();
        match self.consume()? {
            Some(Token::EndFor) => {}
            Some(Token::Else) => {
                self.expect(Token::BlockEnd)?;
                else_body = self.parse_nodes()?;
                self.expect(Token::BlockStart)?;
                self.expect(Token::EndFor)?;
            }
            t => return Err(format!("Expected else or endfor, got {:?}", t)),
        }
        self.expect(Token::BlockEnd)?;

        Ok(Node::For {
            targets,
            iter,
            body,
            else_body,
        })
    }

    /// Loop target: a name, a comma list of names, or a parenthesized tuple
    /// (possibly nested). Names are collected into one flat list.
    fn parse_targets(&mut self) -> Result<Vec<String>, String> {
        let mut names = Vec::new();
        self.parse_target_item(&mut names)?;
        while let Some(Token::Comma) = self.peek(0)? {
            self.consume()?;
            self.parse_target_item(&mut names)?;
        }
        Ok(names)
    }

    fn parse_target_item(&mut self, names: &mut Vec<String>) -> Result<(), String> {
        match self.consume()? {
            Some(Token::Ident(name)) => {
                names.push(name);
                Ok(())
            }
            Some(Token::LParen) => {
                self.parse_target_item(names)?;
                while let Some(Token::Comma) = self.peek(0)? {
                    self.consume()?;
                    self.parse_target_item(names)?;
                }
                self.expect(Token::RParen)
            }
            t => Err(format!("Expected identifier for loop target, got {:?}", t)),
        }
    }

    fn parse_if(&mut self) -> Result<Node, String> {
        self.expect(Token::If)?;
        let condition = self.parse_expr()?;
        self.expect(Token::BlockEnd)?;

        let body = self.parse_nodes()?;
        let mut cases = vec![(condition, body)];
        let mut else_body = None;

        loop {
            self.expect(Token::BlockStart)?;
            match self.consume()? {
                Some(Token::Elif) => {
                    let cond = self.parse_expr()?;
                    self.expect(Token::BlockEnd)?;
                    cases.push((cond, self.parse_nodes()?));
                }
                Some(Token::Else) => {
                    self.expect(Token::BlockEnd)?;
                    else_body = Some(self.parse_nodes()?);
                    self.expect(Token::BlockStart)?;
                    self.expect(Token::EndIf)?;
                    self.expect(Token::BlockEnd)?;
                    break;
                }
                Some(Token::EndIf) => {
                    self.expect(Token::BlockEnd)?;
                    break;
                }
                t => return Err(format!("Expected elif, else, or endif, got {:?}", t)),
            }
        }

        Ok(Node::If { cases, else_body })
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_and()?;
        while let Some(Token::Or) = self.peek(0)? {
            self.consume()?;
            let rhs = self.parse_and()?;
            lhs = Expr::BinOp(Box::new(lhs), BinOp::Or, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_eq()?;
        while let Some(Token::And) = self.peek(0)? {
            self.consume()?;
            let rhs = self.parse_eq()?;
            lhs = Expr::BinOp(Box::new(lhs), BinOp::And, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_eq(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_add()?;
        while let Some(Token::EqEq) = self.peek(0)? {
            self.consume()?;
            let rhs = self.parse_add()?;
            lhs = Expr::BinOp(Box::new(lhs), BinOp::Eq, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_add(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_primary()?;
        while let Some(Token::Plus) = self.peek(0)? {
            self.consume()?;
            let rhs = self.parse_primary()?;
            lhs = Expr::BinOp(Box::new(lhs), BinOp::Add, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        let mut expr = match self.consume()? {
            Some(Token::StringLit(s)) => Expr::Str(s),
            Some(Token::IntLit(n)) => Expr::Int(n),
            Some(Token::True) => Expr::Bool(true),
            Some(Token::False) => Expr::Bool(false),
            Some(Token::Ident(s)) => Expr::Name(s),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                inner
            }
            t => return Err(format!("Expected expression, got {:?}", t)),
        };

        // Suffixes: .attr and [key], chained in any order.
        loop {
            match self.peek(0)? {
                Some(Token::Dot) => {
                    self.consume()?;
                    match self.consume()? {
                        Some(Token::Ident(attr)) => {
                            expr = Expr::Attr(Box::new(expr), attr);
                        }
                        t => return Err(format!("Expected identifier after '.', got {:?}", t)),
                    }
                }
                Some(Token::LBracket) => {
                    self.consume()?;
                    let key = self.parse_expr()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::Index(Box::new(expr), Box::new(key));
                }
                _ => break,
            }
        }

        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_output() {
        let tpl = parse("Hello {{ name }}!").unwrap();
        assert_eq!(
            tpl,
            vec![
                Node::Text("Hello ".into()),
                Node::Output(Expr::Name("name".into())),
                Node::Text("!".into()),
            ]
        );
    }

    #[test]
    fn dotted_access() {
        let tpl = parse("{{ user.email }}").unwrap();
        assert_eq!(
            tpl,
            vec![Node::Output(Expr::Attr(
                Box::new(Expr::Name("user".into())),
                "email".into()
            ))]
        );
    }

    #[test]
    fn indexed_access_with_string_key() {
        let tpl = parse("{{ user['email'] }}").unwrap();
        assert_eq!(
            tpl,
            vec![Node::Output(Expr::Index(
                Box::new(Expr::Name("user".into())),
                Box::new(Expr::Str("email".into()))
            ))]
        );
    }

    #[test]
    fn simple_for_loop() {
        let tpl = parse("{% for item in items %}{{ item.name }}{% endfor %}").unwrap();
        match &tpl[0] {
            Node::For {
                targets,
                iter,
                body,
                else_body,
            } => {
                assert_eq!(targets, &vec!["item".to_string()]);
                assert_eq!(iter, &Expr::Name("items".into()));
                assert_eq!(body.len(), 1);
                assert!(else_body.is_empty());
            }
            other => panic!("expected For, got {:?}", other),
        }
    }

    #[test]
    fn for_loop_with_else() {
        let tpl = parse("{% for x in xs %}a{% else %}b{% endfor %}").unwrap();
        match &tpl[0] {
            Node::For {
                body, else_body, ..
            } => {
                assert_eq!(body, &vec![Node::Text("a".into())]);
                assert_eq!(else_body, &vec![Node::Text("b".into())]);
            }
            other => panic!("expected For, got {:?}", other),
        }
    }

    #[test]
    fn for_loop_with_tuple_target() {
        let tpl = parse("{% for k, v in pairs %}{{ k }}{% endfor %}").unwrap();
        match &tpl[0] {
            Node::For { targets, .. } => {
                assert_eq!(targets, &vec!["k".to_string(), "v".to_string()]);
            }
            other => panic!("expected For, got {:?}", other),
        }
    }

    #[test]
    fn for_loop_with_nested_tuple_target() {
        let tpl = parse("{% for (a, (b, c)) in triples %}x{% endfor %}").unwrap();
        match &tpl[0] {
            Node::For { targets, .. } => {
                assert_eq!(
                    targets,
                    &vec!["a".to_string(), "b".to_string(), "c".to_string()]
                );
            }
            other => panic!("expected For, got {:?}", other),
        }
    }

    #[test]
    fn for_loop_over_attribute_expression() {
        let tpl = parse("{% for x in user.groups %}y{% endfor %}").unwrap();
        match &tpl[0] {
            Node::For { iter, .. } => {
                assert_eq!(
                    iter,
                    &Expr::Attr(Box::new(Expr::Name("user".into())), "groups".into())
                );
            }
            other => panic!("expected For, got {:?}", other),
        }
    }

    #[test]
    fn if_elif_else() {
        let tpl = parse("{% if a %}1{% elif b %}2{% else %}3{% endif %}").unwrap();
        match &tpl[0] {
            Node::If { cases, else_body } => {
                assert_eq!(cases.len(), 2);
                assert_eq!(else_body.as_deref(), Some(&[Node::Text("3".into())][..]));
            }
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn nested_loop() {
        let tpl =
            parse("{% for a in outer %}{% for b in inner %}{{ b }}{% endfor %}{% endfor %}")
                .unwrap();
        assert_eq!(tpl.len(), 1);
    }

    #[test]
    fn binop_precedence() {
        let tpl = parse("{{ a == b and c }}").unwrap();
        match &tpl[0] {
            Node::Output(Expr::BinOp(_, BinOp::And, _)) => {}
            other => panic!("expected And at top, got {:?}", other),
        }
    }

    #[test]
    fn missing_endfor_is_error() {
        assert!(parse("{% for x in xs %}body").is_err());
    }

    #[test]
    fn missing_endif_is_error() {
        assert!(parse("{% if a %}body").is_err());
    }

    #[test]
    fn stray_endfor_is_error() {
        assert!(parse("text {% endfor %}").is_err());
    }

    #[test]
    fn unterminated_output_is_error() {
        assert!(parse("{{ name").is_err());
    }
}
