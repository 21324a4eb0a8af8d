use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};

/// Nesting limit for the expression tree. Every operator in a chain
/// (`a + b + c`, `a.b.c`) counts as one level, like parentheses do.
pub const MAX_DEPTH: usize = 64;

/// Recursive-descent parser for form expressions
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, std::ops::Range<usize>)>,
    source_len: usize,
    pos: usize,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            source_len: source.len(),
            pos: 0,
            depth: 0,
        })
    }

    /// Parse the whole input as a single expression
    pub fn parse(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_expression()?;

        if !self.is_at_end() {
            return Err(ParseError::unexpected_token(
                self.peek_span().start,
                "end of expression",
                Self::format_token(self.peek()),
            ));
        }

        Ok(expr)
    }

    /// Parse an expression with full operator precedence
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.enter()?;
        let expr = self.parse_conditional_expression();
        self.leave();
        expr
    }

    /// Parse conditional expression (lowest precedence)
    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let test = self.parse_coalesce_expression()?;

        if !self.match_token(Token::Question) {
            return Ok(test);
        }

        let consequent = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let alternate = self.parse_expression()?;

        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: Span::new(start, self.prev_end()),
        })
    }

    /// Parse nullish coalescing (??)
    fn parse_coalesce_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_or_expression()?;

        let base = self.depth;
        while self.match_token(Token::Coalesce) {
            self.enter()?;
            let right = self.parse_or_expression()?;
            left = Expression::Logical {
                left: Box::new(left),
                operator: LogicalOp::Coalesce,
                right: Box::new(right),
                span: Span::new(start, self.prev_end()),
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse OR expression
    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_and_expression()?;

        let base = self.depth;
        while self.match_token(Token::Or) {
            self.enter()?;
            let right = self.parse_and_expression()?;
            left = Expression::Logical {
                left: Box::new(left),
                operator: LogicalOp::Or,
                right: Box::new(right),
                span: Span::new(start, self.prev_end()),
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse AND expression
    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_equality_expression()?;

        let base = self.depth;
        while self.match_token(Token::And) {
            self.enter()?;
            let right = self.parse_equality_expression()?;
            left = Expression::Logical {
                left: Box::new(left),
                operator: LogicalOp::And,
                right: Box::new(right),
                span: Span::new(start, self.prev_end()),
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse equality expression (== != === !==)
    fn parse_equality_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_comparison_expression()?;

        let base = self.depth;
        while let Some(op) = self.match_equality_op() {
            self.enter()?;
            let right = self.parse_comparison_expression()?;
            left = self.binary(left, op, right, start);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse comparison expression (< > <= >=)
    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_additive_expression()?;

        let base = self.depth;
        while let Some(op) = self.match_comparison_op() {
            self.enter()?;
            let right = self.parse_additive_expression()?;
            left = self.binary(left, op, right, start);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse additive expression (+ -)
    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_multiplicative_expression()?;

        let base = self.depth;
        while let Some(op) = self.match_additive_op() {
            self.enter()?;
            let right = self.parse_multiplicative_expression()?;
            left = self.binary(left, op, right, start);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse multiplicative expression (* / %)
    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut left = self.parse_unary_expression()?;

        let base = self.depth;
        while let Some(op) = self.match_multiplicative_op() {
            self.enter()?;
            let right = self.parse_unary_expression()?;
            left = self.binary(left, op, right, start);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse unary expression (! - +)
    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;

        let operator = if self.match_token(Token::Bang) {
            UnaryOp::Not
        } else if self.match_token(Token::Minus) {
            UnaryOp::Negate
        } else if self.match_token(Token::Plus) {
            UnaryOp::Plus
        } else {
            return self.parse_postfix_expression();
        };

        self.enter()?;
        let operand = self.parse_unary_expression();
        self.leave();

        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand?),
            span: Span::new(start, self.prev_end()),
        })
    }

    /// Parse member access, index access and calls following a primary
    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;
        let mut expr = self.parse_primary_expression()?;
        let base = self.depth;

        loop {
            if self.match_token(Token::Dot) {
                self.enter()?;
                let property = self.expect_property_name()?;
                expr = Expression::Member {
                    object: Box::new(expr),
                    property,
                    span: Span::new(start, self.prev_end()),
                };
            } else if self.match_token(Token::LBracket) {
                self.enter()?;
                let index = self.parse_expression()?;
                self.expect(Token::RBracket)?;
                expr = Expression::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    span: Span::new(start, self.prev_end()),
                };
            } else if self.match_token(Token::LParen) {
                self.enter()?;
                let arguments = self.parse_arguments()?;
                expr = Expression::Call {
                    callee: Box::new(expr),
                    arguments,
                    span: Span::new(start, self.prev_end()),
                };
            } else {
                break;
            }
        }

        self.depth = base;
        Ok(expr)
    }

    /// Parse primary expression (literals, variables, groups, constructors)
    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.peek_span().start;

        let Some((token, _)) = self.advance().cloned() else {
            return Err(ParseError::unexpected_eof(self.source_len));
        };
        let span = Span::new(start, self.prev_end());

        match token {
            Token::String(s) => Ok(Expression::Literal {
                value: unescape(s),
                span,
            }),
            Token::Number(n) => {
                let value = n
                    .parse::<f64>()
                    .map_err(|_| ParseError::invalid_syntax(start, format!("bad number {}", n)))?;
                Ok(Expression::Number { value, span })
            }
            Token::True => Ok(Expression::Boolean { value: true, span }),
            Token::False => Ok(Expression::Boolean { value: false, span }),
            Token::Null => Ok(Expression::Null { span }),
            Token::Undefined => Ok(Expression::Undefined { span }),
            Token::Ident(name) => Ok(Expression::Variable {
                name: name.to_string(),
                span,
            }),
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::New => self.parse_new(start),
            other => Err(ParseError::unexpected_token(
                start,
                "expression",
                other.to_string(),
            )),
        }
    }

    /// Parse constructor call: new Date(arg) or new Date
    fn parse_new(&mut self, start: usize) -> ParseResult<Expression> {
        let mut constructor = self.expect_ident()?;
        while self.match_token(Token::Dot) {
            constructor.push('.');
            constructor.push_str(&self.expect_ident()?);
        }

        let arguments = if self.match_token(Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expression::New {
            constructor,
            arguments,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// Parse call arguments after the opening parenthesis
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();

        while !self.check(Token::RParen) && !self.is_at_end() {
            arguments.push(self.parse_expression()?);

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        self.expect(Token::RParen)?;
        Ok(arguments)
    }

    fn binary(&self, left: Expression, operator: BinaryOp, right: Expression, start: usize) -> Expression {
        Expression::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: Span::new(start, self.prev_end()),
        }
    }

    // Helper methods for matching operators

    fn match_equality_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::StrictEquals) {
            Some(BinaryOp::StrictEquals)
        } else if self.match_token(Token::StrictNotEquals) {
            Some(BinaryOp::StrictNotEquals)
        } else if self.match_token(Token::EqualsEquals) {
            Some(BinaryOp::Equals)
        } else if self.match_token(Token::NotEquals) {
            Some(BinaryOp::NotEquals)
        } else {
            None
        }
    }

    fn match_comparison_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::LessEquals) {
            Some(BinaryOp::LessThanOrEqual)
        } else if self.match_token(Token::GreaterEquals) {
            Some(BinaryOp::GreaterThanOrEqual)
        } else if self.match_token(Token::Less) {
            Some(BinaryOp::LessThan)
        } else if self.match_token(Token::Greater) {
            Some(BinaryOp::GreaterThan)
        } else {
            None
        }
    }

    fn match_additive_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::Plus) {
            Some(BinaryOp::Add)
        } else if self.match_token(Token::Minus) {
            Some(BinaryOp::Subtract)
        } else {
            None
        }
    }

    fn match_multiplicative_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::Star) {
            Some(BinaryOp::Multiply)
        } else if self.match_token(Token::Slash) {
            Some(BinaryOp::Divide)
        } else if self.match_token(Token::Percent) {
            Some(BinaryOp::Remainder)
        } else {
            None
        }
    }

    // Helper methods

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn peek(&self) -> Option<&(Token<'src>, std::ops::Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, std::ops::Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.source_len))
        } else {
            Err(ParseError::unexpected_token(
                self.peek_span().start,
                token.to_string(),
                Self::format_token(self.peek()),
            ))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Ident(s), _)) => {
                let val = s.to_string();
                self.advance();
                Ok(val)
            }
            None => Err(ParseError::unexpected_eof(self.source_len)),
            _ => Err(ParseError::unexpected_token(
                self.peek_span().start,
                "identifier",
                Self::format_token(self.peek()),
            )),
        }
    }

    /// Property names after `.` may reuse keywords (`model.new`)
    fn expect_property_name(&mut self) -> ParseResult<String> {
        let name = match self.peek() {
            Some((Token::True, _)) => "true",
            Some((Token::False, _)) => "false",
            Some((Token::Null, _)) => "null",
            Some((Token::Undefined, _)) => "undefined",
            Some((Token::New, _)) => "new",
            _ => return self.expect_ident(),
        };
        self.advance();
        Ok(name.to_string())
    }

    /// End offset of the token we just consumed
    fn prev_end(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    /// Span of the next token, or an empty span at the end of input
    fn peek_span(&self) -> std::ops::Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }

    fn format_token(token: Option<&(Token, std::ops::Range<usize>)>) -> String {
        match token {
            None => "end of expression".to_string(),
            Some((token, _)) => token.to_string(),
        }
    }
}

/// Strip quotes and resolve escape sequences of a string token
fn unescape(raw: &str) -> String {
    let content = &raw[1..raw.len() - 1];
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

/// Parse an expression source string
pub fn parse(source: &str) -> ParseResult<Expression> {
    Parser::new(source)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_op(expr: &Expression) -> BinaryOp {
        match expr {
            Expression::Binary { operator, .. } => *operator,
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3").unwrap();
        match expr {
            Expression::Binary {
                operator: BinaryOp::Add,
                right,
                ..
            } => assert_eq!(binary_op(&right), BinaryOp::Multiply),
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_conditional_is_lowest_precedence() {
        let expr = parse("model.a && model.b ? 1 : 2").unwrap();
        match expr {
            Expression::Conditional { test, .. } => {
                assert!(matches!(
                    *test,
                    Expression::Logical {
                        operator: LogicalOp::And,
                        ..
                    }
                ));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_conditionals_associate_right() {
        let expr = parse("a ? 1 : b ? 2 : 3").unwrap();
        match expr {
            Expression::Conditional { alternate, .. } => {
                assert!(matches!(*alternate, Expression::Conditional { .. }));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_member_chain_path() {
        let expr = parse("computed.calculatedDays").unwrap();
        assert_eq!(expr.path().as_deref(), Some("computed.calculatedDays"));
        assert_eq!(expr.span(), Span::new(0, 23));
    }

    #[test]
    fn test_builtin_call() {
        let expr = parse("Math.ceil(x / 2)").unwrap();
        match expr {
            Expression::Call {
                callee, arguments, ..
            } => {
                assert_eq!(callee.path().as_deref(), Some("Math.ceil"));
                assert_eq!(arguments.len(), 1);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_new_date() {
        let expr = parse("new Date(model.endDate)").unwrap();
        match expr {
            Expression::New {
                constructor,
                arguments,
                ..
            } => {
                assert_eq!(constructor, "Date");
                assert_eq!(arguments.len(), 1);
            }
            other => panic!("Expected constructor call, got {:?}", other),
        }
    }

    #[test]
    fn test_index_access() {
        let expr = parse("model['start date']").unwrap();
        assert!(matches!(expr, Expression::Index { .. }));
    }

    #[test]
    fn test_string_escapes() {
        match parse(r#"'it\'s' "#).unwrap() {
            Expression::Literal { value, .. } => assert_eq!(value, "it's"),
            other => panic!("Expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_not_on_identifier() {
        let expr = parse("!allowEdit").unwrap();
        assert!(matches!(
            expr,
            Expression::Unary {
                operator: UnaryOp::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_keyword_property_name() {
        let expr = parse("model.new").unwrap();
        assert_eq!(expr.path().as_deref(), Some("model.new"));
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let err = parse("a b").unwrap_err();
        assert_eq!(
            err,
            ParseError::unexpected_token(2, "end of expression", "identifier 'b'")
        );
    }

    #[test]
    fn test_missing_operand_reports_eof() {
        assert_eq!(parse("1 +").unwrap_err(), ParseError::unexpected_eof(3));
        assert_eq!(parse("").unwrap_err(), ParseError::unexpected_eof(0));
    }

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(parse("(1 + 2").unwrap_err(), ParseError::unexpected_eof(6));
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(
            parse(&source).unwrap_err(),
            ParseError::TooDeep { limit: MAX_DEPTH }
        );

        let negations = format!("{}x", "!".repeat(100));
        assert!(matches!(parse(&negations), Err(ParseError::TooDeep { .. })));
    }

    #[test]
    fn test_operator_chains_count_towards_depth() {
        let sum = format!("1{}", "+1".repeat(20_000));
        assert_eq!(parse(&sum).unwrap_err(), ParseError::TooDeep { limit: MAX_DEPTH });

        let conjunction = format!("a{}", " && a".repeat(500));
        assert!(matches!(parse(&conjunction), Err(ParseError::TooDeep { .. })));

        let members = format!("model{}", ".x".repeat(500));
        assert!(matches!(parse(&members), Err(ParseError::TooDeep { .. })));

        let calls = format!("f{}", "()".repeat(500));
        assert!(matches!(parse(&calls), Err(ParseError::TooDeep { .. })));
    }

    #[test]
    fn test_short_chains_within_depth() {
        let sum = format!("1{}", " + 1".repeat(40));
        assert!(parse(&sum).is_ok());

        // Depth is released after each chain, so siblings do not accumulate
        let groups = vec!["(a + b + c + d)"; 40].join(" * ");
        assert!(parse(&groups).is_ok());
    }
}
