// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing (Pratt parsing for binary operators) and literal
//! decoding.

use ecow::EcoString;

use super::{Diagnostic, LineResult, Parser, binary_binding_power};
use crate::ast::{BinaryOperator, BuiltInArgument, Condition, Expression, UnaryOperator};
use crate::source_analysis::{SyntaxError, Token, TokenType, traits};

impl Parser<'_> {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses a complete expression, conditional operator included.
    pub(super) fn parse_expression(&mut self) -> LineResult<Expression> {
        self.enter_nesting()?;
        let result = self.parse_conditional();
        self.leave_nesting();
        result
    }

    /// Parses an expression if the next token can start one.
    pub(super) fn try_parse_expression(&mut self) -> LineResult<Option<Expression>> {
        if traits(self.current_type()).expression_start() {
            self.parse_expression().map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse_conditional(&mut self) -> LineResult<Expression> {
        let condition = self.parse_binary(0)?;
        self.continue_conditional(condition)
    }

    /// Parses `? consequent : alternate` after an already parsed condition.
    pub(super) fn continue_conditional(&mut self, condition: Expression) -> LineResult<Expression> {
        if !self.match_token(TokenType::QuestionMark) {
            return Ok(condition);
        }
        let consequent = self.parse_expression()?;
        self.expect(TokenType::Colon, SyntaxError::ColonExpected)?;
        let alternate = self.parse_expression()?;
        let location = condition.location().to(alternate.location());
        Ok(Expression::Conditional {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            location,
        })
    }

    fn parse_binary(&mut self, min_bp: u8) -> LineResult<Expression> {
        let left = self.parse_unary()?;
        self.continue_binary(left, min_bp)
    }

    /// Folds binary operators binding at least as tightly as `min_bp` onto
    /// an already parsed left operand.
    pub(super) fn continue_binary(&mut self, mut left: Expression, min_bp: u8) -> LineResult<Expression> {
        loop {
            let token_type = self.current_type();
            let Some(bp) = binary_binding_power(token_type) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let Some(operator) = BinaryOperator::from_token_type(token_type) else {
                break;
            };
            self.advance();

            let right = self.parse_binary(bp.right)?;
            let location = left.location().to(right.location());
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> LineResult<Expression> {
        let operator = match self.current_type() {
            TokenType::Plus => UnaryOperator::Plus,
            TokenType::Minus => UnaryOperator::Minus,
            TokenType::Exclamation => UnaryOperator::LogicalNot,
            TokenType::BinaryNot => UnaryOperator::BitwiseNot,
            _ => return self.parse_primary(),
        };
        let token = self.advance();

        self.enter_nesting()?;
        let operand = self.parse_unary();
        self.leave_nesting();
        let operand = operand?;

        let location = token.location().to(operand.location());
        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand),
            location,
        })
    }

    fn parse_primary(&mut self) -> LineResult<Expression> {
        let token = self.current_token();
        let location = token.location();

        match token.token_type() {
            TokenType::BinaryLiteral
            | TokenType::OctalLiteral
            | TokenType::DecimalLiteral
            | TokenType::HexadecimalLiteral
            | TokenType::CharLiteral => {
                self.advance();
                let value = integer_value(token.token_type(), token.text()).ok_or_else(|| {
                    Diagnostic::new(&SyntaxError::LiteralOutOfRange(token.text().into()), location)
                })?;
                Ok(Expression::IntegerLiteral { value, location })
            }
            TokenType::RealLiteral => {
                self.advance();
                let value = real_value(token.text()).ok_or_else(|| {
                    Diagnostic::new(&SyntaxError::LiteralOutOfRange(token.text().into()), location)
                })?;
                Ok(Expression::RealLiteral { value, location })
            }
            TokenType::StringLiteral => {
                self.advance();
                Ok(Expression::StringLiteral {
                    value: string_value(token.text()),
                    location,
                })
            }
            TokenType::True | TokenType::False => {
                self.advance();
                Ok(Expression::BooleanLiteral {
                    value: token.token_type() == TokenType::True,
                    location,
                })
            }
            TokenType::CurAddress | TokenType::Dot | TokenType::Multiplication => {
                self.advance();
                Ok(Expression::CurrentAddress { location })
            }
            TokenType::CurCnt => {
                self.advance();
                Ok(Expression::CurrentCounter { location })
            }
            TokenType::Identifier => self.parse_symbol_or_invocation(),
            TokenType::DoubleColon => {
                self.advance();
                let name = self.expect(TokenType::Identifier, SyntaxError::IdentifierExpected)?;
                Ok(Expression::Symbol {
                    name: name.text().into(),
                    global: true,
                    location: location.to(name.location()),
                })
            }
            TokenType::LPar => self.parse_grouped(TokenType::RPar, SyntaxError::ClosingParenExpected),
            TokenType::LSBrac => {
                self.parse_grouped(TokenType::RSBrac, SyntaxError::ClosingBracketExpected)
            }
            TokenType::LDBrac => {
                self.advance();
                let name = self.expect(TokenType::Identifier, SyntaxError::IdentifierExpected)?;
                let close =
                    self.expect(TokenType::RDBrac, SyntaxError::ClosingDoubleBraceExpected)?;
                Ok(Expression::MacroParameter {
                    name: name.into_text(),
                    location: location.to(close.location()),
                })
            }
            token_type if traits(token_type).built_in_function() => {
                self.parse_built_in_invocation()
            }
            _ => Err(Diagnostic::new(&SyntaxError::ExpressionExpected, location)),
        }
    }

    /// Parses `name` or `name(arg, ...)`.
    fn parse_symbol_or_invocation(&mut self) -> LineResult<Expression> {
        let name = self.advance();
        if !self.match_token(TokenType::LPar) {
            return Ok(Expression::Symbol {
                name: name.text().into(),
                global: false,
                location: name.location(),
            });
        }

        let mut arguments = Vec::new();
        if !self.check(TokenType::RPar) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        let close = self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        Ok(Expression::FunctionInvocation {
            location: name.location().to(close.location()),
            name: name.into_text(),
            arguments,
        })
    }

    /// Parses `(expr)` or `[expr]`.
    fn parse_grouped(&mut self, close: TokenType, error: SyntaxError) -> LineResult<Expression> {
        let open = self.advance();
        let inner = self.parse_expression()?;
        let close = self.expect(close, error)?;
        Ok(Expression::Parenthesized {
            inner: Box::new(inner),
            location: open.location().to(close.location()),
        })
    }

    /// Parses `isreg8(a)`, `textof(ldir)`, `iscondition(nz)`...
    fn parse_built_in_invocation(&mut self) -> LineResult<Expression> {
        let function = self.advance();
        self.expect(TokenType::LPar, SyntaxError::OpeningParenExpected)?;

        let argument_type = self.current_type();
        let argument_traits = traits(argument_type);
        let argument = if argument_traits.instruction() {
            BuiltInArgument::Mnemonic(lowercase(&self.advance()))
        } else if let Some(condition) = Condition::from_token_type(argument_type)
            .filter(|_| argument_traits.condition() && !argument_traits.reg())
        {
            self.advance();
            BuiltInArgument::Condition(condition)
        } else {
            BuiltInArgument::Operand(self.parse_operand()?)
        };

        let close = self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        Ok(Expression::BuiltInFunctionInvocation {
            function: lowercase(&function),
            argument: Box::new(argument),
            location: function.location().to(close.location()),
        })
    }
}

/// Returns the lower-cased text of a keyword token.
pub(super) fn lowercase(token: &Token) -> EcoString {
    token.text().to_ascii_lowercase().into()
}

// ============================================================================
// Literal Decoding
// ============================================================================

/// Decodes the value of an integer-valued literal token. Returns `None`
/// when the value does not fit an `i64`.
fn integer_value(token_type: TokenType, text: &str) -> Option<i64> {
    match token_type {
        TokenType::HexadecimalLiteral => i64::from_str_radix(hex_digits(text), 16).ok(),
        TokenType::BinaryLiteral => {
            let digits = text
                .strip_prefix('%')
                .or_else(|| text.strip_prefix("0b"))
                .or_else(|| text.strip_prefix("0B"))
                .unwrap_or(text);
            let digits: String = digits.chars().filter(|&c| c != '_').collect();
            i64::from_str_radix(&digits, 2).ok()
        }
        TokenType::OctalLiteral => i64::from_str_radix(text.get(..text.len().saturating_sub(1))?, 8).ok(),
        TokenType::DecimalLiteral => text.parse().ok(),
        TokenType::CharLiteral => char_value(text).map(i64::from),
        _ => None,
    }
}

/// Strips the prefix or suffix of a hexadecimal literal.
fn hex_digits(text: &str) -> &str {
    if let Some(digits) = text.strip_prefix(['#', '$']) {
        return digits;
    }
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return digits;
    }
    text.strip_suffix(['h', 'H']).unwrap_or(text)
}

fn real_value(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Decodes the code of a character literal such as `'a'` or `'\x41'`.
fn char_value(text: &str) -> Option<u32> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = body.chars();
    let value = match chars.next()? {
        '\\' => unescape(&mut chars)?,
        ch => ch,
    };
    chars.next().is_none().then_some(u32::from(value))
}

/// Decodes the body of a string literal, resolving its escapes.
pub(super) fn string_value(text: &str) -> EcoString {
    let body = text
        .strip_prefix('"')
        .and_then(|body| body.strip_suffix('"'))
        .unwrap_or(text);

    let mut value = EcoString::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        let rest = chars.clone();
        match unescape(&mut chars) {
            Some(decoded) => value.push(decoded),
            None => {
                value.push('\\');
                chars = rest;
            }
        }
    }
    value
}

/// Decodes the escape sequence following a backslash.
fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let decoded = match chars.next()? {
        'i' => '\u{10}',
        'p' => '\u{11}',
        'f' => '\u{12}',
        'b' => '\u{13}',
        'I' => '\u{14}',
        'o' => '\u{15}',
        'a' => '\u{16}',
        't' => '\u{17}',
        'P' => '\u{60}',
        'C' => '\u{7f}',
        '0' => '\0',
        ch @ ('\'' | '"' | '\\') => ch,
        'x' => {
            let high = chars.next()?.to_digit(16)?;
            let low = chars.next()?.to_digit(16)?;
            char::from_u32(high * 16 + low)?
        }
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LineNode, Operand, Register};
    use crate::source_analysis::{ErrorCode, TokenLocation, parse};

    /// Parses `defb <expr>` and returns the expression.
    fn parse_expr(source: &str) -> Expression {
        let result = parse(&format!("defb {source}"));
        assert!(!result.has_errors(), "Expected no errors, got: {:?}", result.errors);
        match result.assembly_lines.into_iter().next().map(|line| line.node) {
            Some(LineNode::DefbPragma { mut values }) if values.len() == 1 => values.remove(0),
            other => panic!("Expected a single defb value, got {other:?}"),
        }
    }

    fn first_error(source: &str) -> ErrorCode {
        let result = parse(source);
        assert!(result.has_errors(), "Expected errors for {source:?}");
        result.errors[0].code
    }

    fn int(expr: &Expression) -> i64 {
        match expr {
            Expression::IntegerLiteral { value, .. } => *value,
            other => panic!("Expected integer literal, got {other:?}"),
        }
    }

    #[test]
    fn integer_literal_forms() {
        assert_eq!(int(&parse_expr("#4000")), 0x4000);
        assert_eq!(int(&parse_expr("$ff")), 0xff);
        assert_eq!(int(&parse_expr("0x1234")), 0x1234);
        assert_eq!(int(&parse_expr("0fh")), 0x0f);
        assert_eq!(int(&parse_expr("0b1h")), 0xb1);
        assert_eq!(int(&parse_expr("%1010")), 10);
        assert_eq!(int(&parse_expr("0b1111_0000")), 0xf0);
        assert_eq!(int(&parse_expr("17q")), 15);
        assert_eq!(int(&parse_expr("777o")), 511);
        assert_eq!(int(&parse_expr("1234")), 1234);
    }

    #[test]
    fn char_literal_values() {
        assert_eq!(int(&parse_expr("'A'")), 65);
        assert_eq!(int(&parse_expr(r"'\i'")), 0x10);
        assert_eq!(int(&parse_expr(r"'\C'")), 0x7f);
        assert_eq!(int(&parse_expr(r"'\P'")), 0x60);
        assert_eq!(int(&parse_expr(r"'\x41'")), 0x41);
        assert_eq!(int(&parse_expr(r"'\''")), 39);
    }

    #[test]
    fn string_and_other_literals() {
        assert!(matches!(
            parse_expr(r#""a\tb""#),
            Expression::StringLiteral { ref value, .. } if value.as_str() == "a\u{17}b"
        ));
        assert!(matches!(parse_expr("1.5"), Expression::RealLiteral { value, .. } if (value - 1.5).abs() < f64::EPSILON));
        assert!(matches!(parse_expr("true"), Expression::BooleanLiteral { value: true, .. }));
        assert!(matches!(parse_expr("$"), Expression::CurrentAddress { .. }));
        assert!(matches!(parse_expr("*"), Expression::CurrentAddress { .. }));
        assert!(matches!(parse_expr("$cnt"), Expression::CurrentCounter { .. }));
    }

    #[test]
    fn out_of_range_literal() {
        assert_eq!(first_error("defb 99999999999999999999"), ErrorCode::Z1014);
    }

    #[test]
    fn precedence_and_associativity() {
        let Expression::Binary {
            operator, right, ..
        } = parse_expr("1 + 2 * 3")
        else {
            panic!("Expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::Add);
        assert_eq!(right.type_name(), "BinaryExpression");

        let Expression::Binary { operator, left, .. } = parse_expr("8 - 4 - 2") else {
            panic!("Expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::Subtract);
        assert!(matches!(*left, Expression::Binary { operator: BinaryOperator::Subtract, .. }));

        let Expression::Binary { operator, .. } = parse_expr("1 | 2 & 3 == 4") else {
            panic!("Expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::BitwiseOr);

        let Expression::Binary { operator, .. } = parse_expr("x <? y + 1") else {
            panic!("Expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::Min);
    }

    #[test]
    fn unary_and_conditional() {
        let expr = parse_expr("-~!x");
        assert!(matches!(expr, Expression::Unary { operator: UnaryOperator::Minus, .. }));
        assert_eq!(expr.location(), TokenLocation::new(5, 9, 1, 5, 9));

        let Expression::Conditional { alternate, .. } = parse_expr("x ? 1 : y ? 2 : 3") else {
            panic!("Expected conditional expression");
        };
        assert_eq!(alternate.type_name(), "ConditionalExpression");

        assert_eq!(first_error("defb x ? 1"), ErrorCode::Z1007);
    }

    #[test]
    fn symbols_and_invocations() {
        assert!(matches!(
            parse_expr("::Main"),
            Expression::Symbol { ref name, global: true, .. } if name.as_str() == "Main"
        ));
        let Expression::FunctionInvocation { name, arguments, location } = parse_expr("max(1, 2)") else {
            panic!("Expected function invocation");
        };
        assert_eq!(name, "max");
        assert_eq!(arguments.len(), 2);
        assert_eq!(location, TokenLocation::new(5, 14, 1, 5, 14));

        assert_eq!(first_error("defb ::"), ErrorCode::Z1004);
        assert_eq!(first_error("defb f(1"), ErrorCode::Z1005);
    }

    #[test]
    fn grouping_and_macro_parameters() {
        assert_eq!(parse_expr("[1 + 2] * 3").type_name(), "BinaryExpression");
        assert!(matches!(parse_expr("{{count}}"), Expression::MacroParameter { ref name, .. } if name.as_str() == "count"));
        assert_eq!(first_error("defb [1"), ErrorCode::Z1006);
        assert_eq!(first_error("defb {{x"), ErrorCode::Z1006);
        assert_eq!(first_error("defb {{}}"), ErrorCode::Z1004);
        assert_eq!(first_error("defb (1"), ErrorCode::Z1005);
        assert_eq!(first_error("defb ,"), ErrorCode::Z1003);
    }

    #[test]
    fn built_in_functions() {
        let Expression::BuiltInFunctionInvocation { function, argument, .. } = parse_expr("IsReg8(b)") else {
            panic!("Expected built-in invocation");
        };
        assert_eq!(function, "isreg8");
        assert!(matches!(
            *argument,
            BuiltInArgument::Operand(Operand::Register { register: Register::B, .. })
        ));

        let Expression::BuiltInFunctionInvocation { argument, .. } = parse_expr("textof(LDIR)") else {
            panic!("Expected built-in invocation");
        };
        assert_eq!(*argument, BuiltInArgument::Mnemonic("ldir".into()));

        let Expression::BuiltInFunctionInvocation { argument, .. } = parse_expr("iscondition(nz)") else {
            panic!("Expected built-in invocation");
        };
        assert!(matches!(*argument, BuiltInArgument::Condition(c) if c == "nz"));

        assert_eq!(first_error("defb isreg8 a"), ErrorCode::Z1005);
    }

    #[test]
    fn escape_decoding() {
        assert_eq!(char_value(r"'\0'"), Some(0));
        assert_eq!(char_value(r"'\q'"), None);
        assert_eq!(string_value(r#""\"quoted\"""#), "\"quoted\"");
        assert_eq!(hex_digits("0ABh"), "0AB");
    }
}
