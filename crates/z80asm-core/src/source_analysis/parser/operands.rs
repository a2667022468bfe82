// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Operand parsing and the operand shapes each mnemonic accepts.

use ecow::EcoString;

use super::{Diagnostic, LineResult, Parser, binary_binding_power};
use crate::ast::{Expression, OffsetSign, Operand, Register};
use crate::source_analysis::{SyntaxError, TokenType, traits};

use Register as R;
use Shape as S;

/// A class of operands an instruction form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shape {
    /// `a b c d e h l`
    Reg8,
    /// `xl xh yl yh`
    Reg8Idx,
    /// `bc de hl sp`
    Reg16,
    /// Exactly this register.
    Reg(Register),
    /// `(bc)`, `(de)`, `(hl)` or `(sp)` for this register.
    Indirect(Register),
    /// `(ix+e)`, `(iy-e)`, `(ix)`...
    Indexed,
    /// `(c)`
    CPort,
    /// `(expr)`
    Memory,
    /// An immediate value.
    Expr,
}

impl Shape {
    /// Returns `true` if `operand` has this shape. Macro parameters match
    /// every shape since they are only known after expansion.
    pub(super) fn matches(self, operand: &Operand) -> bool {
        match (self, operand) {
            (_, Operand::MacroParameter { .. }) => true,
            (Self::Reg8, Operand::Register { register, .. }) => {
                traits(register.token_type()).reg8()
            }
            (Self::Reg8Idx, Operand::Register { register, .. }) => {
                traits(register.token_type()).reg8_idx()
            }
            (Self::Reg16, Operand::Register { register, .. }) => {
                traits(register.token_type()).reg16()
            }
            (Self::Reg(expected), Operand::Register { register, .. })
            | (Self::Indirect(expected), Operand::RegisterIndirect { register, .. }) => {
                *register == expected
            }
            (Self::Indexed, Operand::IndexedIndirect { .. })
            | (Self::CPort, Operand::CPort { .. })
            | (Self::Memory, Operand::MemoryIndirect { .. })
            | (Self::Expr, Operand::Expression(_)) => true,
            _ => false,
        }
    }
}

/// One accepted operand form: a first operand shape and, for two-operand
/// forms, the shapes the second operand may take.
#[derive(Debug, Clone, Copy)]
pub(super) struct Form {
    pub(super) first: Shape,
    pub(super) second: Option<&'static [Shape]>,
}

const fn one(first: Shape) -> Form {
    Form {
        first,
        second: None,
    }
}

const fn two(first: Shape, second: &'static [Shape]) -> Form {
    Form {
        first,
        second: Some(second),
    }
}

/// Sources of 8-bit arithmetic and logic.
const ALU8_SOURCE: &[Shape] = &[S::Reg8, S::Reg8Idx, S::Expr, S::Indirect(R::Hl), S::Indexed];

/// Targets of 8-bit shifts, rotations and bit operations.
const BIT_TARGET: &[Shape] = &[S::Reg8, S::Indirect(R::Hl), S::Indexed];

const LD_FORMS: &[Form] = &[
    two(
        S::Reg(R::A),
        &[S::Indirect(R::Bc), S::Indirect(R::De), S::Memory, S::Reg(R::I), S::Reg(R::R)],
    ),
    two(S::Reg8, &[S::Reg8, S::Reg8Idx, S::Expr, S::Indirect(R::Hl), S::Indexed]),
    two(S::Reg8Idx, &[S::Reg8, S::Reg8Idx, S::Expr]),
    two(S::Reg(R::I), &[S::Reg(R::A)]),
    two(S::Reg(R::R), &[S::Reg(R::A)]),
    two(S::Indirect(R::Bc), &[S::Reg(R::A)]),
    two(S::Indirect(R::De), &[S::Reg(R::A)]),
    two(S::Indirect(R::Hl), &[S::Reg8, S::Expr]),
    two(S::Indexed, &[S::Reg8, S::Expr]),
    two(S::Memory, &[S::Reg(R::A), S::Reg16, S::Reg(R::Ix), S::Reg(R::Iy)]),
    two(S::Reg16, &[S::Expr, S::Memory]),
    two(S::Reg(R::Sp), &[S::Reg(R::Hl), S::Reg(R::Ix), S::Reg(R::Iy)]),
    two(S::Reg(R::Ix), &[S::Expr, S::Memory]),
    two(S::Reg(R::Iy), &[S::Expr, S::Memory]),
];

const INC_DEC_FORMS: &[Form] = &[
    one(S::Reg8),
    one(S::Reg8Idx),
    one(S::Reg16),
    one(S::Reg(R::Ix)),
    one(S::Reg(R::Iy)),
    one(S::Indirect(R::Hl)),
    one(S::Indexed),
];

const EX_FORMS: &[Form] = &[
    two(S::Reg(R::Af), &[S::Reg(R::AfPrime)]),
    two(S::Reg(R::De), &[S::Reg(R::Hl)]),
    two(S::Indirect(R::Sp), &[S::Reg(R::Hl), S::Reg(R::Ix), S::Reg(R::Iy)]),
];

const ADD_FORMS: &[Form] = &[
    two(S::Reg(R::A), ALU8_SOURCE),
    two(
        S::Reg(R::Hl),
        &[S::Reg(R::Bc), S::Reg(R::De), S::Reg(R::Hl), S::Reg(R::Sp), S::Reg(R::A), S::Expr],
    ),
    two(S::Reg(R::De), &[S::Reg(R::A), S::Expr]),
    two(S::Reg(R::Bc), &[S::Reg(R::A), S::Expr]),
    two(S::Reg(R::Ix), &[S::Reg(R::Bc), S::Reg(R::De), S::Reg(R::Ix), S::Reg(R::Sp)]),
    two(S::Reg(R::Iy), &[S::Reg(R::Bc), S::Reg(R::De), S::Reg(R::Iy), S::Reg(R::Sp)]),
];

const ADC_SBC_FORMS: &[Form] = &[two(S::Reg(R::A), ALU8_SOURCE), two(S::Reg(R::Hl), &[S::Reg16])];

const ALU_FORMS: &[Form] = &[
    one(S::Reg8),
    one(S::Reg8Idx),
    one(S::Expr),
    one(S::Indirect(R::Hl)),
    one(S::Indexed),
    two(S::Reg(R::A), ALU8_SOURCE),
];

const PUSH_FORMS: &[Form] = &[
    one(S::Reg(R::Bc)),
    one(S::Reg(R::De)),
    one(S::Reg(R::Hl)),
    one(S::Reg(R::Af)),
    one(S::Reg(R::Ix)),
    one(S::Reg(R::Iy)),
    one(S::Expr),
];

const POP_FORMS: &[Form] = &[
    one(S::Reg(R::Bc)),
    one(S::Reg(R::De)),
    one(S::Reg(R::Hl)),
    one(S::Reg(R::Af)),
    one(S::Reg(R::Ix)),
    one(S::Reg(R::Iy)),
];

const SHIFT_ROTATE_FORMS: &[Form] = &[
    one(S::Reg8),
    one(S::Indirect(R::Hl)),
    one(S::Indexed),
    two(S::Indexed, &[S::Reg8]),
];

const BIT_FORMS: &[Form] = &[two(S::Expr, BIT_TARGET)];

const IN_FORMS: &[Form] = &[
    two(S::Reg8, &[S::CPort]),
    two(S::Reg(R::A), &[S::Memory]),
    one(S::CPort),
];

const OUT_FORMS: &[Form] = &[
    two(S::CPort, &[S::Reg8, S::Expr]),
    two(S::Memory, &[S::Reg(R::A)]),
];

/// Returns the operand forms of a table-validated mnemonic.
pub(super) fn operand_forms(mnemonic: TokenType) -> &'static [Form] {
    use TokenType as T;

    match mnemonic {
        T::Ld => LD_FORMS,
        T::Inc | T::Dec => INC_DEC_FORMS,
        T::Ex => EX_FORMS,
        T::Add => ADD_FORMS,
        T::Adc | T::Sbc => ADC_SBC_FORMS,
        T::Sub | T::And | T::Xor | T::Or | T::Cp => ALU_FORMS,
        T::Push => PUSH_FORMS,
        T::Pop => POP_FORMS,
        T::Rlc | T::Rrc | T::Rl | T::Rr | T::Sla | T::Sra | T::Sll | T::Srl => SHIFT_ROTATE_FORMS,
        T::Bit | T::Res | T::Set => BIT_FORMS,
        T::In => IN_FORMS,
        T::Out => OUT_FORMS,
        _ => &[],
    }
}

impl Parser<'_> {
    // ========================================================================
    // Operand Parsing
    // ========================================================================

    /// Parses an operand, failing with `Z1003` when none starts here.
    pub(super) fn parse_operand(&mut self) -> LineResult<Operand> {
        match self.try_parse_operand()? {
            Some(operand) => Ok(operand),
            None => Err(self.error_here(&SyntaxError::OperandExpected)),
        }
    }

    /// Parses an operand if the next token can start one.
    pub(super) fn try_parse_operand(&mut self) -> LineResult<Option<Operand>> {
        let token = self.current_token();
        let token_type = token.token_type();

        if let Some(register) = Register::from_token_type(token_type) {
            self.advance();
            return Ok(Some(Operand::Register {
                register,
                location: token.location(),
            }));
        }

        match token_type {
            TokenType::NoneArg => {
                self.advance();
                Ok(Some(Operand::NoneArg {
                    location: token.location(),
                }))
            }
            TokenType::LPar => self.parse_parenthesized_operand().map(Some),
            _ if traits(token_type).expression_start() => {
                let expr = self.parse_expression()?;
                Ok(Some(match expr {
                    Expression::MacroParameter { name, location } => {
                        Operand::MacroParameter { name, location }
                    }
                    expr => Operand::Expression(expr),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Parses an operand starting with `(`.
    fn parse_parenthesized_operand(&mut self) -> LineResult<Operand> {
        let inner = self.peek_type_at(1);
        let closes = self.peek_type_at(2) == TokenType::RPar;

        let register = Register::from_token_type(inner);
        match register {
            Some(register @ (R::Bc | R::De | R::Hl | R::Sp)) if closes => {
                let open = self.advance();
                self.advance();
                let close = self.advance();
                return Ok(Operand::RegisterIndirect {
                    register,
                    location: open.location().to(close.location()),
                });
            }
            Some(R::C) if closes => {
                let open = self.advance();
                self.advance();
                let close = self.advance();
                return Ok(Operand::CPort {
                    location: open.location().to(close.location()),
                });
            }
            Some(register @ (R::Ix | R::Iy)) => return self.parse_indexed_operand(register),
            _ => {}
        }

        // `(expr)` is a memory address unless an operator continues it
        // as an ordinary expression: `(1+2)*3`.
        let open = self.advance();
        self.enter_nesting()?;
        let address = self.parse_expression();
        self.leave_nesting();
        let address = address?;
        let close = self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        let location = open.location().to(close.location());

        let current = self.current_type();
        if binary_binding_power(current).is_some() || current == TokenType::QuestionMark {
            let left = Expression::Parenthesized {
                inner: Box::new(address),
                location,
            };
            let expr = self.continue_binary(left, 0)?;
            let expr = self.continue_conditional(expr)?;
            return Ok(Operand::Expression(expr));
        }

        Ok(Operand::MemoryIndirect {
            address: Box::new(address),
            location,
        })
    }

    /// Parses `(ix)`, `(ix+e)` or `(ix-e)` and the `iy` forms.
    fn parse_indexed_operand(&mut self, register: Register) -> LineResult<Operand> {
        let open = self.advance();
        self.advance();

        let sign = match self.current_type() {
            TokenType::Plus => Some(OffsetSign::Plus),
            TokenType::Minus => Some(OffsetSign::Minus),
            _ => None,
        };
        let offset = match sign {
            Some(sign) => {
                self.advance();
                Some((sign, Box::new(self.parse_expression()?)))
            }
            None => None,
        };

        let close = self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        Ok(Operand::IndexedIndirect {
            register,
            offset,
            location: open.location().to(close.location()),
        })
    }

    /// Parses the operands of a table-validated instruction.
    ///
    /// The first operand must fit some form (`Z1008`). Without a comma one
    /// of the fitting forms must take a single operand (`Z1007`); after a
    /// comma the second operand must parse (`Z1012`) and fit one of their
    /// second shapes (`Z1009`).
    pub(super) fn parse_operands(
        &mut self,
        mnemonic: &EcoString,
        forms: &[Form],
    ) -> LineResult<(Operand, Option<Operand>)> {
        if self.at_line_end() {
            return Err(self.error_here(&SyntaxError::OperandsExpected(mnemonic.clone())));
        }

        let first = self.parse_operand()?;
        let fitting: Vec<&Form> = forms.iter().filter(|form| form.first.matches(&first)).collect();
        if fitting.is_empty() {
            return Err(Diagnostic::new(
                &SyntaxError::InvalidFirstOperand(mnemonic.clone()),
                first.location(),
            ));
        }

        if !self.match_token(TokenType::Comma) {
            if fitting.iter().any(|form| form.second.is_none()) {
                return Ok((first, None));
            }
            return Err(self.error_here(&SyntaxError::CommaExpected));
        }

        let Some(second) = self.try_parse_operand()? else {
            return Err(self.error_here(&SyntaxError::SecondOperandExpected(mnemonic.clone())));
        };
        let fits = fitting.iter().any(|form| {
            form.second
                .is_some_and(|shapes| shapes.iter().any(|shape| shape.matches(&second)))
        });
        if !fits {
            return Err(Diagnostic::new(
                &SyntaxError::InvalidSecondOperand(mnemonic.clone()),
                second.location(),
            ));
        }
        Ok((first, Some(second)))
    }
}
