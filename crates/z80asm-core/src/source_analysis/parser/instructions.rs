// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Instruction parsing.
//!
//! Control flow and Next-specific instructions have dedicated productions;
//! every other mnemonic is validated against its operand forms (see
//! `operand_forms`).

use ecow::EcoString;

use super::expressions::lowercase;
use super::operands::operand_forms;
use super::{LineResult, Parser};
use crate::ast::{Condition, LineNode, Operand};
use crate::source_analysis::{SyntaxError, TokenType, traits};

impl Parser<'_> {
    /// Parses an instruction line body, mnemonic included.
    pub(super) fn parse_instruction(&mut self) -> LineResult<LineNode> {
        use TokenType as T;

        let token = self.advance();
        let token_type = token.token_type();
        let mnemonic = lowercase(&token);

        if traits(token_type).simple() {
            return Ok(LineNode::SimpleZ80Instruction { mnemonic });
        }

        match token_type {
            T::Djnz => Ok(LineNode::DjnzInstruction {
                target: self.parse_expression()?,
            }),
            T::Rst => Ok(LineNode::RstInstruction {
                target: self.parse_expression()?,
            }),
            T::Im => Ok(LineNode::ImInstruction {
                mode: self.parse_expression()?,
            }),
            T::Jr => {
                let condition = self.parse_jump_condition(true)?;
                Ok(LineNode::JrInstruction {
                    condition,
                    target: self.parse_expression()?,
                })
            }
            T::Jp => self.parse_jp(),
            T::Call => {
                let condition = self.parse_jump_condition(false)?;
                Ok(LineNode::CallInstruction {
                    condition,
                    target: self.parse_expression()?,
                })
            }
            T::Ret => {
                let condition = Condition::from_token_type(self.current_type());
                if condition.is_some() {
                    self.advance();
                }
                Ok(LineNode::RetInstruction { condition })
            }
            T::Test => Ok(LineNode::TestInstruction {
                expr: self.parse_expression()?,
            }),
            T::Nextreg => self.parse_nextreg(mnemonic),
            T::Mirror => {
                if self.match_token(T::A) {
                    Ok(LineNode::MirrorInstruction)
                } else {
                    Err(self.error_here(&SyntaxError::InvalidSingleOperand(mnemonic)))
                }
            }
            T::Mul => self.parse_mul(mnemonic),
            T::Bsla | T::Bsra | T::Bsrl | T::Bsrf | T::Brlc => self.parse_barrel_shift(mnemonic),
            _ => self.parse_table_instruction(token_type, mnemonic),
        }
    }

    /// Parses an optional `condition ,` prefix. Relative jumps only know
    /// `z nz c nc`.
    fn parse_jump_condition(&mut self, relative: bool) -> LineResult<Option<Condition>> {
        let token_type = self.current_type();
        let token_traits = traits(token_type);
        let accepted = if relative {
            token_traits.rel_condition()
        } else {
            token_traits.condition()
        };
        let Some(condition) = Condition::from_token_type(token_type).filter(|_| accepted) else {
            return Ok(None);
        };
        self.advance();
        self.expect(TokenType::Comma, SyntaxError::CommaExpected)?;
        Ok(Some(condition))
    }

    /// Parses `jp [cond,] expr` and the register forms `jp (hl)`,
    /// `jp (ix)`, `jp (iy)` and `jp (c)`.
    fn parse_jp(&mut self) -> LineResult<LineNode> {
        let condition = self.parse_jump_condition(false)?;

        let register_target = condition.is_none()
            && self.check(TokenType::LPar)
            && matches!(
                self.peek_type_at(1),
                TokenType::Hl | TokenType::Ix | TokenType::Iy | TokenType::C
            )
            && self.peek_type_at(2) == TokenType::RPar;

        let target = if register_target {
            self.parse_operand()?
        } else {
            Operand::Expression(self.parse_expression()?)
        };
        Ok(LineNode::JpInstruction { condition, target })
    }

    /// Parses `nextreg reg, value` where `value` is an expression or `a`.
    fn parse_nextreg(&mut self, mnemonic: EcoString) -> LineResult<LineNode> {
        let register = self.parse_expression()?;
        self.expect(TokenType::Comma, SyntaxError::CommaExpected)?;

        if self.match_token(TokenType::A) {
            return Ok(LineNode::NextRegInstruction {
                register,
                value: None,
            });
        }
        match self.try_parse_expression()? {
            Some(value) => Ok(LineNode::NextRegInstruction {
                register,
                value: Some(value),
            }),
            None => Err(self.error_here(&SyntaxError::SecondOperandExpected(mnemonic))),
        }
    }

    /// Parses `mul d,e`.
    fn parse_mul(&mut self, mnemonic: EcoString) -> LineResult<LineNode> {
        if self.at_line_end() {
            return Err(self.error_here(&SyntaxError::OperandsExpected(mnemonic)));
        }
        if !self.match_token(TokenType::D) {
            return Err(self.error_here(&SyntaxError::InvalidFirstOperand(mnemonic)));
        }
        self.expect(TokenType::Comma, SyntaxError::CommaExpected)?;
        if !self.match_token(TokenType::E) {
            return Err(self.error_here(&SyntaxError::SecondOperandExpected(mnemonic)));
        }
        Ok(LineNode::MulInstruction)
    }

    /// Parses the Next barrel shifts, which only take `de,b`.
    fn parse_barrel_shift(&mut self, mnemonic: EcoString) -> LineResult<LineNode> {
        if self.at_line_end() {
            return Err(self.error_here(&SyntaxError::OperandsExpected(mnemonic)));
        }
        if !self.match_token(TokenType::De) {
            return Err(self.error_here(&SyntaxError::InvalidFirstOperand(mnemonic)));
        }
        self.expect(TokenType::Comma, SyntaxError::CommaExpected)?;
        if !self.match_token(TokenType::B) {
            return Err(self.error_here(&SyntaxError::InvalidSecondOperand(mnemonic)));
        }
        Ok(LineNode::SimpleZ80Instruction { mnemonic })
    }

    /// Parses an instruction whose operands are validated against its forms.
    fn parse_table_instruction(
        &mut self,
        token_type: TokenType,
        mnemonic: EcoString,
    ) -> LineResult<LineNode> {
        use TokenType as T;

        let (first, second) = self.parse_operands(&mnemonic, operand_forms(token_type))?;

        let node = match (token_type, second) {
            (T::Ld, Some(source)) => LineNode::LdInstruction {
                destination: first,
                source,
            },
            (T::Ex, Some(second)) => LineNode::ExInstruction { first, second },
            (T::Inc, None) => LineNode::IncInstruction { operand: first },
            (T::Dec, None) => LineNode::DecInstruction { operand: first },
            (T::Push | T::Pop, None) => LineNode::StackInstruction {
                mnemonic,
                operand: first,
            },
            (T::Add | T::Adc | T::Sub | T::Sbc | T::And | T::Xor | T::Or | T::Cp, second) => {
                LineNode::AluInstruction {
                    mnemonic,
                    operands: operand_list(first, second),
                }
            }
            (T::Rlc | T::Rrc | T::Rl | T::Rr | T::Sla | T::Sra | T::Sll | T::Srl, second) => {
                LineNode::ShiftRotateInstruction {
                    mnemonic,
                    operands: operand_list(first, second),
                }
            }
            (T::Bit | T::Res | T::Set, second) => LineNode::BitInstruction {
                mnemonic,
                operands: operand_list(first, second),
            },
            (T::In | T::Out, second) => LineNode::IoInstruction {
                mnemonic,
                operands: operand_list(first, second),
            },
            // `parse_operands` only accepts operand counts the forms allow
            (token_type, second) => unreachable!(
                "{token_type} accepted {} operand(s) without a matching node",
                1 + usize::from(second.is_some())
            ),
        };
        Ok(node)
    }
}

fn operand_list(first: Operand, second: Option<Operand>) -> Vec<Operand> {
    std::iter::once(first).chain(second).collect()
}
