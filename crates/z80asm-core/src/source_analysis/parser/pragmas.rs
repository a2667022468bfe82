// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pragma, statement and directive parsing.

use super::expressions::{lowercase, string_value};
use super::{Diagnostic, LineResult, Parser};
use crate::ast::{Expression, Identifier, Label, LineNode};
use crate::source_analysis::{SyntaxError, Token, TokenType};

impl Parser<'_> {
    // ========================================================================
    // Pragmas
    // ========================================================================

    /// Parses a pragma line body, keyword included.
    pub(super) fn parse_pragma(&mut self, label: Option<&Label>) -> LineResult<LineNode> {
        use TokenType as T;

        let token = self.advance();
        let node = match token.token_type() {
            T::Org => LineNode::OrgPragma {
                address: self.parse_expression()?,
            },
            T::Xorg => LineNode::XorgPragma {
                address: self.parse_expression()?,
            },
            T::Ent => LineNode::EntPragma {
                address: self.parse_expression()?,
            },
            T::Xent => LineNode::XentPragma {
                address: self.parse_expression()?,
            },
            T::Disp => LineNode::DispPragma {
                offset: self.parse_expression()?,
            },
            T::Equ => {
                require_label(label, &token)?;
                LineNode::EquPragma {
                    value: self.parse_expression()?,
                }
            }
            T::Var | T::Assign => {
                require_label(label, &token)?;
                LineNode::VarPragma {
                    value: self.parse_expression()?,
                }
            }
            T::Defb => LineNode::DefbPragma {
                values: self.parse_expression_list()?,
            },
            T::Defw => LineNode::DefwPragma {
                values: self.parse_expression_list()?,
            },
            T::Defm => LineNode::DefmPragma {
                message: self.parse_expression()?,
            },
            T::Defn => LineNode::DefnPragma {
                message: self.parse_expression()?,
            },
            T::Defh => LineNode::DefhPragma {
                bytes: self.parse_expression()?,
            },
            T::Defgx => LineNode::DefgxPragma {
                pattern: self.parse_expression()?,
            },
            T::Defg => LineNode::DefgPragma {
                pattern: self.parse_expression()?,
            },
            T::Defc => LineNode::DefcPragma {
                message: self.parse_expression()?,
            },
            T::Error => LineNode::ErrorPragma {
                message: self.parse_expression()?,
            },
            T::Defs => {
                let count = self.parse_expression()?;
                LineNode::DefsPragma {
                    count,
                    fill: self.parse_optional_argument()?,
                }
            }
            T::Skip => {
                let address = self.parse_expression()?;
                LineNode::SkipPragma {
                    address,
                    fill: self.parse_optional_argument()?,
                }
            }
            T::Fillb => {
                let (count, value) = self.parse_expression_pair()?;
                LineNode::FillbPragma { count, value }
            }
            T::Fillw => {
                let (count, value) = self.parse_expression_pair()?;
                LineNode::FillwPragma { count, value }
            }
            T::Extern => LineNode::ExternPragma,
            T::ZxBasic => LineNode::ZxBasicPragma,
            T::Model => {
                // `next` is a statement keyword but also a model name
                let model = if self.check(T::Identifier) || self.check(T::Next) {
                    self.advance().into_text()
                } else {
                    return Err(self.error_here(&SyntaxError::IdentifierExpected));
                };
                LineNode::ModelPragma { model }
            }
            T::Align => LineNode::AlignPragma {
                alignment: self.try_parse_expression()?,
            },
            T::RndSeed => LineNode::RndSeedPragma {
                seed: self.try_parse_expression()?,
            },
            T::Trace => LineNode::TracePragma {
                values: self.parse_expression_list()?,
            },
            T::TraceHex => LineNode::TraceHexPragma {
                values: self.parse_expression_list()?,
            },
            T::IncludeBin => {
                let (filename, offset, length) = self.parse_binary_file_arguments()?;
                LineNode::IncludeBinPragma {
                    filename,
                    offset,
                    length,
                }
            }
            T::CompareBin => {
                let (filename, offset, length) = self.parse_binary_file_arguments()?;
                LineNode::CompareBinPragma {
                    filename,
                    offset,
                    length,
                }
            }
            T::Bank => {
                let bank = self.parse_expression()?;
                LineNode::BankPragma {
                    bank,
                    offset: self.parse_optional_argument()?,
                }
            }
            T::InjectOpt => LineNode::InjectOptPragma {
                options: self.parse_identifier_list()?,
            },
            _ => {
                return Err(Diagnostic::new(
                    &SyntaxError::InvalidLineStart(token.text().into()),
                    token.location(),
                ));
            }
        };
        Ok(node)
    }

    /// Parses `expr, expr`.
    fn parse_expression_pair(&mut self) -> LineResult<(Expression, Expression)> {
        let first = self.parse_expression()?;
        self.expect(TokenType::Comma, SyntaxError::CommaExpected)?;
        Ok((first, self.parse_expression()?))
    }

    /// Parses `, expr` when a comma follows.
    fn parse_optional_argument(&mut self) -> LineResult<Option<Expression>> {
        if self.match_token(TokenType::Comma) {
            self.parse_expression().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parses `filename [, offset [, length]]`.
    fn parse_binary_file_arguments(
        &mut self,
    ) -> LineResult<(Expression, Option<Expression>, Option<Expression>)> {
        let filename = self.parse_expression()?;
        let offset = self.parse_optional_argument()?;
        let length = if offset.is_some() {
            self.parse_optional_argument()?
        } else {
            None
        };
        Ok((filename, offset, length))
    }

    /// Parses one or more comma-separated expressions.
    fn parse_expression_list(&mut self) -> LineResult<Vec<Expression>> {
        let mut values = vec![self.parse_expression()?];
        while self.match_token(TokenType::Comma) {
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parses a statement line body, keyword included.
    pub(super) fn parse_statement(&mut self, label: Option<&Label>) -> LineResult<LineNode> {
        use TokenType as T;

        let token = self.advance();
        let node = match token.token_type() {
            T::Macro => {
                require_label(label, &token)?;
                LineNode::MacroStatement {
                    parameters: self.parse_macro_parameters()?,
                }
            }
            T::Endm => LineNode::MacroEndStatement,
            T::Proc => LineNode::ProcStatement,
            T::Endp => LineNode::ProcEndStatement,
            T::Loop => LineNode::LoopStatement {
                count: self.parse_expression()?,
            },
            T::Endl => LineNode::LoopEndStatement,
            T::Repeat => LineNode::RepeatStatement,
            T::Until => LineNode::UntilStatement {
                condition: self.parse_expression()?,
            },
            T::While => LineNode::WhileStatement {
                condition: self.parse_expression()?,
            },
            T::Endw => LineNode::WhileEndStatement,
            T::If => LineNode::IfStatement {
                condition: self.parse_expression()?,
            },
            T::IfUsed => LineNode::IfUsedStatement {
                symbol: self.parse_symbol()?,
            },
            T::IfNUsed => LineNode::IfNUsedStatement {
                symbol: self.parse_symbol()?,
            },
            T::Elif => LineNode::ElifStatement {
                condition: self.parse_expression()?,
            },
            T::Else => LineNode::ElseStatement,
            T::Endif => LineNode::EndIfStatement,
            T::For => self.parse_for()?,
            T::Next => LineNode::NextStatement,
            T::Break => LineNode::BreakStatement,
            T::Continue => LineNode::ContinueStatement,
            T::Module => LineNode::ModuleStatement {
                name: if self.check(T::Identifier) {
                    Some(self.expect_identifier()?)
                } else {
                    None
                },
            },
            T::EndModule => LineNode::ModuleEndStatement,
            T::Struct => LineNode::StructStatement,
            T::Ends => LineNode::StructEndStatement,
            T::Local => LineNode::LocalStatement {
                identifiers: self.parse_identifier_list()?,
            },
            _ => {
                return Err(Diagnostic::new(
                    &SyntaxError::InvalidLineStart(token.text().into()),
                    token.location(),
                ));
            }
        };
        Ok(node)
    }

    /// Parses the optional `(param, ...)` list of a macro definition.
    fn parse_macro_parameters(&mut self) -> LineResult<Vec<Identifier>> {
        if !self.match_token(TokenType::LPar) {
            return Ok(Vec::new());
        }
        let parameters = if self.check(TokenType::RPar) {
            Vec::new()
        } else {
            self.parse_identifier_list()?
        };
        self.expect(TokenType::RPar, SyntaxError::ClosingParenExpected)?;
        Ok(parameters)
    }

    /// Parses `for id = from to to [step step]` after the keyword.
    fn parse_for(&mut self) -> LineResult<LineNode> {
        let variable = self.expect_identifier()?;
        self.expect(TokenType::Assign, SyntaxError::ForKeywordExpected("="))?;
        let from = self.parse_expression()?;
        self.expect(TokenType::To, SyntaxError::ForKeywordExpected("to"))?;
        let to = self.parse_expression()?;
        let step = if self.match_token(TokenType::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(LineNode::ForStatement {
            variable,
            from,
            to,
            step,
        })
    }

    /// Parses `name` or `::name` as a symbol expression.
    fn parse_symbol(&mut self) -> LineResult<Expression> {
        if self.check(TokenType::Identifier) || self.check(TokenType::DoubleColon) {
            self.parse_expression()
        } else {
            Err(self.error_here(&SyntaxError::IdentifierExpected))
        }
    }

    fn expect_identifier(&mut self) -> LineResult<Identifier> {
        let token = self.expect(TokenType::Identifier, SyntaxError::IdentifierExpected)?;
        let location = token.location();
        Ok(Identifier::new(token.into_text(), location))
    }

    /// Parses one or more comma-separated identifiers.
    fn parse_identifier_list(&mut self) -> LineResult<Vec<Identifier>> {
        let mut identifiers = vec![self.expect_identifier()?];
        while self.match_token(TokenType::Comma) {
            identifiers.push(self.expect_identifier()?);
        }
        Ok(identifiers)
    }

    // ========================================================================
    // Directives
    // ========================================================================

    /// Parses a preprocessor directive line body, keyword included.
    pub(super) fn parse_directive(&mut self) -> LineResult<LineNode> {
        use TokenType as T;

        let token = self.advance();
        let node = match token.token_type() {
            T::IfDefDir => LineNode::IfDefDirective {
                identifier: self.expect_identifier()?,
            },
            T::IfNDefDir => LineNode::IfNDefDirective {
                identifier: self.expect_identifier()?,
            },
            T::DefineDir => LineNode::DefineDirective {
                identifier: self.expect_identifier()?,
            },
            T::UndefDir => LineNode::UndefDirective {
                identifier: self.expect_identifier()?,
            },
            T::IfModDir => LineNode::IfModDirective {
                identifier: self.expect_identifier()?,
            },
            T::IfNModDir => LineNode::IfNModDirective {
                identifier: self.expect_identifier()?,
            },
            T::EndIfDir => LineNode::EndIfDirective,
            T::ElseDir => LineNode::ElseDirective,
            T::IfDir => LineNode::IfDirective {
                condition: self.parse_expression()?,
            },
            T::IncludeDir => {
                let filename = self.expect(T::StringLiteral, SyntaxError::StringExpected)?;
                LineNode::IncludeDirective {
                    filename: string_value(filename.text()),
                }
            }
            T::LineDir => {
                let line = self.parse_expression()?;
                let file = if self.check(T::StringLiteral) {
                    Some(string_value(self.advance().text()))
                } else {
                    None
                };
                LineNode::LineDirective { line, file }
            }
            _ => {
                return Err(Diagnostic::new(
                    &SyntaxError::InvalidLineStart(token.text().into()),
                    token.location(),
                ));
            }
        };
        Ok(node)
    }
}

/// Fails with `Z1004` at `keyword` when the line has no label.
fn require_label(label: Option<&Label>, keyword: &Token) -> LineResult<()> {
    match label {
        Some(_) => Ok(()),
        None => Err(Diagnostic::new(
            &SyntaxError::LabelRequired(lowercase(keyword)),
            keyword.location(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{AssemblyLine, Expression, LineNode};
    use crate::source_analysis::{ErrorCode, parse};

    fn parse_ok(source: &str) -> Vec<AssemblyLine> {
        let result = parse(source);
        assert!(!result.has_errors(), "Expected no errors, got: {:?}", result.errors);
        result.assembly_lines
    }

    fn first_error(source: &str) -> ErrorCode {
        let result = parse(source);
        assert!(result.has_errors(), "Expected errors for {source:?}");
        result.errors[0].code
    }

    fn type_names(source: &str) -> Vec<&'static str> {
        parse_ok(source).iter().map(AssemblyLine::type_name).collect()
    }

    #[test]
    fn address_pragmas() {
        assert_eq!(
            type_names(".org #8000\nxorg 0\nent $\n.xent start\ndisp #100"),
            vec!["OrgPragma", "XorgPragma", "EntPragma", "XentPragma", "DispPragma"]
        );
    }

    #[test]
    fn value_pragmas_require_label() {
        assert_eq!(
            type_names("size equ 10\ncounter .var 1\nx = 2\ny := 3"),
            vec!["EquPragma", "VarPragma", "VarPragma", "VarPragma"]
        );
        let result = parse("  equ 10");
        assert_eq!(result.errors[0].code, ErrorCode::Z1004);
        assert_eq!(result.errors[0].message, "'equ' requires a label");
        assert_eq!(first_error("= 2"), ErrorCode::Z1004);
    }

    #[test]
    fn data_pragmas() {
        let lines = parse_ok("defb 1, 2, \"abc\"\n.defw #1234\ndefm \"hello\"\ndefs 10, #ff\nfillw 4, #1234");
        assert!(matches!(lines[0].node, LineNode::DefbPragma { ref values } if values.len() == 3));
        assert!(matches!(lines[1].node, LineNode::DefwPragma { ref values } if values.len() == 1));
        assert_eq!(lines[2].type_name(), "DefmPragma");
        assert!(matches!(lines[3].node, LineNode::DefsPragma { fill: Some(_), .. }));
        assert_eq!(lines[4].type_name(), "FillwPragma");

        assert_eq!(first_error("fillb 4"), ErrorCode::Z1007);
        assert_eq!(first_error("defb"), ErrorCode::Z1003);
        assert_eq!(first_error("defb 1,"), ErrorCode::Z1003);
    }

    #[test]
    fn optional_and_file_arguments() {
        let lines = parse_ok("align\nalign 256\nrndseed\nincludebin \"a.bin\", 2, 10\ncomparebin \"b.bin\"\nbank 3, #100");
        assert!(matches!(lines[0].node, LineNode::AlignPragma { alignment: None }));
        assert!(matches!(lines[1].node, LineNode::AlignPragma { alignment: Some(_) }));
        assert!(matches!(lines[2].node, LineNode::RndSeedPragma { seed: None }));
        assert!(matches!(
            lines[3].node,
            LineNode::IncludeBinPragma { offset: Some(_), length: Some(_), .. }
        ));
        assert!(matches!(
            lines[4].node,
            LineNode::CompareBinPragma { offset: None, length: None, .. }
        ));
        assert!(matches!(lines[5].node, LineNode::BankPragma { offset: Some(_), .. }));
    }

    #[test]
    fn identifier_pragmas() {
        let lines = parse_ok(".model Spectrum128\nmodel next\ninjectopt cspect, another\nextern\nzxbasic");
        assert!(matches!(lines[0].node, LineNode::ModelPragma { ref model } if model.as_str() == "Spectrum128"));
        assert!(matches!(lines[1].node, LineNode::ModelPragma { ref model } if model.as_str() == "next"));
        assert!(matches!(lines[2].node, LineNode::InjectOptPragma { ref options } if options.len() == 2));
        assert_eq!(lines[3].type_name(), "ExternPragma");
        assert_eq!(lines[4].type_name(), "ZxBasicPragma");
        assert_eq!(first_error("model 48"), ErrorCode::Z1004);
    }

    #[test]
    fn block_statements() {
        assert_eq!(
            type_names("proc\nendp\nloop 3\nendl\nrepeat\nuntil $ > 10\nwhile 1\nendw\nstruct\nends"),
            vec![
                "ProcStatement",
                "ProcEndStatement",
                "LoopStatement",
                "LoopEndStatement",
                "RepeatStatement",
                "UntilStatement",
                "WhileStatement",
                "WhileEndStatement",
                "StructStatement",
                "StructEndStatement",
            ]
        );
    }

    #[test]
    fn conditional_statements() {
        let lines = parse_ok("if 1\nelif 2\nelse\nendif\nifused ::main\nifnused other");
        assert_eq!(lines[0].type_name(), "IfStatement");
        assert_eq!(lines[3].type_name(), "EndIfStatement");
        assert!(matches!(
            lines[4].node,
            LineNode::IfUsedStatement { symbol: Expression::Symbol { global: true, .. } }
        ));
        assert_eq!(first_error("ifused 12"), ErrorCode::Z1004);
    }

    #[test]
    fn macro_statement() {
        let lines = parse_ok("Delay: macro(count, width)\nendm\nSimple macro()");
        assert!(matches!(lines[0].node, LineNode::MacroStatement { ref parameters } if parameters.len() == 2));
        assert!(matches!(lines[2].node, LineNode::MacroStatement { ref parameters } if parameters.is_empty()));
        assert_eq!(first_error("  macro(a)"), ErrorCode::Z1004);
        assert_eq!(first_error("m: macro(p1"), ErrorCode::Z1005);
    }

    #[test]
    fn for_statement() {
        let lines = parse_ok("for idx = 1 to 10 step 2\nnext\nfor j = 0 to 3\nbreak\ncontinue");
        let LineNode::ForStatement { variable, step, .. } = &lines[0].node else {
            panic!("Expected ForStatement, got {:?}", lines[0].node);
        };
        assert_eq!(variable.name.as_str(), "idx");
        assert!(step.is_some());
        assert!(matches!(lines[2].node, LineNode::ForStatement { step: None, .. }));

        assert_eq!(first_error("for = 1 to 2"), ErrorCode::Z1004);
        assert_eq!(first_error("for k 1 to 2"), ErrorCode::Z1015);
        assert_eq!(first_error("for k = 1 2"), ErrorCode::Z1015);
    }

    #[test]
    fn module_and_local() {
        let lines = parse_ok("module Screen\nmodule\nendmodule\nlocal a1, b1");
        assert!(matches!(lines[0].node, LineNode::ModuleStatement { name: Some(_) }));
        assert!(matches!(lines[1].node, LineNode::ModuleStatement { name: None }));
        assert_eq!(lines[2].type_name(), "ModuleEndStatement");
        assert!(matches!(lines[3].node, LineNode::LocalStatement { ref identifiers } if identifiers.len() == 2));
        assert_eq!(first_error("local"), ErrorCode::Z1004);
    }

    #[test]
    fn directives() {
        let lines = parse_ok(
            "#ifdef DEBUG\n#else\n#endif\n#define X\n#undef X\n#ifmod SPECTRUM48\n#ifnmod SPECTRUMP3\n#if X > 1\n#include \"defs.z80asm\"\n#line 12 \"main.z80asm\"",
        );
        let names: Vec<_> = lines.iter().map(AssemblyLine::type_name).collect();
        assert_eq!(
            names,
            vec![
                "IfDefDirective",
                "ElseDirective",
                "EndIfDirective",
                "DefineDirective",
                "UndefDirective",
                "IfModDirective",
                "IfNModDirective",
                "IfDirective",
                "IncludeDirective",
                "LineDirective",
            ]
        );
        assert!(matches!(lines[8].node, LineNode::IncludeDirective { ref filename } if filename.as_str() == "defs.z80asm"));
        assert!(matches!(lines[9].node, LineNode::LineDirective { file: Some(_), .. }));

        assert_eq!(first_error("#ifdef 12"), ErrorCode::Z1004);
        assert_eq!(first_error("#include defs"), ErrorCode::Z1003);
    }
}
