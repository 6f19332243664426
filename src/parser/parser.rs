use std::iter::Peekable;

use crate::lexer::LexerTokenKind;

use super::{AstKind, ParseError, Program, MAX_RUN};

pub struct Parser<'a> {
    tokens: Peekable<std::slice::Iter<'a, LexerTokenKind>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [LexerTokenKind]) -> Parser<'a> {
        Parser {
            tokens: tokens.iter().peekable(),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.parse_block(0)
    }

    /// Greedily consume every token identical to `kind` that immediately
    /// follows, then emit counted nodes: one full node per `MAX_RUN`
    /// consumed and a final node for the remainder.  A run that is an
    /// exact multiple of `MAX_RUN` gets no trailing zero-count node.
    fn parse_run(&mut self, kind: &LexerTokenKind, instructions: &mut Vec<AstKind>) {
        let mut run: usize = 1;
        while self.tokens.peek() == Some(&kind) {
            self.tokens.next();
            run += 1;
        }

        let make = |count: u8| match kind {
            LexerTokenKind::DerefIncrement => AstKind::Add(count),
            LexerTokenKind::DerefDecrement => AstKind::Subtract(count),
            LexerTokenKind::Increment => AstKind::MoveRight(count),
            LexerTokenKind::Decrement => AstKind::MoveLeft(count),
            _ => unreachable!("only arithmetic/move opcodes are run-length merged"),
        };

        for _ in 0..run / MAX_RUN as usize {
            instructions.push(make(MAX_RUN));
        }
        let remainder = (run % MAX_RUN as usize) as u8;
        if remainder > 0 {
            instructions.push(make(remainder));
        }
    }

    /// `depth` is the loop nesting level; 0 is the top of the program.
    /// A `]` at depth 0 has no opening `[`, and running out of tokens at
    /// depth > 0 means a `[` was never closed: both are parse errors,
    /// never something to scan past.
    fn parse_block(&mut self, depth: usize) -> Result<Program, ParseError> {
        let mut instructions = vec![];

        while let Some(token) = self.tokens.next() {
            match token {
                LexerTokenKind::Increment
                | LexerTokenKind::Decrement
                | LexerTokenKind::DerefIncrement
                | LexerTokenKind::DerefDecrement => self.parse_run(token, &mut instructions),
                LexerTokenKind::Write => instructions.push(AstKind::Write),
                LexerTokenKind::Read => instructions.push(AstKind::Read),
                LexerTokenKind::JumpStart => {
                    instructions.push(AstKind::Loop(self.parse_block(depth + 1)?))
                }
                LexerTokenKind::JumpEnd => {
                    if depth == 0 {
                        return Err(ParseError::UnbalancedLoop {
                            symbol: ']',
                            other: '[',
                        });
                    }
                    return Ok(instructions);
                }
                // the lexer already terminated on EOF and we only feed
                // opcode streams in, but both are harmless to skip
                LexerTokenKind::EOF => break,
                LexerTokenKind::Comment(_) => continue,
            }
        }

        if depth > 0 {
            return Err(ParseError::UnbalancedLoop {
                symbol: '[',
                other: ']',
            });
        }

        Ok(instructions)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::lexer::lexer::Lexer;
    use crate::parser::AstKind::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::new(source).normalize();
        Parser::new(&tokens).parse_program()
    }

    #[test]
    fn merges_runs_into_counted_nodes() {
        assert_eq!(
            parse("++++[-]").unwrap(),
            vec![Add(4), Loop(vec![Subtract(1)])]
        );
    }

    #[test]
    fn merges_moves_and_both_arithmetic_directions() {
        assert_eq!(
            parse(">>><<--"),
            Ok(vec![MoveRight(3), MoveLeft(2), Subtract(2)])
        );
    }

    #[rstest]
    #[case(254, vec![Add(254)])]
    #[case(255, vec![Add(255)])]
    #[case(256, vec![Add(255), Add(1)])]
    #[case(510, vec![Add(255), Add(255)])]
    #[case(511, vec![Add(255), Add(255), Add(1)])]
    fn long_runs_roll_over_at_255(#[case] len: usize, #[case] expected: Vec<AstKind>) {
        assert_eq!(parse(&"+".repeat(len)).unwrap(), expected);
    }

    #[test]
    fn writes_and_reads_are_never_merged() {
        assert_eq!(parse("..,,"), Ok(vec![Write, Write, Read, Read]));
    }

    #[test]
    fn nested_loops_are_structural() {
        assert_eq!(
            parse("[[-]]").unwrap(),
            vec![Loop(vec![Loop(vec![Subtract(1)])])]
        );
    }

    #[test]
    fn runs_do_not_merge_across_loop_boundaries() {
        assert_eq!(
            parse("++[++]++").unwrap(),
            vec![Add(2), Loop(vec![Add(2)]), Add(2)]
        );
    }

    #[rstest]
    #[case("[+", '[', ']')]
    #[case("+]", ']', '[')]
    #[case("[[-]", '[', ']')]
    #[case("[-]]", ']', '[')]
    fn unbalanced_loops_are_rejected(
        #[case] source: &str,
        #[case] symbol: char,
        #[case] other: char,
    ) {
        assert_eq!(
            parse(source),
            Err(ParseError::UnbalancedLoop { symbol, other })
        );
    }

    #[test]
    fn empty_program_parses_to_nothing() {
        assert_eq!(parse("just a comment"), Ok(vec![]));
    }
}
