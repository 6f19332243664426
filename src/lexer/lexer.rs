use super::LexerTokenKind;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of 'codepoints') */
    pub codepoint_offset: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            codepoint_offset: 0,

            chars: chars.chars().peekable(),
        }
    }

    fn transform_to_type(&mut self, c: char) -> LexerTokenKind {
        match c {
            '>' => LexerTokenKind::Increment,
            '<' => LexerTokenKind::Decrement,
            '+' => LexerTokenKind::DerefIncrement,
            '-' => LexerTokenKind::DerefDecrement,
            '.' => LexerTokenKind::Write,
            ',' => LexerTokenKind::Read,
            '[' => LexerTokenKind::JumpStart,
            ']' => LexerTokenKind::JumpEnd,
            c => {
                // Simplify the comment stream down to strings
                let mut comment = String::from(c);
                loop {
                    match self.chars.peek() {
                        Some('>') | Some('<') | Some('+') | Some('-') | Some('.') | Some(',')
                        | Some('[') | Some(']') => break,
                        Some(_) => comment.push(self.consume_char().unwrap()),
                        None => break,
                    }
                }

                LexerTokenKind::Comment(comment)
            }
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        match self.chars.next() {
            Some(c) => {
                self.cur_col += 1;
                if c == '\n' {
                    self.cur_line += 1;
                    self.cur_col = 1;
                }
                self.codepoint_offset += 1;
                Some(c)
            }
            None => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.consume_char();
        }
    }

    /// Lexing can't fail: anything that isn't an opcode folds into a
    /// `Comment` token, so the worst input is all comment.
    pub fn next_token(&mut self) -> LexerTokenKind {
        self.skip_whitespace();

        if let Some(c) = self.consume_char() {
            self.transform_to_type(c)
        } else {
            LexerTokenKind::EOF
        }
    }

    pub fn collect_tokens(&mut self) -> Vec<LexerTokenKind> {
        let mut v = vec![];
        loop {
            match self.next_token() {
                LexerTokenKind::EOF => break v,
                tok => v.push(tok),
            }
        }
    }

    /// The token stream with comments stripped out, i.e. just the opcodes
    /// in source order.  This is the stream the interpreters and the
    /// parser consume.
    pub fn normalize(&mut self) -> Vec<LexerTokenKind> {
        let mut v = self.collect_tokens();
        v.retain(|t| t.is_opcode());
        v
    }
}
