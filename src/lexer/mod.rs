pub mod lexer;

#[derive(Debug, Clone, PartialEq)]
pub enum LexerTokenKind {
    // `>`: Increment the `data pointer` by one
    Increment,
    // `<`: Decrement the `data pointer` by one
    Decrement,

    // `+`: Increment the byte at the `data pointer` by one
    DerefIncrement,
    // `-`: Decrement the byte at the `data pointer` by one
    DerefDecrement,

    // `.`: Write the byte at the `data pointer` to the `output device`
    Write,
    // `,`: Read the next byte from the `input device` and store it at the `data pointer`
    Read,

    // `[`: If the byte at the `data pointer` is zero, then jump the `instruction pointer` forward to the instruction after the matching `]`
    JumpStart,
    // `]`: If the byte at the `data pointer` is non-zero then jump the `instruction pointer` back to the instruction after the matching `[`
    JumpEnd,

    // End of file: no more tokens left
    EOF,

    // Everything else; the language has no comment syntax so any
    // character that isn't one of the eight opcodes is a comment
    Comment(String),
}

impl LexerTokenKind {
    pub fn is_opcode(&self) -> bool {
        !matches!(self, LexerTokenKind::EOF | LexerTokenKind::Comment(_))
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            LexerTokenKind::Increment => Some('>'),
            LexerTokenKind::Decrement => Some('<'),
            LexerTokenKind::DerefIncrement => Some('+'),
            LexerTokenKind::DerefDecrement => Some('-'),
            LexerTokenKind::Write => Some('.'),
            LexerTokenKind::Read => Some(','),
            LexerTokenKind::JumpStart => Some('['),
            LexerTokenKind::JumpEnd => Some(']'),
            LexerTokenKind::EOF | LexerTokenKind::Comment(_) => None,
        }
    }
}
