//! Delimiter, bracket and keyword tables.
//!
//! Every delimiter the scanner stops at maps to exactly one
//! [`DelimiterKind`], and every kind has exactly one handler in
//! [`Scanner`](crate::Scanner). Paired delimiters resolve their closer
//! through [`Bracket::close`] (percent literals add `<` / `>`); heredocs are
//! closed by their own identifier.

/// The three bracket pairs tracked on the nesting stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// `(` / `)`
    Paren,
    /// `[` / `]`
    Square,
    /// `{` / `}`
    Curly,
}

impl Bracket {
    /// Every bracket kind, in table order.
    pub const ALL: [Bracket; 3] = [Bracket::Paren, Bracket::Square, Bracket::Curly];

    /// The bracket opened by `byte`, if any.
    pub fn from_open(byte: u8) -> Option<Self> {
        match byte {
            b'(' => Some(Self::Paren),
            b'[' => Some(Self::Square),
            b'{' => Some(Self::Curly),
            _ => None,
        }
    }

    /// The bracket closed by `byte`, if any.
    pub fn from_close(byte: u8) -> Option<Self> {
        match byte {
            b')' => Some(Self::Paren),
            b']' => Some(Self::Square),
            b'}' => Some(Self::Curly),
            _ => None,
        }
    }

    /// Opening byte.
    pub fn open(self) -> u8 {
        match self {
            Self::Paren => b'(',
            Self::Square => b'[',
            Self::Curly => b'{',
        }
    }

    /// Closing byte.
    pub fn close(self) -> u8 {
        match self {
            Self::Paren => b')',
            Self::Square => b']',
            Self::Curly => b'}',
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Paren => 0,
            Self::Square => 1,
            Self::Curly => 2,
        }
    }
}

/// Ruby keywords that matter for nesting and indentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Module,
    Def,
    If,
    Unless,
    Case,
    While,
    Until,
    For,
    Begin,
    Do,
    End,
    Then,
    Else,
    Elsif,
    When,
    Rescue,
    Ensure,
    And,
    Or,
    Not,
}

impl Keyword {
    /// Look up a whole word.
    pub fn from_bytes(word: &[u8]) -> Option<Self> {
        Some(match word {
            b"class" => Self::Class,
            b"module" => Self::Module,
            b"def" => Self::Def,
            b"if" => Self::If,
            b"unless" => Self::Unless,
            b"case" => Self::Case,
            b"while" => Self::While,
            b"until" => Self::Until,
            b"for" => Self::For,
            b"begin" => Self::Begin,
            b"do" => Self::Do,
            b"end" => Self::End,
            b"then" => Self::Then,
            b"else" => Self::Else,
            b"elsif" => Self::Elsif,
            b"when" => Self::When,
            b"rescue" => Self::Rescue,
            b"ensure" => Self::Ensure,
            b"and" => Self::And,
            b"or" => Self::Or,
            b"not" => Self::Not,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Module => "module",
            Self::Def => "def",
            Self::If => "if",
            Self::Unless => "unless",
            Self::Case => "case",
            Self::While => "while",
            Self::Until => "until",
            Self::For => "for",
            Self::Begin => "begin",
            Self::Do => "do",
            Self::End => "end",
            Self::Then => "then",
            Self::Else => "else",
            Self::Elsif => "elsif",
            Self::When => "when",
            Self::Rescue => "rescue",
            Self::Ensure => "ensure",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }

    /// Byte length of the keyword.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "keywords are at most six bytes"
    )]
    pub fn width(self) -> u32 {
        self.as_str().len() as u32
    }

    /// Keywords that open a block closed by `end`.
    pub fn opens_block(self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Module
                | Self::Def
                | Self::If
                | Self::Unless
                | Self::Case
                | Self::While
                | Self::Until
                | Self::For
                | Self::Begin
                | Self::Do
        )
    }

    /// Keywords that can trail a statement as a modifier.
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::If | Self::Unless | Self::While | Self::Until)
    }

    /// Keywords that sit between a block's opener and its `end` and are
    /// outdented to the opener's level.
    pub fn is_mid_block(self) -> bool {
        matches!(
            self,
            Self::Then | Self::Else | Self::Elsif | Self::When | Self::Rescue | Self::Ensure
        )
    }

    /// Word operators.
    pub fn is_operator(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }

    /// Keywords that leave an expression unfinished at the end of a line.
    pub fn is_hanging(self) -> bool {
        self.is_modifier() || self.is_operator()
    }

    /// After these keywords a fresh expression begins.
    pub fn starts_expression(self) -> bool {
        self.opens_block() || self.is_operator() || self.is_mid_block()
    }

    /// Loop heads whose trailing `do` does not open a second block.
    pub fn makes_do_redundant(self) -> bool {
        matches!(self, Self::While | Self::Until | Self::For | Self::Rescue)
    }

    /// Keywords that start a method, class or module definition.
    pub fn starts_definition(self) -> bool {
        matches!(self, Self::Def | Self::Class | Self::Module)
    }
}

/// Delimiter classes found by the scanner's probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelimiterKind {
    /// `"` or `` ` ``: a string that expands `#{...}`.
    Quote(u8),
    /// `'`: a string without expansion.
    SingleQuote,
    /// `/`: a regexp or the division operator.
    Slash,
    /// `%`: a percent literal or the modulo operator.
    Percent,
    /// `?`: a character literal or the ternary operator.
    Question,
    /// `$`: a global variable.
    Dollar,
    /// `@` / `@@`: an instance or class variable.
    Sigil,
    /// `#` outside a literal.
    Comment,
    /// `=begin` at the start of a line.
    BlockComment,
    Open(Bracket),
    Close(Bracket),
    /// `.`: a method call or a range operator.
    Dot,
    /// `:`: a symbol or a scope operator.
    Colon,
    /// `<<`: a heredoc opener or the shift operator.
    Heredoc,
    /// A block keyword or `end` in keyword position.
    Keyword(Keyword),
}

/// Bytes that may start an identifier. Non-ASCII bytes count as letters.
#[inline]
pub fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

/// Bytes that may continue an identifier.
#[inline]
pub fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

/// Operator characters after which an expression is unfinished.
#[inline]
pub fn is_operator_char(byte: u8) -> bool {
    matches!(
        byte,
        b'-' | b',' | b'.' | b'+' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'=' | b'<'
            | b'>' | b':'
    )
}

/// The keyword spelled by the whole word starting at `pos`, if any.
///
/// The word must not be preceded or followed by identifier bytes.
pub fn keyword_at(bytes: &[u8], pos: usize) -> Option<Keyword> {
    if pos > 0 && bytes.get(pos - 1).copied().is_some_and(is_ident_continue) {
        return None;
    }
    let rest = bytes.get(pos..)?;
    let len = rest
        .iter()
        .position(|&b| !is_ident_continue(b))
        .unwrap_or(rest.len());
    Keyword::from_bytes(&rest[..len])
}
