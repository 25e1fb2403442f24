// src/core/arg_parser.rs

use crate::{
    constants::WINDOWS_EXE_SUFFIX,
    errors::{ProcessError, Result},
    models::OsKind,
};

/// A program and its argument tokens, ready for command-line assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: String,
    pub arguments: Vec<String>,
}

/// The characters that open (and close) a multi-token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Double,
    Single,
    Backtick,
}

impl SpanKind {
    fn from_token(token: &str) -> Option<Self> {
        match token.chars().next()? {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    fn delimiter(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
            Self::Backtick => '`',
        }
    }

    /// Backtick spans are shell substitutions and keep their delimiters.
    fn strips_delimiters(self) -> bool {
        self != Self::Backtick
    }
}

/// Parses a free-form command string such as `prog a 'b c' d`.
///
/// The string is split at every whitespace character. Quoted and backtick
/// spans are merged back into one token; empty pieces outside a span
/// (repeated whitespace) are dropped, inside a span they preserve the
/// original separators.
pub fn parse_command(command: &str, os: OsKind) -> Result<ParsedCommand> {
    let mut raw = split_raw(command)
        .into_iter()
        .skip_while(|piece| piece.text.is_empty());
    let program = raw
        .next()
        .ok_or_else(|| ProcessError::argument("No program given in command string."))?;

    Ok(ParsedCommand {
        program: normalize_program(&program.text, os),
        arguments: group_spans(raw)?,
    })
}

/// Builds a command from pre-separated parts. The first part is the program;
/// every other part is taken verbatim as one complete argument.
pub fn from_parts<S: AsRef<str>>(parts: &[S], os: OsKind) -> Result<ParsedCommand> {
    let (program, rest) = parts
        .split_first()
        .ok_or_else(|| ProcessError::argument("No program given."))?;
    let program = program.as_ref().trim();
    if program.is_empty() {
        return Err(ProcessError::argument("Program name is empty."));
    }

    let arguments = rest
        .iter()
        .map(|part| {
            let part = part.as_ref();
            if part.is_empty() {
                Err(ProcessError::argument("Arguments cannot be empty strings."))
            } else {
                Ok(part.to_string())
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedCommand {
        program: normalize_program(program, os),
        arguments,
    })
}

/// Splits additional argument text the same way the command string is split.
pub fn split_arguments(text: &str) -> Result<Vec<String>> {
    group_spans(split_raw(text).into_iter())
}

/// Removes a trailing `.exe` on Windows. The suffix is added back at lookup time.
pub fn normalize_program(program: &str, os: OsKind) -> String {
    if os.is_windows() {
        let suffix_len = WINDOWS_EXE_SUFFIX.len();
        if program.len() > suffix_len
            && program.is_char_boundary(program.len() - suffix_len)
        {
            let (stem, suffix) = program.split_at(program.len() - suffix_len);
            if suffix.eq_ignore_ascii_case(WINDOWS_EXE_SUFFIX) {
                return stem.to_string();
            }
        }
    }
    program.to_string()
}

/// One whitespace-free piece of the input and the character that ended it.
#[derive(Debug)]
struct RawPiece {
    text: String,
    separator: char,
}

fn split_raw(text: &str) -> Vec<RawPiece> {
    text.split_inclusive(char::is_whitespace)
        .map(|piece| {
            let separator = piece
                .chars()
                .next_back()
                .filter(|last| last.is_whitespace());
            match separator {
                Some(last) => RawPiece {
                    text: piece.strip_suffix(last).unwrap_or(piece).to_string(),
                    separator: last,
                },
                None => RawPiece {
                    text: piece.to_string(),
                    separator: ' ',
                },
            }
        })
        .collect()
}

/// Merges quoted and backtick spans into single tokens.
///
/// A single pass over the input: the cursor either yields a plain token or
/// opens a span and keeps pulling tokens until one closes it.
fn group_spans<I>(tokens: I) -> Result<Vec<String>>
where
    I: Iterator<Item = RawPiece>,
{
    let mut tokens = tokens;
    let mut grouped = Vec::new();

    while let Some(RawPiece { text: token, separator }) = tokens.next() {
        if token.is_empty() {
            continue;
        }

        let Some(kind) = SpanKind::from_token(&token) else {
            grouped.push(token);
            continue;
        };

        let delimiter = kind.delimiter();
        let mut merged = token;
        // A token like `'b'` opens and closes its own span.
        let mut closed = merged.len() > 1 && merged.ends_with(delimiter);
        let mut separator = separator;

        while !closed {
            let next = tokens.next().ok_or_else(|| {
                ProcessError::argument(format!("Unterminated quoted argument: {}", merged))
            })?;
            merged.push(separator);
            merged.push_str(&next.text);
            separator = next.separator;
            closed = next.text.ends_with(delimiter);
        }

        if kind.strips_delimiters() {
            merged = merged
                .strip_prefix(delimiter)
                .and_then(|inner| inner.strip_suffix(delimiter))
                .unwrap_or_default()
                .to_string();
            if merged.is_empty() {
                return Err(ProcessError::argument("Quoted argument is empty."));
            }
        }

        grouped.push(merged);
    }

    Ok(grouped)
}
