//! Strip terminal control sequences from model-authored text.
//!
//! Narratives, explanations and findings come straight from a remote model and
//! are drawn into the terminal. Anything that could move the cursor, set a
//! hyperlink or talk to the clipboard is removed before display.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    /// Just saw ESC.
    Escape,
    /// Inside `ESC [` or C1 CSI, waiting for the final byte.
    Csi,
    /// Inside OSC/DCS/PM/APC, waiting for BEL or `ESC \`.
    String { allow_bel: bool },
    /// Saw ESC inside a string sequence; `\` ends it.
    StringEscape { allow_bel: bool },
    /// Charset designation: drop exactly one more char.
    SkipOne,
}

/// Remove escape sequences and control characters except `\n`, `\t`, `\r`.
///
/// Borrows when the input is already clean.
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Text;
    for c in input.chars() {
        state = match state {
            Scan::Text => match c {
                ESC => Scan::Escape,
                C1_CSI => Scan::Csi,
                c if is_unsafe(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Escape => match c {
                '[' => Scan::Csi,
                ']' => Scan::String { allow_bel: true },
                'P' | '^' | '_' => Scan::String { allow_bel: false },
                '(' | ')' | '*' | '+' | '#' | ' ' => Scan::SkipOne,
                ESC => Scan::Escape,
                c if c.is_ascii_graphic() => Scan::Text,
                c if is_unsafe(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Csi => match c {
                '\x20'..='\x3f' => Scan::Csi,
                '\x40'..='\x7e' => Scan::Text,
                c if is_unsafe(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::String { allow_bel } => match c {
                BEL if allow_bel => Scan::Text,
                ESC => Scan::StringEscape { allow_bel },
                _ => Scan::String { allow_bel },
            },
            Scan::StringEscape { allow_bel } => match c {
                '\\' => Scan::Text,
                ESC => Scan::StringEscape { allow_bel },
                _ => Scan::String { allow_bel },
            },
            Scan::SkipOne => Scan::Text,
        };
    }
    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    match c {
        '\n' | '\t' | '\r' => false,
        '\x00'..='\x1f' | '\x7f' | '\u{80}'..='\u{9f}' => true,
        _ => false,
    }
}
