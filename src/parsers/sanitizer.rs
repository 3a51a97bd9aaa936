//! Streaming markup sanitizer
//!
//! A single left-to-right scan over the document that drops comments, the
//! contents of non-visible elements (`head`, `script`, `style`) and every
//! remaining tag. No backtracking, so adversarial input stays linear.

/// ASCII whitespace, plus the vertical tab
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0b', '\x0c', '\r'];

/// Elements whose entire content is removed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HiddenElement {
    Head,
    Script,
    Style,
}

impl HiddenElement {
    fn name(self) -> &'static [u8] {
        match self {
            HiddenElement::Head => b"head",
            HiddenElement::Script => b"script",
            HiddenElement::Style => b"style",
        }
    }

    /// Matches a tag name at the start of `input`, which must be followed by
    /// a delimiter so that e.g. `<header>` is not mistaken for `<head>`.
    fn at(input: &[u8]) -> Option<Self> {
        [HiddenElement::Head, HiddenElement::Script, HiddenElement::Style]
            .into_iter()
            .find(|element| {
                let name = element.name();
                input.len() > name.len()
                    && input[..name.len()].eq_ignore_ascii_case(name)
                    && is_tag_delimiter(input[name.len()])
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Text,
    Tag,
    Comment,
    HiddenOpen(HiddenElement),
    Hidden(HiddenElement),
    HiddenClose,
}

fn is_tag_delimiter(b: u8) -> bool {
    matches!(b, b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\x0c' | b'\r')
}

/// Removes comments, hidden elements and tags, keeping only visible text.
///
/// Entities are left untouched. A tag that is never closed is kept as text;
/// an unterminated comment or hidden element swallows the rest of the input.
pub fn strip_markup(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    let mut phase = Phase::Text;
    let mut tag_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match phase {
            Phase::Text => match bytes[i..].iter().position(|&b| b == b'<') {
                Some(offset) => {
                    output.push_str(&input[i..i + offset]);
                    tag_start = i + offset;
                    let tag = &bytes[tag_start + 1..];

                    if tag.starts_with(b"!--") {
                        phase = Phase::Comment;
                        i = tag_start + 4;
                    } else if let Some(element) = HiddenElement::at(tag) {
                        phase = Phase::HiddenOpen(element);
                        i = tag_start + 1;
                    } else {
                        phase = Phase::Tag;
                        i = tag_start + 1;
                    }
                }
                None => {
                    output.push_str(&input[i..]);
                    i = bytes.len();
                }
            },
            Phase::Tag | Phase::HiddenClose => {
                if bytes[i] == b'>' {
                    phase = Phase::Text;
                }
                i += 1;
            }
            Phase::HiddenOpen(element) => {
                if bytes[i] == b'>' {
                    phase = Phase::Hidden(element);
                }
                i += 1;
            }
            Phase::Comment => {
                if bytes[i..].starts_with(b"-->") {
                    phase = Phase::Text;
                    i += 3;
                } else {
                    i += 1;
                }
            }
            Phase::Hidden(element) => {
                if bytes[i..].starts_with(b"</") && HiddenElement::at(&bytes[i + 2..]) == Some(element)
                {
                    phase = Phase::HiddenClose;
                    i += 2;
                } else {
                    i += 1;
                }
            }
        }
    }

    if phase == Phase::Tag {
        output.push_str(&input[tag_start..]);
    }

    output
}

/// Returns the text between the first `<title>` and the following
/// `</title>`, matched case-insensitively; empty when either is missing.
pub fn extract_title(input: &str) -> &str {
    const OPEN: &str = "<title>";
    const CLOSE: &str = "</title>";

    // ASCII lowercasing keeps byte offsets valid for `input`
    let lowered = input.to_ascii_lowercase();

    let Some(open) = lowered.find(OPEN) else {
        return "";
    };
    let start = open + OPEN.len();

    match lowered[start..].find(CLOSE) {
        Some(length) => &input[start..start + length],
        None => "",
    }
}

/// Collapses every whitespace run to a single space and trims both ends
pub fn normalize_whitespace(input: &str) -> String {
    input
        .split(WHITESPACES)
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}
