//! Decides whether a query looks like a course code.
//!
//! A course code is a department of up to four letters, optionally followed
//! by a catalog number of up to four digits, optionally followed by one
//! suffix letter. The query is trimmed and upper-cased before matching and
//! must match as a whole.

pub const MAX_DEPARTMENT_LETTERS: usize = 4;
pub const MAX_NUMBER_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeShape {
    /// `CMSC`, `M`
    Department,
    /// `CMSC1`, `CMSC131`, `CS21`
    Numbered,
    /// `CMSC131A`
    Suffixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// The shape is informational; every shape is searched the same way.
    StructuredCode(CodeShape),
    FreeText,
}

pub fn classify(raw: &str) -> QueryKind {
    let normalized = raw.trim().to_uppercase();
    match code_shape(&normalized) {
        Some(shape) => QueryKind::StructuredCode(shape),
        None => QueryKind::FreeText,
    }
}

fn code_shape(text: &str) -> Option<CodeShape> {
    let bytes = text.as_bytes();

    let letters = count_leading(bytes, |b| b.is_ascii_uppercase());
    if letters == 0 || letters > MAX_DEPARTMENT_LETTERS {
        return None;
    }
    let rest = &bytes[letters..];
    if rest.is_empty() {
        return Some(CodeShape::Department);
    }

    let digits = count_leading(rest, |b| b.is_ascii_digit());
    if digits == 0 || digits > MAX_NUMBER_DIGITS {
        return None;
    }
    match &rest[digits..] {
        [] => Some(CodeShape::Numbered),
        [suffix] if suffix.is_ascii_uppercase() => Some(CodeShape::Suffixed),
        _ => None,
    }
}

fn count_leading(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|b| pred(**b)).count()
}
