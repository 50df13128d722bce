use std::fmt::Display;

/// One step of an edit script turning the left line sequence into the right one.
///
/// Text is kept exactly as read, trailing terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOp {
    Common { left: String, right: String },
    Added { text: String },
    Removed { text: String },
}

impl LineOp {
    pub fn common(text: impl Into<String>) -> Self {
        let text = text.into();
        LineOp::Common {
            left: text.clone(),
            right: text,
        }
    }

    pub fn added(text: impl Into<String>) -> Self {
        LineOp::Added { text: text.into() }
    }

    pub fn removed(text: impl Into<String>) -> Self {
        LineOp::Removed { text: text.into() }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, LineOp::Common { .. })
    }

    pub fn left_text(&self) -> Option<&str> {
        match self {
            LineOp::Common { left, .. } => Some(left),
            LineOp::Removed { text } => Some(text),
            LineOp::Added { .. } => None,
        }
    }

    pub fn right_text(&self) -> Option<&str> {
        match self {
            LineOp::Common { right, .. } => Some(right),
            LineOp::Added { text } => Some(text),
            LineOp::Removed { .. } => None,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            LineOp::Common { left, .. } => format!(" {}", strip_terminator(left)),
            LineOp::Added { text } => format!("+{}", strip_terminator(text)),
            LineOp::Removed { text } => format!("-{}", strip_terminator(text)),
        }
    }
}

impl Display for LineOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// The visible part of a line: everything before a trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
