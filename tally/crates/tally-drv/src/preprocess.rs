//! Line classification.
//!
//! Total: every input line yields exactly one preprocessed line, with
//! 1-indexed numbers and the original text kept for error reporting.

/// How a raw line reads before lexing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Only whitespace
    Empty,
    /// `#+` then optional whitespace and text
    Heading { level: u8, text: String },
    /// Anything else; `content` has the inline comment stripped and
    /// the right edge trimmed
    Expression { content: String },
}

/// One classified line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreprocessedLine {
    /// 1-indexed line number
    pub number: u32,
    /// Byte offset of the line start in the document
    pub offset: usize,
    /// The original line text
    pub raw: String,
    pub kind: LineKind,
}

/// Split a document into classified lines.
pub fn preprocess(document: &str) -> Vec<PreprocessedLine> {
    let mut lines = Vec::new();
    let mut offset = 0usize;
    for (idx, raw) in document.split('\n').enumerate() {
        lines.push(PreprocessedLine {
            number: idx as u32 + 1,
            offset,
            raw: raw.to_string(),
            kind: classify(raw),
        });
        offset += raw.len() + 1;
    }
    lines
}

fn classify(raw: &str) -> LineKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineKind::Empty;
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        let extra = rest.chars().take_while(|&c| c == '#').count();
        let text = rest[extra..].trim().to_string();
        return LineKind::Heading {
            level: (extra + 1).min(u8::MAX as usize) as u8,
            text,
        };
    }
    let content = match raw.find('#') {
        Some(hash) => &raw[..hash],
        None => raw,
    };
    LineKind::Expression {
        content: content.trim_end().to_string(),
    }
}
