use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Error,
    Neutral,
}

/// Text that has been neutralized against markup injection.
///
/// The only constructor escapes `& < > " '`, so a `SafeText` can be dropped
/// into an HTML surface as is. Terminal surfaces use [`SafeText::to_plain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeText(String);

impl SafeText {
    pub fn escape(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#039;"),
                _ => out.push(c),
            }
        }
        Self(out)
    }

    pub fn as_markup(&self) -> &str {
        &self.0
    }

    /// Reverses the escaping for surfaces that never interpret markup.
    pub fn to_plain(&self) -> Cow<'_, str> {
        if !self.0.contains('&') {
            return Cow::Borrowed(&self.0);
        }
        Cow::Owned(
            self.0
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#039;", "'")
                .replace("&amp;", "&"),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub severity: Severity,
    pub text: SafeText,
}

impl Annotation {
    pub fn new(severity: Severity, text: &str) -> Self {
        Self {
            severity,
            text: SafeText::escape(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub severity: Severity,
    pub header: Vec<SafeText>,
    pub rows: Vec<Vec<SafeText>>,
}

impl TableBlock {
    pub fn new(header: Vec<SafeText>, rows: Vec<Vec<SafeText>>) -> Self {
        Self {
            severity: Severity::Neutral,
            header,
            rows,
        }
    }
}

/// Every block serializes as `{kind, severity, ...payload}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Message(Annotation),
    Table(TableBlock),
}

impl Block {
    pub fn severity(&self) -> Severity {
        match self {
            Block::Message(annotation) => annotation.severity,
            Block::Table(table) => table.severity,
        }
    }
}

/// Display-agnostic description of what to show, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub blocks: Vec<Block>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(severity: Severity, text: &str) -> Self {
        let mut model = Self::new();
        model.push_message(severity, text);
        model
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn push_message(&mut self, severity: Severity, text: &str) {
        self.push(Block::Message(Annotation::new(severity, text)));
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Annotation> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Message(a) => Some(a),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn has_error(&self) -> bool {
        self.messages().any(|a| a.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        let text = SafeText::escape("<script>alert('x') && \"y\"</script>");
        assert_eq!(
            text.as_markup(),
            "&lt;script&gt;alert(&#039;x&#039;) &amp;&amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_to_plain_reverses_escape() {
        for raw in ["plain", "<b>&amp;</b>", "it's \"ok\"", "&lt;", ""] {
            assert_eq!(SafeText::escape(raw).to_plain(), raw);
        }
    }

    #[test]
    fn test_block_json_shape() {
        let model = RenderModel::message(Severity::Ok, "Database reset.");
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blocks": [{"kind": "message", "severity": "ok", "text": "Database reset."}]
            })
        );
    }

    #[test]
    fn test_table_block_json_carries_severity() {
        let mut model = RenderModel::new();
        model.push(Block::Table(TableBlock::new(
            vec![SafeText::escape("n")],
            vec![vec![SafeText::escape("1")]],
        )));

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blocks": [{"kind": "table", "severity": "neutral", "header": ["n"], "rows": [["1"]]}]
            })
        );
    }
}
