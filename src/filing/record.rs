//! In-memory model of a pipe-delimited filing

use std::fmt;

/// Record separator written on output
pub const LINE_TERMINATOR: &str = "\r\n";

/// One line of a filing, held as its `|`-separated fields.
///
/// Records start with `|`, so field 0 is empty and field 1 is the record type.
/// Joining the fields back with `|` reproduces the original text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingLine {
    fields: Vec<String>,
}

impl FilingLine {
    pub fn parse(text: &str) -> Self {
        Self {
            fields: text.split('|').map(str::to_string).collect(),
        }
    }

    /// Build a record from its type and values: `|TYPE|v1|v2|`
    pub fn record<I, S>(record_type: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = vec![String::new(), record_type.to_string()];
        fields.extend(values.into_iter().map(Into::into));
        fields.push(String::new());
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Record type code (field 1), if the line has one
    pub fn record_type(&self) -> Option<&str> {
        self.field(1)
    }

    pub fn is_type(&self, record_type: &str) -> bool {
        self.record_type() == Some(record_type)
    }

    /// Overwrite a field, padding with empty fields when the line is shorter
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        if self.fields.len() <= index {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.into();
    }

    /// Record type as seen by trailer counting: the four characters after a
    /// leading `|` on the trimmed line. `None` for lines that are not records.
    pub fn counted_type(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        let rest = trimmed.strip_prefix('|')?;
        Some(rest.chars().take(4).collect())
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.to_string().starts_with(prefix)
    }
}

impl fmt::Display for FilingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join("|"))
    }
}

/// Ordered lines of one filing, owned by a single parse-rewrite-serialize cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingDocument {
    lines: Vec<FilingLine>,
}

impl FilingDocument {
    /// Split text on CRLF or LF. A terminator after the last line is optional
    /// and does not produce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let text = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);
        if text.is_empty() {
            return Self::default();
        }

        let lines = text
            .split('\n')
            .map(|line| FilingLine::parse(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Self { lines }
    }

    /// Lines joined with CRLF, terminated by CRLF
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push_str(LINE_TERMINATOR);
        }
        out
    }

    pub fn lines(&self) -> &[FilingLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FilingLine> {
        self.lines.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FilingLine> {
        self.lines.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, FilingLine> {
        self.lines.iter_mut()
    }

    /// Insert `new_lines` so the first of them lands at `index`
    pub fn insert_lines(&mut self, index: usize, new_lines: Vec<FilingLine>) {
        let index = index.min(self.lines.len());
        self.lines.splice(index..index, new_lines);
    }

    /// Drop every line after `index`
    pub fn truncate_after(&mut self, index: usize) {
        self.lines.truncate(index + 1);
    }
}
