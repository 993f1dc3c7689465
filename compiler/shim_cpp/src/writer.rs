//! Indentation-aware C++ text builder.
//!
//! Every serializer writes into a `CppWriter`; the finished text is handed to
//! the orchestrator as a plain `String`, so nothing touches the filesystem
//! until a whole unit has been produced.

/// Spaces per indentation level.
const INDENT: usize = 4;

#[derive(Default)]
pub struct CppWriter {
    buffer: String,
    level: usize,
}

impl CppWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.level * INDENT {
                self.buffer.push(' ');
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    pub fn comment(&mut self, text: &str) {
        self.line(&format!("// {text}"));
    }

    /// `/* ... */` block; any `*/` in the text is defused.
    pub fn block_comment(&mut self, text: &str) {
        self.line("/*");
        for line in text.replace("*/", "* /").lines() {
            self.line(line);
        }
        self.line("*/");
    }

    /// `text;`
    pub fn declaration(&mut self, text: &str) {
        self.line(&format!("{text};"));
    }

    /// `text {` and indent.
    pub fn open(&mut self, text: &str) {
        self.line(&format!("{text} {{"));
        self.level += 1;
    }

    /// Dedent and write `closer` (`}` or `};`).
    pub fn close(&mut self, closer: &str) {
        self.level = self.level.saturating_sub(1);
        self.line(closer);
    }

    /// Append text produced by another writer, re-indented to this level.
    pub fn append(&mut self, other: &CppWriter) {
        for line in other.buffer.lines() {
            self.line(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finished text, ending in exactly one newline.
    pub fn finish(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }
}
