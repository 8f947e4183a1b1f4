//! Code buffer used as the rendering target.
//!
//! The engine only ever writes lines and opens/closes blocks; indentation is
//! the buffer's business.

const INDENT: &str = "  ";

pub trait CodeBuffer {
    /// Emit one line at the current indentation. An empty string emits a blank line.
    fn line(&mut self, text: &str);
    /// Emit `header {` and indent.
    fn open_block(&mut self, header: &str);
    /// Dedent and emit `}`.
    fn close_block(&mut self);
    fn render(&self) -> String;
}

/// Plain text buffer with two-space indentation.
#[derive(Debug, Default, Clone)]
pub struct Code {
    lines: Vec<String>,
    depth: usize,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBuffer for Code {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", INDENT.repeat(self.depth)));
        }
    }

    fn open_block(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// One recorded buffer operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOp {
    Line(String),
    Open(String),
    Close,
}

/// A buffer that records operations instead of formatting them, so
/// hand-written declarations can be queued and replayed later.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodeScript {
    ops: Vec<CodeOp>,
}

impl CodeScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CodeOp] {
        &self.ops
    }

    pub fn replay(&self, code: &mut dyn CodeBuffer) {
        for op in &self.ops {
            match op {
                CodeOp::Line(text) => code.line(text),
                CodeOp::Open(header) => code.open_block(header),
                CodeOp::Close => code.close_block(),
            }
        }
    }
}

impl CodeBuffer for CodeScript {
    fn line(&mut self, text: &str) {
        self.ops.push(CodeOp::Line(text.to_string()));
    }

    fn open_block(&mut self, header: &str) {
        self.ops.push(CodeOp::Open(header.to_string()));
    }

    fn close_block(&mut self) {
        self.ops.push(CodeOp::Close);
    }

    fn render(&self) -> String {
        let mut code = Code::new();
        self.replay(&mut code);
        code.render()
    }
}
