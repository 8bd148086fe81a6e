//! Indentation-tracking text sink used by the C emitters.
//!
//! Output is accumulated in memory so a module is only written to disk once
//! every unit rendered successfully.

/// Accumulates lines of C, prefixing each with the current indentation.
///
/// Blocks use braces on their own lines:
///
/// ```
/// use idl_gen::codegen::writer::CodeWriter;
///
/// let mut w = CodeWriter::with_indent_spaces(2);
/// w.writeln("int main(void)");
/// w.open_brace();
/// w.writeln("return 0;");
/// w.close_brace("");
/// assert_eq!(w.into_inner(), "int main(void)\n{\n  return 0;\n}\n");
/// ```
pub struct CodeWriter {
    output: String,
    indent_level: usize,
    indent_string: String,
}

impl CodeWriter {
    pub fn new(indent_string: String) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_string,
        }
    }

    pub fn with_indent_spaces(spaces: usize) -> Self {
        Self::new(" ".repeat(spaces))
    }

    /// Write one line at the current indentation. Empty text writes a bare newline.
    pub fn writeln(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_string);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// `{` on its own line, then indent.
    pub fn open_brace(&mut self) {
        self.writeln("{");
        self.indent();
    }

    /// Dedent, then `}` followed by `trailer` (e.g. ` Name;`).
    pub fn close_brace(&mut self, trailer: &str) {
        self.dedent();
        self.writeln(&format!("}}{}", trailer));
    }

    pub fn into_inner(self) -> String {
        self.output
    }
}

/// Write a formatted line (like `writeln!`).
macro_rules! cw_writeln {
    ($w:expr, $($arg:tt)*) => {
        $w.writeln(&format!($($arg)*))
    };
}

pub(crate) use cw_writeln;
