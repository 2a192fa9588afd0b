//! Terminal rendering for diagnostics.
//!
//! Renders each diagnostic with a `-->` location header and a source
//! snippet: the primary location underlined with `^`, secondary labels
//! with `-` and their message.

use std::io::{self, Write};

use vela_ir::{Loc, SourceMap};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Writes human-readable diagnostics.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W) -> Self {
        TerminalEmitter {
            writer,
            colors: false,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.colors {
            code
        } else {
            ""
        }
    }

    /// Render one diagnostic.
    pub fn emit(&mut self, diagnostic: &Diagnostic, sources: &SourceMap) -> io::Result<()> {
        let severity_color = match diagnostic.severity {
            Severity::Error => self.paint(colors::ERROR),
            Severity::Warning => self.paint(colors::WARNING),
            Severity::Note => self.paint(colors::NOTE),
        };
        let bold = self.paint(colors::BOLD);
        let reset = self.paint(colors::RESET);

        writeln!(
            self.writer,
            "{severity_color}{}[{}]{reset}{bold}: {}{reset}",
            diagnostic.severity.describe(),
            diagnostic.code,
            diagnostic.message
        )?;

        if let Some(loc) = diagnostic.primary {
            self.snippet(loc, None, "^", severity_color, sources)?;
        }
        for label in &diagnostic.labels {
            let secondary = self.paint(colors::SECONDARY);
            self.snippet(label.loc, Some(&label.message), "-", secondary, sources)?;
        }
        for line in &diagnostic.help {
            writeln!(self.writer, "  {bold}= help:{reset} {line}")?;
        }
        writeln!(self.writer)
    }

    /// Render every diagnostic in order.
    pub fn emit_all<'a>(
        &mut self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
        sources: &SourceMap,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(diagnostic, sources)?;
        }
        Ok(())
    }

    fn snippet(
        &mut self,
        loc: Loc,
        label: Option<&str>,
        underline: &str,
        color: &'static str,
        sources: &SourceMap,
    ) -> io::Result<()> {
        let reset = self.paint(colors::RESET);

        let Some(source) = sources.get(loc.source) else {
            return writeln!(self.writer, "  --> <unknown>:{:?}", loc.span);
        };

        let table = LineOffsetTable::new(&source.text);
        let (line, col) = table.line_col(&source.text, loc.span.start);
        writeln!(self.writer, "  --> {}:{line}:{col}", source.path)?;

        let Some(text) = table.line_text(&source.text, line) else {
            return Ok(());
        };
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());

        writeln!(self.writer, " {pad} |")?;
        writeln!(self.writer, " {gutter} | {text}")?;

        // Underline within this line only; multi-line spans underline to the
        // end of the first line.
        let line_start = table.line_start(line).unwrap_or(0);
        let start_in_line = (loc.span.start - line_start) as usize;
        let end_in_line = (loc.span.end.saturating_sub(line_start) as usize).min(text.len());
        let lead = text[..start_in_line.min(text.len())].chars().count();
        let width = text[start_in_line.min(text.len())..end_in_line]
            .chars()
            .count()
            .max(1);

        write!(
            self.writer,
            " {pad} | {}{color}{}{reset}",
            " ".repeat(lead),
            underline.repeat(width)
        )?;
        match label {
            Some(message) => writeln!(self.writer, " {color}{message}{reset}"),
            None => writeln!(self.writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use vela_ir::SourceMap;

    fn render(diagnostic: &Diagnostic, sources: &SourceMap) -> String {
        let mut out = Vec::new();
        TerminalEmitter::new(&mut out)
            .emit(diagnostic, sources)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_primary_snippet() {
        let mut sources = SourceMap::new();
        let src = sources.add("demo.vela", ".", "class C {\n  x: I32;\n  x: I32;\n}\n");
        let loc = Loc::new(src.id, 22, 23);

        let text = render(
            &Diagnostic::error(ErrorCode::E1007, "there is a previous definition of `x`")
                .at(loc)
                .with_label(Loc::new(src.id, 12, 13), "the previous definition is here"),
            &sources,
        );

        assert!(text.contains("error[E1007]"));
        assert!(text.contains("--> demo.vela:3:3"));
        assert!(text.contains("^"));
        assert!(text.contains("the previous definition is here"));
    }

    #[test]
    fn test_no_location() {
        let sources = SourceMap::new();
        let text = render(
            &Diagnostic::error(ErrorCode::E0001, "couldn't read file `missing.vela`")
                .with_help("tried ./missing.vela"),
            &sources,
        );
        assert!(text.contains("couldn't read file"));
        assert!(text.contains("= help: tried ./missing.vela"));
    }
}
