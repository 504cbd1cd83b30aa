// Output layer: a small trait for writing styled status lines so the
// rest of the crate never talks to the terminal-color machinery
// directly. `ConsoleSink` is the real implementation; tests can drop in
// a recording sink instead.

use console::style;

/// How a status line should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Plain,
}

/// Something that can display status lines to the operator.
pub trait StatusSink {
    /// Write one line in the given tone.
    fn line(&self, tone: Tone, text: &str);

    /// Write a section header. The default renders a framed title using
    /// plain lines, so implementors only have to provide `line`.
    fn header(&self, title: &str) {
        let bar = "=".repeat(60);
        self.line(Tone::Plain, "");
        self.line(Tone::Info, &bar);
        self.line(Tone::Info, &format!("  {}", title));
        self.line(Tone::Info, &bar);
    }

    /// Blank spacer line.
    fn blank(&self) {
        self.line(Tone::Plain, "");
    }
}

/// Terminal implementation backed by the `console` crate. Each tone gets
/// a color and a leading glyph; `console` handles stripping the escape
/// codes when stdout is not a tty.
#[derive(Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn line(&self, tone: Tone, text: &str) {
        match tone {
            Tone::Success => println!("{}", style(format!("✓ {}", text)).green()),
            Tone::Error => println!("{}", style(format!("✗ {}", text)).red()),
            Tone::Warning => println!("{}", style(format!("⚠ {}", text)).yellow()),
            Tone::Info => println!("{}", style(text).cyan()),
            Tone::Plain => println!("{}", text),
        }
    }
}
