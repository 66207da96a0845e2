//! Terminal rendering module for rich markdown output
//!
//! Markdown produced by the core display types is rendered with termimad.
//! Fenced blocks (tree drawings, diffs, command output) are printed verbatim
//! so their alignment survives.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut in_fence = false;
        for line in markdown.lines() {
            if line.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                println!("{}", fenced_line(line));
            } else if line.starts_with('#') {
                println!("\x1b[34m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Colors unified diff lines; everything else passes through.
fn fenced_line(line: &str) -> String {
    match line.as_bytes().first() {
        Some(b'+') if !line.starts_with("+++") => format!("\x1b[32m{line}\x1b[0m"),
        Some(b'-') if !line.starts_with("---") => format!("\x1b[31m{line}\x1b[0m"),
        Some(b'@') if line.starts_with("@@") => format!("\x1b[36m{line}\x1b[0m"),
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_fenced_diff_lines() {
        assert_eq!(fenced_line("+added"), "\x1b[32m+added\x1b[0m");
        assert_eq!(fenced_line("-removed"), "\x1b[31m-removed\x1b[0m");
        assert_eq!(fenced_line("+++ b/src/lib.rs"), "+++ b/src/lib.rs");
        assert_eq!(fenced_line("├── src/"), "├── src/");
    }
}
