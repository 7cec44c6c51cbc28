//! Stdout rendering: one text block per update.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::{Content, Notice, RenderTarget, View};

/// Writes every render to an output stream, one block per update.
pub struct TerminalView<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl TerminalView {
    pub fn stdout() -> Self {
        TerminalView::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        TerminalView {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_block(&self, block: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.write_all(block.as_bytes()).and_then(|()| out.flush()) {
            tracing::debug!("terminal write failed: {e}");
        }
    }
}

impl<W: Write + Send> View for TerminalView<W> {
    fn replace(&self, target: RenderTarget, content: Content) {
        let mut block = format!("[{target}]\n");
        match content {
            Content::Rows(rows) => {
                for row in rows {
                    block.push_str("  ");
                    block.push_str(&row);
                    block.push('\n');
                }
            }
            Content::Text(text) => {
                for line in text.lines() {
                    block.push_str("  ");
                    block.push_str(line);
                    block.push('\n');
                }
            }
        }
        self.write_block(&block);
    }

    fn reveal(&self, target: RenderTarget) {
        self.write_block(&format!("[{target}] shown\n"));
    }

    fn notify(&self, notice: Notice) {
        self.write_block(&format!("!! {notice}\n"));
    }
}
