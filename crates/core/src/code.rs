//! Code renderer: program listing with comment styling and a current line.
//!
//! Lines are not indexed; every call scans the stream from the start. The
//! stream is rewound on every exit path so the caller never sees it moved.

use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::error::ConsoleError;
use crate::layout::Layout;
use crate::source::SourceStream;
use crate::term::Backend;
use crate::types::{ColorAttribute, Theme};

#[derive(Debug, Default)]
pub struct CodeRenderer {
    /// 1-based; 0 until the first successful highlight.
    current_line: usize,
}

impl CodeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Paint the whole listing. Text from `;` to the end of its line gets the
    /// comment attribute.
    pub fn paint_full<B: Backend, R: Read + Seek>(
        &self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        stream: &mut SourceStream<R>,
    ) -> Result<(), ConsoleError> {
        if !stream.is_open() {
            return Err(ConsoleError::StreamUnavailable);
        }
        stream.rewind().map_err(ConsoleError::Read)?;
        let painted = paint_listing(backend, layout, theme, stream);
        let rewound = stream.rewind().map_err(ConsoleError::Read);
        let lines = painted?;
        rewound?;
        debug!(target: "console.code", lines, "code_painted");
        Ok(())
    }

    /// Un-highlight the previous current line and highlight `target`.
    ///
    /// When `target` is past the last line the stored line is left as is, but
    /// the previous line has already been repainted without highlight by then.
    pub fn highlight_line<B: Backend, R: Read + Seek>(
        &mut self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        target: usize,
        stream: &mut SourceStream<R>,
    ) -> Result<(), ConsoleError> {
        if !stream.is_open() {
            return Err(ConsoleError::StreamUnavailable);
        }
        stream.rewind().map_err(ConsoleError::Read)?;
        let scanned = self.rewrite_lines(backend, layout, theme, target, stream);
        let rewound = stream.rewind().map_err(ConsoleError::Read);
        let (found, line_count) = scanned?;
        rewound?;

        if !found {
            warn!(target: "console.code", requested = target, line_count, prev = self.current_line, "line_out_of_range");
            return Err(ConsoleError::LineOutOfRange {
                requested: target,
                line_count,
            });
        }
        debug!(target: "console.code", from = self.current_line, to = target, "current_line_moved");
        self.current_line = target;
        Ok(())
    }

    /// Returns whether `target` was reached and how many lines were read.
    fn rewrite_lines<B: Backend, R: Read + Seek>(
        &self,
        backend: &mut B,
        layout: &Layout,
        theme: &Theme,
        target: usize,
        stream: &mut SourceStream<R>,
    ) -> Result<(bool, usize), ConsoleError> {
        let prev = self.current_line;
        let mut restored = prev == 0;
        let mut highlighted = false;
        let mut line_no = 0usize;
        let mut buf = Vec::new();

        while !(restored && highlighted) {
            buf.clear();
            if stream.read_line_bytes(&mut buf).map_err(ConsoleError::Read)? == 0 {
                break;
            }
            line_no += 1;
            let start = layout.visible_code_line(line_no);

            if line_no == prev {
                if let Some(at) = start {
                    backend.set_cursor(at)?;
                    backend.set_attribute(ColorAttribute::Reset)?;
                    backend.write_str(&display_text(layout, &buf))?;
                }
                restored = true;
            }
            // prev and target may be the same line.
            if line_no == target {
                if let Some(at) = start {
                    backend.set_cursor(at)?;
                    backend.set_attribute(theme.current_line)?;
                    backend.write_str(&display_text(layout, &buf))?;
                    backend.set_attribute(ColorAttribute::Reset)?;
                }
                highlighted = true;
            }
        }
        Ok((highlighted, line_no))
    }
}

/// Paint every on-screen line; returns the number of lines read.
fn paint_listing<B: Backend, R: Read + Seek>(
    backend: &mut B,
    layout: &Layout,
    theme: &Theme,
    stream: &mut SourceStream<R>,
) -> Result<usize, ConsoleError> {
    let mut line_no = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if stream.read_line_bytes(&mut buf).map_err(ConsoleError::Read)? == 0 {
            break;
        }
        line_no += 1;
        let Some(at) = layout.visible_code_line(line_no) else {
            continue;
        };

        backend.set_cursor(at)?;
        backend.set_attribute(ColorAttribute::Reset)?;
        let mut in_comment = false;
        for ch in display_text(layout, &buf).chars() {
            if ch == ';' && !in_comment {
                backend.set_attribute(theme.comment)?;
                in_comment = true;
            }
            backend.write_char(ch)?;
        }
        if in_comment {
            backend.set_attribute(ColorAttribute::Reset)?;
        }
    }
    Ok(line_no)
}

/// One source line as drawn: terminator dropped, invalid UTF-8 replaced,
/// control characters blanked and clipped to the screen width.
fn display_text(layout: &Layout, raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .take(layout.code_columns())
        .collect()
}
