//! `TuringConsole`: the surface the execution engine draws through.
//!
//! Owns the backend for its whole lifetime. Construction acquires the
//! terminal; dropping the console gives it back, on every exit path.
//! Each public operation ends with a backend flush so the cell-buffer backend
//! is visible at operation boundaries.

use std::io::{Read, Seek};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{error, info, warn};

use crate::code::CodeRenderer;
use crate::error::{ConsoleError, ErrorReport};
use crate::layout::Layout;
use crate::scroller;
use crate::source::SourceStream;
use crate::tape::TapeRenderer;
use crate::term::{Backend, BackendKind};
use crate::types::Theme;

pub struct TuringConsole<B: Backend> {
    backend: B,
    layout: Layout,
    theme: Theme,
    tape: TapeRenderer,
    code: CodeRenderer,
    errors_tx: Sender<ErrorReport>,
    errors_rx: Receiver<ErrorReport>,
}

impl<B: Backend> TuringConsole<B> {
    /// Acquire the terminal, compute the layout, clear the screen and paint
    /// both scrollers disabled.
    ///
    /// Any failure here is fatal; the backend is torn down before returning.
    pub fn new<R: Read + Seek>(
        mut backend: B,
        theme: Theme,
        source: &SourceStream<R>,
    ) -> Result<Self, ConsoleError> {
        let kind = backend.kind();
        if let Err(e) = backend.init() {
            error!(target: "console", backend = kind.as_str(), error = %e, "backend_init_failed");
            return Err(e.into());
        }
        let layout = match backend
            .query_size()
            .map_err(ConsoleError::from)
            .and_then(|size| Layout::compute(size).map_err(ConsoleError::from))
        {
            Ok(layout) => layout,
            Err(e) => {
                error!(target: "console", backend = kind.as_str(), error = %e, "layout_failed");
                let _ = backend.teardown();
                return Err(e);
            }
        };
        if !source.is_open() {
            warn!(target: "console", "source_not_open");
        }

        let (errors_tx, errors_rx) = unbounded();
        let mut console = Self {
            backend,
            layout,
            theme,
            tape: TapeRenderer::new(),
            code: CodeRenderer::new(),
            errors_tx,
            errors_rx,
        };
        console.backend.clear()?;
        scroller::paint(&mut console.backend, &console.layout, &console.theme, true, true)?;
        console.backend.flush()?;
        info!(
            target: "console",
            backend = kind.as_str(),
            width = layout.size.width,
            height = layout.size.height,
            tape_width = layout.tape_width,
            "console_ready"
        );
        Ok(console)
    }

    pub fn get_width(&self) -> u16 {
        self.layout.size.width
    }

    pub fn get_height(&self) -> u16 {
        self.layout.size.height
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn tape_cursor(&self) -> usize {
        self.tape.cursor()
    }

    /// 1-based, 0 when nothing has been highlighted yet.
    pub fn current_code_line(&self) -> usize {
        self.code.current_line()
    }

    /// Receiving end of the error channel. Every soft failure is reported
    /// here as well as returned.
    pub fn errors(&self) -> Receiver<ErrorReport> {
        self.errors_rx.clone()
    }

    pub fn clear(&mut self) -> Result<(), ConsoleError> {
        let result = self.backend.clear().map_err(ConsoleError::from);
        self.finish("clear", result)
    }

    /// Move the tape head highlight to `position`.
    pub fn set_tape_cursor(&mut self, position: usize, tape: &str) -> Result<(), ConsoleError> {
        let result = self
            .tape
            .move_cursor(&mut self.backend, &self.layout, &self.theme, position, tape);
        self.finish("set_tape_cursor", result)
    }

    /// Move the current-line highlight to `line` (1-based).
    pub fn set_current_code_line<R: Read + Seek>(
        &mut self,
        line: usize,
        stream: &mut SourceStream<R>,
    ) -> Result<(), ConsoleError> {
        let result = self
            .code
            .highlight_line(&mut self.backend, &self.layout, &self.theme, line, stream);
        self.finish("set_current_code_line", result)
    }

    /// Overwrite the symbol of one tape cell.
    pub fn write_at(&mut self, symbol: char, position: usize) -> Result<(), ConsoleError> {
        let result = self
            .tape
            .write_cell(&mut self.backend, &self.layout, &self.theme, symbol, position);
        self.finish("write_at", result)
    }

    /// Paint the program listing. Returns `false` if the stream is not open
    /// or could not be read; the reason goes to the error channel.
    pub fn print_turing_code<R: Read + Seek>(&mut self, stream: &mut SourceStream<R>) -> bool {
        let result = self
            .code
            .paint_full(&mut self.backend, &self.layout, &self.theme, stream);
        self.finish("print_turing_code", result).is_ok()
    }

    /// Repaint the whole tape.
    pub fn set_tape_value(&mut self, tape: &str) -> Result<(), ConsoleError> {
        let result = self
            .tape
            .paint_full(&mut self.backend, &self.layout, &self.theme, tape);
        self.finish("set_tape_value", result)
    }

    pub fn draw_tape_scrollers(
        &mut self,
        left_disabled: bool,
        right_disabled: bool,
    ) -> Result<(), ConsoleError> {
        let result = scroller::paint(
            &mut self.backend,
            &self.layout,
            &self.theme,
            left_disabled,
            right_disabled,
        )
        .map_err(ConsoleError::from);
        self.finish("draw_tape_scrollers", result)
    }

    /// Flush whatever the operation drew (partial draws included) and report
    /// a failure once.
    fn finish(
        &mut self,
        operation: &'static str,
        result: Result<(), ConsoleError>,
    ) -> Result<(), ConsoleError> {
        let flushed = self.backend.flush().map_err(ConsoleError::from);
        let result = result.and(flushed);
        if let Err(e) = &result {
            error!(target: "console", operation, error = %e, "operation_failed");
            let _ = self.errors_tx.send(ErrorReport {
                operation,
                message: e.to_string(),
            });
        }
        result
    }
}

impl<B: Backend> Drop for TuringConsole<B> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.teardown() {
            error!(target: "console", error = %e, "teardown_failed");
        } else {
            info!(target: "console", "console_closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{AnsiBackend, BufferedBackend};
    use crate::types::ScreenSize;
    use std::io::Cursor;

    fn closed() -> SourceStream<Cursor<Vec<u8>>> {
        SourceStream::closed()
    }

    #[test]
    fn construction_rejects_tiny_terminal() {
        let backend = BufferedBackend::with_size(Vec::new(), ScreenSize::new(8, 3));
        let err = TuringConsole::new(backend, Theme::default(), &closed()).err().unwrap();
        assert!(matches!(err, ConsoleError::Layout(_)));
    }

    #[test]
    fn construction_paints_disabled_scrollers() {
        let backend = BufferedBackend::with_size(Vec::new(), ScreenSize::new(40, 12));
        let console = TuringConsole::new(backend, Theme::default(), &closed()).unwrap();
        assert_eq!(console.get_width(), 40);
        assert_eq!(console.get_height(), 12);
        assert_eq!(console.tape_cursor(), 0);
        assert_eq!(console.current_code_line(), 0);

        let fb = console.backend().presented().unwrap();
        assert_eq!(&fb.row_text(2)[1..4], " < ");
    }

    #[test]
    fn soft_failures_reach_the_error_channel() {
        let backend = AnsiBackend::with_size(Vec::new(), ScreenSize::new(40, 12));
        let mut console = TuringConsole::new(backend, Theme::default(), &closed()).unwrap();
        let errors = console.errors();

        assert!(!console.print_turing_code(&mut closed()));
        assert!(console.set_tape_cursor(9, "01").is_err());

        let reports: Vec<_> = errors.try_iter().collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].operation, "print_turing_code");
        assert_eq!(reports[1].operation, "set_tape_cursor");
        assert!(reports[1].message.contains("position 9"));
    }
}
