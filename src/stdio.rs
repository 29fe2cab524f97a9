use std::io::{self, BufRead, Write};

use minesweeper_plugin::{BoardView, Host, HostEvent, MinesweeperPlugin, PluginMessage};
use tracing::{debug, error, warn};

pub type StdioPlugin<W> = MinesweeperPlugin<JsonLinesHost<W>>;

/// Writes each plugin message as one JSON line and keeps a rendered copy of
/// the board for the logs.
///
/// After a failed write nothing more is written until
/// [`JsonLinesHost::take_error`] collects the error.
pub struct JsonLinesHost<W: Write> {
    out: W,
    view: Option<BoardView>,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            view: None,
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn view(&self) -> Option<&BoardView> {
        self.view.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, message: &PluginMessage) -> io::Result<()> {
        let json = serde_json::to_string(message)?;
        writeln!(self.out, "{}", json)?;
        self.out.flush()
    }
}

impl<W: Write> Host for JsonLinesHost<W> {
    fn send(&mut self, message: PluginMessage) {
        if self.error.is_none()
            && let Err(e) = self.write_line(&message)
        {
            error!("Failed to write message: {}", e);
            self.error = Some(e);
        }

        BoardView::track(&mut self.view, &message);
        if let Some(view) = &self.view
            && matches!(
                message,
                PluginMessage::Init { .. } | PluginMessage::Update { .. }
            )
        {
            debug!("Board:\n{}", view.render());
        }
    }
}

/// Handles one event and surfaces a failed write on stdout.
pub fn dispatch<W: Write>(plugin: &mut StdioPlugin<W>, event: HostEvent) -> io::Result<()> {
    plugin.handle(event);
    match plugin.host_mut().take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Feeds newline-delimited JSON events to the plugin until `input` ends.
///
/// Bytes that are not UTF-8 are replaced before parsing, so such a line is
/// skipped like any other malformed event.
pub fn serve<R: BufRead, W: Write>(mut input: R, plugin: &mut StdioPlugin<W>) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => dispatch(plugin, event)?,
            Err(e) => warn!("Ignoring malformed event {:?}: {}", line, e),
        }
    }
}
