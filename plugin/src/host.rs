use minesweeper_common::protocol::PluginMessage;

/// The shell embedding the plugin. Messages are delivered in order and the
/// plugin never waits for an answer; replies come back as new events.
pub trait Host {
    fn send(&mut self, message: PluginMessage);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn send(&mut self, message: PluginMessage) {
        (**self).send(message)
    }
}

/// Collects messages, handy for tests and for batching.
impl Host for Vec<PluginMessage> {
    fn send(&mut self, message: PluginMessage) {
        self.push(message)
    }
}
