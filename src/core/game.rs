//! Core game interface for the quizterm engine
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Requests a game makes to the host. The engine executes them between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    /// Scale applied to every tick delta. 0.0 freezes game time.
    SetTimeScale(f32),
    /// Throw the current session away and launch a fresh one.
    ResetSession,
    /// Leave the engine loop.
    Exit,
}

/// Handle passed into every game callback
#[derive(Clone)]
pub struct Context {
    tx: UnboundedSender<HostCommand>,
}

impl Context {
    pub fn new(tx: UnboundedSender<HostCommand>) -> Self {
        Self { tx }
    }

    /// Queue a command for the engine
    pub fn send_command(&self, cmd: HostCommand) {
        // The receiver only goes away when the engine is already shutting down
        if self.tx.send(cmd).is_err() {
            tracing::debug!(?cmd, "engine gone, dropping host command");
        }
    }

    pub fn send_all(&self, cmds: impl IntoIterator<Item = HostCommand>) {
        for cmd in cmds {
            self.send_command(cmd);
        }
    }
}

/// Main game trait. The engine owns the loop, the game owns the state.
pub trait Game {
    /// How often `on_tick` fires. `None` falls back to the engine default.
    fn tick_rate(&self) -> Option<Duration> {
        None
    }

    /// Called once before the first frame of a session
    fn on_start(&mut self, _ctx: &Context) {}

    /// Per-frame update. `dt` is in seconds and already time-scaled.
    fn on_tick(&mut self, dt: f32, ctx: &Context) -> Result<()>;

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context);

    /// Render the current state into the Ratatui Frame
    fn render(&self, frame: &mut ratatui::Frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn commands_arrive_in_order() {
        let (tx, mut rx) = unbounded_channel();
        let ctx = Context::new(tx);

        ctx.send_all([HostCommand::SetTimeScale(0.0), HostCommand::ResetSession]);
        ctx.send_command(HostCommand::Exit);

        assert_eq!(rx.try_recv().unwrap(), HostCommand::SetTimeScale(0.0));
        assert_eq!(rx.try_recv().unwrap(), HostCommand::ResetSession);
        assert_eq!(rx.try_recv().unwrap(), HostCommand::Exit);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sending_after_engine_drop_is_silent() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        let ctx = Context::new(tx);
        ctx.send_command(HostCommand::Exit);
    }
}
