use crate::core::game::{Context, Game, HostCommand};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const DEFAULT_TICK: Duration = Duration::from_millis(16);

/// Builds a fresh game for every session
pub type GameLauncher<G> = Box<dyn Fn() -> Result<G> + Send>;

/// Global game-time scale, the terminal's stand-in for an engine time scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale(f32);

impl TimeScale {
    pub fn normal() -> Self {
        Self(1.0)
    }

    pub fn set(&mut self, scale: f32) {
        self.0 = scale.max(0.0);
    }

    pub fn is_frozen(&self) -> bool {
        self.0 == 0.0
    }

    pub fn apply(&self, real_dt: f32) -> f32 {
        real_dt * self.0
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::normal()
    }
}

/// One running game plus the host-side state that goes with it
pub struct Session<G: Game> {
    game: G,
    time_scale: TimeScale,
    last_tick: Instant,
}

impl<G: Game> Session<G> {
    /// Launch a game and call its `on_start`
    pub fn launch(launcher: &GameLauncher<G>, ctx: &Context) -> Result<Self> {
        let mut game = launcher()?;
        game.on_start(ctx);
        info!("session started");
        Ok(Self {
            game,
            time_scale: TimeScale::normal(),
            last_tick: Instant::now(),
        })
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Execute one host command. `Break` means leave the loop.
    pub fn apply(
        &mut self,
        cmd: HostCommand,
        launcher: &GameLauncher<G>,
        ctx: &Context,
    ) -> Result<ControlFlow<()>> {
        match cmd {
            HostCommand::SetTimeScale(scale) => {
                debug!(scale, "time scale changed");
                self.time_scale.set(scale);
            }
            HostCommand::ResetSession => {
                info!("resetting session");
                *self = Self::launch(launcher, ctx)?;
            }
            HostCommand::Exit => {
                info!("exit requested by game");
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    pub fn handle_input(&mut self, key: KeyEvent, ctx: &Context) {
        self.game.handle_input(key, ctx);
    }

    /// Feed `real_dt` seconds of wall time to the game, scaled
    pub fn tick(&mut self, real_dt: f32, ctx: &Context) -> Result<()> {
        self.game.on_tick(self.time_scale.apply(real_dt), ctx)
    }

    fn elapsed(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        dt
    }
}

pub struct Engine<G: Game> {
    launcher: GameLauncher<G>,
}

impl<G: Game> Engine<G> {
    pub fn new(launcher: GameLauncher<G>) -> Self {
        Self { launcher }
    }

    pub async fn run(self, mut terminal: DefaultTerminal) -> Result<()> {
        // set up the channel games use to talk back to the host
        let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<HostCommand>();
        let ctx = Context::new(cmd_tx);

        let mut session = Session::launch(&self.launcher, &ctx)?;

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(session.game().tick_rate().unwrap_or(DEFAULT_TICK));

        loop {
            terminal.draw(|f| session.game().render(f))?;

            tokio::select! {
                // 1. HOST: whatever the game asked us to do last frame
                Some(cmd) = cmd_rx.recv() => {
                    if session.apply(cmd, &self.launcher, &ctx)?.is_break() {
                        break;
                    }
                }

                // 2. INPUT: key presses only, repeats and releases are ignored
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if key.code == KeyCode::Esc { break; }
                            session.handle_input(key, &ctx);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => break,
                    }
                }

                // 3. TICK: game heartbeat
                _ = ticker.tick() => {
                    let real_dt = session.elapsed();
                    session.tick(real_dt, &ctx)?;
                }
            }
        }

        Ok(())
    }
}
