pub mod app;
pub mod geometry;
pub mod graphics;
pub mod image;
pub mod logging;
pub mod pixels_renderer;
pub mod regression;
pub mod schedule;
pub mod surface;

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub use schedule::Tick;

/// Frame-by-frame state history with rewind/branch support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeMachine<State> {
    states: Vec<State>,
    frame: usize,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
            frame: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: a time machine holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame]
    }

    pub fn state_at(&self, frame: usize) -> Option<&State> {
        self.states.get(frame)
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn can_rewind(&self) -> bool {
        self.frame > 0
    }

    pub fn can_forward(&self) -> bool {
        self.frame + 1 < self.states.len()
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.frame = self.frame.saturating_sub(frames);
        self.frame
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        let max_frame = self.states.len().saturating_sub(1);
        self.frame = (self.frame + frames).min(max_frame);
        self.frame
    }

    pub fn seek(&mut self, frame: usize) -> usize {
        let max_frame = self.states.len().saturating_sub(1);
        self.frame = frame.min(max_frame);
        self.frame
    }

    /// Appends `state` after the current frame, dropping any "future" frames first.
    pub fn record(&mut self, state: State) -> usize {
        if self.frame + 1 < self.states.len() {
            self.states.truncate(self.frame + 1);
        }
        self.states.push(state);
        self.frame += 1;
        self.frame
    }
}

impl<State: Serialize> TimeMachine<State> {
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        let writer = io::BufWriter::new(file);
        serde_json::to_writer(writer, self).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl<State: DeserializeOwned> TimeMachine<State> {
    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let reader = io::BufReader::new(file);
        let tm: Self = serde_json::from_reader(reader).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed parsing recording {}: {e}", path.display()),
            )
        })?;
        if tm.states.is_empty() || tm.frame >= tm.states.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("recording {} has no frame {}", path.display(), tm.frame),
            ));
        }
        Ok(tm)
    }
}

/// A deterministic, frame-driven game.
///
/// `step` mutates the state in place and reports whether the frame loop should keep running.
/// Returning [`Tick::Halt`] is the only way a game stops its own loop: the driver simply stops
/// scheduling frames until an input wakes it up again.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &mut Self::State, input: Self::Input) -> Tick;
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
    scheduled: bool,
}

impl<G> HeadlessRunner<G>
where
    G: GameLogic,
    G::State: Clone,
{
    pub fn new(game: G) -> Self {
        let initial_state = game.initial_state();
        Self {
            game,
            timemachine: TimeMachine::new(initial_state),
            scheduled: true,
        }
    }

    pub fn from_timemachine(game: G, timemachine: TimeMachine<G::State>) -> Self {
        Self {
            game,
            timemachine,
            scheduled: true,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn timemachine(&self) -> &TimeMachine<G::State> {
        &self.timemachine
    }

    /// Whether the last step asked for another frame.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Delivers `input` and runs one step, recording the result as a new frame.
    ///
    /// Inputs are delivered even when the loop is halted, so a halted game can still
    /// react to a wake-up key.
    pub fn step(&mut self, input: G::Input) -> usize {
        let mut next = self.timemachine.state().clone();
        let tick = self.game.step(&mut next, input);
        self.scheduled = tick.is_continue();
        self.timemachine.record(next)
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    /// Steps with inputs from `next_input` until the game halts or `max_frames` steps ran.
    pub fn run_until_halt<F>(&mut self, max_frames: usize, mut next_input: F) -> usize
    where
        F: FnMut(usize) -> G::Input,
    {
        let mut last_frame = self.frame();
        for _ in 0..max_frames {
            let input = next_input(last_frame);
            last_frame = self.step(input);
            if !self.scheduled {
                break;
            }
        }
        last_frame
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.timemachine.rewind(frames)
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.timemachine.forward(frames)
    }

    pub fn seek(&mut self, frame: usize) -> usize {
        self.timemachine.seek(frame)
    }
}
