// src/session/mod.rs

//! The trial-feedback loop: read a guess, evaluate it, score it, redraw the
//! trajectory, commit the trial.
//!
//! All session state lives in one [`Session`] value that owns the cache, the
//! hidden target and the collaborator handles. One iteration runs at a time;
//! the only blocking point is the input read.

mod input;
mod selection;

pub use input::{ConsoleInput, ParameterSource, parse_value};
pub use selection::ParameterSelection;

use crate::color::{Color, ColorMapper};
use crate::core::{HandoptError, TargetState};
use crate::render::{NullRenderer, RenderPoint, TrajectoryRenderer};
use crate::scoring::score;
use crate::simulation::StateEvaluator;
use crate::trial::TrialCache;
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info, trace};

/// Iteration budget used when none is configured.
pub const DEFAULT_BUDGET: usize = 30;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every budgeted iteration completed.
    BudgetExhausted,
    /// The input source was cancelled while waiting for a guess.
    Cancelled,
    /// A collaborator failed; the error was returned to the caller.
    Failed,
}

impl TerminationReason {
    /// Process exit status for a session that ended this way.
    pub fn exit_status(&self) -> u8 {
        match self {
            TerminationReason::BudgetExhausted | TerminationReason::Cancelled => 0,
            TerminationReason::Failed => 1,
        }
    }
}

/// Loop states. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Evaluating,
    Scoring,
    Rendering,
    Terminated(TerminationReason),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingInput => write!(f, "AwaitingInput"),
            SessionState::Evaluating => write!(f, "Evaluating"),
            SessionState::Scoring => write!(f, "Scoring"),
            SessionState::Rendering => write!(f, "Rendering"),
            SessionState::Terminated(reason) => write!(f, "Terminated({:?})", reason),
        }
    }
}

/// Result of one `Session::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A trial with this index was committed.
    Committed(usize),
    /// The session is over.
    Terminated(TerminationReason),
}

/// One interactive optimization run.
pub struct Session {
    evaluator: Box<dyn StateEvaluator>,
    target: TargetState,
    renderer: Box<dyn TrajectoryRenderer>,
    input: Box<dyn ParameterSource>,
    output: Box<dyn Write>,
    mapper: ColorMapper,
    selection: ParameterSelection,
    budget: usize,
    cache: TrialCache,
    state: SessionState,
    banner_shown: bool,
}

impl Session {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cache(&self) -> &TrialCache {
        &self.cache
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Index of the iteration in progress (or next to start).
    pub fn current_iteration(&self) -> usize {
        self.cache.current_iteration()
    }

    pub fn selection(&self) -> &ParameterSelection {
        &self.selection
    }

    fn transition(&mut self, next: SessionState) {
        trace!(from = %self.state, to = %next, "session transition");
        self.state = next;
    }

    fn terminate(&mut self, reason: TerminationReason) -> StepOutcome {
        self.transition(SessionState::Terminated(reason));
        info!(?reason, trials = self.cache.len(), "session terminated");
        StepOutcome::Terminated(reason)
    }

    /// Marks the session failed before handing a fatal error back.
    fn fail(&mut self, error: HandoptError) -> HandoptError {
        self.terminate(TerminationReason::Failed);
        error
    }

    fn print_banner(&mut self) -> Result<(), HandoptError> {
        let out = &mut self.output;
        writeln!(out, "Welcome. Prepare to optimize a PQC.")?;
        writeln!(out, "Iteration budget: {}", self.budget)?;
        writeln!(out, "Colormap: {}", self.mapper.colormap().name())?;
        writeln!(out, "\t{} colors mean you're approaching the optimum", self.mapper.improving_hue())?;
        writeln!(out, "\t{} colors mean you're moving away from the optimum", self.mapper.worsening_hue())?;
        writeln!(out, "\tThe current trial is drawn in black")?;
        let names: Vec<String> = (1..=self.selection.entered()).map(|i| format!("x{}", i)).collect();
        writeln!(
            out,
            "Each iteration asks for {} parameter(s): {}",
            self.selection.entered(),
            names.join(", ")
        )?;
        if let Some(note) = self.selection.disclosure() {
            writeln!(out, "\t{}", note)?;
        }
        writeln!(out)?;
        out.flush()?;
        self.banner_shown = true;
        Ok(())
    }

    fn print_summary(&mut self) -> Result<(), HandoptError> {
        writeln!(self.output, "Iteration budget of {} exhausted.", self.budget)?;
        if let Some(best) = self.cache.best() {
            writeln!(self.output, "Best trial: {} with loss {:.6}", best.index(), best.loss())?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Runs one full iteration, or terminates.
    ///
    /// Errors returned from here are fatal; the session is left in
    /// `Terminated(Failed)` and the cache keeps every previously committed trial.
    pub fn step(&mut self) -> Result<StepOutcome, HandoptError> {
        if let SessionState::Terminated(reason) = self.state {
            return Ok(StepOutcome::Terminated(reason));
        }
        if !self.banner_shown {
            self.print_banner().map_err(|e| self.fail(e))?;
        }
        if self.cache.len() >= self.budget {
            self.print_summary().map_err(|e| self.fail(e))?;
            return Ok(self.terminate(TerminationReason::BudgetExhausted));
        }

        // AwaitingInput
        let iteration = self.cache.current_iteration();
        writeln!(self.output, "Iteration {}", iteration).map_err(|e| self.fail(e.into()))?;
        writeln!(self.output, "Pick the parameters to try this iteration:").map_err(|e| self.fail(e.into()))?;
        self.output.flush().map_err(|e| self.fail(e.into()))?;

        let entered = match self.input.read_parameters(self.selection.entered()) {
            Ok(values) => values,
            Err(HandoptError::SessionCancelled) => return Ok(self.terminate(TerminationReason::Cancelled)),
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(SessionState::Evaluating);
        let forwarded = self.selection.apply(&entered).map_err(|e| self.fail(e))?;
        let output = self.evaluator.evaluate(&forwarded).map_err(|e| self.fail(e))?;

        self.transition(SessionState::Scoring);
        let loss = score(&output, self.target.state());
        let color = self.mapper.color_for(loss);
        debug!(iteration, loss, %color, "trial scored");

        self.transition(SessionState::Rendering);
        let mut points: Vec<RenderPoint> = self
            .cache
            .all()
            .iter()
            .map(|r| RenderPoint { bloch: r.output().bloch_vector(), color: r.color() })
            .collect();
        points.push(RenderPoint { bloch: output.bloch_vector(), color: Color::EMPHASIS });
        let current = points.len() - 1;
        self.renderer.render(&points, current).map_err(|e| self.fail(e))?;

        let record = self.cache.append(entered, output, loss, color);
        let index = record.index();
        let status = format!("Current loss: {}\n{}  {}\n", loss, output, output.bloch_vector());
        info!(index, loss, "trial committed");

        writeln!(self.output, "{}", status).map_err(|e| self.fail(e.into()))?;
        self.output.flush().map_err(|e| self.fail(e.into()))?;

        if self.cache.len() >= self.budget {
            self.print_summary().map_err(|e| self.fail(e))?;
            self.terminate(TerminationReason::BudgetExhausted);
        } else {
            self.transition(SessionState::AwaitingInput);
        }
        Ok(StepOutcome::Committed(index))
    }

    /// Steps until the session terminates.
    pub fn run(&mut self) -> Result<TerminationReason, HandoptError> {
        loop {
            if let StepOutcome::Terminated(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }
}

//-------------------------------------------------------------------------
// Session Builder
//-------------------------------------------------------------------------

/// Assembles a `Session` from its collaborators.
///
/// Unset pieces default to: a budget of `DEFAULT_BUDGET`, the coolwarm colormap,
/// every entered value forwarded, no rendering, stdin/stdout console input and
/// stdout status output.
pub struct SessionBuilder {
    evaluator: Box<dyn StateEvaluator>,
    target: TargetState,
    renderer: Option<Box<dyn TrajectoryRenderer>>,
    input: Option<Box<dyn ParameterSource>>,
    output: Option<Box<dyn Write>>,
    mapper: ColorMapper,
    selection: Option<ParameterSelection>,
    budget: usize,
}

impl SessionBuilder {
    pub fn new(evaluator: Box<dyn StateEvaluator>, target: TargetState) -> Self {
        Self {
            evaluator,
            target,
            renderer: None,
            input: None,
            output: None,
            mapper: ColorMapper::new(Default::default(), false),
            selection: None,
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn color_mapper(mut self, mapper: ColorMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn selection(mut self, selection: ParameterSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn renderer(mut self, renderer: Box<dyn TrajectoryRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn input(mut self, input: Box<dyn ParameterSource>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn output(mut self, output: Box<dyn Write>) -> Self {
        self.output = Some(output);
        self
    }

    /// Checks the selection policy matches the evaluator, then builds.
    pub fn build(self) -> Result<Session, HandoptError> {
        let arity = self.evaluator.parameter_count();
        let selection = self.selection.unwrap_or_else(|| ParameterSelection::all(arity));
        if selection.forwarded().len() != arity {
            return Err(HandoptError::config(format!(
                "Selection forwards {} parameters but the evaluator expects {}",
                selection.forwarded().len(),
                arity
            )));
        }
        debug!(budget = self.budget, entered = selection.entered(), forwarded = arity, "session built");

        Ok(Session {
            evaluator: self.evaluator,
            target: self.target,
            renderer: self.renderer.unwrap_or_else(|| Box::new(NullRenderer)),
            input: self.input.unwrap_or_else(|| Box::new(ConsoleInput::stdio())),
            output: self.output.unwrap_or_else(|| Box::new(io::stdout())),
            mapper: self.mapper,
            selection,
            budget: self.budget,
            cache: TrialCache::new(),
            state: SessionState::AwaitingInput,
            banner_shown: false,
        })
    }
}
