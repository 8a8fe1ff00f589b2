// tests/session_tests.rs

use handopt::{
    Angle, CircuitBuilder, CircuitEvaluator, Color, ColorMapper, Colormap, ConsoleInput, FnEvaluator,
    HandoptError, Operation, ParameterSelection, QubitState, RenderPoint, Session, SessionBuilder,
    SessionState, StepOutcome, TargetState, TerminationReason, TrajectoryRenderer,
};

use std::cell::RefCell;
use std::f64::consts::PI;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

const TEST_TOLERANCE: f64 = 1e-12;

/// Write sink the test keeps a handle to after boxing it into the session.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

type RenderCalls = Rc<RefCell<Vec<(Vec<RenderPoint>, usize)>>>;

/// Renderer that remembers every redraw it was asked for.
struct RecordingRenderer(RenderCalls);

impl TrajectoryRenderer for RecordingRenderer {
    fn render(&mut self, points: &[RenderPoint], current: usize) -> Result<(), HandoptError> {
        self.0.borrow_mut().push((points.to_vec(), current));
        Ok(())
    }
}

struct FailingRenderer;

impl TrajectoryRenderer for FailingRenderer {
    fn render(&mut self, _points: &[RenderPoint], _current: usize) -> Result<(), HandoptError> {
        Err(HandoptError::RendererFailure { message: "display went away".to_string() })
    }
}

/// `Rx(x)` on `|0>`: zero rotation at `x = 0`, orthogonal to `|0>` at `x = π`.
fn rx_session(script: &str, budget: usize, out: &SharedBuf, calls: &RenderCalls) -> Result<Session, HandoptError> {
    let circuit = CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build();
    SessionBuilder::new(Box::new(CircuitEvaluator::new(circuit)), TargetState::new(QubitState::zero()))
        .budget(budget)
        .color_mapper(ColorMapper::new(Colormap::Bwr, false))
        .input(Box::new(ConsoleInput::new(Cursor::new(script.as_bytes().to_vec()), out.clone())))
        .output(Box::new(out.clone()))
        .renderer(Box::new(RecordingRenderer(calls.clone())))
        .build()
}

#[test]
fn test_zero_parameter_hits_target() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("0.0\n", 3, &out, &calls)?;

    assert_eq!(session.step()?, StepOutcome::Committed(1));
    let record = &session.cache().all()[0];
    assert!(record.loss().abs() < TEST_TOLERANCE, "loss = {}", record.loss());
    assert_eq!(record.color(), Color::new(0, 0, 255));
    Ok(())
}

#[test]
fn test_orthogonal_output_has_unit_loss() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let script = format!("{}\n", PI);
    let mut session = rx_session(&script, 3, &out, &calls)?;

    session.step()?;
    let record = &session.cache().all()[0];
    assert!((record.loss() - 1.0).abs() < TEST_TOLERANCE, "loss = {}", record.loss());
    assert_eq!(record.color(), Color::new(255, 0, 0));
    Ok(())
}

#[test]
fn test_malformed_input_leaves_no_trace() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("abc\n0.0\n", 5, &out, &calls)?;

    assert_eq!(session.step()?, StepOutcome::Committed(1));
    assert_eq!(session.cache().len(), 1);
    assert_eq!(session.cache().all()[0].index(), 1);
    assert_eq!(session.cache().all()[0].parameters(), &[0.0]);
    assert_eq!(session.current_iteration(), 2);
    assert_eq!(session.state(), SessionState::AwaitingInput);
    assert_eq!(calls.borrow().len(), 1, "only the valid guess is drawn");
    assert!(out.text().contains("Invalid input. Enter parameters again"));
    Ok(())
}

#[test]
fn test_non_utf8_line_reprompts_instead_of_failing() -> Result<(), HandoptError> {
    let out = SharedBuf::default();
    let circuit = CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build();
    let mut session = SessionBuilder::new(Box::new(CircuitEvaluator::new(circuit)), TargetState::new(QubitState::zero()))
        .budget(3)
        .input(Box::new(ConsoleInput::new(Cursor::new(b"\xff\xfe\n0.0\n".to_vec()), out.clone())))
        .output(Box::new(out.clone()))
        .build()?;

    assert_eq!(session.step()?, StepOutcome::Committed(1));
    assert_eq!(session.state(), SessionState::AwaitingInput);
    assert_eq!(session.cache().len(), 1);
    assert_eq!(session.cache().all()[0].parameters(), &[0.0]);
    assert!(out.text().contains("Invalid input. Enter parameters again"));
    Ok(())
}

#[test]
fn test_cache_length_ignores_reprompts() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let script = "x\n0.1\n\n1e400\n0.2\nnope\n0.3\n";
    let mut session = rx_session(script, 10, &out, &calls)?;

    for expected in 1..=3 {
        assert_eq!(session.step()?, StepOutcome::Committed(expected));
    }
    let params: Vec<f64> = session.cache().all().iter().map(|r| r.parameters()[0]).collect();
    assert_eq!(params, vec![0.1, 0.2, 0.3]);
    Ok(())
}

#[test]
fn test_budget_exhaustion_stops_asking() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("0.5\n0.25\n0.125\n", 2, &out, &calls)?;

    let reason = session.run()?;
    assert_eq!(reason, TerminationReason::BudgetExhausted);
    assert_eq!(reason.exit_status(), 0);
    assert_eq!(session.state(), SessionState::Terminated(TerminationReason::BudgetExhausted));
    assert_eq!(session.cache().len(), 2);
    assert_eq!(out.text().matches("Enter value for x1").count(), 2);
    assert!(out.text().contains("Iteration budget of 2 exhausted."));

    // Absorbing: stepping again neither reads nor records
    assert_eq!(session.step()?, StepOutcome::Terminated(TerminationReason::BudgetExhausted));
    assert_eq!(out.text().matches("Enter value for x1").count(), 2);
    assert_eq!(session.cache().len(), 2);
    Ok(())
}

#[test]
fn test_zero_budget_terminates_without_prompting() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("0.0\n", 0, &out, &calls)?;

    assert_eq!(session.run()?, TerminationReason::BudgetExhausted);
    assert!(session.cache().is_empty());
    assert!(!out.text().contains("Enter value"));
    Ok(())
}

#[test]
fn test_end_of_input_cancels_cleanly() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("0.3\n", 5, &out, &calls)?;

    let reason = session.run()?;
    assert_eq!(reason, TerminationReason::Cancelled);
    assert_eq!(reason.exit_status(), 0);
    assert_eq!(session.cache().len(), 1);
    let text = out.text();
    assert!(text.trim_end().ends_with("Enter value for x1:"), "no output after cancel: {:?}", text);
    Ok(())
}

#[test]
fn test_every_redraw_restates_full_trajectory() -> Result<(), HandoptError> {
    let (out, calls) = (SharedBuf::default(), RenderCalls::default());
    let mut session = rx_session("0.0\n1.0\n3.0\n", 3, &out, &calls)?;
    session.run()?;

    let calls = calls.borrow();
    assert_eq!(calls.len(), 3);
    for (n, (points, current)) in calls.iter().enumerate() {
        assert_eq!(points.len(), n + 1);
        assert_eq!(*current, n);
        assert_eq!(points[n].color, Color::EMPHASIS);
    }
    // Earlier trials keep their loss colors in later redraws
    let records = session.cache().all();
    assert_eq!(calls[2].0[0].color, records[0].color());
    assert_eq!(calls[2].0[1].color, records[1].color());
    assert_eq!(calls[2].0[1].bloch, records[1].output().bloch_vector());
    Ok(())
}

#[test]
fn test_banner_states_convention_and_decoy() -> Result<(), HandoptError> {
    let out = SharedBuf::default();
    let evaluator = FnEvaluator::new(2, |p: &[f64]| {
        QubitState::normalized(num_complex::Complex::new(p[0], 0.0), num_complex::Complex::new(p[1], 0.0))
    });
    let mut session = SessionBuilder::new(Box::new(evaluator), TargetState::new(QubitState::zero()))
        .budget(1)
        .color_mapper(ColorMapper::new(Colormap::Bwr, true))
        .selection(ParameterSelection::new(3, vec![0, 2])?)
        .input(Box::new(ConsoleInput::new(Cursor::new(b"1\n99\n0\n".to_vec()), out.clone())))
        .output(Box::new(out.clone()))
        .build()?;

    session.run()?;
    let text = out.text();
    assert!(text.contains("Iteration budget: 1"));
    assert!(text.contains("Red colors mean you're approaching the optimum"));
    assert!(text.contains("Note: only x1, x3 are passed to the circuit; x2 has no effect on the outcome."));

    // The decoy is recorded but never evaluated: [1, _, 0] -> |0>
    let record = &session.cache().all()[0];
    assert_eq!(record.parameters(), &[1.0, 99.0, 0.0]);
    assert!(record.loss().abs() < TEST_TOLERANCE);
    Ok(())
}

#[test]
fn test_selection_must_match_evaluator() {
    let evaluator = FnEvaluator::new(2, |_: &[f64]| Ok(QubitState::zero()));
    let result = SessionBuilder::new(Box::new(evaluator), TargetState::new(QubitState::zero()))
        .selection(ParameterSelection::all(3))
        .build();
    assert!(matches!(result, Err(HandoptError::Config { .. })));
}

#[test]
fn test_evaluator_failure_is_fatal() -> Result<(), HandoptError> {
    let out = SharedBuf::default();
    let evaluator = FnEvaluator::new(1, |_: &[f64]| -> Result<QubitState, HandoptError> {
        Err(HandoptError::EvaluatorFailure { message: "backend crashed".to_string() })
    });
    let mut session = SessionBuilder::new(Box::new(evaluator), TargetState::new(QubitState::zero()))
        .input(Box::new(ConsoleInput::new(Cursor::new(b"0.0\n0.0\n".to_vec()), out.clone())))
        .output(Box::new(out.clone()))
        .build()?;

    let err = match session.run() {
        Err(e) => e,
        Ok(reason) => panic!("expected a fatal error, session ended with {:?}", reason),
    };
    assert!(matches!(err, HandoptError::EvaluatorFailure { .. }));
    assert!(err.is_fatal());
    assert_eq!(err.exit_status(), 1);
    assert_eq!(session.state(), SessionState::Terminated(TerminationReason::Failed));
    assert!(session.cache().is_empty());
    Ok(())
}

#[test]
fn test_renderer_failure_is_fatal_and_keeps_cache() -> Result<(), HandoptError> {
    let out = SharedBuf::default();
    let circuit = CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build();
    let mut session = SessionBuilder::new(Box::new(CircuitEvaluator::new(circuit)), TargetState::new(QubitState::zero()))
        .input(Box::new(ConsoleInput::new(Cursor::new(b"0.0\n".to_vec()), out.clone())))
        .output(Box::new(out.clone()))
        .renderer(Box::new(FailingRenderer))
        .build()?;

    assert!(matches!(session.step(), Err(HandoptError::RendererFailure { .. })));
    assert!(session.cache().is_empty(), "nothing is committed before the redraw succeeds");
    assert_eq!(session.step()?, StepOutcome::Terminated(TerminationReason::Failed));
    Ok(())
}
