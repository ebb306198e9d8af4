//! Simulation orchestrator.
//!
//! [`Harness::run`] owns the event loop: it ticks the clock twice per
//! cycle, settles the model, lets the stimulus program drive, samples the
//! monitors, feeds the scoreboard, and arbitrates the end of the test
//! between the watchdog, the completion grace period, and the hard cycle
//! ceiling.

use std::fs::{self, File};
use std::io::BufWriter;

use convtb_common::{LogLevel, TbLogger};

use crate::clock::SimClock;
use crate::config::HarnessConfig;
use crate::driver::Driver;
use crate::error::TbError;
use crate::monitor::{RequestMonitor, ResponseMonitor};
use crate::ports::{DutModel, DutPorts};
use crate::program::{CycleInputs, StimulusProgram};
use crate::scoreboard::Scoreboard;
use crate::watchdog::Watchdog;
use crate::waveform::{PortTracer, VcdRecorder};

/// Lifecycle of a harness run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HarnessState {
    /// Reset is asserted; no stimulus yet.
    Resetting,
    /// Stimulus and checking in progress.
    Running,
    /// The watchdog tripped; the run is being wound down.
    Stalled,
    /// All checks matched; draining for the grace period.
    Completing,
    /// The run is over.
    Terminated,
}

/// Verdict of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    /// Every check fired and matched.
    Passed,
    /// At least one check mismatched or the watchdog tripped.
    Failed,
    /// At least one scheduled check never saw its response.
    ChecksPending,
}

/// Statistics and verdict of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestReport {
    /// The overall verdict.
    pub outcome: TestOutcome,
    /// Failed checks plus externally notified errors.
    pub error_count: u32,
    /// Comparisons performed.
    pub transaction_count: u32,
    /// Clock cycles simulated.
    pub cycles: u64,
}

/// Drives one model with one stimulus program to completion.
pub struct Harness<M: DutModel, P: StimulusProgram> {
    model: M,
    program: P,
    config: HarnessConfig,
    logger: TbLogger,
    tracer: Option<PortTracer>,
}

impl<M: DutModel, P: StimulusProgram> Harness<M, P> {
    /// Creates a harness without waveform recording.
    pub fn new(model: M, program: P, config: HarnessConfig, logger: TbLogger) -> Self {
        Self {
            model,
            program,
            config,
            logger,
            tracer: None,
        }
    }

    /// Attaches a waveform tracer.
    pub fn with_tracer(mut self, tracer: PortTracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Runs the simulation to completion and reports the verdict.
    ///
    /// The run ends on the first of: the grace period opened by the first
    /// fired check expires, the watchdog trips, or the cycle ceiling is
    /// reached. The ceiling is a truncation, not an error by itself.
    pub fn run(&mut self) -> Result<TestReport, TbError> {
        let mut ports = DutPorts::default();
        let mut clock = SimClock::new(self.config.end_of_reset_time);
        let mut driver = Driver::new();
        let mut req_mon = RequestMonitor::new();
        let mut rsp_mon = ResponseMonitor::new();
        let mut scoreboard = Scoreboard::new(self.logger);
        let mut watchdog = Watchdog::new(self.config.watchdog_timeout);

        let mut state = HarnessState::Resetting;
        let mut inputs = CycleInputs::default();
        let mut obi_slot: Option<u32> = None;
        let mut reg_slot: Option<u32> = None;
        let mut grace: u64 = 0;
        let max_steps = self.config.max_cycles.saturating_mul(2);

        while clock.time() < max_steps && state != HarnessState::Terminated {
            clock.toggle();
            clock.apply(&mut ports);
            self.model.eval(&mut ports);

            if clock.active_edge() {
                if state == HarnessState::Resetting {
                    state = HarnessState::Running;
                    self.logger
                        .log(LogLevel::Low, clock.cycles(), "reset released");
                }

                let out = self.program.next(&inputs);
                if out.obi.is_some() {
                    obi_slot = out.obi_expected;
                }
                if out.reg.is_some() {
                    reg_slot = out.reg_expected;
                }
                driver.drive(&mut ports, out.obi, out.reg);
                self.model.eval(&mut ports);

                req_mon.sample(&ports);
                rsp_mon.sample(&ports);

                // An expectation is armed only once its request is seen
                // accepted; re-driven requests keep the same slot.
                if req_mon.accepted_obi() {
                    if let Some(expected) = obi_slot.take() {
                        scoreboard.schedule_obi_check(expected);
                    }
                }
                if req_mon.accepted_reg() {
                    if let Some(expected) = reg_slot.take() {
                        scoreboard.schedule_reg_check(expected);
                    }
                }

                let obi_rsp = rsp_mon.obi_data_ready().then(|| rsp_mon.obi_data());
                let reg_rsp = req_mon.accepted_reg().then(|| rsp_mon.reg_data());
                let fired = scoreboard.evaluate(clock.cycles(), obi_rsp, reg_rsp);

                inputs = CycleInputs {
                    obi_accepted: req_mon.accepted_obi(),
                    reg_accepted: req_mon.accepted_reg(),
                    obi_data_ready: rsp_mon.obi_data_ready(),
                    obi_rdata: rsp_mon.obi_data(),
                    reg_rdata: rsp_mon.reg_data(),
                    irq: rsp_mon.irq(),
                };

                // The watchdog stays armed through the grace period.
                if matches!(state, HarnessState::Running | HarnessState::Completing)
                    && watchdog.update(self.program.step())
                {
                    self.logger.warn(
                        clock.cycles(),
                        &format!(
                            "watchdog timeout after {} cycles without progress",
                            watchdog.stalled_cycles()
                        ),
                    );
                    scoreboard.notify_error();
                    state = HarnessState::Stalled;
                }

                match state {
                    HarnessState::Running => {
                        // The first fired check starts the grace period;
                        // in-flight responses may still fire checks during
                        // it, but the countdown never restarts.
                        if fired > 0 {
                            self.logger.log(
                                LogLevel::Medium,
                                clock.cycles(),
                                "end of test reached, draining in-flight responses",
                            );
                            state = HarnessState::Completing;
                            grace = 0;
                        }
                    }
                    HarnessState::Completing => {
                        grace += 1;
                        if grace >= self.config.end_of_test_timeout {
                            state = HarnessState::Terminated;
                        }
                    }
                    HarnessState::Stalled => {
                        state = HarnessState::Terminated;
                    }
                    HarnessState::Resetting | HarnessState::Terminated => {}
                }
            }

            if let Some(tracer) = &mut self.tracer {
                tracer.dump(clock.time(), &ports)?;
            }
            clock.advance();
        }

        if let Some(tracer) = &mut self.tracer {
            tracer.finalize()?;
        }

        let errors = scoreboard.error_count();
        let transactions = scoreboard.transaction_count();
        // Any error outweighs leftover expectations in the verdict.
        let outcome = if errors > 0 {
            TestOutcome::Failed
        } else if scoreboard.pending_checks() > 0 {
            TestOutcome::ChecksPending
        } else {
            TestOutcome::Passed
        };

        match outcome {
            TestOutcome::Passed => self.logger.success(&format!(
                "CHECKS PASSED > errors: {errors} (checked {transactions} transactions)"
            )),
            TestOutcome::Failed => self
                .logger
                .error(&format!("CHECKS FAILED > errors: {errors}/{transactions}")),
            TestOutcome::ChecksPending => self
                .logger
                .error(&format!("CHECKS PENDING > errors: {errors}/{transactions}")),
        }

        Ok(TestReport {
            outcome,
            error_count: errors,
            transaction_count: transactions,
            cycles: clock.cycles(),
        })
    }
}

/// Builds a harness from a configuration and runs it, recording a waveform
/// when enabled.
pub fn run_simulation<M: DutModel, P: StimulusProgram>(
    model: M,
    program: P,
    config: &HarnessConfig,
    logger: TbLogger,
) -> Result<TestReport, TbError> {
    config.validate()?;
    let mut harness = Harness::new(model, program, config.clone(), logger);
    if config.record_waveform {
        if let Some(parent) = config.waveform_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&config.waveform_path)?;
        let recorder = VcdRecorder::new(BufWriter::new(file));
        harness = harness.with_tracer(PortTracer::new(Box::new(recorder), "convtb")?);
        logger.config(&format!(
            "recording waveform to {}",
            config.waveform_path.display()
        ));
    }
    harness.run()
}
