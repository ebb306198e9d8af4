//! Cycle-level stimulus programs.
//!
//! A [`StimulusProgram`] is called once per active clock edge with what the
//! monitors observed in the previous cycle and answers with what to drive
//! next. Requests that go unaccepted are the program's to re-issue; an
//! expectation riding alongside a request is scheduled by the orchestrator
//! only once that request's acceptance is observed.

use crate::model::{OUTPUT_BASE, REG_CTRL, REG_FILTER0, REG_LENGTH, REG_STATUS, STATUS_DONE};
use crate::txn::{ObiRequest, RegRequest};

/// What the monitors observed in the previous cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleInputs {
    /// An OBI request was accepted.
    pub obi_accepted: bool,
    /// A register request was accepted.
    pub reg_accepted: bool,
    /// An OBI response was valid.
    pub obi_data_ready: bool,
    /// OBI response data, when valid.
    pub obi_rdata: u32,
    /// Register read data from the acceptance cycle.
    pub reg_rdata: u32,
    /// The interrupt line was asserted.
    pub irq: bool,
}

/// What to drive in the coming cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleOutputs {
    /// OBI request to drive, if any.
    pub obi: Option<ObiRequest>,
    /// Expected response for the OBI request, checked when it is a read.
    pub obi_expected: Option<u32>,
    /// Register request to drive, if any.
    pub reg: Option<RegRequest>,
    /// Expected read data for the register request.
    pub reg_expected: Option<u32>,
}

/// A test program generating per-cycle stimulus.
pub trait StimulusProgram {
    /// Advances the program one cycle.
    fn next(&mut self, inputs: &CycleInputs) -> CycleOutputs;

    /// Monotonic progress counter, fed to the watchdog. The counter must
    /// change whenever the program makes forward progress.
    fn step(&self) -> u64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    ConfigLength,
    ConfigFilter(usize),
    LoadInput(usize),
    Start,
    WaitIrq,
    CheckStatus,
    ReadOutput { issued: usize, received: usize },
    Done,
}

/// Directed CONV1D test: configure, load samples, start, wait for the
/// interrupt, verify status, then read back every output word against a
/// software convolution.
///
/// Output reads are pipelined back to back, one new request per cycle as
/// the previous one is accepted, so the whole read-back resolves within a
/// handful of cycles of the first response. The device answers reads in
/// acceptance order, which keeps the pipelined responses aligned with the
/// scheduled expectations.
#[derive(Debug)]
pub struct Conv1dProgram {
    samples: Vec<u32>,
    taps: [u32; 3],
    expected: Vec<u32>,
    phase: Phase,
    step: u64,
}

impl Conv1dProgram {
    /// Creates a program over the given input samples and filter taps.
    pub fn new(samples: Vec<u32>, taps: [u32; 3]) -> Self {
        let expected = golden_conv(&samples, &taps);
        Self {
            samples,
            taps,
            expected,
            phase: Phase::ConfigLength,
            step: 0,
        }
    }

    /// The software-model output words the DUT is checked against.
    pub fn expected_outputs(&self) -> &[u32] {
        &self.expected
    }

    /// Whether every phase has completed.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn advance(&mut self, to: Phase) {
        self.phase = to;
        self.step += 1;
    }
}

/// Reference convolution with wrapping 32-bit arithmetic, one output per
/// fully-overlapping filter position.
pub fn golden_conv(samples: &[u32], taps: &[u32; 3]) -> Vec<u32> {
    if samples.len() < taps.len() {
        return Vec::new();
    }
    (0..=samples.len() - taps.len())
        .map(|i| {
            taps.iter()
                .enumerate()
                .fold(0u32, |acc, (j, &tap)| {
                    acc.wrapping_add(samples[i + j].wrapping_mul(tap))
                })
        })
        .collect()
}

impl StimulusProgram for Conv1dProgram {
    fn next(&mut self, inputs: &CycleInputs) -> CycleOutputs {
        // Consume last cycle's observations first.
        match self.phase {
            Phase::ConfigLength if inputs.reg_accepted => {
                self.advance(Phase::ConfigFilter(0));
            }
            Phase::ConfigFilter(i) if inputs.reg_accepted => {
                if i + 1 < self.taps.len() {
                    self.advance(Phase::ConfigFilter(i + 1));
                } else if self.samples.is_empty() {
                    self.advance(Phase::Start);
                } else {
                    self.advance(Phase::LoadInput(0));
                }
            }
            Phase::LoadInput(i) if inputs.obi_accepted => {
                if i + 1 < self.samples.len() {
                    self.advance(Phase::LoadInput(i + 1));
                } else {
                    self.advance(Phase::Start);
                }
            }
            Phase::Start if inputs.reg_accepted => {
                self.advance(Phase::WaitIrq);
            }
            Phase::WaitIrq if inputs.irq => {
                self.advance(Phase::CheckStatus);
            }
            Phase::CheckStatus if inputs.reg_accepted => {
                if self.expected.is_empty() {
                    self.advance(Phase::Done);
                } else {
                    self.advance(Phase::ReadOutput {
                        issued: 0,
                        received: 0,
                    });
                }
            }
            Phase::ReadOutput {
                mut issued,
                mut received,
            } => {
                // Acceptance and a response can land in the same cycle.
                if inputs.obi_accepted {
                    issued += 1;
                    self.step += 1;
                }
                if inputs.obi_data_ready {
                    received += 1;
                    self.step += 1;
                }
                self.phase = if received >= self.expected.len() {
                    Phase::Done
                } else {
                    Phase::ReadOutput { issued, received }
                };
            }
            _ => {}
        }

        // Then drive for the (possibly new) current phase.
        let mut out = CycleOutputs::default();
        match self.phase {
            Phase::ConfigLength => {
                out.reg = Some(RegRequest::write(
                    REG_LENGTH,
                    self.samples.len() as u32,
                    0xf,
                ));
            }
            Phase::ConfigFilter(i) => {
                out.reg = Some(RegRequest::write(
                    REG_FILTER0 + 4 * i as u32,
                    self.taps[i],
                    0xf,
                ));
            }
            Phase::LoadInput(i) => {
                out.obi = Some(ObiRequest::write(4 * i as u32, self.samples[i], 0xf));
            }
            Phase::Start => {
                out.reg = Some(RegRequest::write(REG_CTRL, 1, 0xf));
            }
            Phase::WaitIrq => {}
            Phase::CheckStatus => {
                out.reg = Some(RegRequest::read(REG_STATUS));
                out.reg_expected = Some(STATUS_DONE);
            }
            Phase::ReadOutput { issued, .. } => {
                if issued < self.expected.len() {
                    out.obi = Some(ObiRequest::read(OUTPUT_BASE + 4 * issued as u32));
                    out.obi_expected = Some(self.expected[issued]);
                }
            }
            Phase::Done => {}
        }
        out
    }

    fn step(&self) -> u64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPT_REG: CycleInputs = CycleInputs {
        obi_accepted: false,
        reg_accepted: true,
        obi_data_ready: false,
        obi_rdata: 0,
        reg_rdata: 0,
        irq: false,
    };

    const ACCEPT_OBI: CycleInputs = CycleInputs {
        obi_accepted: true,
        reg_accepted: false,
        obi_data_ready: false,
        obi_rdata: 0,
        reg_rdata: 0,
        irq: false,
    };

    #[test]
    fn golden_conv_basic() {
        let out = golden_conv(&[1, 2, 3, 4], &[1, 0, 2]);
        assert_eq!(out, vec![1 + 6, 2 + 8]);
    }

    #[test]
    fn golden_conv_wraps() {
        let out = golden_conv(&[u32::MAX, 1, 1], &[2, 0, 0]);
        assert_eq!(out[0], u32::MAX.wrapping_mul(2));
    }

    #[test]
    fn golden_conv_short_input_is_empty() {
        assert!(golden_conv(&[1, 2], &[1, 1, 1]).is_empty());
    }

    #[test]
    fn config_phase_writes_length_then_taps() {
        let mut p = Conv1dProgram::new(vec![5, 6, 7, 8], [1, 2, 3]);
        let out = p.next(&CycleInputs::default());
        assert_eq!(out.reg, Some(RegRequest::write(REG_LENGTH, 4, 0xf)));

        let out = p.next(&ACCEPT_REG);
        assert_eq!(out.reg, Some(RegRequest::write(REG_FILTER0, 1, 0xf)));
        let out = p.next(&ACCEPT_REG);
        assert_eq!(out.reg, Some(RegRequest::write(REG_FILTER0 + 4, 2, 0xf)));
        let out = p.next(&ACCEPT_REG);
        assert_eq!(out.reg, Some(RegRequest::write(REG_FILTER0 + 8, 3, 0xf)));
    }

    #[test]
    fn unaccepted_request_is_reissued_without_progress() {
        let mut p = Conv1dProgram::new(vec![1, 2, 3], [1, 1, 1]);
        let first = p.next(&CycleInputs::default());
        let step = p.step();
        let again = p.next(&CycleInputs::default());
        assert_eq!(first.reg, again.reg);
        assert_eq!(p.step(), step);
    }

    #[test]
    fn samples_loaded_over_obi_after_config() {
        let mut p = Conv1dProgram::new(vec![10, 20, 30], [1, 1, 1]);
        for _ in 0..4 {
            p.next(&ACCEPT_REG);
        }
        // First call after config emits the first sample write.
        let out = p.next(&ACCEPT_REG);
        assert_eq!(out.obi, Some(ObiRequest::write(0, 10, 0xf)));
        let out = p.next(&ACCEPT_OBI);
        assert_eq!(out.obi, Some(ObiRequest::write(4, 20, 0xf)));
        assert!(out.obi_expected.is_none());
    }

    fn run_to_wait_irq(p: &mut Conv1dProgram) {
        let n = p.samples.len();
        p.next(&CycleInputs::default());
        for _ in 0..4 {
            p.next(&ACCEPT_REG);
        }
        for _ in 0..n {
            p.next(&ACCEPT_OBI);
        }
        // Start write accepted.
        p.next(&ACCEPT_REG);
        assert_eq!(p.phase, Phase::WaitIrq);
    }

    #[test]
    fn waits_for_irq_then_checks_status() {
        let mut p = Conv1dProgram::new(vec![1, 2, 3, 4], [1, 1, 1]);
        run_to_wait_irq(&mut p);

        // No stimulus while waiting.
        let out = p.next(&CycleInputs::default());
        assert!(out.obi.is_none() && out.reg.is_none());

        let out = p.next(&CycleInputs {
            irq: true,
            ..CycleInputs::default()
        });
        assert_eq!(out.reg, Some(RegRequest::read(REG_STATUS)));
        assert_eq!(out.reg_expected, Some(STATUS_DONE));
    }

    #[test]
    fn output_reads_are_pipelined() {
        let mut p = Conv1dProgram::new(vec![1, 2, 3, 4], [1, 0, 1]);
        let expected = p.expected_outputs().to_vec();
        assert_eq!(expected, vec![4, 6]);
        run_to_wait_irq(&mut p);
        p.next(&CycleInputs {
            irq: true,
            ..CycleInputs::default()
        });

        // Status read accepted; first output read goes out.
        let out = p.next(&ACCEPT_REG);
        assert_eq!(out.obi, Some(ObiRequest::read(OUTPUT_BASE)));
        assert_eq!(out.obi_expected, Some(4));

        // Acceptance alone is enough to issue the next read.
        let out = p.next(&ACCEPT_OBI);
        assert_eq!(out.obi, Some(ObiRequest::read(OUTPUT_BASE + 4)));
        assert_eq!(out.obi_expected, Some(6));

        // Last read accepted while the first response arrives; nothing
        // more to issue.
        let out = p.next(&CycleInputs {
            obi_accepted: true,
            obi_data_ready: true,
            obi_rdata: 4,
            ..CycleInputs::default()
        });
        assert!(out.obi.is_none());
        assert!(!p.is_done());

        let out = p.next(&CycleInputs {
            obi_data_ready: true,
            obi_rdata: 6,
            ..CycleInputs::default()
        });
        assert!(out.obi.is_none());
        assert!(p.is_done());
    }

    #[test]
    fn unaccepted_output_read_is_reissued() {
        let mut p = Conv1dProgram::new(vec![1, 2, 3], [1, 1, 1]);
        run_to_wait_irq(&mut p);
        p.next(&CycleInputs {
            irq: true,
            ..CycleInputs::default()
        });
        let first = p.next(&ACCEPT_REG);
        // Grant denied: the same read is driven again.
        let again = p.next(&CycleInputs::default());
        assert_eq!(first.obi, again.obi);
        assert_eq!(first.obi_expected, again.obi_expected);
    }

    #[test]
    fn step_counts_every_phase_transition() {
        let mut p = Conv1dProgram::new(vec![1, 2, 3], [1, 1, 1]);
        assert_eq!(p.step(), 0);
        p.next(&CycleInputs::default());
        assert_eq!(p.step(), 0);
        p.next(&ACCEPT_REG);
        assert_eq!(p.step(), 1);
    }
}
