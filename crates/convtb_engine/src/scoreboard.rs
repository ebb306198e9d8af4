//! Expectation tracking and pass/fail accounting.
//!
//! In a pipelined protocol, request acceptance and response validity are
//! never observed in the same call: the orchestrator learns a request was
//! accepted one moment and sees its response cycles later. The scoreboard
//! bridges that gap with one FIFO of expected values per protocol —
//! scheduling an expectation is explicitly decoupled from evaluating it,
//! which keeps the matching logic synchronous and unit-testable against
//! synthetic event sequences.

use std::collections::VecDeque;
use std::fmt;

use convtb_common::{LogLevel, TbLogger};

/// The protocol a check belongs to, for failure records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// The OBI memory interface.
    Obi,
    /// The register configuration interface.
    Reg,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Obi => write!(f, "OBI"),
            Protocol::Reg => write!(f, "reg"),
        }
    }
}

/// Matches scheduled expectations against observed responses, in order,
/// per protocol, and tallies pass/fail statistics.
///
/// Counters are monotonically non-decreasing and reset only at
/// construction. A leftover unmatched expectation is a defect signaled at
/// end-of-test as "checks pending" via [`is_done`](Self::is_done).
#[derive(Debug)]
pub struct Scoreboard {
    obi_q: VecDeque<u32>,
    reg_q: VecDeque<u32>,
    errors: u32,
    transactions: u32,
    logger: TbLogger,
}

impl Scoreboard {
    /// Creates an empty scoreboard reporting through the given logger.
    pub fn new(logger: TbLogger) -> Self {
        Self {
            obi_q: VecDeque::new(),
            reg_q: VecDeque::new(),
            errors: 0,
            transactions: 0,
            logger,
        }
    }

    /// Enqueues an expected OBI response value.
    pub fn schedule_obi_check(&mut self, expected: u32) {
        self.obi_q.push_back(expected);
    }

    /// Enqueues an expected register response value.
    pub fn schedule_reg_check(&mut self, expected: u32) {
        self.reg_q.push_back(expected);
    }

    /// Evaluates this cycle's observed responses against pending
    /// expectations.
    ///
    /// For each protocol that has both a pending expectation and a valid
    /// response this cycle, the oldest expectation is popped and compared.
    /// Returns the number of checks that fired; a non-zero return marks
    /// end-of-test eligibility for the orchestrator.
    pub fn evaluate(&mut self, cycle: u64, obi_rsp: Option<u32>, reg_rsp: Option<u32>) -> u32 {
        let mut fired = 0;
        if let Some(actual) = obi_rsp {
            if let Some(expected) = self.obi_q.pop_front() {
                self.compare(Protocol::Obi, cycle, expected, actual);
                fired += 1;
            }
        }
        if let Some(actual) = reg_rsp {
            if let Some(expected) = self.reg_q.pop_front() {
                self.compare(Protocol::Reg, cycle, expected, actual);
                fired += 1;
            }
        }
        fired
    }

    /// Force-increments the error counter for an external failure cause
    /// (e.g. a watchdog timeout) without a data comparison.
    pub fn notify_error(&mut self) {
        self.errors += 1;
    }

    /// Number of failed checks plus externally notified errors.
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    /// Number of comparisons performed.
    pub fn transaction_count(&self) -> u32 {
        self.transactions
    }

    /// Number of expectations still waiting for a response.
    pub fn pending_checks(&self) -> usize {
        self.obi_q.len() + self.reg_q.len()
    }

    /// Whether every scheduled expectation has been matched.
    pub fn is_done(&self) -> bool {
        self.obi_q.is_empty() && self.reg_q.is_empty()
    }

    fn compare(&mut self, protocol: Protocol, cycle: u64, expected: u32, actual: u32) {
        let index = self.transactions;
        self.transactions += 1;
        if expected != actual {
            self.errors += 1;
            self.logger.error_at(
                cycle,
                &format!(
                    "{protocol} check #{index} failed: expected 0x{expected:08x}, got 0x{actual:08x}"
                ),
            );
        } else {
            self.logger.log(
                LogLevel::High,
                cycle,
                &format!("{protocol} check #{index} passed: 0x{actual:08x}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convtb_common::LogLevel;

    fn scb() -> Scoreboard {
        Scoreboard::new(TbLogger::new(LogLevel::None))
    }

    #[test]
    fn starts_empty_and_done() {
        let s = scb();
        assert!(s.is_done());
        assert_eq!(s.error_count(), 0);
        assert_eq!(s.transaction_count(), 0);
        assert_eq!(s.pending_checks(), 0);
    }

    #[test]
    fn matching_response_counts_transaction_only() {
        let mut s = scb();
        s.schedule_obi_check(0xDEAD_BEEF);
        let fired = s.evaluate(3, Some(0xDEAD_BEEF), None);
        assert_eq!(fired, 1);
        assert_eq!(s.error_count(), 0);
        assert_eq!(s.transaction_count(), 1);
        assert!(s.is_done());
    }

    #[test]
    fn mismatch_increments_both_counters_once() {
        let mut s = scb();
        s.schedule_reg_check(0x0000_0001);
        let fired = s.evaluate(5, None, Some(0x0000_0000));
        assert_eq!(fired, 1);
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.transaction_count(), 1);
    }

    #[test]
    fn response_without_expectation_is_ignored() {
        let mut s = scb();
        let fired = s.evaluate(0, Some(0x1234), Some(0x5678));
        assert_eq!(fired, 0);
        assert_eq!(s.transaction_count(), 0);
        assert_eq!(s.error_count(), 0);
    }

    #[test]
    fn expectation_without_response_stays_pending() {
        let mut s = scb();
        s.schedule_obi_check(7);
        let fired = s.evaluate(0, None, None);
        assert_eq!(fired, 0);
        assert!(!s.is_done());
        assert_eq!(s.pending_checks(), 1);
    }

    #[test]
    fn fifo_order_per_protocol() {
        let mut s = scb();
        s.schedule_obi_check(1);
        s.schedule_obi_check(2);
        // Responses arrive in order; the second one mismatches.
        s.evaluate(0, Some(1), None);
        s.evaluate(1, Some(3), None);
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.transaction_count(), 2);
        assert!(s.is_done());
    }

    #[test]
    fn protocols_are_independent_queues() {
        let mut s = scb();
        s.schedule_obi_check(10);
        s.schedule_reg_check(20);
        // A register response never consumes an OBI expectation.
        s.evaluate(0, None, Some(20));
        assert_eq!(s.transaction_count(), 1);
        assert_eq!(s.pending_checks(), 1);
        s.evaluate(1, Some(10), None);
        assert!(s.is_done());
        assert_eq!(s.error_count(), 0);
    }

    #[test]
    fn both_protocols_can_fire_in_one_cycle() {
        let mut s = scb();
        s.schedule_obi_check(1);
        s.schedule_reg_check(2);
        let fired = s.evaluate(0, Some(1), Some(2));
        assert_eq!(fired, 2);
        assert_eq!(s.transaction_count(), 2);
    }

    #[test]
    fn notify_error_bypasses_comparison() {
        let mut s = scb();
        s.notify_error();
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.transaction_count(), 0);
    }

    #[test]
    fn comparisons_never_exceed_scheduled_expectations() {
        let mut s = scb();
        s.schedule_obi_check(5);
        // Many response cycles, only one expectation.
        for _ in 0..10 {
            s.evaluate(0, Some(5), None);
        }
        assert_eq!(s.transaction_count(), 1);
    }
}
