//! Waveform recording for harness runs.
//!
//! [`WaveformRecorder`] abstracts the output format; [`VcdRecorder`]
//! implements the IEEE 1364 Value Change Dump text format, viewable in
//! GTKWave or Surfer. [`PortTracer`] sits on top and turns per-half-cycle
//! [`DutPorts`] snapshots into change records.

use std::io::Write;

use crate::error::TbError;
use crate::ports::DutPorts;

/// Recorder-internal handle for a registered signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceId(usize);

impl TraceId {
    /// Returns the raw index.
    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// Trait for recording simulation waveforms.
pub trait WaveformRecorder {
    /// Opens a new scope (hierarchy level) in the waveform.
    fn begin_scope(&mut self, name: &str) -> Result<(), TbError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), TbError>;

    /// Registers a signal and returns its handle.
    fn register_signal(&mut self, name: &str, width: u32) -> Result<TraceId, TbError>;

    /// Records a value change at the given time in half-cycle steps.
    fn record_change(&mut self, time: u64, id: TraceId, value: u64) -> Result<(), TbError>;

    /// Finalizes the output (flush, write trailer).
    fn finalize(&mut self) -> Result<(), TbError>;
}

/// VCD (Value Change Dump) recorder.
///
/// Signal identifier codes use printable ASCII starting from `!` (0x21),
/// with multi-character codes past 94 signals.
pub struct VcdRecorder<W: Write> {
    writer: W,
    widths: Vec<u32>,
    header_written: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a VCD recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            widths: Vec::new(),
            header_written: false,
            current_time: None,
        }
    }

    fn write_header(&mut self) -> Result<(), TbError> {
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  convtb verification harness")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1ns")?;
        writeln!(self.writer, "$end")?;
        Ok(())
    }

    fn make_id_code(index: usize) -> String {
        let mut code = String::new();
        let mut idx = index;
        loop {
            code.push((b'!' + (idx % 94) as u8) as char);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        code
    }

    fn format_value(value: u64, width: u32) -> String {
        if width == 1 {
            format!("{}", value & 1)
        } else {
            format!("b{value:b}")
        }
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn begin_scope(&mut self, name: &str) -> Result<(), TbError> {
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), TbError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn register_signal(&mut self, name: &str, width: u32) -> Result<TraceId, TbError> {
        let id = TraceId(self.widths.len());
        let code = Self::make_id_code(id.0);
        writeln!(self.writer, "$var wire {width} {code} {name} $end")?;
        self.widths.push(width);
        Ok(id)
    }

    fn record_change(&mut self, time: u64, id: TraceId, value: u64) -> Result<(), TbError> {
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }
        if self.current_time != Some(time) {
            if self.current_time.is_none() {
                writeln!(self.writer, "$enddefinitions $end")?;
                writeln!(self.writer, "$dumpvars")?;
            }
            writeln!(self.writer, "#{time}")?;
            self.current_time = Some(time);
        }
        let width = self.widths[id.0];
        let code = Self::make_id_code(id.0);
        let val = Self::format_value(value, width);
        if width == 1 {
            writeln!(self.writer, "{val}{code}")?;
        } else {
            writeln!(self.writer, "{val} {code}")?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TbError> {
        if self.current_time.is_none() {
            if !self.header_written {
                self.write_header()?;
                self.header_written = true;
            }
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Records the full DUT port frame against a [`WaveformRecorder`].
///
/// Registers every entry of [`DutPorts::SIGNALS`] under a single scope at
/// construction, then diffs each dumped snapshot against the previous one
/// and emits only the changed signals (the first dump emits everything).
pub struct PortTracer {
    recorder: Box<dyn WaveformRecorder>,
    ids: Vec<TraceId>,
    last: Option<Vec<u64>>,
}

impl PortTracer {
    /// Creates a tracer recording under the given scope name.
    pub fn new(mut recorder: Box<dyn WaveformRecorder>, scope: &str) -> Result<Self, TbError> {
        recorder.begin_scope(scope)?;
        let mut ids = Vec::with_capacity(DutPorts::SIGNALS.len());
        for (name, width) in DutPorts::SIGNALS {
            ids.push(recorder.register_signal(name, *width)?);
        }
        recorder.end_scope()?;
        Ok(Self {
            recorder,
            ids,
            last: None,
        })
    }

    /// Dumps the port state at the given time, emitting only changes.
    pub fn dump(&mut self, time: u64, ports: &DutPorts) -> Result<(), TbError> {
        let snap = ports.snapshot();
        match &self.last {
            None => {
                for (i, &value) in snap.iter().enumerate() {
                    self.recorder.record_change(time, self.ids[i], value)?;
                }
            }
            Some(prev) => {
                for (i, &value) in snap.iter().enumerate() {
                    if prev[i] != value {
                        self.recorder.record_change(time, self.ids[i], value)?;
                    }
                }
            }
        }
        self.last = Some(snap);
        Ok(())
    }

    /// Finalizes the underlying recorder.
    pub fn finalize(&mut self) -> Result<(), TbError> {
        self.recorder.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn id_code_first_and_last_single_char() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(0), "!");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(93), "~");
    }

    #[test]
    fn id_code_multi_char_past_94() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(94).len(), 2);
    }

    #[test]
    fn format_single_bit() {
        assert_eq!(VcdRecorder::<Vec<u8>>::format_value(0, 1), "0");
        assert_eq!(VcdRecorder::<Vec<u8>>::format_value(1, 1), "1");
    }

    #[test]
    fn format_multi_bit_binary() {
        assert_eq!(VcdRecorder::<Vec<u8>>::format_value(0b1010, 4), "b1010");
    }

    #[test]
    fn register_signal_writes_var() {
        let mut rec = VcdRecorder::new(Vec::new());
        rec.begin_scope("tb").unwrap();
        rec.register_signal("clk", 1).unwrap();
        rec.end_scope().unwrap();
        let out = String::from_utf8(rec.writer.clone()).unwrap();
        assert!(out.contains("$scope module tb $end"));
        assert!(out.contains("$var wire 1 ! clk $end"));
        assert!(out.contains("$upscope $end"));
    }

    #[test]
    fn record_changes_emit_timestamps_once() {
        let mut rec = VcdRecorder::new(Vec::new());
        rec.begin_scope("tb").unwrap();
        let a = rec.register_signal("a", 1).unwrap();
        let b = rec.register_signal("data", 8).unwrap();
        rec.end_scope().unwrap();
        rec.record_change(0, a, 1).unwrap();
        rec.record_change(0, b, 0xA5).unwrap();
        rec.record_change(3, a, 0).unwrap();
        rec.finalize().unwrap();
        let out = String::from_utf8(rec.writer).unwrap();
        assert!(out.contains("$dumpvars"));
        assert_eq!(out.matches("#0").count(), 1);
        assert!(out.contains("1!"));
        assert!(out.contains("b10100101 \""));
        assert!(out.contains("#3"));
    }

    #[test]
    fn finalize_without_changes_still_closes_definitions() {
        let mut rec = VcdRecorder::new(Vec::new());
        rec.finalize().unwrap();
        let out = String::from_utf8(rec.writer).unwrap();
        assert!(out.contains("$enddefinitions $end"));
    }

    /// Recorder that counts change records, for diff-behavior tests.
    #[derive(Default)]
    struct CountingRecorder {
        changes: Rc<RefCell<Vec<(u64, usize, u64)>>>,
        next: usize,
    }

    impl WaveformRecorder for CountingRecorder {
        fn begin_scope(&mut self, _name: &str) -> Result<(), TbError> {
            Ok(())
        }
        fn end_scope(&mut self) -> Result<(), TbError> {
            Ok(())
        }
        fn register_signal(&mut self, _name: &str, _width: u32) -> Result<TraceId, TbError> {
            let id = TraceId(self.next);
            self.next += 1;
            Ok(id)
        }
        fn record_change(&mut self, time: u64, id: TraceId, value: u64) -> Result<(), TbError> {
            self.changes.borrow_mut().push((time, id.as_raw(), value));
            Ok(())
        }
        fn finalize(&mut self) -> Result<(), TbError> {
            Ok(())
        }
    }

    #[test]
    fn tracer_emits_full_frame_then_diffs() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let rec = CountingRecorder {
            changes: Rc::clone(&changes),
            next: 0,
        };
        let mut tracer = PortTracer::new(Box::new(rec), "tb").unwrap();

        let mut ports = DutPorts::default();
        tracer.dump(0, &ports).unwrap();
        assert_eq!(changes.borrow().len(), DutPorts::SIGNALS.len());

        // Only the clock changes.
        ports.clk = true;
        tracer.dump(1, &ports).unwrap();
        assert_eq!(changes.borrow().len(), DutPorts::SIGNALS.len() + 1);

        // Nothing changes.
        tracer.dump(2, &ports).unwrap();
        assert_eq!(changes.borrow().len(), DutPorts::SIGNALS.len() + 1);
    }
}
