//! Scan progress reporting -- lightweight events sent from the scan
//! thread to a single background reporter via a crossbeam channel.
//!
//! The reporter owns its counters; the scanner never shares state with it
//! beyond the channel. Shutdown is a drain-and-acknowledge handshake so no
//! progress output can interleave with the final report.
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Events sent from the scan thread to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Running totals. Sent with `try_send`; dropped when the channel is full.
    Progress { items: u64, errors: u64 },
    /// A discrete notice (e.g. a filesystem boundary) printed on its own line.
    Alert(String),
    /// Sentinel: the scan is over, clear the progress line and acknowledge.
    Finish,
}

/// Maximum number of events that may queue up in the channel.
///
/// Progress ticks are dropped when full; alerts block the scanner briefly.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

/// Progress line repaint interval.
pub const REPAINT_INTERVAL: Duration = Duration::from_millis(50);

/// Width blanked out when the progress line is cleared.
const PROGRESS_LINE_WIDTH: usize = 40;

/// Handle to the background reporter thread.
pub struct ProgressReporter {
    tx: Sender<ScanEvent>,
    ack_rx: Receiver<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start the reporter. The progress line is only painted when `tty` is set;
    /// alerts are always written.
    pub fn spawn<W>(sink: W, tty: bool) -> std::io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded::<ScanEvent>(EVENT_CHANNEL_CAPACITY);
        let (ack_tx, ack_rx) = crossbeam_channel::bounded::<()>(1);

        let thread = thread::Builder::new()
            .name("tdu-progress".into())
            .spawn(move || run(sink, rx, ack_tx, tty))?;

        Ok(Self {
            tx,
            ack_rx,
            thread: Some(thread),
        })
    }

    /// A sender for the scanner.
    pub fn sender(&self) -> Sender<ScanEvent> {
        self.tx.clone()
    }

    /// Send the sentinel, wait for the acknowledgement, and join the thread.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        if self.tx.send(ScanEvent::Finish).is_ok() {
            let _ = self.ack_rx.recv();
        }
        if handle.join().is_err() {
            debug!("progress reporter thread panicked");
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Reporter loop: drain events, repaint on the interval, exit on `Finish`.
fn run<W: Write>(mut sink: W, rx: Receiver<ScanEvent>, ack_tx: Sender<()>, tty: bool) {
    let mut items: u64 = 0;
    let mut errors: u64 = 0;
    let mut painted = false;
    let mut last_paint = Instant::now();

    loop {
        match rx.recv_timeout(REPAINT_INTERVAL) {
            Ok(ScanEvent::Progress {
                items: i,
                errors: e,
            }) => {
                items = i;
                errors = e;
            }
            Ok(ScanEvent::Alert(msg)) => {
                if painted {
                    clear_line(&mut sink);
                    painted = false;
                }
                let _ = writeln!(sink, "{msg}");
                let _ = sink.flush();
            }
            Ok(ScanEvent::Finish) => {
                if painted {
                    clear_line(&mut sink);
                }
                let _ = sink.flush();
                let _ = ack_tx.send(());
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }

        if tty && last_paint.elapsed() >= REPAINT_INTERVAL {
            let _ = write!(sink, "{}\r", progress_line(items, errors));
            let _ = sink.flush();
            painted = true;
            last_paint = Instant::now();
        }
    }
}

/// The repainted progress indicator (without the carriage return).
pub fn progress_line(items: u64, errors: u64) -> String {
    format!("  [.... scanning... {:>6}  ....]", items + errors)
}

fn clear_line<W: Write>(sink: &mut W) {
    let _ = write!(sink, "\r{:PROGRESS_LINE_WIDTH$}\r", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Write sink shared with the test so output can be inspected after join.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_alerts_are_written_before_finish() {
        let buf = SharedBuf::default();
        let reporter = ProgressReporter::spawn(buf.clone(), false).unwrap();
        let tx = reporter.sender();
        tx.send(ScanEvent::Alert("boundary one".into())).unwrap();
        tx.send(ScanEvent::Alert("boundary two".into())).unwrap();
        reporter.finish();

        let out = buf.contents();
        assert_eq!(out, "boundary one\nboundary two\n");
    }

    #[test]
    fn test_non_tty_never_paints_progress() {
        let buf = SharedBuf::default();
        let reporter = ProgressReporter::spawn(buf.clone(), false).unwrap();
        let tx = reporter.sender();
        let _ = tx.try_send(ScanEvent::Progress {
            items: 10,
            errors: 0,
        });
        thread::sleep(REPAINT_INTERVAL * 3);
        reporter.finish();
        assert!(!buf.contents().contains("scanning"));
    }

    #[test]
    fn test_tty_paints_and_clears() {
        let buf = SharedBuf::default();
        let reporter = ProgressReporter::spawn(buf.clone(), true).unwrap();
        let tx = reporter.sender();
        tx.send(ScanEvent::Progress {
            items: 120,
            errors: 3,
        })
        .unwrap();
        thread::sleep(REPAINT_INTERVAL * 4);
        reporter.finish();

        let out = buf.contents();
        assert!(out.contains("123"), "progress line missing: {out:?}");
        assert!(out.ends_with('\r'), "progress line not cleared: {out:?}");
    }

    #[test]
    fn test_drop_shuts_down() {
        let buf = SharedBuf::default();
        {
            let reporter = ProgressReporter::spawn(buf.clone(), false).unwrap();
            reporter
                .sender()
                .send(ScanEvent::Alert("bye".into()))
                .unwrap();
        }
        assert_eq!(buf.contents(), "bye\n");
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line(5, 2), "  [.... scanning...      7  ....]");
    }
}
