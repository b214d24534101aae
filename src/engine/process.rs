//! Child process supervision and the raw line channel.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SessionError;
use crate::sync::CancelToken;
use crate::uci::GuiCommand;

/// Longest single wait on the line channel before the cancel token is
/// checked again.
const POLL_SLICE_MS: u64 = 10;

/// Poll interval while waiting for the child to exit after `quit`.
const EXIT_POLL_MS: u64 = 5;

type LineResult = io::Result<String>;

/// The engine child process and its two pipes.
///
/// Standard output is drained by a reader thread so reads can time out and
/// be cancelled; end of stream closes the channel. Output bytes that are not
/// UTF-8 are replaced, never rejected.
pub struct EngineProcess {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    lines: Receiver<LineResult>,
    reader: Option<JoinHandle<()>>,
}

impl EngineProcess {
    /// Start `path` with no arguments and piped stdin/stdout.
    pub fn spawn(path: &Path) -> Result<Self, SessionError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SessionError::Launch {
                path: path.to_path_buf(),
                source,
            })?;

        let broken_pipe = || SessionError::Io(io::Error::from(io::ErrorKind::BrokenPipe));
        let stdin = child.stdin.take().ok_or_else(broken_pipe)?;
        let stdout = child.stdout.take().ok_or_else(broken_pipe)?;

        let (tx, rx) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("engine-stdout".to_string())
            .spawn(move || read_lines(stdout, &tx))
            .map_err(SessionError::Io)?;

        log::debug!("spawned engine {} (pid {})", path.display(), child.id());

        Ok(EngineProcess {
            child,
            stdin: Some(BufWriter::new(stdin)),
            lines: rx,
            reader: Some(reader),
        })
    }

    /// Write one command line and flush it.
    pub fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        let stdin = self.stdin.as_mut().ok_or(SessionError::Terminated)?;
        log::trace!(">> {line}");
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    /// Next line of engine output.
    ///
    /// Fails with `Timeout` when nothing arrives within `timeout`, with
    /// `Cancelled` when a given `cancel` token is set between slices, and with
    /// `EngineExited` once the output pipe reaches end of stream.
    pub fn recv_line(
        &mut self,
        timeout: Duration,
        cancel: Option<&CancelToken>,
        waiting_for: &'static str,
    ) -> Result<String, SessionError> {
        // A timeout too large to add to `now` means no deadline.
        let deadline = Instant::now().checked_add(timeout);
        let poll = Duration::from_millis(POLL_SLICE_MS);
        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(SessionError::Cancelled);
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(SessionError::Timeout {
                            waiting_for,
                            after: timeout,
                        });
                    }
                    (deadline - now).min(poll)
                }
                None => poll,
            };
            match self.lines.recv_timeout(slice) {
                Ok(Ok(line)) => {
                    log::trace!("<< {line}");
                    return Ok(line);
                }
                Ok(Err(e)) => return Err(SessionError::Io(e)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SessionError::EngineExited {
                        waiting_for,
                        status: self.try_status(),
                    })
                }
            }
        }
    }

    /// Exit status if the child already exited.
    pub fn try_status(&mut self) -> Option<ExitStatus> {
        self.child.try_wait().ok().flatten()
    }

    #[must_use]
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Ask the engine to quit, wait up to `grace`, then kill it.
    ///
    /// Both pipes are closed when this returns.
    pub fn shutdown(&mut self, grace: Duration) -> io::Result<ExitStatus> {
        if let Some(mut stdin) = self.stdin.take() {
            // A dead engine may already have closed its end.
            let quit = GuiCommand::Quit.to_string();
            let _ = writeln!(stdin, "{quit}").and_then(|()| stdin.flush());
            log::trace!(">> {quit}");
        }

        let deadline = Instant::now().checked_add(grace);
        let status = loop {
            if let Some(status) = self.child.try_wait()? {
                log::debug!("engine exited with {status}");
                break status;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::info!("engine ignored quit for {} ms, killing it", grace.as_millis());
                self.kill_quietly();
                break self.child.wait()?;
            }
            thread::sleep(Duration::from_millis(EXIT_POLL_MS));
        };

        self.join_reader();
        Ok(status)
    }

    /// Kill and reap the child without the `quit` handshake.
    pub fn kill(&mut self) {
        self.stdin = None;
        self.kill_quietly();
        let _ = self.child.wait();
        self.join_reader();
    }

    fn kill_quietly(&mut self) {
        if let Err(e) = self.child.kill() {
            // InvalidInput means the child was already reaped.
            if e.kind() != io::ErrorKind::InvalidInput {
                log::warn!("failed to kill engine: {e}");
            }
        }
    }

    fn join_reader(&mut self) {
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

fn read_lines(stdout: ChildStdout, tx: &Sender<LineResult>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(Ok(decode_line(&buf))).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}

/// One raw output line as text, without its line terminator.
fn decode_line(raw: &[u8]) -> String {
    let mut line = String::from_utf8_lossy(raw).into_owned();
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"readyok\r\n"), "readyok");
        assert_eq!(decode_line(b"bestmove e2e4"), "bestmove e2e4");
        assert_eq!(decode_line(b"\n"), "");
    }

    #[test]
    fn test_decode_line_replaces_invalid_utf8() {
        let line = decode_line(b"id author Jos\xE9\n");
        assert!(line.starts_with("id author Jos"));
        assert!(line.ends_with('\u{FFFD}'));
    }
}
