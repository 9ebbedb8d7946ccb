use std::io::{self, Write};

/// Per-test output buffering.
///
/// When buffering is on, whatever a test writes to its context's stdout and
/// stderr is kept here until the test finishes, so it can be embedded in the
/// report. When it is off, writes go straight to the console.
///
/// Captured output is mirrored to the console at the end of a test only if
/// someone asked for it with [`OutputCapture::set_mirror_output`].
#[derive(Debug)]
pub struct OutputCapture {
    buffer: bool,
    mirror_output: bool,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    console_stdout: io::Stdout,
    console_stderr: io::Stderr,
}

impl OutputCapture {
    pub fn new(buffer: bool) -> Self {
        Self {
            buffer,
            mirror_output: false,
            stdout: vec![],
            stderr: vec![],
            console_stdout: io::stdout(),
            console_stderr: io::stderr(),
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.buffer
    }

    pub fn set_mirror_output(&mut self, mirror: bool) {
        self.mirror_output = mirror;
    }

    pub fn mirrors_output(&self) -> bool {
        self.mirror_output
    }

    pub fn stdout(&mut self) -> &mut dyn Write {
        if self.buffer {
            &mut self.stdout
        } else {
            &mut self.console_stdout
        }
    }

    pub fn stderr(&mut self) -> &mut dyn Write {
        if self.buffer {
            &mut self.stderr
        } else {
            &mut self.console_stderr
        }
    }

    /// Called when a test starts.
    pub fn start(&mut self) {
        self.mirror_output = false;
        self.stdout.clear();
        self.stderr.clear();
    }

    /// Output captured so far for the running test, or `None` when not buffering.
    ///
    /// Stderr is appended after stdout; stdout is terminated with a newline first
    /// whenever there is stderr to append.
    pub fn captured_output(&self) -> Option<String> {
        if !self.buffer {
            return None;
        }
        let mut out = String::from_utf8_lossy(&self.stdout).into_owned();
        if !self.stderr.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&String::from_utf8_lossy(&self.stderr));
        }
        Some(out)
    }

    /// Called when a test finishes: mirrors the buffers if requested, then drops them.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.buffer && self.mirror_output {
            if !self.stdout.is_empty() {
                self.console_stdout.write_all(&self.stdout)?;
                self.console_stdout.flush()?;
            }
            if !self.stderr.is_empty() {
                self.console_stderr.write_all(&self.stderr)?;
                self.console_stderr.flush()?;
            }
        }
        self.mirror_output = false;
        self.stdout.clear();
        self.stderr.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_capture_when_not_buffering() {
        let capture = OutputCapture::new(false);
        assert_eq!(capture.captured_output(), None);
    }

    #[test]
    fn should_join_stdout_and_stderr() {
        let mut capture = OutputCapture::new(true);
        capture.start();
        write!(capture.stdout(), "partial line").unwrap();
        writeln!(capture.stderr(), "warning").unwrap();
        assert_eq!(
            capture.captured_output(),
            Some("partial line\nwarning\n".to_string())
        );
    }

    #[test]
    fn should_keep_stdout_untouched_without_stderr() {
        let mut capture = OutputCapture::new(true);
        capture.start();
        write!(capture.stdout(), "no newline").unwrap();
        assert_eq!(capture.captured_output(), Some("no newline".to_string()));
    }

    #[test]
    fn should_reset_between_tests() {
        let mut capture = OutputCapture::new(true);
        capture.start();
        writeln!(capture.stdout(), "first test").unwrap();
        capture.finish().unwrap();

        capture.set_mirror_output(true);
        capture.start();
        assert!(!capture.mirrors_output());
        assert_eq!(capture.captured_output(), Some(String::new()));
    }
}
