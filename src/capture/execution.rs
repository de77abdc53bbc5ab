//! Captured execution of a single callable
//!
//! Runs a callable against in-memory stdout/stderr buffers and a replayed
//! stdin, catching errors, exit requests and panics, and packs the result
//! into a [`Response`].

use std::cell::{Cell, RefCell};
use std::fmt::{self, Display, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use tracing::debug;

use super::replay::{BufferExhausted, StdinReplay};
use crate::models::{Args, Failure, Response, Side};

/// Signature every graded callable implements
pub type Invoke<R> = dyn Fn(&mut Io<'_>, &Args) -> Result<R, Interrupt> + Send + Sync;

/// Named, shareable function under test
pub struct Callable<R> {
    name: String,
    f: Arc<Invoke<R>>,
}

impl<R> Callable<R> {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Io<'_>, &Args) -> Result<R, Interrupt> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R> Clone for Callable<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<R> fmt::Debug for Callable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish()
    }
}

/// Why a callable stopped before returning a value
#[derive(Debug)]
pub enum Interrupt {
    /// The callable raised an error
    Raised(anyhow::Error),
    /// The callable asked to terminate the process
    Exit(i32),
    /// The callable read past the supplied stdin lines
    Exhausted(BufferExhausted),
}

impl Interrupt {
    /// Raise an error with a plain message
    pub fn raise(message: impl Display) -> Self {
        Interrupt::Raised(anyhow::anyhow!("{message}"))
    }
}

impl From<anyhow::Error> for Interrupt {
    fn from(err: anyhow::Error) -> Self {
        Interrupt::Raised(err)
    }
}

impl From<BufferExhausted> for Interrupt {
    fn from(err: BufferExhausted) -> Self {
        Interrupt::Exhausted(err)
    }
}

impl From<std::io::Error> for Interrupt {
    fn from(err: std::io::Error) -> Self {
        Interrupt::Raised(err.into())
    }
}

impl From<std::num::ParseIntError> for Interrupt {
    fn from(err: std::num::ParseIntError) -> Self {
        Interrupt::Raised(err.into())
    }
}

impl From<std::num::ParseFloatError> for Interrupt {
    fn from(err: std::num::ParseFloatError) -> Self {
        Interrupt::Raised(err.into())
    }
}

impl From<fmt::Error> for Interrupt {
    fn from(err: fmt::Error) -> Self {
        Interrupt::Raised(err.into())
    }
}

/// Standard streams as seen by a callable under capture
pub struct Io<'a> {
    stdout: String,
    stderr: String,
    stdin: &'a mut StdinReplay,
    exhausted: Option<BufferExhausted>,
}

impl<'a> Io<'a> {
    fn new(stdin: &'a mut StdinReplay) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            stdin,
            exhausted: None,
        }
    }

    pub fn print(&mut self, text: impl Display) {
        let _ = write!(self.stdout, "{text}");
    }

    pub fn println(&mut self, text: impl Display) {
        let _ = writeln!(self.stdout, "{text}");
    }

    pub fn eprint(&mut self, text: impl Display) {
        let _ = write!(self.stderr, "{text}");
    }

    pub fn eprintln(&mut self, text: impl Display) {
        let _ = writeln!(self.stderr, "{text}");
    }

    /// Captured stdout, usable with `write!`
    pub fn stdout(&mut self) -> &mut String {
        &mut self.stdout
    }

    /// Captured stderr, usable with `write!`
    pub fn stderr(&mut self) -> &mut String {
        &mut self.stderr
    }

    /// Read the next replayed line, echoing it into captured stdout
    pub fn read_line(&mut self) -> Result<String, BufferExhausted> {
        match self.stdin.read_line() {
            Ok(line) => {
                self.stdout.push_str(&line);
                if !line.ends_with('\n') {
                    self.stdout.push('\n');
                }
                Ok(line)
            }
            Err(err) => {
                self.exhausted.get_or_insert_with(|| err.clone());
                Err(err)
            }
        }
    }

    /// Print a prompt, then read a line without its trailing newline
    pub fn input(&mut self, prompt: impl Display) -> Result<String, BufferExhausted> {
        self.print(prompt);
        let line = self.read_line()?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Build the interrupt for an exit request; return it as `Err`
    pub fn exit(&self, code: i32) -> Interrupt {
        Interrupt::Exit(code)
    }

    fn finish(self) -> (String, String, Option<BufferExhausted>) {
        (self.stdout, self.stderr, self.exhausted)
    }
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Route panics on capturing threads into a per-thread slot
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if SILENCED.with(Cell::get) {
                let location = info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let trace = format!("panicked at {location}");
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
            } else {
                previous(info);
            }
        }));
    });
}

/// Keeps panics quiet on this thread until dropped
///
/// While held, a panic records its location for [`SilencedPanics::take_trace`]
/// instead of printing to stderr.
pub(crate) struct SilencedPanics {
    previous: bool,
}

impl SilencedPanics {
    pub(crate) fn enter() -> Self {
        install_panic_hook();
        LAST_PANIC.with(|slot| slot.borrow_mut().take());
        Self {
            previous: SILENCED.with(|s| s.replace(true)),
        }
    }

    pub(crate) fn take_trace(&self) -> Option<String> {
        LAST_PANIC.with(|slot| slot.borrow_mut().take())
    }
}

impl Drop for SilencedPanics {
    fn drop(&mut self) {
        SILENCED.with(|s| s.set(self.previous));
    }
}

/// Rewinds the shared stdin buffer when a capture ends
struct RewindOnDrop<'a>(&'a mut StdinReplay);

impl Drop for RewindOnDrop<'_> {
    fn drop(&mut self) {
        self.0.rewind();
    }
}

/// Text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `callable` with captured streams and classify the outcome.
///
/// The stdin buffer is read from its current cursor and rewound to the
/// start afterwards, whatever way the callable ends. Reading past the
/// supplied lines is returned as an error even if the callable swallowed it.
pub fn capture<R>(
    callable: &Callable<R>,
    args: &Args,
    side: Side,
    stdin: &mut StdinReplay,
) -> Result<Response<R>, BufferExhausted> {
    debug!("Capturing {} side ({})", side, callable.name());

    let mut rewind = RewindOnDrop(stdin);
    let silenced = SilencedPanics::enter();
    let mut io = Io::new(&mut *rewind.0);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (callable.f)(&mut io, args)));
    let panic_trace = silenced.take_trace();
    drop(silenced);

    let (stdout, stderr, exhausted) = io.finish();
    if let Some(err) = exhausted {
        return Err(err);
    }

    let response = match outcome {
        Ok(Ok(value)) => Response::returned(side, value),
        Ok(Err(Interrupt::Raised(err))) => {
            Response::failed(side, Failure::new(format!("Threw {err}."), format!("{err:?}")))
        }
        Ok(Err(Interrupt::Exit(code))) => Response::exited(
            side,
            format!("The code tried to exit the process (status {code})."),
        ),
        Ok(Err(Interrupt::Exhausted(err))) => return Err(err),
        Err(payload) => Response::failed(
            side,
            Failure::new(
                format!("Panicked: {}.", panic_message(payload.as_ref())),
                panic_trace.unwrap_or_default(),
            ),
        ),
    };

    Ok(response.with_stdout(stdout).with_stderr(stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<R>(callable: &Callable<R>, stdin: &mut StdinReplay) -> Response<R> {
        capture(callable, &Args::new(), Side::Candidate, stdin).unwrap()
    }

    #[test]
    fn test_captures_value_and_output() {
        let callable = Callable::new("double", |io: &mut Io<'_>, args: &Args| {
            let n: i64 = args.get(0)?;
            io.println(format!("doubling {n}"));
            io.eprint("note");
            Ok(n * 2)
        });
        let mut stdin = StdinReplay::default();
        let args = Args::new().arg(21);
        let response = capture(&callable, &args, Side::Reference, &mut stdin).unwrap();

        assert_eq!(response.value(), Some(&42));
        assert_eq!(response.stdout(), "doubling 21\n");
        assert_eq!(response.stderr(), "note");
        assert_eq!(response.warning(), Some("note"));
        assert_eq!(response.side(), Side::Reference);
    }

    #[test]
    fn test_raised_error_is_failure() {
        let callable = Callable::new("boom", |io: &mut Io<'_>, _: &Args| -> Result<i32, Interrupt> {
            io.print("partial");
            Err(Interrupt::raise("division by zero"))
        });
        let response = run(&callable, &mut StdinReplay::default());

        let failure = response.failure().unwrap();
        assert_eq!(failure.message, "Threw division by zero.");
        assert!(response.value().is_none());
        assert_eq!(response.stdout(), "partial");
    }

    #[test]
    fn test_panic_is_failure() {
        let callable = Callable::new("index", |_: &mut Io<'_>, _: &Args| -> Result<i32, Interrupt> {
            let items: Vec<i32> = Vec::new();
            Ok(items[3])
        });
        let response = run(&callable, &mut StdinReplay::default());

        let failure = response.failure().unwrap();
        assert!(failure.message.starts_with("Panicked: index out of bounds"));
        assert!(failure.trace.starts_with("panicked at "));
        assert!(failure.trace.contains("execution.rs:"));
        assert!(!failure.trace.contains("backtrace"));
    }

    #[test]
    fn test_exit_is_warning() {
        let callable = Callable::new("quit", |io: &mut Io<'_>, _: &Args| -> Result<i32, Interrupt> {
            io.println("bye");
            Err(io.exit(0))
        });
        let response = run(&callable, &mut StdinReplay::default());

        assert!(!response.is_failure());
        assert!(response.value().is_none());
        assert!(response.warning().unwrap().contains("tried to exit"));
        assert_eq!(response.stdout(), "bye\n");
    }

    #[test]
    fn test_reads_echo_and_rewind() {
        let callable = Callable::new("echo", |io: &mut Io<'_>, _: &Args| {
            let name = io.input("Name? ")?;
            Ok(name.len())
        });
        let mut stdin = StdinReplay::new(["Ada\n"]);
        let response = run(&callable, &mut stdin);

        assert_eq!(response.value(), Some(&3));
        assert_eq!(response.stdout(), "Name? Ada\n");
        assert_eq!(stdin.position(), 0);
    }

    #[test]
    fn test_exhaustion_propagates_even_if_swallowed() {
        let callable = Callable::new("greedy", |io: &mut Io<'_>, _: &Args| {
            let _ = io.read_line();
            let _ = io.read_line();
            Ok(0)
        });
        let mut stdin = StdinReplay::new(["only\n"]);
        let err = capture(&callable, &Args::new(), Side::Candidate, &mut stdin).unwrap_err();

        assert_eq!(err, BufferExhausted { position: 1 });
        assert_eq!(stdin.position(), 0);
    }

    #[test]
    fn test_panic_hook_restored_after_capture() {
        let callable = Callable::new("panics", |_: &mut Io<'_>, _: &Args| -> Result<(), Interrupt> {
            panic!("inside capture")
        });
        let _ = run(&callable, &mut StdinReplay::default());
        assert!(!SILENCED.with(Cell::get));
    }
}
