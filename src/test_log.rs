//! Per-thread log capture for tests

use std::cell::RefCell;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

thread_local! {
    static LINES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = format!("{} {}", record.level(), record.args());
        LINES.with(|lines| lines.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;
static INIT: Once = Once::new();

/// Start capturing this thread's log lines, dropping earlier ones
pub fn capture() {
    INIT.call_once(|| {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(LevelFilter::Debug);
        }
    });
    LINES.with(|lines| lines.borrow_mut().clear());
}

/// Lines logged on this thread since `capture`, as "LEVEL message"
pub fn lines() -> Vec<String> {
    LINES.with(|lines| lines.borrow().clone())
}
