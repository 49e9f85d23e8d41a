//! Console I/O seen by scripts: `console.log` and `prompt`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::runner::ds::operations::type_conversion::to_js_string;
use crate::runner::ds::value::JsValue;

pub trait HostIo {
    fn print(&mut self, values: &[JsValue]);

    /// `None` once input is exhausted.
    fn read_line(&mut self, prompt: Option<&str>) -> Option<String>;
}

/// Text form of a `console.log` line. Top-level strings are printed raw,
/// everything else in its echo form.
pub fn format_console_line(values: &[JsValue]) -> String {
    values
        .iter()
        .map(|v| match v {
            JsValue::String(_) => to_js_string(v),
            _ => v.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct StdHost;

impl StdHost {
    pub fn new() -> Self {
        StdHost
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostIo for StdHost {
    fn print(&mut self, values: &[JsValue]) {
        println!("{}", format_console_line(values));
    }

    fn read_line(&mut self, prompt: Option<&str>) -> Option<String> {
        if let Some(p) = prompt {
            print!("{}", p);
            let _ = io::stdout().flush();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
        }
    }
}

/// Scripted input and captured output. The output buffer is shared so it can
/// be inspected after the host has been handed to a runner.
pub struct BufferedHost {
    input: VecDeque<String>,
    output: Rc<RefCell<Vec<String>>>,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::with_input(Vec::<String>::new())
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferedHost {
            input: lines.into_iter().map(Into::into).collect(),
            output: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn output_handle(&self) -> Rc<RefCell<Vec<String>>> {
        self.output.clone()
    }
}

impl Default for BufferedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostIo for BufferedHost {
    fn print(&mut self, values: &[JsValue]) {
        self.output.borrow_mut().push(format_console_line(values));
    }

    fn read_line(&mut self, _prompt: Option<&str>) -> Option<String> {
        self.input.pop_front()
    }
}
