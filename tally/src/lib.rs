pub use self::rewrite::{evaluate, render, EvalErr, Operator};

mod rewrite;

pub use self::history::{History, HistoryError};

mod history;

pub use self::config::Config;

mod config;

pub use self::repl::{Command, Flow, Repl};

mod repl;
#[cfg(test)]
mod repl_test;
