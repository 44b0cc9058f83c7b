use std::io::Write;

use log::warn;

use crate::history::History;
use crate::rewrite::{evaluate, render};

#[derive(PartialEq, Debug)]
pub enum Command<'a> {
    Exit,
    History,
    Eval(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Command<'a> {
        let word = line.trim();
        if word.eq_ignore_ascii_case("exit") {
            Command::Exit
        } else if word.eq_ignore_ascii_case("history") {
            Command::History
        } else {
            Command::Eval(line)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl {
    history: History,
}

impl Repl {
    pub const PROMPT_BANNER: &'static str =
        "Введите выражение для вычисления или 'history' для вывода истории, 'exit' для выхода:";
    pub const EMPTY_HISTORY: &'static str = "История пуста.";

    pub fn new(history: History) -> Repl {
        Repl { history }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run one line of input. Results and history go to `out`, failures to
    /// `err`; nothing that goes wrong here stops the loop.
    pub fn handle(&self, line: &str, out: &mut impl Write, err: &mut impl Write) -> Flow {
        match Command::parse(line) {
            Command::Exit => return Flow::Exit,
            Command::History => self.print_history(out, err),
            Command::Eval(expr) => self.eval_line(expr, out, err),
        }
        Flow::Continue
    }

    /// Show the banner, read a line, handle it; until `exit` or until
    /// `read_line` runs out of input. Only `read_line` failures end it early.
    pub fn run<E>(
        &self,
        mut read_line: impl FnMut() -> Result<Option<String>, E>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<(), E> {
        loop {
            let _ = writeln!(out, "{}", Self::PROMPT_BANNER);
            let _ = out.flush();
            match read_line()? {
                None => return Ok(()),
                Some(line) => {
                    if self.handle(&line, out, err) == Flow::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn print_history(&self, out: &mut impl Write, err: &mut impl Write) {
        match self.history.read_all() {
            Ok(Some(lines)) => for line in lines {
                let _ = writeln!(out, "{}", line);
            },
            Ok(None) => {
                let _ = writeln!(out, "{}", Self::EMPTY_HISTORY);
            }
            Err(e) => {
                let _ = writeln!(err, "Ошибка чтения истории: {}", e);
            }
        }
    }

    fn eval_line(&self, expr: &str, out: &mut impl Write, err: &mut impl Write) {
        match evaluate(expr) {
            Err(e) => {
                let _ = writeln!(err, "Ошибка вычисления: {}", e);
            }
            Ok(result) => {
                let _ = writeln!(out, "Результат: {}", render(result));
                if let Err(e) = self.history.append(expr, result) {
                    warn!("history not updated: {:?}", e);
                    let _ = writeln!(err, "Ошибка записи истории: {}", e);
                }
            }
        }
    }
}
