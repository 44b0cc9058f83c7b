use crate::history::History;
use crate::repl::{Command, Flow, Repl};

struct Session {
    _dir: tempfile::TempDir,
    repl: Repl,
}

impl Session {
    fn new() -> Session {
        let dir = tempfile::tempdir().unwrap();
        let repl = Repl::new(History::new(dir.path().join("history.txt")));
        Session { _dir: dir, repl }
    }

    // (flow, stdout, stderr)
    fn run(&self, line: &str) -> (Flow, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let flow = self.repl.handle(line, &mut out, &mut err);
        (flow, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }
}

#[test]
fn parse_commands() {
    assert_eq!(Command::parse("exit"), Command::Exit);
    assert_eq!(Command::parse("EXIT"), Command::Exit);
    assert_eq!(Command::parse(" Exit "), Command::Exit);
    assert_eq!(Command::parse("history"), Command::History);
    assert_eq!(Command::parse("HiStOrY"), Command::History);
    assert_eq!(Command::parse("2 + 2"), Command::Eval("2 + 2"));
    assert_eq!(Command::parse("exit now"), Command::Eval("exit now"));
    assert_eq!(Command::parse(""), Command::Eval(""));
}

#[test]
fn eval_prints_and_records() {
    let session = Session::new();
    let (flow, out, err) = session.run("2 + 3");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Результат: 5.0\n");
    assert_eq!(err, "");
    let lines = session.repl.history().read_all().unwrap().unwrap();
    assert_eq!(lines, vec!["2 + 3 = 5.0"]);
}

#[test]
fn failures_leave_history_alone() {
    let session = Session::new();
    let (flow, out, err) = session.run("10/0");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "");
    assert_eq!(err, "Ошибка вычисления: Деление на ноль\n");

    let (_, _, err) = session.run("abc");
    assert!(err.starts_with("Ошибка вычисления: "));
    assert_eq!(session.repl.history().read_all().unwrap(), None);
}

#[test]
fn history_listing() {
    let session = Session::new();
    let (flow, out, _) = session.run("history");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "История пуста.\n");

    session.run("4+4");
    session.run("oops");
    session.run("|-7|");
    let (_, out, err) = session.run("HISTORY");
    assert_eq!(out, "4+4 = 8.0\n|-7| = 7.0\n");
    assert_eq!(err, "");
}

#[test]
fn exit_stops() {
    let session = Session::new();
    assert_eq!(session.run("exit").0, Flow::Exit);
    assert_eq!(session.run("Exit").0, Flow::Exit);
}

#[test]
fn history_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let repl = Repl::new(History::new(dir.path()));
    let (mut out, mut err) = (Vec::new(), Vec::new());
    assert_eq!(repl.handle("1+1", &mut out, &mut err), Flow::Continue);
    assert_eq!(String::from_utf8(out).unwrap(), "Результат: 2.0\n");
    assert!(String::from_utf8(err).unwrap().starts_with("Ошибка записи истории: "));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    repl.handle("history", &mut out, &mut err);
    assert!(out.is_empty());
    assert!(String::from_utf8(err).unwrap().starts_with("Ошибка чтения истории: "));
}

fn lines(input: &[&str]) -> std::vec::IntoIter<String> {
    input.iter().map(|l| l.to_string()).collect::<Vec<_>>().into_iter()
}

#[test]
fn banner_before_every_read() {
    let session = Session::new();
    let mut input = lines(&["2+2", "history", "exit", "3+3"]);
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let done: Result<(), ()> = session.repl.run(|| Ok(input.next()), &mut out, &mut err);
    assert_eq!(done, Ok(()));
    let banner = Repl::PROMPT_BANNER;
    let expected = format!("{b}\nРезультат: 4.0\n{b}\n2+2 = 4.0\n{b}\n", b = banner);
    assert_eq!(String::from_utf8(out).unwrap(), expected);
    // nothing after exit is read
    assert_eq!(input.next().as_deref(), Some("3+3"));
}

#[test]
fn run_ends_with_input() {
    let session = Session::new();
    let mut input = lines(&["1+1"]);
    let (mut out, mut err) = (Vec::new(), Vec::new());
    assert_eq!(session.repl.run(|| Ok::<_, ()>(input.next()), &mut out, &mut err), Ok(()));
    assert_eq!(String::from_utf8(out.clone()).unwrap().matches(Repl::PROMPT_BANNER).count(), 2);
    assert_eq!(session.repl.history().read_all().unwrap().unwrap(), vec!["1+1 = 2.0"]);

    let mut failing = || Err::<Option<String>, _>("tty gone");
    assert_eq!(session.repl.run(&mut failing, &mut out, &mut err), Err("tty gone"));
}
