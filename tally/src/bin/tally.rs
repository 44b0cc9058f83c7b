use std::io;

use anyhow::Context;
use rustyline::error::ReadlineError;
use tally::{Config, History, Repl};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env();
    log::info!("history log: {}", config.history_path.display());
    let repl = Repl::new(History::new(config.history_path));
    let (mut out, mut err) = (io::stdout(), io::stderr());

    if std::env::args().len() > 1 {
        let input = std::env::args().skip(1).collect::<Vec<String>>().join(" ");
        repl.handle(&input, &mut out, &mut err);
        return Ok(());
    }

    let mut rl = rustyline::DefaultEditor::new().context("line editor")?;
    let read_line = || match rl.readline(">> ") {
        Ok(line) => {
            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line.as_str());
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e),
    };
    repl.run(read_line, &mut out, &mut err).context("reading input")
}
