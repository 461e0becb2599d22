use std::io;

use ansi_term::Color;
use linefeed::{Interface, ReadResult, Terminal};

use crate::interpreter::Interpreter;
use crate::printer;

static HISTORY_FILE: &str = "lambada.history";

fn configure_reader<T: Terminal>(reader: &Interface<T>) -> io::Result<()> {
    let mut reader = reader.lock_reader();
    reader.set_blink_matching_paren(true);

    let style = Color::Purple.bold();
    let text = "lambada=> ";

    reader.set_prompt(&format!(
        "\x01{prefix}\x02{text}\x01{suffix}\x02",
        prefix = style.prefix(),
        text = text,
        suffix = style.suffix()
    ))
}

pub fn run() -> io::Result<()> {
    let reader = Interface::new("lambada")?;
    configure_reader(&reader)?;

    if let Err(e) = reader.load_history(HISTORY_FILE) {
        if e.kind() == io::ErrorKind::NotFound {
            println!(
                "History file {} doesn't exist, not loading history.",
                HISTORY_FILE
            );
        } else {
            eprintln!("Could not load history file {}: {}", HISTORY_FILE, e);
        }
    }

    // One interpreter for the whole session: `def` bindings made on one
    // line stay visible on the next.
    let mut interpreter = Interpreter::with_prelude();

    loop {
        match reader.read_line()? {
            ReadResult::Input(input) => {
                if input.is_empty() {
                    continue;
                }
                reader.add_history_unique(input.clone());
                rep(&mut interpreter, &input)?
            }
            ReadResult::Eof => {
                print!("^D");
                break;
            }
            ReadResult::Signal(signal) => {
                println!("signal: {:?}", signal);
                break;
            }
        }
    }

    if let Err(e) = reader.save_history(HISTORY_FILE) {
        eprintln!("Could not save history file {}: {}", HISTORY_FILE, e);
    }

    Ok(())
}

fn rep(interpreter: &mut Interpreter, input: &str) -> io::Result<()> {
    let result = interpreter.run(input);
    printer::println_to(io::stdout(), &result)
}
