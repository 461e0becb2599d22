use std::io;

fn main() -> io::Result<()> {
    lambada::repl::run()
}
