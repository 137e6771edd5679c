use std::io;

fn main() {
    // match log lines go to stdout; tracing stays quiet unless RUST_LOG asks
    let _ = lastturn_session::init_logging_with("error");

    let code = lastturn_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
