//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "the binary reports failures on stderr")]
fn main() {
    if let Err(err) = hoodrank_cli::init_logging() {
        eprintln!("hoodrank: logging disabled: {err}");
    }
    if let Err(err) = hoodrank_cli::run() {
        eprintln!("hoodrank: {err}");
        std::process::exit(1);
    }
}
