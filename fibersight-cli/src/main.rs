//! Entry point for the Fibersight command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "fatal errors must reach the operator")]
fn main() {
    if let Err(err) = fibersight_cli::run() {
        eprintln!("fibersight: {err}");
        std::process::exit(1);
    }
}
