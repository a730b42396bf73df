//! Timebank main entrypoint.

use timebank::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error [{}]: {}", e.kind(), e);
        std::process::exit(1);
    }
}
