fn main() {
    if let Err(e) = squashbench::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
