fn main() {
    if let Err(e) = benchcheck::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }
}
