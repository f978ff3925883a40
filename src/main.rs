fn main() {
    if let Err(e) = medscribe_lib::run() {
        eprintln!("medscribe: {e}");
        std::process::exit(1);
    }
}
