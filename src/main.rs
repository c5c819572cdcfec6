fn main() {
    if let Err(e) = designsync::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
