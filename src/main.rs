fn main() {
    if let Err(e) = medremind_lib::run() {
        eprintln!("medremind: {e}");
        std::process::exit(1);
    }
}
