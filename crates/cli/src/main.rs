fn main() {
    if let Err(e) = widgetscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
