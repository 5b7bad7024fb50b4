fn main() {
    if let Err(err) = faildup::run() {
        eprintln!("{}", faildup::format_error(&err));
        std::process::exit(1);
    }
}
