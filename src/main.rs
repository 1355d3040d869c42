fn main() {
    if let Err(err) = partner_batches::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
