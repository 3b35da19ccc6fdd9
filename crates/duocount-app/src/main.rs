#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = duocount::cli::run_from_env() {
        eprintln!("duocount: {error}");
        std::process::exit(1);
    }
}
