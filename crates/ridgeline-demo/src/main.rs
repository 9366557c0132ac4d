#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = ridgeline_demo::run_from_env() {
        eprintln!("ridgeline-demo: {error}");
        std::process::exit(error.exit_code());
    }
}
