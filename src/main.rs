mod app;
mod logging;

fn main() {
    let args = hym_custody::cli::parse();
    std::process::exit(app::run(args));
}
