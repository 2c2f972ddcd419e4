fn main() {
    std::process::exit(streamprod::app::startup::startup());
}
