fn main() {
    flowdeploy::app::cli::run();
}
