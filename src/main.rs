//! helm-spec CLI entry point

fn main() {
    helm_spec::cli::run();
}
