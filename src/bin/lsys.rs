// lsys command-line entry point
// Usage: lsys <generate|validate|depth|table|draw> [options]

fn main() {
    lsys::cli::run();
}
