/// Display version information
pub fn execute() {
    println!("proctor {}", env!("CARGO_PKG_VERSION"));
}
