use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    kura::cli::main()
}
