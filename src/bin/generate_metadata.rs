use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    trait_metadata::apps::run_generate_metadata(std::env::args().skip(1))
}
