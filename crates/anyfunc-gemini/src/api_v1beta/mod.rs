mod generate_content;

pub use generate_content::*;
