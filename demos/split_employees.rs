use std::path::{Path, PathBuf};

use anyhow::Error;
use simple_logger::SimpleLogger;
use text_file_split::generator::Generator;
use text_file_split::split::Split;

fn generate(path: &Path, records: usize) -> Result<(), Error> {
    let mut generator = Generator::new(path.to_path_buf(), records);
    generator.with_seed(2024);
    generator.generate()
}

fn split_by_department(input: &Path, output_dir: &Path) -> Result<(), Error> {
    // department is field 1 and employee number field 2, the defaults
    let split = Split::new(input.to_path_buf(), output_dir.to_path_buf());
    let report = split.split()?;
    for path in report.destinations() {
        println!("{}", path.display());
    }
    Ok(())
}

fn split_by_position(input: &Path, output_dir: &Path) -> Result<(), Error> {
    let mut split = Split::new(input.to_path_buf(), output_dir.to_path_buf());
    split.with_category_field(3);
    split.with_extension("txt");
    split.with_flush_each_record(false);
    split.split()?;
    Ok(())
}

// cargo run -r --example split_employees
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().init()?;
    let input_path = PathBuf::from("./target/employee-10000.csv");
    let departments_dir = PathBuf::from("./target/post");
    let positions_dir = PathBuf::from("./target/positions");

    generate(&input_path, 10_000)?;
    split_by_department(&input_path, &departments_dir)?;
    split_by_position(&input_path, &positions_dir)?;

    Ok(())
}
