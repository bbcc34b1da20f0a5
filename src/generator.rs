use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::line_ending::LineEnding;

const HEADER: &str = "部署名,社員番号,役職,氏名";

const DEPARTMENTS: [&str; 4] = ["営業部", "人事部", "経理部", "開発部"];

const POSITIONS: [&str; 3] = ["部長", "課長", "一般職"];

const SURNAMES: [&str; 50] = [
    "徳川", "織田", "豊臣", "武田", "伊達", "真田", "上杉", "明智", "石田", "前田",
    "坂本", "高杉", "吉田", "西郷", "大久保", "勝", "福沢", "佐久間", "近藤", "沖田",
    "渋沢", "井伊", "毛利", "島津", "伊東", "高橋", "後藤", "岡倉", "犬養", "岩倉",
    "松本", "大村", "吉村", "大塩", "新撰組", "山本", "東条", "小松", "横井", "田中",
    "鈴木", "佐藤", "小林", "加藤", "山田", "中村", "林", "長谷川", "石井", "木村",
];

const GIVEN_NAMES: [&str; 50] = [
    "家康", "信長", "秀吉", "信玄", "政宗", "幸村", "謙信", "光秀", "三成", "利家",
    "龍馬", "晋作", "松陰", "隆盛", "利通", "海舟", "諭吉", "象山", "勇", "総司",
    "栄一", "直弼", "元就", "義弘", "甲子太郎", "是清", "新平", "天心", "毅", "具視",
    "良順", "益次郎", "寅太郎", "平八郎", "歳三", "五十六", "英機", "実篤", "小楠", "正造",
    "一郎", "太郎", "次郎", "清", "健一", "浩", "修", "勇作", "俊介", "康平",
];

/// Generate a sample employee file in the format consumed by [crate::split::Split].
///
/// Every row is `department,number,position,surname given-name`. Numbers run from 0001
/// upwards in file order, the other fields are picked at random.
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use text_file_split::generator::Generator;
///
/// let mut generator = Generator::new(PathBuf::from("./employee.csv"), 1000);
/// generator.with_seed(7);
/// generator.generate().unwrap();
/// ```
pub struct Generator {
    output: PathBuf,
    records: usize,
    seed: Option<u64>,
    line_ending: LineEnding,
    departments: Vec<String>,
    positions: Vec<String>,
    surnames: Vec<String>,
    given_names: Vec<String>,
}

impl Generator {
    /// Create a default Generator writing `records` rows to `output`.
    ///
    /// * Lines end with "\r\n"
    /// * The random generator is seeded from the OS
    pub fn new(output: PathBuf, records: usize) -> Generator {
        Generator {
            output,
            records,
            seed: None,
            line_ending: LineEnding::CrLf,
            departments: to_strings(&DEPARTMENTS),
            positions: to_strings(&POSITIONS),
            surnames: to_strings(&SURNAMES),
            given_names: to_strings(&GIVEN_NAMES),
        }
    }

    /// Seed the random generator to get the same file on every run
    pub fn with_seed(&mut self, seed: u64) {
        self.seed = Some(seed)
    }

    /// Set the line ending. The default is [LineEnding::CrLf]
    pub fn with_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending
    }

    /// Replace the departments rows are assigned to
    pub fn with_departments(&mut self, departments: Vec<String>) {
        self.departments = departments
    }

    /// Replace the positions
    pub fn with_positions(&mut self, positions: Vec<String>) {
        self.positions = positions
    }

    /// Replace the surnames
    pub fn with_surnames(&mut self, surnames: Vec<String>) {
        self.surnames = surnames
    }

    /// Replace the given names
    pub fn with_given_names(&mut self, given_names: Vec<String>) {
        self.given_names = given_names
    }

    /// Write the header and the records to the output file
    pub fn generate(&self) -> Result<(), anyhow::Error> {
        let mut rng = match self.seed {
            None => StdRng::from_entropy(),
            Some(seed) => StdRng::seed_from_u64(seed),
        };
        let file = File::create(&self.output)
            .with_context(|| format!("path: {}", self.output.display()))?;
        let mut writer = BufWriter::new(file);
        let endl = self.line_ending.as_str();

        write!(writer, "{}{}", HEADER, endl)?;
        for i in 1..=self.records {
            let department = choose(&self.departments, &mut rng, "departments")?;
            let position = choose(&self.positions, &mut rng, "positions")?;
            let surname = choose(&self.surnames, &mut rng, "surnames")?;
            let given_name = choose(&self.given_names, &mut rng, "given names")?;
            write!(writer, "{},{:04},{},{} {}{}", department, i, position, surname, given_name, endl)?;
        }
        writer.flush()
            .with_context(|| format!("path: {}", self.output.display()))?;
        log::info!("Generated {} records, path: {}", self.records, self.output.display());
        Ok(())
    }
}

fn choose<'a>(values: &'a [String], rng: &mut StdRng, name: &str) -> Result<&'a String, anyhow::Error> {
    values.choose(rng).ok_or_else(|| anyhow!("No {} to choose from", name))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
