use console::{Emoji, style};

pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static STAR: Emoji<'_, '_> = Emoji("⭐ ", "* ");

pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_banner() {
    println!();
    println!(
        "{}",
        style("  adsmith  ").bold().black().on_cyan()
    );
    println!(
        "{}\n",
        style("Product copy, ads, images and reels from one endpoint.").cyan()
    );
}

/// A titled block of aligned rows printed to stdout.
pub struct GuideSection {
    title: String,
    rows: Vec<GuideRow>,
}

enum GuideRow {
    Command(String, String),
    Status(String, String),
    Info(String),
    Blank,
}

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn command(mut self, name: &str, about: &str) -> Self {
        self.rows
            .push(GuideRow::Command(name.to_string(), about.to_string()));
        self
    }

    pub fn status(mut self, label: &str, value: &str) -> Self {
        self.rows
            .push(GuideRow::Status(label.to_string(), value.to_string()));
        self
    }

    pub fn info(mut self, text: &str) -> Self {
        self.rows.push(GuideRow::Info(text.to_string()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.rows.push(GuideRow::Blank);
        self
    }

    pub fn print(&self) {
        println!("\n {}", style(&self.title).bold().underlined());
        let width = self
            .rows
            .iter()
            .map(|r| match r {
                GuideRow::Command(name, _) => name.len(),
                GuideRow::Status(label, _) => label.len(),
                _ => 0,
            })
            .max()
            .unwrap_or(0);

        for row in &self.rows {
            match row {
                GuideRow::Command(name, about) => {
                    println!(
                        "   {}  {}",
                        style(format!("{:<width$}", name)).green(),
                        style(about).dim()
                    );
                }
                GuideRow::Status(label, value) => {
                    println!(
                        "  {} {}  {}",
                        GEAR,
                        style(format!("{:<width$}", label)).bold().cyan(),
                        value
                    );
                }
                GuideRow::Info(text) => println!("  {} {}", INFO_ICON, text),
                GuideRow::Blank => println!(),
            }
        }
    }
}
