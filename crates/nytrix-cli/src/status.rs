//! Coloured status logging, grounded directly on `passerine-aspen`'s
//! `status.rs` — same `Kind`/`Status` shape, extended with `--color`
//! override support (`spec.md` §6 `--color={auto|always|never}`).

use colored::*;

pub enum Kind {
    Info,
    Success,
    Warn,
    Fatal,
}

pub struct Status(pub Kind, pub &'static str);

impl Status {
    pub fn info() -> Status {
        Status(Kind::Info, "Info")
    }

    pub fn success() -> Status {
        Status(Kind::Success, "Success")
    }

    pub fn warn() -> Status {
        Status(Kind::Warn, "Warning")
    }

    pub fn fatal() -> Status {
        Status(Kind::Fatal, "Fatal")
    }

    fn tag(&self) -> ColoredString {
        match self.0 {
            Kind::Info => self.1.blue(),
            Kind::Success => self.1.green(),
            Kind::Warn => self.1.yellow(),
            Kind::Fatal => self.1.red(),
        }
        .bold()
    }

    fn multiline(&self, lines: Vec<&str>) {
        eprint!("\n{} ", self.tag());
        for line in lines {
            eprintln!("{line}");
        }
        eprintln!()
    }

    pub fn log(&self, message: &str) {
        let lines = message.lines().collect::<Vec<&str>>();
        if lines.len() > 1 {
            self.multiline(lines);
        } else {
            eprintln!("{:>12} {}", self.tag(), message);
        }
    }
}

/// Applies `--color`'s three-way choice to the process-wide `colored`
/// override (`auto` leaves terminal detection in place).
pub fn apply_color_choice(choice: &str) {
    match choice {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }
}
