// module logging

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    ERROR,
    WARN,
    INFO,
    DEBUG,
    TRACE,
}

#[derive(Debug, Clone)]
pub struct Logging {
    pub log_level: Level,
}

const RESET: &str = "\x1b[0m";

impl Logging {
    // level is enabled when it is at or below the configured verbosity
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.log_level
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", format_line("\x1b[1;91m", "ERROR", msg));
    }

    pub fn warn(&self, msg: &str) {
        if self.enabled(Level::WARN) {
            eprintln!("{}", format_line("\x1b[1;93m", "WARN ", msg));
        }
    }

    pub fn info(&self, msg: &str) {
        if self.enabled(Level::INFO) {
            println!("{}", format_line("\x1b[1;94m", "INFO ", msg));
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.enabled(Level::DEBUG) {
            println!("{}", format_line("\x1b[1;92m", "DEBUG", msg));
        }
    }

    pub fn trace(&self, msg: &str) {
        if self.enabled(Level::TRACE) {
            println!("{}", format_line("\x1b[1;96m", "TRACE", msg));
        }
    }

    // highlighted info lines, used for milestones in the workflow
    pub fn hi(&self, msg: &str) {
        if self.enabled(Level::INFO) {
            println!("{}", format_line("\x1b[1;95m", "INFO ", msg));
        }
    }

    pub fn mid(&self, msg: &str) {
        if self.enabled(Level::INFO) {
            println!("{}", format_line("\x1b[1;35m", "INFO ", msg));
        }
    }

    pub fn lo(&self, msg: &str) {
        if self.enabled(Level::INFO) {
            println!("{}", format_line("\x1b[0;35m", "INFO ", msg));
        }
    }
}

fn format_line(colour: &str, tag: &str, msg: &str) -> String {
    format!(
        "{} {}{}{} : {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        colour,
        tag,
        RESET,
        msg
    )
}
