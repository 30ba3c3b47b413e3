use aur_build_common::Status;
use colored::{ColoredString, Colorize};

pub trait Fancy {
    fn paint(&self, text: &str) -> ColoredString;
}

impl Fancy for Status {
    fn paint(&self, text: &str) -> ColoredString {
        match self {
            Status::Builds => text.green(),
            Status::DoesntBuild => text.red(),
            Status::New => text.yellow(),
            Status::Deleted => text.bright_black(),
            Status::Official => text.blue(),
        }
    }
}
