use chrono::{Local, NaiveDate};

/// Minutes in a "day" as far as the statistics are concerned.
pub const MINUTES_PER_DAY: u64 = 288;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn mins_to_human(mins: u64) -> String {
    if mins < 60 {
        format!("{}'", mins)
    } else if mins < MINUTES_PER_DAY {
        format!("{}h{}'", mins / 60, mins % 60)
    } else {
        format!("{}d{}h", mins / MINUTES_PER_DAY, (mins % MINUTES_PER_DAY) / 60)
    }
}

pub fn bytes_to_mib(bytes: u64) -> u64 {
    bytes / 1_048_576
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mins_to_human_0() {
        let x = mins_to_human(0);
        assert_eq!(x, "0'");
    }

    #[test]
    fn test_mins_to_human_45() {
        let x = mins_to_human(45);
        assert_eq!(x, "45'");
    }

    #[test]
    fn test_mins_to_human_60() {
        let x = mins_to_human(60);
        assert_eq!(x, "1h0'");
    }

    #[test]
    fn test_mins_to_human_130() {
        let x = mins_to_human(130);
        assert_eq!(x, "2h10'");
    }

    #[test]
    fn test_mins_to_human_287() {
        let x = mins_to_human(287);
        assert_eq!(x, "4h47'");
    }

    #[test]
    fn test_mins_to_human_288() {
        let x = mins_to_human(288);
        assert_eq!(x, "1d0h");
    }

    #[test]
    fn test_mins_to_human_300() {
        let x = mins_to_human(300);
        assert_eq!(x, "1d0h");
    }

    #[test]
    fn test_mins_to_human_1000() {
        let x = mins_to_human(1000);
        assert_eq!(x, "3d2h");
    }

    #[test]
    fn test_bytes_to_mib() {
        assert_eq!(bytes_to_mib(1_048_575), 0);
        assert_eq!(bytes_to_mib(3 * 1_048_576 + 12), 3);
    }
}
