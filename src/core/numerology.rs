use chrono::{Datelike, NaiveDate};

/// Life path number for a birth date
///
/// Digit sum of the YYYYMMDD digits, reduced until a single digit 1..=9
/// remains.
pub fn life_path_number(birth_date: NaiveDate) -> u8 {
    let compact = birth_date.year().unsigned_abs() * 10_000
        + birth_date.month() * 100
        + birth_date.day();
    reduce(compact)
}

fn reduce(mut n: u32) -> u8 {
    while n > 9 {
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        n = sum;
    }
    n as u8
}

/// Reading text for a life path number
pub fn life_path_meaning(number: u8) -> &'static str {
    match number {
        1 => "The Leader: Independent and ambitious.",
        2 => "The Peacemaker: Diplomatic and sensitive.",
        3 => "The Creative: Social and artistic.",
        4 => "The Builder: Practical and grounded.",
        5 => "The Adventurer: Freedom-loving and versatile.",
        6 => "The Nurturer: Responsible and caring.",
        7 => "The Seeker: Analytical and spiritual.",
        8 => "The Powerhouse: Ambitious and efficient.",
        9 => "The Humanitarian: Compassionate and generous.",
        _ => "The Mystery: A path yet to be revealed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_life_path_reduction() {
        // 1990-12-25 -> 1+9+9+0+1+2+2+5 = 29 -> 11 -> 2
        assert_eq!(life_path_number(date(1990, 12, 25)), 2);
        // 2000-01-01 -> 2+0+0+0+0+1+0+1 = 4
        assert_eq!(life_path_number(date(2000, 1, 1)), 4);
    }

    #[test]
    fn test_life_path_in_range() {
        for year in 1900..2030 {
            let n = life_path_number(date(year, 6, 15));
            assert!((1..=9).contains(&n), "life path {} out of range", n);
        }
    }

    #[test]
    fn test_meanings() {
        assert!(life_path_meaning(1).starts_with("The Leader"));
        assert!(life_path_meaning(9).starts_with("The Humanitarian"));
        assert!(life_path_meaning(0).starts_with("The Mystery"));
        assert!(life_path_meaning(42).starts_with("The Mystery"));
    }
}
