use countup_core::counter::{display_width, format_with_separator};

pub fn run(numbers: &[u64], separator: char) {
    for &n in numbers {
        println!("{:>width$}", format_with_separator(n, separator), width = display_width(n));
    }
}
