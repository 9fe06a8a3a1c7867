//! Hop extraction from line-oriented traceroute output.
//!
//! A hop line is any line whose first whitespace-delimited token is a run of
//! ASCII decimal digits, e.g. ` 3  10.0.0.1  4.211 ms`. Headers, blank lines
//! and continuation lines (which start with an address) never count.

/// Returns `true` when the line starts with a hop index.
pub fn is_hop_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.bytes().all(|b| b.is_ascii_digit()))
}

/// Iterates the hop lines of `output`, untouched.
pub fn hop_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter(|line| is_hop_line(line))
}

pub fn count_hops(output: &str) -> usize {
    hop_lines(output).count()
}

/// The hop index a line starts with, if it is a hop line and the index fits.
pub fn hop_index(line: &str) -> Option<u32> {
    if !is_hop_line(line) {
        return None;
    }
    line.split_whitespace().next()?.parse().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
