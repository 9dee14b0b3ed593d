//! Turns raw model output into a markdown block quote for display.

const QUOTE_PREFIX: &str = "> ";

/// Replace every `+` with `*`, then prefix every line with `> `.
///
/// Line terminators are kept, so a trailing newline stays trailing and empty
/// lines still get a prefix. Applying this twice nests the quote.
///
/// ```
/// use era::core::formatter::to_markdown;
///
/// assert_eq!(to_markdown("hello + world"), "> hello * world");
/// assert_eq!(to_markdown("a+b\nc+d"), "> a*b\n> c*d");
/// ```
pub fn to_markdown(text: &str) -> String {
    let text = text.replace('+', "*");
    let mut quoted = String::with_capacity(text.len() + QUOTE_PREFIX.len() * 4);
    for line in text.split_inclusive('\n') {
        quoted.push_str(QUOTE_PREFIX);
        quoted.push_str(line);
    }
    quoted
}
