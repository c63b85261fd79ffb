/// Splits `text` at `\n`, `\r\n` or a lone `\r`. A terminator at the very end does not start
/// another line, but any other empty line is kept.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(i) => {
                lines.push(&rest[..i]);
                let terminator = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}
