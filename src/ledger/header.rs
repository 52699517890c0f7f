/// Column headers that open the tabular part of a WeChat Pay export.
pub const HEADER_MARKER: &str = "交易时间,交易类型";

/// Returns the zero-based index of the first line containing [HEADER_MARKER].
pub fn find_header_line(content: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(HEADER_MARKER))
}
