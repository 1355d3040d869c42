use std::fmt::Write as _;

/// Renders rows as left-aligned, two-space separated columns with a dashed
/// rule under the header. Cells wider than `max_width` characters are cut
/// and end in `…`; a `max_width` of 0 disables truncation.
pub fn render_table(headers: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    let fit = |cell: &str| fit_cell(cell, max_width);
    let header_cells: Vec<String> = headers.iter().map(|h| fit(h)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(|cell| fit(cell)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header_cells.iter().map(|h| width_of(h).max(3)).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(width_of(cell));
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell}{}", " ".repeat(width.saturating_sub(width_of(cell))));
    }
    let _ = writeln!(out, "{}", line.trim_end());
}

fn fit_cell(cell: &str, max_width: usize) -> String {
    let flat: String = cell
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();
    if max_width == 0 || width_of(&flat) <= max_width {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn width_of(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let rendered = render_table(
            &strings(&["code", "name"]),
            &[strings(&["P1", "Hanbit Store"]), strings(&["P10", "X"])],
            0,
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "code  name");
        assert_eq!(lines[1], "----  ------------");
        assert_eq!(lines[2], "P1    Hanbit Store");
        assert_eq!(lines[3], "P10   X");
    }

    #[test]
    fn long_cells_are_truncated_and_newlines_flattened() {
        let rendered = render_table(
            &strings(&["addr"]),
            &[strings(&["서울특별시 강남구 테헤란로 123"]), strings(&["a\nb"])],
            6,
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "서울특별시…");
        assert_eq!(lines[3], "a b");
    }

    #[test]
    fn short_rows_render_blank_cells() {
        let rendered = render_table(&strings(&["a", "b"]), &[strings(&["1"])], 0);
        assert_eq!(rendered.lines().nth(2), Some("1"));
    }
}
