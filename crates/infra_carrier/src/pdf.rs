//! Minimal PDF rendering for the simulated label
//!
//! The simulation needs a printable placeholder document without pulling in
//! a rendering stack, so this builds a single-page, uncompressed PDF by
//! hand: one Helvetica text block on a 4x6 inch (288x432 pt) label page.
//! Text is stored uncompressed, which also lets tests assert on the bytes.

/// Renders one text line per entry onto a single label-sized page.
pub fn render_placeholder(lines: &[String]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n16 TL\n36 396 Td\n");
    for line in lines {
        content.push('(');
        content.push_str(&escape_text(line));
        content.push_str(") Tj\nT*\n");
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 288 432] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

/// Escapes the characters PDF string literals reserve
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_a_pdf_document() {
        let bytes = render_placeholder(&["HELLO".to_string()]);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn text_lines_appear_uncompressed_in_the_stream() {
        let bytes = render_placeholder(&["Tracking: TT123456789GB".to_string()]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Tracking: TT123456789GB) Tj"));
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let bytes = render_placeholder(&["a(b)c\\d".to_string()]);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(a\\(b\\)c\\\\d) Tj"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = render_placeholder(&["X".to_string()]);
        let text = String::from_utf8_lossy(&bytes);

        // Every non-free xref entry must point at "N 0 obj"
        let xref_start = text.find("xref\n").unwrap();
        for (i, line) in text[xref_start..]
            .lines()
            .skip(3) // "xref", "0 6", free entry
            .take(5)
            .enumerate()
        {
            let offset: usize = line.split_whitespace().next().unwrap().parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(
                text[offset..].starts_with(&expected),
                "xref entry {i} does not point at {expected}"
            );
        }
    }
}
