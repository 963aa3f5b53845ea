//! Документ `provinces.svg`
//!
//! Один `<path>` на регион внутри общей группы `provinces`. Правило заливки
//! `evenodd` задано на группе, поэтому подпути-дыры вырезаются автоматически.
//! `viewBox` совпадает с размером исходного lookup-изображения.

use std::fmt::Write as _;

use crate::province::RegionShape;

/// Собирает SVG-документ для набора регионов
#[must_use]
pub fn render_svg(width: u32, height: u32, shapes: &[RegionShape]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\" preserveAspectRatio=\"xMidYMid meet\">"
    );
    out.push_str(
        "  <g id=\"provinces\" fill-rule=\"evenodd\" stroke=\"rgba(255,255,255,0.35)\" stroke-width=\"1\">\n",
    );
    for shape in shapes {
        let _ = writeln!(
            out,
            "    <path id=\"{}\" class=\"province\" d=\"{}\"/>",
            escape_attr(&shape.id),
            shape.path_data()
        );
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

/// Экранирование значения XML-атрибута
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
