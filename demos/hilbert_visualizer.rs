//! Hilbert curve SVG visualizer
//! Generates an SVG of a square grid with the curve drawn through every cell

use ipspace::HilbertCurve;
use std::fs::File;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let size = 640.0;
    let margin = 40.0;
    let grid_size = size - 2.0 * margin;

    // Grid depth: 1 -> 2x2, 3 -> 8x8, 5 -> 32x32
    let depth = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u32>())
        .transpose()?
        .unwrap_or(5);
    let curve = HilbertCurve::with_depth(depth)?;

    let n = curve.order() as f64;
    let cell = grid_size / n;

    // y grows upwards on the grid, downwards in SVG
    let svg_points: Vec<(f64, f64)> = curve
        .points()
        .map(|p| {
            (
                margin + (f64::from(p.x) + 0.5) * cell,
                size - margin - (f64::from(p.y) + 0.5) * cell,
            )
        })
        .collect();

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg width=\"{0}\" height=\"{0}\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {0} {0}\">\n",
        size
    ));

    svg.push_str("  <defs>\n");
    svg.push_str("    <style>\n");
    svg.push_str("      .grid-line { stroke: #CCCCCC; stroke-width: 1; }\n");
    svg.push_str("      .hilbert-curve { fill: none; stroke: #FF6B35; stroke-width: 2.5; stroke-linecap: round; stroke-linejoin: round; }\n");
    svg.push_str("      .grid-box { fill: none; stroke: #333333; stroke-width: 2; }\n");
    svg.push_str("    </style>\n");
    svg.push_str("  </defs>\n\n");

    svg.push_str(&format!(
        "  <rect x=\"{0}\" y=\"{0}\" width=\"{1}\" height=\"{1}\" class=\"grid-box\"/>\n\n",
        margin, grid_size
    ));

    // Grid lines, skipped once cells get too small to see
    svg.push_str("  <g id=\"grid\">\n");
    if cell >= 4.0 {
        for i in 1..curve.order() {
            let offset = margin + i as f64 * cell;
            svg.push_str(&format!(
                "    <line x1=\"{0:.2}\" y1=\"{1}\" x2=\"{0:.2}\" y2=\"{2}\" class=\"grid-line\"/>\n",
                offset, margin, size - margin
            ));
            svg.push_str(&format!(
                "    <line x1=\"{1}\" y1=\"{0:.2}\" x2=\"{2}\" y2=\"{0:.2}\" class=\"grid-line\"/>\n",
                offset, margin, size - margin
            ));
        }
    }
    svg.push_str("  </g>\n\n");

    svg.push_str("  <!-- Hilbert curve -->\n");
    svg.push_str("  <path d=\"M");
    for (i, (x, y)) in svg_points.iter().enumerate() {
        if i == 0 {
            svg.push_str(&format!(" {:.2} {:.2}", x, y));
        } else {
            svg.push_str(&format!(" L {:.2} {:.2}", x, y));
        }
    }
    svg.push_str("\" class=\"hilbert-curve\"/>\n");
    svg.push_str("</svg>\n");

    let mut file = File::create("hilbert_curve_grid.svg")?;
    file.write_all(svg.as_bytes())?;

    println!("Generated: hilbert_curve_grid.svg");
    println!("  - Grid: {0}x{0} cells", curve.order());
    println!("  - Curve points: {}", svg_points.len());
    Ok(())
}
