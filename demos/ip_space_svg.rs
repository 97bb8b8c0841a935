//! IP space SVG renderer
//! Draws a set of pools inside 10.0.0.0/8 as grey rectangles, one cell per address

use ipspace::{IpSpace, Pool, PoolTree};
use std::fs::File;
use std::io::Write;

const POOLS: &str = r#"[
    {"network": "10.0.0.0", "prefix_length": 12, "description": "backbone"},
    {"network": "10.0.0.0", "prefix_length": 16, "description": "core"},
    {"network": "10.16.0.0", "prefix_length": 13, "description": "wireless"},
    {"network": "10.16.0.0", "prefix_length": 20, "description": "ap-1"},
    {"network": "10.17.0.0", "prefix_length": 21, "description": "ap-2"},
    {"network": "10.64.0.0", "prefix_length": 10, "description": "tunnels"},
    {"network": "10.128.0.0", "prefix_length": 9, "description": "reserved"},
    {"network": "10.200.4.0", "prefix_length": 22, "description": "lab"}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let space = IpSpace::new("10.0.0.0/8".parse()?)?.with_display_size(1024)?;
    let pools: Vec<Pool> = serde_json::from_str(POOLS)?;
    let scale = space.display_scale();

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg width=\"{0}\" height=\"{0}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        space.display_size()
    ));
    let tree = PoolTree::from_pools(pools.iter().cloned())?;
    for id in tree.ids() {
        let (Some(pool), Some(cidr), Some(used)) = (tree.pool(id), tree.cidr(id), tree.utilization(id)) else {
            continue;
        };
        let cell = space.cell(cidr)?;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"fill:{};opacity:0.3\"><title>{} {} ({:.1}% used)</title></rect>\n",
            f64::from(cell.x) * scale,
            f64::from(cell.y) * scale,
            f64::from(cell.width) * scale,
            f64::from(cell.height) * scale,
            cell.fill,
            cidr,
            pool.description.as_deref().unwrap_or(""),
            used
        ));
    }
    svg.push_str("</svg>\n");

    let mut file = File::create("ip_space.svg")?;
    file.write_all(svg.as_bytes())?;

    let subnets: Vec<_> = pools.iter().map(|pool| pool.cidr()).collect::<Result<_, _>>()?;
    let fit = space.zoom_to_fit(&subnets)?;
    println!("Generated: ip_space.svg ({} pools)", pools.len());
    for &root in tree.roots() {
        if let (Some(cidr), Some(used)) = (tree.cidr(root), tree.utilization(root)) {
            println!("  - {cidr}: {used:.1}% allocated");
        }
    }
    println!("  - Zoom to fit: {} -> {}", fit, space.viewport(fit)?.transform());
    Ok(())
}
