#[cfg(test)]
mod integration_tests {
    use crate::prelude::*;

    #[test]
    fn test_pool_listing_to_cells() {
        // Two pages of the listing, as the renderer receives them
        let pages: Vec<PoolPage> = [
            r#"{"next": "page2", "results": [
                {"@id": "p1", "network": "10.0.0.0", "prefix_length": 16, "description": "Ljubljana", "top_level": {"@id": "p1"}},
                {"@id": "p2", "network": "10.0.4.0", "prefix_length": 22, "description": "node", "top_level": {"@id": "p1"}}
            ]}"#,
            r#"{"next": null, "results": [
                {"@id": "p3", "network": "10.20.0.0", "prefix_length": 16, "description": "Maribor", "top_level": {"@id": "p3"}}
            ]}"#,
        ]
        .iter()
        .map(|page| serde_json::from_str(page).unwrap())
        .collect();
        assert!(pages.last().unwrap().is_last());

        let space = IpSpace::new("10.0.0.0/8".parse().unwrap())
            .unwrap()
            .with_display_size(800)
            .unwrap();

        let pools: Vec<Pool> = pages.iter().flat_map(|page| page.results.clone()).collect();
        let cells = space.cells(&pools);
        assert_eq!(cells.len(), 3);

        // The /22 sits inside its top-level /16
        let (outer, inner) = (&cells[0], &cells[1]);
        assert!(inner.x >= outer.x && inner.x + inner.width <= outer.x + outer.width);
        assert!(inner.y >= outer.y && inner.y + inner.height <= outer.y + outer.height);
        assert_eq!(inner.width * inner.height, 1024);

        // Zoom to fit the top-level pools
        let top: Vec<Ipv4Cidr> = pages
            .iter()
            .flat_map(|page| page.top_level())
            .map(|pool| pool.cidr().unwrap())
            .collect();
        let fit = space.zoom_to_fit(&top).unwrap();
        assert_eq!(fit.to_string(), "10.0.0.0/11");

        let viewport = space.viewport(fit).unwrap();
        assert!(viewport.scale > 1.0, "zooming into a /11 should magnify");
        assert_eq!(space.display_size(), 512);

        // Allocation of each top-level pool: one /22 out of a /16
        let tree = PoolTree::from_pools(pools).unwrap();
        let used: Vec<(String, f64)> = tree
            .roots()
            .iter()
            .map(|&root| (tree.cidr(root).unwrap().to_string(), tree.utilization(root).unwrap()))
            .collect();
        assert_eq!(
            used,
            vec![("10.0.0.0/16".to_string(), 100.0 / 64.0), ("10.20.0.0/16".to_string(), 100.0)]
        );
    }

    #[test]
    fn test_cell_serializes_for_renderer() {
        let space = IpSpace::new("10.0.0.0/8".parse().unwrap()).unwrap();
        let cell = space.cell("10.0.1.0/24".parse().unwrap()).unwrap();
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "x": 0, "y": 16, "width": 16, "height": 16,
                "prefix_len": 24, "fill": "#404040"
            })
        );

        let cidr: Ipv4Cidr = serde_json::from_str("\"10.9.8.7/8\"").unwrap();
        assert_eq!(serde_json::to_string(&cidr).unwrap(), "\"10.0.0.0/8\"");
        assert!(serde_json::from_str::<Ipv4Cidr>("\"10.0.0.0\"").is_err());
    }
}
